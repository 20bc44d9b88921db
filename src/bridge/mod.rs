//! Command dispatch bridge
//!
//! The single entry point for hosts: a JSON command goes in, a JSON response
//! comes out. Parsing yields a typed [`Command`], the matching handler runs,
//! and any failure is folded into the response status at this boundary so a
//! handler can never take the host process down with it.

pub mod command;
pub mod handlers;
pub mod response;

pub use command::{Command, HashParams, SendTransactionParams, SignMsgParams};
pub use response::{Response, STATUS_OK};

use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::network::{Broadcaster, HttpTransport, Transport};
use log::{debug, error, info, warn};
use once_cell::sync::OnceCell;
use serde_json::{Map, Value};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

static GLOBAL_BRIDGE: OnceCell<Bridge> = OnceCell::new();

/// Stateless dispatcher over an immutable delegate list.
///
/// Safe to share between threads; every call only touches its own data and
/// the read-only broadcaster.
pub struct Bridge {
    broadcaster: Broadcaster,
}

impl Bridge {
    /// Builds a bridge that reaches delegates over HTTP.
    pub fn new(config: &BridgeConfig) -> Result<Bridge> {
        let transport = HttpTransport::new(config.get_request_timeout())?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: &BridgeConfig, transport: Arc<dyn Transport>) -> Bridge {
        let broadcaster = Broadcaster::new(config.get_delegates().clone(), transport)
            .with_policy(config.get_broadcast_policy())
            .with_max_endpoints(config.get_max_endpoints());
        info!(
            "Bridge ready: network={} delegates={} policy={}",
            config.get_profile(),
            config.get_delegates().len(),
            config.get_broadcast_policy()
        );
        Bridge { broadcaster }
    }

    pub fn get_broadcaster(&self) -> &Broadcaster {
        &self.broadcaster
    }

    /// Handles one raw command.
    pub fn call(&self, raw: &[u8]) -> Response {
        let command = match Command::parse(raw) {
            Ok(command) => command,
            Err(e) => {
                debug!("Rejected command: {e}");
                return Response::from_error(&e);
            }
        };
        let method = command.method().to_string();

        match panic::catch_unwind(AssertUnwindSafe(|| self.dispatch(command))) {
            Ok(Ok(resp)) => Response::ok(resp),
            Ok(Err(e)) => {
                if e.is_invalid_param() {
                    debug!("{method} rejected: {e}");
                } else {
                    error!("{method} failed: {e}");
                }
                Response::from_error(&e)
            }
            Err(_) => {
                error!("{method} panicked");
                Response::internal_error()
            }
        }
    }

    /// String-in/string-out form of [`Bridge::call`].
    pub fn call_str(&self, arg: &str) -> String {
        self.call(arg.as_bytes()).to_json()
    }

    /// Runs a parsed command.
    pub fn dispatch(&self, command: Command) -> Result<Map<String, Value>> {
        match command {
            Command::CreateAccount => handlers::create_account(),
            Command::SignMsg(params) => handlers::sign_msg(&params),
            Command::Sha3_256(params) => handlers::sha3_256(&params),
            Command::SendTransaction(params) => {
                handlers::send_transaction(params, &self.broadcaster)
            }
            Command::Unknown(method) => {
                warn!("Unknown method {method:?}, returning empty response");
                Ok(Map::new())
            }
        }
    }
}

/// Installs the process-wide bridge. Must happen before the first [`call`];
/// a second initialisation is refused.
pub fn init(config: BridgeConfig) -> Result<()> {
    let bridge = Bridge::new(&config)?;
    GLOBAL_BRIDGE
        .set(bridge)
        .map_err(|_| BridgeError::Config("Bridge already initialised".to_string()))
}

/// Dispatches through the process-wide bridge, building it from the
/// environment on first use if [`init`] was never called.
pub fn call(arg: &str) -> String {
    match global() {
        Ok(bridge) => bridge.call_str(arg),
        Err(e) => {
            error!("Bridge unavailable: {e}");
            Response::internal_error().to_json()
        }
    }
}

fn global() -> Result<&'static Bridge> {
    GLOBAL_BRIDGE.get_or_try_init(|| Bridge::new(&BridgeConfig::from_env()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::PeerEndpoint;
    use serde_json::json;

    struct PanickingTransport;

    impl Transport for PanickingTransport {
        fn post(&self, _endpoint: &PeerEndpoint, _path: &str, _body: &[u8]) -> Result<Vec<u8>> {
            panic!("transport bug");
        }
    }

    struct RefusingTransport;

    impl Transport for RefusingTransport {
        fn post(&self, _endpoint: &PeerEndpoint, _path: &str, _body: &[u8]) -> Result<Vec<u8>> {
            Err(BridgeError::Network("refused".to_string()))
        }
    }

    fn bridge(transport: Arc<dyn Transport>) -> Bridge {
        let config = BridgeConfig::default()
            .with_delegates(vec![PeerEndpoint::new("127.0.0.1", 1)])
            .unwrap();
        Bridge::with_transport(&config, transport)
    }

    #[test]
    fn test_sha3_scenario() {
        let bridge = bridge(Arc::new(RefusingTransport));
        assert_eq!(
            bridge.call_str(r#"{"method":"Sha3_256","param":{"msg":"abc"}}"#),
            r#"{"status":0,"resp":{"result":"3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532"}}"#
        );
    }

    #[test]
    fn test_missing_fields_scenario() {
        let bridge = bridge(Arc::new(RefusingTransport));
        assert_eq!(
            bridge.call_str(r#"{"method":"SignMsg","param":{}}"#),
            r#"{"status":-400,"resp":{}}"#
        );
    }

    #[test]
    fn test_unknown_method_is_null_response() {
        let bridge = bridge(Arc::new(RefusingTransport));
        assert_eq!(
            bridge.call_str(r#"{"method":"DeleteEverything","param":{"x":1}}"#),
            r#"{"status":0,"resp":{}}"#
        );
    }

    #[test]
    fn test_malformed_command_is_invalid_param() {
        let bridge = bridge(Arc::new(RefusingTransport));
        assert_eq!(bridge.call(b"{not json").status, -400);
    }

    #[test]
    fn test_handler_panic_becomes_internal_error() {
        let bridge = bridge(Arc::new(PanickingTransport));
        let account = crate::wallet::Account::generate().unwrap();
        let command = json!({
            "method": "SendTransaction",
            "param": {
                "private": account.private_hex(),
                "tx": {"to": "someone", "amount": 1}
            }
        });

        let response = bridge.call(command.to_string().as_bytes());
        assert_eq!(response, Response::internal_error());
    }

    #[test]
    fn test_dispatch_unknown_returns_empty_map() {
        let bridge = bridge(Arc::new(RefusingTransport));
        let resp = bridge.dispatch(Command::Unknown("Nope".to_string())).unwrap();
        assert!(resp.is_empty());
    }
}
