use crate::error::{BridgeError, Result};
use crate::network::{DelegateNodes, PeerEndpoint, Transport};
use log::{info, warn};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Submission path on every delegate node
pub const NEW_TRANSACTION_PATH: &str = "/transaction/api/newTransaction";

/// When a delegate attempt counts as a successful broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BroadcastPolicy {
    /// The first transmission that completes without a transport error wins,
    /// whatever the delegate replies.
    Delivery,
    /// The first delegate whose reply envelope reports `status == 0` wins.
    /// A well-formed rejection ends the broadcast.
    #[default]
    Acceptance,
}

impl FromStr for BroadcastPolicy {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "delivery" => Ok(BroadcastPolicy::Delivery),
            "acceptance" => Ok(BroadcastPolicy::Acceptance),
            _ => Err(BridgeError::Config(format!(
                "Invalid broadcast policy: {s}. Valid options: delivery, acceptance"
            ))),
        }
    }
}

impl fmt::Display for BroadcastPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BroadcastPolicy::Delivery => write!(f, "delivery"),
            BroadcastPolicy::Acceptance => write!(f, "acceptance"),
        }
    }
}

/// Reply envelope returned by a delegate node
#[derive(Debug, Deserialize)]
struct RemoteReply {
    status: i64,
    #[serde(default)]
    msg: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastOutcome {
    Accepted {
        endpoint: PeerEndpoint,
        attempts: usize,
    },
    Rejected {
        endpoint: PeerEndpoint,
        status: i64,
        msg: String,
        attempts: usize,
    },
    /// Every endpoint tried failed to transmit or answered unreadably.
    Exhausted { attempts: usize },
}

impl BroadcastOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BroadcastOutcome::Accepted { .. })
    }

    pub fn attempts(&self) -> usize {
        match self {
            BroadcastOutcome::Accepted { attempts, .. }
            | BroadcastOutcome::Rejected { attempts, .. }
            | BroadcastOutcome::Exhausted { attempts } => *attempts,
        }
    }
}

/// Sequential broadcast over the delegate list with ordered failover.
///
/// Each endpoint gets exactly one attempt; there is no fan-out and no retry.
pub struct Broadcaster {
    nodes: DelegateNodes,
    transport: Arc<dyn Transport>,
    policy: BroadcastPolicy,
    max_endpoints: Option<usize>,
}

impl Broadcaster {
    pub fn new(nodes: DelegateNodes, transport: Arc<dyn Transport>) -> Self {
        Self {
            nodes,
            transport,
            policy: BroadcastPolicy::default(),
            max_endpoints: None,
        }
    }

    pub fn with_policy(mut self, policy: BroadcastPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Caps how many endpoints are tried before giving up.
    pub fn with_max_endpoints(mut self, max_endpoints: Option<usize>) -> Self {
        self.max_endpoints = max_endpoints;
        self
    }

    pub fn get_policy(&self) -> BroadcastPolicy {
        self.policy
    }

    pub fn get_nodes(&self) -> &DelegateNodes {
        &self.nodes
    }

    pub fn broadcast(&self, payload: &[u8]) -> BroadcastOutcome {
        let limit = self.max_endpoints.unwrap_or(self.nodes.len());
        let mut attempts = 0;

        for endpoint in self.nodes.iter().take(limit) {
            attempts += 1;
            let body = match self.transport.post(endpoint, NEW_TRANSACTION_PATH, payload) {
                Ok(body) => body,
                Err(e) => {
                    warn!("Delegate {endpoint} unavailable: {e}");
                    continue;
                }
            };

            if self.policy == BroadcastPolicy::Delivery {
                info!("Transaction delivered to {endpoint}");
                return BroadcastOutcome::Accepted {
                    endpoint: endpoint.clone(),
                    attempts,
                };
            }

            match serde_json::from_slice::<RemoteReply>(&body) {
                Ok(reply) if reply.status == 0 => {
                    info!("Transaction accepted by {endpoint}");
                    return BroadcastOutcome::Accepted {
                        endpoint: endpoint.clone(),
                        attempts,
                    };
                }
                Ok(reply) => {
                    warn!(
                        "Transaction rejected by {endpoint}: status={} msg={}",
                        reply.status, reply.msg
                    );
                    return BroadcastOutcome::Rejected {
                        endpoint: endpoint.clone(),
                        status: reply.status,
                        msg: reply.msg,
                        attempts,
                    };
                }
                Err(e) => {
                    warn!("Unreadable reply from {endpoint}: {e}");
                }
            }
        }

        warn!("Broadcast failed after {attempts} attempt(s)");
        BroadcastOutcome::Exhausted { attempts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Scripted transport: replies per endpoint, records the call order.
    struct ScriptedTransport {
        replies: HashMap<PeerEndpoint, Result<Vec<u8>>>,
        calls: Mutex<Vec<PeerEndpoint>>,
    }

    impl ScriptedTransport {
        fn new(replies: Vec<(PeerEndpoint, Result<Vec<u8>>)>) -> Arc<Self> {
            Arc::new(Self {
                replies: replies.into_iter().collect(),
                calls: Mutex::new(vec![]),
            })
        }

        fn calls(&self) -> Vec<u16> {
            self.calls.lock().unwrap().iter().map(|e| e.get_port()).collect()
        }
    }

    impl Transport for ScriptedTransport {
        fn post(&self, endpoint: &PeerEndpoint, path: &str, _body: &[u8]) -> Result<Vec<u8>> {
            assert_eq!(path, NEW_TRANSACTION_PATH);
            self.calls.lock().unwrap().push(endpoint.clone());
            self.replies
                .get(endpoint)
                .cloned()
                .unwrap_or_else(|| Err(BridgeError::Network("refused".to_string())))
        }
    }

    fn endpoint(port: u16) -> PeerEndpoint {
        PeerEndpoint::new("127.0.0.1", port)
    }

    fn nodes(ports: &[u16]) -> DelegateNodes {
        DelegateNodes::new(ports.iter().map(|p| endpoint(*p)).collect()).unwrap()
    }

    fn accepted() -> Result<Vec<u8>> {
        Ok(br#"{"status":0,"msg":"ok"}"#.to_vec())
    }

    fn rejected() -> Result<Vec<u8>> {
        Ok(br#"{"status":-1,"msg":"bad nonce"}"#.to_vec())
    }

    #[test]
    fn test_first_accepting_endpoint_wins() {
        let transport = ScriptedTransport::new(vec![(endpoint(1), accepted())]);
        let broadcaster = Broadcaster::new(nodes(&[1, 2]), transport.clone());

        let outcome = broadcaster.broadcast(b"{}");
        assert!(outcome.is_success());
        assert_eq!(outcome.attempts(), 1);
        assert_eq!(transport.calls(), vec![1]);
    }

    #[test]
    fn test_transport_failure_advances_in_order() {
        let transport = ScriptedTransport::new(vec![(endpoint(3), accepted())]);
        let broadcaster = Broadcaster::new(nodes(&[1, 2, 3, 4]), transport.clone());

        let outcome = broadcaster.broadcast(b"{}");
        assert_eq!(
            outcome,
            BroadcastOutcome::Accepted {
                endpoint: endpoint(3),
                attempts: 3
            }
        );
        assert_eq!(transport.calls(), vec![1, 2, 3]);
    }

    #[test]
    fn test_all_endpoints_failing_is_exhausted() {
        let transport = ScriptedTransport::new(vec![]);
        let broadcaster = Broadcaster::new(nodes(&[1, 2, 3]), transport.clone());

        let outcome = broadcaster.broadcast(b"{}");
        assert_eq!(outcome, BroadcastOutcome::Exhausted { attempts: 3 });
        assert_eq!(transport.calls(), vec![1, 2, 3]);
    }

    #[test]
    fn test_rejection_is_terminal_under_acceptance() {
        let transport =
            ScriptedTransport::new(vec![(endpoint(1), rejected()), (endpoint(2), accepted())]);
        let broadcaster = Broadcaster::new(nodes(&[1, 2]), transport.clone());

        let outcome = broadcaster.broadcast(b"{}");
        assert!(!outcome.is_success());
        assert!(matches!(
            outcome,
            BroadcastOutcome::Rejected { status: -1, .. }
        ));
        assert_eq!(transport.calls(), vec![1]);
    }

    #[test]
    fn test_unreadable_reply_advances_under_acceptance() {
        let transport = ScriptedTransport::new(vec![
            (endpoint(1), Ok(b"<html>busy</html>".to_vec())),
            (endpoint(2), accepted()),
        ]);
        let broadcaster = Broadcaster::new(nodes(&[1, 2]), transport.clone());

        assert!(broadcaster.broadcast(b"{}").is_success());
        assert_eq!(transport.calls(), vec![1, 2]);
    }

    #[test]
    fn test_delivery_policy_ignores_reply() {
        let transport = ScriptedTransport::new(vec![(endpoint(2), rejected())]);
        let broadcaster = Broadcaster::new(nodes(&[1, 2, 3]), transport.clone())
            .with_policy(BroadcastPolicy::Delivery);

        let outcome = broadcaster.broadcast(b"{}");
        assert_eq!(
            outcome,
            BroadcastOutcome::Accepted {
                endpoint: endpoint(2),
                attempts: 2
            }
        );
        assert_eq!(transport.calls(), vec![1, 2]);
    }

    #[test]
    fn test_max_endpoints_caps_attempts() {
        let transport = ScriptedTransport::new(vec![(endpoint(3), accepted())]);
        let broadcaster = Broadcaster::new(nodes(&[1, 2, 3]), transport.clone())
            .with_max_endpoints(Some(2));

        assert_eq!(
            broadcaster.broadcast(b"{}"),
            BroadcastOutcome::Exhausted { attempts: 2 }
        );
        assert_eq!(transport.calls(), vec![1, 2]);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!(
            "Delivery".parse::<BroadcastPolicy>().unwrap(),
            BroadcastPolicy::Delivery
        );
        assert_eq!(
            "acceptance".parse::<BroadcastPolicy>().unwrap(),
            BroadcastPolicy::Acceptance
        );
        assert!("fanout".parse::<BroadcastPolicy>().is_err());
        assert_eq!(BroadcastPolicy::default(), BroadcastPolicy::Acceptance);
    }
}
