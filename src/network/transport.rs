use crate::error::{BridgeError, Result};
use crate::network::PeerEndpoint;
use log::debug;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

/// Default bound on a single delegate attempt, connect plus reply.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(5000);

/// Sends a request body to a delegate endpoint.
///
/// `Err` means the transmission itself failed (connection refused, timeout,
/// non-2xx HTTP status). `Ok` carries the raw reply body, whatever it says.
pub trait Transport: Send + Sync {
    fn post(&self, endpoint: &PeerEndpoint, path: &str, body: &[u8]) -> Result<Vec<u8>>;
}

/// Blocking HTTP transport with a bounded per-request timeout.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .no_proxy()
            .build()
            .map_err(|e| BridgeError::Network(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post(&self, endpoint: &PeerEndpoint, path: &str, body: &[u8]) -> Result<Vec<u8>> {
        let url = endpoint.url(path);
        debug!("POST {} bytes to {url}", body.len());

        let resp = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_vec())
            .send()
            .map_err(|e| BridgeError::Network(format!("Failed to reach {endpoint}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BridgeError::Network(format!(
                "{endpoint} answered with HTTP {status}"
            )));
        }

        let bytes = resp
            .bytes()
            .map_err(|e| BridgeError::Network(format!("Failed to read reply from {endpoint}: {e}")))?;
        Ok(bytes.to_vec())
    }
}
