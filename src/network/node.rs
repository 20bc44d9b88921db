use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// One delegate node that accepts submitted transactions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerEndpoint {
    address: String,
    port: u16,
}

impl PeerEndpoint {
    pub fn new(address: &str, port: u16) -> PeerEndpoint {
        PeerEndpoint {
            address: address.to_string(),
            port,
        }
    }

    pub fn get_address(&self) -> &str {
        &self.address
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    /// Full URL for `path` on this endpoint.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}:{}{}", self.address, self.port, path)
    }
}

impl fmt::Display for PeerEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

impl FromStr for PeerEndpoint {
    type Err = BridgeError;

    /// Parses `host:port`. The split is on the last colon so bare IPv6 hosts
    /// need brackets.
    fn from_str(s: &str) -> Result<Self> {
        let (address, port) = s
            .trim()
            .rsplit_once(':')
            .ok_or_else(|| BridgeError::Config(format!("Missing port in endpoint: {s}")))?;
        if address.is_empty() {
            return Err(BridgeError::Config(format!("Missing host in endpoint: {s}")));
        }
        let port = port
            .parse::<u16>()
            .map_err(|e| BridgeError::Config(format!("Invalid port in endpoint {s}: {e}")))?;
        Ok(PeerEndpoint::new(address, port))
    }
}

/// The ordered delegate list of a network profile.
///
/// Built once and never mutated; clones share the same backing slice so the
/// list can be handed to every concurrent call without locking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateNodes {
    inner: Arc<[PeerEndpoint]>,
}

impl DelegateNodes {
    pub fn new(nodes: Vec<PeerEndpoint>) -> Result<DelegateNodes> {
        if nodes.is_empty() {
            return Err(BridgeError::Config(
                "Delegate node list must not be empty".to_string(),
            ));
        }
        Ok(DelegateNodes {
            inner: nodes.into(),
        })
    }

    /// Built-in profile lists are non-empty by construction.
    pub(crate) fn from_profile_list(nodes: Vec<PeerEndpoint>) -> DelegateNodes {
        debug_assert!(!nodes.is_empty());
        DelegateNodes {
            inner: nodes.into(),
        }
    }

    pub fn first(&self) -> Option<&PeerEndpoint> {
        self.inner.first()
    }

    pub fn get_nodes(&self) -> &[PeerEndpoint] {
        &self.inner
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PeerEndpoint> {
        self.inner.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn node_is_known(&self, endpoint: &PeerEndpoint) -> bool {
        self.inner.iter().any(|x| x == endpoint)
    }
}
