use crate::error::{BridgeError, Result};
use crate::network::{BroadcastPolicy, DelegateNodes, PeerEndpoint, DEFAULT_REQUEST_TIMEOUT};
use log::info;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_DELEGATE_PORT: u16 = 19951;

const NETWORK_KEY: &str = "BRIDGE_NETWORK";
const CONFIG_FILE_KEY: &str = "BRIDGE_CONFIG";
const DELEGATES_KEY: &str = "BRIDGE_DELEGATES";
const TIMEOUT_KEY: &str = "BRIDGE_TIMEOUT_MS";
const MAX_ENDPOINTS_KEY: &str = "BRIDGE_MAX_ENDPOINTS";
const POLICY_KEY: &str = "BRIDGE_BROADCAST_POLICY";

/// Named, fixed delegate sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetworkProfile {
    #[default]
    Mainnet,
    Testnet,
    /// A single delegate on the loopback interface, for development
    Localnet,
}

impl NetworkProfile {
    pub fn all() -> [NetworkProfile; 3] {
        [
            NetworkProfile::Mainnet,
            NetworkProfile::Testnet,
            NetworkProfile::Localnet,
        ]
    }

    pub fn delegate_nodes(&self) -> Vec<PeerEndpoint> {
        match self {
            NetworkProfile::Mainnet => vec![
                PeerEndpoint::new("delegate1.mainnet.bridge-network.org", DEFAULT_DELEGATE_PORT),
                PeerEndpoint::new("delegate2.mainnet.bridge-network.org", DEFAULT_DELEGATE_PORT),
                PeerEndpoint::new("delegate3.mainnet.bridge-network.org", DEFAULT_DELEGATE_PORT),
                PeerEndpoint::new("delegate4.mainnet.bridge-network.org", DEFAULT_DELEGATE_PORT),
            ],
            NetworkProfile::Testnet => vec![
                PeerEndpoint::new("delegate1.testnet.bridge-network.org", DEFAULT_DELEGATE_PORT),
                PeerEndpoint::new("delegate2.testnet.bridge-network.org", DEFAULT_DELEGATE_PORT),
            ],
            NetworkProfile::Localnet => vec![PeerEndpoint::new("127.0.0.1", DEFAULT_DELEGATE_PORT)],
        }
    }
}

impl FromStr for NetworkProfile {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "mainnet" | "main" => Ok(NetworkProfile::Mainnet),
            "testnet" | "test" => Ok(NetworkProfile::Testnet),
            "localnet" | "local" => Ok(NetworkProfile::Localnet),
            _ => Err(BridgeError::Config(format!(
                "Invalid network profile: {s}. Valid options: mainnet, testnet, localnet"
            ))),
        }
    }
}

impl fmt::Display for NetworkProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkProfile::Mainnet => write!(f, "mainnet"),
            NetworkProfile::Testnet => write!(f, "testnet"),
            NetworkProfile::Localnet => write!(f, "localnet"),
        }
    }
}

/// On-disk form of the configuration. Every key is optional and falls back to
/// the profile defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    network: Option<String>,
    delegates: Option<Vec<PeerEndpoint>>,
    request_timeout_ms: Option<u64>,
    max_endpoints: Option<usize>,
    broadcast_policy: Option<BroadcastPolicy>,
}

/// Everything the bridge needs before its first call.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    profile: NetworkProfile,
    delegates: DelegateNodes,
    request_timeout: Duration,
    max_endpoints: Option<usize>,
    broadcast_policy: BroadcastPolicy,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::for_profile(NetworkProfile::default())
    }
}

impl BridgeConfig {
    pub fn for_profile(profile: NetworkProfile) -> BridgeConfig {
        BridgeConfig {
            profile,
            delegates: DelegateNodes::from_profile_list(profile.delegate_nodes()),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_endpoints: None,
            broadcast_policy: BroadcastPolicy::default(),
        }
    }

    /// Reads `BRIDGE_CONFIG` (a TOML file) if set, then applies the other
    /// `BRIDGE_*` environment variables on top.
    pub fn from_env() -> Result<BridgeConfig> {
        let base = match env::var(CONFIG_FILE_KEY) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => BridgeConfig::default(),
        };
        base.apply_overrides(|key| env::var(key).ok())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<BridgeConfig> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            BridgeError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        let config = Self::from_toml_str(&contents)?;
        info!("Loaded bridge configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<BridgeConfig> {
        let file: ConfigFile = toml::from_str(contents)?;

        let profile = match file.network {
            Some(name) => name.parse()?,
            None => NetworkProfile::default(),
        };
        let mut config = Self::for_profile(profile);
        if let Some(delegates) = file.delegates {
            config = config.with_delegates(delegates)?;
        }
        if let Some(ms) = file.request_timeout_ms {
            config = config.with_request_timeout(Duration::from_millis(ms))?;
        }
        if file.max_endpoints.is_some() {
            config = config.with_max_endpoints(file.max_endpoints)?;
        }
        if let Some(policy) = file.broadcast_policy {
            config = config.with_broadcast_policy(policy);
        }
        Ok(config)
    }

    /// Applies `BRIDGE_*` overrides fetched through `lookup`.
    ///
    /// `BRIDGE_NETWORK` resets the delegate list to that profile's; an
    /// explicit `BRIDGE_DELEGATES` list then takes precedence over both.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<BridgeConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup(NETWORK_KEY) {
            self = self.with_profile(name.parse()?);
        }
        if let Some(list) = lookup(DELEGATES_KEY) {
            let delegates = list
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(PeerEndpoint::from_str)
                .collect::<Result<Vec<_>>>()?;
            self = self.with_delegates(delegates)?;
        }
        if let Some(ms) = lookup(TIMEOUT_KEY) {
            let ms = ms
                .trim()
                .parse::<u64>()
                .map_err(|e| BridgeError::Config(format!("Invalid {TIMEOUT_KEY}: {e}")))?;
            self = self.with_request_timeout(Duration::from_millis(ms))?;
        }
        if let Some(max) = lookup(MAX_ENDPOINTS_KEY) {
            let max = max
                .trim()
                .parse::<usize>()
                .map_err(|e| BridgeError::Config(format!("Invalid {MAX_ENDPOINTS_KEY}: {e}")))?;
            self = self.with_max_endpoints(Some(max))?;
        }
        if let Some(policy) = lookup(POLICY_KEY) {
            self = self.with_broadcast_policy(policy.trim().parse()?);
        }
        Ok(self)
    }

    /// Switches profile, replacing the delegate list with the profile's own.
    pub fn with_profile(mut self, profile: NetworkProfile) -> BridgeConfig {
        self.profile = profile;
        self.delegates = DelegateNodes::from_profile_list(profile.delegate_nodes());
        self
    }

    pub fn with_delegates(mut self, delegates: Vec<PeerEndpoint>) -> Result<BridgeConfig> {
        self.delegates = DelegateNodes::new(delegates)?;
        Ok(self)
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Result<BridgeConfig> {
        if timeout.is_zero() {
            return Err(BridgeError::Config(
                "Request timeout must be positive".to_string(),
            ));
        }
        self.request_timeout = timeout;
        Ok(self)
    }

    pub fn with_max_endpoints(mut self, max_endpoints: Option<usize>) -> Result<BridgeConfig> {
        if max_endpoints == Some(0) {
            return Err(BridgeError::Config(
                "max_endpoints must be at least 1".to_string(),
            ));
        }
        self.max_endpoints = max_endpoints;
        Ok(self)
    }

    pub fn with_broadcast_policy(mut self, policy: BroadcastPolicy) -> BridgeConfig {
        self.broadcast_policy = policy;
        self
    }

    pub fn get_profile(&self) -> NetworkProfile {
        self.profile
    }

    pub fn get_delegates(&self) -> &DelegateNodes {
        &self.delegates
    }

    pub fn get_request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn get_max_endpoints(&self) -> Option<usize> {
        self.max_endpoints
    }

    pub fn get_broadcast_policy(&self) -> BroadcastPolicy {
        self.broadcast_policy
    }
}
