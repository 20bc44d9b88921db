//! # Delegate Bridge
//!
//! A JSON command bridge that lets a host application (a mobile app, an
//! embedded runtime, a shell script) create accounts, sign and hash messages,
//! and submit signed transactions to a ledger network's delegate nodes
//! without speaking the node protocol itself.
//!
//! ## Protocol
//! Requests look like `{"method": "...", "param": {...}}` and every reply is
//! `{"status": <int>, "resp": {...}}`:
//! - `CreateAccount` → `{private, address}`
//! - `SignMsg {private, msg}` → `{result}`
//! - `Sha3_256 {msg}` → `{result}`
//! - `SendTransaction {tx, private}` → `{success, txId}`
//!
//! Status `0` is success, `-400` invalid parameters, `-500` internal failure.
//! Unknown methods answer `{"status":0,"resp":{}}`.
//!
//! ## Layout
//! - `bridge/`: command parsing, dispatch and the response envelope
//! - `core/`: the transaction record, its signing and identifier
//! - `wallet/`: P-256 accounts and Base58Check addresses
//! - `network/`: delegate endpoints, HTTP transport, ordered-failover broadcast
//! - `config/`: network profiles, TOML and environment configuration
//! - `utils/`: hashing, signing and encoding primitives
//! - `cli/`: arguments for the `delegate-bridge` binary

pub mod bridge;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod network;
pub mod utils;
pub mod wallet;

pub use bridge::{Bridge, Response};
pub use cli::{Command, Opt};
pub use config::{BridgeConfig, NetworkProfile};
pub use crate::core::Transaction;
pub use error::{BridgeError, Result};
pub use network::{
    BroadcastOutcome, BroadcastPolicy, Broadcaster, DelegateNodes, HttpTransport, PeerEndpoint,
    Transport,
};
pub use utils::{sha256_digest, sha3_256_digest};
pub use wallet::{
    address_from_public_key, convert_address, hash_pub_key, validate_address, verify_signature,
    Account,
};
