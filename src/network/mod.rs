//! Delegate-node networking
//!
//! This module holds the immutable delegate list, the transport used to reach
//! a delegate, and the ordered-failover broadcast of signed transactions.

pub mod broadcast;
pub mod node;
pub mod transport;

pub use broadcast::{BroadcastOutcome, BroadcastPolicy, Broadcaster, NEW_TRANSACTION_PATH};
pub use node::{DelegateNodes, PeerEndpoint};
pub use transport::{HttpTransport, Transport, DEFAULT_REQUEST_TIMEOUT};
