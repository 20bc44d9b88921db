//! Key management and address derivation
//!
//! Generates P-256 accounts, turns public keys into Base58Check addresses and
//! signs messages. Keys are never persisted here; custody belongs to the
//! caller.

pub mod account;

pub use account::{
    address_from_public_key, convert_address, hash_pub_key, validate_address, verify_signature,
    Account, ADDRESS_CHECK_SUM_LEN, ADDRESS_PAYLOAD_LEN,
};
