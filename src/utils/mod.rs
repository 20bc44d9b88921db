//! Utility functions and helpers
//!
//! Hashing, signing and encoding primitives used by the wallet, the
//! transaction model and the dispatcher.

pub mod crypto;

pub use crypto::{
    base58_decode, base58_encode, current_timestamp, ecdsa_p256_sha256_sign_digest,
    ecdsa_p256_sha256_sign_verify, hex_decode, new_key_pair, public_key_from_pkcs8,
    ripemd160_digest, sha256_digest, sha3_256_digest,
};
