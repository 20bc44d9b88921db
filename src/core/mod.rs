//! Core ledger types
//!
//! The transaction record submitted to delegate nodes, its canonical
//! encoding, signing and content-addressed identifier.

pub mod transaction;

pub use transaction::Transaction;
