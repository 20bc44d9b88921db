// A transaction as the delegate nodes expect it: a flat JSON record that the
// sender signs and then identifies by the SHA3-256 of its final encoding.

use crate::error::{BridgeError, Result};
use crate::utils::{current_timestamp, hex_decode, sha3_256_digest};
use crate::wallet::{address_from_public_key, verify_signature, Account};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default)]
    from: String, // Overwritten with the signer's address on submission
    to: String,
    #[serde(default, rename = "time")]
    time_stamp: i64, // Milliseconds since the epoch
    amount: u64,
    #[serde(default)]
    fee: u64,
    #[serde(default)]
    nonce: u64,
    #[serde(default)]
    data: String,
    #[serde(default)]
    token_address: String, // Empty for the native coin
    #[serde(default)]
    sign: String, // Hex signature, empty until signed
}

impl Transaction {
    pub fn new(to: &str, amount: u64, fee: u64, nonce: u64) -> Result<Transaction> {
        Ok(Transaction {
            to: to.to_string(),
            time_stamp: current_timestamp()?,
            amount,
            fee,
            nonce,
            ..Default::default()
        })
    }

    pub fn with_data(mut self, data: &str) -> Self {
        self.data = data.to_string();
        self
    }

    pub fn with_token_address(mut self, token_address: &str) -> Self {
        self.token_address = token_address.to_string();
        self
    }

    pub fn with_timestamp(mut self, time_stamp: i64) -> Self {
        self.time_stamp = time_stamp;
        self
    }

    pub fn get_from(&self) -> &str {
        &self.from
    }

    pub fn set_from(&mut self, from: &str) {
        self.from = from.to_string();
    }

    pub fn get_to(&self) -> &str {
        &self.to
    }

    pub fn get_amount(&self) -> u64 {
        self.amount
    }

    pub fn get_fee(&self) -> u64 {
        self.fee
    }

    pub fn get_nonce(&self) -> u64 {
        self.nonce
    }

    pub fn get_sign(&self) -> &str {
        &self.sign
    }

    pub fn is_signed(&self) -> bool {
        !self.sign.is_empty()
    }

    /// The bytes covered by the signature: the canonical encoding with the
    /// `sign` field emptied.
    pub fn signing_message(&self) -> Result<Vec<u8>> {
        let unsigned = Transaction {
            sign: String::new(),
            ..self.clone()
        };
        unsigned.to_bytes()
    }

    /// Signs with `account`, replacing any previous signature.
    ///
    /// The sender field is not touched; callers bind it first so that the
    /// address is covered by the signature.
    pub fn sign(&mut self, account: &Account) -> Result<()> {
        let digest = sha3_256_digest(&self.signing_message()?);
        let signature = account.sign(&digest)?;
        self.sign = hex::encode(signature);
        Ok(())
    }

    /// Checks the signature against `public_key` and that `from` is the
    /// address derived from it.
    pub fn verify_signature(&self, public_key: &[u8]) -> bool {
        if self.from != address_from_public_key(public_key) {
            return false;
        }
        let signature = match hex_decode(&self.sign) {
            Ok(signature) => signature,
            Err(_) => return false,
        };
        let digest = match self.signing_message() {
            Ok(message) => sha3_256_digest(&message),
            Err(e) => {
                log::error!("Failed to encode transaction for verification: {e}");
                return false;
            }
        };
        verify_signature(public_key, &digest, &signature)
    }

    /// Canonical encoding: compact JSON with a fixed field order.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| BridgeError::Serialization(format!("Failed to encode transaction: {e}")))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Transaction> {
        serde_json::from_slice(bytes)
            .map_err(|e| BridgeError::Serialization(format!("Failed to decode transaction: {e}")))
    }

    /// Content hash of the current encoding. Recomputed on every call, so it
    /// always reflects the latest sender and signature.
    pub fn id(&self) -> Result<String> {
        Ok(hex::encode(sha3_256_digest(&self.to_bytes()?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_transaction() -> Transaction {
        Transaction::new("1BoatSLRHtKNngkdXEeobR76b53LETtpyT", 1_000, 10, 1)
            .unwrap()
            .with_timestamp(1_700_000_000_000)
    }

    #[test]
    fn test_canonical_field_order() {
        let tx = sample_transaction().with_data("memo");
        let encoded = String::from_utf8(tx.to_bytes().unwrap()).unwrap();
        assert_eq!(
            encoded,
            r#"{"from":"","to":"1BoatSLRHtKNngkdXEeobR76b53LETtpyT","time":1700000000000,"amount":1000,"fee":10,"nonce":1,"data":"memo","tokenAddress":"","sign":""}"#
        );
    }

    #[test]
    fn test_decode_with_defaults() {
        let tx = Transaction::from_bytes(br#"{"to":"abc","amount":5}"#).unwrap();
        assert_eq!(tx.get_to(), "abc");
        assert_eq!(tx.get_amount(), 5);
        assert_eq!(tx.get_from(), "");
        assert!(!tx.is_signed());

        assert!(Transaction::from_bytes(br#"{"amount":5}"#).is_err());
        assert!(Transaction::from_bytes(br#"{"to":"abc","amount":"five"}"#).is_err());
    }

    #[test]
    fn test_sign_and_verify() {
        let account = Account::generate().unwrap();
        let mut tx = sample_transaction();
        tx.set_from(&account.get_address());
        tx.sign(&account).unwrap();

        assert!(tx.is_signed());
        assert!(tx.verify_signature(account.get_public_key()));

        let other = Account::generate().unwrap();
        assert!(!tx.verify_signature(other.get_public_key()));
    }

    #[test]
    fn test_tampering_breaks_signature() {
        let account = Account::generate().unwrap();
        let mut tx = sample_transaction();
        tx.set_from(&account.get_address());
        tx.sign(&account).unwrap();

        let mut tampered = tx.clone();
        tampered.amount += 1;
        assert!(!tampered.verify_signature(account.get_public_key()));
    }

    #[test]
    fn test_id_tracks_sender_and_signature() {
        let account = Account::generate().unwrap();
        let mut tx = sample_transaction();
        let unsigned_id = tx.id().unwrap();

        tx.set_from(&account.get_address());
        let bound_id = tx.id().unwrap();
        assert_ne!(unsigned_id, bound_id);

        tx.sign(&account).unwrap();
        let signed_id = tx.id().unwrap();
        assert_ne!(bound_id, signed_id);

        assert_eq!(
            signed_id,
            hex::encode(sha3_256_digest(&tx.to_bytes().unwrap()))
        );
        assert_eq!(signed_id.len(), 64);
    }

    #[test]
    fn test_signing_message_ignores_signature() {
        let account = Account::generate().unwrap();
        let mut tx = sample_transaction();
        tx.set_from(&account.get_address());
        let before = tx.signing_message().unwrap();
        tx.sign(&account).unwrap();
        assert_eq!(before, tx.signing_message().unwrap());
    }
}
