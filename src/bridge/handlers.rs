// One function per command. Each returns the `resp` payload on success; the
// dispatcher owns turning errors into status codes.

use crate::bridge::command::{HashParams, SendTransactionParams, SignMsgParams};
use crate::error::Result;
use crate::network::Broadcaster;
use crate::utils::sha3_256_digest;
use crate::wallet::Account;
use log::info;
use serde_json::{Map, Value};

pub fn create_account() -> Result<Map<String, Value>> {
    let account = Account::generate()?;
    let mut resp = Map::new();
    resp.insert("private".to_string(), Value::from(account.private_hex()));
    resp.insert("address".to_string(), Value::from(account.get_address()));
    Ok(resp)
}

pub fn sign_msg(params: &SignMsgParams) -> Result<Map<String, Value>> {
    let account = Account::from_private_hex(&params.private)?;
    let signature = account.sign(params.msg.as_bytes())?;
    let mut resp = Map::new();
    resp.insert("result".to_string(), Value::from(hex::encode(signature)));
    Ok(resp)
}

pub fn sha3_256(params: &HashParams) -> Result<Map<String, Value>> {
    let digest = sha3_256_digest(params.msg.as_bytes());
    let mut resp = Map::new();
    resp.insert("result".to_string(), Value::from(hex::encode(digest)));
    Ok(resp)
}

/// Binds the sender, signs, identifies and broadcasts.
///
/// The broadcast outcome is reported as `success`; a failed broadcast is not
/// an error.
pub fn send_transaction(
    params: SendTransactionParams,
    broadcaster: &Broadcaster,
) -> Result<Map<String, Value>> {
    let SendTransactionParams { mut tx, private } = params;
    let account = Account::from_private_hex(&private)?;

    tx.set_from(&account.get_address());
    tx.sign(&account)?;

    // after sender and signature are final
    let tx_id = tx.id()?;
    let outcome = broadcaster.broadcast(&tx.to_bytes()?);
    info!(
        "Transaction {tx_id} from {} broadcast: success={} attempts={}",
        tx.get_from(),
        outcome.is_success(),
        outcome.attempts()
    );

    let mut resp = Map::new();
    resp.insert("success".to_string(), Value::from(outcome.is_success()));
    resp.insert("txId".to_string(), Value::from(tx_id));
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Transaction;
    use crate::error::BridgeError;
    use crate::network::{DelegateNodes, PeerEndpoint, Transport};
    use crate::wallet::{validate_address, verify_signature};
    use std::sync::{Arc, Mutex};

    /// Accepts everything and keeps the last payload.
    #[derive(Default)]
    struct RecordingTransport {
        payload: Mutex<Option<Vec<u8>>>,
    }

    impl Transport for RecordingTransport {
        fn post(&self, _endpoint: &PeerEndpoint, _path: &str, body: &[u8]) -> Result<Vec<u8>> {
            *self.payload.lock().unwrap() = Some(body.to_vec());
            Ok(br#"{"status":0}"#.to_vec())
        }
    }

    struct DownTransport;

    impl Transport for DownTransport {
        fn post(&self, endpoint: &PeerEndpoint, _path: &str, _body: &[u8]) -> Result<Vec<u8>> {
            Err(BridgeError::Network(format!("{endpoint} unreachable")))
        }
    }

    fn broadcaster(transport: Arc<dyn Transport>) -> Broadcaster {
        let nodes = DelegateNodes::new(vec![
            PeerEndpoint::new("127.0.0.1", 1),
            PeerEndpoint::new("127.0.0.1", 2),
        ])
        .unwrap();
        Broadcaster::new(nodes, transport)
    }

    fn send_params(private: &str) -> SendTransactionParams {
        SendTransactionParams {
            tx: Transaction::new("recipient", 42, 1, 3)
                .unwrap()
                .with_timestamp(1_700_000_000_000),
            private: private.to_string(),
        }
    }

    #[test]
    fn test_create_account_payload() {
        let resp = create_account().unwrap();
        let private = resp["private"].as_str().unwrap();
        let address = resp["address"].as_str().unwrap();

        let account = Account::from_private_hex(private).unwrap();
        assert_eq!(account.get_address(), address);
        assert!(validate_address(address));
    }

    #[test]
    fn test_sign_msg_verifies() {
        let account = Account::generate().unwrap();
        let params = SignMsgParams {
            private: account.private_hex(),
            msg: "pay 5 to bob".to_string(),
        };
        let resp = sign_msg(&params).unwrap();
        let signature = hex::decode(resp["result"].as_str().unwrap()).unwrap();
        assert!(verify_signature(
            account.get_public_key(),
            b"pay 5 to bob",
            &signature
        ));
    }

    #[test]
    fn test_sign_msg_rejects_bad_key() {
        let params = SignMsgParams {
            private: "zz".to_string(),
            msg: "x".to_string(),
        };
        assert!(sign_msg(&params).unwrap_err().is_invalid_param());
    }

    #[test]
    fn test_sha3_256_payload() {
        let resp = sha3_256(&HashParams {
            msg: String::new(),
        })
        .unwrap();
        assert_eq!(
            resp["result"],
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
    }

    #[test]
    fn test_send_transaction_broadcasts_signed_encoding() {
        let account = Account::generate().unwrap();
        let transport = Arc::new(RecordingTransport::default());
        let broadcaster = broadcaster(transport.clone());

        let resp = send_transaction(send_params(&account.private_hex()), &broadcaster).unwrap();
        assert_eq!(resp["success"], true);

        let payload = transport.payload.lock().unwrap().clone().unwrap();
        let sent = Transaction::from_bytes(&payload).unwrap();
        assert_eq!(sent.get_from(), account.get_address());
        assert!(sent.verify_signature(account.get_public_key()));
        assert_eq!(resp["txId"], hex::encode(sha3_256_digest(&payload)));
    }

    #[test]
    fn test_send_transaction_with_network_down() {
        let account = Account::generate().unwrap();
        let broadcaster = broadcaster(Arc::new(DownTransport));

        let resp = send_transaction(send_params(&account.private_hex()), &broadcaster).unwrap();
        assert_eq!(resp["success"], false);
        assert_eq!(resp["txId"].as_str().unwrap().len(), 64);
    }

    #[test]
    fn test_send_transaction_rejects_non_hex_key() {
        let broadcaster = broadcaster(Arc::new(DownTransport));
        let err = send_transaction(send_params("not-hex"), &broadcaster).unwrap_err();
        assert!(err.is_invalid_param());
    }
}
