use crate::core::Transaction;
use crate::error::{BridgeError, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

pub const METHOD_CREATE_ACCOUNT: &str = "CreateAccount";
pub const METHOD_SIGN_MSG: &str = "SignMsg";
pub const METHOD_SHA3_256: &str = "Sha3_256";
pub const METHOD_SEND_TRANSACTION: &str = "SendTransaction";

/// Wire form of a command: `{"method": ..., "param": {...}}`
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    method: String,
    #[serde(default)]
    param: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignMsgParams {
    pub private: String,
    pub msg: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HashParams {
    pub msg: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SendTransactionParams {
    pub tx: Transaction,
    pub private: String,
}

/// The closed set of commands the bridge understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateAccount,
    SignMsg(SignMsgParams),
    Sha3_256(HashParams),
    SendTransaction(SendTransactionParams),
    /// Any other method name. Answered with an empty success response.
    Unknown(String),
}

impl Command {
    /// Parses raw command bytes.
    ///
    /// Bytes that are not a command envelope, and known methods whose
    /// parameters are missing or mistyped, are `InvalidParam`. A missing
    /// `method` is treated like an unknown one.
    pub fn parse(raw: &[u8]) -> Result<Command> {
        let value: Value = serde_json::from_slice(raw)
            .map_err(|e| BridgeError::InvalidParam(format!("Malformed command: {e}")))?;
        if !value.is_object() {
            return Err(BridgeError::InvalidParam(
                "Command must be a JSON object".to_string(),
            ));
        }
        let envelope: Envelope = serde_json::from_value(value)
            .map_err(|e| BridgeError::InvalidParam(format!("Malformed command: {e}")))?;
        let param = envelope.param.unwrap_or_default();

        let command = match envelope.method.as_str() {
            METHOD_CREATE_ACCOUNT => Command::CreateAccount,
            METHOD_SIGN_MSG => Command::SignMsg(params(param)?),
            METHOD_SHA3_256 => Command::Sha3_256(params(param)?),
            METHOD_SEND_TRANSACTION => Command::SendTransaction(params(param)?),
            _ => Command::Unknown(envelope.method),
        };
        Ok(command)
    }

    pub fn method(&self) -> &str {
        match self {
            Command::CreateAccount => METHOD_CREATE_ACCOUNT,
            Command::SignMsg(_) => METHOD_SIGN_MSG,
            Command::Sha3_256(_) => METHOD_SHA3_256,
            Command::SendTransaction(_) => METHOD_SEND_TRANSACTION,
            Command::Unknown(method) => method,
        }
    }
}

fn params<T: DeserializeOwned>(param: Map<String, Value>) -> Result<T> {
    serde_json::from_value(Value::Object(param))
        .map_err(|e| BridgeError::InvalidParam(format!("Invalid parameters: {e}")))
}
