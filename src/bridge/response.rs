use crate::error::{BridgeError, STATUS_INTERNAL_ERROR, STATUS_INVALID_PARAM};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const STATUS_OK: i32 = 0;

const INTERNAL_ERROR_JSON: &str = r#"{"status":-500,"resp":{}}"#;

/// Wire form of every reply: `{"status": ..., "resp": {...}}`
///
/// A zero status only means the command ran. Business outcomes such as a
/// rejected broadcast travel inside `resp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: i32,
    pub resp: Map<String, Value>,
}

impl Response {
    pub fn ok(resp: Map<String, Value>) -> Response {
        Response {
            status: STATUS_OK,
            resp,
        }
    }

    /// Success with an empty payload
    pub fn null() -> Response {
        Self::ok(Map::new())
    }

    pub fn invalid_param() -> Response {
        Response {
            status: STATUS_INVALID_PARAM,
            resp: Map::new(),
        }
    }

    pub fn internal_error() -> Response {
        Response {
            status: STATUS_INTERNAL_ERROR,
            resp: Map::new(),
        }
    }

    /// Collapses an error into its status class; the detail is dropped.
    pub fn from_error(err: &BridgeError) -> Response {
        Response {
            status: err.status_code(),
            resp: Map::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.resp.get(key)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            log::error!("Failed to encode response: {e}");
            INTERNAL_ERROR_JSON.to_string()
        })
    }
}
