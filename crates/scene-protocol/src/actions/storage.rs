//! Key-value storage payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `saveData` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveDataRequest {
    pub key: String,
    pub value: Value,
}

/// `getData` / `removeData` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataKeyRequest {
    pub key: String,
}

/// Reply to `getData`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataValueResponse {
    pub key: String,
    #[serde(default)]
    pub value: Option<Value>,
}

/// Reply to `listDataKeys`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataKeysResponse {
    pub keys: Vec<String>,
}
