use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ChatError;

// `message` stays untyped so a non-string value is reported as invalid input
// rather than as a deserialization failure
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<Value>,
}

impl ChatRequest {
    pub fn from_slice(body: &[u8]) -> Result<Self, ChatError> {
        let value: Value = serde_json::from_slice(body).map_err(|_| ChatError::InvalidInput)?;
        if !value.is_object() {
            return Err(ChatError::InvalidInput);
        }
        serde_json::from_value(value).map_err(|_| ChatError::InvalidInput)
    }

    /// The trimmed message text, or the validation failure that applies.
    pub fn trimmed_message(&self) -> Result<&str, ChatError> {
        let message = match &self.message {
            Some(Value::String(s)) if !s.is_empty() => s,
            _ => return Err(ChatError::InvalidInput),
        };

        match message.trim() {
            "" => Err(ChatError::EmptyInput),
            trimmed => Ok(trimmed),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
