use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::protocol::non_empty_str;

/// Failure body of a mutation endpoint: `{"detail": "..."}`.
///
/// Validation failures from the service may carry a list here; anything that
/// is not a non-empty string is treated as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(Value::String(detail.into())),
        }
    }

    pub fn from_slice_lenient(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }

    pub fn detail(&self) -> Option<&str> {
        non_empty_str(self.detail.as_ref())
    }
}
