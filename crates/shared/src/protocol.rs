use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ACTIVITIES_SEGMENT: &str = "activities";
pub const SIGNUP_SEGMENT: &str = "signup";
pub const UNREGISTER_SEGMENT: &str = "unregister";
pub const EMAIL_QUERY_KEY: &str = "email";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    Signup,
    Unregister,
}

impl MutationKind {
    pub fn path_segment(self) -> &'static str {
        match self {
            MutationKind::Signup => SIGNUP_SEGMENT,
            MutationKind::Unregister => UNREGISTER_SEGMENT,
        }
    }
}

/// Success body of a mutation endpoint: `{"message": "..."}`.
///
/// The field is kept as raw JSON so that an unexpected shape degrades to
/// "no message" instead of a decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(Value::String(message.into())),
        }
    }

    pub fn from_slice_lenient(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }

    pub fn message(&self) -> Option<&str> {
        non_empty_str(self.message.as_ref())
    }
}

pub(crate) fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
}
