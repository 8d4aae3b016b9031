use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Payload returned by every book action: a short message the caller shows
/// to the user. `sticky = false` means the UI may dismiss it on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub sticky: bool,
}

impl Notification {
    pub fn transient(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            sticky: false,
        }
    }
}
