use serde::Serialize;

use crate::id::UserId;

/// Body of every response: `{message?, data?}`
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            message: None,
            data: Some(data),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Payload returned by `POST /api/users`
#[derive(Debug, Serialize)]
pub struct Created {
    pub uuid: UserId,
}
