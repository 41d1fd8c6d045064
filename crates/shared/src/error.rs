use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const INVALID_FORMAT_MESSAGE: &str = "Please enter a valid 6-digit pincode";
pub const NOT_FOUND_MESSAGE: &str = "No data found for the entered pincode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidFormat,
    LookupNotFound,
}

/// Every failure a lookup can surface to a user. Transport errors, malformed
/// payloads and explicit not-found statuses all collapse into `LookupNotFound`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("{}", INVALID_FORMAT_MESSAGE)]
    InvalidFormat,
    #[error("{}", NOT_FOUND_MESSAGE)]
    LookupNotFound,
}

impl LookupError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidFormat => ErrorCode::InvalidFormat,
            Self::LookupNotFound => ErrorCode::LookupNotFound,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidFormat => INVALID_FORMAT_MESSAGE,
            Self::LookupNotFound => NOT_FOUND_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl From<LookupError> for ApiError {
    fn from(value: LookupError) -> Self {
        Self {
            code: value.code(),
            message: value.message().to_string(),
        }
    }
}
