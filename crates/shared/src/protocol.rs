use serde::{Deserialize, Serialize};

use crate::{domain::PostOffice, error::NOT_FOUND_MESSAGE};

pub const STATUS_SUCCESS: &str = "Success";

/// One element of the array returned by `GET /pincode/{code}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PincodeApiResponse {
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
    #[serde(rename = "PostOffice", default)]
    pub post_office: Option<Vec<PostOffice>>,
}

impl PincodeApiResponse {
    /// Returns the post offices when the remote reported success, `None` for
    /// any error status or missing list.
    pub fn into_post_offices(self) -> Option<Vec<PostOffice>> {
        if self.status != STATUS_SUCCESS {
            return None;
        }
        self.post_office
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum LookupResult {
    NotFound { message: String },
    Found(Vec<PostOffice>),
}

impl LookupResult {
    pub fn not_found() -> Self {
        Self::NotFound {
            message: NOT_FOUND_MESSAGE.to_string(),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}
