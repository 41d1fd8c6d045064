use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{Pincode, PostOffice},
    protocol::PincodeApiResponse,
};
use thiserror::Error;
use tracing::debug;
use url::Url;

pub mod controller;
pub use controller::{LookupOutcome, LookupPhase, LookupState, PincodeLookupController};

pub const DEFAULT_API_BASE_URL: &str = "https://api.postalpincode.in";

#[derive(Debug, Error)]
pub enum DirectoryConfigError {
    #[error("invalid pincode API base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("pincode API base url '{0}' cannot carry a path")]
    CannotBeABase(String),
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

/// Remote source of post-office records for a pincode.
///
/// Implementations report every kind of failure (transport, status, shape) as
/// an error; the controller decides how that surfaces to the user.
#[async_trait]
pub trait PincodeDirectory: Send + Sync {
    async fn post_offices(&self, pincode: &Pincode) -> Result<Vec<PostOffice>>;
}

/// `PincodeDirectory` backed by the postalpincode.in REST API.
pub struct HttpPincodeDirectory {
    http: Client,
    base_url: Url,
}

impl HttpPincodeDirectory {
    pub fn new(base_url: &str) -> Result<Self, DirectoryConfigError> {
        Self::with_timeout(base_url, None)
    }

    pub fn with_timeout(
        base_url: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, DirectoryConfigError> {
        let parsed = Url::parse(base_url).map_err(|source| DirectoryConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        if parsed.cannot_be_a_base() {
            return Err(DirectoryConfigError::CannotBeABase(base_url.to_string()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: parsed,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base_url}/pincode/{code}`, keeping any path prefix on the base url.
    pub fn endpoint(&self, pincode: &Pincode) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("pincode").push(pincode.as_str());
        }
        url
    }
}

#[async_trait]
impl PincodeDirectory for HttpPincodeDirectory {
    async fn post_offices(&self, pincode: &Pincode) -> Result<Vec<PostOffice>> {
        let url = self.endpoint(pincode);
        debug!(%pincode, %url, "requesting post offices");

        let body: Vec<PincodeApiResponse> = self
            .http
            .get(url)
            .send()
            .await
            .context("pincode API request failed")?
            .error_for_status()
            .context("pincode API returned an error status")?
            .json()
            .await
            .context("pincode API returned a malformed payload")?;

        let first = body
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("pincode API returned an empty array for {pincode}"))?;
        let status = first.status.clone();
        first
            .into_post_offices()
            .ok_or_else(|| anyhow!("pincode API reported status '{status}' for {pincode}"))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
