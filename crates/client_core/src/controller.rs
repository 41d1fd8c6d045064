//! Pincode lookup controller: validation, the remote lookup, and the filtered
//! view derived from the last successful result.

use std::sync::Arc;

use shared::{
    domain::{Pincode, PostOffice},
    error::LookupError,
    protocol::LookupResult,
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::PincodeDirectory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupPhase {
    #[default]
    Idle,
    Validating,
    Rejected,
    Loading,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Rejected(LookupError),
    Succeeded(Vec<PostOffice>),
    Failed(LookupError),
}

/// Observable controller state.
///
/// `visible` is always the subsequence of `results` whose name contains
/// `filter_text`, ignoring case. It is rebuilt from those two fields on every
/// write to either of them and is never narrowed in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupState {
    pincode: String,
    filter_text: String,
    results: Vec<PostOffice>,
    visible: Vec<PostOffice>,
    is_loading: bool,
    error_message: Option<String>,
    phase: LookupPhase,
    request_seq: u64,
}

impl LookupState {
    pub fn pincode(&self) -> &str {
        &self.pincode
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn results(&self) -> &[PostOffice] {
        &self.results
    }

    pub fn visible(&self) -> &[PostOffice] {
        &self.visible
    }

    pub fn match_count(&self) -> usize {
        self.visible.len()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn phase(&self) -> LookupPhase {
        self.phase
    }

    fn recompute_visible(&mut self) {
        let needle = self.filter_text.to_lowercase();
        self.visible = self
            .results
            .iter()
            .filter(|office| office.name_matches(&needle))
            .cloned()
            .collect();
    }
}

pub struct PincodeLookupController {
    directory: Arc<dyn PincodeDirectory>,
    state: watch::Sender<LookupState>,
}

impl PincodeLookupController {
    pub fn new(directory: Arc<dyn PincodeDirectory>) -> Self {
        let (state, _) = watch::channel(LookupState::default());
        Self { directory, state }
    }

    pub fn validate(input: &str) -> Result<Pincode, LookupError> {
        Pincode::parse(input)
    }

    pub fn snapshot(&self) -> LookupState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LookupState> {
        self.state.subscribe()
    }

    /// Validates `input` and, when it is a pincode, looks it up. Rejected
    /// input never reaches the directory.
    pub async fn submit(&self, input: &str) -> LookupOutcome {
        let seq = self.begin_request(input);

        let pincode = match Self::validate(input) {
            Ok(pincode) => pincode,
            Err(err) => {
                debug!(input, "rejected pincode input");
                self.state.send_if_modified(|state| {
                    if state.request_seq != seq {
                        return false;
                    }
                    state.phase = LookupPhase::Rejected;
                    state.error_message = Some(err.message().to_string());
                    true
                });
                return LookupOutcome::Rejected(err);
            }
        };

        match self.run_lookup(seq, &pincode).await {
            LookupResult::Found(offices) => LookupOutcome::Succeeded(offices),
            LookupResult::NotFound { .. } => LookupOutcome::Failed(LookupError::LookupNotFound),
        }
    }

    /// Looks up an already validated pincode. Every directory failure becomes
    /// `LookupResult::NotFound`.
    pub async fn lookup(&self, pincode: &Pincode) -> LookupResult {
        let seq = self.begin_request(pincode.as_str());
        self.run_lookup(seq, pincode).await
    }

    /// Replaces the filter text and rebuilds the visible list from the full
    /// result set. Does not wait for an in-flight lookup.
    pub fn set_filter(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.send_if_modified(|state| {
            if state.filter_text == text {
                return false;
            }
            state.filter_text = text;
            state.recompute_visible();
            true
        });
    }

    fn begin_request(&self, input: &str) -> u64 {
        let mut seq = 0;
        self.state.send_modify(|state| {
            state.request_seq += 1;
            seq = state.request_seq;
            state.pincode = input.to_string();
            state.phase = LookupPhase::Validating;
            state.is_loading = false;
        });
        seq
    }

    async fn run_lookup(&self, seq: u64, pincode: &Pincode) -> LookupResult {
        self.state.send_if_modified(|state| {
            if state.request_seq != seq {
                return false;
            }
            state.phase = LookupPhase::Loading;
            state.is_loading = true;
            state.error_message = None;
            true
        });

        let result = match self.directory.post_offices(pincode).await {
            Ok(offices) => {
                info!(%pincode, count = offices.len(), "pincode lookup succeeded");
                LookupResult::Found(offices)
            }
            Err(err) => {
                warn!(%pincode, error = %format!("{err:#}"), "pincode lookup failed");
                LookupResult::not_found()
            }
        };

        let applied = self.state.send_if_modified(|state| {
            if state.request_seq != seq {
                return false;
            }
            state.is_loading = false;
            match &result {
                LookupResult::Found(offices) => {
                    state.results = offices.clone();
                    state.error_message = None;
                    state.phase = LookupPhase::Succeeded;
                }
                LookupResult::NotFound { message } => {
                    state.results.clear();
                    state.error_message = Some(message.clone());
                    state.phase = LookupPhase::Failed;
                }
            }
            state.recompute_visible();
            true
        });
        if !applied {
            debug!(%pincode, "discarding response from superseded lookup");
        }

        result
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
