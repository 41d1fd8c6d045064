//! Backend commands queued from the session to the backend worker.

#[derive(Debug, PartialEq, Eq)]
pub enum BackendCommand {
    Lookup { input: String },
    SetFilter { text: String },
    Show,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Lookup { .. } => "lookup",
            Self::SetFilter { .. } => "set_filter",
            Self::Show => "show",
        }
    }
}
