//! Events sent from the backend worker to the render thread.

use client_core::LookupState;

pub enum UiEvent {
    Info(String),
    /// A state change published by the controller.
    State(LookupState),
    /// Explicit request to print the current view, even if unchanged.
    Redraw(LookupState),
    Error(String),
}
