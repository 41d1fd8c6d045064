//! Text and JSON views of the lookup state.

use std::fmt::Write as _;

use client_core::{LookupPhase, LookupState};
use shared::domain::PostOffice;

pub const LOADING_INDICATOR: &str = "Loading...";

/// Text for the current state, or `None` when there is nothing to show yet.
/// While a lookup is in flight only the loading indicator is rendered.
pub fn render_state(state: &LookupState) -> Option<String> {
    if state.is_loading() {
        return Some(LOADING_INDICATOR.to_string());
    }
    if let Some(message) = state.error_message() {
        return Some(message.to_string());
    }
    match state.phase() {
        LookupPhase::Succeeded => Some(render_results(state)),
        _ => None,
    }
}

pub fn render_results(state: &LookupState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Pincode: {}", state.pincode());
    let _ = writeln!(
        out,
        "Message: Number of pincode(s) found: {}",
        state.match_count()
    );
    if !state.filter_text().is_empty() {
        let _ = writeln!(
            out,
            "Filter: \"{}\" ({} of {})",
            state.filter_text(),
            state.match_count(),
            state.results().len()
        );
    }
    for office in state.visible() {
        out.push('\n');
        out.push_str(&render_card(office));
    }
    out
}

pub fn render_card(office: &PostOffice) -> String {
    format!(
        "Name: {}\nBranch Type: {}\nDelivery Status: {}\nDistrict: {}\nDivision: {}\n",
        office.name, office.branch_type, office.delivery_status, office.district, office.division
    )
}

pub fn render_json(state: &LookupState) -> serde_json::Result<String> {
    serde_json::to_string_pretty(state.visible())
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
