use super::*;

use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use client_core::{PincodeDirectory, PincodeLookupController};
use shared::domain::Pincode;

struct FixedDirectory(Option<Vec<PostOffice>>);

#[async_trait]
impl PincodeDirectory for FixedDirectory {
    async fn post_offices(&self, pincode: &Pincode) -> anyhow::Result<Vec<PostOffice>> {
        self.0
            .clone()
            .ok_or_else(|| anyhow!("status 404 for {pincode}"))
    }
}

fn office(name: &str, branch_type: &str) -> PostOffice {
    PostOffice {
        name: name.to_string(),
        branch_type: branch_type.to_string(),
        delivery_status: "Delivery".to_string(),
        district: "Bangalore".to_string(),
        division: "Bangalore GPO".to_string(),
    }
}

fn controller(offices: Option<Vec<PostOffice>>) -> PincodeLookupController {
    PincodeLookupController::new(Arc::new(FixedDirectory(offices)))
}

#[test]
fn card_lists_all_five_fields() {
    let card = render_card(&office("Museum Road", "Sub Post Office"));
    assert_eq!(
        card,
        "Name: Museum Road\nBranch Type: Sub Post Office\nDelivery Status: Delivery\nDistrict: Bangalore\nDivision: Bangalore GPO\n"
    );
}

#[test]
fn idle_state_renders_nothing() {
    assert_eq!(render_state(&controller(None).snapshot()), None);
}

#[tokio::test]
async fn success_renders_count_and_cards() {
    let controller = controller(Some(vec![
        office("Bangalore GPO", "Head Post Office"),
        office("Museum Road", "Sub Post Office"),
    ]));
    controller.submit("560001").await;

    let text = render_state(&controller.snapshot()).expect("rendered");
    assert!(text.starts_with("Pincode: 560001\nMessage: Number of pincode(s) found: 2\n"));
    assert!(text.contains("Name: Bangalore GPO"));
    assert!(text.contains("Name: Museum Road"));
    assert!(!text.contains("Filter:"));
}

#[tokio::test]
async fn filtered_view_counts_visible_matches() {
    let controller = controller(Some(vec![
        office("Bangalore GPO", "Head Post Office"),
        office("Museum Road", "Sub Post Office"),
    ]));
    controller.submit("560001").await;
    controller.set_filter("museum");

    let text = render_state(&controller.snapshot()).expect("rendered");
    assert!(text.contains("Message: Number of pincode(s) found: 1\n"));
    assert!(text.contains("Filter: \"museum\" (1 of 2)"));
    assert!(!text.contains("Name: Bangalore GPO"));
}

#[tokio::test]
async fn errors_render_their_message_only() {
    let controller = controller(None);

    controller.submit("56000").await;
    assert_eq!(
        render_state(&controller.snapshot()).as_deref(),
        Some("Please enter a valid 6-digit pincode")
    );

    controller.submit("000000").await;
    assert_eq!(
        render_state(&controller.snapshot()).as_deref(),
        Some("No data found for the entered pincode")
    );
}

#[tokio::test]
async fn json_view_uses_api_field_names() {
    let controller = controller(Some(vec![office("Museum Road", "Sub Post Office")]));
    controller.submit("560001").await;

    let json = render_json(&controller.snapshot()).expect("json");
    let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
    assert_eq!(value[0]["Name"], "Museum Road");
    assert_eq!(value[0]["BranchType"], "Sub Post Office");
}
