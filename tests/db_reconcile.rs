//! Query-level tests for the reconciliation compare-and-set and the
//! session-id correlation invariants.

use briskfarm::payments::{apply_webhook_event, WebhookEvent};
use serde_json::json;
use tower::ServiceExt;

#[path = "common/mod.rs"]
mod common;
use common::*;

/// Create a pending donation with a payment session directly through the
/// queries layer.
fn seed_donation(state: &AppState, amount: i64, campaign_id: Option<&str>) -> Donation {
    let conn = state.db.get().unwrap();
    let input = CreateDonation {
        amount,
        currency: "UGX".to_string(),
        donor_name: None,
        donor_email: None,
        donor_phone: None,
        is_anonymous: false,
        message: None,
        campaign_id: campaign_id.map(String::from),
        payment_method: None,
    };
    let donation =
        queries::create_donation(&conn, &input, PaymentMethod::Card, None, None).unwrap();
    let session_id = format!("dummy_card_session_{}", donation.id);
    queries::attach_payment_session(&conn, &donation.id, "dummy", &session_id, PaymentMethod::Card)
        .unwrap();
    queries::get_donation_by_id(&conn, &donation.id).unwrap().unwrap()
}

#[test]
fn compare_and_set_refuses_stale_expectations() {
    let state = create_test_app_state();
    let donation = seed_donation(&state, 10_000, None);

    let mut conn = state.db.get().unwrap();

    // First writer wins
    let applied = queries::reconcile_donation(
        &mut conn,
        &donation.id,
        DonationStatus::Pending,
        DonationStatus::Confirmed,
        "success",
    )
    .unwrap();
    assert!(applied);

    // A second writer still expecting `pending` loses
    let applied = queries::reconcile_donation(
        &mut conn,
        &donation.id,
        DonationStatus::Pending,
        DonationStatus::Failed,
        "failed",
    )
    .unwrap();
    assert!(!applied);

    let stored = queries::get_donation_by_id(&conn, &donation.id).unwrap().unwrap();
    assert_eq!(stored.status, DonationStatus::Confirmed);
    assert_eq!(stored.provider_status.as_deref(), Some("success"));
}

#[test]
fn campaign_total_moves_with_confirm_and_refund() {
    let state = create_test_app_state();
    let campaign = create_test_campaign(&state, "totals", CampaignStatus::Active);
    let donation = seed_donation(&state, 30_000, Some(&campaign.id));

    let mut conn = state.db.get().unwrap();

    queries::reconcile_donation(
        &mut conn,
        &donation.id,
        DonationStatus::Pending,
        DonationStatus::Confirmed,
        "paid",
    )
    .unwrap();
    let fetched = queries::get_campaign_by_id(&conn, &campaign.id).unwrap().unwrap();
    assert_eq!(fetched.raised_amount, 30_000);

    queries::reconcile_donation(
        &mut conn,
        &donation.id,
        DonationStatus::Confirmed,
        DonationStatus::Refunded,
        "refunded",
    )
    .unwrap();
    let fetched = queries::get_campaign_by_id(&conn, &campaign.id).unwrap().unwrap();
    assert_eq!(fetched.raised_amount, 0);
}

#[test]
fn general_fund_donations_reconcile_without_a_campaign() {
    let state = create_test_app_state();
    let donation = seed_donation(&state, 5000, None);

    let mut conn = state.db.get().unwrap();
    let applied = queries::reconcile_donation(
        &mut conn,
        &donation.id,
        DonationStatus::Pending,
        DonationStatus::Confirmed,
        "completed",
    )
    .unwrap();
    assert!(applied);
}

#[test]
fn only_a_real_transition_is_reported_as_one() {
    let state = create_test_app_state();
    let donation = seed_donation(&state, 9000, None);
    let session_id = donation.provider_session_id.clone().unwrap();

    let mut conn = state.db.get().unwrap();
    let event = WebhookEvent {
        session_id,
        status: "success".to_string(),
        provider: None,
        event_type: None,
        amount: None,
        currency: None,
        payment_method: None,
    };

    // First delivery performs the pending -> confirmed transition
    let first = apply_webhook_event(&mut conn, &event).unwrap();
    assert!(first.transitioned);
    assert_eq!(first.status, DonationStatus::Confirmed);

    // A provider retry of the same event is not a transition
    let replay = apply_webhook_event(&mut conn, &event).unwrap();
    assert!(!replay.transitioned);
    assert_eq!(replay.status, DonationStatus::Confirmed);

    // Neither is an unrecognized status arriving after settlement
    let late = WebhookEvent {
        status: "processing".to_string(),
        ..event
    };
    let outcome = apply_webhook_event(&mut conn, &late).unwrap();
    assert!(!outcome.transitioned);
    assert_eq!(outcome.status, DonationStatus::Confirmed);
    assert_eq!(outcome.donation.provider_status.as_deref(), Some("processing"));
}

#[test]
fn session_id_lookup_finds_exactly_the_right_donation() {
    let state = create_test_app_state();
    let first = seed_donation(&state, 1000, None);
    let second = seed_donation(&state, 2000, None);

    let conn = state.db.get().unwrap();
    let found = queries::get_donation_by_session_id(
        &conn,
        first.provider_session_id.as_deref().unwrap(),
    )
    .unwrap()
    .unwrap();
    assert_eq!(found.id, first.id);
    assert_ne!(found.id, second.id);

    assert!(queries::get_donation_by_session_id(&conn, "no_such_session")
        .unwrap()
        .is_none());
}

#[test]
fn provider_session_ids_are_unique_at_the_storage_layer() {
    let state = create_test_app_state();
    let first = seed_donation(&state, 1000, None);
    let second = seed_donation(&state, 2000, None);

    let conn = state.db.get().unwrap();
    let result = queries::attach_payment_session(
        &conn,
        &second.id,
        "dummy",
        first.provider_session_id.as_deref().unwrap(),
        PaymentMethod::Card,
    );

    assert!(result.is_err(), "duplicate session id must violate the unique index");
}

#[test]
fn archived_campaign_detaches_nothing_but_deleting_does() {
    let state = create_test_app_state();
    let campaign = create_test_campaign(&state, "detach", CampaignStatus::Active);
    let donation = seed_donation(&state, 1000, Some(&campaign.id));

    let conn = state.db.get().unwrap();

    // Archiving keeps the relation
    queries::archive_campaign(&conn, &campaign.id).unwrap();
    let stored = queries::get_donation_by_id(&conn, &donation.id).unwrap().unwrap();
    assert_eq!(stored.campaign_id.as_deref(), Some(campaign.id.as_str()));

    // A raw row delete nullifies instead of cascading
    conn.execute("DELETE FROM campaigns WHERE id = ?1", [&campaign.id])
        .unwrap();
    let stored = queries::get_donation_by_id(&conn, &donation.id).unwrap().unwrap();
    assert!(stored.campaign_id.is_none());
}

#[tokio::test]
async fn concurrent_style_double_delivery_applies_once() {
    let state = create_test_app_state();
    let campaign = create_test_campaign(&state, "double", CampaignStatus::Active);
    let donation = seed_donation(&state, 7000, Some(&campaign.id));
    let session_id = donation.provider_session_id.clone().unwrap();

    // Two identical deliveries back to back; the handler path resolves both,
    // the campaign total counts the donation once.
    for _ in 0..2 {
        let body =
            serde_json::to_vec(&json!({ "session_id": session_id, "status": "success" })).unwrap();
        let signature = sign_payload(TEST_WEBHOOK_SECRET, &body);
        let response = app(state.clone())
            .oneshot(webhook_request(
                "/api/v1/donations/webhook",
                body,
                Some(&signature),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }

    let conn = state.db.get().unwrap();
    let fetched = queries::get_campaign_by_id(&conn, &campaign.id).unwrap().unwrap();
    assert_eq!(fetched.raised_amount, 7000);
}
