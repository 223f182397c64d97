//! End-to-end webhook tests: signature verification, reconciliation, status
//! transitions, and campaign total maintenance.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

#[path = "common/mod.rs"]
mod common;
use common::*;

/// Create a donation intent over the API, returning (donation_id, session_id).
async fn create_intent(
    state: &AppState,
    amount: i64,
    campaign_id: Option<&str>,
    payment_method: &str,
) -> (String, String) {
    let mut payload = json!({
        "amount": amount,
        "currency": "UGX",
        "payment_method": payment_method,
        "donor_email": "donor@example.com",
    });
    if let Some(campaign_id) = campaign_id {
        payload["campaign_id"] = json!(campaign_id);
    }

    let response = app(state.clone())
        .oneshot(request("POST", "/api/v1/donations", None, Some(payload)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;

    (
        body["donation"]["id"].as_str().unwrap().to_string(),
        body["provider_session_id"].as_str().unwrap().to_string(),
    )
}

/// Deliver a signed webhook event and return the response.
async fn deliver(
    state: &AppState,
    session_id: &str,
    status: &str,
) -> axum::http::Response<axum::body::Body> {
    let body = serde_json::to_vec(&json!({
        "provider": "dummy",
        "event_type": format!("payment.{}", status),
        "session_id": session_id,
        "status": status,
    }))
    .unwrap();
    let signature = sign_payload(TEST_WEBHOOK_SECRET, &body);

    app(state.clone())
        .oneshot(webhook_request(
            "/api/v1/donations/webhook",
            body,
            Some(&signature),
        ))
        .await
        .unwrap()
}

fn donation_status(state: &AppState, id: &str) -> (DonationStatus, Option<String>) {
    let conn = state.db.get().unwrap();
    let donation = queries::get_donation_by_id(&conn, id).unwrap().unwrap();
    (donation.status, donation.provider_status)
}

#[tokio::test]
async fn success_webhook_confirms_donation_end_to_end() {
    let state = create_test_app_state();
    let (_admin, admin_key) = create_test_admin(&state);
    let campaign = create_test_campaign(&state, "test-x", CampaignStatus::Active);

    let (donation_id, session_id) =
        create_intent(&state, 100_000, Some(&campaign.id), "mtn_momo").await;
    assert_eq!(session_id, format!("dummy_mtn_momo_session_{}", donation_id));

    let response = deliver(&state, &session_id, "success").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["donation_id"], donation_id.as_str());
    assert_eq!(body["status"], "confirmed");

    // Admin fetch reflects the mapped status and the raw provider string
    let response = app(state.clone())
        .oneshot(request(
            "GET",
            &format!("/api/v1/donations/{}", donation_id),
            Some(&admin_key),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["status"], "confirmed");
    assert_eq!(fetched["provider_status"], "success");

    // Confirmation adds the amount to the campaign total
    let conn = state.db.get().unwrap();
    let campaign = queries::get_campaign_by_id(&conn, &campaign.id)
        .unwrap()
        .unwrap();
    assert_eq!(campaign.raised_amount, 100_000);
}

#[tokio::test]
async fn invalid_signature_leaves_donation_pending() {
    let state = create_test_app_state();
    let (donation_id, session_id) = create_intent(&state, 50_000, None, "card").await;

    let body = serde_json::to_vec(&json!({ "session_id": session_id, "status": "success" })).unwrap();
    let bad_signature = sign_payload("wrong-secret", &body);

    let response = app(state.clone())
        .oneshot(webhook_request(
            "/api/v1/donations/webhook",
            body,
            Some(&bad_signature),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(donation_status(&state, &donation_id).0, DonationStatus::Pending);
}

#[tokio::test]
async fn tampered_body_fails_verification() {
    let state = create_test_app_state();
    let (donation_id, session_id) = create_intent(&state, 50_000, None, "card").await;

    let original = serde_json::to_vec(&json!({ "session_id": session_id, "status": "failed" })).unwrap();
    let signature = sign_payload(TEST_WEBHOOK_SECRET, &original);

    // Same signature, different bytes
    let tampered =
        serde_json::to_vec(&json!({ "session_id": session_id, "status": "success" })).unwrap();

    let response = app(state.clone())
        .oneshot(webhook_request(
            "/api/v1/donations/webhook",
            tampered,
            Some(&signature),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(donation_status(&state, &donation_id).0, DonationStatus::Pending);
}

#[tokio::test]
async fn missing_signature_header_is_rejected() {
    let state = create_test_app_state();
    let (_donation_id, session_id) = create_intent(&state, 1000, None, "card").await;

    let body = serde_json::to_vec(&json!({ "session_id": session_id, "status": "success" })).unwrap();

    let response = app(state.clone())
        .oneshot(webhook_request("/api/v1/donations/webhook", body, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unconfigured_secret_rejects_all_webhooks() {
    let state = create_test_app_state_with_secret(None);
    let (_donation_id, session_id) = create_intent(&state, 1000, None, "card").await;

    let body = serde_json::to_vec(&json!({ "session_id": session_id, "status": "success" })).unwrap();
    let signature = sign_payload(TEST_WEBHOOK_SECRET, &body);

    let response = app(state.clone())
        .oneshot(webhook_request(
            "/api/v1/donations/webhook",
            body,
            Some(&signature),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_and_incomplete_payloads_are_rejected() {
    let state = create_test_app_state();

    for raw in [
        br#"not json at all"#.to_vec(),
        serde_json::to_vec(&json!({ "status": "success" })).unwrap(),
        serde_json::to_vec(&json!({ "session_id": "s1" })).unwrap(),
    ] {
        let signature = sign_payload(TEST_WEBHOOK_SECRET, &raw);
        let response = app(state.clone())
            .oneshot(webhook_request(
                "/api/v1/donations/webhook",
                raw,
                Some(&signature),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn unknown_session_id_is_a_client_error() {
    let state = create_test_app_state();

    let body = serde_json::to_vec(&json!({
        "session_id": "dummy_card_session_nonexistent",
        "status": "success",
    }))
    .unwrap();
    let signature = sign_payload(TEST_WEBHOOK_SECRET, &body);

    let response = app(state.clone())
        .oneshot(webhook_request(
            "/api/v1/donations/webhook",
            body,
            Some(&signature),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn replayed_confirmation_is_idempotent() {
    let state = create_test_app_state();
    let campaign = create_test_campaign(&state, "replay", CampaignStatus::Active);
    let (donation_id, session_id) =
        create_intent(&state, 25_000, Some(&campaign.id), "card").await;

    for _ in 0..2 {
        let response = deliver(&state, &session_id, "success").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "confirmed");
    }

    assert_eq!(
        donation_status(&state, &donation_id).0,
        DonationStatus::Confirmed
    );

    // The campaign total must count the donation exactly once
    let conn = state.db.get().unwrap();
    let campaign = queries::get_campaign_by_id(&conn, &campaign.id)
        .unwrap()
        .unwrap();
    assert_eq!(campaign.raised_amount, 25_000);
}

#[tokio::test]
async fn refund_after_confirmation_reverses_campaign_total() {
    let state = create_test_app_state();
    let campaign = create_test_campaign(&state, "refund", CampaignStatus::Active);
    let (donation_id, session_id) =
        create_intent(&state, 40_000, Some(&campaign.id), "card").await;

    deliver(&state, &session_id, "success").await;
    let response = deliver(&state, &session_id, "refunded").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "refunded");

    let (status, provider_status) = donation_status(&state, &donation_id);
    assert_eq!(status, DonationStatus::Refunded);
    assert_eq!(provider_status.as_deref(), Some("refunded"));

    let conn = state.db.get().unwrap();
    let campaign = queries::get_campaign_by_id(&conn, &campaign.id)
        .unwrap()
        .unwrap();
    assert_eq!(campaign.raised_amount, 0);
}

#[tokio::test]
async fn refund_before_confirmation_never_touches_campaign_total() {
    let state = create_test_app_state();
    let campaign = create_test_campaign(&state, "early-refund", CampaignStatus::Active);
    let (donation_id, session_id) =
        create_intent(&state, 15_000, Some(&campaign.id), "card").await;

    let response = deliver(&state, &session_id, "charge_refunded").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        donation_status(&state, &donation_id).0,
        DonationStatus::Refunded
    );

    let conn = state.db.get().unwrap();
    let campaign = queries::get_campaign_by_id(&conn, &campaign.id)
        .unwrap()
        .unwrap();
    assert_eq!(campaign.raised_amount, 0);
}

#[tokio::test]
async fn failure_event_after_confirmation_is_a_noop() {
    let state = create_test_app_state();
    let (donation_id, session_id) = create_intent(&state, 5000, None, "card").await;

    deliver(&state, &session_id, "success").await;
    let response = deliver(&state, &session_id, "declined").await;

    // The webhook contract only speaks 200/400; an out-of-order event for a
    // settled donation acks without moving money state backwards.
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "confirmed");

    let (status, provider_status) = donation_status(&state, &donation_id);
    assert_eq!(status, DonationStatus::Confirmed);
    assert_eq!(provider_status.as_deref(), Some("declined"));
}

#[tokio::test]
async fn unrecognized_provider_status_is_a_noop() {
    let state = create_test_app_state();
    let (donation_id, session_id) = create_intent(&state, 5000, None, "card").await;

    // On a pending donation: stays pending, raw string recorded
    let response = deliver(&state, &session_id, "processing").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "pending");
    let (status, provider_status) = donation_status(&state, &donation_id);
    assert_eq!(status, DonationStatus::Pending);
    assert_eq!(provider_status.as_deref(), Some("processing"));

    // On a confirmed donation: must not drag money state backwards
    deliver(&state, &session_id, "success").await;
    let response = deliver(&state, &session_id, "mystery_state").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "confirmed");
    let (status, provider_status) = donation_status(&state, &donation_id);
    assert_eq!(status, DonationStatus::Confirmed);
    assert_eq!(provider_status.as_deref(), Some("mystery_state"));
}

#[tokio::test]
async fn failed_then_success_does_not_resurrect_donation() {
    let state = create_test_app_state();
    let (donation_id, session_id) = create_intent(&state, 5000, None, "card").await;

    deliver(&state, &session_id, "declined").await;
    assert_eq!(
        donation_status(&state, &donation_id).0,
        DonationStatus::Failed
    );

    let response = deliver(&state, &session_id, "success").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "failed");
    assert_eq!(
        donation_status(&state, &donation_id).0,
        DonationStatus::Failed
    );
}
