//! Authentication and RBAC tests for the back-office API.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

#[path = "common/mod.rs"]
mod common;
use common::*;

#[tokio::test]
async fn admin_routes_require_a_token() {
    let state = create_test_app_state();

    for uri in [
        "/api/v1/donations",
        "/api/v1/users",
        "/api/v1/stats",
        "/api/v1/inquiries",
    ] {
        let response = app(state.clone())
            .oneshot(request("GET", uri, None, None))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{} without a token should be 401",
            uri
        );
    }
}

#[tokio::test]
async fn garbage_tokens_are_unauthorized() {
    let state = create_test_app_state();

    let response = app(state)
        .oneshot(request(
            "GET",
            "/api/v1/donations",
            Some("bf_notarealkey"),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn staff_are_forbidden_from_admin_routes() {
    let state = create_test_app_state();
    let (_staff, staff_key) = create_test_staff(&state);

    let response = app(state)
        .oneshot(request("GET", "/api/v1/donations", Some(&staff_key), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn rbac_runs_before_existence_checks() {
    let state = create_test_app_state();
    let (_staff, staff_key) = create_test_staff(&state);

    // The target does not exist. A staff key must still see 403, never 404,
    // so probing cannot reveal what exists.
    let response = app(state.clone())
        .oneshot(request(
            "GET",
            "/api/v1/users/00000000-0000-0000-0000-000000000000",
            Some(&staff_key),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The same probe with an admin key reaches the existence check
    let (_admin, admin_key) = create_test_admin(&state);
    let response = app(state)
        .oneshot(request(
            "GET",
            "/api/v1/users/00000000-0000-0000-0000-000000000000",
            Some(&admin_key),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deactivated_accounts_lose_access() {
    let state = create_test_app_state();
    let (admin, admin_key) = create_test_admin(&state);

    {
        let conn = state.db.get().unwrap();
        queries::update_user_role(
            &conn,
            &admin.id,
            &UpdateUserRole {
                role: None,
                is_active: Some(false),
            },
        )
        .unwrap();
    }

    let response = app(state)
        .oneshot(request("GET", "/api/v1/stats", Some(&admin_key), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn created_user_key_works_and_is_shown_once() {
    let state = create_test_app_state();
    let (_admin, admin_key) = create_test_admin(&state);

    let response = app(state.clone())
        .oneshot(request(
            "POST",
            "/api/v1/users",
            Some(&admin_key),
            Some(json!({
                "email": "second@briskfarm.local",
                "name": "Second Admin",
                "role": "admin",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;

    let new_key = body["api_key"].as_str().unwrap().to_string();
    assert!(new_key.starts_with("bf_"));
    // The stored hash never serializes
    assert!(body["user"].get("api_key_hash").is_none());
    assert!(body["user"]["api_key_prefix"]
        .as_str()
        .unwrap()
        .ends_with("..."));

    // The fresh key authenticates
    let response = app(state)
        .oneshot(request("GET", "/api/v1/stats", Some(&new_key), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let state = create_test_app_state();
    let (admin, admin_key) = create_test_admin(&state);

    let response = app(state)
        .oneshot(request(
            "POST",
            "/api/v1/users",
            Some(&admin_key),
            Some(json!({
                "email": admin.email,
                "name": "Duplicate",
                "role": "staff",
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_role_values_are_rejected_at_the_boundary() {
    let state = create_test_app_state();
    let (_admin, admin_key) = create_test_admin(&state);

    let response = app(state)
        .oneshot(request(
            "POST",
            "/api/v1/users",
            Some(&admin_key),
            Some(json!({
                "email": "x@briskfarm.local",
                "name": "X",
                "role": "superuser",
            })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn role_promotion_takes_effect_immediately() {
    let state = create_test_app_state();
    let (_admin, admin_key) = create_test_admin(&state);
    let (staff, staff_key) = create_test_staff(&state);

    // Staff is forbidden first
    let response = app(state.clone())
        .oneshot(request("GET", "/api/v1/stats", Some(&staff_key), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Admin promotes them
    let response = app(state.clone())
        .oneshot(request(
            "PATCH",
            &format!("/api/v1/users/{}/role", staff.id),
            Some(&admin_key),
            Some(json!({ "role": "admin" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["role"], "admin");

    // The same key now passes the role gate
    let response = app(state)
        .oneshot(request("GET", "/api/v1/stats", Some(&staff_key), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn public_routes_need_no_token() {
    let state = create_test_app_state();

    for uri in [
        "/api/v1/health",
        "/api/v1/services",
        "/api/v1/campaigns",
        "/api/v1/testimonials",
    ] {
        let response = app(state.clone())
            .oneshot(request("GET", uri, None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{} should be public", uri);
    }
}
