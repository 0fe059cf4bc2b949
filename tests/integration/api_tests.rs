//! API integration tests
//!
//! These run against a live instance with its database migrated and the
//! sibling user/document services (or fakes) reachable at the configured
//! URLs. The fixtures assume user 1 is a member, document 1 is digital,
//! document 2 is a checked-out physical copy, and document 3 is a physical
//! copy sitting on the shelf.

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8003";

async fn post_json(client: &Client, path: &str, body: Value) -> (u16, Value) {
    let response = client
        .post(format!("{}{}", BASE_URL, path))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");

    let status = response.status().as_u16();
    let body = response.json().await.unwrap_or(Value::Null);
    (status, body)
}

async fn post_empty(client: &Client, path: &str) -> (u16, Value) {
    let response = client
        .post(format!("{}{}", BASE_URL, path))
        .send()
        .await
        .expect("Failed to send request");

    let status = response.status().as_u16();
    let body = response.json().await.unwrap_or(Value::Null);
    (status, body)
}

async fn get_json(client: &Client, path: &str) -> (u16, Value) {
    let response = client
        .get(format!("{}{}", BASE_URL, path))
        .send()
        .await
        .expect("Failed to send request");

    let status = response.status().as_u16();
    let body = response.json().await.unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let (status, body) = get_json(&client, "/api/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_borrow_return_borrow_cycle() {
    let client = Client::new();
    let request = json!({"user_id": 1, "document_id": 1});

    // Borrow: active loan, due 14 days out
    let (status, loan) = post_json(&client, "/api/loans/digital", request.clone()).await;
    assert_eq!(status, 201);
    assert_eq!(loan["status"], "active");
    let loan_id = loan["id"].as_i64().expect("loan id");

    // Borrowing the same document again conflicts
    let (status, body) = post_json(&client, "/api/loans/digital", request.clone()).await;
    assert_eq!(status, 409);
    assert_eq!(body["error"], "conflict");

    // Return it
    let (status, returned) = post_empty(&client, &format!("/api/loans/{}/return", loan_id)).await;
    assert_eq!(status, 200);
    assert_eq!(returned["status"], "returned");

    // Returning twice is an invalid state, not a silent overwrite
    let (status, body) = post_empty(&client, &format!("/api/loans/{}/return", loan_id)).await;
    assert_eq!(status, 409);
    assert_eq!(body["error"], "invalid_state");

    // A fresh borrow succeeds with a new loan id
    let (status, second) = post_json(&client, "/api/loans/digital", request).await;
    assert_eq!(status, 201);
    assert_ne!(second["id"], loan_id);

    // Clean up for re-runs
    let second_id = second["id"].as_i64().unwrap();
    post_empty(&client, &format!("/api/loans/{}/return", second_id)).await;
}

#[tokio::test]
#[ignore]
async fn test_access_on_active_loan() {
    let client = Client::new();

    let (status, loan) =
        post_json(&client, "/api/loans/digital", json!({"user_id": 1, "document_id": 1})).await;
    assert_eq!(status, 201);
    let loan_id = loan["id"].as_i64().unwrap();

    let (status, access) = get_json(&client, &format!("/api/loans/{}/access", loan_id)).await;
    assert_eq!(status, 200);
    assert_eq!(access["granted"], true);
    assert!(access["file_path"].is_string());

    // After a return, access is denied but the check stays answerable
    post_empty(&client, &format!("/api/loans/{}/return", loan_id)).await;
    let (status, access) = get_json(&client, &format!("/api/loans/{}/access", loan_id)).await;
    assert_eq!(status, 403);
    assert_eq!(access["granted"], false);

    // Denial is idempotent: asking again is still a plain 403
    let (status, _) = get_json(&client, &format!("/api/loans/{}/access", loan_id)).await;
    assert_eq!(status, 403);
}

#[tokio::test]
#[ignore]
async fn test_reserve_requires_checked_out_copy() {
    let client = Client::new();

    // Document 3 is physical but available on the shelf
    let (status, body) =
        post_json(&client, "/api/reservations/physical", json!({"user_id": 1, "document_id": 3})).await;
    assert_eq!(status, 422);
    assert_eq!(body["error"], "validation_failed");

    // Document 1 is digital-only
    let (status, body) =
        post_json(&client, "/api/reservations/physical", json!({"user_id": 1, "document_id": 1})).await;
    assert_eq!(status, 422);
    assert_eq!(body["error"], "validation_failed");
}

#[tokio::test]
#[ignore]
async fn test_reservation_lifecycle_and_sync() {
    let client = Client::new();
    let request = json!({"user_id": 1, "document_id": 2});

    let (status, reservation) =
        post_json(&client, "/api/reservations/physical", request.clone()).await;
    assert_eq!(status, 201);
    assert_eq!(reservation["status"], "active");

    // A second active reservation for the same pair conflicts
    let (status, body) = post_json(&client, "/api/reservations/physical", request).await;
    assert_eq!(status, 409);
    assert_eq!(body["error"], "conflict");

    // The copy comes back to the shelf: every active hold is cancelled
    let (status, sync) =
        post_empty(&client, "/api/reservations/documents/2/sync").await;
    assert_eq!(status, 200);
    assert_eq!(sync["cancelled"], 1);

    // Second sync finds nothing active
    let (status, sync) =
        post_empty(&client, "/api/reservations/documents/2/sync").await;
    assert_eq!(status, 200);
    assert_eq!(sync["cancelled"], 0);

    // Cancelling the already-cancelled reservation is an invalid state
    let reservation_id = reservation["id"].as_i64().unwrap();
    let (status, body) =
        post_empty(&client, &format!("/api/reservations/{}/cancel", reservation_id)).await;
    assert_eq!(status, 409);
    assert_eq!(body["error"], "invalid_state");
}

#[tokio::test]
#[ignore]
async fn test_counts_and_user_listings() {
    let client = Client::new();

    let (status, count) = get_json(&client, "/api/loans/count").await;
    assert_eq!(status, 200);
    assert!(count["count"].is_number());

    let (status, count) = get_json(&client, "/api/reservations/count?status=cancelled").await;
    assert_eq!(status, 200);
    assert!(count["count"].is_number());

    let (status, loans) = get_json(&client, "/api/users/1/loans").await;
    assert_eq!(status, 200);
    assert!(loans.is_array());

    let (status, check) = get_json(&client, "/api/users/1/loans/check?document_id=1").await;
    assert_eq!(status, 200);
    assert!(check["has_active_loan"].is_boolean());
}

#[tokio::test]
#[ignore]
async fn test_top_borrowed_limit_bounds() {
    let client = Client::new();

    let (status, entries) = get_json(&client, "/api/loans/top_digital").await;
    assert_eq!(status, 200);
    assert!(entries.is_array());

    let (status, _) = get_json(&client, "/api/loans/top_digital?limit=0").await;
    assert_eq!(status, 400);

    let (status, _) = get_json(&client, "/api/loans/top_digital?limit=21").await;
    assert_eq!(status, 400);
}
