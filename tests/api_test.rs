mod common;

use axum::http::StatusCode;
use common::*;
use poolscope::api;
use poolscope::db::init_db;
use poolscope::{Projector, Repository};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

struct TestApp {
    app: axum::Router,
    _temp: TempDir,
}

async fn setup_test_app() -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();
    let pool = init_db(&db_path).await.expect("init_db failed");
    let repo = Arc::new(Repository::new(pool));

    let projector = Projector::new(repo.clone());
    for event in [
        pool_created(FACTORY, POOL, 100, 0, 1_700_000_000),
        supply_liquidity(POOL, USER, 250, 101, 0),
        borrow(POOL, USER, 90, 102, 3),
        supply_liquidity(POOL, 0x34, 10, 103, 0),
    ] {
        projector.project(&event).await.unwrap();
    }

    let app = api::create_router(api::AppState::new(repo));
    TestApp {
        app,
        _temp: temp_dir,
    }
}

async fn request(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let req = axum::http::Request::builder()
        .method("GET")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_and_ready() {
    let test_app = setup_test_app().await;

    let (status, body) = request(test_app.app.clone(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = request(test_app.app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["cursors"][addr(FACTORY).as_str()], "100-0");
    assert_eq!(body["cursors"][addr(POOL).as_str()], "103-0");
}

#[tokio::test]
async fn test_get_pool_returns_totals_as_strings() {
    let test_app = setup_test_app().await;
    let uri = format!("/v1/pools/{}", addr(POOL));

    let (status, body) = request(test_app.app, &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], addr(POOL).to_string());
    assert_eq!(body["factory"], addr(FACTORY).to_string());
    assert_eq!(body["token0"], addr(COLLATERAL).to_string());
    assert_eq!(body["totalDeposits"], "260");
    assert_eq!(body["totalBorrows"], "90");
    assert_eq!(body["created"], 1_700_000_000u64);
}

#[tokio::test]
async fn test_get_factory_and_user() {
    let test_app = setup_test_app().await;

    let (status, body) =
        request(test_app.app.clone(), &format!("/v1/factories/{}", addr(FACTORY))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalPoolsCreated"], "1");

    let (status, body) = request(test_app.app, &format!("/v1/users/{}", addr(USER))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalDeposited"], "250");
    assert_eq!(body["totalBorrowed"], "90");
}

#[tokio::test]
async fn test_address_lookup_is_case_insensitive() {
    let test_app = setup_test_app().await;
    let upper = format!("0x{}", "AB".repeat(20));
    let uri = format!("/v1/users/{}", upper);

    let (status, body) = request(test_app.app, &uri).await;

    // Parsed and normalized, but no such user.
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains(&"ab".repeat(20)));
}

#[tokio::test]
async fn test_unknown_and_malformed_ids() {
    let test_app = setup_test_app().await;

    let (status, _) = request(
        test_app.app.clone(),
        &format!("/v1/pools/{}", addr(0x77)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = request(test_app.app.clone(), "/v1/pools/not-an-address").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = request(test_app.app.clone(), "/v1/events/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request(test_app.app, "/v1/events/999-0").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_event_record() {
    let test_app = setup_test_app().await;

    let (status, body) = request(test_app.app, "/v1/events/102-3").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "102-3");
    assert_eq!(body["blockNumber"], 102);
    assert_eq!(body["detail"]["kind"], "BorrowDebtCrosschain");
    assert_eq!(body["detail"]["amount"], "90");
    assert_eq!(body["detail"]["borrowRateMode"], "1");
}

#[tokio::test]
async fn test_list_events_filters() {
    let test_app = setup_test_app().await;

    let (status, body) = request(test_app.app.clone(), "/v1/events").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 4);
    assert_eq!(body["events"][0]["id"], "103-0");

    let uri = format!("/v1/events?user={}&limit=1", addr(USER));
    let (status, body) = request(test_app.app.clone(), &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["events"][0]["id"], "102-3");

    let (status, _) = request(test_app.app.clone(), "/v1/events?limit=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request(test_app.app, "/v1/events?pool=0x12").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
