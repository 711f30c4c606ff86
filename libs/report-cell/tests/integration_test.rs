use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use report_cell::router::report_routes;
use shared_config::AppConfig;
use shared_utils::test_utils::{JwtTestUtils, TestUser};

fn mock_config(mock_server: &MockServer) -> AppConfig {
    AppConfig {
        supabase_url: mock_server.uri(),
        supabase_anon_key: "test-anon-key".to_string(),
        supabase_jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
    }
}

fn test_app(config: &AppConfig) -> Router {
    report_routes(Arc::new(config.clone()))
}

#[tokio::test]
async fn test_summary_aggregates_revenue_and_expenses() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let app = test_app(&config);

    let user = TestUser::admin("owner@example.com");
    let token = JwtTestUtils::create_test_token(&user, &config.supabase_jwt_secret, Some(24));

    let recent = (Utc::now().date_naive() - Duration::days(5)).to_string();
    let older = (Utc::now().date_naive() - Duration::days(40)).to_string();

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "service": "Haircut", "price": 50.0, "status": "Completed", "date": recent },
            { "service": "Haircut", "price": null, "status": "Confirmed", "date": recent },
            { "service": "Haircut", "price": 50.0, "status": "Cancelled", "date": recent },
            { "service": "Haircut", "price": 90.0, "status": "Completed", "date": older }
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/expenses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "category": "Supplies", "amount": 40.0, "date": recent }
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "Haircut", "price": 35.0 }
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri("/summary?period=month")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

    // 50 explicit + 35 catalog fallback; the cancelled one contributes nothing.
    assert_eq!(body["revenue"]["current"], 85.0);
    assert_eq!(body["revenue"]["previous"], 90.0);
    assert_eq!(body["expenses"]["current"], 40.0);
    assert_eq!(body["expenses"]["trend"], "+100%");
    assert_eq!(body["expense_breakdown"][0]["category"], "Supplies");
}

#[tokio::test]
async fn test_summary_requires_auth() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let app = test_app(&config);

    let request = Request::builder()
        .method("GET")
        .uri("/summary")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_summary_receptionist_pinned_to_branch() {
    let mock_server = MockServer::start().await;
    let config = mock_config(&mock_server);
    let app = test_app(&config);

    let user = TestUser::receptionist("front@example.com", "owner-1", "branch-1");
    let token = JwtTestUtils::create_test_token(&user, &config.supabase_jwt_secret, Some(24));

    let request = Request::builder()
        .method("GET")
        .uri("/summary?branch_id=branch-2")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
