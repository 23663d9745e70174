use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use mirador_api::{app, AppState};
use mirador_core::repository::ProposalRepository;
use mirador_desk::bids::SimulatedLink;
use mirador_desk::{Desk, DeskSession};
use mirador_store::app_config::BusinessRules;
use mirador_store::memory::InMemoryProposalRepository;
use mirador_store::realtime::InMemoryTransport;
use mirador_store::{ChannelManager, SyncBridge};
use std::sync::Arc;
use tower::util::ServiceExt;

fn test_state(repo: Arc<dyn ProposalRepository>) -> (AppState, Arc<InMemoryTransport>) {
    let transport = Arc::new(InMemoryTransport::new());
    let bridge = Arc::new(SyncBridge::new(
        repo,
        ChannelManager::new(transport.clone()),
    ));
    let desk = Desk::new(DeskSession::new(
        mirador_desk::seed::seed_reservations(),
        Arc::new(SimulatedLink::default()),
    ));
    (
        AppState {
            bridge,
            desk,
            business_rules: BusinessRules::default(),
        },
        transport,
    )
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn proposal_payload() -> serde_json::Value {
    serde_json::json!({
        "order_id": "ord-7",
        "kind": "upgrade",
        "title": "Suite vista mar",
        "price_difference_cents": 4500,
        "proposed_item": {"room": "501"},
        "expires_at": "2030-01-01T00:00:00Z",
    })
}

#[tokio::test]
async fn test_create_proposal_returns_success_envelope() {
    let (state, transport) = test_state(Arc::new(InMemoryProposalRepository::new()));

    let response = app(state)
        .oneshot(json_request("POST", "/v1/proposals", proposal_payload()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["proposal"]["status"], "pending");
    assert_eq!(body["proposal"]["order_id"], "ord-7");

    // The external system was notified on the order's channel
    let published = transport.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].0, "order:ord-7:proposals");
}

#[tokio::test]
async fn test_create_proposal_failure_is_500_with_error() {
    let (state, _) = test_state(Arc::new(InMemoryProposalRepository::failing()));

    let response = app(state)
        .oneshot(json_request("POST", "/v1/proposals", proposal_payload()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("insert failed"));
}

#[tokio::test]
async fn test_update_proposal_status() {
    let repo = Arc::new(InMemoryProposalRepository::new());
    let (state, _) = test_state(repo.clone());
    let router = app(state);

    let response = router
        .clone()
        .oneshot(json_request("POST", "/v1/proposals", proposal_payload()))
        .await
        .unwrap();
    let created = body_json(response).await;
    let id = created["proposal"]["id"].as_str().unwrap().to_string();

    let response = router
        .oneshot(json_request(
            "PATCH",
            "/v1/proposals",
            serde_json::json!({"id": id, "status": "accepted"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["proposal"]["status"], "accepted");
}

#[tokio::test]
async fn test_list_reservations_filters_and_sorts() {
    let (state, _) = test_state(Arc::new(InMemoryProposalRepository::new()));
    let router = app(state);

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/reservations?q=ana")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let rows = body_json(response).await;
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["locator"], "LOC1");

    let response = router
        .oneshot(
            Request::builder()
                .uri("/v1/reservations?sort=nights&dir=desc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let rows = body_json(response).await;
    let nights: Vec<i64> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["nights"].as_i64().unwrap())
        .collect();
    let mut sorted = nights.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(nights, sorted);
}

#[tokio::test]
async fn test_commission_summary_formats_two_decimals() {
    let (state, _) = test_state(Arc::new(InMemoryProposalRepository::new()));

    let response = app(state)
        .oneshot(
            Request::builder()
                .uri("/v1/reservations/commission")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = body_json(response).await;
    // Seed roster carries three cava bottles at the default €2.00 rate
    assert_eq!(body["commission"], "6.00");
}
