use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use mirador_core::proposal::{NewProposal, ProposalStatus};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct UpdateProposalRequest {
    pub id: Uuid,
    pub status: ProposalStatus,
}

/// POST /v1/proposals
/// Persist an upsell proposal and notify the external system.
pub async fn create_proposal(
    State(state): State<AppState>,
    Json(payload): Json<NewProposal>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.bridge.create_proposal(payload).await {
        Ok(proposal) => (
            StatusCode::OK,
            Json(json!({ "success": true, "proposal": proposal })),
        ),
        Err(err) => {
            tracing::error!("Proposal creation failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.to_string() })),
            )
        }
    }
}

/// PATCH /v1/proposals
/// Move a proposal through its lifecycle.
pub async fn update_proposal(
    State(state): State<AppState>,
    Json(req): Json<UpdateProposalRequest>,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.bridge.update_proposal_status(req.id, req.status).await {
        Ok(proposal) => (
            StatusCode::OK,
            Json(json!({ "success": true, "proposal": proposal })),
        ),
        Err(err) => {
            tracing::error!("Proposal update failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.to_string() })),
            )
        }
    }
}
