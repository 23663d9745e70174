use crate::state::AppState;
use axum::{extract::Query, extract::State, Json};
use mirador_core::reservation::Reservation;
use mirador_desk::pipeline::{self, SortDir, SortField, SortSpec};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub q: String,
    pub sort: Option<String>,
    pub dir: Option<String>,
}

/// GET /v1/reservations?q=&sort=&dir=
/// The booking list as the desk shows it. Unknown sort fields and
/// directions silently fall back to their defaults.
pub async fn list_reservations(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<Vec<Reservation>> {
    let field: SortField = params
        .sort
        .as_deref()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default();
    let dir = match params.dir.as_deref() {
        Some("desc") => SortDir::Desc,
        _ => SortDir::Asc,
    };

    let desk = state.desk.lock();
    let mut rows = pipeline::filter_reservations(desk.roster(), &params.q);
    pipeline::sort_reservations(&mut rows, SortSpec { field, dir });
    Json(rows)
}

/// GET /v1/reservations/commission
/// Commission owed on commissionable extras across the roster.
pub async fn commission_summary(State(state): State<AppState>) -> Json<serde_json::Value> {
    let rules = &state.business_rules;
    let cents = state
        .desk
        .lock()
        .total_commission_cents(&rules.commission_marker, rules.commission_per_item_cents);

    Json(json!({
        "commission": format!("{:.2}", cents as f64 / 100.0),
    }))
}
