use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Proposal lifecycle status.
///
/// `PendingHotel` and `Confirmed` only ever come back from the
/// persistence layer; the external booking system writes them when a
/// proposal needs hotel-side confirmation before it is final.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Pending,
    Accepted,
    Rejected,
    Expired,
    PendingHotel,
    Confirmed,
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProposalStatus::Pending => "pending",
            ProposalStatus::Accepted => "accepted",
            ProposalStatus::Rejected => "rejected",
            ProposalStatus::Expired => "expired",
            ProposalStatus::PendingHotel => "pending_hotel",
            ProposalStatus::Confirmed => "confirmed",
        };
        f.write_str(s)
    }
}

impl FromStr for ProposalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ProposalStatus::Pending),
            "accepted" => Ok(ProposalStatus::Accepted),
            "rejected" => Ok(ProposalStatus::Rejected),
            "expired" => Ok(ProposalStatus::Expired),
            "pending_hotel" => Ok(ProposalStatus::PendingHotel),
            "confirmed" => Ok(ProposalStatus::Confirmed),
            other => Err(format!("unknown proposal status: {other}")),
        }
    }
}

/// An upsell or change offer created against an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub id: Uuid,
    pub order_id: String,
    pub kind: String,
    pub title: String,
    pub description: Option<String>,
    pub price_difference_cents: i64,
    /// Item on the order this proposal would replace, when any.
    pub original_item_id: Option<String>,
    /// Opaque payload describing the proposed item; the external system
    /// owns its shape.
    pub proposed_item: serde_json::Value,
    pub status: ProposalStatus,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Proposal {
    pub fn from_payload(payload: NewProposal) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id: payload.order_id,
            kind: payload.kind,
            title: payload.title,
            description: payload.description,
            price_difference_cents: payload.price_difference_cents,
            original_item_id: payload.original_item_id,
            proposed_item: payload.proposed_item,
            status: ProposalStatus::Pending,
            expires_at: payload.expires_at,
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Creation payload as submitted by the upsell workflow. The price
/// difference defaults to zero when the caller leaves it out, matching
/// how attribute-only proposals are sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProposal {
    pub order_id: String,
    pub kind: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price_difference_cents: i64,
    #[serde(default)]
    pub original_item_id: Option<String>,
    #[serde(default)]
    pub proposed_item: serde_json::Value,
    pub expires_at: DateTime<Utc>,
}
