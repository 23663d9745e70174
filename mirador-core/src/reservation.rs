use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A booking row as the front desk sees it.
///
/// The status field is deliberately free text ("confirmed", "pending", ...)
/// because the upstream property system does not guarantee a closed set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    pub locator: String,
    pub guest_name: String,
    pub guest_email: String,
    pub check_in: NaiveDate,
    pub nights: u32,
    pub room_type: String,
    pub room_number: String,
    pub occupancy: String,
    pub status: String,
    /// Human-readable summary of booked extras, e.g. "2 Botellas de cava".
    pub extras: String,
    /// True while an upsell request is awaiting an answer from the
    /// external booking system.
    pub has_pending_request: bool,
}

impl Reservation {
    /// Case-insensitive match of a search term against the fields the
    /// front desk actually searches on: guest name, email and locator.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.guest_name.to_lowercase().contains(&term)
            || self.guest_email.to_lowercase().contains(&term)
            || self.locator.to_lowercase().contains(&term)
    }
}

/// One open working context in the reservation detail view. The tab id is
/// reused from the reservation id, so at most one tab per reservation can
/// exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationTab {
    pub id: String,
    pub reservation: Reservation,
}

impl ReservationTab {
    pub fn new(reservation: Reservation) -> Self {
        Self {
            id: reservation.id.clone(),
            reservation,
        }
    }
}
