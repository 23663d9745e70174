use crate::bids::{BidBook, BidLink};
use crate::cart::Cart;
use crate::pipeline::{self, SortField, SortSpec};
use crate::tabs::{AlertKind, TabManager};
use mirador_core::reservation::{Reservation, ReservationTab};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// How long a transient alert stays on screen before auto-clearing.
pub const ALERT_TTL: Duration = Duration::from_millis(4000);

/// All mutable front-desk state for one agent session, constructed
/// explicitly and passed to whoever needs it. Nothing here is a
/// process-wide singleton.
pub struct DeskSession {
    roster: Vec<Reservation>,
    pub tabs: TabManager,
    pub cart: Cart,
    pub bids: BidBook,
    pub sort: SortSpec,
}

impl DeskSession {
    pub fn new(roster: Vec<Reservation>, link: Arc<dyn BidLink>) -> Self {
        Self {
            roster,
            tabs: TabManager::new(),
            cart: Cart::new(),
            bids: BidBook::new(link),
            sort: SortSpec::default(),
        }
    }

    pub fn roster(&self) -> &[Reservation] {
        &self.roster
    }

    /// The roster is replaced wholesale; there is no per-row mutation.
    pub fn replace_roster(&mut self, rows: Vec<Reservation>) {
        self.roster = rows;
    }

    /// The booking list as displayed: filtered by the current search term,
    /// then ordered by the active sort.
    pub fn filtered_reservations(&self) -> Vec<Reservation> {
        let mut rows = pipeline::filter_reservations(&self.roster, self.tabs.search_term());
        pipeline::sort_reservations(&mut rows, self.sort);
        rows
    }

    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort.toggle(field);
    }

    /// Open a detail tab for a roster reservation. Unknown ids leave the
    /// session untouched.
    pub fn open_reservation(&mut self, id: &str) -> bool {
        match self.roster.iter().find(|r| r.id == id) {
            Some(reservation) => {
                self.tabs.add_tab(ReservationTab::new(reservation.clone()));
                true
            }
            None => false,
        }
    }

    pub fn close_tab(&mut self, id: &str) {
        self.tabs.remove_tab(id);
    }

    pub fn total_commission_cents(&self, marker: &str, per_item_cents: i64) -> i64 {
        pipeline::total_commission_cents(&self.roster, marker, per_item_cents)
    }
}

/// Shared handle over a [`DeskSession`]. Cloning shares the same state;
/// this is what gets injected into the API layer and the alert timer
/// tasks.
#[derive(Clone)]
pub struct Desk {
    inner: Arc<Mutex<DeskSession>>,
    alert_ttl: Duration,
}

impl Desk {
    pub fn new(session: DeskSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
            alert_ttl: ALERT_TTL,
        }
    }

    pub fn with_alert_ttl(mut self, ttl: Duration) -> Self {
        self.alert_ttl = ttl;
        self
    }

    pub fn lock(&self) -> MutexGuard<'_, DeskSession> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Show a transient alert and schedule its auto-clear. A newer alert
    /// replaces the slot; the older timer still fires and clears whatever
    /// is there, which is harmless because clearing is idempotent.
    pub fn show_alert(&self, kind: AlertKind, message: impl Into<String>) {
        self.lock().tabs.set_alert(kind, message);

        let inner = self.inner.clone();
        let ttl = self.alert_ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            inner
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .tabs
                .clear_alert();
        });
    }

    pub fn clear_alert(&self) {
        self.lock().tabs.clear_alert();
    }
}
