use mirador_core::reservation::ReservationTab;
use serde::{Deserialize, Serialize};

/// Which pane the front desk is showing: the booking list or one of the
/// open reservation tabs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Pane {
    List,
    Tab(String),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

/// Open reservation tabs and the surrounding view state.
///
/// Invariants, held across any add/remove sequence:
/// - the active pane is always an open tab's id or the list pane
/// - reservation mode is on exactly while at least one tab is open
pub struct TabManager {
    tabs: Vec<ReservationTab>,
    active: Pane,
    in_reservation_mode: bool,
    search_term: String,
    alert: Option<Alert>,
}

impl TabManager {
    pub fn new() -> Self {
        Self {
            tabs: Vec::new(),
            active: Pane::List,
            in_reservation_mode: false,
            search_term: String::new(),
            alert: None,
        }
    }

    /// Open a tab and make it active. Opening a reservation that already
    /// has a tab re-activates the existing one instead of duplicating it.
    pub fn add_tab(&mut self, tab: ReservationTab) {
        let id = tab.id.clone();
        if !self.tabs.iter().any(|t| t.id == id) {
            self.tabs.push(tab);
        }
        self.active = Pane::Tab(id);
        self.in_reservation_mode = true;
    }

    /// Close a tab. Closing the active tab activates the most recently
    /// opened remaining tab, or falls back to the list pane when none
    /// remain. Reservation mode turns off exactly when the last tab
    /// closes.
    pub fn remove_tab(&mut self, tab_id: &str) {
        self.tabs.retain(|t| t.id != tab_id);

        if self.active == Pane::Tab(tab_id.to_string()) {
            self.active = match self.tabs.last() {
                Some(last) => Pane::Tab(last.id.clone()),
                None => Pane::List,
            };
        }
        self.in_reservation_mode = !self.tabs.is_empty();
    }

    /// Activate an open tab. Ids with no open tab are ignored so the
    /// active-pane invariant cannot be broken from outside.
    pub fn set_active_tab(&mut self, tab_id: &str) {
        if self.tabs.iter().any(|t| t.id == tab_id) {
            self.active = Pane::Tab(tab_id.to_string());
        }
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn set_reservation_mode(&mut self, on: bool) {
        self.in_reservation_mode = on;
    }

    pub fn set_alert(&mut self, kind: AlertKind, message: impl Into<String>) {
        self.alert = Some(Alert {
            kind,
            message: message.into(),
        });
    }

    /// Idempotent: clearing an already-clear alert is a no-op. Stale
    /// auto-clear timers rely on this.
    pub fn clear_alert(&mut self) {
        self.alert = None;
    }

    pub fn tabs(&self) -> &[ReservationTab] {
        &self.tabs
    }

    pub fn active(&self) -> &Pane {
        &self.active
    }

    pub fn in_reservation_mode(&self) -> bool {
        self.in_reservation_mode
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }
}

impl Default for TabManager {
    fn default() -> Self {
        Self::new()
    }
}
