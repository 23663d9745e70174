use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sentinel band id for calendar cells no band has been assigned to.
pub const NO_BAND: &str = "none";

/// Price table for the named pricing bands, in minor units.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BandTable {
    prices: HashMap<String, i64>,
}

impl BandTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_price(&mut self, band: impl Into<String>, cents: i64) {
        self.prices.insert(band.into(), cents);
    }

    /// Price for a band id; unknown ids and [`NO_BAND`] have no price.
    pub fn price_for(&self, band: &str) -> Option<i64> {
        self.prices.get(band).copied()
    }
}

/// Assignment of pricing bands to calendar cells, keyed by
/// (month, day of week). Month is 1-based as in the calendar UI.
#[derive(Debug, Clone, Default)]
pub struct BandCalendar {
    cells: HashMap<(u32, String), String>,
}

impl BandCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, month: u32, weekday: Weekday, band: impl Into<String>) {
        self.cells.insert((month, weekday.to_string()), band.into());
    }

    pub fn clear(&mut self, month: u32, weekday: Weekday) {
        self.cells.remove(&(month, weekday.to_string()));
    }

    /// Band assigned to a cell, or [`NO_BAND`] when the cell is empty.
    pub fn band_for(&self, month: u32, weekday: Weekday) -> &str {
        self.cells
            .get(&(month, weekday.to_string()))
            .map(String::as_str)
            .unwrap_or(NO_BAND)
    }

    /// Resolved price for a cell, if its band has one in the table.
    pub fn price_for(&self, table: &BandTable, month: u32, weekday: Weekday) -> Option<i64> {
        table.price_for(self.band_for(month, weekday))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unassigned_cell_is_none_band() {
        let calendar = BandCalendar::new();
        assert_eq!(calendar.band_for(7, Weekday::Sat), NO_BAND);
    }

    #[test]
    fn test_cell_price_resolution() {
        let mut table = BandTable::new();
        table.set_price("high", 2500);
        table.set_price("low", 1000);

        let mut calendar = BandCalendar::new();
        calendar.assign(8, Weekday::Fri, "high");

        assert_eq!(calendar.price_for(&table, 8, Weekday::Fri), Some(2500));
        // Unassigned cell resolves to the sentinel, which prices to nothing
        assert_eq!(calendar.price_for(&table, 8, Weekday::Mon), None);
    }

    #[test]
    fn test_clear_returns_cell_to_sentinel() {
        let mut calendar = BandCalendar::new();
        calendar.assign(1, Weekday::Mon, "low");
        calendar.clear(1, Weekday::Mon);
        assert_eq!(calendar.band_for(1, Weekday::Mon), NO_BAND);
    }
}
