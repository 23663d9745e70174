use mirador_core::reservation::Reservation;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Columns the booking table can be sorted on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    GuestName,
    Locator,
    CheckIn,
    Nights,
    RoomType,
    RoomNumber,
    Status,
}

impl Default for SortField {
    fn default() -> Self {
        SortField::GuestName
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "guest_name" | "guest.name" => Ok(SortField::GuestName),
            "locator" => Ok(SortField::Locator),
            "check_in" => Ok(SortField::CheckIn),
            "nights" => Ok(SortField::Nights),
            "room_type" | "room.type" => Ok(SortField::RoomType),
            "room_number" | "room.number" => Ok(SortField::RoomNumber),
            "status" => Ok(SortField::Status),
            other => Err(format!("unknown sort field: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn flip(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }
}

/// The active sort: one field plus a direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub dir: SortDir,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::default(),
            dir: SortDir::Asc,
        }
    }
}

impl SortSpec {
    /// Clicking the active column flips its direction; picking a new
    /// column resets to ascending.
    pub fn toggle(&mut self, field: SortField) {
        if self.field == field {
            self.dir = self.dir.flip();
        } else {
            self.field = field;
            self.dir = SortDir::Asc;
        }
    }
}

/// Case-insensitive substring filter over guest name, email and locator.
/// An empty term returns the whole roster.
pub fn filter_reservations(rows: &[Reservation], term: &str) -> Vec<Reservation> {
    if term.trim().is_empty() {
        return rows.to_vec();
    }
    rows.iter().filter(|r| r.matches(term)).cloned().collect()
}

pub fn sort_reservations(rows: &mut [Reservation], spec: SortSpec) {
    rows.sort_by(|a, b| {
        let ordering = match spec.field {
            SortField::GuestName => cmp_text(&a.guest_name, &b.guest_name),
            SortField::Locator => cmp_text(&a.locator, &b.locator),
            SortField::CheckIn => a.check_in.cmp(&b.check_in),
            SortField::Nights => a.nights.cmp(&b.nights),
            SortField::RoomType => cmp_text(&a.room_type, &b.room_type),
            SortField::RoomNumber => cmp_text(&a.room_number, &b.room_number),
            SortField::Status => cmp_text(&a.status, &b.status),
        };
        match spec.dir {
            SortDir::Asc => ordering,
            SortDir::Desc => ordering.reverse(),
        }
    });
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Commission owed on commissionable extras, in minor units.
///
/// A reservation contributes when its extras summary mentions the marker;
/// the unit count is the leading integer of that summary ("2 Botellas de
/// cava" -> 2), and each unit pays the per-item rate.
pub fn total_commission_cents(rows: &[Reservation], marker: &str, per_item_cents: i64) -> i64 {
    let marker = marker.to_lowercase();
    rows.iter()
        .filter(|r| r.extras.to_lowercase().contains(&marker))
        .map(|r| leading_int(&r.extras) * per_item_cents)
        .sum()
}

fn leading_int(text: &str) -> i64 {
    let digits: String = text
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn res(name: &str, email: &str, locator: &str) -> Reservation {
        Reservation {
            id: locator.to_lowercase(),
            locator: locator.to_string(),
            guest_name: name.to_string(),
            guest_email: email.to_string(),
            check_in: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            nights: 1,
            room_type: "Standard".to_string(),
            room_number: "101".to_string(),
            occupancy: "2AD".to_string(),
            status: "confirmed".to_string(),
            extras: String::new(),
            has_pending_request: false,
        }
    }

    #[test]
    fn test_filter_matches_any_of_the_three_fields() {
        let rows = vec![
            res("Ana Pérez", "a@x.com", "LOC1"),
            res("Bob Ruiz", "", "LOC2"),
        ];

        let hits = filter_reservations(&rows, "ana");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].locator, "LOC1");

        assert_eq!(filter_reservations(&rows, "loc2").len(), 1);
        assert_eq!(filter_reservations(&rows, "").len(), 2);
        assert_eq!(filter_reservations(&rows, "zzz").len(), 0);
    }

    #[test]
    fn test_toggle_flips_then_resets() {
        let mut spec = SortSpec::default();
        assert_eq!(spec.field, SortField::GuestName);
        assert_eq!(spec.dir, SortDir::Asc);

        spec.toggle(SortField::GuestName);
        assert_eq!(spec.dir, SortDir::Desc);

        spec.toggle(SortField::Nights);
        assert_eq!(spec.field, SortField::Nights);
        assert_eq!(spec.dir, SortDir::Asc);
    }

    #[test]
    fn test_unknown_sort_field_falls_back_to_default() {
        let field: SortField = "garbage".parse().unwrap_or_default();
        assert_eq!(field, SortField::GuestName);
        assert_eq!("room.type".parse::<SortField>().unwrap(), SortField::RoomType);
    }

    #[test]
    fn test_sort_by_name_desc() {
        let mut rows = vec![
            res("ana", "", "L1"),
            res("Carlos", "", "L2"),
            res("berta", "", "L3"),
        ];
        sort_reservations(
            &mut rows,
            SortSpec {
                field: SortField::GuestName,
                dir: SortDir::Desc,
            },
        );
        let names: Vec<_> = rows.iter().map(|r| r.guest_name.as_str()).collect();
        assert_eq!(names, ["Carlos", "berta", "ana"]);
    }

    #[test]
    fn test_commission_counts_marked_extras_only() {
        let mut with_cava = res("Ana", "", "L1");
        with_cava.extras = "2 Botellas de cava".to_string();
        let mut other = res("Bob", "", "L2");
        other.extras = "1 Late checkout".to_string();
        let none = res("Eva", "", "L3");

        let total = total_commission_cents(&[with_cava, other, none], "cava", 200);
        assert_eq!(total, 400);
    }

    #[test]
    fn test_commission_without_leading_count_is_zero() {
        let mut row = res("Ana", "", "L1");
        row.extras = "Botella de cava".to_string();
        assert_eq!(total_commission_cents(&[row], "cava", 200), 0);
    }
}
