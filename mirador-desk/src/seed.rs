use chrono::NaiveDate;
use mirador_core::reservation::Reservation;

/// Demo roster the desk boots with until the store layer replaces it with
/// live rows.
pub fn seed_reservations() -> Vec<Reservation> {
    vec![
        reservation(
            "res-001",
            "LOC1",
            "Ana Pérez",
            "a@x.com",
            (2025, 8, 12),
            3,
            "Deluxe",
            "204",
            "2AD",
            "confirmed",
            "2 Botellas de cava",
            false,
        ),
        reservation(
            "res-002",
            "LOC2",
            "Bob Ruiz",
            "bob.ruiz@example.com",
            (2025, 8, 14),
            2,
            "Standard",
            "117",
            "1AD",
            "pending",
            "",
            false,
        ),
        reservation(
            "res-003",
            "LOC3",
            "Carla Molina",
            "carla.molina@example.com",
            (2025, 8, 15),
            5,
            "Junior suite",
            "310",
            "2AD+1CH",
            "confirmed",
            "1 Botella de cava",
            true,
        ),
        reservation(
            "res-004",
            "LOC4",
            "Diego Ortega",
            "d.ortega@example.com",
            (2025, 8, 18),
            1,
            "Standard",
            "121",
            "2AD",
            "confirmed",
            "1 Late checkout",
            false,
        ),
        reservation(
            "res-005",
            "LOC5",
            "Elena Sanz",
            "elena.sanz@example.com",
            (2025, 8, 20),
            4,
            "Suite vista mar",
            "501",
            "2AD",
            "confirmed",
            "",
            false,
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn reservation(
    id: &str,
    locator: &str,
    guest_name: &str,
    guest_email: &str,
    check_in: (i32, u32, u32),
    nights: u32,
    room_type: &str,
    room_number: &str,
    occupancy: &str,
    status: &str,
    extras: &str,
    has_pending_request: bool,
) -> Reservation {
    Reservation {
        id: id.to_string(),
        locator: locator.to_string(),
        guest_name: guest_name.to_string(),
        guest_email: guest_email.to_string(),
        check_in: NaiveDate::from_ymd_opt(check_in.0, check_in.1, check_in.2)
            .unwrap_or_default(),
        nights,
        room_type: room_type.to_string(),
        room_number: room_number.to_string(),
        occupancy: occupancy.to_string(),
        status: status.to_string(),
        extras: extras.to_string(),
        has_pending_request,
    }
}
