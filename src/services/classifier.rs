use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::Booking;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassifiedBookings {
    pub upcoming: Vec<Booking>,
    pub past: Vec<Booking>,
}

/// Splits bookings into upcoming and past, keeping input order in each.
///
/// Upcoming means starting at or after `now` and still pending or confirmed.
/// Everything else is past, so a cancelled booking dated next week is past.
pub fn classify(bookings: Vec<Booking>, now: NaiveDateTime) -> ClassifiedBookings {
    let (upcoming, past) = bookings
        .into_iter()
        .partition(|b| is_upcoming(b, now));
    ClassifiedBookings { upcoming, past }
}

pub fn is_upcoming(booking: &Booking, now: NaiveDateTime) -> bool {
    booking.starts_at() >= now && booking.is_active()
}
