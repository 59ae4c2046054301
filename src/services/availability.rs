use chrono::{NaiveDate, NaiveTime};

use crate::models::booking::hhmm;
use crate::models::{Booking, Service};

/// Free slots of `service` on `date`, in the order the service declares them.
///
/// Only pending and confirmed bookings of the same service on the same date
/// occupy a slot. Dates before `today` have no availability.
pub fn available_slots(
    service: &Service,
    date: NaiveDate,
    today: NaiveDate,
    existing: &[Booking],
) -> Vec<String> {
    if date < today {
        return Vec::new();
    }

    let taken: Vec<String> = existing
        .iter()
        .filter(|b| b.service_id == service.id && b.date == date && b.is_active())
        .map(Booking::time_label)
        .collect();

    service
        .time_slots
        .iter()
        .filter(|slot| !taken.contains(slot))
        .cloned()
        .collect()
}

pub fn is_slot_available(
    service: &Service,
    date: NaiveDate,
    time: NaiveTime,
    today: NaiveDate,
    existing: &[Booking],
) -> bool {
    let label = time.format(hhmm::FORMAT).to_string();
    available_slots(service, date, today, existing).contains(&label)
}
