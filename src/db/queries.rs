use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::{params, Connection};

use crate::models::{
    Booking, BookingStatus, ContactInfo, PaymentMethod, SavedPaymentMethod, UserProfile,
};

const DATE_FMT: &str = "%Y-%m-%d";
const TIME_FMT: &str = "%H:%M";
const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S%.f";

const BOOKING_COLUMNS: &str = "id, service_id, option_id, date, time, status, contact_name, \
     contact_email, contact_phone, notes, payment_method, created_at, updated_at";

// ── Bookings ──

pub fn create_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO bookings ({BOOKING_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
        ),
        params![
            booking.id,
            booking.service_id,
            booking.option_id,
            booking.date.format(DATE_FMT).to_string(),
            booking.time.format(TIME_FMT).to_string(),
            booking.status.as_str(),
            booking.contact.name,
            booking.contact.email,
            booking.contact.phone,
            booking.contact.notes,
            booking.payment_method.as_str(),
            booking.created_at.format(TIMESTAMP_FMT).to_string(),
            booking.updated_at.format(TIMESTAMP_FMT).to_string(),
        ],
    )
    .with_context(|| format!("failed to insert booking {}", booking.id))?;
    Ok(())
}

pub fn get_bookings_for_service_on(
    conn: &Connection,
    service_id: &str,
    date: NaiveDate,
) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings
         WHERE service_id = ?1 AND date = ?2 ORDER BY time ASC"
    ))?;

    let rows = stmt.query_map(
        params![service_id, date.format(DATE_FMT).to_string()],
        |row| Ok(parse_booking_row(row)),
    )?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_all_bookings(conn: &Connection) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY date ASC, time ASC"
    ))?;

    let rows = stmt.query_map([], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
        params![id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Rewrites the mutable columns of an existing booking.
pub fn update_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<bool> {
    let count = conn
        .execute(
            "UPDATE bookings SET date = ?1, time = ?2, status = ?3, updated_at = ?4 WHERE id = ?5",
            params![
                booking.date.format(DATE_FMT).to_string(),
                booking.time.format(TIME_FMT).to_string(),
                booking.status.as_str(),
                booking.updated_at.format(TIMESTAMP_FMT).to_string(),
                booking.id,
            ],
        )
        .with_context(|| format!("failed to update booking {}", booking.id))?;
    Ok(count > 0)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let id: String = row.get(0)?;
    let date_str: String = row.get(3)?;
    let time_str: String = row.get(4)?;
    let status_str: String = row.get(5)?;
    let payment_str: String = row.get(10)?;
    let created_at_str: String = row.get(11)?;
    let updated_at_str: String = row.get(12)?;

    let date = NaiveDate::parse_from_str(&date_str, DATE_FMT)
        .with_context(|| format!("bad date {date_str:?} on booking {id}"))?;
    let time = NaiveTime::parse_from_str(&time_str, TIME_FMT)
        .with_context(|| format!("bad time {time_str:?} on booking {id}"))?;
    let status = BookingStatus::parse(&status_str)
        .with_context(|| format!("bad status {status_str:?} on booking {id}"))?;
    let payment_method = PaymentMethod::parse(&payment_str)
        .with_context(|| format!("bad payment method {payment_str:?} on booking {id}"))?;
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, TIMESTAMP_FMT)
        .with_context(|| format!("bad created_at on booking {id}"))?;
    let updated_at = NaiveDateTime::parse_from_str(&updated_at_str, TIMESTAMP_FMT)
        .with_context(|| format!("bad updated_at on booking {id}"))?;

    Ok(Booking {
        id,
        service_id: row.get(1)?,
        option_id: row.get(2)?,
        date,
        time,
        status,
        contact: ContactInfo {
            name: row.get(6)?,
            email: row.get(7)?,
            phone: row.get(8)?,
            notes: row.get(9)?,
        },
        payment_method,
        created_at,
        updated_at,
    })
}

// ── User profile ──

pub fn get_profile(conn: &Connection) -> anyhow::Result<Option<UserProfile>> {
    let result = conn.query_row(
        "SELECT name, email, phone, updated_at FROM user_profile WHERE id = 1",
        [],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
            ))
        },
    );

    match result {
        Ok((name, email, phone, updated_at_str)) => {
            let updated_at = NaiveDateTime::parse_from_str(&updated_at_str, TIMESTAMP_FMT)
                .with_context(|| format!("bad updated_at {updated_at_str:?} on profile"))?;
            Ok(Some(UserProfile {
                name,
                email,
                phone,
                updated_at,
            }))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn save_profile(conn: &Connection, profile: &UserProfile) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO user_profile (id, name, email, phone, updated_at)
         VALUES (1, ?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
           name = excluded.name,
           email = excluded.email,
           phone = excluded.phone,
           updated_at = excluded.updated_at",
        params![
            profile.name,
            profile.email,
            profile.phone,
            profile.updated_at.format(TIMESTAMP_FMT).to_string(),
        ],
    )
    .context("failed to save profile")?;
    Ok(())
}

// ── Payment methods ──

pub fn get_payment_methods(conn: &Connection) -> anyhow::Result<Vec<SavedPaymentMethod>> {
    let mut stmt = conn.prepare(
        "SELECT id, method, brand, last4, is_default, created_at
         FROM payment_methods ORDER BY created_at ASC, rowid ASC",
    )?;

    let rows = stmt.query_map([], |row| Ok(parse_payment_method_row(row)))?;

    let mut methods = vec![];
    for row in rows {
        methods.push(row??);
    }
    Ok(methods)
}

pub fn insert_payment_method(conn: &Connection, method: &SavedPaymentMethod) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO payment_methods (id, method, brand, last4, is_default, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            method.id,
            method.method.as_str(),
            method.brand,
            method.last4,
            method.is_default,
            method.created_at.format(TIMESTAMP_FMT).to_string(),
        ],
    )
    .with_context(|| format!("failed to insert payment method {}", method.id))?;
    Ok(())
}

fn parse_payment_method_row(row: &rusqlite::Row) -> anyhow::Result<SavedPaymentMethod> {
    let id: String = row.get(0)?;
    let method_str: String = row.get(1)?;
    let created_at_str: String = row.get(5)?;

    let method = PaymentMethod::parse(&method_str)
        .with_context(|| format!("bad method {method_str:?} on payment method {id}"))?;
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, TIMESTAMP_FMT)
        .with_context(|| format!("bad created_at on payment method {id}"))?;

    Ok(SavedPaymentMethod {
        id,
        method,
        brand: row.get(2)?,
        last4: row.get(3)?,
        is_default: row.get(4)?,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::services::availability::tests::booking;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    #[test]
    fn test_create_and_get_round_trip() {
        let conn = setup_db();
        let mut b = booking("gym-iron", "2025-06-16", "09:00", BookingStatus::Pending);
        b.contact.phone = Some("+525512345678".to_string());
        b.contact.notes = Some("first visit".to_string());
        b.payment_method = PaymentMethod::Card;
        create_booking(&conn, &b).unwrap();

        let loaded = get_booking_by_id(&conn, &b.id).unwrap().unwrap();
        assert_eq!(loaded, b);
        assert!(get_booking_by_id(&conn, "missing").unwrap().is_none());
    }

    #[test]
    fn test_subsecond_timestamps_survive() {
        let conn = setup_db();
        let mut b = booking("gym-iron", "2025-06-16", "09:00", BookingStatus::Confirmed);
        b.created_at = NaiveDate::from_ymd_opt(2025, 6, 10)
            .unwrap()
            .and_hms_nano_opt(8, 15, 30, 123_456_789)
            .unwrap();
        b.updated_at = b.created_at;
        create_booking(&conn, &b).unwrap();

        let loaded = get_booking_by_id(&conn, &b.id).unwrap().unwrap();
        assert_eq!(loaded.created_at, b.created_at);
        assert_eq!(loaded.updated_at, b.updated_at);
    }

    #[test]
    fn test_bookings_for_service_on_date() {
        let conn = setup_db();
        create_booking(&conn, &booking("gym", "2025-06-16", "11:00", BookingStatus::Confirmed)).unwrap();
        create_booking(&conn, &booking("gym", "2025-06-16", "09:00", BookingStatus::Cancelled)).unwrap();
        create_booking(&conn, &booking("gym", "2025-06-17", "09:00", BookingStatus::Confirmed)).unwrap();
        create_booking(&conn, &booking("spa", "2025-06-16", "09:00", BookingStatus::Confirmed)).unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 6, 16).unwrap();
        let found = get_bookings_for_service_on(&conn, "gym", date).unwrap();
        let times: Vec<String> = found.iter().map(Booking::time_label).collect();
        assert_eq!(times, vec!["09:00", "11:00"]);
    }

    #[test]
    fn test_active_slot_is_unique() {
        let conn = setup_db();
        let first = booking("gym", "2025-06-16", "10:00", BookingStatus::Confirmed);
        create_booking(&conn, &first).unwrap();

        let mut second = booking("gym", "2025-06-16", "10:00", BookingStatus::Pending);
        second.id = "other".to_string();
        assert!(create_booking(&conn, &second).is_err());

        // a cancelled row does not hold the slot
        let mut cancelled = booking("gym", "2025-06-16", "10:00", BookingStatus::Cancelled);
        cancelled.id = "cancelled".to_string();
        create_booking(&conn, &cancelled).unwrap();
    }

    #[test]
    fn test_update_booking() {
        let conn = setup_db();
        let mut b = booking("gym", "2025-06-16", "10:00", BookingStatus::Confirmed);
        create_booking(&conn, &b).unwrap();

        b.status = BookingStatus::Completed;
        b.time = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        assert!(update_booking(&conn, &b).unwrap());

        let loaded = get_booking_by_id(&conn, &b.id).unwrap().unwrap();
        assert_eq!(loaded.status, BookingStatus::Completed);
        assert_eq!(loaded.time_label(), "12:00");

        b.id = "missing".to_string();
        assert!(!update_booking(&conn, &b).unwrap());
    }

    #[test]
    fn test_get_all_sorted() {
        let conn = setup_db();
        create_booking(&conn, &booking("a", "2025-06-17", "09:00", BookingStatus::Confirmed)).unwrap();
        create_booking(&conn, &booking("b", "2025-06-16", "12:00", BookingStatus::Confirmed)).unwrap();
        create_booking(&conn, &booking("c", "2025-06-16", "09:00", BookingStatus::Confirmed)).unwrap();

        let all = get_all_bookings(&conn).unwrap();
        let services: Vec<&str> = all.iter().map(|b| b.service_id.as_str()).collect();
        assert_eq!(services, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_profile_upsert() {
        let conn = setup_db();
        assert!(get_profile(&conn).unwrap().is_none());

        let mut profile = UserProfile {
            name: "Ana Torres".to_string(),
            email: "ana@example.com".to_string(),
            phone: None,
            updated_at: NaiveDate::from_ymd_opt(2025, 6, 10)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        };
        save_profile(&conn, &profile).unwrap();
        profile.phone = Some("+525512345678".to_string());
        save_profile(&conn, &profile).unwrap();

        assert_eq!(get_profile(&conn).unwrap(), Some(profile));
    }

    #[test]
    fn test_payment_methods_in_insertion_order() {
        let conn = setup_db();
        let created_at = NaiveDate::from_ymd_opt(2025, 6, 10)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let card = SavedPaymentMethod {
            id: "pm-card".to_string(),
            method: PaymentMethod::Card,
            brand: Some("Visa".to_string()),
            last4: Some("0366".to_string()),
            is_default: true,
            created_at,
        };
        let cash = SavedPaymentMethod {
            id: "pm-cash".to_string(),
            method: PaymentMethod::Cash,
            brand: None,
            last4: None,
            is_default: false,
            created_at,
        };
        insert_payment_method(&conn, &card).unwrap();
        insert_payment_method(&conn, &cash).unwrap();

        assert_eq!(get_payment_methods(&conn).unwrap(), vec![card.clone(), cash]);
        assert!(insert_payment_method(&conn, &card).is_err());
    }
}
