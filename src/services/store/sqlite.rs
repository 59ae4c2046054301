use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::Connection;

use super::{BookingStore, UserStore};
use crate::db::{self, queries};
use crate::models::{Booking, SavedPaymentMethod, UserProfile};

pub struct SqliteBookingStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteBookingStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    pub fn open(path: &str) -> anyhow::Result<Self> {
        let conn = db::init_db(path)?;
        Ok(Self::new(Arc::new(Mutex::new(conn))))
    }

    fn conn(&self) -> anyhow::Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("database lock poisoned"))
    }
}

#[async_trait]
impl BookingStore for SqliteBookingStore {
    async fn list_bookings(&self, service_id: &str, date: NaiveDate) -> anyhow::Result<Vec<Booking>> {
        queries::get_bookings_for_service_on(&*self.conn()?, service_id, date)
    }

    async fn list_all(&self) -> anyhow::Result<Vec<Booking>> {
        queries::get_all_bookings(&*self.conn()?)
    }

    async fn get(&self, id: &str) -> anyhow::Result<Option<Booking>> {
        queries::get_booking_by_id(&*self.conn()?, id)
    }

    async fn save(&self, booking: Booking) -> anyhow::Result<Booking> {
        queries::create_booking(&*self.conn()?, &booking)?;
        Ok(booking)
    }

    async fn update(&self, booking: &Booking) -> anyhow::Result<bool> {
        queries::update_booking(&*self.conn()?, booking)
    }
}

pub struct SqliteUserStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteUserStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn conn(&self) -> anyhow::Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("database lock poisoned"))
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn get_profile(&self) -> anyhow::Result<Option<UserProfile>> {
        queries::get_profile(&*self.conn()?)
    }

    async fn save_profile(&self, profile: &UserProfile) -> anyhow::Result<()> {
        queries::save_profile(&*self.conn()?, profile)
    }

    async fn list_payment_methods(&self) -> anyhow::Result<Vec<SavedPaymentMethod>> {
        queries::get_payment_methods(&*self.conn()?)
    }

    async fn add_payment_method(&self, method: &SavedPaymentMethod) -> anyhow::Result<()> {
        queries::insert_payment_method(&*self.conn()?, method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingStatus;
    use crate::services::availability::tests::booking;

    #[tokio::test]
    async fn test_store_round_trip() {
        let store = SqliteBookingStore::open(":memory:").unwrap();
        let b = booking("gym-iron", "2025-06-16", "09:00", BookingStatus::Confirmed);
        store.save(b.clone()).await.unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 6, 16).unwrap();
        assert_eq!(store.list_bookings("gym-iron", date).await.unwrap(), vec![b.clone()]);
        assert_eq!(store.get(&b.id).await.unwrap(), Some(b));
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_user_store_shares_connection() {
        let conn = Arc::new(Mutex::new(db::init_db(":memory:").unwrap()));
        let bookings = SqliteBookingStore::new(conn.clone());
        let users = SqliteUserStore::new(conn);

        let profile = UserProfile {
            name: "Ana Torres".to_string(),
            email: "ana@example.com".to_string(),
            phone: None,
            updated_at: chrono::NaiveDateTime::default(),
        };
        users.save_profile(&profile).await.unwrap();
        assert_eq!(users.get_profile().await.unwrap(), Some(profile));
        assert!(bookings.list_all().await.unwrap().is_empty());
    }
}
