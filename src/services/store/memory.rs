use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{BookingStore, UserStore};
use crate::models::{Booking, SavedPaymentMethod, UserProfile};

#[derive(Default)]
pub struct InMemoryBookingStore {
    bookings: Mutex<Vec<Booking>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> anyhow::Result<std::sync::MutexGuard<'_, Vec<Booking>>> {
        self.bookings
            .lock()
            .map_err(|_| anyhow::anyhow!("booking store lock poisoned"))
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn list_bookings(&self, service_id: &str, date: NaiveDate) -> anyhow::Result<Vec<Booking>> {
        Ok(self
            .lock()?
            .iter()
            .filter(|b| b.service_id == service_id && b.date == date)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> anyhow::Result<Vec<Booking>> {
        let mut all = self.lock()?.clone();
        all.sort_by_key(Booking::starts_at);
        Ok(all)
    }

    async fn get(&self, id: &str) -> anyhow::Result<Option<Booking>> {
        Ok(self.lock()?.iter().find(|b| b.id == id).cloned())
    }

    async fn save(&self, booking: Booking) -> anyhow::Result<Booking> {
        let mut bookings = self.lock()?;
        anyhow::ensure!(
            !bookings.iter().any(|b| b.id == booking.id),
            "booking {} already exists",
            booking.id
        );
        bookings.push(booking.clone());
        Ok(booking)
    }

    async fn update(&self, booking: &Booking) -> anyhow::Result<bool> {
        let mut bookings = self.lock()?;
        match bookings.iter_mut().find(|b| b.id == booking.id) {
            Some(existing) => {
                *existing = booking.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct InMemoryUserStore {
    profile: Mutex<Option<UserProfile>>,
    payment_methods: Mutex<Vec<SavedPaymentMethod>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> anyhow::Error {
    anyhow::anyhow!("user store lock poisoned")
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get_profile(&self) -> anyhow::Result<Option<UserProfile>> {
        Ok(self.profile.lock().map_err(poisoned)?.clone())
    }

    async fn save_profile(&self, profile: &UserProfile) -> anyhow::Result<()> {
        *self.profile.lock().map_err(poisoned)? = Some(profile.clone());
        Ok(())
    }

    async fn list_payment_methods(&self) -> anyhow::Result<Vec<SavedPaymentMethod>> {
        Ok(self.payment_methods.lock().map_err(poisoned)?.clone())
    }

    async fn add_payment_method(&self, method: &SavedPaymentMethod) -> anyhow::Result<()> {
        self.payment_methods
            .lock()
            .map_err(poisoned)?
            .push(method.clone());
        Ok(())
    }
}
