pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{Booking, SavedPaymentMethod, UserProfile};

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Every booking of `service_id` on `date`, whatever its status.
    async fn list_bookings(&self, service_id: &str, date: NaiveDate) -> anyhow::Result<Vec<Booking>>;
    async fn list_all(&self) -> anyhow::Result<Vec<Booking>>;
    async fn get(&self, id: &str) -> anyhow::Result<Option<Booking>>;
    async fn save(&self, booking: Booking) -> anyhow::Result<Booking>;
    /// Returns false when no booking has that id.
    async fn update(&self, booking: &Booking) -> anyhow::Result<bool>;
}

/// Profile and saved payment methods of the single app user.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_profile(&self) -> anyhow::Result<Option<UserProfile>>;
    async fn save_profile(&self, profile: &UserProfile) -> anyhow::Result<()>;
    /// Oldest first.
    async fn list_payment_methods(&self) -> anyhow::Result<Vec<SavedPaymentMethod>>;
    async fn add_payment_method(&self, method: &SavedPaymentMethod) -> anyhow::Result<()>;
}
