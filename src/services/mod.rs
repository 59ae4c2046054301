pub mod availability;
pub mod bookings;
pub mod catalog;
pub mod classifier;
pub mod clock;
pub mod pricing;
pub mod profile;
pub mod scheduling;
pub mod store;
pub mod validation;
