pub mod booking;
pub mod service;
pub mod user;

pub use booking::{
    Booking, BookingRequest, BookingStatus, ContactInfo, ContactRequest, PaymentDetails,
    PaymentMethod,
};
pub use service::{Category, CategoryInfo, Service, ServiceFilter, ServiceOption};
pub use user::{ProfileUpdate, SavedPaymentMethod, UserProfile};
