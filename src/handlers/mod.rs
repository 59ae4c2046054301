pub mod bookings;
pub mod health;
pub mod services;
pub mod user;

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/categories", get(services::get_categories))
        .route("/api/services", get(services::list_services))
        .route("/api/services/featured", get(services::featured))
        .route("/api/services/:id", get(services::get_service))
        .route(
            "/api/services/:id/availability",
            get(services::get_availability),
        )
        .route(
            "/api/bookings",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route("/api/bookings/:id", get(bookings::get_booking))
        .route("/api/bookings/:id/cancel", put(bookings::cancel_booking))
        .route(
            "/api/bookings/:id/complete",
            put(bookings::complete_booking),
        )
        .route(
            "/api/bookings/:id/reschedule",
            put(bookings::reschedule_booking),
        )
        .route("/api/quote", post(bookings::quote))
        .route(
            "/api/user/profile",
            get(user::get_profile).put(user::update_profile),
        )
        .route(
            "/api/user/payment-methods",
            get(user::list_payment_methods).post(user::add_payment_method),
        )
        .with_state(state)
}
