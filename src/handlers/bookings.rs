use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{Booking, BookingRequest};
use crate::services::classifier::ClassifiedBookings;
use crate::services::pricing::PriceOptions;
use crate::state::AppState;

// GET /api/bookings
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClassifiedBookings>, AppError> {
    Ok(Json(state.bookings.user_bookings().await?))
}

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let Json(request) = payload?;
    let booking = state.bookings.create_booking(&request).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(state.bookings.get_booking(&id).await?))
}

// PUT /api/bookings/:id/cancel
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(state.bookings.cancel_booking(&id).await?))
}

// PUT /api/bookings/:id/complete
pub async fn complete_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(state.bookings.complete_booking(&id).await?))
}

// PUT /api/bookings/:id/reschedule
#[derive(Debug, Deserialize)]
pub struct RescheduleRequest {
    pub date: String,
    pub time: String,
}

pub async fn reschedule_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<RescheduleRequest>, JsonRejection>,
) -> Result<Json<Booking>, AppError> {
    let Json(payload) = payload?;
    let booking = state
        .bookings
        .reschedule_booking(&id, &payload.date, &payload.time)
        .await?;
    Ok(Json(booking))
}

// POST /api/quote
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub service_id: String,
    pub option_id: String,
    pub discount_fraction: Option<Decimal>,
    #[serde(default)]
    pub include_tax: bool,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub total: Decimal,
}

pub async fn quote(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Json<QuoteResponse>, AppError> {
    let Json(payload) = payload?;
    let options = PriceOptions {
        discount_fraction: payload.discount_fraction,
        include_tax: payload.include_tax,
    };
    let total = state
        .bookings
        .quote(&payload.service_id, &payload.option_id, &options)
        .await?;
    Ok(Json(QuoteResponse { total }))
}
