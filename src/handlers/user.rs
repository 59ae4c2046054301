use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::errors::AppError;
use crate::models::{PaymentDetails, ProfileUpdate, SavedPaymentMethod, UserProfile};
use crate::state::AppState;

// GET /api/user/profile
pub async fn get_profile(State(state): State<Arc<AppState>>) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(state.profiles.get_profile().await?))
}

// PUT /api/user/profile
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Json<UserProfile>, AppError> {
    let Json(update) = payload?;
    Ok(Json(state.profiles.update_profile(&update).await?))
}

// GET /api/user/payment-methods
pub async fn list_payment_methods(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SavedPaymentMethod>>, AppError> {
    Ok(Json(state.profiles.payment_methods().await?))
}

// POST /api/user/payment-methods
pub async fn add_payment_method(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PaymentDetails>, JsonRejection>,
) -> Result<(StatusCode, Json<SavedPaymentMethod>), AppError> {
    let Json(details) = payload?;
    let saved = state.profiles.add_payment_method(&details).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}
