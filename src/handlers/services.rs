use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{Category, CategoryInfo, Service, ServiceFilter};
use crate::services::catalog::featured_services;
use crate::state::AppState;

// GET /api/categories
pub async fn get_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CategoryInfo>>, AppError> {
    let categories = state
        .bookings
        .catalog()
        .list_categories()
        .await
        .map_err(AppError::Upstream)?;
    Ok(Json(categories))
}

// GET /api/services
#[derive(Debug, Default, Deserialize)]
pub struct ServicesQuery {
    pub category: Option<String>,
    pub min_rating: Option<f32>,
    pub max_price: Option<String>,
    pub query: Option<String>,
}

impl ServicesQuery {
    fn into_filter(self) -> Result<ServiceFilter, AppError> {
        let category = match self.category.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(c) if c.eq_ignore_ascii_case("all") => None,
            Some(c) => Some(
                Category::parse(c)
                    .ok_or_else(|| AppError::BadRequest(format!("unknown category: {c}")))?,
            ),
        };
        let max_price = self
            .max_price
            .as_deref()
            .map(|p| {
                p.trim()
                    .parse::<Decimal>()
                    .map_err(|_| AppError::BadRequest(format!("invalid max_price: {p}")))
            })
            .transpose()?;

        Ok(ServiceFilter {
            category,
            min_rating: self.min_rating,
            max_price,
            query: self.query,
        })
    }
}

pub async fn list_services(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ServicesQuery>,
) -> Result<Json<Vec<Service>>, AppError> {
    let filter = query.into_filter()?;
    let services = state
        .bookings
        .catalog()
        .list_services(&filter)
        .await
        .map_err(AppError::Upstream)?;
    Ok(Json(services))
}

// GET /api/services/featured
pub async fn featured(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Service>>, AppError> {
    let services = state
        .bookings
        .catalog()
        .list_services(&ServiceFilter::default())
        .await
        .map_err(AppError::Upstream)?;
    Ok(Json(featured_services(services)))
}

// GET /api/services/:id
pub async fn get_service(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Service>, AppError> {
    state
        .bookings
        .catalog()
        .get_service_by_id(&id)
        .await
        .map_err(AppError::Upstream)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("service {id}")))
}

// GET /api/services/:id/availability?date=YYYY-MM-DD
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: String,
}

pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<String>>, AppError> {
    let slots = state.bookings.available_slots(&id, &query.date).await?;
    Ok(Json(slots))
}
