pub mod fixtures;
pub mod http;

use std::cmp::Ordering;

use async_trait::async_trait;

use crate::models::{CategoryInfo, Service, ServiceFilter};

#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn get_service_by_id(&self, id: &str) -> anyhow::Result<Option<Service>>;
    async fn list_services(&self, filter: &ServiceFilter) -> anyhow::Result<Vec<Service>>;
    async fn list_categories(&self) -> anyhow::Result<Vec<CategoryInfo>>;
}

pub fn filter_services(services: Vec<Service>, filter: &ServiceFilter) -> Vec<Service> {
    let query = filter
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    services
        .into_iter()
        .filter(|s| filter.category.map_or(true, |c| s.category == c))
        .filter(|s| filter.min_rating.map_or(true, |r| s.rating >= r))
        .filter(|s| {
            filter
                .max_price
                .map_or(true, |max| s.min_price().is_some_and(|p| p <= max))
        })
        .filter(|s| {
            query.as_deref().map_or(true, |q| {
                s.name.to_lowercase().contains(q) || s.location.to_lowercase().contains(q)
            })
        })
        .collect()
}

/// The three best-rated services, highest first.
pub fn featured_services(mut services: Vec<Service>) -> Vec<Service> {
    services.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal));
    services.truncate(3);
    services
}
