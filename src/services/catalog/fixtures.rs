use async_trait::async_trait;
use rust_decimal::Decimal;

use super::{filter_services, CatalogProvider};
use crate::models::{Category, CategoryInfo, Service, ServiceFilter, ServiceOption};

const DEFAULT_SLOTS: &[&str] = &[
    "09:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00", "17:00", "18:00",
];

/// Catalog backed by the bundled reference data.
pub struct FixtureCatalog {
    services: Vec<Service>,
}

impl FixtureCatalog {
    pub fn new() -> Self {
        Self::with_services(services())
    }

    pub fn with_services(services: Vec<Service>) -> Self {
        Self { services }
    }
}

impl Default for FixtureCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogProvider for FixtureCatalog {
    async fn get_service_by_id(&self, id: &str) -> anyhow::Result<Option<Service>> {
        Ok(self.services.iter().find(|s| s.id == id).cloned())
    }

    async fn list_services(&self, filter: &ServiceFilter) -> anyhow::Result<Vec<Service>> {
        Ok(filter_services(self.services.clone(), filter))
    }

    async fn list_categories(&self) -> anyhow::Result<Vec<CategoryInfo>> {
        Ok(Category::ALL.into_iter().map(CategoryInfo::from).collect())
    }
}

fn option(id: &str, name: &str, price: i64, duration_minutes: u32) -> ServiceOption {
    ServiceOption {
        id: id.to_string(),
        name: name.to_string(),
        price: Decimal::new(price, 0),
        duration_minutes,
    }
}

fn standard_options() -> Vec<ServiceOption> {
    vec![
        option("basic", "Basic", 20, 30),
        option("premium", "Premium", 35, 45),
        option("complete", "Complete", 50, 60),
    ]
}

fn slots(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

pub fn services() -> Vec<Service> {
    vec![
        Service {
            id: "gym-iron".to_string(),
            name: "Iron Fitness Gym".to_string(),
            category: Category::Gym,
            location: "Av. Principal 123, Centro".to_string(),
            rating: 4.8,
            review_count: 120,
            options: standard_options(),
            time_slots: slots(DEFAULT_SLOTS),
        },
        Service {
            id: "clinic-salud".to_string(),
            name: "Clínica Salud Integral".to_string(),
            category: Category::Clinic,
            location: "Calle Reforma 45, Norte".to_string(),
            rating: 4.6,
            review_count: 89,
            options: vec![
                option("checkup", "General check-up", 40, 30),
                option("specialist", "Specialist visit", 75, 45),
            ],
            time_slots: slots(&["08:00", "09:00", "10:00", "11:00", "12:00", "16:00", "17:00"]),
        },
        Service {
            id: "salon-bella".to_string(),
            name: "Bella Hair Studio".to_string(),
            category: Category::Hair,
            location: "Plaza Centro, Local 8".to_string(),
            rating: 4.9,
            review_count: 214,
            options: vec![
                option("cut", "Haircut", 15, 30),
                option("color", "Color", 45, 90),
            ],
            time_slots: slots(DEFAULT_SLOTS),
        },
        Service {
            id: "spa-serena".to_string(),
            name: "Serena Day Spa".to_string(),
            category: Category::Spa,
            location: "Boulevard del Lago 9".to_string(),
            rating: 4.5,
            review_count: 64,
            options: vec![
                option("massage", "Relaxing massage", 60, 60),
                option("facial", "Facial", 45, 45),
            ],
            time_slots: slots(&["10:00", "12:00", "14:00", "16:00"]),
        },
        Service {
            id: "beauty-glow".to_string(),
            name: "Glow Beauty Bar".to_string(),
            category: Category::Beauty,
            location: "Calle Luna 17, Sur".to_string(),
            rating: 4.3,
            review_count: 37,
            options: vec![
                option("manicure", "Manicure", 18, 40),
                option("pedicure", "Pedicure", 22, 50),
            ],
            time_slots: slots(&["11:00", "13:00", "15:00", "17:00", "19:00"]),
        },
        Service {
            id: "gym-pulse".to_string(),
            name: "Pulse CrossTraining".to_string(),
            category: Category::Gym,
            location: "Av. Industrial 300".to_string(),
            rating: 4.1,
            review_count: 12,
            options: standard_options(),
            time_slots: Vec::new(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_service_by_id() {
        let catalog = FixtureCatalog::new();
        let svc = catalog.get_service_by_id("gym-iron").await.unwrap().unwrap();
        assert_eq!(svc.category, Category::Gym);
        assert_eq!(svc.time_slots.len(), 10);
        assert!(catalog.get_service_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_categories() {
        let catalog = FixtureCatalog::new();
        let categories = catalog.list_categories().await.unwrap();
        assert_eq!(categories.len(), Category::ALL.len());
    }

    #[test]
    fn test_fixture_invariants() {
        for svc in services() {
            assert!((0.0..=5.0).contains(&svc.rating), "{}", svc.id);
            assert!(!svc.options.is_empty(), "{}", svc.id);
            for opt in &svc.options {
                assert!(opt.price >= Decimal::ZERO);
                assert!(opt.duration_minutes > 0);
            }
            let mut sorted = svc.time_slots.clone();
            sorted.sort();
            assert_eq!(sorted, svc.time_slots, "{} slots must be ascending", svc.id);
        }
    }
}
