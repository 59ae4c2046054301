use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Gym,
    Clinic,
    Beauty,
    Spa,
    Hair,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Gym,
        Category::Clinic,
        Category::Beauty,
        Category::Spa,
        Category::Hair,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Gym => "gym",
            Category::Clinic => "clinic",
            Category::Beauty => "beauty",
            Category::Spa => "spa",
            Category::Hair => "hair",
            Category::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Gym => "Gyms",
            Category::Clinic => "Clinics",
            Category::Beauty => "Beauty",
            Category::Spa => "Spa",
            Category::Hair => "Hair salons",
            Category::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryInfo {
    pub id: Category,
    pub name: String,
}

impl From<Category> for CategoryInfo {
    fn from(category: Category) -> Self {
        Self {
            id: category,
            name: category.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceOption {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub duration_minutes: u32,
}

/// A bookable provider. Reference data: the booking flow only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub location: String,
    pub rating: f32,
    pub review_count: u32,
    pub options: Vec<ServiceOption>,
    /// Canonical opening slots as "HH:MM", in the order they are offered.
    pub time_slots: Vec<String>,
}

impl Service {
    pub fn option(&self, option_id: &str) -> Option<&ServiceOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    pub fn min_price(&self) -> Option<Decimal> {
        self.options.iter().map(|o| o.price).min()
    }
}

/// Catalog filter. Every field that is `None` matches everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceFilter {
    pub category: Option<Category>,
    pub min_rating: Option<f32>,
    pub max_price: Option<Decimal>,
    pub query: Option<String>,
}
