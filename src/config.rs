use std::env;

use rust_decimal::Decimal;

use crate::errors::AppError;
use crate::services::pricing::DEFAULT_TAX_RATE;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogSource {
    Fixtures,
    Http,
}

impl CatalogSource {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "fixtures" | "mock" => Some(CatalogSource::Fixtures),
            "http" => Some(CatalogSource::Http),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub catalog_source: CatalogSource,
    pub api_base_url: String,
    pub tax_rate: Decimal,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "citabook.db".to_string()),
            catalog_source: env::var("CATALOG_SOURCE")
                .ok()
                .and_then(|v| CatalogSource::parse(&v))
                .unwrap_or(CatalogSource::Fixtures),
            api_base_url: env::var("API_BASE_URL").unwrap_or_default(),
            tax_rate: env::var("TAX_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TAX_RATE),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.catalog_source == CatalogSource::Http && self.api_base_url.trim().is_empty() {
            return Err(AppError::Config(
                "API_BASE_URL must be set when CATALOG_SOURCE=http".to_string(),
            ));
        }
        if self.tax_rate < Decimal::ZERO {
            return Err(AppError::Config(format!(
                "TAX_RATE must not be negative, got {}",
                self.tax_rate
            )));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            database_url: ":memory:".to_string(),
            catalog_source: CatalogSource::Fixtures,
            api_base_url: String::new(),
            tax_rate: DEFAULT_TAX_RATE,
        }
    }
}
