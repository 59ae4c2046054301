use std::sync::{Arc, Mutex};

use crate::config::{AppConfig, CatalogSource};
use crate::db;
use crate::services::bookings::BookingService;
use crate::services::catalog::fixtures::FixtureCatalog;
use crate::services::catalog::http::HttpCatalog;
use crate::services::catalog::CatalogProvider;
use crate::services::clock::SystemClock;
use crate::services::pricing::PriceCalculator;
use crate::services::profile::ProfileService;
use crate::services::store::sqlite::{SqliteBookingStore, SqliteUserStore};

pub struct AppState {
    pub config: AppConfig,
    pub bookings: BookingService,
    pub profiles: ProfileService,
}

impl AppState {
    /// Wires the catalog named by the config, the SQLite stores and the system clock.
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let catalog: Arc<dyn CatalogProvider> = match config.catalog_source {
            CatalogSource::Http => {
                tracing::info!("using HTTP catalog (url: {})", config.api_base_url);
                Arc::new(HttpCatalog::new(config.api_base_url.clone()))
            }
            CatalogSource::Fixtures => {
                tracing::info!("using fixture catalog");
                Arc::new(FixtureCatalog::new())
            }
        };
        let conn = Arc::new(Mutex::new(db::init_db(&config.database_url)?));
        let clock = Arc::new(SystemClock);

        let bookings = BookingService::new(
            catalog,
            Arc::new(SqliteBookingStore::new(conn.clone())),
            clock.clone(),
            PriceCalculator::new(config.tax_rate),
        );
        let profiles = ProfileService::new(Arc::new(SqliteUserStore::new(conn)), clock);

        Ok(Self {
            config,
            bookings,
            profiles,
        })
    }
}
