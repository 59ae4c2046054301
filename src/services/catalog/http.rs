use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;

use super::{filter_services, CatalogProvider};
use crate::models::{CategoryInfo, Service, ServiceFilter};

/// Catalog served by a remote booking backend.
pub struct HttpCatalog {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCatalog {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `{base}/api/services/{id}` with the id as a single encoded segment.
    fn service_url(&self, id: &str) -> anyhow::Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .with_context(|| format!("invalid catalog base URL {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("catalog base URL cannot have a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(["api", "services", id]);
        Ok(url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("failed to call catalog API {path}"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("catalog API error ({status}) on {path}: {body}");
        }

        resp.json()
            .await
            .with_context(|| format!("failed to parse catalog response from {path}"))
    }
}

#[async_trait]
impl CatalogProvider for HttpCatalog {
    async fn get_service_by_id(&self, id: &str) -> anyhow::Result<Option<Service>> {
        let url = self.service_url(id)?;
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("failed to call catalog API {url}"))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("catalog API error ({status}) on {url}");
        }

        let service = resp
            .json()
            .await
            .context("failed to parse service from catalog API")?;
        Ok(Some(service))
    }

    async fn list_services(&self, filter: &ServiceFilter) -> anyhow::Result<Vec<Service>> {
        let services: Vec<Service> = self.get_json("/api/services").await?;
        tracing::debug!(count = services.len(), "fetched services from catalog API");
        Ok(filter_services(services, filter))
    }

    async fn list_categories(&self) -> anyhow::Result<Vec<CategoryInfo>> {
        self.get_json("/api/categories").await
    }
}
