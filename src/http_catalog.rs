//! REST client implementation of [`CatalogService`].
//!
//! # Endpoints
//!
//! All paths are relative to `[catalog].base_url`:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | person lookup | `GET /actor/{name}` |
//! | title lookup | `GET /movie/{title}` |
//! | catalog page | `GET /movie/pages?page={n}` |
//! | category list | `GET /movie/generes` |
//! | category items | `GET /movie/genere/id/{id}` |
//! | external search | `GET /movie/import/{query}` |
//! | confirm import | `GET /movie/import/{query}/number/{ordinal}` |
//!
//! Path segments are percent-encoded; the `+` separator of normalized
//! import queries passes through untouched. When a token is configured it
//! is sent as a bearer `Authorization` header. Any non-2xx status becomes
//! an error carrying the status and response body.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use movie_scout_core::catalog::CatalogService;
use movie_scout_core::models::{Candidate, CatalogItem, Category, ExternalTitle, Person};

use crate::config::CatalogConfig;

pub struct HttpCatalog {
    client: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl HttpCatalog {
    /// Builds a client for `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or cannot carry a
    /// path, or if the HTTP client cannot be constructed.
    pub fn new(config: &CatalogConfig, token: Option<String>) -> Result<Self> {
        let base = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid catalog.base_url: {}", config.base_url))?;
        if base.cannot_be_a_base() {
            bail!("catalog.base_url cannot carry a path: {}", config.base_url);
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base,
            token,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("catalog.base_url cannot carry a path: {}", self.base))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(%url, "catalog request");
        let mut request = self.client.get(url.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Catalog API error {} for {}: {}", status, url, body);
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Invalid response body from {}", url))
    }
}

#[async_trait]
impl CatalogService for HttpCatalog {
    async fn find_person_by_name(&self, name: &str) -> Result<Vec<Candidate>> {
        let people: Vec<Person> = self.get_json(self.endpoint(&["actor", name])?).await?;
        Ok(people.into_iter().map(Candidate::Person).collect())
    }

    async fn find_title_by_name(&self, text: &str) -> Result<Vec<Candidate>> {
        let titles: Vec<CatalogItem> = self.get_json(self.endpoint(&["movie", text])?).await?;
        Ok(titles.into_iter().map(Candidate::Title).collect())
    }

    async fn fetch_catalog_page(&self, page: u32) -> Result<Vec<CatalogItem>> {
        let mut url = self.endpoint(&["movie", "pages"])?;
        url.query_pairs_mut().append_pair("page", &page.to_string());
        self.get_json(url).await
    }

    async fn fetch_category_list(&self) -> Result<Vec<Category>> {
        self.get_json(self.endpoint(&["movie", "generes"])?).await
    }

    async fn fetch_items_by_category(&self, id: i64) -> Result<Vec<CatalogItem>> {
        let id = id.to_string();
        self.get_json(self.endpoint(&["movie", "genere", "id", &id])?).await
    }

    async fn search_external_title(&self, query: &str) -> Result<Vec<ExternalTitle>> {
        self.get_json(self.endpoint(&["movie", "import", query])?).await
    }

    async fn confirm_import(&self, query: &str, ordinal: usize) -> Result<bool> {
        let ordinal = ordinal.to_string();
        self.get_json(self.endpoint(&["movie", "import", query, "number", &ordinal])?)
            .await
    }
}
