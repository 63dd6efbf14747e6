//! HTTP client for the fleet REST API.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    Client, RequestBuilder,
};
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::Entity,
    protocol::{PageRequest, SearchResponse},
};
use tracing::{debug, error};

use crate::error::FetchError;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8080/api";

/// The three read endpoints every entity collection exposes.
#[async_trait]
pub trait EntityApi<E: Entity>: Send + Sync {
    async fn fetch_list(&self, page: PageRequest) -> Result<Vec<E>, FetchError>;
    async fn search(&self, term: &str, page: PageRequest)
        -> Result<SearchResponse<E>, FetchError>;
    /// Asks the server to reload its dataset and returns the reloaded list.
    async fn refresh(&self) -> Result<Vec<E>, FetchError>;
}

#[derive(Debug, Serialize)]
struct SearchQuery<'a> {
    term: &'a str,
    page: u32,
    size: u32,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = Client::builder()
            .default_headers(headers)
            .build()
            .context("failed to build http client")?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, endpoint: &str) -> RequestBuilder {
        self.http.get(format!("{}{endpoint}", self.base_url))
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<T, FetchError> {
        debug!(endpoint, "api request");
        let result: Result<T, reqwest::Error> = async {
            request
                .send()
                .await?
                .error_for_status()?
                .json()
                .await
        }
        .await;

        result.map_err(|err| {
            error!(endpoint, error = %err, "api request failed");
            FetchError::new(endpoint, err)
        })
    }
}

#[async_trait]
impl<E: Entity> EntityApi<E> for ApiClient {
    async fn fetch_list(&self, page: PageRequest) -> Result<Vec<E>, FetchError> {
        let endpoint = format!("/{}", E::KIND.plural());
        let request = self.get(&endpoint).query(&page);
        self.execute(&endpoint, request).await
    }

    async fn search(
        &self,
        term: &str,
        page: PageRequest,
    ) -> Result<SearchResponse<E>, FetchError> {
        let endpoint = format!("/{}/search", E::KIND.plural());
        let request = self.get(&endpoint).query(&SearchQuery {
            term,
            page: page.page,
            size: page.size,
        });
        self.execute(&endpoint, request).await
    }

    async fn refresh(&self) -> Result<Vec<E>, FetchError> {
        let endpoint = format!("/{}/refresh", E::KIND.plural());
        let request = self.get(&endpoint);
        self.execute(&endpoint, request).await
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
