//! Page resolution for the save pipeline.
//!
//! Two network operations, both best-effort: following redirects to the
//! canonical URL (metadata-only HEAD request) and downloading a page body
//! for title extraction. Abstracted behind [`PageResolverTrait`] so the
//! pipeline can be driven by a stub in tests.

use std::time::Duration;

use crate::types::errors::ResolveError;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Trait defining the network operations the save pipeline depends on.
#[allow(async_fn_in_trait)]
pub trait PageResolverTrait {
    /// Follows redirects without downloading the body; returns the final URL.
    async fn final_url(&self, url: &str) -> Result<String, ResolveError>;
    /// Downloads the body of an already-resolved URL.
    async fn page_body(&self, url: &str) -> Result<String, ResolveError>;
}

/// Resolver backed by an HTTP client with a fixed request timeout.
pub struct HttpPageResolver {
    client: reqwest::Client,
}

impl HttpPageResolver {
    pub fn new() -> Result<Self, ResolveError> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| ResolveError::NetworkError(e.to_string()))?;
        Ok(Self { client })
    }
}

impl PageResolverTrait for HttpPageResolver {
    async fn final_url(&self, url: &str) -> Result<String, ResolveError> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| ResolveError::NetworkError(e.to_string()))?;
        Ok(response.url().to_string())
    }

    async fn page_body(&self, url: &str) -> Result<String, ResolveError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ResolveError::NetworkError(e.to_string()))?;
        response
            .text()
            .await
            .map_err(|e| ResolveError::NetworkError(e.to_string()))
    }
}
