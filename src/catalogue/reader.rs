//! Blocking HTTP fetch of catalogue tables
//!
//! One GET per call, no retries and no pooling across readers. The whole
//! body is read before parsing starts.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, info};

use super::error::{CatalogueError, CatalogueResult};
use super::sources::CatalogueSource;
use super::table::{parse_table, CatalogueQuery, CatalogueTable};

pub struct CatalogueReader {
    client: Client,
}

impl CatalogueReader {
    /// Reader whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> CatalogueResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CatalogueError::Client)?;
        Ok(Self { client })
    }

    /// Reader over a preconfigured client (proxy, TLS or timeout settings)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// GET `url` and return the body as text
    pub fn fetch_text(&self, url: &str) -> CatalogueResult<String> {
        info!(url, "fetching catalogue");

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| CatalogueError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogueError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(|source| CatalogueError::Body {
            url: url.to_string(),
            source,
        })?;

        debug!(url, bytes = body.len(), "catalogue body received");
        Ok(body)
    }

    /// Fetch `url` and extract the columns selected by `query`
    pub fn read(&self, url: &str, query: &CatalogueQuery) -> CatalogueResult<CatalogueTable> {
        let body = self.fetch_text(url)?;
        parse_table(&body, query)
    }

    pub fn read_source(
        &self,
        source: &CatalogueSource,
        query: &CatalogueQuery,
    ) -> CatalogueResult<CatalogueTable> {
        self.read(&source.url(), query)
    }
}
