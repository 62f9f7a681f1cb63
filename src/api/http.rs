//! Implements the `Source` trait with a `reqwest` client against the sales data service.

use crate::api::{Query, Source};
use crate::model::Records;
use crate::{Config, Result};
use anyhow::{bail, Context};
use tracing::{debug, trace};
use url::Url;

/// Longest slice of an error response body that is repeated in the error message.
const MAX_ERROR_BODY: usize = 200;

/// Fetches records with a single `GET` per query. There is no retry and no pagination.
pub(crate) struct HttpSource {
    client: reqwest::Client,
    base_url: Url,
    region_param: String,
    year_param: String,
}

impl HttpSource {
    pub(crate) fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Unable to create the HTTP client")?;
        Ok(Self {
            client,
            base_url: config.base_url().clone(),
            region_param: config.region_param().to_string(),
            year_param: config.year_param().to_string(),
        })
    }
}

#[async_trait::async_trait]
impl Source for HttpSource {
    async fn get(&mut self, query: &Query) -> Result<Records> {
        let params = query.params(&self.region_param, &self.year_param);
        debug!("GET {} with {params:?}", self.base_url);

        let response = self
            .client
            .get(self.base_url.clone())
            .query(&params)
            .send()
            .await
            .with_context(|| format!("Failed to fetch sales records from {}", self.base_url))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read the sales records response body")?;
        trace!("Received {} bytes with status {status}", body.len());

        if !status.is_success() {
            let snippet: String = body.chars().take(MAX_ERROR_BODY).collect();
            bail!("The sales data service responded with {status}: {snippet}");
        }

        Records::from_json(&body)
    }
}
