//! HTTP client for the warehouse stock-lookup API.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::StockError;
use crate::types::{StockEntry, StockLookupResponse};

/// Client for SKU/barcode lookups against the logistics provider.
///
/// The provider enforces its own rate limits; callers bound their request
/// fan-out (see `enrich`) rather than relying on this client to queue.
pub struct StockClient {
    client: Client,
    base_url: Url,
    username: String,
    password: String,
}

impl StockClient {
    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StockError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`StockError::InvalidBaseUrl`] if the
    /// configured base URL does not parse.
    pub fn new(config: &binsight_core::AppConfig) -> Result<Self, StockError> {
        Self::with_base_url(
            &config.stock_api_base_url,
            &config.stock_api_username,
            &config.stock_api_password,
            config.request_timeout_secs,
        )
    }

    /// Creates a client against an explicit base URL (for tests with a mock
    /// server).
    ///
    /// # Errors
    ///
    /// Returns [`StockError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`StockError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        base_url: &str,
        username: &str,
        password: &str,
        timeout_secs: u64,
    ) -> Result<Self, StockError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("binsight/0.1 (warehouse-inventory)")
            .build()?;

        // One trailing slash so join() appends instead of replacing the last
        // path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| StockError::InvalidBaseUrl {
            base_url: normalised.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            username: username.to_owned(),
            password: password.to_owned(),
        })
    }

    /// Looks up warehouse data by SKU. Returns the first result entry, or
    /// `None` when the provider knows nothing about the code.
    ///
    /// # Errors
    ///
    /// - [`StockError::UnexpectedStatus`] — non-2xx response.
    /// - [`StockError::Http`] — network or TLS failure.
    /// - [`StockError::Deserialize`] — body does not match the envelope.
    pub async fn lookup_by_sku(&self, sku: &str) -> Result<Option<StockEntry>, StockError> {
        self.lookup("getProductInfoBySKU", "sku", sku).await
    }

    /// Looks up warehouse data by barcode (UPC).
    ///
    /// # Errors
    ///
    /// Same as [`Self::lookup_by_sku`].
    pub async fn lookup_by_barcode(
        &self,
        barcode: &str,
    ) -> Result<Option<StockEntry>, StockError> {
        self.lookup("getProductInfoByBarcode", "barcode", barcode).await
    }

    async fn lookup(
        &self,
        endpoint: &str,
        param: &str,
        code: &str,
    ) -> Result<Option<StockEntry>, StockError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| StockError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        let lookup_type = if param == "barcode" { "upc" } else { "sku" };
        url.query_pairs_mut()
            .append_pair(param, code)
            .append_pair("type", lookup_type);

        let response = self
            .client
            .get(url.clone())
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StockError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: StockLookupResponse =
            serde_json::from_str(&body).map_err(|e| StockError::Deserialize {
                context: format!("{endpoint}({param}={code})"),
                source: e,
            })?;

        Ok(parsed.data.into_iter().next())
    }
}
