//! HTTP client for the Shopify Admin GraphQL bulk-export surface.
//!
//! A bulk export is asynchronous on the platform side: `start_bulk_export`
//! submits the query and returns an operation id immediately, and
//! `await_completion` polls the current operation on a fixed interval until a
//! terminal state, bounded by a maximum attempt count so a stuck job becomes
//! a typed timeout instead of an endless wait.

use std::time::Duration;

use reqwest::{Client, Url};
use tokio_util::sync::CancellationToken;

use crate::error::CatalogError;
use crate::types::{BulkOperation, BulkOperationRunQueryPayload, JobStatus};

/// The fixed field selection for the export: active products with their
/// variants and the committed quantity of each variant's inventory levels.
const BULK_EXPORT_MUTATION: &str = r#"
mutation {
  bulkOperationRunQuery(
    query: """
    {
      products(query: "status:active") {
        edges {
          node {
            id
            title
            vendor
            productType
            updatedAt
            featuredImage { url }
            variants {
              edges {
                node {
                  id
                  title
                  sku
                  barcode
                  inventoryQuantity
                  inventoryItem {
                    id
                    inventoryLevels {
                      edges {
                        node {
                          id
                          quantities(names: ["committed"]) { name quantity }
                        }
                      }
                    }
                  }
                }
              }
            }
          }
        }
      }
    }
    """
  ) {
    bulkOperation { id status }
    userErrors { field message }
  }
}
"#;

const CURRENT_OPERATION_QUERY: &str =
    "query { currentBulkOperation { id status errorCode url } }";

/// Client for starting, polling, and downloading catalog bulk exports.
pub struct CatalogClient {
    client: Client,
    endpoint: Url,
    access_token: String,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

impl CatalogClient {
    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`CatalogError::Api`] if the configured
    /// shop domain does not form a valid URL.
    pub fn new(config: &binsight_core::AppConfig) -> Result<Self, CatalogError> {
        Self::with_endpoint(
            &config.shopify_graphql_url(),
            &config.shopify_admin_token,
            config.request_timeout_secs,
            Duration::from_secs(config.export_poll_interval_secs),
            config.export_max_poll_attempts,
        )
    }

    /// Creates a client against an explicit GraphQL endpoint (for tests with
    /// a mock server, and for the poll interval override they need).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`CatalogError::Api`] if `endpoint` is not
    /// a valid URL.
    pub fn with_endpoint(
        endpoint: &str,
        access_token: &str,
        timeout_secs: u64,
        poll_interval: Duration,
        max_poll_attempts: u32,
    ) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("binsight/0.1 (warehouse-inventory)")
            .build()?;

        let endpoint = Url::parse(endpoint)
            .map_err(|e| CatalogError::Api(format!("invalid catalog endpoint '{endpoint}': {e}")))?;

        Ok(Self {
            client,
            endpoint,
            access_token: access_token.to_owned(),
            poll_interval,
            max_poll_attempts,
        })
    }

    /// Starts a bulk export of active products and returns the platform's
    /// operation id.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::RequestRejected`] — the platform reported field-level
    ///   validation errors; the first message is surfaced.
    /// - [`CatalogError::Api`] — GraphQL-level errors or a missing payload.
    /// - [`CatalogError::Http`] / [`CatalogError::Deserialize`] — transport
    ///   or body-shape failures.
    pub async fn start_bulk_export(&self) -> Result<String, CatalogError> {
        let body = self.graphql(BULK_EXPORT_MUTATION).await?;

        let payload = body
            .get("data")
            .and_then(|d| d.get("bulkOperationRunQuery"))
            .cloned()
            .ok_or_else(|| CatalogError::Api("missing bulkOperationRunQuery payload".into()))?;

        let payload: BulkOperationRunQueryPayload = serde_json::from_value(payload)
            .map_err(|e| CatalogError::Deserialize {
                context: "bulkOperationRunQuery".to_owned(),
                source: e,
            })?;

        if let Some(rejection) = payload.user_errors.first() {
            return Err(CatalogError::RequestRejected {
                message: rejection.message.clone(),
            });
        }

        let operation = payload
            .bulk_operation
            .ok_or_else(|| CatalogError::Api("platform returned no bulkOperation".into()))?;

        tracing::info!(job_id = %operation.id, "bulk export started");
        Ok(operation.id)
    }

    /// Polls the current bulk operation on a fixed interval until a terminal
    /// state, returning the temporary download URL on success.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::JobFailed`] — the job ended in `FAILED`, `CANCELED`,
    ///   or `EXPIRED`, with the platform error code when present.
    /// - [`CatalogError::JobTimeout`] — no terminal state within the
    ///   configured maximum attempt count.
    /// - [`CatalogError::MissingDownloadUrl`] — `COMPLETED` with no URL.
    /// - [`CatalogError::Cancelled`] — the cancellation token fired while
    ///   waiting between polls.
    pub async fn await_completion(
        &self,
        job_id: &str,
        cancel: &CancellationToken,
    ) -> Result<String, CatalogError> {
        for attempt in 1..=self.max_poll_attempts {
            let operation = self.current_bulk_operation().await?;
            if operation.id != job_id {
                tracing::debug!(
                    expected = job_id,
                    reported = %operation.id,
                    "current bulk operation id differs from the one we started"
                );
            }

            if operation.status.is_terminal() {
                return Self::resolve_terminal(job_id, operation);
            }

            tracing::debug!(
                attempt,
                max_attempts = self.max_poll_attempts,
                status = operation.status.as_str(),
                "export still running"
            );

            tokio::select! {
                () = cancel.cancelled() => return Err(CatalogError::Cancelled),
                () = tokio::time::sleep(self.poll_interval) => {}
            }
        }

        Err(CatalogError::JobTimeout {
            id: job_id.to_owned(),
            attempts: self.max_poll_attempts,
        })
    }

    /// Downloads the completed export stream from its temporary URL.
    ///
    /// The URL is pre-signed by the platform; no auth header is sent.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] on transport failure or non-2xx status.
    pub async fn download_export(&self, url: &str) -> Result<String, CatalogError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    fn resolve_terminal(
        job_id: &str,
        operation: BulkOperation,
    ) -> Result<String, CatalogError> {
        match operation.status {
            JobStatus::Completed => operation.url.ok_or_else(|| CatalogError::MissingDownloadUrl {
                id: job_id.to_owned(),
            }),
            status => Err(CatalogError::JobFailed {
                id: job_id.to_owned(),
                status: status.as_str().to_owned(),
                code: operation
                    .error_code
                    .unwrap_or_else(|| status.as_str().to_owned()),
            }),
        }
    }

    async fn current_bulk_operation(&self) -> Result<BulkOperation, CatalogError> {
        let body = self.graphql(CURRENT_OPERATION_QUERY).await?;
        let operation = body
            .get("data")
            .and_then(|d| d.get("currentBulkOperation"))
            .cloned()
            .ok_or_else(|| CatalogError::Api("missing currentBulkOperation payload".into()))?;

        serde_json::from_value(operation).map_err(|e| CatalogError::Deserialize {
            context: "currentBulkOperation".to_owned(),
            source: e,
        })
    }

    /// Sends one GraphQL request and returns the parsed body after checking
    /// the top-level `errors` array.
    async fn graphql(&self, query: &str) -> Result<serde_json::Value, CatalogError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("X-Shopify-Access-Token", &self.access_token)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await?
            .error_for_status()?;

        let text = response.text().await?;
        let body: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| CatalogError::Deserialize {
                context: "graphql response".to_owned(),
                source: e,
            })?;

        if let Some(message) = body
            .get("errors")
            .and_then(|e| e.as_array())
            .and_then(|errors| errors.first())
            .and_then(|e| e.get("message"))
            .and_then(serde_json::Value::as_str)
        {
            return Err(CatalogError::Api(message.to_owned()));
        }

        Ok(body)
    }
}
