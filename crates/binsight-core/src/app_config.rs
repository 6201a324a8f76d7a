use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Per-run application configuration, built from environment variables.
///
/// Every component receives the values it needs at construction time; nothing
/// reads the process environment after startup.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Shopify shop domain, e.g. `my-store.myshopify.com`.
    pub shop_domain: String,
    /// Shopify Admin API version segment, e.g. `2024-10`.
    pub shopify_api_version: String,
    pub shopify_admin_token: String,
    /// Base URL of the warehouse stock-lookup API.
    pub stock_api_base_url: String,
    pub stock_api_username: String,
    pub stock_api_password: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Seconds between bulk-export status polls.
    pub export_poll_interval_secs: u64,
    /// Maximum number of status polls before the export is declared timed out.
    pub export_max_poll_attempts: u32,
    /// Maximum number of stock lookups in flight at once.
    pub enrich_concurrency: usize,
    /// Number of product rows written per persistence batch.
    pub persist_batch_size: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("shop_domain", &self.shop_domain)
            .field("shopify_api_version", &self.shopify_api_version)
            .field("shopify_admin_token", &"[redacted]")
            .field("stock_api_base_url", &self.stock_api_base_url)
            .field("stock_api_username", &self.stock_api_username)
            .field("stock_api_password", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field(
                "export_poll_interval_secs",
                &self.export_poll_interval_secs,
            )
            .field(
                "export_max_poll_attempts",
                &self.export_max_poll_attempts,
            )
            .field("enrich_concurrency", &self.enrich_concurrency)
            .field("persist_batch_size", &self.persist_batch_size)
            .finish()
    }
}

impl AppConfig {
    /// Returns the Shopify Admin GraphQL endpoint for the configured shop.
    #[must_use]
    pub fn shopify_graphql_url(&self) -> String {
        format!(
            "https://{}/admin/api/{}/graphql.json",
            self.shop_domain, self.shopify_api_version
        )
    }
}
