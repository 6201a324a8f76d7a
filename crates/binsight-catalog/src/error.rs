use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("catalog platform error: {0}")]
    Api(String),

    #[error("export request rejected by platform: {message}")]
    RequestRejected { message: String },

    #[error("export job {id} ended in {status} (code: {code})")]
    JobFailed {
        id: String,
        status: String,
        code: String,
    },

    #[error("export job {id} did not complete within {attempts} polls")]
    JobTimeout { id: String, attempts: u32 },

    #[error("export job {id} completed without a download URL")]
    MissingDownloadUrl { id: String },

    #[error("malformed export record on line {line}: {source}")]
    MalformedRecord {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("sync cancelled")]
    Cancelled,
}
