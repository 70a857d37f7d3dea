use thiserror::Error;

/// Errors returned by the Google Maps web-service client.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    /// The service answered with a `status` other than `OK`, `ZERO_RESULTS`,
    /// or `NOT_FOUND`.
    #[error("Google Maps API error {status}: {}", message.as_deref().unwrap_or("no message"))]
    ApiError {
        status: String,
        message: Option<String>,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL could not be parsed.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
