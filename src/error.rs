use thiserror::Error;

/// Convenience result type for sheet operations.
pub type SheetResult<T> = Result<T, SheetError>;

/// Error type returned by the upstream client and the service layer.
///
/// Malformed cell values never surface here: the classification and normalization core degrades
/// them to fallback values instead.
#[derive(Debug, Error)]
pub enum SheetError {
    /// No API key configured. Raised before any upstream call is made.
    #[error("API key is required. Configure the data source with a valid API key.")]
    MissingApiKey,

    /// The host-supplied settings could not be decoded.
    #[error("invalid settings: {message}")]
    InvalidSettings { message: String },

    /// The request itself is unusable (e.g. a missing sheet id).
    #[error("bad request: {message}")]
    BadRequest { message: String },

    /// Transport-level failure talking to the upstream API (connect, timeout, TLS, ...).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream API answered with a non-success status.
    #[error("upstream api: {method} {path} returned {body} ({status})")]
    Upstream {
        method: String,
        path: String,
        status: u16,
        body: String,
    },

    /// The upstream API answered with a payload that is not the expected JSON envelope.
    #[error("failed to decode upstream response for {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl SheetError {
    /// Transport status the request-handling layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingApiKey | Self::BadRequest { .. } => 400,
            Self::Http(_) | Self::Upstream { .. } | Self::Decode { .. } => 502,
            Self::InvalidSettings { .. } => 500,
        }
    }

    /// Whether the caller may reasonably retry the same request later.
    ///
    /// Nothing is retried internally.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Upstream { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::SheetError;

    #[test]
    fn status_codes_follow_error_class() {
        assert_eq!(SheetError::MissingApiKey.status_code(), 400);
        assert_eq!(
            SheetError::BadRequest {
                message: "sheetId is required".to_string()
            }
            .status_code(),
            400
        );
        let upstream = SheetError::Upstream {
            method: "GET".to_string(),
            path: "/sheets".to_string(),
            status: 401,
            body: "unauthorized".to_string(),
        };
        assert_eq!(upstream.status_code(), 502);
        assert!(upstream.is_retryable());
        assert!(!SheetError::MissingApiKey.is_retryable());
    }

    #[test]
    fn upstream_message_names_method_path_and_status() {
        let err = SheetError::Upstream {
            method: "GET".to_string(),
            path: "/sheets/abc/rows".to_string(),
            status: 404,
            body: "not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "upstream api: GET /sheets/abc/rows returned not found (404)"
        );
    }
}
