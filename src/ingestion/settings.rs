//! Data-source settings supplied by the visualization host.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{SheetError, SheetResult};

/// Base URL used when the host settings do not name one.
pub const DEFAULT_BASE_URL: &str = "https://api.orcascan.com/v1";

/// Upper bound on a single upstream request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Key of the API key inside the host's decrypted secure settings.
pub const API_KEY_SECRET: &str = "apiKey";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonData {
    #[serde(default)]
    base_url: String,
}

/// Resolved connection settings for one data-source instance.
#[derive(Clone)]
pub struct Settings {
    /// API base URL, without a trailing `/`.
    pub base_url: String,
    /// Timeout applied to every upstream request.
    pub request_timeout: Duration,
    api_key: String,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("api_key_set", &!self.api_key.is_empty())
            .finish()
    }
}

impl Settings {
    /// Create settings from an explicit base URL and API key.
    ///
    /// An empty base URL falls back to [`DEFAULT_BASE_URL`].
    pub fn new(base_url: impl AsRef<str>, api_key: impl AsRef<str>) -> Self {
        let base_url = match base_url.as_ref().trim() {
            "" => DEFAULT_BASE_URL,
            url => url,
        };
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            api_key: api_key.as_ref().trim().to_string(),
        }
    }

    /// Build settings from the host's plain JSON settings and decrypted secrets.
    ///
    /// `json_data` may be empty. The API key is read from `secure[`[`API_KEY_SECRET`]`]`; a
    /// missing key is not an error here, only when a request is attempted.
    pub fn from_instance(json_data: &str, secure: &HashMap<String, String>) -> SheetResult<Self> {
        let data = if json_data.trim().is_empty() {
            JsonData::default()
        } else {
            serde_json::from_str::<JsonData>(json_data).map_err(|e| SheetError::InvalidSettings {
                message: format!("invalid json data: {e}"),
            })?
        };
        let api_key = secure.get(API_KEY_SECRET).map(String::as_str).unwrap_or_default();
        Ok(Self::new(&data.base_url, api_key))
    }

    /// Override the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Fails with [`SheetError::MissingApiKey`] when no key is configured.
    pub fn validate_api_key(&self) -> SheetResult<()> {
        if self.api_key.is_empty() {
            return Err(SheetError::MissingApiKey);
        }
        Ok(())
    }

    /// `Authorization` header value. Keys already carrying a `Bearer ` prefix are sent verbatim.
    pub fn authorization_header(&self) -> String {
        let has_prefix = self
            .api_key
            .get(..7)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("bearer "));
        if has_prefix {
            self.api_key.clone()
        } else {
            format!("Bearer {}", self.api_key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secrets(key: &str) -> HashMap<String, String> {
        HashMap::from([(API_KEY_SECRET.to_string(), key.to_string())])
    }

    #[test]
    fn defaults_and_trims_base_url() {
        let s = Settings::from_instance("", &secrets("k")).unwrap();
        assert_eq!(s.base_url, DEFAULT_BASE_URL);
        assert_eq!(s.request_timeout, DEFAULT_REQUEST_TIMEOUT);

        let s = Settings::from_instance(r#"{"baseUrl":" https://example.test/api/ "}"#, &secrets("k")).unwrap();
        assert_eq!(s.base_url, "https://example.test/api");
    }

    #[test]
    fn rejects_malformed_json_data() {
        let err = Settings::from_instance("{not json", &secrets("k")).unwrap_err();
        assert!(matches!(err, SheetError::InvalidSettings { .. }));
    }

    #[test]
    fn missing_or_blank_key_fails_validation() {
        let s = Settings::from_instance("{}", &HashMap::new()).unwrap();
        assert!(matches!(s.validate_api_key(), Err(SheetError::MissingApiKey)));

        let s = Settings::new("", "   ");
        assert!(matches!(s.validate_api_key(), Err(SheetError::MissingApiKey)));
    }

    #[test]
    fn bearer_prefix_is_added_once() {
        assert_eq!(Settings::new("", "abc").authorization_header(), "Bearer abc");
        assert_eq!(Settings::new("", "bearer abc").authorization_header(), "bearer abc");
        assert_eq!(Settings::new("", "Bearer abc").authorization_header(), "Bearer abc");
    }

    #[test]
    fn debug_output_redacts_the_key() {
        let s = Settings::new("", "super-secret");
        let out = format!("{s:?}");
        assert!(!out.contains("super-secret"));
        assert!(out.contains("api_key_set: true"));
    }
}
