//! Upstream spreadsheet API client.
//!
//! [`SheetsApi`] is the seam between the service and the network: the service only ever talks to
//! the trait, and [`HttpSheetsApi`] is the `reqwest`-backed implementation.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::{SheetError, SheetResult};
use crate::types::{FieldMetadata, Row, Sheet};

use super::json::{decode_fields, decode_rows, decode_sheets};
use super::settings::Settings;

/// Largest page of rows requested from the upstream API.
pub const MAX_ROWS_PER_REQUEST: usize = 5000;

/// Upstream error bodies are cut to this many bytes before they are put into an error.
pub const MAX_ERROR_BODY_BYTES: usize = 4 << 10;

const USER_AGENT_VALUE: &str = concat!("sheet-series/", env!("CARGO_PKG_VERSION"));

/// Clamp a requested row limit: non-positive or oversized limits become the maximum page.
pub fn sanitize_limit(limit: i64) -> usize {
    match usize::try_from(limit) {
        Ok(n) if n > 0 && n <= MAX_ROWS_PER_REQUEST => n,
        _ => MAX_ROWS_PER_REQUEST,
    }
}

/// Clamp a requested row offset: negative offsets become zero.
pub fn sanitize_skip(skip: i64) -> usize {
    usize::try_from(skip).unwrap_or(0)
}

/// Read access to the spreadsheet API.
#[async_trait]
pub trait SheetsApi: Send + Sync {
    /// Check local preconditions (an API key is configured) without any network call.
    fn validate_credentials(&self) -> SheetResult<()> {
        Ok(())
    }

    /// All sheets visible to the configured key.
    async fn list_sheets(&self) -> SheetResult<Vec<Sheet>>;

    /// Field metadata of one sheet.
    async fn list_fields(&self, sheet_id: &str) -> SheetResult<Vec<FieldMetadata>>;

    /// One page of rows. A zero `limit` or `skip` is not sent upstream.
    async fn list_rows(&self, sheet_id: &str, limit: usize, skip: usize) -> SheetResult<Vec<Row>>;
}

#[async_trait]
impl<T: SheetsApi + ?Sized> SheetsApi for Arc<T> {
    fn validate_credentials(&self) -> SheetResult<()> {
        (**self).validate_credentials()
    }

    async fn list_sheets(&self) -> SheetResult<Vec<Sheet>> {
        (**self).list_sheets().await
    }

    async fn list_fields(&self, sheet_id: &str) -> SheetResult<Vec<FieldMetadata>> {
        (**self).list_fields(sheet_id).await
    }

    async fn list_rows(&self, sheet_id: &str, limit: usize, skip: usize) -> SheetResult<Vec<Row>> {
        (**self).list_rows(sheet_id, limit, skip).await
    }
}

/// [`SheetsApi`] over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpSheetsApi {
    settings: Settings,
    base: Url,
    client: Client,
}

impl HttpSheetsApi {
    /// Build a client for `settings`.
    ///
    /// Fails with [`SheetError::InvalidSettings`] when the base URL cannot carry path segments.
    pub fn new(settings: Settings) -> SheetResult<Self> {
        let base = Url::parse(&settings.base_url).map_err(|e| SheetError::InvalidSettings {
            message: format!("invalid base url {:?}: {e}", settings.base_url),
        })?;
        if base.cannot_be_a_base() {
            return Err(SheetError::InvalidSettings {
                message: format!("base url {:?} cannot carry a path", settings.base_url),
            });
        }
        let client = Client::builder().timeout(settings.request_timeout).build()?;
        Ok(Self { settings, base, client })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Base URL joined with `segments`, each segment percent-escaped.
    fn endpoint(&self, segments: &[&str], params: &[(&str, usize)]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        let params: Vec<_> = params.iter().filter(|(_, v)| *v > 0).collect();
        if !params.is_empty() {
            let mut query = url.query_pairs_mut();
            for (name, value) in params {
                query.append_pair(name, &value.to_string());
            }
        }
        url
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        decode: fn(&str) -> serde_json::Result<Vec<T>>,
    ) -> SheetResult<Vec<T>> {
        self.settings.validate_api_key()?;
        let path = url.path().to_string();
        tracing::debug!(%path, "upstream request");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, self.settings.authorization_header())
            .header(USER_AGENT, USER_AGENT_VALUE)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() >= 400 {
            let body = read_error_body(response).await;
            return Err(SheetError::Upstream {
                method: "GET".to_string(),
                path,
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        let body = response.text().await?;
        decode(&body).map_err(|source| SheetError::Decode { path, source })
    }
}

#[async_trait]
impl SheetsApi for HttpSheetsApi {
    fn validate_credentials(&self) -> SheetResult<()> {
        self.settings.validate_api_key()
    }

    async fn list_sheets(&self) -> SheetResult<Vec<Sheet>> {
        self.get(self.endpoint(&["sheets"], &[]), decode_sheets).await
    }

    async fn list_fields(&self, sheet_id: &str) -> SheetResult<Vec<FieldMetadata>> {
        self.get(self.endpoint(&["sheets", sheet_id, "fields"], &[]), decode_fields)
            .await
    }

    async fn list_rows(&self, sheet_id: &str, limit: usize, skip: usize) -> SheetResult<Vec<Row>> {
        let url = self.endpoint(&["sheets", sheet_id, "rows"], &[("limit", limit), ("skip", skip)]);
        self.get(url, decode_rows).await
    }
}

/// Read at most [`MAX_ERROR_BODY_BYTES`] of an error response. Read failures end the body early.
async fn read_error_body(mut response: reqwest::Response) -> String {
    let mut buf = Vec::new();
    while let Ok(Some(chunk)) = response.chunk().await {
        if append_bounded(&mut buf, &chunk, MAX_ERROR_BODY_BYTES) {
            break;
        }
    }
    decode_error_body(&buf)
}

/// Append as much of `chunk` as fits under `max` bytes. Returns true once `buf` is full.
fn append_bounded(buf: &mut Vec<u8>, chunk: &[u8], max: usize) -> bool {
    let room = max.saturating_sub(buf.len());
    buf.extend_from_slice(&chunk[..chunk.len().min(room)]);
    buf.len() >= max
}

/// Text of a possibly cut body; a character split by the cut is dropped.
fn decode_error_body(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(e) if e.error_len().is_none() => String::from_utf8_lossy(&bytes[..e.valid_up_to()]).into_owned(),
        Err(_) => String::from_utf8_lossy(bytes).into_owned(),
    }
}
