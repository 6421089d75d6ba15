#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use sheet_series::ingestion::json::{decode_fields, decode_rows, decode_sheets};
use sheet_series::ingestion::SheetsApi;
use sheet_series::types::{FieldMetadata, Row, Sheet};
use sheet_series::{SheetError, SheetResult};

pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{name}")).unwrap()
}

/// In-memory [`SheetsApi`] serving the inventory fixtures.
pub struct FakeApi {
    pub has_key: bool,
    pub sheets: Vec<Sheet>,
    pub fields: Vec<FieldMetadata>,
    pub rows: Vec<Row>,
    /// Status returned by `list_fields` instead of data.
    pub fields_status: Option<u16>,
    /// Status returned by `list_rows` instead of data.
    pub rows_status: Option<u16>,
    pub field_calls: AtomicUsize,
    pub row_calls: Mutex<Vec<(String, usize, usize)>>,
}

impl FakeApi {
    pub fn inventory() -> Self {
        Self {
            has_key: true,
            sheets: decode_sheets(&fixture("sheets.json")).unwrap(),
            fields: decode_fields(&fixture("inventory_fields.json")).unwrap(),
            rows: decode_rows(&fixture("inventory_rows.json")).unwrap(),
            fields_status: None,
            rows_status: None,
            field_calls: AtomicUsize::new(0),
            row_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn field_calls(&self) -> usize {
        self.field_calls.load(Ordering::SeqCst)
    }

    pub fn row_calls(&self) -> Vec<(String, usize, usize)> {
        self.row_calls.lock().unwrap().clone()
    }
}

fn upstream(path: String, status: u16) -> SheetError {
    SheetError::Upstream {
        method: "GET".to_string(),
        path,
        status,
        body: "{\"error\":\"nope\"}".to_string(),
    }
}

#[async_trait]
impl SheetsApi for FakeApi {
    fn validate_credentials(&self) -> SheetResult<()> {
        if self.has_key {
            Ok(())
        } else {
            Err(SheetError::MissingApiKey)
        }
    }

    async fn list_sheets(&self) -> SheetResult<Vec<Sheet>> {
        Ok(self.sheets.clone())
    }

    async fn list_fields(&self, sheet_id: &str) -> SheetResult<Vec<FieldMetadata>> {
        self.field_calls.fetch_add(1, Ordering::SeqCst);
        match self.fields_status {
            Some(status) => Err(upstream(format!("/sheets/{sheet_id}/fields"), status)),
            None => Ok(self.fields.clone()),
        }
    }

    async fn list_rows(&self, sheet_id: &str, limit: usize, skip: usize) -> SheetResult<Vec<Row>> {
        self.row_calls
            .lock()
            .unwrap()
            .push((sheet_id.to_string(), limit, skip));
        match self.rows_status {
            Some(status) => Err(upstream(format!("/sheets/{sheet_id}/rows"), status)),
            None => Ok(self.rows.clone()),
        }
    }
}
