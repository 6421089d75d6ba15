//! JSON decoding at the ingestion boundary.
//!
//! The upstream API wraps every listing in an envelope: `{"data": [...]}`. A missing or null
//! `data` member decodes as an empty list. Row cells are converted into
//! [`crate::types::Value`]s here, so nothing downstream inspects raw JSON.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{SheetError, SheetResult};
use crate::types::{FieldMetadata, Query, Row, Sheet};

#[derive(Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
struct Envelope<T> {
    #[serde(default)]
    data: Option<Vec<T>>,
}

fn decode_envelope<T: DeserializeOwned>(input: &str) -> serde_json::Result<Vec<T>> {
    let envelope: Envelope<T> = serde_json::from_str(input)?;
    Ok(envelope.data.unwrap_or_default())
}

/// Decode a row listing.
pub fn decode_rows(input: &str) -> serde_json::Result<Vec<Row>> {
    decode_envelope(input)
}

/// Decode a field-metadata listing.
pub fn decode_fields(input: &str) -> serde_json::Result<Vec<FieldMetadata>> {
    decode_envelope(input)
}

/// Decode a sheet listing.
pub fn decode_sheets(input: &str) -> serde_json::Result<Vec<Sheet>> {
    decode_envelope(input)
}

#[derive(Deserialize)]
struct QueryPayload {
    #[serde(default)]
    query: Query,
}

/// Decode a host query request body of the form `{"query": {...}}`.
pub fn decode_query_payload(input: &str) -> SheetResult<Query> {
    serde_json::from_str::<QueryPayload>(input)
        .map(|payload| payload.query)
        .map_err(|e| SheetError::BadRequest {
            message: format!("invalid request body: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    #[test]
    fn decodes_rows_with_mixed_cells() {
        let rows = decode_rows(r#"{"data":[{"a":"1.50","b":2,"c":null},{"a":"x","d":true}]}"#).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["a"], Value::text("1.50"));
        assert_eq!(rows[0]["b"], Value::Number(2.0));
        assert_eq!(rows[0]["c"], Value::Null);
        assert_eq!(rows[1]["d"], Value::Bool(true));
        assert!(!rows[1].contains_key("b"));
    }

    #[test]
    fn missing_or_null_data_is_empty() {
        assert!(decode_rows("{}").unwrap().is_empty());
        assert!(decode_fields(r#"{"data":null}"#).unwrap().is_empty());
    }

    #[test]
    fn rejects_non_object_rows() {
        assert!(decode_rows(r#"{"data":[1,2]}"#).is_err());
        assert!(decode_rows("not json").is_err());
    }

    #[test]
    fn decodes_fields_and_sheets() {
        let fields = decode_fields(r#"{"data":[{"key":"qty","label":"Quantity","type":"number"}]}"#).unwrap();
        assert_eq!(fields[0].key, "qty");
        assert_eq!(fields[0].declared_type, "number");
        assert_eq!(fields[0].declared_format, "");

        let sheets = decode_sheets(r#"{"data":[{"_id":"s1","name":"Inventory"}]}"#).unwrap();
        assert_eq!(sheets[0].id, "s1");
        assert_eq!(sheets[0].name, "Inventory");
    }

    #[test]
    fn query_payload_errors_are_bad_requests() {
        let q = decode_query_payload(r#"{"query":{"sheetId":"s1","refId":"A"}}"#).unwrap();
        assert_eq!(q.sheet_id, "s1");
        let err = decode_query_payload("{").unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
