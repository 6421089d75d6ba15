//! Core data model types.
//!
//! Rows arrive from the upstream sheet API as loosely-typed JSON objects. They are converted into
//! [`Row`]s of [`Value`]s right at the ingestion boundary, classified into [`FieldDescriptor`]s,
//! and finally rendered as [`FieldInfo`]s alongside the normalized rows in a [`QueryResponse`].

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single raw or normalized cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/explicit null value.
    Null,
    /// UTF-8 text, exactly as received.
    Text(String),
    /// 64-bit float. Upstream JSON numbers always land here.
    Number(f64),
    /// Boolean.
    Bool(bool),
    /// A parsed timestamp (always UTC).
    Instant(DateTime<Utc>),
}

impl Value {
    /// Convenience constructor for [`Value::Text`].
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Renders the value as plain text, the way it would be displayed to a user.
    ///
    /// Null renders as an empty string and instants render as RFC 3339.
    pub fn display_string(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Instant(ts) => format_instant(ts),
        }
    }
}

/// Formats an instant as RFC 3339 with a `Z` suffix and only the sub-second digits it needs.
pub fn format_instant(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            serde_json::Value::String(s) => Self::Text(s),
            // Nested structures carry no tabular meaning; keep their JSON text.
            other @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                Self::Text(other.to_string())
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            Self::Number(_) => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Instant(ts) => serializer.serialize_str(&format_instant(ts)),
        }
    }
}

/// One row: column key -> value, in order of first appearance.
///
/// Rows in the same result set need not share identical key sets.
pub type Row = IndexMap<String, Value>;

/// Column metadata as declared by the upstream API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMetadata {
    /// Unique, stable column identifier.
    #[serde(default)]
    pub key: String,
    /// Display name (may be empty).
    #[serde(default)]
    pub label: String,
    /// Declared type string, e.g. `"number"` or `"datetime"`.
    #[serde(default, rename = "type")]
    pub declared_type: String,
    /// Declared format string, e.g. `"true/false"` or `"gps"`.
    #[serde(default, rename = "format")]
    pub declared_format: String,
}

impl FieldMetadata {
    /// Create metadata with a key and label and no declared type/format.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            ..Default::default()
        }
    }

    /// Set the declared type.
    pub fn with_type(mut self, declared_type: impl Into<String>) -> Self {
        self.declared_type = declared_type.into();
        self
    }

    /// Set the declared format.
    pub fn with_format(mut self, declared_format: impl Into<String>) -> Self {
        self.declared_format = declared_format.into();
        self
    }

    /// The label, or the key when the label is empty.
    pub fn label_or_key(&self) -> &str {
        if self.label.is_empty() {
            &self.key
        } else {
            &self.label
        }
    }
}

/// Semantic kind inferred for a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Free text (fallback).
    #[default]
    Text,
    /// Numeric values.
    Number,
    /// Boolean values.
    Boolean,
    /// Timestamps.
    Time,
    /// Composite `"lat,lon"` coordinates.
    Geo,
}

impl FieldKind {
    /// The type reported to the visualization host.
    ///
    /// Geo columns report as strings; only their synthesized latitude/longitude children are
    /// numeric.
    pub fn semantic_type(self) -> SemanticType {
        match self {
            Self::Number => SemanticType::Number,
            Self::Boolean => SemanticType::Boolean,
            Self::Time => SemanticType::Time,
            Self::Text | Self::Geo => SemanticType::String,
        }
    }

    /// Whether a fractional-digit count may be attached to this kind.
    pub fn carries_precision(self) -> bool {
        matches!(self, Self::Number | Self::Geo)
    }
}

/// Host-facing field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    Number,
    Boolean,
    Time,
    String,
}

/// Classification record for one column, valid for one query's response assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Declared metadata (possibly synthesized for geo children).
    pub metadata: FieldMetadata,
    /// Inferred kind.
    pub kind: FieldKind,
    /// Maximum observed fractional digits.
    ///
    /// Only ever `Some(n)` with `n > 0`, and only for [`FieldKind::Number`]/[`FieldKind::Geo`].
    pub fractional_digits: Option<usize>,
}

impl FieldDescriptor {
    /// Create a descriptor without precision.
    pub fn new(metadata: FieldMetadata, kind: FieldKind) -> Self {
        Self {
            metadata,
            kind,
            fractional_digits: None,
        }
    }

    /// Attach a precision, honoring the descriptor invariant (positive, numeric kinds only).
    pub fn with_fractional_digits(mut self, digits: usize) -> Self {
        self.fractional_digits = (digits > 0 && self.kind.carries_precision()).then_some(digits);
        self
    }

    /// The column key.
    pub fn key(&self) -> &str {
        &self.metadata.key
    }
}

/// Running maximum of fractional digits observed for one geo column.
///
/// Only ever grows while rows are scanned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeoColumnPrecision {
    pub latitude_digits: usize,
    pub longitude_digits: usize,
}

impl GeoColumnPrecision {
    /// Fold one decoded coordinate's precision into the running maximum.
    pub fn observe(&mut self, latitude_digits: usize, longitude_digits: usize) {
        self.latitude_digits = self.latitude_digits.max(latitude_digits);
        self.longitude_digits = self.longitude_digits.max(longitude_digits);
    }
}

/// An equality predicate on one column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl Filter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Optional inclusive time bounds, as textual timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

/// A row query issued by the visualization host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    /// Host-side query identifier, echoed back.
    #[serde(default)]
    pub ref_id: String,
    /// Upstream sheet identifier. Empty means "no sheet selected".
    #[serde(default)]
    pub sheet_id: String,
    /// Requested page size; clamped to `(0, 5000]`.
    #[serde(default)]
    pub limit: i64,
    /// Requested offset; clamped to `>= 0`.
    #[serde(default)]
    pub skip: i64,
    /// Time-field hint: a key, a label, or a case variant of either.
    #[serde(default, rename = "timeField")]
    pub time_field_hint: String,
    /// Equality filters, all of which must match.
    #[serde(default)]
    pub filters: Vec<Filter>,
    /// Inclusive time bounds.
    #[serde(default)]
    pub range: TimeRange,
}

/// A sheet as listed by the upstream API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    #[serde(default, rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Host-facing description of one output column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldInfo {
    pub key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    #[serde(default, rename = "type", skip_serializing_if = "String::is_empty")]
    pub declared_type: String,
    #[serde(default, rename = "format", skip_serializing_if = "String::is_empty")]
    pub declared_format: String,
    pub semantic_type: SemanticType,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_time: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<usize>,
}

/// The shaped result of a row query.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub rows: Vec<Row>,
    pub ref_id: String,
    pub sheet_id: String,
    pub fields: Vec<FieldInfo>,
    /// Resolved time-field key, or empty when none was resolved.
    pub time_field: String,
}
