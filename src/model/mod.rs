//! Entity shapes and validation.
//!
//! Every entity declares a static field table. [`conform`] checks a raw JSON
//! document against that table and produces a normalised document (defaults
//! applied, timestamps in RFC 3339 UTC, unknown keys dropped) which then
//! decodes into the typed record.

mod entities;

pub use entities::{all_schemas, ContactMessage, Event, Leader, Ministry, PrayerRequest, Sermon, Story};

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::OnceLock;

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$";
const MAX_EMAIL_LEN: usize = 254;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Email,
    Boolean,
    Timestamp,
    Number {
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
}

/// Value used when a non-required field is absent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DefaultValue {
    /// Current time at validation.
    Now,
    Bool(bool),
}

impl DefaultValue {
    fn resolve(self) -> Value {
        match self {
            DefaultValue::Now => Value::String(format_timestamp(&Utc::now())),
            DefaultValue::Bool(b) => Value::Bool(b),
        }
    }
}

impl Serialize for DefaultValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DefaultValue::Now => serializer.serialize_str("now"),
            DefaultValue::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        FieldSpec { name, kind, required: true, default: None }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        FieldSpec { name, kind, required: false, default: None }
    }

    pub const fn with_default(name: &'static str, kind: FieldKind, default: DefaultValue) -> Self {
        FieldSpec { name, kind, required: false, default: Some(default) }
    }
}

/// One rejected field.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError { field: field.into(), message: message.into() }
    }
}

/// All field errors of a rejected payload.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationErrors(vec![FieldError::new(field, message)])
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|e| format!("{}: {}", e.field, e.message)).collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Published shape of one entity, consumed by the external document editor.
#[derive(Debug, Serialize)]
pub struct EntitySchema {
    pub name: &'static str,
    pub collection: String,
    pub fields: &'static [FieldSpec],
}

/// A typed record stored in its own collection.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Type name; the collection is its lowercase form.
    const NAME: &'static str;
    const FIELDS: &'static [FieldSpec];

    fn collection() -> String {
        Self::NAME.to_ascii_lowercase()
    }

    /// Check `raw` against the field table and decode it. Rejects as a whole.
    fn validate(raw: &Value) -> Result<Self, ValidationErrors> {
        let doc = conform(Self::FIELDS, raw)?;
        serde_json::from_value(doc).map_err(|e| ValidationErrors::single("body", e.to_string()))
    }

    fn schema() -> EntitySchema {
        EntitySchema {
            name: Self::NAME,
            collection: Self::collection(),
            fields: Self::FIELDS,
        }
    }
}

/// Validate `raw` against `fields`, returning the normalised document.
pub fn conform(fields: &[FieldSpec], raw: &Value) -> Result<Value, ValidationErrors> {
    let obj = raw
        .as_object()
        .ok_or_else(|| ValidationErrors::single("body", "must be a JSON object"))?;
    let mut out = Map::new();
    let mut errors = Vec::new();
    for spec in fields {
        match obj.get(spec.name).filter(|v| !v.is_null()) {
            None if spec.required => errors.push(FieldError::new(spec.name, "field required")),
            None => {
                let v = spec.default.map(DefaultValue::resolve).unwrap_or(Value::Null);
                out.insert(spec.name.to_string(), v);
            }
            Some(v) => match check_kind(spec.kind, v) {
                Ok(v) => {
                    out.insert(spec.name.to_string(), v);
                }
                Err(msg) => errors.push(FieldError::new(spec.name, msg)),
            },
        }
    }
    if errors.is_empty() {
        Ok(Value::Object(out))
    } else {
        Err(ValidationErrors(errors))
    }
}

fn check_kind(kind: FieldKind, v: &Value) -> Result<Value, String> {
    match kind {
        FieldKind::Text => match v {
            Value::String(_) => Ok(v.clone()),
            _ => Err("must be a string".into()),
        },
        FieldKind::Email => match v.as_str() {
            Some(s) if is_valid_email(s) => Ok(v.clone()),
            Some(_) => Err("must be a valid email address".into()),
            None => Err("must be a string".into()),
        },
        FieldKind::Boolean => match v {
            Value::Bool(_) => Ok(v.clone()),
            _ => Err("must be a boolean".into()),
        },
        FieldKind::Timestamp => v
            .as_str()
            .and_then(parse_timestamp)
            .map(|t| Value::String(format_timestamp(&t)))
            .ok_or_else(|| "must be a valid datetime".to_string()),
        FieldKind::Number { min, max } => {
            let n = v.as_f64().ok_or_else(|| "must be a number".to_string())?;
            if let Some(min) = min {
                if n < min {
                    return Err(format!("must be at least {}", min));
                }
            }
            if let Some(max) = max {
                if n > max {
                    return Err(format!("must be at most {}", max));
                }
            }
            Ok(v.clone())
        }
    }
}

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).ok()).as_ref()
}

pub fn is_valid_email(s: &str) -> bool {
    s.len() <= MAX_EMAIL_LEN && email_regex().is_some_and(|re| re.is_match(s))
}

/// Parse RFC 3339, a naive datetime (taken as UTC) or a bare date (midnight UTC).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|n| n.and_utc())
}

pub fn format_timestamp(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
