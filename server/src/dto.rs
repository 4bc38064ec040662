//! Request bodies and query parameters, validated at the boundary.
//!
//! The dashboard sends form state as-is, so numeric fields may arrive as
//! JSON numbers or as strings. Each `*Form` is deserialized leniently and
//! then turned into a typed command by `validate`, which is the only place
//! a 400 is produced for a body.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clock::parse_date;
use crate::error::ApiError;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// `POST /medication` body.
#[derive(Debug, Deserialize)]
pub struct MedicationForm {
    #[serde(rename = "patientId", default)]
    pub patient_id: Value,
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub dosage: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub dates_taken: Option<Vec<String>>,
}

/// A medication upsert that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct MedicationUpsert {
    pub patient_id: i64,
    pub id: Option<String>,
    pub name: String,
    pub dosage: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub dates_taken: Vec<String>,
}

impl MedicationForm {
    pub fn validate(self) -> Result<MedicationUpsert, ApiError> {
        Ok(MedicationUpsert {
            patient_id: patient_id(&self.patient_id)?,
            id: self.id,
            name: self.name.unwrap_or_default(),
            dosage: self.dosage.unwrap_or_default(),
            start_date: self.start_date,
            end_date: self.end_date,
            dates_taken: self.dates_taken.unwrap_or_default(),
        })
    }
}

/// `POST /temperature` body.
#[derive(Debug, Deserialize)]
pub struct TemperatureForm {
    #[serde(rename = "patientId", default)]
    pub patient_id: Value,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub temperature: Value,
    #[serde(rename = "lastModified", default)]
    pub last_modified: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureUpsert {
    pub patient_id: i64,
    pub date: NaiveDate,
    pub temperature: f64,
    pub last_modified: Option<String>,
}

impl TemperatureForm {
    pub fn validate(self) -> Result<TemperatureUpsert, ApiError> {
        let patient_id = patient_id(&self.patient_id)?;
        let date = self
            .date
            .as_deref()
            .and_then(parse_date)
            .ok_or_else(|| ApiError::BadRequest("Invalid date, expected YYYY-MM-DD".to_string()))?;
        let temperature = number(&self.temperature)
            .filter(|t| t.is_finite())
            .ok_or_else(|| ApiError::BadRequest("Invalid temperature value".to_string()))?;
        Ok(TemperatureUpsert {
            patient_id,
            date,
            temperature,
            last_modified: self.last_modified,
        })
    }
}

/// `GET /patients` query string. Kept as raw strings so an unparsable value
/// falls back to its default instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub size: Option<String>,
}

impl PageQuery {
    /// Resolves `(page, size)`. Absent, unparsable and zero values take the
    /// default; negative values are rejected.
    pub fn resolve(&self) -> Result<(u64, u64), ApiError> {
        let page = page_param(self.page.as_deref(), DEFAULT_PAGE, "page")?;
        let size = page_param(self.size.as_deref(), DEFAULT_PAGE_SIZE, "size")?;
        Ok((page, size))
    }
}

fn page_param(raw: Option<&str>, default: u64, name: &str) -> Result<u64, ApiError> {
    match raw.and_then(|s| s.trim().parse::<i64>().ok()) {
        None | Some(0) => Ok(default),
        Some(n) if n < 0 => Err(ApiError::BadRequest(format!(
            "Invalid {name} parameter: {n}"
        ))),
        Some(n) => Ok(n.unsigned_abs()),
    }
}

/// Parses a patient id taken from the URL path.
pub fn path_patient_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::invalid_patient_id())
}

/// Accepts an integral JSON number or a string holding an integer.
fn patient_id(value: &Value) -> Result<i64, ApiError> {
    let id = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    id.ok_or_else(ApiError::invalid_patient_id)
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// `{message, data}` envelope used by both write endpoints.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub message: &'static str,
    pub data: T,
}
