//! Patient documents as they are stored and served.
//!
//! A `Patient` is one document in the collection. Medications and
//! temperature readings are embedded sub-documents owned by their patient.

use serde::{Deserialize, Serialize};

/// A patient document. `id` is assigned at seed time and never changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub first_name: String,
    pub age: u32,
    pub height: f64,
    pub weight: f64,
    pub gender: String,
    #[serde(default)]
    pub medications: Vec<Medication>,
    #[serde(default)]
    pub body_temperatures: Vec<Temperature>,
}

/// A medication embedded in a patient, identified by `_id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub dosage: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default)]
    pub dates_taken: Vec<String>,
}

/// One body temperature reading. At most one per `date` per patient.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    pub date: String,
    pub temperature: f64,
    #[serde(rename = "lastModified", default)]
    pub last_modified: Option<String>,
}

/// `{page, pageSize, totalItems, totalPages}` returned with every listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: u64, page_size: u64, total_items: u64) -> Self {
        Self {
            page,
            page_size,
            total_items,
            total_pages: total_items.div_ceil(page_size),
        }
    }

    /// Number of documents to skip to reach the first item of this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PatientPage {
    pub patients: Vec<Patient>,
    pub pagination: Pagination,
}
