//! Domain DTOs for the patient API.
//!
//! # Design
//! These types mirror the server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates. Form
//! types reproduce what the dashboard's forms submit.

use serde::{Deserialize, Serialize};

/// A patient document as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
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

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medication {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub dosage: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub dates_taken: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Temperature {
    pub date: String,
    pub temperature: f64,
    #[serde(rename = "lastModified", default)]
    pub last_modified: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

/// One page of the patient roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientPage {
    pub patients: Vec<Patient>,
    pub pagination: Pagination,
}

/// Request payload for `POST /medication`. An empty `_id` asks the server
/// to create a new medication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MedicationForm {
    #[serde(rename = "patientId")]
    pub patient_id: i64,
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub dosage: String,
    pub start_date: String,
    pub end_date: String,
    pub dates_taken: Vec<String>,
}

impl MedicationForm {
    /// Blank form for adding a medication.
    pub fn new_medication(patient_id: i64) -> Self {
        Self {
            patient_id,
            id: String::new(),
            name: String::new(),
            dosage: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            dates_taken: Vec::new(),
        }
    }

    /// Form pre-filled from an existing medication. Missing dates become
    /// empty strings.
    pub fn edit(patient_id: i64, medication: &Medication) -> Self {
        Self {
            patient_id,
            id: medication.id.clone(),
            name: medication.name.clone(),
            dosage: medication.dosage.clone(),
            start_date: medication.start_date.clone().unwrap_or_default(),
            end_date: medication.end_date.clone().unwrap_or_default(),
            dates_taken: medication.dates_taken.clone(),
        }
    }
}

/// Request payload for `POST /temperature`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemperatureForm {
    #[serde(rename = "patientId")]
    pub patient_id: i64,
    pub date: String,
    pub temperature: f64,
    #[serde(
        rename = "lastModified",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub last_modified: Option<String>,
}

/// Parsed `POST /medication` response.
#[derive(Debug, Clone, PartialEq)]
pub struct MedicationOutcome {
    /// `true` on 201 (appended), `false` on 200 (replaced).
    pub created: bool,
    pub message: String,
    pub medications: Vec<Medication>,
}

/// Parsed `POST /temperature` response.
#[derive(Debug, Clone, PartialEq)]
pub enum TemperatureOutcome {
    /// 200: an existing reading for the date was overwritten.
    Updated(Temperature),
    /// 201: the reading was appended, or the write was skipped; `patient`
    /// is the stored document either way.
    Recorded { message: String, patient: Patient },
}
