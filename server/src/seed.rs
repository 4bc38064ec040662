//! Fixture bootstrap run once before the listener is bound.
//!
//! The dataset is a JSON array of patient records without ids. If the store
//! does not already hold exactly as many patients as the dataset, the
//! collection is replaced by the dataset with ids `0..N` in file order.

use std::borrow::Cow;
use std::path::Path;

use serde::Deserialize;
use uuid::Uuid;

use crate::model::{Medication, Patient, Temperature};
use crate::store::{PatientStore, StoreError};

/// Dataset compiled into the binary.
pub const BUNDLED_DATASET: &str = include_str!("../data/patient_data.json");

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("seed dataset is not valid patient JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedReport {
    AlreadySeeded { count: u64 },
    Loaded { count: u64 },
}

#[derive(Debug, Deserialize)]
struct SeedPatient {
    name: String,
    first_name: String,
    age: u32,
    height: f64,
    weight: f64,
    gender: String,
    #[serde(default)]
    medications: Vec<SeedMedication>,
    #[serde(default)]
    body_temperatures: Vec<Temperature>,
}

#[derive(Debug, Deserialize)]
struct SeedMedication {
    #[serde(rename = "_id", default)]
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    dosage: String,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
    #[serde(default)]
    dates_taken: Vec<String>,
}

impl SeedPatient {
    fn into_patient(self, id: i64) -> Patient {
        Patient {
            id,
            name: self.name,
            first_name: self.first_name,
            age: self.age,
            height: self.height,
            weight: self.weight,
            gender: self.gender,
            medications: self
                .medications
                .into_iter()
                .map(|m| Medication {
                    id: m
                        .id
                        .filter(|id| !id.is_empty())
                        .unwrap_or_else(new_medication_id),
                    name: m.name,
                    dosage: m.dosage,
                    start_date: m.start_date,
                    end_date: m.end_date,
                    dates_taken: m.dates_taken,
                })
                .collect(),
            body_temperatures: self.body_temperatures,
        }
    }
}

/// Opaque identity for a newly created medication.
pub fn new_medication_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Reads the dataset at `path`, or the bundled one when no path is given.
pub fn load_dataset(path: Option<&Path>) -> Result<Cow<'static, str>, SeedError> {
    match path {
        Some(path) => Ok(Cow::Owned(std::fs::read_to_string(path)?)),
        None => Ok(Cow::Borrowed(BUNDLED_DATASET)),
    }
}

/// Parses a dataset and assigns sequential ids in file order.
pub fn parse_dataset(raw: &str) -> Result<Vec<Patient>, SeedError> {
    let records: Vec<SeedPatient> = serde_json::from_str(raw)?;
    Ok(records
        .into_iter()
        .zip(0i64..)
        .map(|(record, id)| record.into_patient(id))
        .collect())
}

/// Loads `raw` into `store` unless the store already holds as many patients
/// as the dataset. Safe to call on every start.
pub async fn bootstrap<S: PatientStore>(store: &S, raw: &str) -> Result<SeedReport, SeedError> {
    let patients = parse_dataset(raw)?;
    let expected = patients.len() as u64;

    let count = store.count().await?;
    if count == expected {
        tracing::info!(count, "store already holds the patient dataset, skipping seed");
        return Ok(SeedReport::AlreadySeeded { count });
    }

    tracing::info!(
        stored = count,
        expected,
        "store does not match the patient dataset, reloading"
    );
    store.replace_all(patients).await?;
    tracing::info!(count = expected, "patient data loaded");
    Ok(SeedReport::Loaded { count: expected })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const DATASET: &str = r#"[
        {"name":"Alpha","first_name":"Ann","age":30,"height":165,"weight":60,"gender":"female",
         "medications":[{"name":"Aspirin","dosage":"100mg","start_date":"2024-01-01","end_date":null,"dates_taken":[]},
                        {"_id":"keep-me","name":"Ibuprofen","dosage":"200mg"}],
         "body_temperatures":[{"date":"2024-01-01","temperature":36.6,"lastModified":"2024-01-01"}]},
        {"name":"Beta","first_name":"Ben","age":45,"height":180.5,"weight":90.2,"gender":"male"},
        {"name":"Gamma","first_name":"Gia","age":70,"height":158,"weight":55,"gender":"female",
         "medications":[],"body_temperatures":[]}
    ]"#;

    #[test]
    fn ids_follow_file_order() {
        let patients = parse_dataset(DATASET).unwrap();
        let ids: Vec<i64> = patients.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(patients[1].name, "Beta");
    }

    #[test]
    fn missing_medication_ids_are_generated() {
        let patients = parse_dataset(DATASET).unwrap();
        let meds = &patients[0].medications;
        assert_eq!(meds[0].id.len(), 32);
        assert_eq!(meds[1].id, "keep-me");
        assert_eq!(meds[1].start_date, None);
        assert!(patients[1].medications.is_empty());
    }

    #[test]
    fn bundled_dataset_parses() {
        let patients = parse_dataset(BUNDLED_DATASET).unwrap();
        assert!(!patients.is_empty());
        assert!(patients.iter().enumerate().all(|(i, p)| p.id == i as i64));
    }

    #[test]
    fn load_dataset_reads_file_or_falls_back() {
        assert_eq!(load_dataset(None).unwrap(), BUNDLED_DATASET);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, DATASET.as_bytes()).unwrap();
        assert_eq!(load_dataset(Some(file.path())).unwrap(), DATASET);

        assert!(matches!(
            load_dataset(Some(Path::new("/nonexistent/patients.json"))),
            Err(SeedError::Io(_))
        ));
    }

    #[test]
    fn malformed_dataset_is_an_error() {
        assert!(matches!(
            parse_dataset(r#"[{"name":"NoFields"}]"#),
            Err(SeedError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn empty_store_is_loaded() {
        let store = MemoryStore::new();
        let report = bootstrap(&store, DATASET).await.unwrap();
        assert_eq!(report, SeedReport::Loaded { count: 3 });
        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn matching_store_is_left_alone() {
        let store = MemoryStore::new();
        bootstrap(&store, DATASET).await.unwrap();
        store
            .modify(0, |p| p.name = "Edited".to_string())
            .await
            .unwrap();

        let report = bootstrap(&store, DATASET).await.unwrap();
        assert_eq!(report, SeedReport::AlreadySeeded { count: 3 });
        assert_eq!(store.find(0).await.unwrap().unwrap().name, "Edited");
    }

    #[tokio::test]
    async fn mismatched_store_is_wiped_and_reloaded() {
        let mut stray = parse_dataset(DATASET).unwrap();
        stray.truncate(1);
        stray[0].id = 99;
        let store = MemoryStore::with_patients(stray);

        let report = bootstrap(&store, DATASET).await.unwrap();
        assert_eq!(report, SeedReport::Loaded { count: 3 });
        assert!(store.find(99).await.unwrap().is_none());
        assert_eq!(store.find(2).await.unwrap().unwrap().name, "Gamma");
    }
}
