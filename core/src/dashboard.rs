//! State behind the single-page dashboard.
//!
//! # Design
//! The UI renders from a `Dashboard` and feeds every parsed response back
//! through an `apply_*` method. A failed request of any kind is logged and
//! leaves the previous state untouched; there is no retry and no error
//! surface beyond the log.

use crate::client::PatientClient;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::types::{MedicationOutcome, Patient, PatientPage, TemperatureOutcome};

pub const PAGE_SIZE: u64 = 10;

#[derive(Debug, Clone)]
pub struct Dashboard {
    page: u64,
    page_size: u64,
    total_pages: u64,
    roster: Vec<Patient>,
    selected_id: i64,
    patient: Option<Patient>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            page: 1,
            page_size: PAGE_SIZE,
            total_pages: 0,
            roster: Vec::new(),
            selected_id: 0,
            patient: None,
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    /// Patients on the current roster page.
    pub fn roster(&self) -> &[Patient] {
        &self.roster
    }

    pub fn selected_id(&self) -> i64 {
        self.selected_id
    }

    /// The loaded patient, if any fetch has succeeded yet.
    pub fn patient(&self) -> Option<&Patient> {
        self.patient.as_ref()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Moves back one page, never below 1. Returns whether the page changed
    /// and the roster needs refetching.
    pub fn prev_page(&mut self) -> bool {
        let target = self.page.saturating_sub(1).max(1);
        self.set_page(target)
    }

    /// Moves forward one page, never past the last known page.
    pub fn next_page(&mut self) -> bool {
        let target = (self.page + 1).min(self.total_pages).max(1);
        self.set_page(target)
    }

    fn set_page(&mut self, target: u64) -> bool {
        let changed = target != self.page;
        self.page = target;
        changed
    }

    /// Points the dashboard at another patient. Returns whether the
    /// selection changed and the patient needs refetching.
    pub fn select(&mut self, id: i64) -> bool {
        let changed = id != self.selected_id;
        self.selected_id = id;
        changed
    }

    pub fn roster_request(&self, client: &PatientClient) -> HttpRequest {
        client.build_list_patients(self.page, self.page_size)
    }

    pub fn patient_request(&self, client: &PatientClient) -> HttpRequest {
        client.build_get_patient(self.selected_id)
    }

    pub fn apply_roster(&mut self, result: Result<PatientPage, ApiError>) {
        match result {
            Ok(page) => {
                self.roster = page.patients;
                self.total_pages = page.pagination.total_pages;
            }
            Err(err) => tracing::error!(error = %err, page = self.page, "failed to fetch patients"),
        }
    }

    pub fn apply_patient(&mut self, result: Result<Patient, ApiError>) {
        match result {
            Ok(patient) => self.patient = Some(patient),
            Err(err) => tracing::error!(
                error = %err,
                patient_id = self.selected_id,
                "failed to fetch patient data"
            ),
        }
    }

    pub fn apply_medications(&mut self, result: Result<MedicationOutcome, ApiError>) {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(error = %err, "medication update failed");
                return;
            }
        };
        let Some(patient) = self.patient.as_mut() else {
            tracing::warn!("medication response arrived with no patient loaded");
            return;
        };
        tracing::info!(outcome = %outcome.message, "medication saved");
        patient.medications = outcome.medications;
    }

    pub fn apply_temperature(&mut self, result: Result<TemperatureOutcome, ApiError>) {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(error = %err, "temperature update failed");
                return;
            }
        };
        let Some(patient) = self.patient.as_mut() else {
            tracing::warn!("temperature response arrived with no patient loaded");
            return;
        };
        match outcome {
            TemperatureOutcome::Updated(reading) => {
                match patient
                    .body_temperatures
                    .iter_mut()
                    .find(|t| t.date == reading.date)
                {
                    Some(existing) => *existing = reading,
                    None => patient.body_temperatures.push(reading),
                }
            }
            TemperatureOutcome::Recorded {
                message,
                patient: stored,
            } => {
                tracing::info!(outcome = %message, "temperature recorded");
                patient.body_temperatures = stored.body_temperatures;
            }
        }
    }
}
