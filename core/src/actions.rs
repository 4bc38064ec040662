//! Daily checklist: has today's temperature been taken, which medications
//! have been administered, and the forms that record either.

use chrono::{Local, NaiveDate};

use crate::types::{Medication, MedicationForm, Patient, TemperatureForm};

/// `YYYY-MM-DD` for a calendar date.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Today in local time, formatted as the API expects.
pub fn today() -> String {
    format_date(Local::now().date_naive())
}

pub fn temperature_taken_on(patient: &Patient, date: &str) -> bool {
    patient.body_temperatures.iter().any(|t| t.date == date)
}

pub fn medication_taken_on(medication: &Medication, date: &str) -> bool {
    medication.dates_taken.iter().any(|d| d == date)
}

/// Medications not yet administered on `date`, in list order.
pub fn pending_medications<'a>(patient: &'a Patient, date: &str) -> Vec<&'a Medication> {
    patient
        .medications
        .iter()
        .filter(|m| !medication_taken_on(m, date))
        .collect()
}

/// Upsert form flipping the "taken on `date`" mark: appends the date when
/// absent, removes every occurrence when present.
pub fn toggle_taken(patient_id: i64, medication: &Medication, date: &str) -> MedicationForm {
    let mut form = MedicationForm::edit(patient_id, medication);
    if medication_taken_on(medication, date) {
        form.dates_taken.retain(|d| d != date);
    } else {
        form.dates_taken.push(date.to_string());
    }
    form
}

/// True when the reading for `date` was also last modified on `date`; the
/// temperature form stays disabled in that case.
pub fn temperature_locked(patient: &Patient, date: &str) -> bool {
    patient
        .body_temperatures
        .iter()
        .any(|t| t.date == date && t.last_modified.as_deref() == Some(date))
}

/// Form recording a reading for `date`. No `lastModified` is sent, so a new
/// date is always appended by the server.
pub fn temperature_form(patient_id: i64, date: &str, temperature: f64) -> TemperatureForm {
    TemperatureForm {
        patient_id,
        date: date.to_string(),
        temperature,
        last_modified: None,
    }
}
