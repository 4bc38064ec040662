//! Sub-document upserts applied to a loaded patient.
//!
//! These functions are pure: they mutate the patient in hand and report what
//! happened. Persisting the result is the store's job, which runs them
//! inside its atomic `modify` so concurrent writers cannot lose updates.

use chrono::NaiveDate;

use crate::clock::format_date;
use crate::dto::{MedicationUpsert, TemperatureUpsert};
use crate::model::{Medication, Patient, Temperature};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MedicationOutcome {
    Updated,
    Added,
}

impl MedicationOutcome {
    pub fn message(self) -> &'static str {
        match self {
            MedicationOutcome::Updated => "Medication updated",
            MedicationOutcome::Added => "Medication added",
        }
    }
}

/// Replaces the medication whose `_id` matches, or appends a new one with
/// an identity from `fresh_id`.
pub fn upsert_medication(
    patient: &mut Patient,
    upsert: MedicationUpsert,
    fresh_id: impl FnOnce() -> String,
) -> MedicationOutcome {
    let existing = upsert
        .id
        .as_deref()
        .and_then(|id| patient.medications.iter().position(|m| m.id == id));

    let (id, outcome) = match (existing, upsert.id) {
        (Some(index), Some(id)) => (Some((index, id)), MedicationOutcome::Updated),
        _ => (None, MedicationOutcome::Added),
    };

    let build = |id: String| Medication {
        id,
        name: upsert.name,
        dosage: upsert.dosage,
        start_date: upsert.start_date,
        end_date: upsert.end_date,
        dates_taken: upsert.dates_taken,
    };

    match id {
        Some((index, id)) => patient.medications[index] = build(id),
        None => patient.medications.push(build(fresh_id())),
    }
    outcome
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemperatureOutcome {
    /// An entry for the date existed and was overwritten.
    Updated(Temperature),
    /// No entry for the date existed; one was appended.
    Added,
    /// No entry for the date existed but the caller's `lastModified` is
    /// today, so nothing was written.
    AlreadyRecorded,
}

impl TemperatureOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            TemperatureOutcome::Updated(_) => "Temperature updated",
            TemperatureOutcome::Added => "Temperature added",
            TemperatureOutcome::AlreadyRecorded => "Temperature already added/modified today",
        }
    }
}

/// Applies the once-per-day temperature rule. Every written entry is
/// stamped with `today`.
pub fn upsert_temperature(
    patient: &mut Patient,
    upsert: TemperatureUpsert,
    today: NaiveDate,
) -> TemperatureOutcome {
    let date = format_date(upsert.date);
    let today = format_date(today);
    let reading = Temperature {
        date,
        temperature: upsert.temperature,
        last_modified: Some(today.clone()),
    };

    if let Some(existing) = patient
        .body_temperatures
        .iter_mut()
        .find(|t| t.date == reading.date)
    {
        *existing = reading.clone();
        return TemperatureOutcome::Updated(reading);
    }

    if upsert.last_modified.as_deref() != Some(today.as_str()) {
        patient.body_temperatures.push(reading);
        TemperatureOutcome::Added
    } else {
        TemperatureOutcome::AlreadyRecorded
    }
}
