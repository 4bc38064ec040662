use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::dto::{path_patient_id, Envelope, MedicationForm, PageQuery, TemperatureForm};
use crate::error::ApiError;
use crate::model::{Pagination, Patient, PatientPage};
use crate::records::{self, MedicationOutcome, TemperatureOutcome};
use crate::seed::new_medication_id;
use crate::store::PatientStore;
use crate::AppState;

pub async fn count_patients<S: PatientStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<u64>, ApiError> {
    Ok(Json(state.store.count().await?))
}

pub async fn get_patient<S: PatientStore>(
    State(state): State<AppState<S>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Patient>, ApiError> {
    let id = path_patient_id(&raw_id)?;
    state
        .store
        .find(id)
        .await?
        .map(Json)
        .ok_or_else(ApiError::patient_not_found)
}

pub async fn list_patients<S: PatientStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PatientPage>, ApiError> {
    let (page, size) = query.resolve()?;
    let total_items = state.store.count().await?;
    let pagination = Pagination::new(page, size, total_items);
    let patients = state.store.page(pagination.offset(), size).await?;
    Ok(Json(PatientPage {
        patients,
        pagination,
    }))
}

pub async fn upsert_medication<S: PatientStore>(
    State(state): State<AppState<S>>,
    payload: Result<Json<MedicationForm>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(form) = payload?;
    let upsert = form.validate()?;
    let patient_id = upsert.patient_id;

    let (outcome, medications) = state
        .store
        .modify(patient_id, move |patient| {
            let outcome = records::upsert_medication(patient, upsert, new_medication_id);
            (outcome, patient.medications.clone())
        })
        .await?
        .ok_or_else(ApiError::patient_not_found)?;

    let status = match outcome {
        MedicationOutcome::Updated => StatusCode::OK,
        MedicationOutcome::Added => StatusCode::CREATED,
    };
    tracing::debug!(patient_id, ?outcome, "medication upserted");
    let body = Envelope {
        message: outcome.message(),
        data: medications,
    };
    Ok((status, Json(body)).into_response())
}

pub async fn upsert_temperature<S: PatientStore>(
    State(state): State<AppState<S>>,
    payload: Result<Json<TemperatureForm>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(form) = payload?;
    let upsert = form.validate()?;
    let patient_id = upsert.patient_id;
    let today = state.clock.today();

    let (outcome, patient) = state
        .store
        .modify(patient_id, move |patient| {
            let outcome = records::upsert_temperature(patient, upsert, today);
            (outcome, patient.clone())
        })
        .await?
        .ok_or_else(ApiError::patient_not_found)?;

    let message = outcome.message();
    tracing::debug!(patient_id, outcome = message, "temperature upsert handled");
    let response = match outcome {
        TemperatureOutcome::Updated(reading) => (
            StatusCode::OK,
            Json(Envelope {
                message,
                data: reading,
            }),
        )
            .into_response(),
        TemperatureOutcome::Added | TemperatureOutcome::AlreadyRecorded => (
            StatusCode::CREATED,
            Json(Envelope {
                message,
                data: patient,
            }),
        )
            .into_response(),
    };
    Ok(response)
}
