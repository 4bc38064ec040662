//! Stateless HTTP request builder and response parser for the patient API.
//!
//! # Design
//! `PatientClient` holds only a `base_url`. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. The caller executes the round-trip.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    Medication, MedicationForm, MedicationOutcome, Patient, PatientPage, Temperature,
    TemperatureForm, TemperatureOutcome,
};

/// Environment variable holding the API base URL.
pub const BACKEND_URL_VAR: &str = "PATIENTS_BACKEND_URL";

#[derive(Deserialize)]
struct Envelope<T> {
    message: String,
    data: T,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Clone)]
pub struct PatientClient {
    base_url: String,
}

impl PatientClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Reads the base URL from `PATIENTS_BACKEND_URL`.
    pub fn from_env() -> Result<Self, std::env::VarError> {
        std::env::var(BACKEND_URL_VAR).map(|url| Self::new(&url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, path: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn post<T: serde::Serialize>(&self, path: &str, input: &T) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}{path}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_count(&self) -> HttpRequest {
        self.get("/".to_string())
    }

    pub fn build_get_patient(&self, id: i64) -> HttpRequest {
        self.get(format!("/patients/{id}"))
    }

    pub fn build_list_patients(&self, page: u64, size: u64) -> HttpRequest {
        self.get(format!("/patients?page={page}&size={size}"))
    }

    pub fn build_upsert_medication(&self, input: &MedicationForm) -> Result<HttpRequest, ApiError> {
        self.post("/medication", input)
    }

    pub fn build_upsert_temperature(
        &self,
        input: &TemperatureForm,
    ) -> Result<HttpRequest, ApiError> {
        self.post("/temperature", input)
    }

    pub fn parse_count(&self, response: HttpResponse) -> Result<u64, ApiError> {
        check_status(&response, &[200])?;
        decode(&response.body)
    }

    pub fn parse_get_patient(&self, response: HttpResponse) -> Result<Patient, ApiError> {
        check_status(&response, &[200])?;
        decode(&response.body)
    }

    pub fn parse_list_patients(&self, response: HttpResponse) -> Result<PatientPage, ApiError> {
        check_status(&response, &[200])?;
        decode(&response.body)
    }

    pub fn parse_upsert_medication(
        &self,
        response: HttpResponse,
    ) -> Result<MedicationOutcome, ApiError> {
        check_status(&response, &[200, 201])?;
        let envelope: Envelope<Vec<Medication>> = decode(&response.body)?;
        Ok(MedicationOutcome {
            created: response.status == 201,
            message: envelope.message,
            medications: envelope.data,
        })
    }

    pub fn parse_upsert_temperature(
        &self,
        response: HttpResponse,
    ) -> Result<TemperatureOutcome, ApiError> {
        check_status(&response, &[200, 201])?;
        if response.status == 200 {
            let envelope: Envelope<Temperature> = decode(&response.body)?;
            return Ok(TemperatureOutcome::Updated(envelope.data));
        }
        let envelope: Envelope<Patient> = decode(&response.body)?;
        Ok(TemperatureOutcome::Recorded {
            message: envelope.message,
            patient: envelope.data,
        })
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: &[u16]) -> Result<(), ApiError> {
    if expected.contains(&response.status) {
        return Ok(());
    }
    match response.status {
        404 => Err(ApiError::NotFound),
        400 => {
            let message = serde_json::from_str::<ErrorBody>(&response.body)
                .map(|e| e.message)
                .unwrap_or_else(|_| response.body.clone());
            Err(ApiError::BadRequest(message))
        }
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}
