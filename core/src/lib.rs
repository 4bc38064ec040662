//! Client core for the patient records API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), and holds the dashboard
//! state the single-page client renders from.
//!
//! # Design
//! - `PatientClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit.
//! - `Dashboard` applies parsed results; failures are logged and dropped.
//! - DTOs are defined independently from the server crate; integration
//!   tests catch schema drift.

pub mod actions;
pub mod client;
pub mod dashboard;
pub mod error;
pub mod history;
pub mod http;
pub mod types;

pub use client::PatientClient;
pub use dashboard::Dashboard;
pub use error::ApiError;
pub use history::{TemperatureSeries, TimeScale};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{
    Medication, MedicationForm, MedicationOutcome, Pagination, Patient, PatientPage, Temperature,
    TemperatureForm, TemperatureOutcome,
};
