//! REST service over a collection of patient documents.
//!
//! Read endpoints fetch a patient by id or page through the collection in
//! insertion order. Write endpoints upsert medications (by `_id`) and
//! temperature readings (by date, at most one per day) inside a patient
//! document. The router is generic over [`store::PatientStore`].

pub mod clock;
pub mod config;
pub mod dto;
pub mod error;
pub mod model;
pub mod records;
pub mod routes;
pub mod seed;
pub mod store;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use clock::{Clock, FixedClock, SystemClock};
pub use model::{Medication, Pagination, Patient, PatientPage, Temperature};
pub use store::{MemoryStore, PatientStore, SqliteStore};

/// Shared handler state: the collection and the clock that decides "today".
pub struct AppState<S> {
    pub store: S,
    pub clock: Arc<dyn Clock>,
}

impl<S: Clone> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S: PatientStore> AppState<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }

    pub fn with_clock(store: S, clock: impl Clock + 'static) -> Self {
        Self {
            store,
            clock: Arc::new(clock),
        }
    }
}

pub fn app<S: PatientStore>(state: AppState<S>) -> Router {
    Router::new()
        .route("/", get(routes::count_patients::<S>))
        .route("/patients", get(routes::list_patients::<S>))
        .route("/patients/{id}", get(routes::get_patient::<S>))
        .route("/medication", post(routes::upsert_medication::<S>))
        .route("/temperature", post(routes::upsert_temperature::<S>))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn run<S: PatientStore>(
    listener: TcpListener,
    state: AppState<S>,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}
