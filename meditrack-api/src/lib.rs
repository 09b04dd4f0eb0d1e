//! REST access for MediTrack: configuration, a typed client for the clinic
//! endpoints and the screen workflows built on top of it.

mod client;
mod config;
mod error;
pub mod workflow;

pub use client::{
    ApiClient, SavedConsultation, HISTORY_PATH, PATIENTS_PATH, PATIENT_CONSULTATIONS_PATH,
};
pub use config::{ApiConfig, ConfigError, API_URL_VAR, DEFAULT_API_URL};
pub use error::ApiError;
pub use workflow::{SubmitError, SubmitOutcome};
