//! Thin typed wrapper over the clinic's REST endpoints.

use meditrack_core::{Consultation, ConsultationPayload, NewPatient, Patient};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::ApiError;

pub const PATIENTS_PATH: &str = "/api/pacientes/";
pub const PATIENT_CONSULTATIONS_PATH: &str = "/api/pacientes/consultas/";
pub const HISTORY_PATH: &str = "/api/consultas/";

/// A consultation as echoed back after creation. The server may attach a
/// generated prescription document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SavedConsultation {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub url_receta: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self::with_http_client(config, Client::new())
    }

    pub fn with_http_client(config: ApiConfig, http: Client) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// `GET /api/pacientes/`
    pub async fn list_patients(&self) -> Result<Vec<Patient>, ApiError> {
        self.get_json(PATIENTS_PATH).await
    }

    /// `POST /api/pacientes/`
    pub async fn create_patient(&self, patient: &NewPatient) -> Result<Patient, ApiError> {
        self.post_json(PATIENTS_PATH, patient).await
    }

    /// `GET /api/pacientes/consultas/`
    pub async fn list_consultations(&self) -> Result<Vec<Consultation>, ApiError> {
        self.get_json(PATIENT_CONSULTATIONS_PATH).await
    }

    /// `GET /api/pacientes/consultas/{id}/`. Anything other than a JSON array
    /// is read as an empty history.
    pub async fn list_consultations_for_patient(
        &self,
        patient_id: i64,
    ) -> Result<Vec<Consultation>, ApiError> {
        let path = format!("{PATIENT_CONSULTATIONS_PATH}{patient_id}/");
        let value: Value = self.get_json(&path).await?;
        if !value.is_array() {
            warn!(%path, "patient history is not a list; treating as empty");
            return Ok(Vec::new());
        }
        serde_json::from_value(value).map_err(|source| ApiError::Decode { path, source })
    }

    /// `POST /api/pacientes/consultas/`
    pub async fn create_consultation(
        &self,
        payload: &ConsultationPayload,
    ) -> Result<SavedConsultation, ApiError> {
        self.post_json(PATIENT_CONSULTATIONS_PATH, payload).await
    }

    /// `GET /api/consultas/`, the listing used by the history screen.
    pub async fn list_history(&self) -> Result<Vec<Consultation>, ApiError> {
        self.get_json(HISTORY_PATH).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!(%path, "GET");
        let response = self
            .http
            .get(self.config.endpoint(path))
            .send()
            .await
            .map_err(|source| transport(path, source))?;
        decode(path, response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(%path, "POST");
        let response = self
            .http
            .post(self.config.endpoint(path))
            .json(body)
            .send()
            .await
            .map_err(|source| transport(path, source))?;
        decode(path, response).await
    }
}

fn transport(path: &str, source: reqwest::Error) -> ApiError {
    ApiError::Transport {
        path: path.to_string(),
        source,
    }
}

async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await.map_err(|source| transport(path, source))?;

    if !status.is_success() {
        return Err(ApiError::Status {
            path: path.to_string(),
            status,
            body,
        });
    }

    serde_json::from_str(&body).map_err(|source| ApiError::Decode {
        path: path.to_string(),
        source,
    })
}
