//! Screen-level operations. Network failures are logged and swallowed so the
//! caller's state stays as it was; only a consultation without a patient is
//! reported back as a blocking error.

use chrono::NaiveDate;
use futures::try_join;
use meditrack_core::{
    normalize_for_submit, ConsultationDraft, DashboardStats, HistoryBrowser, HomeState,
    NewPatient, Patient, ValidationError,
};
use tracing::{error, info};

use crate::client::{ApiClient, SavedConsultation};
use crate::error::ApiError;

fn swallow<T>(operation: &str, result: Result<T, ApiError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            error!(operation, path = err.path(), error = %err, "request failed");
            None
        }
    }
}

/// Replaces `patients` with the server list. Left unchanged on failure.
pub async fn load_patients(client: &ApiClient, patients: &mut Vec<Patient>) {
    if let Some(list) = swallow("load_patients", client.list_patients().await) {
        *patients = list;
    }
}

/// Pre-selects the patient given in the page's `paciente` parameter. The
/// draft is only touched when the server lists that patient.
pub async fn attach_patient(
    client: &ApiClient,
    draft: &mut ConsultationDraft,
    patient_id: i64,
) -> Option<Patient> {
    let patients = swallow("attach_patient", client.list_patients().await)?;
    let found = patients.into_iter().find(|patient| patient.id == patient_id)?;
    draft.paciente = Some(found.id);
    Some(found)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub consultation: SavedConsultation,
    /// Absolute location of the generated prescription, if any.
    pub document_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("No se pudo guardar la consulta: {0}")]
    Api(#[from] ApiError),
}

/// Validates and posts the draft. The draft is only reset once the server
/// has accepted it.
pub async fn submit_consultation(
    client: &ApiClient,
    draft: &mut ConsultationDraft,
) -> Result<SubmitOutcome, SubmitError> {
    let payload = normalize_for_submit(draft)?;

    let consultation = match client.create_consultation(&payload).await {
        Ok(consultation) => consultation,
        Err(err) => {
            error!(operation = "submit_consultation", path = err.path(), error = %err, "request failed");
            return Err(err.into());
        }
    };

    info!(paciente = payload.paciente, id = ?consultation.id, "consultation saved");
    let document_url = consultation
        .url_receta
        .as_deref()
        .filter(|reference| !reference.trim().is_empty())
        .map(|reference| client.config().document_url(reference));
    draft.reset_after_save();

    Ok(SubmitOutcome {
        consultation,
        document_url,
    })
}

/// Reloads consultations and patients together for the history screen.
pub async fn refresh_history(client: &ApiClient, browser: &mut HistoryBrowser) {
    browser.loading = true;
    let fetched = try_join!(client.list_history(), client.list_patients());
    if let Some((consultations, patients)) = swallow("refresh_history", fetched) {
        browser.consultations = consultations;
        browser.patients = patients;
    }
    browser.loading = false;
}

/// Reloads the patient list and the day's counters of the home screen.
pub async fn refresh_dashboard(client: &ApiClient, home: &mut HomeState, today: NaiveDate) {
    home.loading = true;
    let fetched = try_join!(client.list_patients(), client.list_consultations());
    if let Some((patients, consultations)) = swallow("refresh_dashboard", fetched) {
        home.stats = DashboardStats::compute(&patients, &consultations, today);
        home.patients = patients;
    }
    home.loading = false;
}

/// Selects `patient_id` on the home screen and loads its history. A failed
/// fetch leaves the history empty rather than showing another patient's.
pub async fn load_patient_history(client: &ApiClient, home: &mut HomeState, patient_id: i64) {
    home.selected = Some(patient_id);
    home.history = swallow(
        "load_patient_history",
        client.list_consultations_for_patient(patient_id).await,
    )
    .unwrap_or_default();
}

/// Registers a patient and appends it to `patients`.
pub async fn register_patient(
    client: &ApiClient,
    patients: &mut Vec<Patient>,
    new_patient: &NewPatient,
) -> Option<Patient> {
    let created = swallow("register_patient", client.create_patient(new_patient).await)?;
    info!(id = created.id, "patient registered");
    patients.push(created.clone());
    Some(created)
}
