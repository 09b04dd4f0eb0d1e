//! Home screen: daily counters, patient quick search and recent history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::history::Consultation;
use crate::patient::{NewPatient, Patient};

/// Number of active alerts from which the home screen shows a warning banner.
pub const ALERT_BANNER_THRESHOLD: usize = 5;

/// Consultations shown in the selected patient's recent-history card.
pub const RECENT_HISTORY_LEN: usize = 3;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_patients: usize,
    pub consultations_today: usize,
    /// Today's consultations whose diagnosis mentions "urgente".
    pub active_alerts: usize,
    /// Every stored consultation produces a prescription document.
    pub prescriptions_generated: usize,
}

impl DashboardStats {
    pub fn compute(patients: &[Patient], consultations: &[Consultation], today: NaiveDate) -> Self {
        let prefix = today.format("%Y-%m-%d").to_string();
        let todays: Vec<&Consultation> = consultations
            .iter()
            .filter(|consultation| consultation.fecha.starts_with(&prefix))
            .collect();
        let active_alerts = todays
            .iter()
            .filter(|consultation| consultation.diagnostico.to_lowercase().contains("urgente"))
            .count();

        Self {
            total_patients: patients.len(),
            consultations_today: todays.len(),
            active_alerts,
            prescriptions_generated: consultations.len(),
        }
    }

    pub fn shows_alert_banner(&self) -> bool {
        self.active_alerts >= ALERT_BANNER_THRESHOLD
    }
}

/// Outcome of the home-screen patient search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatientLookup {
    /// Start a consultation for this patient.
    Found(i64),
    /// Nobody matched: open the registration form pre-filled with the query.
    NotFound(NewPatient),
}

/// Patients whose name contains `query`, ignoring case.
pub fn matching_patients<'a>(patients: &'a [Patient], query: &str) -> Vec<&'a Patient> {
    let query = query.to_lowercase();
    patients
        .iter()
        .filter(|patient| patient.nombre.to_lowercase().contains(&query))
        .collect()
}

pub fn lookup_patient(patients: &[Patient], query: &str) -> PatientLookup {
    match matching_patients(patients, query).first() {
        Some(patient) => PatientLookup::Found(patient.id),
        None => PatientLookup::NotFound(NewPatient::named(query)),
    }
}

pub fn recent_consultations(history: &[Consultation], limit: usize) -> &[Consultation] {
    &history[..history.len().min(limit)]
}

/// State of the home screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeState {
    pub patients: Vec<Patient>,
    pub stats: DashboardStats,
    pub search: String,
    pub selected: Option<i64>,
    /// History of the selected patient.
    pub history: Vec<Consultation>,
    pub loading: bool,
}

impl HomeState {
    pub fn suggestions(&self) -> Vec<&Patient> {
        if self.search.is_empty() {
            return Vec::new();
        }
        matching_patients(&self.patients, &self.search)
    }

    pub fn lookup(&self) -> PatientLookup {
        lookup_patient(&self.patients, &self.search)
    }

    pub fn recent_history(&self) -> &[Consultation] {
        recent_consultations(&self.history, RECENT_HISTORY_LEN)
    }
}
