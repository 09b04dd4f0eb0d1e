//! Consultation history: records returned by the API and the search/filter
//! state of the history screen.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::consultation::MedicationEntry;
use crate::patient::{null_as_default, Patient};
use crate::vitals::{is_out_of_range, VitalField};

pub const UNKNOWN_PATIENT: &str = "Paciente no encontrado";
pub const INVALID_DATE: &str = "Fecha no válida";

/// A stored consultation as listed by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Consultation {
    pub id: i64,
    pub paciente: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fecha: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub motivo: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub antecedentes: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub diagnostico: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tratamiento: Vec<MedicationEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub medico: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notas: String,
    #[serde(default)]
    pub url_receta: Option<String>,
    #[serde(flatten)]
    pub vitals: RecordedVitals,
}

/// Vitals stored with a consultation. The server returns decimals as strings
/// and counts as numbers; both are kept as text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordedVitals {
    #[serde(default, deserialize_with = "scalar_text")]
    pub peso: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub talla: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub imc: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub temperatura: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub frecuencia_cardiaca: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub frecuencia_respiratoria: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub glucometria: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub oximetria: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub presion_arterial: Option<String>,
}

impl RecordedVitals {
    pub fn get(&self, field: VitalField) -> Option<&str> {
        let value = match field {
            VitalField::HeartRate => &self.frecuencia_cardiaca,
            VitalField::RespiratoryRate => &self.frecuencia_respiratoria,
            VitalField::Glucose => &self.glucometria,
            VitalField::Oximetry => &self.oximetria,
            VitalField::Temperature => &self.temperatura,
            VitalField::BloodPressure => &self.presion_arterial,
            VitalField::Bmi => &self.imc,
        };
        value.as_deref()
    }

    /// Recorded vitals outside their reference range, in table order.
    pub fn abnormal(&self) -> Vec<VitalField> {
        VitalField::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_some_and(|raw| is_out_of_range(*field, raw)))
            .collect()
    }
}

fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

impl Consultation {
    /// Wall-clock time of the consultation as written by the server.
    pub fn recorded_at(&self) -> Option<NaiveDateTime> {
        parse_fecha(&self.fecha)
    }

    pub fn has_prescription(&self) -> bool {
        self.url_receta
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }
}

/// Accepts RFC 3339 timestamps, naive timestamps and bare dates.
pub fn parse_fecha(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Spanish long form, e.g. `viernes, 9 de mayo de 2025, 10:30`.
pub fn format_fecha_larga(raw: &str) -> String {
    let Some(dt) = parse_fecha(raw) else {
        return INVALID_DATE.to_string();
    };
    format!(
        "{}, {} de {} de {}, {:02}:{:02}",
        weekday_name(dt.weekday()),
        dt.day(),
        month_name(dt.month()),
        dt.year(),
        dt.hour(),
        dt.minute()
    )
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "lunes",
        Weekday::Tue => "martes",
        Weekday::Wed => "miércoles",
        Weekday::Thu => "jueves",
        Weekday::Fri => "viernes",
        Weekday::Sat => "sábado",
        Weekday::Sun => "domingo",
    }
}

fn month_name(month: u32) -> &'static str {
    const MONTHS: [&str; 12] = [
        "enero",
        "febrero",
        "marzo",
        "abril",
        "mayo",
        "junio",
        "julio",
        "agosto",
        "septiembre",
        "octubre",
        "noviembre",
        "diciembre",
    ];
    MONTHS
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or_default()
}

/// Name of the patient with `id`, or [`UNKNOWN_PATIENT`].
pub fn patient_name(patients: &[Patient], id: i64) -> &str {
    patients
        .iter()
        .find(|patient| patient.id == id)
        .map(|patient| patient.nombre.as_str())
        .unwrap_or(UNKNOWN_PATIENT)
}

/// Advanced filters of the history screen. Date bounds are inclusive
/// calendar days.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HistoryFilters {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub patient_id: Option<i64>,
    pub patient_name: String,
    pub has_prescription: bool,
}

impl HistoryFilters {
    pub fn is_active(&self) -> bool {
        self.date_from.is_some()
            || self.date_to.is_some()
            || self.patient_id.is_some()
            || !self.patient_name.trim().is_empty()
            || self.has_prescription
    }

    fn accepts(&self, consultation: &Consultation, name_lower: &str) -> bool {
        if self.date_from.is_some() || self.date_to.is_some() {
            let Some(day) = consultation.recorded_at().map(|dt| dt.date()) else {
                return false;
            };
            if self.date_from.is_some_and(|from| day < from)
                || self.date_to.is_some_and(|to| day > to)
            {
                return false;
            }
        }
        if self.patient_id.is_some_and(|id| consultation.paciente != id) {
            return false;
        }
        let wanted_name = self.patient_name.trim().to_lowercase();
        if !wanted_name.is_empty() && !name_lower.contains(&wanted_name) {
            return false;
        }
        !self.has_prescription || consultation.has_prescription()
    }
}

/// Free-text search over reason, diagnosis, patient id and patient name.
fn matches_search(consultation: &Consultation, name_lower: &str, term: &str) -> bool {
    let term_lower = term.to_lowercase();
    consultation.motivo.to_lowercase().contains(&term_lower)
        || consultation.diagnostico.to_lowercase().contains(&term_lower)
        || consultation.paciente.to_string().contains(term)
        || name_lower.contains(&term_lower)
}

/// Filters `consultations` by the search term and advanced filters,
/// preserving order.
pub fn filter_consultations<'a>(
    consultations: &'a [Consultation],
    patients: &[Patient],
    term: &str,
    filters: &HistoryFilters,
) -> Vec<&'a Consultation> {
    consultations
        .iter()
        .filter(|consultation| {
            let name_lower = patient_name(patients, consultation.paciente).to_lowercase();
            matches_search(consultation, &name_lower, term) && filters.accepts(consultation, &name_lower)
        })
        .collect()
}

/// State of the history screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryBrowser {
    pub consultations: Vec<Consultation>,
    pub patients: Vec<Patient>,
    pub search_term: String,
    pub filters: HistoryFilters,
    pub loading: bool,
    expanded: Option<i64>,
}

impl HistoryBrowser {
    pub fn with_records(consultations: Vec<Consultation>, patients: Vec<Patient>) -> Self {
        Self {
            consultations,
            patients,
            ..Self::default()
        }
    }

    pub fn filtered(&self) -> Vec<&Consultation> {
        filter_consultations(
            &self.consultations,
            &self.patients,
            &self.search_term,
            &self.filters,
        )
    }

    pub fn patient_name(&self, id: i64) -> &str {
        patient_name(&self.patients, id)
    }

    /// Expands `id`, or collapses it when it is already the expanded one.
    pub fn toggle_expanded(&mut self, id: i64) {
        self.expanded = if self.expanded == Some(id) { None } else { Some(id) };
    }

    pub fn expanded(&self) -> Option<i64> {
        self.expanded
    }

    /// Message for an empty result list.
    pub fn empty_message(&self) -> &'static str {
        if !self.search_term.is_empty() || self.filters.is_active() {
            "Intenta ajustar tus criterios de búsqueda"
        } else {
            "No hay consultas registradas en el sistema"
        }
    }
}
