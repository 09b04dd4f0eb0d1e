//! Consultation draft being composed in the form, and its normalization into
//! the payload sent to the API.

use serde::{Deserialize, Serialize};

use crate::bmi::{compute_bmi, format_blood_pressure_input};
use crate::numeric::{leading_integer, strict_decimal, two_decimals};
use crate::patient::null_as_default;
use crate::vitals::{is_out_of_range, VitalField};

/// One prescribed medication line.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MedicationEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub nombre: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub posologia: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub duracion: String,
}

impl MedicationEntry {
    pub fn new(
        nombre: impl Into<String>,
        posologia: impl Into<String>,
        duracion: impl Into<String>,
    ) -> Self {
        Self {
            nombre: nombre.into(),
            posologia: posologia.into(),
            duracion: duracion.into(),
        }
    }
}

/// Editable fields of the consultation form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    Motivo,
    Antecedentes,
    Diagnostico,
    Medico,
    Notas,
    Peso,
    Talla,
    Imc,
    FrecuenciaCardiaca,
    FrecuenciaRespiratoria,
    PresionArterial,
    Glucometria,
    Oximetria,
    Temperatura,
}

/// Working record of a consultation. Vitals stay as typed text until
/// [`normalize_for_submit`] turns them into numbers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConsultationDraft {
    pub paciente: Option<i64>,
    pub motivo: String,
    pub antecedentes: String,
    pub diagnostico: String,
    pub medico: String,
    pub notas: String,
    pub peso: String,
    pub talla: String,
    pub imc: String,
    pub frecuencia_cardiaca: String,
    pub frecuencia_respiratoria: String,
    pub presion_arterial: String,
    pub glucometria: String,
    pub oximetria: String,
    pub temperatura: String,
    pub tratamiento: Vec<MedicationEntry>,
}

impl ConsultationDraft {
    pub fn for_patient(paciente: i64) -> Self {
        Self {
            paciente: Some(paciente),
            ..Self::default()
        }
    }

    pub fn field(&self, field: DraftField) -> &str {
        match field {
            DraftField::Motivo => &self.motivo,
            DraftField::Antecedentes => &self.antecedentes,
            DraftField::Diagnostico => &self.diagnostico,
            DraftField::Medico => &self.medico,
            DraftField::Notas => &self.notas,
            DraftField::Peso => &self.peso,
            DraftField::Talla => &self.talla,
            DraftField::Imc => &self.imc,
            DraftField::FrecuenciaCardiaca => &self.frecuencia_cardiaca,
            DraftField::FrecuenciaRespiratoria => &self.frecuencia_respiratoria,
            DraftField::PresionArterial => &self.presion_arterial,
            DraftField::Glucometria => &self.glucometria,
            DraftField::Oximetria => &self.oximetria,
            DraftField::Temperatura => &self.temperatura,
        }
    }

    /// Applies one input change. Weight and height edits recompute the BMI,
    /// and blood pressure goes through the `SSS/DDD` mask.
    pub fn set_field(&mut self, field: DraftField, value: &str) {
        match field {
            DraftField::PresionArterial => {
                self.presion_arterial = format_blood_pressure_input(value);
            }
            DraftField::Peso | DraftField::Talla => {
                *self.field_mut(field) = value.to_string();
                self.imc = compute_bmi(&self.peso, &self.talla).unwrap_or_default();
            }
            _ => *self.field_mut(field) = value.to_string(),
        }
    }

    fn field_mut(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::Motivo => &mut self.motivo,
            DraftField::Antecedentes => &mut self.antecedentes,
            DraftField::Diagnostico => &mut self.diagnostico,
            DraftField::Medico => &mut self.medico,
            DraftField::Notas => &mut self.notas,
            DraftField::Peso => &mut self.peso,
            DraftField::Talla => &mut self.talla,
            DraftField::Imc => &mut self.imc,
            DraftField::FrecuenciaCardiaca => &mut self.frecuencia_cardiaca,
            DraftField::FrecuenciaRespiratoria => &mut self.frecuencia_respiratoria,
            DraftField::PresionArterial => &mut self.presion_arterial,
            DraftField::Glucometria => &mut self.glucometria,
            DraftField::Oximetria => &mut self.oximetria,
            DraftField::Temperatura => &mut self.temperatura,
        }
    }

    /// Raw text of a vital with a reference range.
    pub fn vital(&self, field: VitalField) -> &str {
        match field {
            VitalField::HeartRate => &self.frecuencia_cardiaca,
            VitalField::RespiratoryRate => &self.frecuencia_respiratoria,
            VitalField::Glucose => &self.glucometria,
            VitalField::Oximetry => &self.oximetria,
            VitalField::Temperature => &self.temperatura,
            VitalField::BloodPressure => &self.presion_arterial,
            VitalField::Bmi => &self.imc,
        }
    }

    /// Vitals currently outside their reference range, in table order.
    pub fn abnormal_vitals(&self) -> Vec<VitalField> {
        VitalField::ALL
            .into_iter()
            .filter(|field| is_out_of_range(*field, self.vital(*field)))
            .collect()
    }

    pub fn add_medication(&mut self, entry: MedicationEntry) -> Result<(), DraftError> {
        if entry.nombre.trim().is_empty() || entry.posologia.trim().is_empty() {
            return Err(DraftError::IncompleteMedication);
        }
        self.tratamiento.push(entry);
        Ok(())
    }

    pub fn remove_medication(&mut self, index: usize) -> Result<MedicationEntry, DraftError> {
        if index >= self.tratamiento.len() {
            return Err(DraftError::NoSuchMedication(index));
        }
        Ok(self.tratamiento.remove(index))
    }

    /// Clears the form after a successful save, keeping the selected patient.
    pub fn reset_after_save(&mut self) {
        *self = Self {
            paciente: self.paciente,
            ..Self::default()
        };
    }
}

/// Body of `POST /api/pacientes/consultas/`. Every vital key is always
/// serialized; missing values go out as `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConsultationPayload {
    pub paciente: i64,
    pub paciente_id: i64,
    pub motivo: String,
    pub antecedentes: String,
    pub diagnostico: String,
    pub medico: String,
    pub notas: String,
    pub peso: Option<String>,
    pub talla: Option<String>,
    pub imc: Option<String>,
    pub temperatura: Option<String>,
    pub frecuencia_cardiaca: Option<i64>,
    pub frecuencia_respiratoria: Option<i64>,
    pub glucometria: Option<i64>,
    pub oximetria: Option<i64>,
    pub presion_arterial: String,
    pub tratamiento: Vec<MedicationEntry>,
}

/// Errors that block a submission before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("No se ha asignado el paciente.")]
    MissingPatient,
}

/// Errors while editing the medication list of a draft.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("El medicamento requiere nombre y posología")]
    IncompleteMedication,
    #[error("No existe el medicamento en la posición {0}")]
    NoSuchMedication(usize),
}

/// Coerces the draft into the submission payload. Only a missing patient is
/// rejected (ids are positive, so `0` counts as missing); unreadable vitals
/// become `null`.
pub fn normalize_for_submit(draft: &ConsultationDraft) -> Result<ConsultationPayload, ValidationError> {
    let paciente = draft
        .paciente
        .filter(|id| *id > 0)
        .ok_or(ValidationError::MissingPatient)?;

    Ok(ConsultationPayload {
        paciente,
        paciente_id: paciente,
        motivo: draft.motivo.clone(),
        antecedentes: draft.antecedentes.clone(),
        diagnostico: draft.diagnostico.clone(),
        medico: draft.medico.clone(),
        notas: draft.notas.clone(),
        peso: decimal_or_null(&draft.peso),
        talla: decimal_or_null(&draft.talla),
        imc: decimal_or_null(&draft.imc),
        temperatura: decimal_or_null(&draft.temperatura),
        frecuencia_cardiaca: leading_integer(&draft.frecuencia_cardiaca),
        frecuencia_respiratoria: leading_integer(&draft.frecuencia_respiratoria),
        glucometria: leading_integer(&draft.glucometria),
        oximetria: leading_integer(&draft.oximetria),
        presion_arterial: draft.presion_arterial.clone(),
        tratamiento: draft.tratamiento.clone(),
    })
}

fn decimal_or_null(raw: &str) -> Option<String> {
    strict_decimal(raw).map(two_decimals)
}
