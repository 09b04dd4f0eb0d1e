//! Vital-sign reference ranges and the out-of-range check used to flag inputs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::numeric::leading_number;

/// Measurements that carry a clinical reference range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum VitalField {
    #[serde(rename = "frecuencia_cardiaca")]
    HeartRate,
    #[serde(rename = "frecuencia_respiratoria")]
    RespiratoryRate,
    #[serde(rename = "glucometria")]
    Glucose,
    #[serde(rename = "oximetria")]
    Oximetry,
    #[serde(rename = "temperatura")]
    Temperature,
    #[serde(rename = "presion_arterial")]
    BloodPressure,
    #[serde(rename = "imc")]
    Bmi,
}

impl VitalField {
    pub const ALL: [VitalField; 7] = [
        VitalField::HeartRate,
        VitalField::RespiratoryRate,
        VitalField::Glucose,
        VitalField::Oximetry,
        VitalField::Temperature,
        VitalField::BloodPressure,
        VitalField::Bmi,
    ];

    /// Field name used by the consultation form and the REST payload.
    pub fn as_str(self) -> &'static str {
        match self {
            VitalField::HeartRate => "frecuencia_cardiaca",
            VitalField::RespiratoryRate => "frecuencia_respiratoria",
            VitalField::Glucose => "glucometria",
            VitalField::Oximetry => "oximetria",
            VitalField::Temperature => "temperatura",
            VitalField::BloodPressure => "presion_arterial",
            VitalField::Bmi => "imc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VitalField::HeartRate => "Frec. Cardíaca",
            VitalField::RespiratoryRate => "Frec. Respiratoria",
            VitalField::Glucose => "Glucometría",
            VitalField::Oximetry => "Oximetría",
            VitalField::Temperature => "Temperatura",
            VitalField::BloodPressure => "Presión Arterial",
            VitalField::Bmi => "IMC",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            VitalField::HeartRate => "lpm",
            VitalField::RespiratoryRate => "rpm",
            VitalField::Glucose => "mg/dL",
            VitalField::Oximetry => "%",
            VitalField::Temperature => "°C",
            VitalField::BloodPressure => "mmHg",
            VitalField::Bmi => "kg/m²",
        }
    }
}

impl fmt::Display for VitalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Campo de signo vital desconocido: {0}")]
pub struct UnknownVitalField(pub String);

impl FromStr for VitalField {
    type Err = UnknownVitalField;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        VitalField::ALL
            .into_iter()
            .find(|field| field.as_str() == value)
            .ok_or_else(|| UnknownVitalField(value.to_string()))
    }
}

/// Normal band for a measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReferenceRange {
    /// A single value; `max` of `None` means unbounded above.
    Single { min: f64, max: Option<f64> },
    /// Blood pressure: systolic and diastolic bands checked independently.
    Paired {
        systolic_min: f64,
        systolic_max: f64,
        diastolic_min: f64,
        diastolic_max: f64,
    },
}

/// Reference table for every vital field.
pub const fn reference_range(field: VitalField) -> ReferenceRange {
    match field {
        VitalField::HeartRate => ReferenceRange::Single {
            min: 60.0,
            max: Some(100.0),
        },
        VitalField::RespiratoryRate => ReferenceRange::Single {
            min: 12.0,
            max: Some(20.0),
        },
        VitalField::Glucose => ReferenceRange::Single {
            min: 70.0,
            max: Some(140.0),
        },
        VitalField::Oximetry => ReferenceRange::Single {
            min: 95.0,
            max: Some(100.0),
        },
        VitalField::Temperature => ReferenceRange::Single {
            min: 36.5,
            max: Some(37.5),
        },
        VitalField::BloodPressure => ReferenceRange::Paired {
            systolic_min: 90.0,
            systolic_max: 120.0,
            diastolic_min: 60.0,
            diastolic_max: 80.0,
        },
        VitalField::Bmi => ReferenceRange::Single {
            min: 18.5,
            max: Some(24.9),
        },
    }
}

/// Whether `raw_value` lies outside the normal band for `field`.
///
/// Empty or non-numeric input is never flagged. A blood-pressure value that
/// starts with a number but does not split into exactly two parts on `/` is
/// flagged, so `"12345"` is abnormal while `""` is not.
pub fn is_out_of_range(field: VitalField, raw_value: &str) -> bool {
    let Some(value) = leading_number(raw_value) else {
        return false;
    };

    match reference_range(field) {
        ReferenceRange::Single { min, max } => value < min || value > max.unwrap_or(f64::INFINITY),
        ReferenceRange::Paired {
            systolic_min,
            systolic_max,
            diastolic_min,
            diastolic_max,
        } => {
            let parts: Vec<&str> = raw_value.split('/').collect();
            let [systolic, diastolic] = parts.as_slice() else {
                return true;
            };
            outside(leading_number(systolic), systolic_min, systolic_max)
                || outside(leading_number(diastolic), diastolic_min, diastolic_max)
        }
    }
}

/// A missing side compares false, matching NaN comparison semantics.
fn outside(value: Option<f64>, min: f64, max: f64) -> bool {
    value.is_some_and(|v| v < min || v > max)
}

/// A raw reading captured from the consultation form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VitalReading {
    pub field: VitalField,
    pub raw_value: String,
}

impl VitalReading {
    pub fn new(field: VitalField, raw_value: impl Into<String>) -> Self {
        Self {
            field,
            raw_value: raw_value.into(),
        }
    }

    pub fn is_out_of_range(&self) -> bool {
        is_out_of_range(self.field, &self.raw_value)
    }
}

/// Hint shown under each vital input, e.g. `Rango normal: 60-100 lpm`.
pub fn reference_label(field: VitalField) -> String {
    let band = match reference_range(field) {
        ReferenceRange::Single { min, max: Some(max) } => {
            format!("{}-{}", format_bound(min), format_bound(max))
        }
        ReferenceRange::Single { min, max: None } => format!("≥ {}", format_bound(min)),
        ReferenceRange::Paired {
            systolic_min,
            systolic_max,
            diastolic_min,
            diastolic_max,
        } => format!(
            "{}-{}/{}-{}",
            format_bound(systolic_min),
            format_bound(systolic_max),
            format_bound(diastolic_min),
            format_bound(diastolic_max)
        ),
    };
    format!("Rango normal: {band} {}", field.unit())
}

fn format_bound(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}
