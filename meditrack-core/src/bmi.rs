//! Body-mass index and the blood-pressure input mask.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::numeric::{leading_decimal, leading_number, two_decimals};

/// BMI from raw weight (kg) and height (cm) inputs, rendered with exactly two
/// decimals. `None` unless both inputs read as positive numbers.
pub fn compute_bmi(weight_kg: &str, height_cm: &str) -> Option<String> {
    let weight = leading_decimal(weight_kg)?;
    let height = leading_decimal(height_cm)?;
    bmi_from_measurements(weight, height).map(two_decimals)
}

/// `weight / (height_cm / 100)^2` in fixed-point arithmetic.
pub fn bmi_from_measurements(weight_kg: Decimal, height_cm: Decimal) -> Option<Decimal> {
    if weight_kg <= Decimal::ZERO || height_cm <= Decimal::ZERO {
        return None;
    }
    let height_m = height_cm.checked_div(Decimal::ONE_HUNDRED)?;
    let squared = height_m.checked_mul(height_m)?;
    weight_kg.checked_div(squared)
}

/// Weight bands. Each band includes its lower bound and excludes its upper one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    ObesityI,
    ObesityII,
    ObesityIII,
}

impl BmiCategory {
    pub fn label(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Bajo peso",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Sobrepeso",
            BmiCategory::ObesityI => "Obesidad grado I",
            BmiCategory::ObesityII => "Obesidad grado II",
            BmiCategory::ObesityIII => "Obesidad grado III",
        }
    }
}

pub fn classify_bmi(value: f64) -> BmiCategory {
    if value < 18.5 {
        BmiCategory::Underweight
    } else if value < 25.0 {
        BmiCategory::Normal
    } else if value < 30.0 {
        BmiCategory::Overweight
    } else if value < 35.0 {
        BmiCategory::ObesityI
    } else if value < 40.0 {
        BmiCategory::ObesityII
    } else {
        BmiCategory::ObesityIII
    }
}

/// Classifies the text held in the BMI field; empty or non-numeric text has
/// no category.
pub fn classify_bmi_text(raw: &str) -> Option<BmiCategory> {
    leading_number(raw).map(classify_bmi)
}

/// Input mask for the blood-pressure field: keeps at most six digits and
/// renders them as `SSS/DDD` once a fourth digit is typed.
pub fn format_blood_pressure_input(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).take(6).collect();
    if digits.len() <= 3 {
        digits
    } else {
        format!("{}/{}", &digits[..3], &digits[3..])
    }
}
