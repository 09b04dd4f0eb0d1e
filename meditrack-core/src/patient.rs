//! Patient records as exchanged with the REST API.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// A registered patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Patient {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nombre: String,
    #[serde(default, deserialize_with = "lenient_date")]
    pub fecha_nacimiento: Option<NaiveDate>,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub correo: Option<String>,
}

impl Patient {
    pub fn telefono_display(&self) -> &str {
        non_blank(self.telefono.as_deref()).unwrap_or("Sin teléfono")
    }

    pub fn correo_display(&self) -> &str {
        non_blank(self.correo.as_deref()).unwrap_or("Sin correo")
    }
}

/// Registration form for a new patient.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewPatient {
    pub nombre: String,
    pub fecha_nacimiento: Option<NaiveDate>,
    pub telefono: Option<String>,
    pub correo: Option<String>,
}

impl NewPatient {
    /// Form pre-filled with a name, as when a search finds nobody.
    pub fn named(nombre: impl Into<String>) -> Self {
        Self {
            nombre: nombre.into(),
            ..Self::default()
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

/// Treats an explicit JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Birth dates entered through the form may be blank.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|text| NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()))
}
