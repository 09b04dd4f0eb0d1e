use chrono::NaiveDate;
use meditrack_core::{
    filter_consultations, format_fecha_larga, patient_name, Consultation, HistoryBrowser,
    HistoryFilters, Patient, VitalField,
};

const HISTORY_JSON: &str = r#"[
  {
    "id": 1,
    "paciente": 12,
    "fecha": "2025-05-09T10:30:00Z",
    "motivo": "Dolor abdominal",
    "antecedentes": null,
    "diagnostico": "Gastritis",
    "tratamiento": [{"nombre": "Omeprazol 20 mg", "posologia": "1 cápsula en ayunas"}],
    "medico": "Dr. Ruiz",
    "notas": "",
    "url_receta": "/media/recetas/1.pdf"
  },
  {
    "id": 2,
    "paciente": 5,
    "fecha": "2025-05-11T08:00:00-06:00",
    "motivo": "Control de glucosa",
    "diagnostico": "Diabetes tipo 2 URGENTE",
    "tratamiento": null
  },
  {
    "id": 3,
    "paciente": 12,
    "fecha": "sin fecha",
    "motivo": "Fiebre",
    "diagnostico": "Faringitis",
    "url_receta": ""
  }
]"#;

fn consultations() -> Vec<Consultation> {
    serde_json::from_str(HISTORY_JSON).expect("history fixture parses")
}

fn patients() -> Vec<Patient> {
    serde_json::from_str(
        r#"[
          {"id": 12, "nombre": "Juan Pérez", "fecha_nacimiento": "1980-02-01", "telefono": "555-0101", "correo": null},
          {"id": 5, "nombre": "María López", "fecha_nacimiento": "", "telefono": null, "correo": "maria@example.com"}
        ]"#,
    )
    .expect("patients fixture parses")
}

fn ids(found: &[&Consultation]) -> Vec<i64> {
    found.iter().map(|consultation| consultation.id).collect()
}

#[test]
fn records_tolerate_nulls_and_missing_fields() {
    let history = consultations();
    assert_eq!(history[0].antecedentes, "");
    assert_eq!(history[0].tratamiento[0].duracion, "");
    assert!(history[1].tratamiento.is_empty());
    assert!(history[0].has_prescription());
    assert!(!history[1].has_prescription());
    assert!(!history[2].has_prescription());
}

#[test]
fn patient_fields_render_placeholders() {
    let patients = patients();
    assert_eq!(patients[0].fecha_nacimiento, NaiveDate::from_ymd_opt(1980, 2, 1));
    assert_eq!(patients[1].fecha_nacimiento, None);
    assert_eq!(patients[0].correo_display(), "Sin correo");
    assert_eq!(patients[1].telefono_display(), "Sin teléfono");
}

#[test]
fn search_term_matches_reason_diagnosis_id_and_name() {
    let history = consultations();
    let patients = patients();
    let none = HistoryFilters::default();

    assert_eq!(ids(&filter_consultations(&history, &patients, "DOLOR", &none)), vec![1]);
    assert_eq!(ids(&filter_consultations(&history, &patients, "faringitis", &none)), vec![3]);
    assert_eq!(ids(&filter_consultations(&history, &patients, "12", &none)), vec![1, 3]);
    assert_eq!(ids(&filter_consultations(&history, &patients, "maría", &none)), vec![2]);
    assert_eq!(filter_consultations(&history, &patients, "", &none).len(), 3);
}

#[test]
fn date_filters_are_inclusive_calendar_days() {
    let history = consultations();
    let patients = patients();
    let day = NaiveDate::from_ymd_opt(2025, 5, 9);

    let same_day = HistoryFilters {
        date_from: day,
        date_to: day,
        ..HistoryFilters::default()
    };
    assert_eq!(ids(&filter_consultations(&history, &patients, "", &same_day)), vec![1]);

    let from_tenth = HistoryFilters {
        date_from: NaiveDate::from_ymd_opt(2025, 5, 10),
        ..HistoryFilters::default()
    };
    // The unparsable date of consultation 3 never satisfies a date filter.
    assert_eq!(ids(&filter_consultations(&history, &patients, "", &from_tenth)), vec![2]);
}

#[test]
fn patient_and_prescription_filters() {
    let history = consultations();
    let patients = patients();

    let by_id = HistoryFilters {
        patient_id: Some(5),
        ..HistoryFilters::default()
    };
    assert_eq!(ids(&filter_consultations(&history, &patients, "", &by_id)), vec![2]);

    let by_name = HistoryFilters {
        patient_name: "pérez".into(),
        ..HistoryFilters::default()
    };
    assert_eq!(ids(&filter_consultations(&history, &patients, "", &by_name)), vec![1, 3]);

    let with_prescription = HistoryFilters {
        has_prescription: true,
        ..HistoryFilters::default()
    };
    assert_eq!(
        ids(&filter_consultations(&history, &patients, "", &with_prescription)),
        vec![1]
    );
}

#[test]
fn unknown_patients_get_a_placeholder_name() {
    assert_eq!(patient_name(&patients(), 99), "Paciente no encontrado");
    assert_eq!(patient_name(&patients(), 12), "Juan Pérez");
}

#[test]
fn long_dates_are_spanish() {
    assert_eq!(
        format_fecha_larga("2025-05-09T10:30:00Z"),
        "viernes, 9 de mayo de 2025, 10:30"
    );
    assert_eq!(
        format_fecha_larga("2025-05-11T08:00:00-06:00"),
        "domingo, 11 de mayo de 2025, 08:00"
    );
    assert_eq!(format_fecha_larga("sin fecha"), "Fecha no válida");
}

#[test]
fn browser_expands_one_consultation_at_a_time() {
    let mut browser = HistoryBrowser::with_records(consultations(), patients());

    browser.toggle_expanded(1);
    assert_eq!(browser.expanded(), Some(1));
    browser.toggle_expanded(2);
    assert_eq!(browser.expanded(), Some(2));
    browser.toggle_expanded(2);
    assert_eq!(browser.expanded(), None);

    assert_eq!(browser.empty_message(), "No hay consultas registradas en el sistema");
    browser.search_term = "inexistente".into();
    assert!(browser.filtered().is_empty());
    assert_eq!(browser.empty_message(), "Intenta ajustar tus criterios de búsqueda");
}

#[test]
fn recorded_vitals_accept_strings_and_numbers() {
    let record: Consultation = serde_json::from_str(
        r#"{
          "id": 8,
          "paciente": 12,
          "fecha": "2025-05-09T10:30:00Z",
          "peso": "70.50",
          "imc": "24.39",
          "frecuencia_cardiaca": 110,
          "oximetria": null,
          "presion_arterial": "130/85"
        }"#,
    )
    .expect("record parses");

    assert_eq!(record.vitals.peso.as_deref(), Some("70.50"));
    assert_eq!(record.vitals.get(VitalField::HeartRate), Some("110"));
    assert_eq!(record.vitals.get(VitalField::Oximetry), None);
    assert_eq!(
        record.vitals.abnormal(),
        vec![VitalField::HeartRate, VitalField::BloodPressure]
    );
}
