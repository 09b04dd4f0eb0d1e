//! Client-side clinical logic for the MediTrack frontend: vital-sign checks,
//! BMI, medication catalog search and consultation drafts, plus the view state
//! of each screen. Nothing here performs I/O.

pub mod bmi;
pub mod catalog;
pub mod consultation;
pub mod dashboard;
pub mod history;
pub mod numeric;
pub mod patient;
pub mod vitals;

pub use bmi::{
    bmi_from_measurements, classify_bmi, classify_bmi_text, compute_bmi,
    format_blood_pressure_input, BmiCategory,
};
pub use catalog::{
    bundled_catalog, locate_highlight, normalize_text, page_window, search, split_highlight,
    CartEntry, CartEntryId, CatalogBrowser, CatalogError, CatalogItem, CatalogMatch,
    HighlightSpan, PrescriptionCart, SearchPage, DEFAULT_PAGE_SIZE, PAGE_WINDOW_WIDTH,
};
pub use consultation::{
    normalize_for_submit, ConsultationDraft, ConsultationPayload, DraftError, DraftField,
    MedicationEntry, ValidationError,
};
pub use dashboard::{
    lookup_patient, matching_patients, recent_consultations, DashboardStats, HomeState,
    PatientLookup,
};
pub use history::{
    filter_consultations, format_fecha_larga, parse_fecha, patient_name, Consultation,
    HistoryBrowser, HistoryFilters, RecordedVitals,
};
pub use patient::{NewPatient, Patient};
pub use vitals::{
    is_out_of_range, reference_label, reference_range, ReferenceRange, UnknownVitalField,
    VitalField, VitalReading,
};
