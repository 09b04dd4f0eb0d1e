//! Framework-neutral bridge between the browser and `meditrack-core`.

use meditrack_core::{
    bundled_catalog, classify_bmi_text, compute_bmi as core_compute_bmi,
    format_blood_pressure_input, is_out_of_range as core_is_out_of_range,
    normalize_for_submit, page_window as core_page_window, reference_label as core_reference_label,
    search, CartEntryId, CatalogItem, ConsultationDraft, PrescriptionCart, VitalField,
    DEFAULT_PAGE_SIZE, PAGE_WINDOW_WIDTH,
};
use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

fn js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{context}: {err}"))
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    to_value(value).map_err(|err| js_error("No se pudo serializar el resultado", err))
}

fn parse_field(field: &str) -> Result<VitalField, JsValue> {
    field.parse().map_err(|err| js_error("Campo inválido", err))
}

/// `true` when `raw_value` falls outside the reference range of `field`.
#[wasm_bindgen(js_name = isOutOfRange)]
pub fn is_out_of_range(field: &str, raw_value: &str) -> Result<bool, JsValue> {
    init();
    Ok(core_is_out_of_range(parse_field(field)?, raw_value))
}

#[wasm_bindgen(js_name = referenceLabel)]
pub fn reference_label(field: &str) -> Result<String, JsValue> {
    Ok(core_reference_label(parse_field(field)?))
}

/// BMI with two decimals, or `undefined` when it cannot be computed.
#[wasm_bindgen(js_name = computeBmi)]
pub fn compute_bmi(weight_kg: &str, height_cm: &str) -> Option<String> {
    core_compute_bmi(weight_kg, height_cm)
}

#[wasm_bindgen(js_name = classifyBmi)]
pub fn classify_bmi(bmi: &str) -> Option<String> {
    classify_bmi_text(bmi).map(|category| category.label().to_string())
}

#[wasm_bindgen(js_name = formatBloodPressure)]
pub fn format_blood_pressure(raw: &str) -> String {
    format_blood_pressure_input(raw)
}

/// Searches the bundled medication catalog.
#[wasm_bindgen(js_name = searchCatalog)]
pub fn search_catalog(
    query: &str,
    page: usize,
    page_size: Option<usize>,
) -> Result<JsValue, JsValue> {
    init();
    let items = bundled_catalog().map_err(|err| js_error("Catálogo no disponible", err))?;
    let results = search(items, query, page, page_size.unwrap_or(DEFAULT_PAGE_SIZE));
    to_js(&results)
}

#[wasm_bindgen(js_name = pageWindow)]
pub fn page_window(current: usize, total_pages: usize) -> Vec<u32> {
    core_page_window(current, total_pages, PAGE_WINDOW_WIDTH)
        .into_iter()
        .map(|page| page as u32)
        .collect()
}

/// Vitals of a form draft that are outside their range, as field names.
#[wasm_bindgen(js_name = abnormalVitals)]
pub fn abnormal_vitals(draft: JsValue) -> Result<JsValue, JsValue> {
    let draft: ConsultationDraft =
        from_value(draft).map_err(|err| js_error("Borrador de consulta inválido", err))?;
    let fields: Vec<&str> = draft
        .abnormal_vitals()
        .into_iter()
        .map(VitalField::as_str)
        .collect();
    to_js(&fields)
}

/// Converts a form draft into the body for `POST /api/pacientes/consultas/`.
/// Throws the blocking message when no patient is assigned.
#[wasm_bindgen(js_name = normalizeConsultation)]
pub fn normalize_consultation(draft: JsValue) -> Result<JsValue, JsValue> {
    init();
    let draft: ConsultationDraft =
        from_value(draft).map_err(|err| js_error("Borrador de consulta inválido", err))?;
    let payload = normalize_for_submit(&draft).map_err(|err| JsValue::from_str(&err.to_string()))?;
    to_js(&payload)
}

/// Prescription cart owned by the JavaScript side.
#[wasm_bindgen]
#[derive(Default)]
pub struct PrescriptionCartHandle {
    cart: PrescriptionCart,
}

#[wasm_bindgen]
impl PrescriptionCartHandle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a catalog item (`{label, descripcion, sustancia?}`) and returns
    /// the id of the new line.
    pub fn add(&mut self, item: JsValue) -> Result<u64, JsValue> {
        let item: CatalogItem = from_value(item).map_err(|err| js_error("Medicamento inválido", err))?;
        Ok(self.cart.add(item).0)
    }

    pub fn remove(&mut self, id: u64) -> bool {
        self.cart.remove(CartEntryId(id)).is_some()
    }

    #[wasm_bindgen(js_name = setPosology)]
    pub fn set_posology(&mut self, id: u64, text: &str) -> bool {
        self.cart.set_posology(CartEntryId(id), text)
    }

    pub fn entries(&self) -> Result<JsValue, JsValue> {
        to_js(self.cart.entries())
    }

    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.cart.len()
    }

    #[wasm_bindgen(js_name = renderText)]
    pub fn render_text(&self) -> String {
        self.cart.render_text()
    }
}
