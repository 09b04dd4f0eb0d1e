//! Medication catalog: accent-insensitive search, pagination, match
//! highlighting and the prescription cart built from search results.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Page size used by the catalog screen.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Number of page buttons shown under the results table.
pub const PAGE_WINDOW_WIDTH: usize = 5;

const BUNDLED_CATALOG: &str = include_str!("../data/medicamentos.json");

/// A medication available for prescription.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogItem {
    pub label: String,
    pub descripcion: String,
    #[serde(default)]
    pub sustancia: Option<String>,
}

impl CatalogItem {
    pub fn new(
        label: impl Into<String>,
        descripcion: impl Into<String>,
        sustancia: Option<&str>,
    ) -> Self {
        Self {
            label: label.into(),
            descripcion: descripcion.into(),
            sustancia: sustancia.map(str::to_string),
        }
    }

    fn matches(&self, needle: &str) -> bool {
        normalize_text(&self.label).contains(needle)
            || normalize_text(&self.descripcion).contains(needle)
            || self
                .sustancia
                .as_deref()
                .is_some_and(|sustancia| normalize_text(sustancia).contains(needle))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Catálogo de medicamentos inválido: {0}")]
    Bundled(String),
}

/// The medication list shipped with the application, parsed on first use.
pub fn bundled_catalog() -> Result<&'static [CatalogItem], CatalogError> {
    static CATALOG: OnceLock<Result<Vec<CatalogItem>, String>> = OnceLock::new();
    CATALOG
        .get_or_init(|| serde_json::from_str(BUNDLED_CATALOG).map_err(|err| err.to_string()))
        .as_deref()
        .map_err(|err| CatalogError::Bundled(err.clone()))
}

/// Lowercases and strips combining diacritics (`"Jarábe"` -> `"jarabe"`).
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_diacritic(*c))
        .collect()
}

fn is_combining_diacritic(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

/// Byte range of the original text to emphasize. Always lies on char
/// boundaries of the text it was computed from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
}

/// Finds the first accent- and case-insensitive occurrence of `query` in
/// `original` and maps it back onto the original, accented text.
pub fn locate_highlight(original: &str, query: &str) -> Option<HighlightSpan> {
    let needle = normalize_text(query);
    if needle.is_empty() {
        return None;
    }

    let mut folded = String::with_capacity(original.len());
    // (offset in `folded`, char start in `original`, char end in `original`)
    let mut origins: Vec<(usize, usize, usize)> = Vec::new();
    for (start, ch) in original.char_indices() {
        let piece = normalize_char(ch);
        if piece.is_empty() {
            continue;
        }
        origins.push((folded.len(), start, start + ch.len_utf8()));
        folded.push_str(&piece);
    }

    let hit = folded.find(&needle)?;
    let hit_end = hit + needle.len();

    let first = origins.partition_point(|(offset, ..)| *offset <= hit).checked_sub(1)?;
    let last = origins
        .partition_point(|(offset, ..)| *offset < hit_end)
        .checked_sub(1)?;

    let start = origins[first].1;
    let mut end = origins[last].2;
    // Swallow combining marks that trail the last matched character.
    for ch in original[end..].chars() {
        if !normalize_char(ch).is_empty() {
            break;
        }
        end += ch.len_utf8();
    }

    Some(HighlightSpan { start, end })
}

fn normalize_char(ch: char) -> String {
    let mut buf = [0u8; 4];
    normalize_text(ch.encode_utf8(&mut buf))
}

/// Splits `text` into the parts before, inside and after `span`.
pub fn split_highlight(text: &str, span: HighlightSpan) -> (&str, &str, &str) {
    (
        &text[..span.start],
        &text[span.start..span.end],
        &text[span.end..],
    )
}

/// A matched catalog item with the emphasized range of each field.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CatalogMatch<'a> {
    pub item: &'a CatalogItem,
    pub label: Option<HighlightSpan>,
    pub descripcion: Option<HighlightSpan>,
    pub sustancia: Option<HighlightSpan>,
}

/// One page of search results.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchPage<'a> {
    /// 1-based page actually shown after clamping.
    pub page: usize,
    pub page_size: usize,
    pub total_matches: usize,
    pub total_pages: usize,
    pub items: Vec<CatalogMatch<'a>>,
}

impl SearchPage<'_> {
    /// 1-based (first, last) positions of the page within all matches, or
    /// `(0, 0)` when nothing matched.
    pub fn showing_range(&self) -> (usize, usize) {
        if self.total_matches == 0 {
            return (0, 0);
        }
        let first = (self.page - 1) * self.page_size + 1;
        let last = (self.page * self.page_size).min(self.total_matches);
        (first, last)
    }
}

/// Filters `items` by `query` over label, description and substance, then
/// returns the requested page. Out-of-range pages clamp to the nearest valid
/// one; an empty query matches everything.
pub fn search<'a>(
    items: &'a [CatalogItem],
    query: &str,
    page: usize,
    page_size: usize,
) -> SearchPage<'a> {
    let page_size = page_size.max(1);
    let needle = normalize_text(query);
    let matches: Vec<&CatalogItem> = items.iter().filter(|item| item.matches(&needle)).collect();

    let total_matches = matches.len();
    let total_pages = total_matches.div_ceil(page_size);
    let page = page.clamp(1, total_pages.max(1));

    let items = matches
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .map(|item| CatalogMatch {
            item,
            label: locate_highlight(&item.label, query),
            descripcion: locate_highlight(&item.descripcion, query),
            sustancia: item
                .sustancia
                .as_deref()
                .and_then(|sustancia| locate_highlight(sustancia, query)),
        })
        .collect();

    SearchPage {
        page,
        page_size,
        total_matches,
        total_pages,
        items,
    }
}

/// Page numbers to offer as buttons: at most `width` of them, kept around
/// `current` and shifted at either end of the range.
pub fn page_window(current: usize, total_pages: usize, width: usize) -> Vec<usize> {
    if total_pages == 0 || width == 0 {
        return Vec::new();
    }
    if total_pages <= width {
        return (1..=total_pages).collect();
    }

    let half = width / 2;
    let current = current.clamp(1, total_pages);
    let first = if current <= half + 1 {
        1
    } else if current + half >= total_pages {
        total_pages - width + 1
    } else {
        current - half
    };
    (first..first + width).collect()
}

/// Search box and pager state of the catalog screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogBrowser {
    query: String,
    page: usize,
    page_size: usize,
}

impl Default for CatalogBrowser {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl CatalogBrowser {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            ..Self::default()
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// A new query always starts again from the first page.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
    }

    pub fn go_to_page(&mut self, page: usize, total_pages: usize) {
        self.page = page.clamp(1, total_pages.max(1));
    }

    pub fn next_page(&mut self, total_pages: usize) {
        self.go_to_page(self.page + 1, total_pages);
    }

    pub fn previous_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    pub fn results<'a>(&self, items: &'a [CatalogItem]) -> SearchPage<'a> {
        search(items, &self.query, self.page, self.page_size)
    }
}

/// Identifier of a line in the prescription cart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CartEntryId(pub u64);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartEntry {
    pub id: CartEntryId,
    pub item: CatalogItem,
}

/// Medications picked from the catalog, each with an optional posology.
#[derive(Debug, Clone, Default)]
pub struct PrescriptionCart {
    entries: Vec<CartEntry>,
    posology: HashMap<CartEntryId, String>,
    next_id: u64,
}

impl PrescriptionCart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a line; the same medication may be added more than once.
    pub fn add(&mut self, item: CatalogItem) -> CartEntryId {
        self.next_id += 1;
        let id = CartEntryId(self.next_id);
        self.entries.push(CartEntry { id, item });
        id
    }

    pub fn remove(&mut self, id: CartEntryId) -> Option<CartEntry> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        self.posology.remove(&id);
        Some(self.entries.remove(index))
    }

    /// Returns false when `id` is not in the cart.
    pub fn set_posology(&mut self, id: CartEntryId, text: impl Into<String>) -> bool {
        if !self.entries.iter().any(|entry| entry.id == id) {
            return false;
        }
        self.posology.insert(id, text.into());
        true
    }

    pub fn posology(&self, id: CartEntryId) -> Option<&str> {
        self.posology.get(&id).map(String::as_str)
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Plain-text prescription for printing.
    pub fn render_text(&self) -> String {
        let mut out = String::from("Receta Médica\n");
        if self.entries.is_empty() {
            out.push_str("No hay medicamentos agregados\n");
            return out;
        }
        for (index, entry) in self.entries.iter().enumerate() {
            let _ = writeln!(
                out,
                "{}. {} - {}",
                index + 1,
                entry.item.label,
                entry.item.descripcion
            );
            if let Some(text) = self.posology(entry.id).filter(|text| !text.trim().is_empty()) {
                let _ = writeln!(out, "   Posología: {text}");
            }
        }
        out
    }
}
