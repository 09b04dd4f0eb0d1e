use meditrack_core::{
    bundled_catalog, locate_highlight, normalize_text, page_window, search, split_highlight,
    CatalogBrowser, CatalogItem, HighlightSpan, PrescriptionCart, DEFAULT_PAGE_SIZE,
};

fn sample_items() -> Vec<CatalogItem> {
    vec![
        CatalogItem::new("Jarábe para la tos", "Antitusivo en jarabe", Some("Dextrometorfano")),
        CatalogItem::new("Ácido fólico 5 mg", "Suplemento vitamínico", Some("Ácido fólico")),
        CatalogItem::new("Complejo B", "Vitaminas del complejo B", None),
        CatalogItem::new("Paracetamol 500 mg", "Analgésico y antipirético", Some("Paracetamol")),
    ]
}

fn numbered_items(count: usize) -> Vec<CatalogItem> {
    (1..=count)
        .map(|n| CatalogItem::new(format!("Medicamento {n}"), "Tabletas", None))
        .collect()
}

#[test]
fn normalization_strips_case_and_accents() {
    assert_eq!(normalize_text("Jarábe"), "jarabe");
    assert_eq!(normalize_text("ÁCIDO FÓLICO"), "acido folico");
    assert_eq!(normalize_text("Niño"), "nino");
}

#[test]
fn search_is_accent_insensitive() {
    let items = sample_items();
    let page = search(&items, "jarabe", 1, DEFAULT_PAGE_SIZE);

    assert_eq!(page.total_matches, 1);
    assert_eq!(page.items[0].item.label, "Jarábe para la tos");

    let upper = search(&items, "ACIDO", 1, DEFAULT_PAGE_SIZE);
    assert_eq!(upper.total_matches, 1);
    assert_eq!(upper.items[0].item.label, "Ácido fólico 5 mg");
}

#[test]
fn search_covers_description_and_optional_substance() {
    let items = sample_items();

    let by_description = search(&items, "antipiretico", 1, DEFAULT_PAGE_SIZE);
    assert_eq!(by_description.total_matches, 1);
    assert!(by_description.items[0].descripcion.is_some());
    assert!(by_description.items[0].label.is_none());

    let by_substance = search(&items, "dextrometorfano", 1, DEFAULT_PAGE_SIZE);
    assert_eq!(by_substance.total_matches, 1);
    assert!(by_substance.items[0].sustancia.is_some());

    // "Complejo B" has no substance; it must neither match nor fail.
    let none = search(&items, "zzz", 1, DEFAULT_PAGE_SIZE);
    assert_eq!(none.total_matches, 0);
}

#[test]
fn empty_query_returns_everything_without_highlights() {
    let items = sample_items();
    let page = search(&items, "", 1, DEFAULT_PAGE_SIZE);

    assert_eq!(page.total_matches, items.len());
    assert_eq!(page.total_pages, 1);
    assert!(page
        .items
        .iter()
        .all(|hit| hit.label.is_none() && hit.descripcion.is_none() && hit.sustancia.is_none()));
}

#[test]
fn pages_are_sliced_and_clamped() {
    let items = numbered_items(45);

    let second = search(&items, "", 2, 20);
    assert_eq!(second.total_pages, 3);
    assert_eq!(second.items.len(), 20);
    assert_eq!(second.items[0].item.label, "Medicamento 21");
    assert_eq!(second.showing_range(), (21, 40));

    let beyond = search(&items, "", 10, 20);
    assert_eq!(beyond.page, 3);
    assert_eq!(beyond.items.len(), 5);
    assert_eq!(beyond.showing_range(), (41, 45));

    let before = search(&items, "", 0, 20);
    assert_eq!(before.page, 1);
}

#[test]
fn no_match_yields_an_empty_first_page() {
    let items = numbered_items(5);
    let page = search(&items, "insulina", 4, 20);

    assert_eq!(page.total_pages, 0);
    assert_eq!(page.page, 1);
    assert!(page.items.is_empty());
    assert_eq!(page.showing_range(), (0, 0));
}

#[test]
fn highlight_maps_back_to_accented_text() {
    let label = "Jarábe para la tos";
    let span = locate_highlight(label, "jarabe").expect("query is present");
    assert_eq!(span, HighlightSpan { start: 0, end: "Jarábe".len() });
    assert_eq!(split_highlight(label, span), ("", "Jarábe", " para la tos"));

    // The accent before the match shifts byte offsets in the original.
    let later = locate_highlight(label, "tos").expect("query is present");
    assert_eq!(split_highlight(label, later), ("Jarábe para la ", "tos", ""));
}

#[test]
fn highlight_handles_accented_queries_and_decomposed_text() {
    let span = locate_highlight("Ácido fólico", "ÁCIDO").expect("query is present");
    assert_eq!(&"Ácido fólico"[span.start..span.end], "Ácido");

    let decomposed = "Jara\u{301}be";
    let span = locate_highlight(decomposed, "jarabe").expect("query is present");
    assert_eq!(span, HighlightSpan { start: 0, end: decomposed.len() });
}

#[test]
fn highlight_is_absent_for_empty_or_missing_queries() {
    assert_eq!(locate_highlight("Paracetamol", ""), None);
    assert_eq!(locate_highlight("Paracetamol", "ibuprofeno"), None);
}

#[test]
fn page_window_follows_the_current_page() {
    assert_eq!(page_window(1, 10, 5), vec![1, 2, 3, 4, 5]);
    assert_eq!(page_window(3, 10, 5), vec![1, 2, 3, 4, 5]);
    assert_eq!(page_window(6, 10, 5), vec![4, 5, 6, 7, 8]);
    assert_eq!(page_window(9, 10, 5), vec![6, 7, 8, 9, 10]);
    assert_eq!(page_window(2, 3, 5), vec![1, 2, 3]);
    assert!(page_window(1, 0, 5).is_empty());
}

#[test]
fn browser_resets_to_first_page_on_new_query() {
    let items = numbered_items(45);
    let mut browser = CatalogBrowser::with_page_size(20);

    browser.next_page(3);
    browser.next_page(3);
    browser.next_page(3);
    assert_eq!(browser.page(), 3);

    browser.set_query("medicamento 4");
    assert_eq!(browser.page(), 1);

    let results = browser.results(&items);
    // "medicamento 4" and "medicamento 40".."medicamento 45"
    assert_eq!(results.total_matches, 7);

    browser.previous_page();
    assert_eq!(browser.page(), 1);
    browser.go_to_page(99, results.total_pages);
    assert_eq!(browser.page(), 1);
}

#[test]
fn bundled_catalog_is_searchable() {
    let catalog = bundled_catalog().expect("bundled catalog parses");
    assert!(catalog.len() > DEFAULT_PAGE_SIZE);

    let page = search(catalog, "jarabe", 1, DEFAULT_PAGE_SIZE);
    assert!(page.total_matches >= 2);
    assert!(page
        .items
        .iter()
        .all(|hit| hit.label.is_some() || hit.descripcion.is_some()));
}

#[test]
fn prescription_cart_tracks_posology_per_line() {
    let items = sample_items();
    let mut cart = PrescriptionCart::new();
    assert!(cart.is_empty());

    let first = cart.add(items[3].clone());
    let second = cart.add(items[3].clone());
    assert_ne!(first, second);
    assert_eq!(cart.len(), 2);

    assert!(cart.set_posology(first, "1 tableta cada 8 horas"));
    assert_eq!(cart.posology(first), Some("1 tableta cada 8 horas"));
    assert_eq!(cart.posology(second), None);

    let text = cart.render_text();
    assert!(text.contains("1. Paracetamol 500 mg - Analgésico y antipirético"));
    assert!(text.contains("Posología: 1 tableta cada 8 horas"));

    let removed = cart.remove(first).expect("line exists");
    assert_eq!(removed.id, first);
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.posology(first), None);
    assert!(!cart.set_posology(first, "otra"));
    assert!(cart.remove(first).is_none());
}
