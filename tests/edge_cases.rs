//! Degenerate inputs: odd feeds, odd titles, odd counters. None may panic.

use std::io::Write;
use tempfile::NamedTempFile;
use titlelab::catalog::{load_catalog, parse_catalog, CatalogError};
use titlelab::session::Session;
use titlelab::{analyze, generate, select_winner, Formula, Product, VariantGenerator, VariantMetrics};

fn feed_file(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(suffix).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn empty_title_no_panic() {
    let analysis = analyze("");
    assert_eq!(analysis.length, 0);
    assert_eq!(analysis.score, 90);
    assert_eq!(analysis.issues[0].message, "Under optimal length (0 < 70)");
}

#[test]
fn utf8_title_counts_characters() {
    let title = "Café Crème Brûlée Set - Porcelaine Française - Blanc - 6 pièces élégantes";
    let analysis = analyze(title);
    assert_eq!(analysis.length, title.chars().count());
    assert!(analysis.length < title.len());
}

#[test]
fn all_caps_with_digits_only_no_flag() {
    let analysis = analyze("12345678901234567890");
    assert!(analysis.issues.iter().all(|i| i.message != "Avoid ALL CAPS"));
}

#[test]
fn exactly_limit_lengths() {
    let at_max = "a".repeat(150);
    assert!(analyze(&at_max).issues.is_empty());
    let over = "a".repeat(151);
    assert_eq!(analyze(&over).issues[0].message, "Exceeds 150 chars (151)");
    let at_min = "b".repeat(70);
    assert_eq!(analyze(&at_min).score, 100);
}

#[test]
fn long_multibyte_title_truncates_on_char_boundary() {
    let product = Product::new("p")
        .with("brand", "Ünïcødé")
        .with("title", &"Ж".repeat(300));
    for variant in generate(&product) {
        assert_eq!(variant.title.chars().count(), 150);
        assert_eq!(variant.length, 150);
    }
}

#[test]
fn empty_feed_file_is_error() {
    let file = feed_file("", ".csv");
    assert!(matches!(
        load_catalog(file.path()),
        Err(CatalogError::MissingHeader)
    ));
}

#[test]
fn header_only_feed_is_empty_catalog() {
    let catalog = parse_catalog("id,title,brand\n").unwrap();
    assert!(catalog.is_empty());
}

#[test]
fn feed_with_bom_and_crlf() {
    let file = feed_file("\u{feff}Title,Brand\r\nRunning Shoe,Nike\r\n", ".csv");
    let catalog = load_catalog(file.path()).unwrap();
    assert_eq!(catalog.len(), 1);
    let product = &catalog.products[0];
    assert_eq!(product.id, "product_1");
    assert_eq!(product.get("brand"), Some("Nike"));
    assert_eq!(generate(product)[0].title, "Nike - Running Shoe");
}

#[test]
fn tsv_with_quotes_and_commas() {
    let catalog =
        parse_catalog("title\tbrand\tsize\nShoe, \"Pro\" edition\tAcme, Inc.\t10.5\n").unwrap();
    let product = &catalog.products[0];
    assert_eq!(product.get("title"), Some("Shoe, \"Pro\" edition"));
    assert_eq!(product.get("brand"), Some("Acme, Inc."));
}

#[test]
fn short_rows_are_tolerated() {
    let catalog = parse_catalog("id,title,brand,color\nA,Hat\nB,Cap,Acme,Blue,extra\n").unwrap();
    assert_eq!(catalog.len(), 2);
    assert!(generate(&catalog.products[0]).is_empty());
    assert_eq!(generate(&catalog.products[1]).len(), 4);
}

#[test]
fn duplicate_ids_rejected() {
    let err = parse_catalog("id,title\nA,Hat\nA,Cap\n").unwrap_err();
    assert!(err.to_string().contains("duplicate product id 'A'"));
}

#[test]
fn winner_ignores_zero_impression_clicks() {
    let broken = VariantMetrics::new(0, 50, 0);
    let fine = VariantMetrics::new(100, 1, 0);
    let winner = select_winner([(Formula::BrandFirst, &broken), (Formula::Compact, &fine)]).unwrap();
    assert_eq!(winner.formula, Formula::Compact);
    assert_eq!(winner.ctr, 1.0);
}

#[test]
fn clicks_above_impressions_are_kept() {
    let metrics = VariantMetrics::new(10, 20, 0);
    assert_eq!(metrics.ctr(), 200.0);
}

#[test]
fn session_with_empty_catalog() {
    let mut session = Session::new();
    let catalog = parse_catalog("id,title\n").unwrap();
    let summary = session.sync_catalog(&catalog, &VariantGenerator::new(), false);
    assert_eq!(summary.generated, 0);
    assert!(session.export_rows().is_empty());
}

#[test]
fn large_feed_completes() {
    let mut feed = String::from("id\ttitle\tbrand\tcolor\tsize\tmaterial\n");
    for i in 0..2_000 {
        feed.push_str(&format!(
            "SKU-{i}\tMerino Crew Sweater {i}\tNorthwind\tHeather Grey\tM\tWool\n"
        ));
    }
    let catalog = parse_catalog(&feed).unwrap();
    let mut session = Session::new();
    let summary = session.sync_catalog(&catalog, &VariantGenerator::new(), false);
    assert_eq!(summary.generated, 2_000);
    assert_eq!(session.variant_count(), 10_000);
    assert_eq!(session.entries()[1_999].product.id, "SKU-1999");
}
