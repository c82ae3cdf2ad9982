//! End-to-end extraction over realistic pages.

use std::collections::BTreeMap;
use std::sync::Arc;

use docfield_core::{
    CandidateScorer, ClusterConfig, DocfieldConfig, Extractor, ImageSize, LabelConfig,
    NormalizedRect, Page, ScoringConfig, TextObservation, cluster_text_blocks, extract_all_dates,
    extract_first_dates, extract_identifier, extract_labeled_dates, normalize_date,
};
use pretty_assertions::assert_eq;

fn obs(text: &str, x: f32, y: f32, w: f32, h: f32) -> TextObservation {
    TextObservation::new(text, NormalizedRect::new(x, y, w, h))
}

fn keywords(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// A one-page invoice as a scanner would report it.
fn invoice_page() -> Page {
    Page::new(
        ImageSize::new(1240, 1754),
        vec![
            obs("ACME Supplies Ltd", 0.08, 0.90, 0.30, 0.02),
            obs("12 Dock Road", 0.08, 0.88, 0.20, 0.02),
            obs("Leeds LS1 4AB", 0.08, 0.86, 0.22, 0.02),
            obs("INVOICE", 0.60, 0.90, 0.15, 0.03),
            obs("INV-2024-00123", 0.70, 0.91, 0.20, 0.03),
            obs("Invoice Date", 0.60, 0.80, 0.15, 0.02),
            obs("10/01/2024", 0.80, 0.80, 0.12, 0.02),
            obs("Due Date", 0.60, 0.76, 0.15, 0.02),
            obs("February 10, 2024", 0.80, 0.76, 0.15, 0.02),
            obs("PO 7781-B", 0.08, 0.60, 0.15, 0.02),
            obs("TOTAL", 0.60, 0.20, 0.10, 0.02),
            obs("1,250.00", 0.80, 0.20, 0.10, 0.02),
        ],
    )
}

#[test]
fn test_identifier_near_anchor_ranks_first() {
    let observations = vec![
        obs("INVOICE", 0.10, 0.90, 0.15, 0.03),
        obs("INV-2024-00123", 0.20, 0.92, 0.20, 0.03),
        obs("TOTAL", 0.60, 0.10, 0.10, 0.02),
    ];

    let ranked = extract_identifier(&observations, "invoice", &ScoringConfig::default());
    assert_eq!(ranked, vec!["INV-2024-00123".to_string()]);
}

#[test]
fn test_labels_take_nearest_dates() {
    let observations = vec![
        obs("Invoice Date", 0.10, 0.80, 0.15, 0.02),
        obs("Due Date", 0.10, 0.70, 0.15, 0.02),
        obs("2024-01-10", 0.35, 0.80, 0.12, 0.02),
        obs("2024-02-10", 0.35, 0.70, 0.12, 0.02),
    ];

    let result = extract_labeled_dates(
        &observations,
        &keywords(&["Invoice Date", "Due Date"]),
        &LabelConfig::default(),
    );

    let expected: BTreeMap<String, String> = [
        ("Invoice Date".to_string(), "2024-01-10".to_string()),
        ("Due Date".to_string(), "2024-02-10".to_string()),
    ]
    .into_iter()
    .collect();
    assert_eq!(result, expected);
}

#[test]
fn test_same_calendar_date_reported_once() {
    let observations = vec![
        obs("March 5, 2024", 0.1, 0.5, 0.2, 0.02),
        obs("05/03/2024", 0.1, 0.4, 0.2, 0.02),
    ];

    assert_eq!(extract_all_dates(&observations), vec!["2024-03-05".to_string()]);
}

#[test]
fn test_empty_input_everywhere() {
    let empty: Vec<TextObservation> = Vec::new();

    assert!(extract_identifier(&empty, "invoice", &ScoringConfig::default()).is_empty());
    assert!(
        extract_labeled_dates(&empty, &keywords(&["Due Date"]), &LabelConfig::default()).is_empty()
    );
    assert!(extract_all_dates(&empty).is_empty());
    assert!(extract_first_dates(&empty).is_empty());
    assert!(cluster_text_blocks(&empty, ImageSize::UNIT, &ClusterConfig::default()).is_empty());

    let fields = Extractor::default().extract_document(&Page::default());
    assert_eq!(fields.identifier(), None);
    assert!(fields.labeled_dates.is_empty());
}

#[test]
fn test_full_invoice_page() {
    let fields = Extractor::default().extract_document(&invoice_page());

    assert_eq!(fields.identifier(), Some("INV-2024-00123"));
    assert_eq!(
        fields.labeled_dates.get("Invoice Date").map(String::as_str),
        Some("10/01/2024")
    );
    assert_eq!(
        fields.labeled_dates.get("Due Date").map(String::as_str),
        Some("February 10, 2024")
    );
    assert_eq!(
        fields.dates,
        vec!["2024-01-10".to_string(), "2024-02-10".to_string()]
    );
    assert!(fields.blocks.iter().any(|b| b.text == "ACME Supplies Ltd 12 Dock Road Leeds LS1 4AB"));
}

#[test]
fn test_malformed_observations_are_skipped() {
    let mut page = invoice_page();
    page.observations.insert(0, obs("", 0.1, 0.1, 0.1, 0.1));
    page.observations.insert(0, obs("ZZ-999", 0.95, 0.95, 0.2, 0.2));

    let fields = Extractor::default().extract_document(&page);

    assert_eq!(fields.identifier(), Some("INV-2024-00123"));
    assert!(!fields.identifiers.contains(&"ZZ-999".to_string()));
}

#[test]
fn test_operations_are_deterministic() {
    let extractor = Extractor::default();
    let page = invoice_page();

    let first = extractor.extract_document(&page);
    for _ in 0..5 {
        assert_eq!(extractor.extract_document(&page), first);
    }
}

#[test]
fn test_reclustering_blocks_never_grows() {
    let page = invoice_page();
    let config = ClusterConfig::default();

    let blocks = cluster_text_blocks(&page.observations, page.image_size, &config);
    assert_eq!(
        cluster_text_blocks(&page.observations, page.image_size, &config),
        blocks
    );

    let as_observations: Vec<TextObservation> = blocks
        .iter()
        .map(|b| TextObservation::new(b.text.clone(), b.bounding_box))
        .collect();
    let reclustered = cluster_text_blocks(&as_observations, page.image_size, &config);

    assert!(reclustered.len() <= blocks.len());
}

#[test]
fn test_proximity_never_lowers_score() {
    let scorer = CandidateScorer::default();

    for token in ["INV-2024-00123", "inv2024", "12345", "A/B", "x-1"] {
        assert!(scorer.score(token, true) >= scorer.score(token, false));
    }
}

/// Exclusivity is per candidate: a text and box pair is assigned at most once.
/// The same date printed in two places is two candidates.
#[test]
fn test_labels_never_share_a_candidate() {
    // Four labels competing for three dates, all bunched together.
    let observations = vec![
        obs("Invoice Date", 0.10, 0.50, 0.15, 0.02),
        obs("Due Date", 0.10, 0.48, 0.15, 0.02),
        obs("Tax Point Date", 0.10, 0.46, 0.15, 0.02),
        obs("Delivery Date", 0.10, 0.44, 0.15, 0.02),
        obs("01/02/2024", 0.30, 0.49, 0.12, 0.02),
        obs("01/02/2024", 0.30, 0.45, 0.12, 0.02),
        obs("03/02/2024", 0.30, 0.47, 0.12, 0.02),
    ];

    let fields = Extractor::default().match_labeled_dates(&observations);

    for (i, a) in fields.iter().enumerate() {
        for b in &fields[i + 1..] {
            assert_ne!(a.label, b.label);
            assert!(a.value != b.value || a.bounding_box != b.bounding_box);
        }
    }
    assert!(fields.len() <= 3);
}

#[test]
fn test_repeated_date_can_serve_two_labels() {
    let observations = vec![
        obs("Invoice Date", 0.10, 0.80, 0.15, 0.02),
        obs("01/02/2024", 0.30, 0.80, 0.12, 0.02),
        obs("Delivery Date", 0.10, 0.50, 0.15, 0.02),
        obs("01/02/2024", 0.30, 0.50, 0.12, 0.02),
    ];

    let fields = Extractor::default().match_labeled_dates(&observations);
    let pairs: Vec<(&str, &str, NormalizedRect)> = fields
        .iter()
        .map(|f| (f.label.as_str(), f.value.as_str(), f.bounding_box))
        .collect();

    assert_eq!(
        pairs,
        vec![
            ("Invoice Date", "01/02/2024", observations[1].bounding_box),
            ("Delivery Date", "01/02/2024", observations[3].bounding_box),
        ]
    );
}

#[test]
fn test_canonical_dates_are_stable() {
    let observations = vec![
        obs("Issued 5th March 2024", 0.1, 0.5, 0.3, 0.02),
        obs("Due 2024/04/01", 0.1, 0.4, 0.3, 0.02),
        obs("Paid 31.12.23", 0.1, 0.3, 0.3, 0.02),
    ];

    let dates = extract_all_dates(&observations);
    assert_eq!(dates, vec!["2023-12-31", "2024-03-05", "2024-04-01"]);

    for canonical in &dates {
        assert_eq!(normalize_date(canonical).as_ref(), Some(canonical));
    }
}

#[test]
fn test_observation_array_file_format() {
    let json = r#"[
        {"text": "INVOICE", "bounding_box": {"x": 0.1, "y": 0.9, "width": 0.15, "height": 0.03}},
        {"text": "INV-77", "bounding_box": {"x": 0.2, "y": 0.91, "width": 0.1, "height": 0.03}}
    ]"#;

    let page = Page::from_json(json).unwrap();
    assert_eq!(page.image_size, ImageSize::UNIT);

    let ranked = Extractor::default().extract_identifier(&page.observations);
    assert_eq!(ranked, vec!["INV-77".to_string()]);
}

#[test]
fn test_configured_anchor_and_labels() {
    let mut config = DocfieldConfig::default();
    config.scoring.anchor = "order".to_string();
    config.labels.keywords = keywords(&["Ship By"]);
    config.labels.canonical_values = true;

    let observations = vec![
        obs("ORDER", 0.1, 0.9, 0.1, 0.02),
        obs("SO-4410", 0.2, 0.9, 0.1, 0.02),
        obs("Ship By", 0.1, 0.5, 0.1, 0.02),
        obs("July 4, 2024", 0.3, 0.5, 0.2, 0.02),
    ];

    let extractor = Extractor::new(config);
    assert_eq!(extractor.extract_identifier(&observations)[0], "SO-4410");
    assert_eq!(
        extractor.extract_labeled_dates(&observations).get("Ship By").map(String::as_str),
        Some("2024-07-04")
    );
}

#[tokio::test]
async fn test_shared_extractor_across_tasks() {
    let extractor = Arc::new(Extractor::default());
    let page = Arc::new(invoice_page());
    let expected = extractor.extract_document(&page);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let extractor = Arc::clone(&extractor);
            let page = Arc::clone(&page);
            tokio::task::spawn_blocking(move || extractor.extract_document(&page))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), expected);
    }
}
