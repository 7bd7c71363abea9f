// Tests for metric selection

use seospyder_client::models::{MetricRow, ReportDetails};
use seospyder_core::metrics::{self, MetricCategory};

fn row(term: &str, clicks: f64, impressions: f64, ctr: f64, position: f64) -> MetricRow {
    MetricRow {
        keys: vec![term.to_string()],
        clicks,
        impressions,
        ctr,
        position,
    }
}

/// `n` distinct query rows with scattered metrics.
fn queries(n: usize) -> Vec<MetricRow> {
    (0..n)
        .map(|i| {
            let k = ((i * 37) % n) as f64;
            row(
                &format!("q{}", i),
                (i % 7) as f64 * 3.0,
                100.0 + k,
                (k * 0.25) + (i as f64 * 0.001),
                1.0 + ((i * 13) % n) as f64,
            )
        })
        .collect()
}

fn details(countries: Vec<MetricRow>, queries: Vec<MetricRow>) -> ReportDetails {
    ReportDetails { countries, queries }
}

// ============================================================================
// Determinism and purity
// ============================================================================

#[test]
fn test_selection_is_deterministic_and_leaves_input_alone() {
    let d = details(queries(30), queries(45));
    let snapshot = d.clone();
    for category in MetricCategory::ALL {
        let first = metrics::select(category, Some(&d));
        let second = metrics::select(category, Some(&d));
        assert_eq!(first, second, "{} not deterministic", category.label());
    }
    assert_eq!(d, snapshot);
}

// ============================================================================
// Category rules
// ============================================================================

#[test]
fn test_top_location_keeps_source_order() {
    let countries: Vec<MetricRow> = (0..25)
        .map(|i| row(&format!("c{}", i), (25 - i) as f64, 1.0, 1.0, 1.0))
        .collect();
    let d = details(countries, vec![]);
    let selected = metrics::select(MetricCategory::TopLocation, Some(&d));
    assert_eq!(selected.len(), 20);
    assert_eq!(selected[0].term(), Some("c0"));
    assert_eq!(selected[19].term(), Some("c19"));
}

#[test]
fn test_lsi_keywords_pass_everything_through() {
    let d = details(vec![], queries(33));
    let selected = metrics::select(MetricCategory::LsiKeywords, Some(&d));
    assert_eq!(selected, d.queries);
}

#[test]
fn test_high_and_low_ctr_are_disjoint_with_enough_rows() {
    let d = details(vec![], queries(40));
    let high = metrics::select(MetricCategory::HighCtrKeywords, Some(&d));
    let low = metrics::select(MetricCategory::LowCtrKeywords, Some(&d));
    assert_eq!(high.len(), 20);
    assert_eq!(low.len(), 20);
    for h in &high {
        assert!(!low.iter().any(|l| l.term() == h.term()), "{:?} in both", h.term());
    }
}

#[test]
fn test_ctr_tie_breaks() {
    let d = details(
        vec![],
        vec![
            row("a", 1.0, 10.0, 5.0, 1.0),
            row("b", 2.0, 10.0, 5.0, 1.0),
            row("c", 1.0, 20.0, 5.0, 1.0),
            row("d", 1.0, 1.0, 9.0, 1.0),
        ],
    );
    let high = metrics::select(MetricCategory::HighCtrKeywords, Some(&d));
    assert_eq!(metrics::terms(&high), vec!["d", "c", "b", "a"]);
    let low = metrics::select(MetricCategory::LowCtrKeywords, Some(&d));
    assert_eq!(metrics::terms(&low), vec!["c", "b", "a", "d"]);
}

#[test]
fn test_position_bands_tile_ranks_five_to_twenty() {
    let d = details(vec![], queries(30));
    let mut by_position = d.queries.clone();
    by_position.sort_by(|a, b| a.position.total_cmp(&b.position));

    let near = metrics::select(MetricCategory::Position5To10Keywords, Some(&d));
    let far = metrics::select(MetricCategory::Position10To20Keywords, Some(&d));
    let mut combined = near.clone();
    combined.extend(far.clone());

    assert_eq!(near.len(), 5);
    assert_eq!(far.len(), 10);
    assert_eq!(combined, by_position[5..20].to_vec());
}

#[test]
fn test_two_row_scenario() {
    let d = details(
        vec![],
        vec![row("a", 10.0, 100.0, 10.0, 3.0), row("b", 5.0, 50.0, 10.0, 1.0)],
    );
    let top = metrics::select(MetricCategory::TopKeywords, Some(&d));
    assert_eq!(metrics::terms(&top), vec!["a", "b"]);
    assert!(metrics::select(MetricCategory::Position5To10Keywords, Some(&d)).is_empty());
}

#[test]
fn test_missing_arrays_deserialize_as_empty() {
    let d: ReportDetails = serde_json::from_str("{}").unwrap();
    for category in MetricCategory::ALL {
        assert!(metrics::select(category, Some(&d)).is_empty());
    }
}
