// Metric selection over a report's per-country and per-query rows

use seospyder_client::models::{MetricRow, ReportDetails};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

const TOP_N: usize = 20;

/// The eight data-driven optimization focuses offered for a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricCategory {
    TopLocation,
    LowCtrLocation,
    TopKeywords,
    LsiKeywords,
    HighCtrKeywords,
    LowCtrKeywords,
    Position5To10Keywords,
    Position10To20Keywords,
}

/// Which side of the report a category reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricSource {
    Countries,
    Queries,
}

impl MetricCategory {
    pub const ALL: [MetricCategory; 8] = [
        MetricCategory::TopLocation,
        MetricCategory::LowCtrLocation,
        MetricCategory::TopKeywords,
        MetricCategory::LsiKeywords,
        MetricCategory::HighCtrKeywords,
        MetricCategory::LowCtrKeywords,
        MetricCategory::Position5To10Keywords,
        MetricCategory::Position10To20Keywords,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MetricCategory::TopLocation => "Top Location",
            MetricCategory::LowCtrLocation => "Low CTR Location",
            MetricCategory::TopKeywords => "Top Keywords",
            MetricCategory::LsiKeywords => "LSI Keywords",
            MetricCategory::HighCtrKeywords => "High CTR Keywords",
            MetricCategory::LowCtrKeywords => "Low CTR Keywords",
            MetricCategory::Position5To10Keywords => "5-10 Position Keywords",
            MetricCategory::Position10To20Keywords => "10-20 Position Keywords",
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            MetricCategory::TopLocation => "top-location",
            MetricCategory::LowCtrLocation => "low-ctr-location",
            MetricCategory::TopKeywords => "top-keywords",
            MetricCategory::LsiKeywords => "lsi-keywords",
            MetricCategory::HighCtrKeywords => "high-ctr-keywords",
            MetricCategory::LowCtrKeywords => "low-ctr-keywords",
            MetricCategory::Position5To10Keywords => "position-5-10",
            MetricCategory::Position10To20Keywords => "position-10-20",
        }
    }

    /// Accepts either the display label or the kebab-case id.
    pub fn from_str(s: &str) -> Option<Self> {
        let needle = s.trim();
        Self::ALL.into_iter().find(|c| {
            c.label().eq_ignore_ascii_case(needle) || c.id().eq_ignore_ascii_case(needle)
        })
    }

    pub fn source(&self) -> MetricSource {
        match self {
            MetricCategory::TopLocation | MetricCategory::LowCtrLocation => MetricSource::Countries,
            _ => MetricSource::Queries,
        }
    }
}

fn desc(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

fn asc(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

fn window(rows: Vec<MetricRow>, start: usize, end: usize) -> Vec<MetricRow> {
    rows.into_iter().skip(start).take(end.saturating_sub(start)).collect()
}

/// Pick and order the rows for `category`.
///
/// `details` is never mutated; missing arrays behave as empty ones.
pub fn select(category: MetricCategory, details: Option<&ReportDetails>) -> Vec<MetricRow> {
    let source: &[MetricRow] = match (details, category.source()) {
        (Some(d), MetricSource::Countries) => &d.countries,
        (Some(d), MetricSource::Queries) => &d.queries,
        (None, _) => &[],
    };
    if source.is_empty() {
        debug!("{} selected from an empty source", category.label());
        return Vec::new();
    }

    let mut rows = source.to_vec();
    match category {
        MetricCategory::TopLocation => {
            rows.truncate(TOP_N);
        }
        MetricCategory::LowCtrLocation => {
            rows.retain(|r| r.ctr >= 1.0 && r.ctr <= 2.0);
            rows.sort_by(|a, b| {
                desc(a.impressions, b.impressions).then_with(|| desc(a.clicks, b.clicks))
            });
            rows.truncate(TOP_N);
        }
        MetricCategory::TopKeywords => {
            rows.sort_by(|a, b| desc(a.clicks, b.clicks));
            rows.truncate(TOP_N);
        }
        MetricCategory::LsiKeywords => {}
        MetricCategory::HighCtrKeywords => {
            rows.sort_by(|a, b| {
                desc(a.ctr, b.ctr)
                    .then_with(|| desc(a.impressions, b.impressions))
                    .then_with(|| desc(a.clicks, b.clicks))
            });
            rows.truncate(TOP_N);
        }
        MetricCategory::LowCtrKeywords => {
            rows.sort_by(|a, b| {
                asc(a.ctr, b.ctr)
                    .then_with(|| desc(a.impressions, b.impressions))
                    .then_with(|| desc(a.clicks, b.clicks))
            });
            rows.truncate(TOP_N);
        }
        MetricCategory::Position5To10Keywords => {
            rows.sort_by(|a, b| asc(a.position, b.position));
            rows = window(rows, 5, 10);
        }
        MetricCategory::Position10To20Keywords => {
            rows.sort_by(|a, b| asc(a.position, b.position));
            rows = window(rows, 10, 20);
        }
    }

    debug!("{}: {} of {} rows selected", category.label(), rows.len(), source.len());
    rows
}

/// Terms of the selected rows, in order, with empty terms dropped.
pub fn terms(rows: &[MetricRow]) -> Vec<String> {
    rows.iter()
        .filter_map(|r| r.term())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// `"a, b, c"` form used by the location, keyword and position prompts.
pub fn simple_terms(rows: &[MetricRow]) -> String {
    terms(rows).join(", ")
}

/// One `"term, clicks, impressions"` line per row, used by the CTR prompts.
pub fn ctr_lines(rows: &[MetricRow]) -> String {
    rows.iter()
        .map(|r| {
            format!(
                "{}, {}, {}",
                r.term().unwrap_or("undefined"),
                format_number(r.clicks),
                format_number(r.impressions)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Integers print without a fractional part, as the backend sends them.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
