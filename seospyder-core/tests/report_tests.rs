// Tests for report rendering

use seospyder_client::ReportRow;
use seospyder_client::models::{SearchResult, SeoStrategy, WebsiteEntry};
use seospyder_core::audit::AuditReport;
use seospyder_core::countries;
use seospyder_core::report::{self, ReportFormat};

const AUDIT_JSON: &str = r#"{
    "timestamp": "2025-03-01T10:00:00Z",
    "url": "https://example.com",
    "domain": "example.com",
    "audits": {
        "meta-description": {"id": 1, "name": "Meta description", "description": "Page has a meta description", "weight": 10, "status": true, "score": 10},
        "image-alt": {"id": 2, "name": "Image alt text", "description": "Images, with \"alt\" text", "weight": 10, "status": false, "score": 2},
        "sitemap": {"id": 3, "name": "Sitemap", "weight": 5, "status": null}
    },
    "topIssues": [{"id": 2, "name": "Image alt text", "weight": 10, "status": false}],
    "quickWins": []
}"#;

fn rows() -> Vec<ReportRow> {
    vec![
        ReportRow {
            page_url: "https://example.com/a".to_string(),
            clicks: 12.0,
            impressions: 300.0,
            ctr: 4.0,
            position: 3.5,
            id: Some("7".to_string()),
            ..Default::default()
        },
        ReportRow {
            page_url: "https://example.com/b,c".to_string(),
            clicks: 1.0,
            impressions: 40.0,
            ctr: 2.5,
            position: 11.0,
            ..Default::default()
        },
    ]
}

// ============================================================================
// Page performance
// ============================================================================

#[test]
fn test_rows_text() {
    let text = report::render_rows("https://example.com/", &rows(), ReportFormat::Text).unwrap();
    assert!(text.contains("PAGE PERFORMANCE: example.com"));
    assert!(text.contains("[1] https://example.com/a"));
    assert!(text.contains("Clicks: 12  Impressions: 300  CTR: 4%  Position: 3.5"));
    assert!(text.contains("Page id: 7"));
}

#[test]
fn test_rows_csv_escapes_fields() {
    let csv = report::render_rows("https://example.com/", &rows(), ReportFormat::Csv).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "page_url,clicks,impressions,ctr,position,id");
    assert_eq!(lines[1], "https://example.com/a,12,300,4,3.5,7");
    assert_eq!(lines[2], "\"https://example.com/b,c\",1,40,2.5,11,");
}

#[test]
fn test_rows_json_has_metadata() {
    let json = report::render_rows("https://example.com/", &rows(), ReportFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["metadata"]["generator"], "SeoSpyder");
    assert_eq!(value["total_rows"], 2);
    assert_eq!(value["rows"][0]["pageUrl"], "https://example.com/a");
}

#[test]
fn test_empty_rows_text() {
    let text = report::render_rows("sc-domain:example.com", &[], ReportFormat::Text).unwrap();
    assert!(text.contains("(no rows)"));
}

// ============================================================================
// Sites and strategy
// ============================================================================

#[test]
fn test_sites_markdown() {
    let sites = vec![WebsiteEntry {
        site_url: "https://example.com/".to_string(),
        permission_level: "siteOwner".to_string(),
    }];
    let md = report::render_sites(&sites, ReportFormat::Markdown).unwrap();
    assert!(md.contains("| https://example.com/ | siteOwner |"));
}

#[test]
fn test_strategy_text() {
    let strategy = SeoStrategy {
        results: vec![SearchResult {
            title: "The Rust Book".to_string(),
            link: "https://doc.rust-lang.org/book/".to_string(),
            source: "rust-lang.org".to_string(),
            display_url: "doc.rust-lang.org".to_string(),
            description: String::new(),
            position: 1,
        }],
        related_keywords: vec!["rust tutorial".to_string(), "learn rust".to_string()],
        ai_strategy: "Cover ownership first.\n\nThen lifetimes.".to_string(),
    };
    let text = report::render_strategy("rust", &strategy, ReportFormat::Text).unwrap();
    assert!(text.contains("SEO STRATEGY: rust"));
    assert!(text.contains("  1. The Rust Book"));
    assert!(text.contains("  rust tutorial, learn rust"));
    assert!(text.contains("  Cover ownership first."));
    assert!(text.contains("  Then lifetimes."));
}

// ============================================================================
// Audit
// ============================================================================

#[test]
fn test_audit_summary_is_recomputed() {
    let audit = AuditReport::from_json(AUDIT_JSON).unwrap();
    assert_eq!(audit.summary.total_audits, 3);
    assert_eq!(audit.summary.score_percentage, 48);
    assert_eq!(audit.summary.passed_audits, 1);
    assert_eq!(audit.summary.failed_audits, 1);
    assert_eq!(audit.summary.pending_audits, 1);
    assert!(audit.generated_at().is_some());
}

#[test]
fn test_audit_text() {
    let audit = AuditReport::from_json(AUDIT_JSON).unwrap();
    let text = report::render_audit(&audit, ReportFormat::Text).unwrap();
    assert!(text.contains("URL:          https://example.com"));
    assert!(text.contains("Audited:      2025-03-01 10:00:00 UTC"));
    assert!(text.contains("Score:        48% (Poor)"));
    assert!(text.contains("TOP ISSUES"));
    assert!(!text.contains("QUICK WINS"));
    assert!(text.contains("Image alt text (weight 10)"));
}

#[test]
fn test_audit_csv() {
    let audit = AuditReport::from_json(AUDIT_JSON).unwrap();
    let csv = report::render_audit(&audit, ReportFormat::Csv).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "key,name,status,score,weight");
    assert_eq!(lines.len(), 4);
    assert!(lines.contains(&"sitemap,Sitemap,Pending,,5"));
}

#[test]
fn test_countries_rendering() {
    let hits = countries::search("micronesia");
    let csv = report::render_countries(&hits, ReportFormat::Csv).unwrap();
    assert_eq!(csv, "code,name\nfm,\"Micronesia, Federated States of\"\n");

    let md = report::render_countries(&hits, ReportFormat::Markdown).unwrap();
    assert!(md.ends_with("| fm | Micronesia, Federated States of |\n"));

    let json: serde_json::Value =
        serde_json::from_str(&report::render_countries(&hits, ReportFormat::Json).unwrap()).unwrap();
    assert_eq!(json[0]["code"], "fm");

    let none = countries::search("atlantis");
    assert_eq!(report::render_countries(&none, ReportFormat::Text).unwrap(), "");
}

#[test]
fn test_save_report() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.md");
    report::save_report("# hello\n", &path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "# hello\n");
}

#[test]
fn test_format_names() {
    assert_eq!(ReportFormat::from_str("md"), Some(ReportFormat::Markdown));
    assert_eq!(ReportFormat::from_str("JSON"), Some(ReportFormat::Json));
    assert_eq!(ReportFormat::from_str("xml"), None);
}
