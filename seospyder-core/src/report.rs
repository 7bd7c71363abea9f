// Rendering of reports, site lists, strategies and audits

use crate::audit::AuditReport;
use crate::countries::Country;
use crate::error::Result;
use crate::metrics::format_number;
use crate::site::display_domain;
use seospyder_client::ReportRow;
use seospyder_client::models::{SeoStrategy, WebsiteEntry};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";
const THIN_RULE: &str = "────────────────────────────────────────────────────────────────────────────────\n";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Csv,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }
}

fn heading(report: &mut String, title: &str) {
    report.push_str(RULE);
    report.push_str(title);
    report.push('\n');
    report.push_str(RULE);
    report.push('\n');
}

fn metadata() -> serde_json::Value {
    serde_json::json!({
        "generator": "SeoSpyder",
        "version": env!("CARGO_PKG_VERSION"),
        "generated_at": chrono::Utc::now().to_rfc3339(),
    })
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn md_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

pub fn render_rows(domain: &str, rows: &[ReportRow], format: ReportFormat) -> Result<String> {
    Ok(match format {
        ReportFormat::Text => {
            let mut report = String::new();
            heading(&mut report, &format!("PAGE PERFORMANCE: {}", display_domain(domain)));
            if rows.is_empty() {
                report.push_str("  (no rows)\n");
            }
            for (idx, row) in rows.iter().enumerate() {
                report.push_str(&format!("[{}] {}\n", idx + 1, row.page_url));
                report.push_str(&format!(
                    "    Clicks: {}  Impressions: {}  CTR: {}%  Position: {:.1}\n",
                    format_number(row.clicks),
                    format_number(row.impressions),
                    format_number(row.ctr),
                    row.position
                ));
                if let Some(ref id) = row.id {
                    report.push_str(&format!("    Page id: {}\n", id));
                }
            }
            report
        }
        ReportFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
            "metadata": metadata(),
            "domain": domain,
            "total_rows": rows.len(),
            "rows": rows,
        }))?,
        ReportFormat::Csv => {
            let mut out = String::from("page_url,clicks,impressions,ctr,position,id\n");
            for row in rows {
                out.push_str(&format!(
                    "{},{},{},{},{},{}\n",
                    csv_field(&row.page_url),
                    format_number(row.clicks),
                    format_number(row.impressions),
                    format_number(row.ctr),
                    format_number(row.position),
                    csv_field(row.id.as_deref().unwrap_or_default())
                ));
            }
            out
        }
        ReportFormat::Markdown => {
            let mut out = format!("# Page performance: {}\n\n", display_domain(domain));
            out.push_str("| Page | Clicks | Impressions | CTR | Position |\n");
            out.push_str("|---|---:|---:|---:|---:|\n");
            for row in rows {
                out.push_str(&format!(
                    "| {} | {} | {} | {}% | {:.1} |\n",
                    md_cell(&row.page_url),
                    format_number(row.clicks),
                    format_number(row.impressions),
                    format_number(row.ctr),
                    row.position
                ));
            }
            out
        }
    })
}

pub fn render_sites(sites: &[WebsiteEntry], format: ReportFormat) -> Result<String> {
    Ok(match format {
        ReportFormat::Text => {
            let mut out = String::new();
            for site in sites {
                out.push_str(&format!(
                    "  {}  ({})\n",
                    display_domain(&site.site_url),
                    site.permission_level
                ));
            }
            out
        }
        ReportFormat::Json => serde_json::to_string_pretty(sites)?,
        ReportFormat::Csv => {
            let mut out = String::from("site_url,permission_level\n");
            for site in sites {
                out.push_str(&format!(
                    "{},{}\n",
                    csv_field(&site.site_url),
                    csv_field(&site.permission_level)
                ));
            }
            out
        }
        ReportFormat::Markdown => {
            let mut out = String::from("| Site | Permission |\n|---|---|\n");
            for site in sites {
                out.push_str(&format!(
                    "| {} | {} |\n",
                    md_cell(&site.site_url),
                    md_cell(&site.permission_level)
                ));
            }
            out
        }
    })
}

pub fn render_countries(countries: &[&Country], format: ReportFormat) -> Result<String> {
    Ok(match format {
        ReportFormat::Text => countries
            .iter()
            .map(|c| format!("  {}  {}\n", c.code, c.name))
            .collect(),
        ReportFormat::Json => serde_json::to_string_pretty(countries)?,
        ReportFormat::Csv => {
            let mut out = String::from("code,name\n");
            for c in countries {
                out.push_str(&format!("{},{}\n", csv_field(c.code), csv_field(c.name)));
            }
            out
        }
        ReportFormat::Markdown => {
            let mut out = String::from("| Code | Country |\n|---|---|\n");
            for c in countries {
                out.push_str(&format!("| {} | {} |\n", md_cell(c.code), md_cell(c.name)));
            }
            out
        }
    })
}

pub fn render_strategy(keyword: &str, strategy: &SeoStrategy, format: ReportFormat) -> Result<String> {
    Ok(match format {
        ReportFormat::Text => {
            let mut report = String::new();
            heading(&mut report, &format!("SEO STRATEGY: {}", keyword));
            report.push_str("Top results:\n");
            for result in &strategy.results {
                report.push_str(&format!("  {}. {}\n", result.position, result.title));
                report.push_str(&format!("     {}\n", result.link));
            }
            if !strategy.related_keywords.is_empty() {
                report.push_str("\nRelated keywords:\n");
                report.push_str(&wrap_text(&strategy.related_keywords.join(", "), 80, "  "));
            }
            report.push('\n');
            report.push_str(THIN_RULE);
            report.push_str("AI strategy:\n\n");
            for paragraph in strategy.ai_strategy.lines() {
                if paragraph.trim().is_empty() {
                    report.push('\n');
                } else {
                    report.push_str(&wrap_text(paragraph, 80, "  "));
                }
            }
            report
        }
        ReportFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
            "metadata": metadata(),
            "keyword": keyword,
            "strategy": strategy,
        }))?,
        ReportFormat::Csv => {
            let mut out = String::from("position,title,link,source,display_url\n");
            for result in &strategy.results {
                out.push_str(&format!(
                    "{},{},{},{},{}\n",
                    result.position,
                    csv_field(&result.title),
                    csv_field(&result.link),
                    csv_field(&result.source),
                    csv_field(&result.display_url)
                ));
            }
            out
        }
        ReportFormat::Markdown => {
            let mut out = format!("# SEO strategy: {}\n\n## Top results\n\n", keyword);
            for result in &strategy.results {
                out.push_str(&format!(
                    "{}. [{}]({})\n",
                    result.position,
                    md_cell(&result.title),
                    result.link
                ));
            }
            if !strategy.related_keywords.is_empty() {
                out.push_str("\n## Related keywords\n\n");
                for keyword in &strategy.related_keywords {
                    out.push_str(&format!("- {}\n", keyword));
                }
            }
            out.push_str("\n## AI strategy\n\n");
            out.push_str(&strategy.ai_strategy);
            out.push('\n');
            out
        }
    })
}

pub fn render_audit(audit: &AuditReport, format: ReportFormat) -> Result<String> {
    let summary = &audit.summary;
    Ok(match format {
        ReportFormat::Text => {
            let mut report = String::new();
            heading(&mut report, "SEO AUDIT REPORT");
            report.push_str(&format!("URL:          {}\n", audit.url));
            if let Some(at) = audit.generated_at() {
                report.push_str(&format!("Audited:      {}\n", at.format("%Y-%m-%d %H:%M:%S UTC")));
            }
            report.push_str(&format!(
                "Score:        {}% ({})\n",
                summary.score_percentage,
                summary.band().label()
            ));
            report.push_str(&format!(
                "Audits:       {} passed, {} failed, {} pending\n\n",
                summary.passed_audits, summary.failed_audits, summary.pending_audits
            ));

            if !audit.top_issues().is_empty() {
                heading(&mut report, "TOP ISSUES");
                for issue in audit.top_issues() {
                    report.push_str(&format!("  {} (weight {})\n", issue.name, format_number(issue.weight)));
                }
                report.push('\n');
            }
            if !audit.quick_wins().is_empty() {
                heading(&mut report, "QUICK WINS");
                for win in audit.quick_wins() {
                    report.push_str(&format!("  {} (weight {})\n", win.name, format_number(win.weight)));
                }
                report.push('\n');
            }

            heading(&mut report, "ALL AUDITS");
            for record in audit.audits.values() {
                report.push_str(&format!(
                    "[{}] {}  {}\n",
                    record.status.label().to_uppercase(),
                    record.name,
                    record.score_display()
                ));
                if !record.description.is_empty() {
                    report.push_str(&wrap_text(&record.description, 80, "    "));
                }
            }
            report
        }
        ReportFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
            "metadata": metadata(),
            "audit": audit,
        }))?,
        ReportFormat::Csv => {
            let mut out = String::from("key,name,status,score,weight\n");
            for (key, record) in &audit.audits {
                out.push_str(&format!(
                    "{},{},{},{},{}\n",
                    csv_field(key),
                    csv_field(&record.name),
                    record.status.label(),
                    record.score.map(format_number).unwrap_or_default(),
                    format_number(record.weight)
                ));
            }
            out
        }
        ReportFormat::Markdown => {
            let mut out = format!(
                "# SEO audit: {}\n\n**Score:** {}% ({})\n\n",
                audit.url,
                summary.score_percentage,
                summary.band().label()
            );
            out.push_str("| Audit | Status | Score |\n|---|---|---|\n");
            for record in audit.audits.values() {
                out.push_str(&format!(
                    "| {} | {} | {} |\n",
                    md_cell(&record.name),
                    record.status.label(),
                    record.score_display()
                ));
            }
            out
        }
    })
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn wrap_text(text: &str, width: usize, indent: &str) -> String {
    let mut result = String::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.chars().count() + word.chars().count() + 1 > width - indent.len()
            && !current_line.is_empty()
        {
            result.push_str(indent);
            result.push_str(&current_line);
            result.push('\n');
            current_line.clear();
        }

        if !current_line.is_empty() {
            current_line.push(' ');
        }
        current_line.push_str(word);
    }

    if !current_line.is_empty() {
        result.push_str(indent);
        result.push_str(&current_line);
        result.push('\n');
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text() {
        let wrapped = wrap_text("one two three four", 12, "  ");
        assert_eq!(wrapped, "  one two\n  three four\n");
    }

    #[test]
    fn test_csv_escaping() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
