// SEO audit results and their summary

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Top issues and quick wins shown per report.
pub const HIGHLIGHT_LIMIT: usize = 5;

/// Tri-state audit outcome; `null` on the wire means the audit has not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum AuditStatus {
    Passed,
    Failed,
    Pending,
}

impl From<Option<bool>> for AuditStatus {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => AuditStatus::Passed,
            Some(false) => AuditStatus::Failed,
            None => AuditStatus::Pending,
        }
    }
}

impl From<AuditStatus> for Option<bool> {
    fn from(status: AuditStatus) -> Self {
        match status {
            AuditStatus::Passed => Some(true),
            AuditStatus::Failed => Some(false),
            AuditStatus::Pending => None,
        }
    }
}

impl AuditStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AuditStatus::Passed => "Passed",
            AuditStatus::Failed => "Failed",
            AuditStatus::Pending => "Pending",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub weight: f64,
    #[serde(default = "pending")]
    pub status: AuditStatus,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub data: Value,
}

fn pending() -> AuditStatus {
    AuditStatus::Pending
}

impl AuditRecord {
    /// `"score/weight"`, or `N/A` before the audit has been scored.
    pub fn score_display(&self) -> String {
        match self.score {
            Some(score) => format!(
                "{}/{}",
                crate::metrics::format_number(score),
                crate::metrics::format_number(self.weight)
            ),
            None => "N/A".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSummary {
    pub total_audits: usize,
    pub total_weight: f64,
    pub total_score: f64,
    pub score_percentage: u32,
    pub passed_audits: usize,
    pub failed_audits: usize,
    pub pending_audits: usize,
}

impl AuditSummary {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a AuditRecord>,
    {
        let mut summary = AuditSummary::default();
        for record in records {
            summary.total_audits += 1;
            summary.total_weight += record.weight;
            summary.total_score += record.score.unwrap_or(0.0);
            match record.status {
                AuditStatus::Passed => summary.passed_audits += 1,
                AuditStatus::Failed => summary.failed_audits += 1,
                AuditStatus::Pending => summary.pending_audits += 1,
            }
        }
        summary.score_percentage = if summary.total_weight > 0.0 {
            (summary.total_score / summary.total_weight * 100.0)
                .round()
                .max(0.0) as u32
        } else {
            0
        };
        summary
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::for_percentage(self.score_percentage)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn for_percentage(percentage: u32) -> Self {
        if percentage >= 80 {
            ScoreBand::Good
        } else if percentage >= 60 {
            ScoreBand::Fair
        } else {
            ScoreBand::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Good => "Good",
            ScoreBand::Fair => "Needs work",
            ScoreBand::Poor => "Poor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    #[serde(default)]
    pub timestamp: String,
    pub url: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub audits: BTreeMap<String, AuditRecord>,
    #[serde(default)]
    pub summary: AuditSummary,
    #[serde(default)]
    pub top_issues: Vec<AuditRecord>,
    #[serde(default)]
    pub quick_wins: Vec<AuditRecord>,
}

impl AuditReport {
    /// Parse an audit payload; the summary is always recomputed from the
    /// records that arrived.
    pub fn from_json(raw: &str) -> Result<Self> {
        let mut report: AuditReport = serde_json::from_str(raw)?;
        report.summary = AuditSummary::from_records(report.audits.values());
        debug!(
            "Audit for {}: {} records, {}%",
            report.url, report.summary.total_audits, report.summary.score_percentage
        );
        Ok(report)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            crate::error::CoreError::Validation(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    pub fn top_issues(&self) -> &[AuditRecord] {
        &self.top_issues[..self.top_issues.len().min(HIGHLIGHT_LIMIT)]
    }

    pub fn quick_wins(&self) -> &[AuditRecord] {
        &self.quick_wins[..self.quick_wins.len().min(HIGHLIGHT_LIMIT)]
    }

    pub fn generated_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, weight: f64, status: Option<bool>, score: Option<f64>) -> AuditRecord {
        AuditRecord {
            id,
            name: format!("audit {}", id),
            description: String::new(),
            weight,
            status: status.into(),
            score,
            data: Value::Null,
        }
    }

    #[test]
    fn test_summary_counts_and_percentage() {
        let records = vec![
            record(1, 10.0, Some(true), Some(10.0)),
            record(2, 10.0, Some(false), Some(3.0)),
            record(3, 5.0, None, None),
        ];
        let summary = AuditSummary::from_records(&records);
        assert_eq!(summary.total_audits, 3);
        assert_eq!(summary.total_weight, 25.0);
        assert_eq!(summary.total_score, 13.0);
        assert_eq!(summary.score_percentage, 52);
        assert_eq!(summary.passed_audits, 1);
        assert_eq!(summary.failed_audits, 1);
        assert_eq!(summary.pending_audits, 1);
        assert_eq!(summary.band(), ScoreBand::Poor);
    }

    #[test]
    fn test_zero_weight_is_zero_percent() {
        let summary = AuditSummary::from_records(&[record(1, 0.0, Some(true), Some(0.0))]);
        assert_eq!(summary.score_percentage, 0);
    }

    #[test]
    fn test_bands() {
        assert_eq!(ScoreBand::for_percentage(80), ScoreBand::Good);
        assert_eq!(ScoreBand::for_percentage(79), ScoreBand::Fair);
        assert_eq!(ScoreBand::for_percentage(60), ScoreBand::Fair);
        assert_eq!(ScoreBand::for_percentage(59), ScoreBand::Poor);
    }

    #[test]
    fn test_status_from_wire() {
        let raw = r#"{"id":1,"name":"title","weight":2,"status":null,"score":null,"data":{}}"#;
        let parsed: AuditRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.status, AuditStatus::Pending);
        assert_eq!(parsed.score_display(), "N/A");
    }

    #[test]
    fn test_report_recomputes_summary_and_caps_highlights() {
        let issues: Vec<Value> = (0..8)
            .map(|i| serde_json::json!({"id": i, "name": "x", "weight": 1, "status": false, "score": 0}))
            .collect();
        let raw = serde_json::json!({
            "timestamp": "2025-01-02T03:04:05Z",
            "url": "https://example.com",
            "domain": "example.com",
            "audits": {
                "a": {"id": 1, "name": "a", "weight": 4, "status": true, "score": 4},
                "b": {"id": 2, "name": "b", "weight": 1, "status": false, "score": 0}
            },
            "summary": {"totalAudits": 99, "totalWeight": 1, "totalScore": 1, "scorePercentage": 100,
                        "passedAudits": 0, "failedAudits": 0, "pendingAudits": 0},
            "topIssues": issues,
            "quickWins": []
        })
        .to_string();

        let report = AuditReport::from_json(&raw).unwrap();
        assert_eq!(report.summary.total_audits, 2);
        assert_eq!(report.summary.score_percentage, 80);
        assert_eq!(report.top_issues().len(), HIGHLIGHT_LIMIT);
        assert!(report.quick_wins().is_empty());
        assert!(report.generated_at().is_some());
    }
}
