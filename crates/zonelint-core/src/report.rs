//! Validation report generation
//!
//! Produced by [`crate::ValidationPipeline::audit`], which runs every check
//! instead of stopping at the first failure. Renders to Markdown for humans
//! and JSON for CI tooling.

use crate::error::Category;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub timestamp: String,
    pub summary: ValidationSummary,
    pub checks: Vec<CheckReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub success: bool,
    pub total_features: usize,
    pub checks_run: usize,
    pub checks_failed: usize,
    pub duration_ms: u128,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub name: String,
    pub category: Category,
    pub passed: bool,
    pub offenders: Vec<String>,
    pub artifact: Option<PathBuf>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            summary: ValidationSummary {
                success: true,
                total_features: 0,
                checks_run: 0,
                checks_failed: 0,
                duration_ms: 0,
            },
            checks: Vec::new(),
        }
    }

    pub fn add_check(&mut self, check: CheckReport) {
        self.summary.checks_run += 1;
        if !check.passed {
            self.summary.checks_failed += 1;
            self.summary.success = false;
        }
        self.checks.push(check);
    }

    pub fn set_total_features(&mut self, total: usize) {
        self.summary.total_features = total;
    }

    pub fn set_duration(&mut self, duration_ms: u128) {
        self.summary.duration_ms = duration_ms;
    }

    pub fn is_success(&self) -> bool {
        self.summary.success
    }

    /// Categories of every failed check, in pipeline order.
    pub fn failed_categories(&self) -> Vec<Category> {
        self.checks
            .iter()
            .filter(|c| !c.passed)
            .map(|c| c.category)
            .collect()
    }

    /// Generate markdown report
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str("# Zone Validation Report\n\n");
        md.push_str(&format!("**Generated:** {}\n\n", self.timestamp));

        md.push_str("## Summary\n\n");
        if self.summary.success {
            md.push_str("✅ **PASS** - All checks passed\n\n");
        } else {
            md.push_str(&format!(
                "❌ **FAIL** - {} of {} checks failed\n\n",
                self.summary.checks_failed, self.summary.checks_run
            ));
        }

        md.push_str(&format!(
            "- **Total Features:** {}\n",
            self.summary.total_features
        ));
        md.push_str(&format!(
            "- **Duration:** {:.2}s\n\n",
            self.summary.duration_ms as f64 / 1000.0
        ));

        md.push_str("## Checks\n\n");
        for check in &self.checks {
            if check.passed {
                md.push_str(&format!("- ✅ {}\n", check.name));
                continue;
            }

            md.push_str(&format!(
                "- ❌ {} ({}): {} offender(s)\n",
                check.name,
                check.category,
                check.offenders.len()
            ));
            for offender in &check.offenders {
                md.push_str(&format!("  - {}\n", offender));
            }
            if let Some(ref artifact) = check.artifact {
                md.push_str(&format!("  - diagnostics: `{}`\n", artifact.display()));
            }
        }
        md.push('\n');

        md
    }

    /// Generate JSON report
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_markdown())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passed(name: &str, category: Category) -> CheckReport {
        CheckReport {
            name: name.to_string(),
            category,
            passed: true,
            offenders: vec![],
            artifact: None,
        }
    }

    #[test]
    fn test_report_generation() {
        let mut report = ValidationReport::new();
        report.add_check(passed("null-geometry", Category::NullGeometry));
        report.set_total_features(10);
        report.set_duration(1500);

        let markdown = report.to_markdown();
        assert!(markdown.contains("PASS"));
        assert!(markdown.contains("Total Features:** 10"));
        assert!(markdown.contains("1.50s"));
    }

    #[test]
    fn test_report_with_failures() {
        let mut report = ValidationReport::new();
        report.add_check(passed("null-geometry", Category::NullGeometry));
        report.add_check(CheckReport {
            name: "gaps".to_string(),
            category: Category::GapDetected,
            passed: false,
            offenders: vec!["hole with area 1.000".to_string()],
            artifact: Some(PathBuf::from("errors/gaps.geojson")),
        });

        assert!(!report.is_success());
        assert_eq!(report.failed_categories(), vec![Category::GapDetected]);

        let markdown = report.to_markdown();
        assert!(markdown.contains("FAIL"));
        assert!(markdown.contains("1 of 2 checks failed"));
        assert!(markdown.contains("GAP_DETECTED"));
        assert!(markdown.contains("errors/gaps.geojson"));
    }

    #[test]
    fn test_json_roundtrip_keeps_categories() {
        let mut report = ValidationReport::new();
        report.add_check(passed("overlaps", Category::OverlapDetected));

        let json = report.to_json().unwrap();
        let parsed: ValidationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.checks[0].category, Category::OverlapDetected);
        assert!(parsed.summary.success);
    }
}
