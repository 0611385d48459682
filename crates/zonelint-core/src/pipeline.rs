//! Validation pipeline
//!
//! Runs the checks in a fixed order. [`ValidationPipeline::run`] stops at the
//! first failing check and returns its category error; the rest of the checks
//! do not execute. [`ValidationPipeline::audit`] runs every check and collects
//! the outcome into a [`ValidationReport`] instead.

use crate::checks::{self, Check, CheckContext};
use crate::error::Result;
use crate::report::{CheckReport, ValidationReport};
use std::time::Instant;
use tracing::{debug, error, info};

pub struct ValidationPipeline {
    checks: Vec<Box<dyn Check>>,
}

impl ValidationPipeline {
    /// Pipeline with the seven standard checks.
    pub fn new() -> Self {
        Self {
            checks: checks::default_checks(),
        }
    }

    /// Pipeline with a custom ordered list of checks.
    pub fn with_checks(checks: Vec<Box<dyn Check>>) -> Self {
        Self { checks }
    }

    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    /// Fail-fast validation.
    ///
    /// Logs one line per offender of the first failing check, writes that
    /// check's diagnostic artifact, and returns its error. A failed artifact
    /// write is logged and does not change the category.
    pub fn run(&self, ctx: &CheckContext<'_>) -> Result<()> {
        info!(
            "Validating {} features with {} checks",
            ctx.dataset.len(),
            self.checks.len()
        );

        for check in &self.checks {
            debug!("Running check {}", check.name());
            let offenders = check.run(ctx);

            if offenders.is_empty() {
                info!("✓ {} passed", check.name());
                continue;
            }

            for offender in &offenders {
                error!(check = check.name(), "{}", offender);
            }
            let artifact = check.write_artifact(ctx, &offenders).unwrap_or_else(|e| {
                error!("{}", e);
                None
            });
            if let Some(ref path) = artifact {
                info!("Diagnostics written to {}", path.display());
            }
            return Err(checks::into_error(check.category(), &offenders, artifact));
        }

        info!("✓ All {} checks passed", self.checks.len());
        Ok(())
    }

    /// Run every check and report all failures at once.
    pub fn audit(&self, ctx: &CheckContext<'_>) -> ValidationReport {
        let start = Instant::now();
        let mut report = ValidationReport::new();
        report.set_total_features(ctx.dataset.len());

        for check in &self.checks {
            debug!("Running check {}", check.name());
            let offenders = check.run(ctx);

            let artifact = if offenders.is_empty() {
                info!("✓ {} passed", check.name());
                None
            } else {
                for offender in &offenders {
                    error!(check = check.name(), "{}", offender);
                }
                check.write_artifact(ctx, &offenders).unwrap_or_else(|e| {
                    error!("{}", e);
                    None
                })
            };

            report.add_check(CheckReport {
                name: check.name().to_string(),
                category: check.category(),
                passed: offenders.is_empty(),
                offenders: offenders.iter().map(|o| o.to_string()).collect(),
                artifact,
            });
        }

        report.set_duration(start.elapsed().as_millis());
        report
    }
}

impl Default for ValidationPipeline {
    fn default() -> Self {
        Self::new()
    }
}
