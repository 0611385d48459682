//! Validate and report commands

use crate::EXIT_FAILURE;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{error, info};
use zonelint_core::{geojson, Dataset, ValidationConfig, ZoneRegistry};

/// Locations of the three validation inputs.
#[derive(Debug, Clone)]
pub struct InputPaths {
    pub world: PathBuf,
    pub zones: PathBuf,
    /// Thresholds file; defaults apply when absent.
    pub config: Option<PathBuf>,
    /// Overrides `ERROR_PATH` from the config file.
    pub error_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub json: bool,
    pub output: Option<PathBuf>,
}

pub fn load_inputs(paths: &InputPaths) -> Result<(Dataset, ValidationConfig, ZoneRegistry)> {
    let mut config = match &paths.config {
        Some(path) => ValidationConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ValidationConfig::default(),
    };
    if let Some(ref error_path) = paths.error_path {
        config = config.with_error_path(error_path);
    }

    let dataset = geojson::read_dataset(&paths.world)
        .with_context(|| format!("Failed to load zones from {}", paths.world.display()))?;
    let registry = ZoneRegistry::load(&paths.zones).with_context(|| {
        format!("Failed to load zone registry from {}", paths.zones.display())
    })?;

    info!(
        "Loaded {} features and {} registered zones",
        dataset.len(),
        registry.len()
    );
    Ok((dataset, config, registry))
}

/// Fail-fast validation. Returns the process exit status.
pub fn run_validation(paths: &InputPaths) -> Result<i32> {
    let (dataset, config, registry) = load_inputs(paths)?;

    match zonelint_core::validate(&dataset, &config, &registry) {
        Ok(()) => {
            info!("✓ {} is valid", paths.world.display());
            Ok(0)
        }
        Err(e) => {
            error!("✗ {}", e);
            Ok(e.category().map(|c| c.exit_code()).unwrap_or(EXIT_FAILURE))
        }
    }
}

/// Run every check and print or write the report. Returns the process exit status.
pub fn run_report(paths: &InputPaths, options: &ReportOptions) -> Result<i32> {
    let (dataset, config, registry) = load_inputs(paths)?;
    let report = zonelint_core::audit(&dataset, &config, &registry);

    let output = if options.json {
        report.to_json()?
    } else {
        report.to_markdown()
    };

    if let Some(ref output_path) = options.output {
        std::fs::write(output_path, &output)
            .with_context(|| format!("Failed to write report {}", output_path.display()))?;
        info!("Report written to: {}", output_path.display());
    } else {
        println!("{}", output);
    }

    Ok(if report.is_success() { 0 } else { EXIT_FAILURE })
}
