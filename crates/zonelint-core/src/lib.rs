//! Zone boundary validation
//!
//! Validates a dataset of zone polygons before it is published. Seven checks
//! run in a fixed order and the first failing one aborts the run:
//!
//! 1. Null geometry
//! 2. Property completeness (`zoneName` or `countryKey`)
//! 3. Polygon complexity (convex hull deviation)
//! 4. Zone registry membership
//! 5. Gaps in the dissolved coverage
//! 6. Adjacent polygons sharing a zone
//! 7. Overlaps between zones
//!
//! # Example
//!
//! ```no_run
//! use zonelint_core::{geojson, ValidationConfig, ZoneRegistry};
//!
//! let dataset = geojson::read_dataset("web/geo/world.geojson")?;
//! let config = ValidationConfig::from_file("zonelint.toml")?;
//! let registry = ZoneRegistry::load("config/zones")?;
//!
//! zonelint_core::validate(&dataset, &config, &registry)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod checks;
pub mod config;
pub mod geojson;
pub mod geometry;
pub mod model;
pub mod registry;
pub mod report;

mod error;
mod pipeline;

pub use checks::{Check, CheckContext, Offender};
pub use config::{AreaMetric, ValidationConfig};
pub use error::{Category, LoadError, Result, ValidationError};
pub use model::{Dataset, Feature, ZoneProperties};
pub use pipeline::ValidationPipeline;
pub use registry::ZoneRegistry;
pub use report::ValidationReport;

/// Run the standard fail-fast pipeline.
pub fn validate(
    dataset: &Dataset,
    config: &ValidationConfig,
    registry: &ZoneRegistry,
) -> Result<()> {
    let ctx = CheckContext::new(dataset, config, registry);
    ValidationPipeline::new().run(&ctx)
}

/// Run every check and collect the outcome.
pub fn audit(
    dataset: &Dataset,
    config: &ValidationConfig,
    registry: &ZoneRegistry,
) -> ValidationReport {
    let ctx = CheckContext::new(dataset, config, registry);
    ValidationPipeline::new().audit(&ctx)
}

/// Re-exports for convenience
pub mod prelude {
    pub use crate::checks::{Check, CheckContext, Offender};
    pub use crate::config::{AreaMetric, ValidationConfig};
    pub use crate::model::{Dataset, Feature};
    pub use crate::pipeline::ValidationPipeline;
    pub use crate::registry::ZoneRegistry;
    pub use crate::report::ValidationReport;
    pub use crate::{Category, Result, ValidationError};
}
