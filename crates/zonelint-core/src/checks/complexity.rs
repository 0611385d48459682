use super::{Check, CheckContext, Offender};
use crate::error::Category;
use crate::geometry;
use tracing::{trace, warn};

/// Scores each polygon feature by its convex hull deviation.
///
/// A feature whose hull cannot be computed is scored `f64::MAX` and therefore
/// always flagged.
pub struct ComplexityCheck;

impl Check for ComplexityCheck {
    fn name(&self) -> &'static str {
        "complexity"
    }

    fn category(&self) -> Category {
        Category::ExcessiveComplexity
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Offender> {
        let threshold = ctx.config.max_convex_deviation;
        let metric = ctx.config.area_metric;

        ctx.dataset
            .polygon_features()
            .filter_map(|feature| {
                let polygons = feature.polygons()?;
                let deviation = match geometry::convex_hull_deviation(&polygons, metric) {
                    Some(deviation) => deviation,
                    None => {
                        warn!(
                            "Convex hull of {} could not be computed, treating it as maximally complex",
                            feature.label()
                        );
                        f64::MAX
                    }
                };
                trace!("{} convex hull deviation {}", feature.label(), deviation);

                (deviation > threshold).then(|| Offender::Feature {
                    index: feature.index,
                    label: feature.label(),
                    detail: Some(if deviation == f64::MAX {
                        "convex hull could not be computed".to_string()
                    } else {
                        format!("deviation {:.3} exceeds {:.3}", deviation, threshold)
                    }),
                })
            })
            .collect()
    }
}
