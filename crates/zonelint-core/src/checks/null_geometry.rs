use super::{Check, CheckContext, Offender};
use crate::error::Category;

/// Flags features whose geometry is missing or has no coordinates.
pub struct NullGeometryCheck;

impl Check for NullGeometryCheck {
    fn name(&self) -> &'static str {
        "null-geometry"
    }

    fn category(&self) -> Category {
        Category::NullGeometry
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Offender> {
        ctx.dataset
            .features()
            .iter()
            .filter(|f| f.coordinate_count() == 0)
            .map(|f| Offender::Feature {
                index: f.index,
                label: f.label(),
                detail: None,
            })
            .collect()
    }
}
