use super::{Check, CheckContext, Offender};
use crate::error::Category;

/// Polygon features must carry a zoneName or a countryKey.
pub struct PropertyCompletenessCheck;

impl Check for PropertyCompletenessCheck {
    fn name(&self) -> &'static str {
        "property-completeness"
    }

    fn category(&self) -> Category {
        Category::MissingProperties
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Offender> {
        ctx.dataset
            .polygon_features()
            .filter(|f| f.zone_name().is_none() && f.country_key().is_none())
            .map(|f| Offender::Feature {
                index: f.index,
                label: f.label(),
                detail: Some("missing zoneName and countryKey".to_string()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::test_support::*;
    use crate::config::ValidationConfig;
    use crate::model::Feature;
    use crate::registry::ZoneRegistry;
    use geo::Point;

    #[test]
    fn test_flags_polygon_without_names() {
        let dataset = dataset(vec![
            zone("A", unit_square(0.0, 0.0)),
            Feature::new(0, unit_square(2.0, 0.0)).with_country_key("DK"),
            Feature::new(0, unit_square(4.0, 0.0))
                .with_zone_name("")
                .with_country_key(""),
            // Non-polygon features are out of scope.
            Feature::new(0, Point::new(0.0, 0.0)),
        ]);
        let config = ValidationConfig::default();
        let registry = ZoneRegistry::new();
        let ctx = CheckContext::new(&dataset, &config, &registry);

        let offenders = PropertyCompletenessCheck.run(&ctx);
        assert_eq!(offenders.len(), 1);
        assert!(matches!(offenders[0], Offender::Feature { index: 2, .. }));
    }
}
