use super::{Check, CheckContext, Offender};
use crate::error::Category;
use std::collections::HashSet;

/// Every zoneName in the dataset must be a key of the zone registry.
///
/// Features without a zoneName have nothing to look up and are skipped.
pub struct ZoneRegistryCheck;

impl Check for ZoneRegistryCheck {
    fn name(&self) -> &'static str {
        "zone-registry"
    }

    fn category(&self) -> Category {
        Category::ZoneNotRegistered
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Vec<Offender> {
        let mut reported = HashSet::new();

        ctx.dataset
            .features()
            .iter()
            .filter_map(|f| f.zone_name())
            .filter(|zone_name| !ctx.registry.contains(zone_name))
            .filter(|zone_name| reported.insert(*zone_name))
            .map(|zone_name| Offender::Zone {
                zone_name: zone_name.to_string(),
            })
            .collect()
    }
}
