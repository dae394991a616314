// src/domain/filter.rs

use crate::domain::class::compatible_orders;
use crate::domain::config::MatchConfig;
use crate::domain::record::PropertyRecord;
use std::collections::HashSet;

/// Applies the hard eligibility rules for one base record over the
/// candidate pool, preserving dataset order.
///
/// A candidate passes when it is not the base row itself (by id), sits
/// in the same state and county, has strictly fewer rooms, falls inside
/// both value bands, and carries a compatible hotel class. Duplicate
/// listings of the same property/owner are then collapsed to the
/// dataset-earliest row.
///
/// An empty result is a normal outcome, not an error; the runner
/// reports it as a no-match group.
pub fn eligible_comparables(
    pool: &[PropertyRecord],
    base: &PropertyRecord,
    cfg: &MatchConfig,
) -> Vec<PropertyRecord> {
    let allowed = compatible_orders(base.class_order);

    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for c in pool {
        if c.id == base.id {
            continue;
        }
        if c.state != base.state || c.county != base.county {
            continue;
        }
        if c.room_count >= base.room_count {
            continue;
        }
        if !cfg.mv_band.contains(base.market_value, c.market_value) {
            continue;
        }
        if !cfg.vpr_band.contains(base.value_per_room, c.value_per_room) {
            continue;
        }
        if !allowed.contains(&c.class_order) {
            continue;
        }

        let key = (
            c.project_name.clone(),
            c.owner_street.clone(),
            c.owner_name.clone(),
        );
        if !seen.insert(key) {
            continue;
        }

        out.push(c.clone());
    }

    out
}
