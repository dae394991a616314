// src/domain/selector.rs

use crate::domain::record::{PropertyRecord, RecordId};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Why a record made it into a result group. Roles also define the
/// priority order when the capacity cap truncates a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompRole {
    Nearest1,
    Nearest2,
    Nearest3,
    LeastValue,
    MostValue,
}

impl CompRole {
    pub fn as_str(self) -> &'static str {
        match self {
            CompRole::Nearest1 => "Nearest 1",
            CompRole::Nearest2 => "Nearest 2",
            CompRole::Nearest3 => "Nearest 3",
            CompRole::LeastValue => "Least Value",
            CompRole::MostValue => "Most Value",
        }
    }

    fn nearest(i: usize) -> CompRole {
        match i {
            0 => CompRole::Nearest1,
            1 => CompRole::Nearest2,
            _ => CompRole::Nearest3,
        }
    }
}

/// One selected comparable: the record, the role it was picked for, and
/// its 1-based rank within the group.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparableResult {
    pub record: PropertyRecord,
    pub role: CompRole,
    pub rank: usize,
    pub distance: f64,
}

/// Euclidean distance in the (market value, value-per-room) plane.
pub fn distance(base: &PropertyRecord, candidate: &PropertyRecord) -> f64 {
    let dv = candidate.market_value - base.market_value;
    let dr = candidate.value_per_room - base.value_per_room;
    (dv * dv + dr * dr).sqrt()
}

fn value_key(c: &PropertyRecord) -> (f64, f64) {
    (c.market_value, c.value_per_room)
}

/// Picks up to `capacity` diverse comparables from the eligible pool:
/// the three nearest in the (market value, VPR) plane, then the lowest-
/// and highest-value records among what remains. Later stages never see
/// earlier picks, so a small pool degrades one stage at a time.
///
/// All sorts are stable with ties falling back to dataset order, so the
/// same input always yields the identical sequence.
pub fn select_comparables(
    eligible: &[PropertyRecord],
    base: &PropertyRecord,
    capacity: usize,
) -> Vec<ComparableResult> {
    let mut by_distance: Vec<&PropertyRecord> = eligible.iter().collect();
    by_distance.sort_by(|&a, &b| {
        distance(base, a)
            .partial_cmp(&distance(base, b))
            .unwrap_or(Ordering::Equal)
    });

    let mut picks: Vec<(&PropertyRecord, CompRole)> = Vec::new();
    for (i, c) in by_distance.iter().copied().take(3).enumerate() {
        picks.push((c, CompRole::nearest(i)));
    }

    let taken: HashSet<RecordId> = picks.iter().map(|(c, _)| c.id).collect();
    let mut remaining: Vec<&PropertyRecord> =
        eligible.iter().filter(|c| !taken.contains(&c.id)).collect();

    // Least value: ascending (market value, VPR), lexicographic.
    remaining.sort_by(|&a, &b| {
        value_key(a)
            .partial_cmp(&value_key(b))
            .unwrap_or(Ordering::Equal)
    });
    if let Some(least) = remaining.first().copied() {
        picks.push((least, CompRole::LeastValue));
        remaining.retain(|c| c.id != least.id);
    }

    // Most value: descending over what is left after the least pick.
    remaining.sort_by(|&a, &b| {
        value_key(b)
            .partial_cmp(&value_key(a))
            .unwrap_or(Ordering::Equal)
    });
    if let Some(most) = remaining.first().copied() {
        picks.push((most, CompRole::MostValue));
    }

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for (c, role) in picks {
        if !seen.insert(c.id) {
            continue;
        }
        if out.len() == capacity {
            break;
        }
        out.push(ComparableResult {
            record: c.clone(),
            role,
            rank: out.len() + 1,
            distance: distance(base, c),
        });
    }

    out
}
