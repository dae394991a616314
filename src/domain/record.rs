// src/domain/record.rs

use crate::domain::class::HotelClass;
use serde::Serialize;
use std::fmt;

/// Position of a record in the original dataset order.
///
/// Identity comparisons (base-record exclusion, result dedup) go through
/// this id, never through field equality: two rows with identical values
/// are still distinct records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RecordId(pub usize);

/// One normalized row of the working dataset, ready for matching.
/// This is the boundary between the uploaded spreadsheet and the
/// matching core: everything here has already passed coercion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyRecord {
    pub id: RecordId,

    pub address: String,
    pub project_name: String,
    pub state: String,
    pub county: String,

    pub room_count: f64,
    pub market_value: f64,
    pub value_per_room: f64,

    pub hotel_class: HotelClass,
    pub class_order: u8,

    // Used only for duplicate-owner collapsing.
    pub owner_street: String,
    pub owner_name: String,

    /// Columns we don't interpret, preserved verbatim for export.
    pub extra: Vec<(String, String)>,
}

impl PropertyRecord {
    /// Key under which duplicate listings of the same physical
    /// property/owner are collapsed.
    pub fn dedup_key(&self) -> (&str, &str, &str) {
        (&self.project_name, &self.owner_street, &self.owner_name)
    }

    /// Revalidates a record that is about to drive a match run. The
    /// normalizer already enforces these invariants on load, but a base
    /// record arrives by id from a form post and gets checked once more
    /// so a bad row fails its own group instead of the whole batch.
    pub fn check_base(&self) -> Result<(), IncompatibleBase> {
        if !self.room_count.is_finite() || self.room_count <= 0.0 {
            return Err(IncompatibleBase(format!(
                "room count must be positive, got {}",
                self.room_count
            )));
        }
        if !self.market_value.is_finite() || self.market_value < 0.0 {
            return Err(IncompatibleBase(format!(
                "market value must be non-negative, got {}",
                self.market_value
            )));
        }
        if !self.value_per_room.is_finite() || self.value_per_room < 0.0 {
            return Err(IncompatibleBase(format!(
                "value per room must be non-negative, got {}",
                self.value_per_room
            )));
        }
        if !(1..=8).contains(&self.class_order) {
            return Err(IncompatibleBase(format!(
                "hotel class order out of range: {}",
                self.class_order
            )));
        }
        Ok(())
    }
}

/// A base record that cannot drive a match run (missing or out-of-range
/// required field). Fails the record's own result group only.
#[derive(Debug, Clone, PartialEq)]
pub struct IncompatibleBase(pub String);

impl fmt::Display for IncompatibleBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "incompatible base record: {}", self.0)
    }
}

impl std::error::Error for IncompatibleBase {}
