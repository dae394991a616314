// src/domain/runner.rs

use crate::domain::config::{ConfigError, MatchConfig};
use crate::domain::filter::eligible_comparables;
use crate::domain::record::PropertyRecord;
use crate::domain::selector::{select_comparables, ComparableResult};
use std::sync::atomic::{AtomicBool, Ordering};

/// Outcome of matching one base record.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupStatus {
    Matched,
    NoMatch,
    /// The base record itself could not drive a run. Only this group
    /// fails; siblings in the batch still process.
    Failed(String),
}

impl GroupStatus {
    pub fn label(&self) -> String {
        match self {
            GroupStatus::Matched => "Matched".to_string(),
            GroupStatus::NoMatch => "No Match".to_string(),
            GroupStatus::Failed(reason) => format!("Error: {reason}"),
        }
    }
}

/// Everything produced for one base record: the selected comparables,
/// how many candidates were eligible before the capacity cut, and the
/// match status.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultGroup {
    pub base: PropertyRecord,
    pub comparables: Vec<ComparableResult>,
    pub eligible_count: usize,
    pub status: GroupStatus,
}

/// Runs filter + selection for a set of base records against a shared
/// read-only pool. Construction validates the configuration, so a bad
/// band never starts a partial batch.
pub struct MatchRunner {
    cfg: MatchConfig,
}

impl MatchRunner {
    pub fn new(cfg: MatchConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// One `ResultGroup` per base record, in input order. Every base
    /// yields exactly one group; nothing is silently dropped.
    pub fn run(&self, bases: &[PropertyRecord], pool: &[PropertyRecord]) -> Vec<ResultGroup> {
        bases.iter().map(|base| self.run_one(base, pool)).collect()
    }

    /// Same as `run`, but checks `cancel` between base records and
    /// returns whatever groups finished when the flag flips. Each
    /// base's work is independent, so stopping between records leaves
    /// no partial state behind.
    pub fn run_cancellable(
        &self,
        bases: &[PropertyRecord],
        pool: &[PropertyRecord],
        cancel: &AtomicBool,
    ) -> Vec<ResultGroup> {
        let mut groups = Vec::with_capacity(bases.len());
        for base in bases {
            if cancel.load(Ordering::Relaxed) {
                break;
            }
            groups.push(self.run_one(base, pool));
        }
        groups
    }

    fn run_one(&self, base: &PropertyRecord, pool: &[PropertyRecord]) -> ResultGroup {
        if let Err(e) = base.check_base() {
            return ResultGroup {
                base: base.clone(),
                comparables: Vec::new(),
                eligible_count: 0,
                status: GroupStatus::Failed(e.to_string()),
            };
        }

        let eligible = eligible_comparables(pool, base, &self.cfg);
        let eligible_count = eligible.len();
        let comparables = select_comparables(&eligible, base, self.cfg.capacity);
        let status = if comparables.is_empty() {
            GroupStatus::NoMatch
        } else {
            GroupStatus::Matched
        };

        ResultGroup {
            base: base.clone(),
            comparables,
            eligible_count,
            status,
        }
    }
}
