//! Consumers of decoded records.

use indexmap::{IndexMap, IndexSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::{Record, RecordKind};

/// Destination for a stream of decoded records, such as a database loader or an aggregator.
///
/// See [`crate::read::StdfReader::drain_into`].
pub trait RecordSink {
    /// Handle one record, in file order.
    fn accept(&mut self, record: &Record) -> Result<()>;

    /// Called once after the last record.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl RecordSink for Vec<Record> {
    fn accept(&mut self, record: &Record) -> Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

/// Aggregate statistics over a record stream
///
/// ```
/// # fn doit() -> stdf_codec::error::Result<()>
/// # {
/// use stdf_codec::record::{PartResults, Record};
/// use stdf_codec::summary::{RecordSink, Summary};
///
/// let mut summary = Summary::default();
/// summary.accept(&Record::from(PartResults { hard_bin: 1, ..Default::default() }))?;
/// summary.accept(&Record::from(PartResults { hard_bin: 7, ..Default::default() }))?;
/// summary.finish()?;
///
/// assert_eq!(summary.parts_tested, 2);
/// assert_eq!(summary.yield_percent(), Some(50.0));
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Summary {
    /// Number of records per kind, in order of first appearance
    pub records: IndexMap<RecordKind, u64>,
    /// Number of part results seen
    pub parts_tested: u64,
    /// Parts binned to hardware bin 1
    pub parts_passed: u64,
    /// Parts binned anywhere else
    pub parts_failed: u64,
    /// Number of parametric test results
    pub parametric_tests: u64,
    /// Distinct lot IDs from master information records
    pub lot_ids: IndexSet<String>,
    /// Distinct part types from master information records
    pub part_types: IndexSet<String>,
}

impl Summary {
    /// Hardware bin number counted as a passing part
    pub const PASS_BIN: u16 = 1;

    /// Total number of decoded records
    pub fn total_records(&self) -> u64 {
        self.records.values().sum()
    }

    /// Records seen for one kind
    pub fn count(&self, kind: RecordKind) -> u64 {
        self.records.get(&kind).copied().unwrap_or(0)
    }

    /// Percentage of tested parts that passed, `None` when no parts were tested.
    pub fn yield_percent(&self) -> Option<f64> {
        if self.parts_tested == 0 {
            return None;
        }
        Some(self.parts_passed as f64 * 100.0 / self.parts_tested as f64)
    }
}

impl RecordSink for Summary {
    fn accept(&mut self, record: &Record) -> Result<()> {
        *self.records.entry(record.kind()).or_default() += 1;

        match record {
            Record::MasterInformation(mir) => {
                if !mir.lot_id.is_empty() {
                    self.lot_ids.insert(mir.lot_id.clone());
                }
                if !mir.part_type.is_empty() {
                    self.part_types.insert(mir.part_type.clone());
                }
            }
            Record::PartResults(prr) => {
                self.parts_tested += 1;
                if prr.hard_bin == Self::PASS_BIN {
                    self.parts_passed += 1;
                } else {
                    self.parts_failed += 1;
                }
            }
            Record::ParametricTest(_) => self.parametric_tests += 1,
            _ => {}
        }

        Ok(())
    }
}
