//! Nucleotide composition filter, e.g. keep reads that are mostly A.

use std::fmt;

use crate::errors::{InsertError, Result};
use crate::sequence::SequenceRecord;

pub const DEFAULT_TARGET: char = 'A';
pub const DEFAULT_THRESHOLD: f64 = 0.75;

/// Keeps reads whose fraction of `target` is strictly greater than `threshold`.
#[derive(Debug, Clone, Copy)]
pub struct CompositionFilter {
    target: u8,
    threshold: f64,
}

/// Counts for one filtering pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FilterSummary {
    pub examined: usize,
    pub passed: usize,
}

/// `<examined>\t<passed>`, the line the filter reports on stderr.
impl fmt::Display for FilterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.examined, self.passed)
    }
}

impl CompositionFilter {
    /// `target` is matched case-sensitively and must be a single ASCII character.
    pub fn new(target: char, threshold: f64) -> Result<Self> {
        if !target.is_ascii() {
            return Err(InsertError::InvalidParameter {
                parameter: "target".to_string(),
                reason: format!("'{target}' is not a single ASCII nucleotide"),
            });
        }
        if threshold.is_nan() {
            return Err(InsertError::InvalidParameter {
                parameter: "threshold".to_string(),
                reason: "must be a number".to_string(),
            });
        }
        Ok(CompositionFilter { target: target as u8, threshold })
    }

    /// Fraction of the read made of the target nucleotide.
    pub fn ratio<R: SequenceRecord>(&self, record: &R) -> Result<f64> {
        if record.len() == 0 {
            return Err(InsertError::EmptySequence {
                read_id: record.id().to_string(),
            });
        }
        let count = record.seq().iter().filter(|&&b| b == self.target).count();
        Ok(count as f64 / record.len() as f64)
    }

    pub fn passes<R: SequenceRecord>(&self, record: &R) -> Result<bool> {
        Ok(self.ratio(record)? > self.threshold)
    }

    /// Lazily filters `records`; the iterator keeps a running [`FilterSummary`].
    pub fn filter_all<R, I>(&self, records: I) -> FilteredRecords<I::IntoIter>
    where
        R: SequenceRecord,
        I: IntoIterator<Item = Result<R>>,
    {
        FilteredRecords {
            filter: *self,
            records: records.into_iter(),
            summary: FilterSummary::default(),
        }
    }
}

/// Iterator returned by [`CompositionFilter::filter_all`].
pub struct FilteredRecords<I> {
    filter: CompositionFilter,
    records: I,
    summary: FilterSummary,
}

impl<I> FilteredRecords<I> {
    pub fn summary(&self) -> FilterSummary {
        self.summary
    }
}

impl<R, I> Iterator for FilteredRecords<I>
where
    R: SequenceRecord,
    I: Iterator<Item = Result<R>>,
{
    type Item = Result<R>;

    fn next(&mut self) -> Option<Self::Item> {
        for record in self.records.by_ref() {
            let record = match record {
                Ok(record) => record,
                Err(e) => return Some(Err(e)),
            };
            self.summary.examined += 1;
            match self.filter.passes(&record) {
                Ok(true) => {
                    self.summary.passed += 1;
                    return Some(Ok(record));
                }
                Ok(false) => {}
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}
