//! Insert + poly-A extraction from CCS reads using primer info coordinates.

use log::debug;

use crate::errors::{InsertError, Result};
use crate::primer_info::{PrimerInfoTable, Strand};
use crate::sequence::SequenceRecord;

/// Bases kept past the poly-A end (plus strand) or 3' end (minus strand).
///
/// Compatibility constant: the upstream pipeline produces reads trimmed this way and
/// the origin of the 4 is not documented. Do not derive or adjust it.
pub const END_OFFSET: i64 = 4;

/// An extracted subsequence tagged with the read it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedInsert {
    pub id: String,
    pub seq: Vec<u8>,
}

/// What happened to a single read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Extracted(ExtractedInsert),
    /// No primer info row for this read name.
    MissingPrimerInfo,
    /// A row exists but fails [`crate::primer_info::PrimerInfo::is_usable`].
    Unusable,
}

/// Per-outcome counters for one extraction pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionStats {
    pub examined: usize,
    pub extracted: usize,
    pub missing_primer_info: usize,
    pub unusable: usize,
}

/// Joins reads to their primer info and slices out the insert.
pub struct InsertExtractor<'a> {
    table: &'a PrimerInfoTable,
}

impl<'a> InsertExtractor<'a> {
    pub fn new(table: &'a PrimerInfoTable) -> Self {
        InsertExtractor { table }
    }

    /// Processes one full, unmodified read.
    pub fn extract<R: SequenceRecord>(&self, record: &R) -> Result<Extraction> {
        let Some(info) = self.table.get(record.id()) else {
            return Ok(Extraction::MissingPrimerInfo);
        };
        if !info.is_usable() {
            return Ok(Extraction::Unusable);
        }

        let start = coordinate(record.id(), "fiveend", &info.five_end, -1)?;
        let seq = match info.strand() {
            Strand::Plus => {
                let end = coordinate(record.id(), "polyAend", &info.polya_end, END_OFFSET)?;
                slice(record, start, end)?
            }
            // coordinates are applied to the reverse complement; the end comes from
            // threeend rather than polyAend
            Strand::Minus => {
                let end = coordinate(record.id(), "threeend", &info.three_end, END_OFFSET)?;
                slice(&record.reverse_complement(), start, end)?
            }
        };

        Ok(Extraction::Extracted(ExtractedInsert {
            id: record.id().to_string(),
            seq,
        }))
    }

    /// Lazily extracts every read of `records`, skipping reads without usable primer info.
    pub fn extract_all<R, I>(&self, records: I) -> Extractions<'a, I::IntoIter>
    where
        R: SequenceRecord,
        I: IntoIterator<Item = Result<R>>,
    {
        Extractions {
            extractor: InsertExtractor { table: self.table },
            records: records.into_iter(),
            stats: ExtractionStats::default(),
        }
    }
}

/// Parses a 1-based coordinate field and shifts it by `delta`.
///
/// Surrounding whitespace is ignored for the numeric conversion only.
fn coordinate(read_id: &str, field: &'static str, value: &str, delta: i64) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|v| v.checked_add(delta))
        .ok_or_else(|| InsertError::InvalidCoordinate {
            read_id: read_id.to_string(),
            field,
            value: value.to_string(),
        })
}

fn slice<R: SequenceRecord>(record: &R, start: i64, end: i64) -> Result<Vec<u8>> {
    let out_of_bounds = || InsertError::ExtractionRange {
        read_id: record.id().to_string(),
        start,
        end,
        len: record.len(),
    };
    if start < 0 || end < start {
        return Err(out_of_bounds());
    }
    record
        .substring(start as usize..end as usize)
        .map(<[u8]>::to_vec)
        .ok_or_else(out_of_bounds)
}

/// Iterator returned by [`InsertExtractor::extract_all`].
pub struct Extractions<'a, I> {
    extractor: InsertExtractor<'a>,
    records: I,
    stats: ExtractionStats,
}

impl<I> Extractions<'_, I> {
    pub fn stats(&self) -> ExtractionStats {
        self.stats
    }
}

impl<R, I> Iterator for Extractions<'_, I>
where
    R: SequenceRecord,
    I: Iterator<Item = Result<R>>,
{
    type Item = Result<ExtractedInsert>;

    fn next(&mut self) -> Option<Self::Item> {
        for record in self.records.by_ref() {
            let record = match record {
                Ok(record) => record,
                Err(e) => return Some(Err(e)),
            };
            self.stats.examined += 1;

            match self.extractor.extract(&record) {
                Ok(Extraction::Extracted(insert)) => {
                    self.stats.extracted += 1;
                    return Some(Ok(insert));
                }
                Ok(Extraction::MissingPrimerInfo) => {
                    debug!("No primer info for {}", record.id());
                    self.stats.missing_primer_info += 1;
                }
                Ok(Extraction::Unusable) => {
                    debug!("Primer info for {} is not usable", record.id());
                    self.stats.unusable += 1;
                }
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}
