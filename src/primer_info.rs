//! Primer detection metadata (`*.primer_info.csv`) keyed by CCS read identifier.
//!
//! Each row describes one raw read:
//!
//! ```text
//! id,strand,fiveseen,polyAseen,threeseen,fiveend,polyAend,threeend,primer,chimera
//! m54006_160303_031717/4194379/0_1847,+,1,1,1,31,1788,1818,1,0
//! ```
//!
//! The FASTA reads carry the consolidated `<movie>/<hole>/ccs` name instead of the
//! sub-read range, so rows are indexed under that derived name.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use log::{debug, info};

use crate::errors::{InsertError, Result};
use crate::io::open_reader;

/// Number of comma-separated fields in a primer info row.
pub const FIELD_COUNT: usize = 10;

/// Literal marking a detected feature in the `*seen` columns.
pub const SEEN: &str = "1";

/// Literal marking an undefined coordinate.
pub const NOT_AVAILABLE: &str = "NA";

/// Orientation of the insert relative to the read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Plus,
    /// Anything other than `+`.
    Minus,
}

/// One primer info row. Field values are kept exactly as they appear in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimerInfo {
    pub id: String,
    pub strand: String,
    pub five_seen: String,
    pub polya_seen: String,
    pub three_seen: String,
    pub five_end: String,
    pub polya_end: String,
    pub three_end: String,
    pub primer: String,
    pub chimera: String,
}

impl PrimerInfo {
    /// Parses a single line; `line_number` is 1-based and only used for errors.
    pub fn parse(line: &str, line_number: usize) -> Result<Self> {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != FIELD_COUNT {
            return Err(InsertError::MalformedRecord {
                line: line_number,
                read_id: fields[0].to_string(),
                expected: FIELD_COUNT,
                found: fields.len(),
            });
        }

        Ok(PrimerInfo {
            id: fields[0].to_string(),
            strand: fields[1].to_string(),
            five_seen: fields[2].to_string(),
            polya_seen: fields[3].to_string(),
            three_seen: fields[4].to_string(),
            five_end: fields[5].to_string(),
            polya_end: fields[6].to_string(),
            three_end: fields[7].to_string(),
            primer: fields[8].to_string(),
            chimera: fields[9].to_string(),
        })
    }

    pub fn strand(&self) -> Strand {
        if self.strand == "+" {
            Strand::Plus
        } else {
            Strand::Minus
        }
    }

    /// Whether the row has what extraction needs: poly-A and 3' primer seen, 5' and 3' ends defined.
    ///
    /// `five_seen` is not consulted; rows with a 5' end but no 5' flag still qualify.
    pub fn is_usable(&self) -> bool {
        self.polya_seen == SEEN
            && self.three_seen == SEEN
            && self.five_end != NOT_AVAILABLE
            && self.three_end != NOT_AVAILABLE
    }

    /// Name of the CCS read this row belongs to.
    pub fn ccs_id(&self) -> String {
        ccs_read_id(&self.id)
    }
}

/// Derives the CCS read name from a raw read name: `run/hole/anything` → `run/hole/ccs`.
pub fn ccs_read_id(raw_id: &str) -> String {
    let prefix: Vec<&str> = raw_id.split('/').take(2).collect();
    format!("{}/ccs", prefix.join("/"))
}

/// In-memory primer info, built once and read-only afterwards.
#[derive(Debug, Default)]
pub struct PrimerInfoTable {
    records: HashMap<String, PrimerInfo>,
}

impl PrimerInfoTable {
    /// Reads every line of `reader`. Blank lines are skipped; any other line must
    /// have exactly [`FIELD_COUNT`] fields. Later rows replace earlier rows with the
    /// same derived name.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut table = PrimerInfoTable::default();
        let mut rows = 0usize;

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.strip_suffix('\r').unwrap_or(&line);
            if line.trim().is_empty() {
                debug!("Skipping blank primer info line {}", idx + 1);
                continue;
            }
            table.insert(PrimerInfo::parse(line, idx + 1)?);
            rows += 1;
        }

        info!("Read {} primer info rows for {} CCS reads", rows, table.len());
        Ok(table)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        info!("Parsing primer info at {:?}...", path);
        Self::from_reader(open_reader(path)?)
    }

    /// Indexes `record` under its CCS name, returning the row it replaced, if any.
    pub fn insert(&mut self, record: PrimerInfo) -> Option<PrimerInfo> {
        self.records.insert(record.ccs_id(), record)
    }

    pub fn get(&self, ccs_id: &str) -> Option<&PrimerInfo> {
        self.records.get(ccs_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
