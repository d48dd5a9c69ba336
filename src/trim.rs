//! Poly-A tail trimming of full-length reads.
//!
//! Iso-Seq `flnc` headers record read coordinates that include the tail:
//!
//! ```text
//! m160403_065056_42175_c100993391270000001823222007191686_s1_p0/9/30_1487_CCS strand=+;fiveseen=1;polyAseen=1;threeseen=1;fiveend=30;polyAend=1487;threeend=1514;primer=1;chimera=NA
//! ```
//!
//! When those headers are kept, the `<start>_<end>` range and `polyAend=` are moved in by
//! the trimmed tail length.

use crate::errors::{InsertError, Result};
use crate::polya_hmm::PolyAHmm;
use crate::sequence::SequenceRecord;

/// One read split into insert and poly-A tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimmedRead {
    pub id: String,
    pub desc: Option<String>,
    pub seq: Vec<u8>,
    pub polya_len: usize,
}

impl TrimmedRead {
    /// Full header line without the leading `>`.
    pub fn header(&self) -> String {
        match &self.desc {
            Some(desc) => format!("{} {}", self.id, desc),
            None => self.id.clone(),
        }
    }

    pub fn insert(&self) -> &[u8] {
        &self.seq[..self.seq.len() - self.polya_len]
    }

    pub fn tail(&self) -> &[u8] {
        &self.seq[self.seq.len() - self.polya_len..]
    }

    /// Whether anything is left once the tail is removed.
    pub fn has_insert(&self) -> bool {
        self.polya_len < self.seq.len()
    }
}

/// Counters for one trimming pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TrimStats {
    pub examined: usize,
    pub with_polya: usize,
    pub polya_bases: usize,
    pub written: usize,
}

pub struct PolyATrimmer {
    hmm: PolyAHmm,
    flnc_headers: bool,
}

impl PolyATrimmer {
    /// With `flnc_headers`, headers of trimmed reads are rewritten by [`adjust_flnc_header`].
    pub fn new(hmm: PolyAHmm, flnc_headers: bool) -> Self {
        PolyATrimmer { hmm, flnc_headers }
    }

    pub fn trim<R: SequenceRecord>(&self, record: &R) -> Result<TrimmedRead> {
        let polya_len = self.hmm.polya_len(record.seq());

        let (id, desc) = if self.flnc_headers && polya_len > 0 {
            adjust_flnc_header(record.id(), record.desc(), polya_len)?
        } else {
            (record.id().to_string(), record.desc().map(str::to_string))
        };

        Ok(TrimmedRead {
            id,
            desc,
            seq: record.seq().to_vec(),
            polya_len,
        })
    }
}

/// Moves the read end and `polyAend=` of an Iso-Seq flnc header in by `polya_len`.
///
/// The end moves toward the start: down when `start < end` (plus strand), up otherwise.
/// `polyAend` always goes down.
pub fn adjust_flnc_header(
    id: &str,
    desc: Option<&str>,
    polya_len: usize,
) -> Result<(String, Option<String>)> {
    let invalid = |reason: &str| InsertError::InvalidFlncHeader {
        header: match desc {
            Some(d) => format!("{id} {d}"),
            None => id.to_string(),
        },
        reason: reason.to_string(),
    };
    let shift = i64::try_from(polya_len).map_err(|_| invalid("poly-A length out of range"))?;

    let mut segments = id.splitn(3, '/');
    let (Some(movie), Some(zmw), Some(range)) = (segments.next(), segments.next(), segments.next())
    else {
        return Err(invalid("expected <movie>/<zmw>/<start>_<end>_CCS"));
    };
    let mut parts = range.splitn(3, '_');
    let (Some(start), Some(end), Some(suffix)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid("expected <start>_<end>_CCS"));
    };
    if !suffix.starts_with('C') {
        return Err(invalid("expected <start>_<end>_CCS"));
    }
    let start: i64 = start.parse().map_err(|_| invalid("start is not an integer"))?;
    let end: i64 = end.parse().map_err(|_| invalid("end is not an integer"))?;
    let end = if start < end {
        end.checked_sub(shift)
    } else {
        end.checked_add(shift)
    }
    .ok_or_else(|| invalid("end out of range"))?;
    let new_id = format!("{movie}/{zmw}/{start}_{end}_{suffix}");

    let desc = desc.ok_or_else(|| invalid("missing primer annotations"))?;
    let mut fields = Vec::new();
    let mut seen_polya_end = false;
    for field in desc.split(';') {
        match field.strip_prefix("polyAend=") {
            Some(value) => {
                let value: i64 = value.parse().map_err(|_| invalid("polyAend is not an integer"))?;
                let value = value
                    .checked_sub(shift)
                    .ok_or_else(|| invalid("polyAend out of range"))?;
                fields.push(format!("polyAend={value}"));
                seen_polya_end = true;
            }
            None => fields.push(field.to_string()),
        }
    }
    if !seen_polya_end {
        return Err(invalid("missing polyAend"));
    }

    Ok((new_id, Some(fields.join(";"))))
}
