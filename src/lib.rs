//! Tools for PacBio reads-of-insert FASTA files: carve the insert + poly-A out of CCS
//! reads using Iso-Seq primer info, trim poly-A tails with an HMM, and filter reads by
//! nucleotide composition.

pub mod composition;
pub mod errors;
pub mod extract;
pub mod io;
pub mod pipeline;
pub mod polya_hmm;
pub mod primer_info;
pub mod sequence;
pub mod trim;

pub use composition::{CompositionFilter, FilterSummary};
pub use errors::{InsertError, Result};
pub use extract::{ExtractedInsert, Extraction, ExtractionStats, InsertExtractor, END_OFFSET};
pub use polya_hmm::PolyAHmm;
pub use primer_info::{ccs_read_id, PrimerInfo, PrimerInfoTable, Strand};
pub use sequence::{FastaSource, SequenceRecord};
pub use trim::{adjust_flnc_header, PolyATrimmer, TrimStats, TrimmedRead};
