//! FASTA-in, FASTA-out drivers for the tools.

use std::io::{BufRead, Write};

use bio::io::fasta;
use log::info;

use crate::composition::{CompositionFilter, FilterSummary};
use crate::errors::Result;
use crate::extract::{ExtractionStats, InsertExtractor};
use crate::primer_info::PrimerInfoTable;
use crate::sequence::{FastaSource, SequenceRecord};
use crate::trim::{PolyATrimmer, TrimStats};

const RED: &[u8] = b"\x1b[31m";
const RESET: &[u8] = b"\x1b[0m";

/// Writes the insert of every read in `input` that has usable primer info in `table`.
///
/// Stops at the first error; records already written stay written.
pub fn extract_inserts<B: BufRead, W: Write>(
    table: &PrimerInfoTable,
    input: B,
    output: W,
) -> Result<ExtractionStats> {
    let mut writer = fasta::Writer::new(output);
    let extractor = InsertExtractor::new(table);
    let mut extractions = extractor.extract_all(FastaSource::new(input));

    for insert in extractions.by_ref() {
        let insert = insert?;
        writer.write(&insert.id, None, &insert.seq)?;
    }
    writer.flush()?;

    let stats = extractions.stats();
    info!(
        "Extracted {} of {} reads ({} without primer info, {} unusable)",
        stats.extracted, stats.examined, stats.missing_primer_info, stats.unusable
    );
    Ok(stats)
}

/// Writes every read in `input` that passes `filter`.
pub fn filter_reads<B: BufRead, W: Write>(
    filter: &CompositionFilter,
    input: B,
    output: W,
) -> Result<FilterSummary> {
    let mut writer = fasta::Writer::new(output);
    let mut filtered = filter.filter_all(FastaSource::new(input));

    for record in filtered.by_ref() {
        let record = record?;
        writer.write(SequenceRecord::id(&record), None, SequenceRecord::seq(&record))?;
    }
    writer.flush()?;

    let summary = filtered.summary();
    info!("{} of {} reads passed the composition filter", summary.passed, summary.examined);
    Ok(summary)
}

/// Writes every read in `input` with its poly-A tail removed, and one
/// `<header>\t<tail length>` line per read to `lengths`.
///
/// Reads that are all tail are only logged. With `color`, every read is written whole with
/// the tail highlighted in red.
pub fn trim_polya<B: BufRead, W: Write, L: Write>(
    trimmer: &PolyATrimmer,
    input: B,
    mut output: W,
    mut lengths: L,
    color: bool,
) -> Result<TrimStats> {
    let mut stats = TrimStats::default();

    for record in FastaSource::new(input) {
        let record = record?;
        let trimmed = trimmer.trim(&record)?;
        stats.examined += 1;
        stats.polya_bases += trimmed.polya_len;
        if trimmed.polya_len > 0 {
            stats.with_polya += 1;
        }

        let header = trimmed.header();
        if color {
            writeln!(output, ">{header}")?;
            output.write_all(trimmed.insert())?;
            output.write_all(RED)?;
            output.write_all(trimmed.tail())?;
            output.write_all(RESET)?;
            output.write_all(b"\n")?;
            stats.written += 1;
        } else if trimmed.has_insert() {
            writeln!(output, ">{header}")?;
            output.write_all(trimmed.insert())?;
            output.write_all(b"\n")?;
            stats.written += 1;
        }
        writeln!(lengths, "{header}\t{}", trimmed.polya_len)?;
    }
    output.flush()?;
    lengths.flush()?;

    info!(
        "Trimmed {} poly-A bases from {} of {} reads, {} written",
        stats.polya_bases, stats.with_polya, stats.examined, stats.written
    );
    Ok(stats)
}
