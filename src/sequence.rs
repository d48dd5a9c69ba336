//! The sequence-record capability the extraction and filtering code is written against,
//! and its FASTA implementation on top of `bio`.

use std::io::BufRead;
use std::ops::Range;

use bio::alphabets::dna;
use bio::io::fasta;

use crate::errors::Result;

/// A named nucleotide sequence.
///
/// Extraction and filtering only ever need these operations, so any parser can feed
/// them by implementing this trait.
pub trait SequenceRecord: Sized {
    /// Identifier of the read (first word of the FASTA header).
    fn id(&self) -> &str;

    /// Raw sequence bytes.
    fn seq(&self) -> &[u8];

    /// Rest of the FASTA header after the identifier, if any.
    fn desc(&self) -> Option<&str> {
        None
    }

    fn len(&self) -> usize {
        self.seq().len()
    }

    /// Bytes in the 0-based half-open `range`, or `None` if it does not fit the sequence.
    fn substring(&self, range: Range<usize>) -> Option<&[u8]> {
        self.seq().get(range)
    }

    /// A new record holding the reverse complement, identifier preserved.
    fn reverse_complement(&self) -> Self;
}

impl SequenceRecord for fasta::Record {
    fn id(&self) -> &str {
        fasta::Record::id(self)
    }

    fn seq(&self) -> &[u8] {
        fasta::Record::seq(self)
    }

    fn desc(&self) -> Option<&str> {
        fasta::Record::desc(self)
    }

    fn reverse_complement(&self) -> Self {
        let rc = dna::revcomp(fasta::Record::seq(self));
        fasta::Record::with_attrs(fasta::Record::id(self), fasta::Record::desc(self), &rc)
    }
}

/// Streaming FASTA source yielding one record per header.
pub struct FastaSource<B: BufRead> {
    records: fasta::Records<B>,
}

impl<B: BufRead> FastaSource<B> {
    pub fn new(reader: B) -> Self {
        FastaSource {
            records: fasta::Reader::from_bufread(reader).records(),
        }
    }
}

impl<B: BufRead> Iterator for FastaSource<B> {
    type Item = Result<fasta::Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.records.next().map(|r| r.map_err(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, seq: &[u8]) -> fasta::Record {
        fasta::Record::with_attrs(id, None, seq)
    }

    #[test]
    fn test_substring_in_and_out_of_bounds() {
        let rec = record("r1", b"ACGTACGT");
        assert_eq!(rec.substring(2..5), Some(&b"GTA"[..]));
        assert_eq!(rec.substring(0..8), Some(&b"ACGTACGT"[..]));
        assert_eq!(rec.substring(4..9), None);
    }

    #[test]
    fn test_reverse_complement_keeps_id() {
        let rec = record("m1/7/ccs", b"AACGTT");
        let rc = SequenceRecord::reverse_complement(&rec);
        assert_eq!(SequenceRecord::id(&rc), "m1/7/ccs");
        assert_eq!(SequenceRecord::seq(&rc), b"AACGTT");

        let rc = SequenceRecord::reverse_complement(&record("x", b"AAAGC"));
        assert_eq!(SequenceRecord::seq(&rc), b"GCTTT");
    }

    #[test]
    fn test_fasta_source_multiline() {
        let data = b">m1/1/ccs some description\nACGT\nTTGG\n>m1/2/ccs\nCC\n";
        let records: Vec<_> = FastaSource::new(&data[..]).collect::<Result<_>>().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(SequenceRecord::id(&records[0]), "m1/1/ccs");
        assert_eq!(SequenceRecord::seq(&records[0]), b"ACGTTTGG");
        assert_eq!(SequenceRecord::len(&records[1]), 2);
    }
}
