use bio::io::fasta::Record;
use pacb_insert::SequenceRecord;

fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    let record = Record::with_attrs("m1/1/ccs", None, seq);
    SequenceRecord::seq(&SequenceRecord::reverse_complement(&record)).to_vec()
}

#[test]
fn test_reverse_complement_basic() {
    assert_eq!(reverse_complement(b"ATGC"), b"GCAT");
}

#[test]
fn test_reverse_complement_lowercase() {
    // case is preserved
    assert_eq!(reverse_complement(b"atgc"), b"gcat");
}

#[test]
fn test_reverse_complement_mixed_case() {
    assert_eq!(reverse_complement(b"AtGc"), b"gCaT");
}

#[test]
fn test_reverse_complement_with_n() {
    // N stays N
    assert_eq!(reverse_complement(b"ATGCN"), b"NGCAT");
}

#[test]
fn test_reverse_complement_empty() {
    assert_eq!(reverse_complement(b""), b"");
}

#[test]
fn test_reverse_complement_poly_a_tail() {
    // a poly-A tail becomes a leading poly-T
    assert_eq!(reverse_complement(b"GGGCCCAAAAAA"), b"TTTTTTGGGCCC");
}

#[test]
fn test_reverse_complement_palindrome() {
    // EcoRI site
    assert_eq!(reverse_complement(b"GAATTC"), b"GAATTC");
}

#[test]
fn test_reverse_complement_keeps_identifier() {
    let record = Record::with_attrs("m54006/4194379/ccs", Some("strand=-"), b"ACGT");
    let rc = SequenceRecord::reverse_complement(&record);
    assert_eq!(SequenceRecord::id(&rc), "m54006/4194379/ccs");
    assert_eq!(rc.desc(), Some("strand=-"));
}
