//! Error types for reads-of-insert processing.

use thiserror::Error;

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, InsertError>;

/// Error type for library operations
#[derive(Error, Debug)]
pub enum InsertError {
    /// A primer info line did not split into the expected number of fields
    #[error("Malformed primer info record '{read_id}' at line {line}: expected {expected} comma-separated fields, found {found}")]
    MalformedRecord {
        /// 1-based line number in the primer info source
        line: usize,
        /// First field of the offending line
        read_id: String,
        /// Number of fields expected
        expected: usize,
        /// Number of fields found
        found: usize,
    },

    /// A coordinate needed for extraction is not an integer
    #[error("Invalid {field} '{value}' for read '{read_id}'")]
    InvalidCoordinate {
        /// Identifier of the read being extracted
        read_id: String,
        /// Name of the primer info field
        field: &'static str,
        /// Raw field value
        value: String,
    },

    /// The computed slice falls outside the read
    #[error("Extraction range {start}..{end} is out of bounds for read '{read_id}' of length {len}")]
    ExtractionRange {
        /// Identifier of the read being extracted
        read_id: String,
        /// 0-based start derived from fiveend
        start: i64,
        /// Exclusive end derived from polyAend or threeend
        end: i64,
        /// Length of the sequence the slice was applied to
        len: usize,
    },

    /// Composition ratio requested for a zero-length read
    #[error("Read '{read_id}' has an empty sequence")]
    EmptySequence {
        /// Identifier of the empty read
        read_id: String,
    },

    /// Invalid parameter value provided
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// A poly-A HMM model file could not be parsed
    #[error("Invalid poly-A HMM model: {reason}")]
    InvalidModel {
        /// What was wrong with the model
        reason: String,
    },

    /// A header that should follow the Iso-Seq flnc layout does not
    #[error("Invalid flnc header '{header}': {reason}")]
    InvalidFlncHeader {
        /// The full FASTA header
        header: String,
        /// Explanation of the problem
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_record_message() {
        let error = InsertError::MalformedRecord {
            line: 3,
            read_id: "m1/42/0_100".to_string(),
            expected: 10,
            found: 4,
        };
        let msg = format!("{error}");
        assert!(msg.contains("'m1/42/0_100'"));
        assert!(msg.contains("line 3"));
        assert!(msg.contains("found 4"));
    }

    #[test]
    fn test_extraction_range_message() {
        let error = InsertError::ExtractionRange {
            read_id: "m1/42/ccs".to_string(),
            start: 5,
            end: 30,
            len: 17,
        };
        let msg = format!("{error}");
        assert!(msg.contains("5..30"));
        assert!(msg.contains("'m1/42/ccs'"));
        assert!(msg.contains("length 17"));
    }

    #[test]
    fn test_io_error_is_transparent() {
        let error: InsertError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(format!("{error}"), "gone");
    }
}
