//! Two-state HMM that finds the poly-A tail at the 3' end of a read.
//!
//! The read is decoded from its last base backwards with Viterbi; the tail is the run
//! of [`State::PolyA`] states before the first [`State::NonPolyA`].
//!
//! Models can be loaded from a plain text file of whitespace-separated numbers:
//!
//! ```text
//! 2 4
//! <init PolyA> <init NonPolyA>
//! <tran PolyA->PolyA> <tran PolyA->NonPolyA> <tran NonPolyA->PolyA> <tran NonPolyA->NonPolyA>
//! <emit PolyA A C G T> <emit NonPolyA A C G T>
//! ```

use std::io::Read;
use std::path::Path;

use log::info;

use crate::errors::{InsertError, Result};
use crate::io::open_reader;

pub const N_STATES: usize = 2;
pub const N_SYMBOLS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    PolyA = 0,
    NonPolyA = 1,
}

const STATES: [State; N_STATES] = [State::PolyA, State::NonPolyA];

/// Column of a nucleotide in the emission table; `None` for anything but ACGT.
fn symbol_index(base: u8) -> Option<usize> {
    match base.to_ascii_uppercase() {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolyAHmm {
    init: [f64; N_STATES],
    tran: [[f64; N_STATES]; N_STATES],
    emit: [[f64; N_SYMBOLS]; N_STATES],
}

impl Default for PolyAHmm {
    /// Parameters trained on Iso-Seq full-length non-chimeric reads.
    fn default() -> Self {
        let polya_to_non = 3.16493e-07;
        let non_to_polya = 2.74842e-09;
        PolyAHmm {
            init: [0.99283668, 0.00716332],
            tran: [
                [1.0 - polya_to_non, polya_to_non],
                [non_to_polya, 1.0 - non_to_polya],
            ],
            emit: [
                [0.928165, 0.025917, 0.024170, 0.021748],
                [0.271806, 0.249539, 0.281787, 0.196867],
            ],
        }
    }
}

impl PolyAHmm {
    pub fn new(
        init: [f64; N_STATES],
        tran: [[f64; N_STATES]; N_STATES],
        emit: [[f64; N_SYMBOLS]; N_STATES],
    ) -> Self {
        PolyAHmm { init, tran, emit }
    }

    /// Reads a model in the text format described in the module docs.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        let mut tokens = text.split_whitespace();

        let mut next_number = |what: &str| -> Result<f64> {
            let token = tokens.next().ok_or_else(|| InsertError::InvalidModel {
                reason: format!("missing {what}"),
            })?;
            token.parse().map_err(|_| InsertError::InvalidModel {
                reason: format!("{what} '{token}' is not a number"),
            })
        };

        let states = next_number("state count")?;
        let symbols = next_number("symbol count")?;
        if states != N_STATES as f64 || symbols != N_SYMBOLS as f64 {
            return Err(InsertError::InvalidModel {
                reason: format!(
                    "expected {N_STATES} states and {N_SYMBOLS} symbols, found {states} and {symbols}"
                ),
            });
        }

        let mut hmm = PolyAHmm::new([0.0; N_STATES], [[0.0; N_STATES]; N_STATES], [[0.0; N_SYMBOLS]; N_STATES]);
        for p in hmm.init.iter_mut() {
            *p = next_number("initial probability")?;
        }
        for row in hmm.tran.iter_mut() {
            for p in row.iter_mut() {
                *p = next_number("transition probability")?;
            }
        }
        for row in hmm.emit.iter_mut() {
            for p in row.iter_mut() {
                *p = next_number("emission probability")?;
            }
        }
        Ok(hmm)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        info!("Loading poly-A HMM from {:?}", path);
        Self::from_reader(open_reader(path)?)
    }

    /// Emission log-probability; bases outside ACGT are equally likely in every state.
    fn emit_log2(&self, state: usize, base: u8) -> f64 {
        match symbol_index(base) {
            Some(sym) => self.emit[state][sym].log2(),
            None => (1.0 / N_SYMBOLS as f64).log2(),
        }
    }

    /// Most likely state path for `seq`, in the order given.
    pub fn decode(&self, seq: &[u8]) -> Vec<State> {
        let Some(&first) = seq.first() else {
            return Vec::new();
        };

        let mut prob: Vec<[f64; N_STATES]> = Vec::with_capacity(seq.len());
        let mut start = [0.0; N_STATES];
        for (i, p) in start.iter_mut().enumerate() {
            *p = self.init[i].log2() + self.emit_log2(i, first);
        }
        prob.push(start);

        for &base in &seq[1..] {
            let prev = prob[prob.len() - 1];
            let mut column = [0.0; N_STATES];
            for (i, p) in column.iter_mut().enumerate() {
                let best = (0..N_STATES)
                    .map(|k| prev[k] + self.tran[k][i].log2())
                    .fold(f64::NEG_INFINITY, f64::max);
                *p = best + self.emit_log2(i, base);
            }
            prob.push(column);
        }

        // ties go to the lower state index; an all -inf column falls back to NonPolyA
        let mut path = vec![State::NonPolyA; seq.len()];
        let last = prob.len() - 1;
        path[last] = argmax(|i| prob[last][i]);
        for j in (0..last).rev() {
            let next = path[j + 1] as usize;
            path[j] = argmax(|i| prob[j][i] + self.tran[i][next].log2());
        }
        path
    }

    /// Length of the poly-A tail at the 3' end of `seq`.
    pub fn polya_len(&self, seq: &[u8]) -> usize {
        let reversed: Vec<u8> = seq.iter().rev().copied().collect();
        self.decode(&reversed)
            .iter()
            .take_while(|&&s| s == State::PolyA)
            .count()
    }
}

fn argmax(score: impl Fn(usize) -> f64) -> State {
    let mut best = State::NonPolyA;
    let mut best_score = f64::NEG_INFINITY;
    for state in STATES {
        let s = score(state as usize);
        if s > best_score {
            best_score = s;
            best = state;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    const INSERT: &[u8] = b"ACGTGCATGCTAGCTAGCATCGATGC";

    #[test]
    fn test_polya_tail_length() {
        let hmm = PolyAHmm::default();
        let mut read = INSERT.to_vec();
        read.extend_from_slice(&[b'A'; 30]);
        assert_eq!(hmm.polya_len(&read), 30);
    }

    #[test]
    fn test_no_polya_tail() {
        let hmm = PolyAHmm::default();
        assert_eq!(hmm.polya_len(INSERT), 0);
    }

    #[test]
    fn test_lowercase_tail() {
        let hmm = PolyAHmm::default();
        let mut read = INSERT.to_vec();
        read.extend_from_slice(b"aaaaaaaaaaaaaaaaaaaa");
        assert_eq!(hmm.polya_len(&read), 20);
    }

    #[test]
    fn test_all_polya_and_empty() {
        let hmm = PolyAHmm::default();
        assert_eq!(hmm.polya_len(b"AAAAAAAAAAAA"), 12);
        assert_eq!(hmm.polya_len(b""), 0);
        assert!(hmm.decode(b"").is_empty());
    }

    #[test]
    fn test_decode_keeps_sequence_order() {
        let hmm = PolyAHmm::default();
        let mut read = vec![b'A'; 25];
        read.extend_from_slice(INSERT);
        let path = hmm.decode(&read);
        assert_eq!(path.len(), read.len());
        // the insert starts with an A, which joins the run
        assert!(path[..26].iter().all(|&s| s == State::PolyA));
        assert_eq!(path[26], State::NonPolyA);
    }

    #[test]
    fn test_model_from_reader() {
        let text = "2 4\n0.5 0.5\n0.9 0.1 0.1 0.9\n0.7 0.1 0.1 0.1 0.25 0.25 0.25 0.25\n";
        let hmm = PolyAHmm::from_reader(text.as_bytes()).unwrap();
        assert_eq!(
            hmm,
            PolyAHmm::new(
                [0.5, 0.5],
                [[0.9, 0.1], [0.1, 0.9]],
                [[0.7, 0.1, 0.1, 0.1], [0.25, 0.25, 0.25, 0.25]],
            )
        );
    }

    #[test]
    fn test_model_from_reader_rejects_bad_input() {
        assert!(matches!(
            PolyAHmm::from_reader("3 4 0.5".as_bytes()),
            Err(InsertError::InvalidModel { .. })
        ));
        assert!(matches!(
            PolyAHmm::from_reader("2 4 0.5 0.5 0.9".as_bytes()),
            Err(InsertError::InvalidModel { .. })
        ));
        assert!(matches!(
            PolyAHmm::from_reader("2 4 0.5 x".as_bytes()),
            Err(InsertError::InvalidModel { .. })
        ));
    }
}
