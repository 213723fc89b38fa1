//! Codon decoding for start/stop policy checks (standard genetic code).

use std::fmt;

/// A nucleotide triplet normalised to uppercase DNA (`U` reads as `T`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codon([u8; 3]);

const START_CODON: Codon = Codon(*b"ATG");
const STOP_CODONS: [Codon; 3] = [Codon(*b"TAA"), Codon(*b"TAG"), Codon(*b"TGA")];

fn normalize_base(b: u8) -> u8 {
    match b.to_ascii_uppercase() {
        b'U' => b'T',
        other => other,
    }
}

impl Codon {
    /// Builds a codon from exactly three residues.
    #[must_use]
    pub fn from_slice(residues: &[u8]) -> Option<Self> {
        match residues {
            [a, b, c] => Some(Self([
                normalize_base(*a),
                normalize_base(*b),
                normalize_base(*c),
            ])),
            _ => None,
        }
    }

    /// First codon of a spliced CDS, if it has at least three residues.
    #[must_use]
    pub fn first(cds: &[u8]) -> Option<Self> {
        cds.get(..3).and_then(Self::from_slice)
    }

    /// Last three residues of a spliced CDS, regardless of frame.
    #[must_use]
    pub fn last(cds: &[u8]) -> Option<Self> {
        cds.len()
            .checked_sub(3)
            .and_then(|start| Self::from_slice(&cds[start..]))
    }

    #[must_use]
    pub fn is_start(&self) -> bool {
        *self == START_CODON
    }

    #[must_use]
    pub fn is_stop(&self) -> bool {
        STOP_CODONS.contains(self)
    }
}

impl fmt::Display for Codon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}
