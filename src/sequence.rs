//! Nucleotide helpers: complementing and reverse-complementing residues.

/// Complement of a single IUPAC nucleotide code, preserving case.
/// Unknown symbols are returned unchanged.
#[must_use]
pub fn complement(base: u8) -> u8 {
    let upper = match base.to_ascii_uppercase() {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' | b'U' => b'A',
        b'R' => b'Y',
        b'Y' => b'R',
        b'K' => b'M',
        b'M' => b'K',
        b'B' => b'V',
        b'V' => b'B',
        b'D' => b'H',
        b'H' => b'D',
        // S, W, N and gaps are self-complementary
        other => other,
    };
    if base.is_ascii_lowercase() {
        upper.to_ascii_lowercase()
    } else {
        upper
    }
}

/// Reverse-complement a nucleotide sequence in place.
pub fn reverse_complement_in_place(seq: &mut [u8]) {
    seq.reverse();
    for b in seq.iter_mut() {
        *b = complement(*b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complement_basic() {
        assert_eq!(complement(b'A'), b'T');
        assert_eq!(complement(b'c'), b'g');
        assert_eq!(complement(b'N'), b'N');
        assert_eq!(complement(b'R'), b'Y');
        assert_eq!(complement(b'-'), b'-');
    }

    fn revcomp(seq: &[u8]) -> Vec<u8> {
        let mut seq = seq.to_vec();
        reverse_complement_in_place(&mut seq);
        seq
    }

    #[test]
    fn reverse_complement_round_trip() {
        let seq = b"ATGCCGTAAn";
        let rc = revcomp(seq);
        assert_eq!(rc, b"nTTACGGCAT");
        assert_eq!(revcomp(&rc), seq.to_vec());
    }

    #[test]
    fn odd_length_middle_base() {
        assert_eq!(revcomp(b"GATTACA"), b"TGTAATC");
    }

    #[test]
    fn empty() {
        assert!(revcomp(b"").is_empty());
    }
}
