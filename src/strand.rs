//! Strand orientation for annotated features.

use std::fmt;

/// Strand orientation of a GFF3 feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    Forward,
    Reverse,
    /// `.` (unstranded) or `?` (strand unknown).
    Unknown,
}

impl Strand {
    /// Parse GFF3 column 7. Returns `None` for anything outside `+ - . ?`.
    #[must_use]
    pub fn from_gff3(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Self::Forward),
            "-" => Some(Self::Reverse),
            "." | "?" => Some(Self::Unknown),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_reverse(self) -> bool {
        self == Self::Reverse
    }

    #[must_use]
    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => write!(f, "+"),
            Self::Reverse => write!(f, "-"),
            Self::Unknown => write!(f, "."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_gff3() {
        assert_eq!(Strand::from_gff3("+"), Some(Strand::Forward));
        assert_eq!(Strand::from_gff3("-"), Some(Strand::Reverse));
        assert_eq!(Strand::from_gff3("."), Some(Strand::Unknown));
        assert_eq!(Strand::from_gff3("?"), Some(Strand::Unknown));
        assert_eq!(Strand::from_gff3("x"), None);
        assert_eq!(Strand::from_gff3(""), None);
    }

    #[test]
    fn predicates() {
        assert!(!Strand::Forward.is_reverse());
        assert!(Strand::Reverse.is_reverse());
        assert!(Strand::Forward.is_known());
        assert!(!Strand::Unknown.is_known());
    }
}
