//! Error types for the cdsfix library.
//!
//! Every variant here is run-fatal. Record-level problems (codon mismatches,
//! frame errors) are reported as [`crate::diagnostics::Diagnostic`] values
//! instead.

use thiserror::Error;

use crate::range::Range;

/// Errors that abort a cdsfix run.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A FASTA file could not be read.
    #[error("{0}")]
    Fasta(String),

    /// A GFF3 data line is syntactically or semantically invalid.
    #[error("line {line}: {message}")]
    MalformedRecord { line: usize, message: String },

    /// Segments of one logical feature disagree on seqid, strand or type.
    #[error("line {line}: feature \"{id}\" {message}")]
    InconsistentSegment {
        line: usize,
        id: String,
        message: String,
    },

    /// A `Parent` value names no feature in the file.
    #[error("line {line}: Parent \"{parent}\" does not name any feature in the annotation")]
    DanglingParentReference { line: usize, parent: String },

    /// The same sequence identifier was loaded twice in exact-ID mode.
    #[error("{sources}: sequence ID \"{id}\" occurs more than once")]
    DuplicateIdentifier { id: String, sources: String },

    /// No loaded sequence carries the requested identifier.
    #[error("{sources} does not contain a sequence with ID \"{id}\"")]
    SequenceNotFound { id: String, sources: String },

    /// Several loaded sequences match the requested identifier and range.
    #[error("{sources} does contain multiple sequences with ID \"{id}\"")]
    AmbiguousSequenceIdentifier { id: String, sources: String },

    /// The identifier matches but no sequence covers the requested range.
    #[error("cannot find sequence ID \"{id}\" covering range {range} in {sources}")]
    RangeNotFound {
        id: String,
        range: Range,
        sources: String,
    },
}
