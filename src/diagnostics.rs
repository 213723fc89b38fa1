//! Record-level diagnostics. These never stop a run; fatal problems are
//! [`crate::error::Error`] values.

use std::fmt;

use crate::cli;

/// Kind of a non-fatal finding on a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    InvalidStartCodon,
    InvalidStopCodon,
    FrameError,
    /// A CDS shared by several transcripts would get different phases.
    PhaseConflict,
}

impl WarningKind {
    /// Token used in the `cds_check` attribute.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidStartCodon => "invalid_start_codon",
            Self::InvalidStopCodon => "invalid_stop_codon",
            Self::FrameError => "frame_error",
            Self::PhaseConflict => "phase_conflict",
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A warning attached to one transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: WarningKind,
    pub transcript: String,
    pub seqid: String,
    pub line: usize,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "transcript \"{}\" on \"{}\" (line {}): {}",
            self.transcript, self.seqid, self.line, self.message
        )
    }
}

/// Warnings collected over a run, in transcript input order.
#[derive(Debug, Default)]
pub struct Report {
    warnings: Vec<Diagnostic>,
}

impl Report {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.warnings.push(diagnostic);
    }

    pub fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, diagnostics: I) {
        self.warnings.extend(diagnostics);
    }

    #[must_use]
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    #[must_use]
    pub fn count(&self, kind: WarningKind) -> usize {
        self.warnings.iter().filter(|d| d.kind == kind).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Print every warning to stderr.
    pub fn print(&self) {
        for diagnostic in &self.warnings {
            cli::warning(&diagnostic.to_string());
        }
    }
}
