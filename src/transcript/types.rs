//! Transcript model types used while splicing and validating CDS segments.

use crate::diagnostics::{Diagnostic, WarningKind};
use crate::gff3::entry::Phase;
use crate::range::Range;
use crate::strand::Strand;

/// Which codon checks run on every spliced CDS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodonPolicy {
    pub require_start_codon: bool,
    pub require_final_stop_codon: bool,
}

impl Default for CodonPolicy {
    fn default() -> Self {
        Self {
            require_start_codon: true,
            require_final_stop_codon: true,
        }
    }
}

impl CodonPolicy {
    /// The length must be a multiple of three whenever any codon check runs.
    #[must_use]
    pub fn checks_frame(&self) -> bool {
        self.require_start_codon || self.require_final_stop_codon
    }
}

/// One CDS segment of a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CdsSegment {
    /// Index of the owning CDS feature in the graph.
    pub feature: usize,
    /// Index of the GFF3 line in the graph.
    pub line: usize,
    pub range: Range,
}

/// A transcript with its CDS segments sorted by ascending genomic start.
#[derive(Debug, Clone)]
pub struct TranscriptModel {
    pub feature: usize,
    pub label: String,
    pub seqid: String,
    pub strand: Strand,
    pub line_number: usize,
    pub(crate) segments: Vec<CdsSegment>,
}

impl TranscriptModel {
    /// Segments in genomic order.
    #[must_use]
    pub fn segments(&self) -> &[CdsSegment] {
        &self.segments
    }

    /// Segments in transcription order (5' to 3').
    pub fn transcription_order(&self) -> Box<dyn Iterator<Item = &CdsSegment> + '_> {
        if self.strand.is_reverse() {
            Box::new(self.segments.iter().rev())
        } else {
            Box::new(self.segments.iter())
        }
    }

    /// Range from the first to the last CDS base.
    #[must_use]
    pub fn cds_span(&self) -> Range {
        let first = self.segments[0].range;
        self.segments
            .iter()
            .fold(first, |acc, s| acc.join(&s.range))
    }

    /// Total number of coding bases.
    #[must_use]
    pub fn cds_length(&self) -> u64 {
        self.segments.iter().map(|s| s.range.len()).sum()
    }
}

/// Corrected phase for one CDS line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseAssignment {
    pub line: usize,
    pub phase: Phase,
}

/// Everything a validated transcript contributes to the output.
#[derive(Debug, Clone)]
pub struct TranscriptResult {
    pub feature: usize,
    /// In transcription order.
    pub phases: Vec<PhaseAssignment>,
    pub warnings: Vec<Diagnostic>,
}

impl TranscriptResult {
    /// Value of the `cds_check` attribute: `valid`, or the warning kinds found.
    #[must_use]
    pub fn status(&self) -> String {
        let kinds: Vec<&str> = self
            .warnings
            .iter()
            .map(|d| d.kind)
            .filter(|k| *k != WarningKind::PhaseConflict)
            .map(WarningKind::as_str)
            .collect();
        if kinds.is_empty() {
            "valid".to_string()
        } else {
            kinds.join(",")
        }
    }
}
