//! Codon policy checks and phase reconstruction for a spliced CDS.

use crate::codon::Codon;
use crate::diagnostics::{Diagnostic, WarningKind};
use crate::gff3::entry::Phase;

use super::types::{CodonPolicy, PhaseAssignment, TranscriptModel};

/// Check start codon, final stop codon and frame according to `policy`.
#[must_use]
pub fn check_codons(model: &TranscriptModel, cds: &[u8], policy: CodonPolicy) -> Vec<Diagnostic> {
    let warn = |kind: WarningKind, message: String| Diagnostic {
        kind,
        transcript: model.label.clone(),
        seqid: model.seqid.clone(),
        line: model.line_number,
        message,
    };
    let mut warnings = Vec::new();

    if policy.require_start_codon {
        match Codon::first(cds) {
            Some(codon) if codon.is_start() => {}
            Some(codon) => warnings.push(warn(
                WarningKind::InvalidStartCodon,
                format!("first codon \"{codon}\" is not a start codon"),
            )),
            None => warnings.push(warn(
                WarningKind::InvalidStartCodon,
                format!("CDS of length {} has no start codon", cds.len()),
            )),
        }
    }

    if policy.require_final_stop_codon {
        match Codon::last(cds) {
            Some(codon) if codon.is_stop() => {}
            Some(codon) => warnings.push(warn(
                WarningKind::InvalidStopCodon,
                format!("last codon \"{codon}\" is not a stop codon"),
            )),
            None => warnings.push(warn(
                WarningKind::InvalidStopCodon,
                format!("CDS of length {} has no stop codon", cds.len()),
            )),
        }
    }

    if policy.checks_frame() && cds.len() % 3 != 0 {
        warnings.push(warn(
            WarningKind::FrameError,
            format!(
                "spliced CDS length {} is not a multiple of three",
                cds.len()
            ),
        ));
    }

    warnings
}

/// Phase of every segment from the coding bases preceding it in
/// transcription order.
#[must_use]
pub fn compute_phases(model: &TranscriptModel) -> Vec<PhaseAssignment> {
    let mut offset = 0u64;
    model
        .transcription_order()
        .map(|segment| {
            let assignment = PhaseAssignment {
                line: segment.line,
                phase: Phase::from_offset(offset),
            };
            offset += segment.range.len();
            assignment
        })
        .collect()
}
