//! Whole-annotation correction: evaluates every transcript in parallel and
//! merges the results in input order into line edits and a warning report.

use std::collections::HashMap;
use std::io::Write;

use rayon::prelude::*;

use crate::diagnostics::{Diagnostic, Report, WarningKind};
use crate::error::Error;
use crate::gff3::entry::{FeatureGraph, Phase};
use crate::gff3::writer::{LineEdit, write_gff3};
use crate::reference::ReferenceStore;
use crate::transcript::process_transcript;
use crate::transcript::types::{CodonPolicy, TranscriptResult};

/// Attribute added to CDS lines when annotating.
pub const CDS_CHECK_ATTRIBUTE: &str = "cds_check";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub policy: CodonPolicy,
    /// Add a `cds_check` attribute to every CDS line.
    pub annotate: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub transcripts: usize,
    /// Transcripts with exons but no CDS, passed through unchecked.
    pub without_cds: usize,
    pub cds_lines: usize,
    pub phases_changed: usize,
    pub warnings: usize,
}

/// Line edits and warnings for one annotation.
#[derive(Debug, Default)]
pub struct Corrections {
    pub edits: HashMap<usize, LineEdit>,
    pub report: Report,
    pub stats: RunStats,
}

impl Corrections {
    /// Write the corrected annotation.
    pub fn write<W: Write>(&self, graph: &FeatureGraph, out: W) -> Result<(), Error> {
        write_gff3(graph, &self.edits, out)
    }
}

/// Evaluate all transcripts of `graph` against `store`.
///
/// Transcripts run in parallel on the current rayon pool. The first fatal
/// error in transcript input order is returned.
pub fn evaluate(
    graph: &FeatureGraph,
    store: &ReferenceStore,
    options: Options,
) -> Result<Corrections, Error> {
    let transcripts: Vec<usize> = graph.transcripts().collect();
    let results: Vec<Result<TranscriptResult, Error>> = transcripts
        .par_iter()
        .map(|&transcript| process_transcript(graph, store, transcript, options.policy))
        .collect();

    let mut merger = Merger::new(graph, options.annotate);
    for result in results {
        merger.add(result?);
    }
    merger.corrections.stats.without_cds = graph.transcripts_without_cds().count();
    Ok(merger.finish())
}

struct Merger<'a> {
    graph: &'a FeatureGraph,
    annotate: bool,
    /// Phase decided per CDS line, by the first transcript that reached it.
    decided: HashMap<usize, Phase>,
    corrections: Corrections,
}

impl<'a> Merger<'a> {
    fn new(graph: &'a FeatureGraph, annotate: bool) -> Self {
        Self {
            graph,
            annotate,
            decided: HashMap::new(),
            corrections: Corrections::default(),
        }
    }

    fn add(&mut self, result: TranscriptResult) {
        self.corrections.stats.transcripts += 1;
        let status = result.status();

        for assignment in &result.phases {
            match self.decided.get(&assignment.line).copied() {
                Some(kept) if kept != assignment.phase => {
                    let diagnostic =
                        self.phase_conflict(result.feature, assignment.line, kept, assignment.phase);
                    self.corrections.report.push(diagnostic);
                }
                Some(_) => {}
                None => {
                    self.decided.insert(assignment.line, assignment.phase);
                    self.corrections.stats.cds_lines += 1;
                    self.record_edit(assignment.line, assignment.phase, &status);
                }
            }
        }

        self.corrections.report.extend(result.warnings);
    }

    fn record_edit(&mut self, line: usize, phase: Phase, status: &str) {
        let current = self.graph.record(line).map(|r| r.phase);
        let mut edit = LineEdit::default();
        if current != Some(phase) {
            edit.phase = Some(phase);
            self.corrections.stats.phases_changed += 1;
        }
        if self.annotate {
            edit.attribute = Some((CDS_CHECK_ATTRIBUTE.to_string(), status.to_string()));
        }
        if edit != LineEdit::default() {
            self.corrections.edits.insert(line, edit);
        }
    }

    fn phase_conflict(&self, transcript: usize, line: usize, kept: Phase, proposed: Phase) -> Diagnostic {
        let feature = self.graph.feature(transcript);
        let line_number = self.graph.record(line).map_or(0, |r| r.line_number);
        Diagnostic {
            kind: WarningKind::PhaseConflict,
            transcript: feature.label(),
            seqid: feature.seqid.clone(),
            line: feature.line_number,
            message: format!(
                "CDS in line {line_number} needs phase {proposed}, keeping phase {kept} from an earlier transcript"
            ),
        }
    }

    fn finish(mut self) -> Corrections {
        self.corrections.stats.warnings = self.corrections.report.warnings().len();
        self.corrections
    }
}
