//! Transcript construction: CDS collection, ordering and splicing.

use crate::error::Error;
use crate::gff3::entry::FeatureGraph;
use crate::reference::ReferenceStore;
use crate::sequence;
use crate::strand::Strand;

use super::types::{CdsSegment, TranscriptModel};

/// Gather the CDS segments of a transcript and sort them by genomic start.
///
/// All CDS children must lie on the transcript's sequence region, and all
/// known strands among the transcript and its CDS must agree. A transcript
/// without a known strand takes the strand of its CDS.
pub fn collect(graph: &FeatureGraph, transcript: usize) -> Result<TranscriptModel, Error> {
    let parent = graph.feature(transcript);
    let mut strand = parent.strand;
    let mut segments = Vec::new();

    for &child in &parent.children {
        let cds = graph.feature(child);
        if !cds.is_cds() {
            continue;
        }
        if cds.seqid != parent.seqid {
            return Err(Error::InconsistentSegment {
                line: cds.line_number,
                id: parent.label(),
                message: format!(
                    "has CDS \"{}\" on sequence region '{}' instead of '{}'",
                    cds.label(),
                    cds.seqid,
                    parent.seqid
                ),
            });
        }
        if cds.strand.is_known() {
            if strand.is_known() && cds.strand != strand {
                return Err(Error::InconsistentSegment {
                    line: cds.line_number,
                    id: parent.label(),
                    message: format!(
                        "has CDS \"{}\" on strand '{}' instead of '{strand}'",
                        cds.label(),
                        cds.strand
                    ),
                });
            }
            strand = cds.strand;
        }
        segments.extend(cds.segments.iter().map(|s| CdsSegment {
            feature: child,
            line: s.line,
            range: s.range,
        }));
    }

    segments.sort_by_key(|s| (s.range.start, s.range.end));

    Ok(TranscriptModel {
        feature: transcript,
        label: parent.label(),
        seqid: parent.seqid.clone(),
        strand,
        line_number: parent.line_number,
        segments,
    })
}

/// Concatenate the reference residues of all segments in transcription order.
///
/// The sequence is resolved once for the whole CDS span; reverse-strand
/// transcripts are reverse-complemented as a whole. Every segment must be
/// covered by actual residues before anything is allocated, since a declared
/// description range may be longer than the stored sequence.
pub fn splice(model: &TranscriptModel, store: &ReferenceStore) -> Result<Vec<u8>, Error> {
    let reference = store.resolve(&model.seqid, Some(model.cds_span()))?;

    let pieces = model
        .segments()
        .iter()
        .map(|segment| reference.extract(segment.range))
        .collect::<Result<Vec<_>, _>>()?;
    let mut cds = Vec::with_capacity(pieces.iter().map(|p| p.len()).sum());
    for piece in pieces {
        cds.extend_from_slice(piece);
    }
    if model.strand == Strand::Reverse {
        sequence::reverse_complement_in_place(&mut cds);
    }
    Ok(cds)
}
