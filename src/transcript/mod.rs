//! Per-transcript CDS assembly and validation.
//!
//! Each transcript moves through collected → ordered → spliced → validated and
//! is then emitted by the pipeline. Resolution and structural failures reject
//! it with a run-fatal [`Error`]; codon and frame problems only add warnings.

pub mod construction;
pub mod types;
pub mod validation;

use crate::error::Error;
use crate::gff3::entry::FeatureGraph;
use crate::reference::ReferenceStore;

use types::{CodonPolicy, TranscriptResult};

/// Splice and validate one transcript.
///
/// Pure in its inputs, so transcripts can be evaluated in parallel.
pub fn process_transcript(
    graph: &FeatureGraph,
    store: &ReferenceStore,
    transcript: usize,
    policy: CodonPolicy,
) -> Result<TranscriptResult, Error> {
    let model = construction::collect(graph, transcript)?;
    let cds = construction::splice(&model, store)?;
    let warnings = validation::check_codons(&model, &cds, policy);
    let phases = validation::compute_phases(&model);

    Ok(TranscriptResult {
        feature: transcript,
        phases,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::WarningKind;
    use crate::fasta::FastaRecord;
    use crate::gff3::entry::Phase;
    use crate::gff3::parse_gff3;
    use crate::reference::ResolutionMode;
    use std::io::Cursor;

    #[test]
    fn reverse_strand_transcript() {
        // CDS on the reverse strand: revcomp(TTA CGG ... CAT) = ATG CCG TAA
        let store = ReferenceStore::from_collections(
            [(
                "ref.fas".to_string(),
                vec![FastaRecord {
                    id: "chr1".to_string(),
                    description: "chr1".to_string(),
                    sequence: b"TTACGGNNNCATNNNN".to_vec(),
                }],
            )],
            &ResolutionMode::ExactId,
        )
        .unwrap();
        let graph = parse_gff3(Cursor::new(
            "chr1\t.\tmRNA\t1\t16\t.\t-\t.\tID=m1\n\
             chr1\t.\tCDS\t1\t6\t.\t-\t0\tID=c1;Parent=m1\n\
             chr1\t.\tCDS\t10\t12\t.\t-\t0\tID=c1;Parent=m1\n"
                .as_bytes(),
        ))
        .unwrap();

        let result = process_transcript(&graph, &store, 0, CodonPolicy::default()).unwrap();
        assert!(result.warnings.is_empty());
        assert_eq!(result.status(), "valid");
        // transcription starts at the higher-coordinate segment (line index 2)
        assert_eq!(result.phases[0].line, 2);
        assert_eq!(result.phases[0].phase, Phase::Zero);
        assert_eq!(result.phases[1].line, 1);
        assert_eq!(result.phases[1].phase, Phase::Zero);
    }

    #[test]
    fn status_lists_warning_kinds() {
        let store = ReferenceStore::from_collections(
            [(
                "ref.fas".to_string(),
                vec![FastaRecord {
                    id: "chr1".to_string(),
                    description: "chr1".to_string(),
                    sequence: b"GTGAAACCCC".to_vec(),
                }],
            )],
            &ResolutionMode::ExactId,
        )
        .unwrap();
        let graph = parse_gff3(Cursor::new(
            "chr1\t.\tmRNA\t1\t10\t.\t+\t.\tID=m1\n\
             chr1\t.\tCDS\t1\t10\t.\t+\t0\tParent=m1\n"
                .as_bytes(),
        ))
        .unwrap();

        let result = process_transcript(&graph, &store, 0, CodonPolicy::default()).unwrap();
        assert_eq!(result.warnings.len(), 3);
        assert_eq!(result.warnings[2].kind, WarningKind::FrameError);
        assert_eq!(
            result.status(),
            "invalid_start_codon,invalid_stop_codon,frame_error"
        );
    }
}
