//! Two-pass feature graph construction.
//!
//! Pass one ([`GraphBuilder::add`]) stores every line and merges records that
//! share an `ID` into one multi-segment feature. Pass two
//! ([`GraphBuilder::build`]) resolves `Parent` values, which may point forward
//! or backward in the file.

use std::collections::HashMap;

use crate::error::Error;

use super::entry::{Feature, FeatureGraph, Gff3Line, Gff3Record, LineEnding, LineKind, Segment};

/// Builds a [`FeatureGraph`] from parsed lines.
#[derive(Default)]
pub struct GraphBuilder {
    lines: Vec<Gff3Line>,
    features: Vec<Feature>,
    id_index: HashMap<String, usize>,
    /// Unresolved `Parent` values per feature, with the line that named them.
    parent_ids: Vec<Vec<(String, usize)>>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one parsed line.
    pub fn add(&mut self, raw: String, ending: LineEnding, kind: LineKind) -> Result<(), Error> {
        let line_index = self.lines.len();
        if let LineKind::Record(record) = &kind {
            self.add_record(record, line_index)?;
        }
        self.lines.push(Gff3Line { raw, ending, kind });
        Ok(())
    }

    fn add_record(&mut self, record: &Gff3Record, line_index: usize) -> Result<(), Error> {
        let segment = Segment {
            line: line_index,
            range: record.range,
        };

        let existing = record
            .attributes
            .id()
            .and_then(|id| self.id_index.get(id).copied());

        let feature_index = match existing {
            Some(index) => {
                let feature = &mut self.features[index];
                check_consistent(feature, record)?;
                feature.segments.push(segment);
                index
            }
            None => {
                let index = self.features.len();
                let id = record.attributes.id().map(str::to_string);
                if let Some(id) = &id {
                    self.id_index.insert(id.clone(), index);
                }
                self.features.push(Feature {
                    id,
                    seqid: record.seqid.clone(),
                    feature_type: record.feature_type.clone(),
                    strand: record.strand,
                    segments: vec![segment],
                    parents: Vec::new(),
                    children: Vec::new(),
                    line_number: record.line_number,
                });
                self.parent_ids.push(Vec::new());
                index
            }
        };

        let pending = &mut self.parent_ids[feature_index];
        for parent in record.attributes.parents() {
            if !pending.iter().any(|(p, _)| p == parent) {
                pending.push((parent.clone(), record.line_number));
            }
        }
        Ok(())
    }

    /// Resolve parent references and produce the final graph.
    pub fn build(mut self) -> Result<FeatureGraph, Error> {
        for (child, pending) in self.parent_ids.iter().enumerate() {
            for (parent_id, line) in pending {
                let &parent = self.id_index.get(parent_id).ok_or_else(|| {
                    Error::DanglingParentReference {
                        line: *line,
                        parent: parent_id.clone(),
                    }
                })?;
                if parent == child {
                    return Err(Error::MalformedRecord {
                        line: *line,
                        message: format!("feature \"{parent_id}\" names itself as Parent"),
                    });
                }
                self.features[child].parents.push(parent);
                self.features[parent].children.push(child);
            }
        }

        Ok(FeatureGraph {
            lines: self.lines,
            features: self.features,
            id_index: self.id_index,
        })
    }
}

/// Segments of one feature must agree on seqid, strand and type.
fn check_consistent(feature: &Feature, record: &Gff3Record) -> Result<(), Error> {
    let inconsistent = |what: &str, expected: &str, found: &str| Error::InconsistentSegment {
        line: record.line_number,
        id: feature.label(),
        message: format!(
            "has segments with different {what} ('{expected}' at line {}, '{found}' here)",
            feature.line_number
        ),
    };

    if record.seqid != feature.seqid {
        return Err(inconsistent("sequence regions", &feature.seqid, &record.seqid));
    }
    if record.strand != feature.strand {
        return Err(inconsistent(
            "strands",
            &feature.strand.to_string(),
            &record.strand.to_string(),
        ));
    }
    if record.feature_type != feature.feature_type {
        return Err(inconsistent(
            "types",
            &feature.feature_type,
            &record.feature_type,
        ));
    }
    Ok(())
}
