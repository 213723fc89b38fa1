//! Reference sequence store: loads FASTA collections and resolves sequence
//! lookups by exact identifier or by description-declared identifier and range.
//!
//! Both modes share one lookup table keyed by identifier. Each entry holds a
//! small list of candidates (declared range, record), sorted by range start.
//! In exact-ID mode every identifier has a single candidate spanning the whole
//! sequence. Resolution is the pure function [`select`] over that list.

pub mod description;

use std::collections::HashMap;
use std::path::Path;

use crate::error::Error;
use crate::fasta::{self, FastaRecord};
use crate::input;
use crate::range::Range;

use description::{DescriptionGrammar, SequenceKey};

/// How annotation seqids are matched against loaded sequences.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResolutionMode {
    /// Match the first token of the FASTA header.
    #[default]
    ExactId,
    /// Match the identifier and range embedded in the FASTA description.
    DescriptionRange(DescriptionGrammar),
}

/// Residues of one loaded sequence and the file they came from.
#[derive(Debug)]
struct SequenceRecord {
    residues: Vec<u8>,
    /// Index into `ReferenceStore::sources`.
    source: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    range: Range,
    record: usize,
}

/// Outcome of choosing among the candidates of one identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    Unique(Candidate),
    NotFound,
    Ambiguous,
    OutOfRange,
}

/// Picks the candidate that fully contains `request`.
///
/// Without a request the identifier alone must be unique. A request covered by
/// no candidate is ambiguous when it overlaps several of them, and out of
/// range otherwise.
fn select(candidates: &[Candidate], request: Option<Range>) -> Selection {
    if candidates.is_empty() {
        return Selection::NotFound;
    }
    let Some(request) = request else {
        return match candidates {
            [only] => Selection::Unique(*only),
            _ => Selection::Ambiguous,
        };
    };

    let mut containing = candidates.iter().filter(|c| c.range.contains(&request));
    match (containing.next(), containing.next()) {
        (Some(found), None) => Selection::Unique(*found),
        (Some(_), Some(_)) => Selection::Ambiguous,
        (None, _) => {
            let overlapping = candidates
                .iter()
                .filter(|c| c.range.overlaps(&request))
                .count();
            if overlapping > 1 {
                Selection::Ambiguous
            } else {
                Selection::OutOfRange
            }
        }
    }
}

/// Read-only collection of reference sequences, shared across worker threads.
#[derive(Debug, Default)]
pub struct ReferenceStore {
    sources: Vec<String>,
    records: Vec<SequenceRecord>,
    index: HashMap<String, Vec<Candidate>>,
    sources_label: String,
}

impl ReferenceStore {
    /// Load and index FASTA files (plain or `.gz`).
    pub fn load<P: AsRef<Path>>(paths: &[P], mode: &ResolutionMode) -> Result<Self, Error> {
        let mut collections = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let name = path.display().to_string();
            let records = fasta::read_fasta(input::open(path)?, &name)?;
            collections.push((name, records));
        }
        Self::from_collections(collections, mode)
    }

    /// Index already parsed collections, each named by its source.
    pub fn from_collections<I>(collections: I, mode: &ResolutionMode) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (String, Vec<FastaRecord>)>,
    {
        let mut store = Self::default();
        let mut keyed: Vec<(SequenceKey, FastaRecord, usize)> = Vec::new();

        for (source, records) in collections {
            let source_index = store.sources.len();
            store.sources.push(source);
            for record in records {
                let key = match mode {
                    ResolutionMode::ExactId => SequenceKey {
                        id: record.id.clone(),
                        range: full_range(&record),
                    },
                    ResolutionMode::DescriptionRange(grammar) => grammar.key_for(&record),
                };
                keyed.push((key, record, source_index));
            }
        }
        store.sources_label = describe_sources(&store.sources);

        for (key, record, source) in keyed {
            store.insert(key, record, source, mode)?;
        }
        for candidates in store.index.values_mut() {
            candidates.sort_by_key(|c| c.range);
        }
        Ok(store)
    }

    fn insert(
        &mut self,
        key: SequenceKey,
        record: FastaRecord,
        source: usize,
        mode: &ResolutionMode,
    ) -> Result<(), Error> {
        let candidates = self.index.entry(key.id.clone()).or_default();
        let conflict = match mode {
            ResolutionMode::ExactId => candidates.first(),
            ResolutionMode::DescriptionRange(_) => {
                candidates.iter().find(|c| c.range.overlaps(&key.range))
            }
        };
        if let Some(existing) = conflict {
            let mut files = vec![self.sources[self.records[existing.record].source].as_str()];
            if self.records[existing.record].source != source {
                files.push(self.sources[source].as_str());
            }
            let sources = describe_sources(&files);
            return Err(match mode {
                ResolutionMode::ExactId => Error::DuplicateIdentifier { id: key.id, sources },
                ResolutionMode::DescriptionRange(_) => {
                    Error::AmbiguousSequenceIdentifier { id: key.id, sources }
                }
            });
        }
        candidates.push(Candidate {
            range: key.range,
            record: self.records.len(),
        });
        self.records.push(SequenceRecord {
            residues: record.sequence,
            source,
        });
        Ok(())
    }

    /// Resolve `id`, optionally restricted to sequences covering `range`.
    pub fn resolve(&self, id: &str, range: Option<Range>) -> Result<ResolvedSequence<'_>, Error> {
        let Some((key, candidates)) = self.index.get_key_value(id) else {
            return Err(Error::SequenceNotFound {
                id: id.to_string(),
                sources: self.sources_label.clone(),
            });
        };
        match (select(candidates, range), range) {
            (Selection::Unique(candidate), _) => {
                let record = &self.records[candidate.record];
                Ok(ResolvedSequence {
                    id: key.as_str(),
                    record,
                    declared: candidate.range,
                    source: &self.sources[record.source],
                })
            }
            (Selection::OutOfRange, Some(range)) => Err(Error::RangeNotFound {
                id: id.to_string(),
                range,
                sources: self.sources_label.clone(),
            }),
            (Selection::NotFound, _) => Err(Error::SequenceNotFound {
                id: id.to_string(),
                sources: self.sources_label.clone(),
            }),
            (Selection::Ambiguous | Selection::OutOfRange, _) => {
                Err(Error::AmbiguousSequenceIdentifier {
                    id: id.to_string(),
                    sources: self.sources_label.clone(),
                })
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total number of loaded residues.
    #[must_use]
    pub fn total_residues(&self) -> u64 {
        self.records.iter().map(|r| r.residues.len() as u64).sum()
    }
}

/// A sequence chosen by [`ReferenceStore::resolve`], addressed in the genomic
/// coordinates declared for it.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedSequence<'a> {
    id: &'a str,
    record: &'a SequenceRecord,
    declared: Range,
    /// File holding the sequence.
    source: &'a str,
}

impl<'a> ResolvedSequence<'a> {
    /// Residues covering a genomic range.
    pub fn extract(&self, range: Range) -> Result<&'a [u8], Error> {
        let residues = &self.record.residues;
        let first = self.declared.start;
        let covered = range.start >= first && range.end - first < residues.len() as u64;
        if !covered {
            return Err(Error::RangeNotFound {
                id: self.id.to_string(),
                range,
                sources: describe_sources(&[self.source]),
            });
        }
        let from = (range.start - first) as usize;
        let to = (range.end - first) as usize + 1;
        Ok(&residues[from..to])
    }
}

fn full_range(record: &FastaRecord) -> Range {
    Range {
        start: 1,
        end: record.sequence.len().max(1) as u64,
    }
}

fn describe_sources<S: AsRef<str>>(sources: &[S]) -> String {
    let quoted: Vec<String> = sources
        .iter()
        .map(|s| format!("\"{}\"", s.as_ref()))
        .collect();
    match quoted.len() {
        0 => "sequence collection".to_string(),
        1 => format!("sequence file {}", quoted[0]),
        _ => format!("sequence files {}", quoted.join(", ")),
    }
}
