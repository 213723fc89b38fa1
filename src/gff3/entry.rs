//! GFF3 data structures: physical lines, parsed records, merged features and
//! the feature graph.

use std::collections::HashMap;
use std::fmt;

use crate::range::Range;
use crate::strand::Strand;

/// Feature type whose segments are spliced and validated.
pub const CDS_TYPE: &str = "CDS";

pub const EXON_TYPE: &str = "exon";

/// Reading-frame phase of a CDS segment (GFF3 column 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Zero,
    One,
    Two,
    /// `.`
    Unset,
}

impl Phase {
    /// Parse GFF3 column 8. Returns `None` for anything outside `0 1 2 .`.
    #[must_use]
    pub fn from_gff3(s: &str) -> Option<Self> {
        match s {
            "0" => Some(Self::Zero),
            "1" => Some(Self::One),
            "2" => Some(Self::Two),
            "." => Some(Self::Unset),
            _ => None,
        }
    }

    /// Phase of a segment preceded by `offset` coding bases: the number of
    /// bases to skip before the next codon starts.
    #[must_use]
    pub fn from_offset(offset: u64) -> Self {
        match (3 - offset % 3) % 3 {
            0 => Self::Zero,
            1 => Self::One,
            _ => Self::Two,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Zero => "0",
            Self::One => "1",
            Self::Two => "2",
            Self::Unset => ".",
        };
        f.write_str(s)
    }
}

/// Parsed GFF3 column 9, keeping the original key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    pairs: Vec<(String, Vec<String>)>,
}

impl Attributes {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.get("ID").and_then(|v| v.first()).map(String::as_str)
    }

    #[must_use]
    pub fn parents(&self) -> &[String] {
        self.get("Parent").unwrap_or_default()
    }

    /// Append a new key. Callers check for duplicates first.
    pub fn push(&mut self, key: String, values: Vec<String>) {
        self.pairs.push((key, values));
    }

    /// Replace the values of `key`, appending it if absent.
    pub fn set(&mut self, key: &str, values: Vec<String>) {
        match self.pairs.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = values,
            None => self.pairs.push((key.to_string(), values)),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pairs.is_empty() {
            return f.write_str(".");
        }
        for (i, (key, values)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{key}={}", values.join(","))?;
        }
        Ok(())
    }
}

/// A single parsed GFF3 data line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gff3Record {
    /// 1-based physical line number.
    pub line_number: usize,
    pub seqid: String,
    pub source: String,
    pub feature_type: String,
    pub range: Range,
    /// Kept verbatim.
    pub score: String,
    pub strand: Strand,
    pub phase: Phase,
    pub attributes: Attributes,
}

/// Classification of one physical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// `##` pragma such as `##gff-version 3` or `###`.
    Directive,
    /// `#` comment.
    Comment,
    Blank,
    Record(Box<Gff3Record>),
    /// Anything after `##FASTA`, kept unparsed.
    Sequence,
}

/// Terminator of a physical line, written back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
    /// Last line of an input without a final newline.
    None,
}

impl LineEnding {
    /// Split a line as read (terminator included) into text and terminator.
    #[must_use]
    pub fn split(line: &str) -> (&str, Self) {
        if let Some(text) = line.strip_suffix("\r\n") {
            (text, Self::CrLf)
        } else if let Some(text) = line.strip_suffix('\n') {
            (text, Self::Lf)
        } else {
            (line, Self::None)
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::None => "",
        }
    }
}

/// One physical input line: its text without terminator, and the terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gff3Line {
    pub raw: String,
    pub ending: LineEnding,
    pub kind: LineKind,
}

impl Gff3Line {
    #[must_use]
    pub fn record(&self) -> Option<&Gff3Record> {
        match &self.kind {
            LineKind::Record(record) => Some(record.as_ref()),
            _ => None,
        }
    }
}

/// One physical piece of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Index into [`FeatureGraph::lines`].
    pub line: usize,
    pub range: Range,
}

/// A logical feature: all records sharing an `ID`, or a single record
/// without one.
#[derive(Debug, Clone)]
pub struct Feature {
    pub id: Option<String>,
    pub seqid: String,
    pub feature_type: String,
    pub strand: Strand,
    /// In input order.
    pub segments: Vec<Segment>,
    /// Indices into [`FeatureGraph::features`].
    pub parents: Vec<usize>,
    pub children: Vec<usize>,
    /// Line number of the first segment.
    pub line_number: usize,
}

impl Feature {
    /// Identifier for messages: the `ID`, or the type and line number.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("{} at line {}", self.feature_type, self.line_number),
        }
    }

    #[must_use]
    pub fn is_cds(&self) -> bool {
        self.feature_type == CDS_TYPE
    }

    fn has_child_of_type(&self, features: &[Feature], feature_type: &str) -> bool {
        self.children
            .iter()
            .any(|&c| features[c].feature_type == feature_type)
    }
}

/// All lines of an annotation with the parent/child hierarchy of its features.
#[derive(Debug, Default)]
pub struct FeatureGraph {
    pub(crate) lines: Vec<Gff3Line>,
    pub(crate) features: Vec<Feature>,
    pub(crate) id_index: HashMap<String, usize>,
}

impl FeatureGraph {
    #[must_use]
    pub fn lines(&self) -> &[Gff3Line] {
        &self.lines
    }

    /// Features in order of first appearance.
    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    #[must_use]
    pub fn feature(&self, index: usize) -> &Feature {
        &self.features[index]
    }

    #[must_use]
    pub fn feature_by_id(&self, id: &str) -> Option<&Feature> {
        self.id_index.get(id).map(|&i| &self.features[i])
    }

    #[must_use]
    pub fn record(&self, line: usize) -> Option<&Gff3Record> {
        self.lines.get(line).and_then(Gff3Line::record)
    }

    /// Indices of features with at least one direct CDS child, in input order.
    pub fn transcripts(&self) -> impl Iterator<Item = usize> + '_ {
        self.features
            .iter()
            .enumerate()
            .filter(|(_, f)| f.has_child_of_type(&self.features, CDS_TYPE))
            .map(|(i, _)| i)
    }

    /// Features with exon children but no CDS child. They pass through
    /// unchecked.
    pub fn transcripts_without_cds(&self) -> impl Iterator<Item = usize> + '_ {
        self.features
            .iter()
            .enumerate()
            .filter(|(_, f)| {
                f.has_child_of_type(&self.features, EXON_TYPE)
                    && !f.has_child_of_type(&self.features, CDS_TYPE)
            })
            .map(|(i, _)| i)
    }

    /// Number of data records.
    #[must_use]
    pub fn num_records(&self) -> usize {
        self.lines.iter().filter(|l| l.record().is_some()).count()
    }
}
