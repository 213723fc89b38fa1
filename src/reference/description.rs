//! Identifier and coordinate range embedded in a FASTA description.
//!
//! A description token such as `chr1:1001..2000` (or `chr1:1001-2000`) declares
//! that the sequence holds positions 1001 to 2000 of `chr1`. The separators are
//! configurable; the first token of the description that parses wins. A
//! description without such a token keys the sequence by its plain identifier
//! over its full length.

use serde::Deserialize;

use crate::fasta::FastaRecord;
use crate::range::Range;

/// Identifier and declared coordinate range of one loaded sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceKey {
    pub id: String,
    pub range: Range,
}

/// Token grammar for `<id><idSeparator><start><rangeSeparator><end>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DescriptionGrammar {
    /// Splits the identifier from the range; the last occurrence is used so
    /// identifiers may contain it.
    pub id_separator: String,
    /// Splits start from end; tried in order.
    pub range_separators: Vec<String>,
}

impl Default for DescriptionGrammar {
    fn default() -> Self {
        Self {
            id_separator: ":".to_string(),
            range_separators: vec!["..".to_string(), "-".to_string()],
        }
    }
}

impl DescriptionGrammar {
    /// Checks that the separators can delimit tokens unambiguously.
    pub fn validate(&self) -> Result<(), String> {
        let usable = |sep: &str| {
            !sep.is_empty() && !sep.chars().any(|c| c.is_whitespace() || c.is_ascii_digit())
        };
        if !usable(&self.id_separator) {
            return Err(format!(
                "invalid description id separator '{}'",
                self.id_separator
            ));
        }
        if self.range_separators.is_empty() {
            return Err("at least one description range separator is required".to_string());
        }
        if let Some(bad) = self.range_separators.iter().find(|s| !usable(s)) {
            return Err(format!("invalid description range separator '{bad}'"));
        }
        Ok(())
    }

    /// Derives the lookup key for a loaded record.
    #[must_use]
    pub fn key_for(&self, record: &FastaRecord) -> SequenceKey {
        record
            .description
            .split_whitespace()
            .find_map(|token| self.parse_token(token))
            .unwrap_or_else(|| SequenceKey {
                id: record.id.clone(),
                range: Range {
                    start: 1,
                    end: record.sequence.len().max(1) as u64,
                },
            })
    }

    /// Parses a single `<id>:<start>..<end>` token.
    #[must_use]
    pub fn parse_token(&self, token: &str) -> Option<SequenceKey> {
        let split = token.rfind(self.id_separator.as_str())?;
        let id = &token[..split];
        if id.is_empty() {
            return None;
        }
        let coords = &token[split + self.id_separator.len()..];
        let range = self.range_separators.iter().find_map(|sep| {
            let (start, end) = coords.split_once(sep.as_str())?;
            Range::new(start.parse().ok()?, end.parse().ok()?)
        })?;
        Some(SequenceKey {
            id: id.to_string(),
            range,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(description: &str, len: usize) -> FastaRecord {
        FastaRecord {
            id: description.split_whitespace().next().unwrap().to_string(),
            description: description.to_string(),
            sequence: vec![b'A'; len],
        }
    }

    #[test]
    fn dotted_range() {
        let key = DescriptionGrammar::default().parse_token("chr1:1001..2000").unwrap();
        assert_eq!(key.id, "chr1");
        assert_eq!(key.range, Range { start: 1001, end: 2000 });
    }

    #[test]
    fn dashed_range_and_colon_in_id() {
        let key = DescriptionGrammar::default()
            .parse_token("lcl:contig7:5-10")
            .unwrap();
        assert_eq!(key.id, "lcl:contig7");
        assert_eq!(key.range, Range { start: 5, end: 10 });
    }

    #[test]
    fn rejects_malformed_tokens() {
        let grammar = DescriptionGrammar::default();
        assert!(grammar.parse_token("chr1").is_none());
        assert!(grammar.parse_token(":1..5").is_none());
        assert!(grammar.parse_token("chr1:0..5").is_none());
        assert!(grammar.parse_token("chr1:9..5").is_none());
        assert!(grammar.parse_token("chr1:a..b").is_none());
    }

    #[test]
    fn key_from_later_token() {
        let key = DescriptionGrammar::default().key_for(&record("seq7 X:501..1000 sample", 500));
        assert_eq!(key.id, "X");
        assert_eq!(key.range, Range { start: 501, end: 1000 });
    }

    #[test]
    fn key_falls_back_to_full_length() {
        let key = DescriptionGrammar::default().key_for(&record("U89959 Arabidopsis", 120));
        assert_eq!(key.id, "U89959");
        assert_eq!(key.range, Range { start: 1, end: 120 });
    }

    #[test]
    fn custom_separators() {
        let grammar = DescriptionGrammar {
            id_separator: "|".to_string(),
            range_separators: vec!["_".to_string()],
        };
        let key = grammar.parse_token("X|10_20").unwrap();
        assert_eq!(key.id, "X");
        assert_eq!(key.range, Range { start: 10, end: 20 });
        assert!(grammar.parse_token("X:10..20").is_none());
    }

    #[test]
    fn validate_separators() {
        assert!(DescriptionGrammar::default().validate().is_ok());
        let no_ranges = DescriptionGrammar {
            range_separators: Vec::new(),
            ..Default::default()
        };
        assert!(no_ranges.validate().is_err());
        let digit = DescriptionGrammar {
            id_separator: "1".to_string(),
            ..Default::default()
        };
        assert!(digit.validate().is_err());
    }
}
