use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::reference::ResolutionMode;
use crate::reference::description::DescriptionGrammar;
use crate::transcript::types::CodonPolicy;

/// Run settings. Loaded from an optional JSON file; command-line flags
/// override individual fields afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct CdsConfig {
    pub use_description: bool,
    pub start_codon: bool,
    pub final_stop_codon: bool,
    pub annotate: bool,
    pub threads: Option<usize>,
    pub description_grammar: DescriptionGrammar,
}

impl Default for CdsConfig {
    fn default() -> Self {
        Self {
            use_description: false,
            start_codon: true,
            final_stop_codon: true,
            annotate: false,
            threads: None,
            description_grammar: DescriptionGrammar::default(),
        }
    }
}

impl CdsConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.threads == Some(0) {
            bail!("invalid thread count: expected at least 1");
        }
        if let Err(message) = self.description_grammar.validate() {
            bail!("{message}");
        }
        Ok(())
    }

    #[must_use]
    pub fn codon_policy(&self) -> CodonPolicy {
        CodonPolicy {
            require_start_codon: self.start_codon,
            require_final_stop_codon: self.final_stop_codon,
        }
    }

    #[must_use]
    pub fn resolution_mode(&self) -> ResolutionMode {
        if self.use_description {
            ResolutionMode::DescriptionRange(self.description_grammar.clone())
        } else {
            ResolutionMode::ExactId
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(json.as_bytes()).unwrap();
        f
    }

    #[test]
    fn valid_config_all_fields() {
        let json = r#"{
            "useDescription": true,
            "startCodon": false,
            "finalStopCodon": true,
            "annotate": true,
            "threads": 4,
            "descriptionGrammar": { "idSeparator": "|", "rangeSeparators": ["_"] }
        }"#;
        let f = write_config(json);
        let config = CdsConfig::from_file(f.path()).unwrap();
        assert!(config.annotate);
        assert_eq!(config.threads, Some(4));
        assert_eq!(
            config.codon_policy(),
            CodonPolicy {
                require_start_codon: false,
                require_final_stop_codon: true
            }
        );
        match config.resolution_mode() {
            ResolutionMode::DescriptionRange(grammar) => {
                assert_eq!(grammar.id_separator, "|");
                assert_eq!(grammar.range_separators, vec!["_".to_string()]);
            }
            ResolutionMode::ExactId => panic!("expected description mode"),
        }
    }

    #[test]
    fn empty_config_uses_defaults() {
        let f = write_config("{}");
        let config = CdsConfig::from_file(f.path()).unwrap();
        assert_eq!(config, CdsConfig::default());
        assert_eq!(config.codon_policy(), CodonPolicy::default());
        assert_eq!(config.resolution_mode(), ResolutionMode::ExactId);
    }

    #[test]
    fn partial_grammar_keeps_default_separators() {
        let f = write_config(r#"{ "descriptionGrammar": { "idSeparator": "@" } }"#);
        let config = CdsConfig::from_file(f.path()).unwrap();
        assert_eq!(config.description_grammar.id_separator, "@");
        assert_eq!(config.description_grammar.range_separators.len(), 2);
    }

    #[test]
    fn zero_threads() {
        let f = write_config(r#"{ "threads": 0 }"#);
        let err = CdsConfig::from_file(f.path()).unwrap_err();
        assert!(err.to_string().contains("invalid thread count"));
    }

    #[test]
    fn unknown_key() {
        let f = write_config(r#"{ "startcodon": false }"#);
        let err = CdsConfig::from_file(f.path()).unwrap_err();
        assert!(err.to_string().contains("failed to parse config file"));
    }

    #[test]
    fn bad_separator() {
        let f = write_config(r#"{ "descriptionGrammar": { "rangeSeparators": [] } }"#);
        assert!(CdsConfig::from_file(f.path()).is_err());
    }
}
