use crate::error::{AnalysisError, Result};
use crate::methodology::{Methodology, MethodologyCatalog};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Thresholds and caps used by the validators and the narrative assembler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Minimum overall quality for a codebook to pass
    pub codebook_threshold: f64,

    /// Minimum overall quality for a theme set to pass
    pub theme_threshold: f64,

    /// Minimum overall quality for a theory to pass (lower: theory assessment is more subjective)
    pub theory_threshold: f64,

    /// Maximum propositions drawn from strong relationships
    pub max_strong_propositions: usize,

    /// Maximum "central process" propositions drawn from highly prevalent themes
    pub max_central_propositions: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            codebook_threshold: 0.7,
            theme_threshold: 0.7,
            theory_threshold: 0.65,
            max_strong_propositions: 5,
            max_central_propositions: 3,
        }
    }
}

impl AnalysisConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("codebook_threshold", self.codebook_threshold),
            ("theme_threshold", self.theme_threshold),
            ("theory_threshold", self.theory_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AnalysisError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Top-level configuration file
///
/// ```toml
/// [analysis]
/// theory_threshold = 0.6
///
/// [methodologies.straussian.stages]
/// axial_coding = "Relate categories along the paradigm model."
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QualcodeConfig {
    pub analysis: AnalysisConfig,
    pub methodologies: BTreeMap<String, Methodology>,
}

impl QualcodeConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.analysis.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&raw)?;
        log::info!(
            "Loaded config from {} ({} methodologies)",
            path.display(),
            config.methodologies.len()
        );
        Ok(config)
    }

    /// Configured methodologies, or the built-in catalog when none are configured
    pub fn catalog(&self) -> MethodologyCatalog {
        if self.methodologies.is_empty() {
            MethodologyCatalog::builtin()
        } else {
            MethodologyCatalog::new(self.methodologies.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_rubric_thresholds() {
        let config = AnalysisConfig::default();
        assert_eq!(config.codebook_threshold, 0.7);
        assert_eq!(config.theme_threshold, 0.7);
        assert_eq!(config.theory_threshold, 0.65);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = QualcodeConfig::from_toml_str(
            r#"
[analysis]
theory_threshold = 0.5

[methodologies.custom]
name = "Custom"

[methodologies.custom.stages]
open_coding = "Stay close to the data."
"#,
        )
        .unwrap();
        assert_eq!(config.analysis.theory_threshold, 0.5);
        assert_eq!(config.analysis.codebook_threshold, 0.7);
        assert_eq!(
            config.catalog().stage_guidance("custom", "open_coding"),
            Some("Stay close to the data.")
        );
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let err = QualcodeConfig::from_toml_str("[analysis]\ntheme_threshold = 1.5\n").unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidConfig(_)));
    }

    #[test]
    fn empty_config_falls_back_to_builtin_catalog() {
        let config = QualcodeConfig::from_toml_str("").unwrap();
        assert!(config.catalog().get("straussian").is_some());
    }

    #[test]
    fn loads_from_file_and_reports_missing_files() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("qualcode.toml");
        std::fs::write(&path, "[analysis]\nmax_strong_propositions = 2\n").unwrap();

        let config = QualcodeConfig::from_file(&path).unwrap();
        assert_eq!(config.analysis.max_strong_propositions, 2);

        let err = QualcodeConfig::from_file(&tmp.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, AnalysisError::Io(_)));
    }
}
