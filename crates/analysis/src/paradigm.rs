//! Assignment of themes into the six-slot paradigm model.
//!
//! Classification sits behind [`ParadigmClassifier`], a pure function from a theme's name and
//! context to a [`ParadigmSlot`]. [`KeywordClassifier`] is the default ordered keyword table;
//! a learned or configured ruleset can replace it without touching [`classify_paradigm`].

use crate::error::{AnalysisError, Result};
use crate::types::{Codebook, ParadigmModel, ParadigmSlot, Theme};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static GERUND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b[a-z]+ing\b").expect("gerund pattern is valid"));

/// Everything a classifier may look at for one theme
#[derive(Debug, Clone)]
pub struct ClassificationInput<'a> {
    pub name: &'a str,
    /// Labels of the theme's related codes (identifiers when the label is unknown)
    pub related_code_labels: Vec<&'a str>,
    /// participants / total participants
    pub prevalence: f64,
}

impl<'a> ClassificationInput<'a> {
    pub fn from_theme(theme: &'a Theme, code_labels: &'a HashMap<String, String>) -> Self {
        Self {
            name: &theme.name,
            related_code_labels: theme
                .related_codes
                .iter()
                .map(|id| code_labels.get(id).map(String::as_str).unwrap_or(id))
                .collect(),
            prevalence: theme.prevalence.fraction(),
        }
    }
}

pub trait ParadigmClassifier: Send + Sync {
    fn classify(&self, input: &ClassificationInput<'_>) -> ParadigmSlot;
}

/// One row of the keyword table
#[derive(Debug, Clone)]
pub struct KeywordRule {
    pub slot: ParadigmSlot,
    /// Substrings matched against the lower-cased name
    pub keywords: Vec<String>,
    /// Also match when any related-code label contains a word ending in "ing"
    pub match_gerund_codes: bool,
}

impl KeywordRule {
    pub fn new(slot: ParadigmSlot, keywords: &[&str]) -> Self {
        Self {
            slot,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            match_gerund_codes: false,
        }
    }

    pub fn with_gerund_codes(mut self) -> Self {
        self.match_gerund_codes = true;
        self
    }

    fn matches(&self, lowered_name: &str, input: &ClassificationInput<'_>) -> bool {
        self.keywords.iter().any(|k| lowered_name.contains(k.as_str()))
            || (self.match_gerund_codes
                && input
                    .related_code_labels
                    .iter()
                    .any(|label| GERUND.is_match(label)))
    }
}

/// Ordered keyword rules; the first matching rule wins
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    rules: Vec<KeywordRule>,
    /// Unmatched themes above this prevalence go to `above`, the rest to `below`
    fallback_threshold: f64,
    above: ParadigmSlot,
    below: ParadigmSlot,
}

impl KeywordClassifier {
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self {
            rules: vec![
                KeywordRule::new(
                    ParadigmSlot::CausalConditions,
                    &["trigger", "cause", "lead to", "result from"],
                ),
                KeywordRule::new(
                    ParadigmSlot::Context,
                    &["context", "environment", "setting", "background"],
                ),
                KeywordRule::new(
                    ParadigmSlot::Strategies,
                    &["strateg", "action", "approach", "managing", "coping"],
                )
                .with_gerund_codes(),
                KeywordRule::new(
                    ParadigmSlot::Consequences,
                    &["outcome", "result", "consequence", "impact", "effect"],
                ),
                KeywordRule::new(
                    ParadigmSlot::InterveningConditions,
                    &["factor", "influence", "constraint", "resource"],
                ),
            ],
            fallback_threshold: 0.3,
            above: ParadigmSlot::Strategies,
            below: ParadigmSlot::Context,
        }
    }
}

impl ParadigmClassifier for KeywordClassifier {
    fn classify(&self, input: &ClassificationInput<'_>) -> ParadigmSlot {
        let lowered = input.name.to_lowercase();
        if let Some(rule) = self.rules.iter().find(|r| r.matches(&lowered, input)) {
            return rule.slot;
        }
        if input.prevalence > self.fallback_threshold {
            self.above
        } else {
            self.below
        }
    }
}

/// Code id -> label lookup for classification context
pub fn code_labels(codebook: &Codebook) -> HashMap<String, String> {
    codebook
        .codes
        .iter()
        .map(|c| (c.id.clone(), c.label.clone()))
        .collect()
}

/// Theme with the highest prevalence fraction; the first one wins ties
pub fn most_prevalent(themes: &[Theme]) -> Option<&Theme> {
    let mut best: Option<&Theme> = None;
    for theme in themes {
        match best {
            Some(b) if theme.prevalence.fraction() <= b.prevalence.fraction() => {}
            _ => best = Some(theme),
        }
    }
    best
}

/// Classify every theme into the paradigm model
///
/// The most prevalent theme is named as the phenomenon and still keeps the slot its own
/// name earns, so it appears twice in the model.
pub fn classify_paradigm(
    themes: &[Theme],
    code_labels: &HashMap<String, String>,
    classifier: &dyn ParadigmClassifier,
) -> Result<ParadigmModel> {
    let phenomenon = most_prevalent(themes)
        .ok_or_else(|| AnalysisError::empty_input("cannot classify an empty theme set"))?;

    let mut model = ParadigmModel {
        phenomenon: phenomenon.name.clone(),
        ..ParadigmModel::default()
    };
    for theme in themes {
        let input = ClassificationInput::from_theme(theme, code_labels);
        let slot = classifier.classify(&input);
        log::debug!("Classified '{}' as {:?}", theme.name, slot);
        model.slot_mut(slot).push(theme.name.clone());
    }

    log::info!(
        "Paradigm model around '{}': {} causal, {} context, {} strategies, {} consequences, {} intervening",
        model.phenomenon,
        model.causal_conditions.len(),
        model.context.len(),
        model.strategies.len(),
        model.consequences.len(),
        model.intervening_conditions.len()
    );
    Ok(model)
}
