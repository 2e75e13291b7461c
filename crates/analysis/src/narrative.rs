//! Templated storyline and proposition assembly.
//!
//! Nothing here fails: missing data turns into omitted sentences.

use crate::config::AnalysisConfig;
use crate::types::{CategoryRelationship, ParadigmModel, RelationshipStrength, RelationshipType, Theme};

/// Prevalence fraction above which a theme counts as a central process
const CENTRAL_PREVALENCE: f64 = 0.5;

const FALLBACK_PROPOSITIONS: [&str; 3] = [
    "The core category integrates participants' experiences across the identified categories.",
    "The strategies participants adopt are shaped by the conditions in which they occur.",
    "The consequences of participants' actions feed back into the conditions they face.",
];

/// Prose list: "", "x", "x and y", "a, b, and c"
///
/// A single item is lower-cased; longer lists keep their casing.
pub fn format_list(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.to_lowercase(),
        [first, second] => format!("{first} and {second}"),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    }
}

#[derive(Debug, Clone)]
pub struct NarrativeAssembler {
    max_strong_propositions: usize,
    max_central_propositions: usize,
}

impl NarrativeAssembler {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            max_strong_propositions: config.max_strong_propositions,
            max_central_propositions: config.max_central_propositions,
        }
    }

    pub fn storyline(&self, core: &Theme, model: &ParadigmModel, themes: &[Theme]) -> String {
        let mut sentences = Vec::new();

        if !core.name.trim().is_empty() {
            if core.central_concept.trim().is_empty() {
                sentences.push(format!(
                    "The central phenomenon in this analysis is {}.",
                    core.name
                ));
            } else {
                sentences.push(format!(
                    "The central phenomenon in this analysis is {}, organized around {}.",
                    core.name,
                    lower_first(core.central_concept.trim().trim_end_matches('.'))
                ));
            }
        }

        let segments = [
            (&model.causal_conditions, "This phenomenon arises from"),
            (&model.context, "It unfolds within a context shaped by"),
            (&model.strategies, "In response, participants engage in"),
            (&model.intervening_conditions, "These responses are conditioned by"),
            (&model.consequences, "Together, these actions lead to"),
        ];
        for (items, lead) in segments {
            if !items.is_empty() {
                sentences.push(format!("{lead} {}.", format_list(items)));
            }
        }

        let mut storyline = sentences.join(" ");
        if !themes.is_empty() {
            if !storyline.is_empty() {
                storyline.push_str("\n\n");
            }
            storyline.push_str(&format!(
                "Taken together, the {} categories identified in this analysis form an integrated account of how {} is experienced, managed and carried forward by participants.",
                themes.len(),
                core.name.to_lowercase()
            ));
        }
        storyline
    }

    pub fn propositions(
        &self,
        relationships: &[CategoryRelationship],
        themes: &[Theme],
    ) -> Vec<String> {
        let mut propositions: Vec<String> = relationships
            .iter()
            .filter(|r| r.strength == RelationshipStrength::Strong)
            .take(self.max_strong_propositions)
            .map(relationship_proposition)
            .collect();

        propositions.extend(
            themes
                .iter()
                .filter(|t| t.prevalence.fraction() > CENTRAL_PREVALENCE)
                .take(self.max_central_propositions)
                .map(|t| {
                    format!(
                        "{} is a central process shared by the majority of participants.",
                        t.name
                    )
                }),
        );

        if propositions.is_empty() {
            return FALLBACK_PROPOSITIONS.iter().map(|p| p.to_string()).collect();
        }
        propositions
    }
}

impl Default for NarrativeAssembler {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

fn relationship_proposition(r: &CategoryRelationship) -> String {
    let (from, to) = (&r.from, &r.to);
    match r.relationship_type {
        RelationshipType::Triggers => format!("{from} triggers {to}."),
        RelationshipType::Causes => format!("{from} leads to {to}."),
        RelationshipType::Influences => format!("{from} shapes how {to} unfolds."),
        RelationshipType::Precedes => format!("{from} precedes and sets the stage for {to}."),
        RelationshipType::Enables => format!("{from} makes {to} possible."),
        RelationshipType::Constrains => format!("{from} places limits on {to}."),
    }
}

fn lower_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
