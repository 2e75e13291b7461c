//! Named methodologies with per-stage guidance text.
//!
//! The guidance is not consumed by the core algorithms; prompt builders append it before
//! calling the generative service.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Methodology {
    pub name: String,
    pub description: String,
    /// Stage name -> guidance block
    pub stages: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct MethodologyCatalog {
    methodologies: BTreeMap<String, Methodology>,
}

impl MethodologyCatalog {
    pub fn new(methodologies: BTreeMap<String, Methodology>) -> Self {
        Self { methodologies }
    }

    pub fn builtin() -> Self {
        let mut methodologies = BTreeMap::new();
        methodologies.insert(
            "straussian".to_string(),
            methodology(
                "Straussian grounded theory",
                "Systematic coding procedures organized around the paradigm model.",
                &[
                    ("open_coding", "Break the data into discrete incidents and label each with a concise code. Record properties and dimensions for every code."),
                    ("axial_coding", "Relate categories to subcategories along the paradigm model: causal conditions, context, intervening conditions, strategies and consequences."),
                    ("selective_coding", "Choose the core category and systematically relate all other categories to it. Validate those relationships against the data."),
                    ("theme_development", "Group related codes into categories that share a central organizing concept. Keep categories distinct."),
                    ("theory_building", "Write a storyline around the core category and state propositions that follow from the relationships between categories."),
                ],
            ),
        );
        methodologies.insert(
            "glaserian".to_string(),
            methodology(
                "Classic (Glaserian) grounded theory",
                "Emergent coding with constant comparison and theoretical sampling.",
                &[
                    ("open_coding", "Code line by line and compare each incident with previous incidents. Let the main concern of participants emerge."),
                    ("selective_coding", "Delimit coding to variables that relate to the emerging core category."),
                    ("theory_building", "Use theoretical coding families to integrate categories. Avoid forcing a preconceived framework."),
                ],
            ),
        );
        methodologies.insert(
            "constructivist".to_string(),
            methodology(
                "Constructivist grounded theory",
                "Co-constructed meaning with attention to researcher reflexivity.",
                &[
                    ("open_coding", "Use gerunds to code for actions and processes. Stay close to participants' language."),
                    ("theme_development", "Raise focused codes to tentative categories and note how participants construct them."),
                    ("theory_building", "Offer an interpretive understanding that situates the theory in time, place and situation."),
                ],
            ),
        );
        Self { methodologies }
    }

    pub fn get(&self, id: &str) -> Option<&Methodology> {
        self.methodologies.get(&id.trim().to_ascii_lowercase())
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.methodologies.keys().map(String::as_str)
    }

    /// Guidance block for one stage of a methodology
    pub fn stage_guidance(&self, methodology: &str, stage: &str) -> Option<&str> {
        self.get(methodology)?
            .stages
            .get(stage.trim())
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// Append the stage guidance to a prompt; the prompt is returned unchanged without guidance
    pub fn append_guidance(&self, prompt: &str, methodology: &str, stage: &str) -> String {
        match self.stage_guidance(methodology, stage) {
            Some(guidance) => format!("{prompt}\n\nMethodology guidance:\n{guidance}"),
            None => prompt.to_string(),
        }
    }
}

fn methodology(name: &str, description: &str, stages: &[(&str, &str)]) -> Methodology {
    Methodology {
        name: name.to_string(),
        description: description.to_string(),
        stages: stages
            .iter()
            .map(|(stage, text)| (stage.to_string(), text.to_string()))
            .collect(),
    }
}
