use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::narrative::NarrativeAssembler;
use crate::paradigm::{classify_paradigm, most_prevalent, KeywordClassifier, ParadigmClassifier};
use crate::relationships::{RelationshipEngine, RelationshipRules};
use crate::theory::TheoryValidator;
use crate::types::{GroundedTheory, Theme};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Text the generative service drafted for a theory, plus the saturation signal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TheoryDraft {
    pub title: Option<String>,
    pub novelty: Option<String>,
    pub contribution: Option<String>,
    pub practical_implications: Vec<String>,
    pub future_research: Vec<String>,
    pub saturation_reached: bool,
}

/// Build a grounded theory from one theme snapshot
///
/// Runs the paradigm classifier, relationship engine and narrative assembler, then scores the
/// result with the theory validator.
pub struct TheoryBuilder {
    classifier: Box<dyn ParadigmClassifier>,
    relationships: RelationshipEngine,
    narrative: NarrativeAssembler,
    validator: TheoryValidator,
}

impl TheoryBuilder {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            classifier: Box::new(KeywordClassifier::default()),
            relationships: RelationshipEngine::default(),
            narrative: NarrativeAssembler::new(config),
            validator: TheoryValidator::new(config),
        }
    }

    pub fn with_classifier(mut self, classifier: Box<dyn ParadigmClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_relationship_rules(mut self, rules: Box<dyn RelationshipRules>) -> Self {
        self.relationships = RelationshipEngine::new(rules);
        self
    }

    pub fn build(
        &self,
        themes: &[Theme],
        code_labels: &HashMap<String, String>,
        draft: TheoryDraft,
    ) -> Result<GroundedTheory> {
        let core = most_prevalent(themes)
            .ok_or_else(|| AnalysisError::empty_input("cannot build a theory without themes"))?;

        let paradigm_model = classify_paradigm(themes, code_labels, self.classifier.as_ref())?;
        let category_relationships = self.relationships.infer(themes);
        let storyline = self.narrative.storyline(core, &paradigm_model, themes);
        let propositions = self.narrative.propositions(&category_relationships, themes);

        let title = draft
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| format!("A Grounded Theory of {}", core.name));

        let mut theory = GroundedTheory {
            title,
            core_category: core.name.clone(),
            paradigm_model,
            storyline,
            propositions,
            category_relationships,
            novelty: draft.novelty,
            contribution: draft.contribution,
            practical_implications: draft.practical_implications,
            future_research: draft.future_research,
            saturation_reached: draft.saturation_reached,
            quality: None,
        };
        theory.quality = Some(self.validator.validate(&theory));

        log::info!(
            "Built theory '{}' around '{}' ({} relationships, {} propositions)",
            theory.title,
            theory.core_category,
            theory.category_relationships.len(),
            theory.propositions.len()
        );
        Ok(theory)
    }
}

impl Default for TheoryBuilder {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Prevalence;

    fn theme(name: &str, codes: &[&str], participants: u32) -> Theme {
        Theme {
            id: name.to_string(),
            name: name.to_string(),
            related_codes: codes.iter().map(|c| c.to_string()).collect(),
            prevalence: Prevalence {
                participants,
                total_participants: 10,
                data_points: 5,
            },
            ..Theme::default()
        }
    }

    #[test]
    fn core_category_is_most_prevalent_theme() {
        let themes = vec![
            theme("Daily challenges", &["c1", "c2", "c3"], 4),
            theme("Coping strategies", &["c1", "c2", "c3"], 9),
            theme("Recovery outcomes", &["c3"], 2),
        ];
        let theory = TheoryBuilder::default()
            .build(&themes, &HashMap::new(), TheoryDraft::default())
            .unwrap();

        assert_eq!(theory.core_category, "Coping strategies");
        assert_eq!(theory.paradigm_model.phenomenon, "Coping strategies");
        assert_eq!(theory.title, "A Grounded Theory of Coping strategies");
        assert!(theory.storyline.contains("3 categories"));
        assert_eq!(theory.propositions[0], "Daily challenges triggers Coping strategies.");
        assert!(theory.quality.is_some());
    }

    #[test]
    fn draft_fields_are_carried_over() {
        let themes = vec![theme("Coping", &[], 5)];
        let draft = TheoryDraft {
            title: Some("Holding steady".to_string()),
            future_research: vec!["Replicate with nurses".to_string()],
            saturation_reached: true,
            ..TheoryDraft::default()
        };
        let theory = TheoryBuilder::default()
            .build(&themes, &HashMap::new(), draft)
            .unwrap();
        assert_eq!(theory.title, "Holding steady");
        assert!(theory.saturation_reached);
        assert_eq!(theory.future_research.len(), 1);
    }

    #[test]
    fn empty_themes_fail_fast() {
        let err = TheoryBuilder::default()
            .build(&[], &HashMap::new(), TheoryDraft::default())
            .unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyInput(_)));
    }
}
