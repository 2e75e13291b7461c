use crate::config::AnalysisConfig;
use crate::types::{GroundedTheory, QualityAssessment, RelationshipStrength};
use std::collections::BTreeMap;

pub const CREDIBILITY: &str = "credibility";
pub const ORIGINALITY: &str = "originality";
pub const RESONANCE: &str = "resonance";
pub const USEFULNESS: &str = "usefulness";

const MIN_STATEMENT_CHARS: usize = 20;
const MIN_STORYLINE_CHARS: usize = 100;
const MIN_RELATIONSHIPS: usize = 3;
const MIN_PROPOSITIONS: usize = 3;

fn long_enough(text: Option<&str>, min_chars: usize) -> bool {
    text.is_some_and(|t| t.chars().count() > min_chars)
}

/// Scores a constructed theory from its structural completeness
#[derive(Debug, Clone)]
pub struct TheoryValidator {
    threshold: f64,
}

impl TheoryValidator {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            threshold: config.theory_threshold,
        }
    }

    pub fn validate(&self, theory: &GroundedTheory) -> QualityAssessment {
        let model = &theory.paradigm_model;

        let mut credibility = 0.0;
        if !model.causal_conditions.is_empty() {
            credibility += 0.2;
        }
        if !model.strategies.is_empty() {
            credibility += 0.2;
        }
        if theory.category_relationships.len() >= MIN_RELATIONSHIPS {
            credibility += 0.3;
        }
        if theory.saturation_reached {
            credibility += 0.3;
        }

        let mut originality = 0.0;
        if long_enough(theory.novelty.as_deref(), MIN_STATEMENT_CHARS) {
            originality += 0.5;
        }
        if theory.propositions.len() >= MIN_PROPOSITIONS {
            originality += 0.5;
        }

        let mut resonance = 0.0;
        if theory.storyline.chars().count() > MIN_STORYLINE_CHARS {
            resonance += 0.3;
        }
        if !model.context.is_empty() {
            resonance += 0.2;
        }
        if !model.intervening_conditions.is_empty() {
            resonance += 0.2;
        }
        if theory
            .category_relationships
            .iter()
            .any(|r| r.strength == RelationshipStrength::Strong)
        {
            resonance += 0.3;
        }

        let mut usefulness = 0.0;
        if long_enough(theory.contribution.as_deref(), MIN_STATEMENT_CHARS) {
            usefulness += 0.4;
        }
        if !theory.practical_implications.is_empty() {
            usefulness += 0.3;
        }
        if !theory.future_research.is_empty() {
            usefulness += 0.3;
        }

        let mut scores = BTreeMap::new();
        scores.insert(CREDIBILITY.to_string(), f64::min(credibility, 1.0));
        scores.insert(ORIGINALITY.to_string(), f64::min(originality, 1.0));
        scores.insert(RESONANCE.to_string(), f64::min(resonance, 1.0));
        scores.insert(USEFULNESS.to_string(), f64::min(usefulness, 1.0));

        let mut assessment = QualityAssessment::from_scores(scores, self.threshold);
        describe(&mut assessment, theory);

        if assessment.passes_quality_threshold {
            log::info!(
                "Theory '{}' passed with {:.2}",
                theory.title,
                assessment.overall_quality
            );
        } else {
            log::warn!(
                "Theory '{}' below threshold: {:.2} < {:.2}",
                theory.title,
                assessment.overall_quality,
                self.threshold
            );
        }
        assessment
    }
}

impl Default for TheoryValidator {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

fn describe(assessment: &mut QualityAssessment, theory: &GroundedTheory) {
    let model = &theory.paradigm_model;
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    let mut recommendations = Vec::new();

    for (criterion, score) in &assessment.scores {
        if *score >= 0.8 {
            strengths.push(format!("Strong {criterion} ({score:.2})"));
        } else if *score < 0.5 {
            weaknesses.push(format!("Weak {criterion} ({score:.2})"));
        }
    }

    if model.causal_conditions.is_empty() {
        recommendations.push("Identify the conditions that give rise to the phenomenon".to_string());
    }
    if model.strategies.is_empty() {
        recommendations.push("Describe how participants act on the phenomenon".to_string());
    }
    if theory.category_relationships.len() < MIN_RELATIONSHIPS {
        recommendations.push("Relate more categories through shared codes".to_string());
    }
    if !theory.saturation_reached {
        recommendations.push("Collect or analyze more data until themes saturate".to_string());
    }
    if !long_enough(theory.novelty.as_deref(), MIN_STATEMENT_CHARS) {
        recommendations.push("State what is novel about the theory".to_string());
    }
    if !long_enough(theory.contribution.as_deref(), MIN_STATEMENT_CHARS) {
        recommendations.push("State the theory's contribution to the field".to_string());
    }
    if theory.practical_implications.is_empty() {
        recommendations.push("List practical implications".to_string());
    }
    if theory.future_research.is_empty() {
        recommendations.push("Suggest directions for future research".to_string());
    }

    assessment.strengths = strengths;
    assessment.weaknesses = weaknesses;
    assessment.recommendations = recommendations;
}
