use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// When a code applies and when it does not
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UsageGuidance {
    pub when_to_use: String,
    pub when_not_to_use: String,
}

/// Analytic label attached to data excerpts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Code {
    pub id: String,

    pub label: String,

    #[serde(default)]
    pub definition: String,

    #[serde(default)]
    pub usage: UsageGuidance,

    /// Example excerpts illustrating the code
    #[serde(default)]
    pub examples: Vec<String>,

    /// How many excerpts were tagged with this code
    #[serde(default)]
    pub frequency: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<String>>,
}

/// Root codes plus parent -> ordered children
///
/// Comes from generated output, so nothing guarantees it is acyclic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeHierarchy {
    pub root_codes: Vec<String>,
    pub relationships: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodebookMetrics {
    pub total_codes: usize,
    pub hierarchy_depth: usize,
    pub average_frequency: f64,
    /// 1 - refined/initial code count
    pub redundancy_score: f64,
}

/// Immutable snapshot of one refinement pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Codebook {
    pub codes: Vec<Code>,
    #[serde(default)]
    pub hierarchy: CodeHierarchy,
    #[serde(default)]
    pub metrics: CodebookMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Quote {
    pub text: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant: Option<String>,
    pub context: String,
    /// Labels of the codes attached to this excerpt
    pub codes: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Prevalence {
    pub participants: u32,
    pub total_participants: u32,
    pub data_points: u32,
}

impl Prevalence {
    /// Share of participants with evidence for the theme, 0 when the total is unknown
    pub fn fraction(&self) -> f64 {
        if self.total_participants == 0 {
            0.0
        } else {
            f64::from(self.participants) / f64::from(self.total_participants)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Subtheme {
    pub name: String,
    pub definition: String,
    pub related_codes: Vec<String>,
}

/// Pattern of shared meaning spanning several codes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Theme {
    pub id: String,
    pub name: String,
    pub central_concept: String,
    pub definition: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subthemes: Vec<Subtheme>,
    /// Identifiers of the codes this theme draws on
    pub related_codes: Vec<String>,
    pub quotes: Vec<Quote>,
    pub prevalence: Prevalence,
    pub significance: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipType {
    Causes,
    Influences,
    Triggers,
    Precedes,
    Enables,
    Constrains,
}

impl RelationshipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Causes => "causes",
            Self::Influences => "influences",
            Self::Triggers => "triggers",
            Self::Precedes => "precedes",
            Self::Enables => "enables",
            Self::Constrains => "constrains",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipStrength {
    Strong,
    Moderate,
    Weak,
}

impl RelationshipStrength {
    /// Tier for a number of shared supporting codes; `None` when nothing is shared
    pub fn from_shared_count(shared: usize) -> Option<Self> {
        match shared {
            0 => None,
            1 => Some(Self::Weak),
            2 => Some(Self::Moderate),
            _ => Some(Self::Strong),
        }
    }
}

/// Relationship between two themes as reported by the generative service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeRelationship {
    pub from: String,
    pub to: String,
    pub relationship_type: RelationshipType,
    #[serde(default)]
    pub explanation: String,
    pub strength: RelationshipStrength,
}

/// Theme extraction output: themes plus any relationships the service proposed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeSet {
    pub themes: Vec<Theme>,
    pub relationships: Vec<ThemeRelationship>,
}

/// Directed relationship inferred between two categories (named by theme name)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRelationship {
    pub from: String,
    pub to: String,
    pub relationship_type: RelationshipType,
    pub explanation: String,
    pub strength: RelationshipStrength,
    #[serde(default)]
    pub shared_codes: Vec<String>,
}

/// Slot of the paradigm model a category can occupy (besides the phenomenon)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParadigmSlot {
    CausalConditions,
    Context,
    Strategies,
    Consequences,
    InterveningConditions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParadigmModel {
    pub phenomenon: String,
    pub causal_conditions: Vec<String>,
    pub context: Vec<String>,
    pub strategies: Vec<String>,
    pub consequences: Vec<String>,
    pub intervening_conditions: Vec<String>,
}

impl ParadigmModel {
    pub fn slot(&self, slot: ParadigmSlot) -> &[String] {
        match slot {
            ParadigmSlot::CausalConditions => &self.causal_conditions,
            ParadigmSlot::Context => &self.context,
            ParadigmSlot::Strategies => &self.strategies,
            ParadigmSlot::Consequences => &self.consequences,
            ParadigmSlot::InterveningConditions => &self.intervening_conditions,
        }
    }

    pub fn slot_mut(&mut self, slot: ParadigmSlot) -> &mut Vec<String> {
        match slot {
            ParadigmSlot::CausalConditions => &mut self.causal_conditions,
            ParadigmSlot::Context => &mut self.context,
            ParadigmSlot::Strategies => &mut self.strategies,
            ParadigmSlot::Consequences => &mut self.consequences,
            ParadigmSlot::InterveningConditions => &mut self.intervening_conditions,
        }
    }

    /// Slot a category name was placed in, if any
    pub fn slot_of(&self, name: &str) -> Option<ParadigmSlot> {
        [
            ParadigmSlot::CausalConditions,
            ParadigmSlot::Context,
            ParadigmSlot::Strategies,
            ParadigmSlot::Consequences,
            ParadigmSlot::InterveningConditions,
        ]
        .into_iter()
        .find(|slot| self.slot(*slot).iter().any(|n| n == name))
    }

    /// Number of placements across the five lists
    pub fn placed_count(&self) -> usize {
        self.causal_conditions.len()
            + self.context.len()
            + self.strategies.len()
            + self.consequences.len()
            + self.intervening_conditions.len()
    }
}

/// Rubric outcome shared by the codebook, theme and theory validators
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityAssessment {
    pub overall_quality: f64,
    pub scores: BTreeMap<String, f64>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    pub passes_quality_threshold: bool,
}

/// Drop float summation noise so a mean that lands on a threshold compares equal to it
fn round_score(value: f64) -> f64 {
    (value * 1e9).round() / 1e9
}

impl QualityAssessment {
    /// Build from named criterion scores; overall is their arithmetic mean
    pub fn from_scores(scores: BTreeMap<String, f64>, threshold: f64) -> Self {
        let overall_quality = if scores.is_empty() {
            0.0
        } else {
            round_score(scores.values().sum::<f64>() / scores.len() as f64)
        };
        Self {
            overall_quality,
            passes_quality_threshold: overall_quality >= threshold,
            scores,
            ..Self::default()
        }
    }

    pub fn score(&self, criterion: &str) -> Option<f64> {
        self.scores.get(criterion).copied()
    }

    /// Human-readable warnings for a result below the threshold; empty when it passes
    pub fn warnings(&self) -> Vec<String> {
        if self.passes_quality_threshold {
            return Vec::new();
        }
        let mut out = vec![format!(
            "overall quality {:.2} is below the threshold",
            self.overall_quality
        )];
        out.extend(self.weaknesses.iter().cloned());
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeAssessment {
    #[serde(flatten)]
    pub quality: QualityAssessment,
    pub saturation_reached: bool,
}

/// Explanatory model built from one theme snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroundedTheory {
    pub title: String,
    pub core_category: String,
    pub paradigm_model: ParadigmModel,
    pub storyline: String,
    pub propositions: Vec<String>,
    pub category_relationships: Vec<CategoryRelationship>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub novelty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contribution: Option<String>,
    pub practical_implications: Vec<String>,
    pub future_research: Vec<String>,
    pub saturation_reached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityAssessment>,
}
