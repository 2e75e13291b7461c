use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::hierarchy::hierarchy_depth;
use crate::types::{Code, CodeHierarchy, Codebook, CodebookMetrics, QualityAssessment};
use std::collections::{BTreeMap, HashSet};

pub const CLARITY: &str = "clarity";
pub const DISTINCTIVENESS: &str = "distinctiveness";
pub const COMPLETENESS: &str = "completeness";
pub const HIERARCHY: &str = "hierarchy";
pub const EXAMPLES: &str = "examples";

/// Definitions at or below this many characters do not count as clear
const MIN_DEFINITION_CHARS: usize = 10;

impl Codebook {
    /// Assemble a codebook snapshot and derive its metrics
    ///
    /// `initial_code_count` is the number of codes before refinement; it only feeds the
    /// redundancy score.
    pub fn build(
        codes: Vec<Code>,
        hierarchy: CodeHierarchy,
        initial_code_count: usize,
    ) -> Result<Self> {
        let metrics = CodebookMetrics::compute(&codes, &hierarchy, initial_code_count)?;
        Ok(Self {
            codes,
            hierarchy,
            metrics,
        })
    }
}

impl CodebookMetrics {
    pub fn compute(
        codes: &[Code],
        hierarchy: &CodeHierarchy,
        initial_code_count: usize,
    ) -> Result<Self> {
        let total_codes = codes.len();
        let average_frequency = if codes.is_empty() {
            0.0
        } else {
            codes.iter().map(|c| f64::from(c.frequency)).sum::<f64>() / total_codes as f64
        };
        let redundancy_score = if initial_code_count == 0 {
            0.0
        } else {
            1.0 - total_codes as f64 / initial_code_count as f64
        };

        Ok(Self {
            total_codes,
            hierarchy_depth: hierarchy_depth(hierarchy)?,
            average_frequency,
            redundancy_score,
        })
    }
}

/// Step function over the number of codes
pub fn completeness_score(code_count: usize) -> f64 {
    match code_count {
        0..=4 => 0.3,
        5..=9 => 0.6,
        10..=50 => 1.0,
        51..=100 => 0.8,
        _ => 0.5,
    }
}

/// Step function over the hierarchy depth
pub fn hierarchy_score(depth: usize) -> f64 {
    match depth {
        0 => 0.5,
        1..=3 => 1.0,
        _ => 0.6,
    }
}

/// Scores a codebook against the five-criterion rubric
#[derive(Debug, Clone)]
pub struct CodebookValidator {
    threshold: f64,
}

impl CodebookValidator {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            threshold: config.codebook_threshold,
        }
    }

    pub fn validate(&self, codebook: &Codebook) -> Result<QualityAssessment> {
        let codes = &codebook.codes;
        if codes.is_empty() {
            return Err(AnalysisError::empty_input(
                "codebook must contain at least one code",
            ));
        }
        let total = codes.len() as f64;

        let clear = codes
            .iter()
            .filter(|c| c.definition.chars().count() > MIN_DEFINITION_CHARS)
            .count();
        let distinct_labels: HashSet<String> =
            codes.iter().map(|c| c.label.to_lowercase()).collect();
        let with_examples = codes.iter().filter(|c| !c.examples.is_empty()).count();
        // Recomputed rather than trusting the snapshot's metrics
        let depth = hierarchy_depth(&codebook.hierarchy)?;

        let mut scores = BTreeMap::new();
        scores.insert(CLARITY.to_string(), clear as f64 / total);
        scores.insert(
            DISTINCTIVENESS.to_string(),
            distinct_labels.len() as f64 / total,
        );
        scores.insert(COMPLETENESS.to_string(), completeness_score(codes.len()));
        scores.insert(HIERARCHY.to_string(), hierarchy_score(depth));
        scores.insert(EXAMPLES.to_string(), with_examples as f64 / total);

        let mut assessment = QualityAssessment::from_scores(scores, self.threshold);
        describe(&mut assessment, codes.len(), depth);

        log::debug!("Codebook scores: {:?}", assessment.scores);
        if assessment.passes_quality_threshold {
            log::info!(
                "Codebook of {} codes passed with {:.2}",
                codes.len(),
                assessment.overall_quality
            );
        } else {
            log::warn!(
                "Codebook of {} codes below threshold: {:.2} < {:.2}",
                codes.len(),
                assessment.overall_quality,
                self.threshold
            );
        }
        Ok(assessment)
    }
}

impl Default for CodebookValidator {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

fn describe(assessment: &mut QualityAssessment, code_count: usize, depth: usize) {
    let score = |name: &str| assessment.score(name).unwrap_or(0.0);
    let clarity = score(CLARITY);
    let distinctiveness = score(DISTINCTIVENESS);
    let completeness = score(COMPLETENESS);
    let hierarchy = score(HIERARCHY);
    let examples = score(EXAMPLES);

    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    let mut recommendations = Vec::new();

    if clarity >= 0.9 {
        strengths.push("Codes have clear, substantive definitions".to_string());
    } else if clarity < 0.7 {
        weaknesses.push(format!(
            "{:.0}% of codes lack a substantive definition",
            (1.0 - clarity) * 100.0
        ));
        recommendations.push("Add definitions that explain what each code captures".to_string());
    }

    if distinctiveness >= 1.0 {
        strengths.push("All code labels are distinct".to_string());
    } else if distinctiveness < 0.9 {
        weaknesses.push("Several codes share the same label".to_string());
        recommendations.push("Merge or rename codes with duplicate labels".to_string());
    }

    if completeness >= 1.0 {
        strengths.push(format!("{code_count} codes is a workable codebook size"));
    } else if code_count < 10 {
        weaknesses.push(format!("Only {code_count} codes; the codebook may be too thin"));
        recommendations.push("Code more of the data or split broad codes".to_string());
    } else {
        weaknesses.push(format!("{code_count} codes is hard to apply consistently"));
        recommendations.push("Consolidate overlapping codes".to_string());
    }

    if hierarchy >= 1.0 {
        strengths.push(format!("Hierarchy depth of {depth} is well organized"));
    } else if depth == 0 {
        weaknesses.push("Codes are not organized into a hierarchy".to_string());
        recommendations.push("Group related codes under parent codes".to_string());
    } else {
        weaknesses.push(format!("Hierarchy depth of {depth} is too deep"));
        recommendations.push("Flatten the hierarchy to three levels or fewer".to_string());
    }

    if examples >= 0.8 {
        strengths.push("Most codes are illustrated with examples".to_string());
    } else if examples < 0.5 {
        weaknesses.push("Most codes have no example excerpts".to_string());
        recommendations.push("Attach at least one example excerpt to each code".to_string());
    }

    assessment.strengths = strengths;
    assessment.weaknesses = weaknesses;
    assessment.recommendations = recommendations;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UsageGuidance;
    use std::collections::HashMap;

    fn code(id: &str, label: &str, definition: &str, examples: usize) -> Code {
        Code {
            id: id.to_string(),
            label: label.to_string(),
            definition: definition.to_string(),
            usage: UsageGuidance::default(),
            examples: (0..examples).map(|i| format!("excerpt {i}")).collect(),
            frequency: 2,
            children: None,
        }
    }

    fn flat_codebook(codes: Vec<Code>) -> Codebook {
        let roots = codes.iter().map(|c| c.id.clone()).collect();
        let count = codes.len();
        Codebook::build(
            codes,
            CodeHierarchy {
                root_codes: roots,
                relationships: HashMap::new(),
            },
            count,
        )
        .unwrap()
    }

    #[test]
    fn step_functions_match_rubric() {
        assert_eq!(completeness_score(4), 0.3);
        assert_eq!(completeness_score(5), 0.6);
        assert_eq!(completeness_score(9), 0.6);
        assert_eq!(completeness_score(10), 1.0);
        assert_eq!(completeness_score(50), 1.0);
        assert_eq!(completeness_score(51), 0.8);
        assert_eq!(completeness_score(100), 0.8);
        assert_eq!(completeness_score(101), 0.5);

        assert_eq!(hierarchy_score(0), 0.5);
        assert_eq!(hierarchy_score(1), 1.0);
        assert_eq!(hierarchy_score(3), 1.0);
        assert_eq!(hierarchy_score(4), 0.6);
    }

    #[test]
    fn empty_codebook_fails_fast() {
        let codebook = Codebook::build(Vec::new(), CodeHierarchy::default(), 0).unwrap();
        let err = CodebookValidator::default().validate(&codebook).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyInput(_)));
    }

    #[test]
    fn duplicate_labels_lower_distinctiveness() {
        let codes = vec![
            code("c1", "Fear", "Expressions of fear about the future", 1),
            code("c2", "fear", "Expressions of fear about the present", 1),
            code("c3", "Hope", "Expressions of hope and optimism", 1),
            code("c4", "Loss", "Talk about losing something valued", 1),
        ];
        let assessment = CodebookValidator::default()
            .validate(&flat_codebook(codes))
            .unwrap();
        assert_eq!(assessment.score(DISTINCTIVENESS), Some(0.75));
        assert!(assessment
            .recommendations
            .iter()
            .any(|r| r.contains("duplicate labels")));
    }

    #[test]
    fn well_formed_codebook_passes() {
        let codes: Vec<Code> = (0..12)
            .map(|i| {
                code(
                    &format!("c{i}"),
                    &format!("Label {i}"),
                    "A definition that is long enough",
                    1,
                )
            })
            .collect();
        let assessment = CodebookValidator::default()
            .validate(&flat_codebook(codes))
            .unwrap();
        assert_eq!(assessment.score(CLARITY), Some(1.0));
        assert_eq!(assessment.score(COMPLETENESS), Some(1.0));
        assert_eq!(assessment.score(HIERARCHY), Some(1.0));
        assert_eq!(assessment.overall_quality, 1.0);
        assert!(assessment.passes_quality_threshold);
        assert!(assessment.weaknesses.is_empty());
    }

    #[test]
    fn short_definitions_are_not_clear() {
        let codes = vec![
            code("c1", "A", "too short", 0),
            code("c2", "B", "exactly10c", 0),
            code("c3", "C", "long enough definition", 0),
            code("c4", "D", "another long definition", 0),
        ];
        let assessment = CodebookValidator::default()
            .validate(&flat_codebook(codes))
            .unwrap();
        assert_eq!(assessment.score(CLARITY), Some(0.5));
        assert_eq!(assessment.score(EXAMPLES), Some(0.0));
        assert!(!assessment.passes_quality_threshold);
        assert!(!assessment.warnings().is_empty());
    }

    #[test]
    fn validation_is_idempotent() {
        let codes = vec![
            code("c1", "A", "long enough definition", 1),
            code("c2", "B", "short", 0),
        ];
        let codebook = flat_codebook(codes);
        let validator = CodebookValidator::default();
        let first = validator.validate(&codebook).unwrap();
        let second = validator.validate(&codebook).unwrap();
        assert_eq!(first, second);
        assert!((0.0..=1.0).contains(&first.overall_quality));
    }

    #[test]
    fn metrics_capture_redundancy_and_depth() {
        let codes = vec![code("a", "A", "", 0), code("b", "B", "", 0)];
        let mut relationships = HashMap::new();
        relationships.insert("a".to_string(), vec!["b".to_string()]);
        let codebook = Codebook::build(
            codes,
            CodeHierarchy {
                root_codes: vec!["a".to_string()],
                relationships,
            },
            4,
        )
        .unwrap();
        assert_eq!(codebook.metrics.total_codes, 2);
        assert_eq!(codebook.metrics.hierarchy_depth, 2);
        assert_eq!(codebook.metrics.redundancy_score, 0.5);
        assert_eq!(codebook.metrics.average_frequency, 2.0);
    }
}
