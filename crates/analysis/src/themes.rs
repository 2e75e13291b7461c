use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::types::{QualityAssessment, Theme, ThemeAssessment};
use std::collections::{BTreeMap, HashSet};

pub const COHERENCE: &str = "coherence";
pub const DISTINCTIVENESS: &str = "distinctiveness";
pub const DATA_SUPPORT: &str = "dataSupport";
pub const RELEVANCE: &str = "relevance";
pub const PREVALENCE: &str = "prevalence";
pub const COVERAGE: &str = "coverage";

const MIN_STATEMENT_CHARS: usize = 10;
/// Mean shared-code count at which distinctiveness bottoms out
const OVERLAP_CEILING: f64 = 3.0;
/// Mean quotes per theme that earns full data support
const QUOTES_FOR_FULL_SUPPORT: f64 = 5.0;

const MIN_THEMES: usize = 3;
const MAX_THEMES: usize = 8;
const SATURATION_MIN_QUOTES: usize = 3;
const SATURATION_MIN_PARTICIPANTS: u32 = 3;
const SATURATION_PARTICIPANT_SHARE: f64 = 0.3;

/// Number of related-code identifiers two themes have in common
pub fn shared_code_count(a: &Theme, b: &Theme) -> usize {
    let b_codes: HashSet<&str> = b.related_codes.iter().map(String::as_str).collect();
    a.related_codes
        .iter()
        .map(String::as_str)
        .collect::<HashSet<_>>()
        .intersection(&b_codes)
        .count()
}

/// Mean shared-code count over all unordered theme pairs, 0 with fewer than two themes
pub fn average_pairwise_overlap(themes: &[Theme]) -> f64 {
    let mut pairs = 0usize;
    let mut shared = 0usize;
    for (i, a) in themes.iter().enumerate() {
        for b in &themes[i + 1..] {
            pairs += 1;
            shared += shared_code_count(a, b);
        }
    }
    if pairs == 0 {
        0.0
    } else {
        shared as f64 / pairs as f64
    }
}

/// Heuristic signal that more analysis is unlikely to surface new themes
pub fn saturation_reached(themes: &[Theme]) -> bool {
    themes.len() >= MIN_THEMES
        && themes.iter().all(|theme| {
            let share = (f64::from(theme.prevalence.total_participants)
                * SATURATION_PARTICIPANT_SHARE)
                .floor() as u32;
            let required = SATURATION_MIN_PARTICIPANTS.min(share);
            theme.quotes.len() >= SATURATION_MIN_QUOTES && theme.prevalence.participants >= required
        })
}

/// Scores a theme set against the six-criterion rubric and computes saturation
#[derive(Debug, Clone)]
pub struct ThemeValidator {
    threshold: f64,
}

impl ThemeValidator {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            threshold: config.theme_threshold,
        }
    }

    pub fn validate(&self, themes: &[Theme], expected_data_points: u32) -> Result<ThemeAssessment> {
        if themes.is_empty() {
            return Err(AnalysisError::empty_input("theme set must contain at least one theme"));
        }
        if expected_data_points == 0 {
            return Err(AnalysisError::invalid_input(
                "expected data point count must be greater than zero",
            ));
        }
        let total = themes.len() as f64;

        let coherent = themes
            .iter()
            .filter(|t| t.central_concept.chars().count() > MIN_STATEMENT_CHARS)
            .count();
        let relevant = themes
            .iter()
            .filter(|t| t.significance.chars().count() > MIN_STATEMENT_CHARS)
            .count();
        let average_quotes = themes.iter().map(|t| t.quotes.len()).sum::<usize>() as f64 / total;
        let prevalence = themes.iter().map(|t| t.prevalence.fraction()).sum::<f64>() / total;
        let data_points: u64 = themes
            .iter()
            .map(|t| u64::from(t.prevalence.data_points))
            .sum();

        let mut scores = BTreeMap::new();
        scores.insert(COHERENCE.to_string(), coherent as f64 / total);
        scores.insert(
            DISTINCTIVENESS.to_string(),
            (1.0 - average_pairwise_overlap(themes) / OVERLAP_CEILING).max(0.0),
        );
        scores.insert(
            DATA_SUPPORT.to_string(),
            (average_quotes / QUOTES_FOR_FULL_SUPPORT).min(1.0),
        );
        scores.insert(RELEVANCE.to_string(), relevant as f64 / total);
        scores.insert(PREVALENCE.to_string(), prevalence);
        scores.insert(
            COVERAGE.to_string(),
            (data_points as f64 / f64::from(expected_data_points)).min(1.0),
        );

        let mut quality = QualityAssessment::from_scores(scores, self.threshold);
        describe(&mut quality, themes.len());
        let saturation = saturation_reached(themes);

        log::debug!("Theme scores: {:?}", quality.scores);
        if quality.passes_quality_threshold {
            log::info!(
                "{} themes passed with {:.2} (saturation: {saturation})",
                themes.len(),
                quality.overall_quality
            );
        } else {
            log::warn!(
                "{} themes below threshold: {:.2} < {:.2}",
                themes.len(),
                quality.overall_quality,
                self.threshold
            );
        }

        Ok(ThemeAssessment {
            quality,
            saturation_reached: saturation,
        })
    }
}

impl Default for ThemeValidator {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

fn describe(assessment: &mut QualityAssessment, theme_count: usize) {
    let score = |name: &str| assessment.score(name).unwrap_or(0.0);
    let coherence = score(COHERENCE);
    let distinctiveness = score(DISTINCTIVENESS);
    let data_support = score(DATA_SUPPORT);
    let relevance = score(RELEVANCE);
    let coverage = score(COVERAGE);

    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    let mut recommendations = Vec::new();

    if theme_count < MIN_THEMES {
        weaknesses.push(format!("Too few themes ({theme_count})"));
        recommendations.push("Look for additional patterns across the codes".to_string());
    } else if theme_count > MAX_THEMES {
        weaknesses.push(format!("Too many themes ({theme_count}), consider grouping"));
        recommendations.push("Group related themes under broader themes".to_string());
    } else {
        strengths.push(format!("{theme_count} themes is a manageable set"));
    }

    if coherence >= 0.9 {
        strengths.push("Themes have clear central organizing concepts".to_string());
    } else if coherence < 0.7 {
        weaknesses.push("Some themes lack a central organizing concept".to_string());
        recommendations.push("State the central concept that unites each theme".to_string());
    }

    if distinctiveness >= 0.8 {
        strengths.push("Themes are distinct from one another".to_string());
    } else if distinctiveness < 0.5 {
        weaknesses.push("Themes overlap heavily in their supporting codes".to_string());
        recommendations.push("Merge overlapping themes or sharpen their boundaries".to_string());
    }

    if data_support >= 0.8 {
        strengths.push("Themes are well supported by quotes".to_string());
    } else if data_support < 0.6 {
        weaknesses.push("Themes have few supporting quotes".to_string());
        recommendations.push("Add representative quotes to each theme".to_string());
    }

    if relevance < 0.7 {
        weaknesses.push("Some themes do not state their significance".to_string());
        recommendations.push("Explain why each theme matters for the research question".to_string());
    }

    if coverage < 0.5 {
        weaknesses.push("Themes cover less than half of the data".to_string());
        recommendations.push("Review uncoded data for missing themes".to_string());
    }

    assessment.strengths = strengths;
    assessment.weaknesses = weaknesses;
    assessment.recommendations = recommendations;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Prevalence, Quote};

    fn theme(id: &str, codes: &[&str], quotes: usize, participants: u32, total: u32) -> Theme {
        Theme {
            id: id.to_string(),
            name: format!("Theme {id}"),
            central_concept: "A clearly stated central concept".to_string(),
            definition: String::new(),
            subthemes: Vec::new(),
            related_codes: codes.iter().map(|c| c.to_string()).collect(),
            quotes: (0..quotes)
                .map(|i| Quote {
                    text: format!("quote {i}"),
                    ..Quote::default()
                })
                .collect(),
            prevalence: Prevalence {
                participants,
                total_participants: total,
                data_points: 10,
            },
            significance: "Matters for the research question".to_string(),
        }
    }

    #[test]
    fn full_overlap_of_three_codes_zeroes_distinctiveness() {
        let themes = vec![
            theme("a", &["c1", "c2", "c3"], 5, 5, 10),
            theme("b", &["c1", "c2", "c3"], 5, 5, 10),
        ];
        assert_eq!(average_pairwise_overlap(&themes), 3.0);
        let assessment = ThemeValidator::default().validate(&themes, 20).unwrap();
        assert_eq!(assessment.quality.score(DISTINCTIVENESS), Some(0.0));
    }

    #[test]
    fn two_themes_never_saturate() {
        let themes = vec![theme("a", &[], 10, 10, 10), theme("b", &[], 10, 10, 10)];
        assert!(!saturation_reached(&themes));
    }

    #[test]
    fn saturation_requires_quotes_and_participants() {
        let mut themes = vec![
            theme("a", &[], 3, 3, 10),
            theme("b", &[], 3, 3, 10),
            theme("c", &[], 3, 3, 10),
        ];
        assert!(saturation_reached(&themes));

        themes[2].quotes.pop();
        assert!(!saturation_reached(&themes));

        themes[2].quotes.push(Quote::default());
        themes[2].prevalence.participants = 2;
        assert!(!saturation_reached(&themes));
    }

    #[test]
    fn small_samples_lower_the_participant_bar() {
        // floor(5 * 0.3) = 1, so one participant is enough
        let themes = vec![
            theme("a", &[], 3, 1, 5),
            theme("b", &[], 3, 1, 5),
            theme("c", &[], 3, 1, 5),
        ];
        assert!(saturation_reached(&themes));
    }

    #[test]
    fn coverage_and_support_are_capped() {
        let themes = vec![
            theme("a", &["c1"], 12, 6, 10),
            theme("b", &["c2"], 8, 4, 10),
            theme("c", &["c3"], 10, 5, 10),
        ];
        let assessment = ThemeValidator::default().validate(&themes, 10).unwrap();
        let q = &assessment.quality;
        assert_eq!(q.score(COVERAGE), Some(1.0));
        assert_eq!(q.score(DATA_SUPPORT), Some(1.0));
        assert_eq!(q.score(DISTINCTIVENESS), Some(1.0));
        assert!((q.score(PREVALENCE).unwrap() - 0.5).abs() < 1e-9);
        assert!(q.passes_quality_threshold);
        assert!(q.strengths.iter().any(|s| s.starts_with("3 themes")));
    }

    #[test]
    fn theme_count_feedback() {
        let few = vec![theme("a", &[], 5, 5, 10)];
        let assessment = ThemeValidator::default().validate(&few, 10).unwrap();
        assert!(assessment.quality.weaknesses[0].starts_with("Too few themes"));

        let many: Vec<Theme> = (0..9).map(|i| theme(&i.to_string(), &[], 5, 5, 10)).collect();
        let assessment = ThemeValidator::default().validate(&many, 90).unwrap();
        assert!(assessment.quality.weaknesses[0].contains("consider grouping"));
    }

    #[test]
    fn rejects_empty_and_zero_expected() {
        assert!(matches!(
            ThemeValidator::default().validate(&[], 10),
            Err(AnalysisError::EmptyInput(_))
        ));
        let themes = vec![theme("a", &[], 1, 1, 1)];
        assert!(matches!(
            ThemeValidator::default().validate(&themes, 0),
            Err(AnalysisError::InvalidInput(_))
        ));
    }
}
