//! Directed relationship inference between categories.
//!
//! Every ordered pair of themes is evaluated on its own, so (A, B) and (B, A) can carry
//! different relationship types. [`divergent_pairs`] surfaces those cases.

use crate::types::{CategoryRelationship, RelationshipStrength, RelationshipType, Theme};
use std::collections::{HashMap, HashSet};

/// Picks a relationship type and explanation for an ordered pair of category names
pub trait RelationshipRules: Send + Sync {
    fn relationship_type(&self, from: &str, to: &str) -> (RelationshipType, String);
}

/// Default keyword rules over lower-cased names
#[derive(Debug, Clone, Default)]
pub struct KeywordRelationshipRules;

impl RelationshipRules for KeywordRelationshipRules {
    fn relationship_type(&self, from: &str, to: &str) -> (RelationshipType, String) {
        let a = from.to_lowercase();
        let b = to.to_lowercase();

        if a.contains("challeng") && b.contains("strateg") {
            (
                RelationshipType::Triggers,
                "challenges trigger strategies".to_string(),
            )
        } else if a.contains("strateg") && b.contains("outcome") {
            (
                RelationshipType::Causes,
                "strategies lead to outcomes".to_string(),
            )
        } else if a.contains("context") || a.contains("factor") {
            (
                RelationshipType::Influences,
                "contextual factors influence other processes".to_string(),
            )
        } else {
            (
                RelationshipType::Influences,
                format!("{from} influences {to} through shared supporting codes"),
            )
        }
    }
}

pub struct RelationshipEngine {
    rules: Box<dyn RelationshipRules>,
}

impl RelationshipEngine {
    pub fn new(rules: Box<dyn RelationshipRules>) -> Self {
        Self { rules }
    }

    /// One relationship per ordered pair sharing at least one related code, in input order
    pub fn infer(&self, themes: &[Theme]) -> Vec<CategoryRelationship> {
        let mut out = Vec::new();
        for (i, a) in themes.iter().enumerate() {
            for (j, b) in themes.iter().enumerate() {
                if i == j {
                    continue;
                }
                let shared = shared_codes(a, b);
                let Some(strength) = RelationshipStrength::from_shared_count(shared.len()) else {
                    continue;
                };
                let (relationship_type, explanation) =
                    self.rules.relationship_type(&a.name, &b.name);
                out.push(CategoryRelationship {
                    from: a.name.clone(),
                    to: b.name.clone(),
                    relationship_type,
                    explanation,
                    strength,
                    shared_codes: shared,
                });
            }
        }
        log::debug!(
            "Inferred {} relationships across {} themes",
            out.len(),
            themes.len()
        );
        out
    }
}

impl Default for RelationshipEngine {
    fn default() -> Self {
        Self::new(Box::new(KeywordRelationshipRules))
    }
}

/// Related codes of `a` that `b` also lists, in `a`'s order without duplicates
pub fn shared_codes(a: &Theme, b: &Theme) -> Vec<String> {
    let b_codes: HashSet<&str> = b.related_codes.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    a.related_codes
        .iter()
        .filter(|c| b_codes.contains(c.as_str()) && seen.insert(c.as_str()))
        .cloned()
        .collect()
}

/// Unordered pairs whose two directions were given different relationship types
pub fn divergent_pairs(
    relationships: &[CategoryRelationship],
) -> Vec<(String, String, RelationshipType, RelationshipType)> {
    let by_pair: HashMap<(&str, &str), RelationshipType> = relationships
        .iter()
        .map(|r| ((r.from.as_str(), r.to.as_str()), r.relationship_type))
        .collect();

    relationships
        .iter()
        .filter(|r| r.from < r.to)
        .filter_map(|r| {
            let reverse = by_pair.get(&(r.to.as_str(), r.from.as_str()))?;
            (*reverse != r.relationship_type).then(|| {
                (
                    r.from.clone(),
                    r.to.clone(),
                    r.relationship_type,
                    *reverse,
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme(name: &str, codes: &[&str]) -> Theme {
        Theme {
            id: name.to_string(),
            name: name.to_string(),
            related_codes: codes.iter().map(|c| c.to_string()).collect(),
            ..Theme::default()
        }
    }

    #[test]
    fn no_shared_codes_no_relationship() {
        let themes = vec![
            theme("Daily challenges", &["c1"]),
            theme("Coping strategies", &["c2"]),
        ];
        assert!(RelationshipEngine::default().infer(&themes).is_empty());
    }

    #[test]
    fn strength_follows_shared_count() {
        let themes = vec![
            theme("A", &["c1", "c2", "c3"]),
            theme("B", &["c1", "c2", "c3", "c4"]),
            theme("C", &["c1", "c2"]),
            theme("D", &["c4"]),
        ];
        let rels = RelationshipEngine::default().infer(&themes);
        let find = |from: &str, to: &str| {
            rels.iter()
                .find(|r| r.from == from && r.to == to)
                .map(|r| r.strength)
        };
        assert_eq!(find("A", "B"), Some(RelationshipStrength::Strong));
        assert_eq!(find("A", "C"), Some(RelationshipStrength::Moderate));
        assert_eq!(find("B", "D"), Some(RelationshipStrength::Weak));
        assert_eq!(find("A", "D"), None);
    }

    #[test]
    fn directions_are_evaluated_independently() {
        let themes = vec![
            theme("Daily challenges", &["c1", "c2"]),
            theme("Coping strategies", &["c1", "c2"]),
            theme("Recovery outcomes", &["c2"]),
        ];
        let rels = RelationshipEngine::default().infer(&themes);
        assert_eq!(rels.len(), 6);

        assert_eq!(rels[0].from, "Daily challenges");
        assert_eq!(rels[0].to, "Coping strategies");
        assert_eq!(rels[0].relationship_type, RelationshipType::Triggers);
        assert_eq!(rels[0].explanation, "challenges trigger strategies");

        let strat_to_outcome = rels
            .iter()
            .find(|r| r.from == "Coping strategies" && r.to == "Recovery outcomes")
            .unwrap();
        assert_eq!(strat_to_outcome.relationship_type, RelationshipType::Causes);

        let back = rels
            .iter()
            .find(|r| r.from == "Coping strategies" && r.to == "Daily challenges")
            .unwrap();
        assert_eq!(back.relationship_type, RelationshipType::Influences);
        assert!(back.explanation.contains("Coping strategies"));

        // Known quirk: the two directions disagree
        let divergent = divergent_pairs(&rels);
        assert!(divergent.iter().any(|(a, b, _, _)| {
            a == "Coping strategies" && b == "Daily challenges"
        }));
    }

    #[test]
    fn context_rule_applies_to_source_only() {
        let themes = vec![
            theme("Organizational context", &["c1"]),
            theme("Peer support", &["c1"]),
        ];
        let rels = RelationshipEngine::default().infer(&themes);
        assert_eq!(
            rels[0].explanation,
            "contextual factors influence other processes"
        );
        assert_ne!(
            rels[1].explanation,
            "contextual factors influence other processes"
        );
    }

    #[test]
    fn shared_codes_keep_source_order() {
        let a = theme("A", &["c3", "c1", "c3", "c2"]);
        let b = theme("B", &["c1", "c2", "c3"]);
        assert_eq!(shared_codes(&a, &b), vec!["c3", "c1", "c2"]);
    }
}
