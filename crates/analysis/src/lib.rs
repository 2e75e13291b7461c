//! # Qualcode Analysis
//!
//! Deterministic validation, classification and structuring of qualitative-analysis results
//! produced by a generative-text service.
//!
//! ## Features
//!
//! - **Codebook and theme rubrics** - fixed-criterion quality scores with strengths,
//!   weaknesses and recommendations
//! - **Saturation detection** - heuristic signal over theme evidence
//! - **Paradigm model** - rule-based assignment of themes into causal slots
//! - **Relationship inference** - directed, strength-weighted links between categories
//! - **Narrative assembly** - templated storyline and propositions for a grounded theory
//!
//! ## Architecture
//!
//! ```text
//! Codes + CodeHierarchy
//!     │
//!     ├──> Hierarchy Depth (petgraph, cycle-guarded)
//!     └──> Codebook Validator
//!
//! Themes (drafted upstream)
//!     │
//!     ├──> Theme Validator + Saturation
//!     │
//!     └──> Theory Builder
//!            ├─ Paradigm Classifier
//!            ├─ Relationship Engine
//!            ├─ Narrative Assembler
//!            └─ Theory Validator
//! ```
//!
//! ## Example
//!
//! ```rust
//! use qualcode_analysis::{format_list, hierarchy_depth, CodeHierarchy};
//! use std::collections::HashMap;
//!
//! let mut relationships = HashMap::new();
//! relationships.insert("A".to_string(), vec!["B".to_string(), "C".to_string()]);
//! relationships.insert("B".to_string(), vec!["D".to_string()]);
//! let hierarchy = CodeHierarchy { root_codes: vec!["A".to_string()], relationships };
//! assert_eq!(hierarchy_depth(&hierarchy).unwrap(), 3);
//!
//! let items = vec!["x".to_string(), "y".to_string(), "z".to_string()];
//! assert_eq!(format_list(&items), "x, y, and z");
//! ```

mod builder;
mod codebook;
mod config;
mod error;
mod extract;
mod hierarchy;
mod methodology;
mod narrative;
mod paradigm;
mod relationships;
mod themes;
mod theory;
mod types;

pub use builder::{TheoryBuilder, TheoryDraft};
pub use codebook::{completeness_score, hierarchy_score, CodebookValidator};
pub use config::{AnalysisConfig, QualcodeConfig};
pub use error::{AnalysisError, Result};
pub use extract::{extract_json, parse_upstream, parse_upstream_field};
pub use hierarchy::{hierarchy_depth, HierarchyGraph};
pub use methodology::{Methodology, MethodologyCatalog};
pub use narrative::{format_list, NarrativeAssembler};
pub use paradigm::{
    classify_paradigm, code_labels, most_prevalent, ClassificationInput, KeywordClassifier,
    KeywordRule, ParadigmClassifier,
};
pub use relationships::{
    divergent_pairs, shared_codes, KeywordRelationshipRules, RelationshipEngine,
    RelationshipRules,
};
pub use themes::{average_pairwise_overlap, saturation_reached, shared_code_count, ThemeValidator};
pub use theory::TheoryValidator;
pub use types::{
    CategoryRelationship, Code, CodeHierarchy, Codebook, CodebookMetrics, GroundedTheory,
    ParadigmModel, ParadigmSlot, Prevalence, QualityAssessment, Quote, RelationshipStrength,
    RelationshipType, Subtheme, Theme, ThemeAssessment, ThemeRelationship, ThemeSet,
    UsageGuidance,
};

/// Criterion names used as keys in [`QualityAssessment::scores`]
pub mod criteria {
    pub use crate::codebook::{CLARITY, COMPLETENESS, EXAMPLES, HIERARCHY};
    pub use crate::themes::{COHERENCE, COVERAGE, DATA_SUPPORT, PREVALENCE, RELEVANCE};
    pub use crate::theory::{CREDIBILITY, ORIGINALITY, RESONANCE, USEFULNESS};

    /// Shared by the codebook and theme rubrics
    pub const DISTINCTIVENESS: &str = "distinctiveness";
}
