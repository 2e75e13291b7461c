//! Subcommand implementations: parse input text, run the core, return JSON plus warnings.

use anyhow::{Context as AnyhowContext, Result};
use qualcode_analysis::{
    divergent_pairs, extract_json, saturation_reached, AnalysisConfig, Code, CodeHierarchy,
    Codebook, CodebookValidator, GroundedTheory, HierarchyGraph, MethodologyCatalog,
    RelationshipEngine, Theme, ThemeValidator, TheoryBuilder, TheoryDraft, TheoryValidator,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

/// Command result: JSON for stdout, warnings for stderr
pub struct CommandOutput {
    pub value: Value,
    pub warnings: Vec<String>,
}

impl CommandOutput {
    fn new(value: Value) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }
}

/// Whole text as JSON, else the JSON embedded in generative-service output
fn input_value(text: &str) -> Result<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Ok(value);
    }
    Ok(extract_json(text)?)
}

/// Parse `T`, unwrapping `{"<field>": ...}` when present
pub fn parse_input<T: DeserializeOwned>(text: &str, field: &str) -> Result<T> {
    let value = match input_value(text)? {
        Value::Object(mut map) if map.contains_key(field) => map.remove(field).unwrap_or_default(),
        other => other,
    };
    serde_json::from_value(value).with_context(|| format!("input is not a valid {field}"))
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).context("serialize output")
}

pub fn depth(text: &str) -> Result<CommandOutput> {
    let hierarchy: CodeHierarchy = parse_input(text, "hierarchy")?;
    let graph = HierarchyGraph::from_hierarchy(&hierarchy);
    let depth = graph.max_depth()?;
    let unreachable = graph.unreachable_codes();
    let warnings = if unreachable.is_empty() {
        Vec::new()
    } else {
        vec![format!("codes not reachable from any root: {}", unreachable.join(", "))]
    };
    Ok(CommandOutput::new(json!({
        "depth": depth,
        "unreachableCodes": unreachable,
    }))
    .with_warnings(warnings))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CodebookInput {
    codes: Vec<Code>,
    #[serde(default)]
    hierarchy: CodeHierarchy,
}

pub fn codebook(
    text: &str,
    initial_code_count: Option<usize>,
    config: &AnalysisConfig,
) -> Result<CommandOutput> {
    let input: CodebookInput = parse_input(text, "codebook")?;
    let initial = initial_code_count.unwrap_or(input.codes.len());
    let codebook = Codebook::build(input.codes, input.hierarchy, initial)?;
    let assessment = CodebookValidator::new(config).validate(&codebook)?;
    let warnings = assessment.warnings();
    Ok(CommandOutput::new(json!({
        "metrics": to_value(&codebook.metrics)?,
        "assessment": to_value(&assessment)?,
    }))
    .with_warnings(warnings))
}

pub fn themes(text: &str, expected: u32, config: &AnalysisConfig) -> Result<CommandOutput> {
    let themes: Vec<Theme> = parse_input(text, "themes")?;
    let assessment = ThemeValidator::new(config).validate(&themes, expected)?;
    let mut warnings = assessment.quality.warnings();
    if !assessment.saturation_reached {
        warnings.push("theoretical saturation not reached".to_string());
    }
    Ok(CommandOutput::new(to_value(&assessment)?).with_warnings(warnings))
}

pub fn theory(
    text: &str,
    draft: Option<&str>,
    labels: Option<&str>,
    config: &AnalysisConfig,
) -> Result<CommandOutput> {
    let themes: Vec<Theme> = parse_input(text, "themes")?;
    let labels: HashMap<String, String> = match labels {
        Some(raw) => serde_json::from_str(raw).context("labels must be a JSON object of id -> label")?,
        None => HashMap::new(),
    };
    let draft = match draft {
        Some(raw) => {
            let value: Value = serde_json::from_str(raw).context("draft is not JSON")?;
            let explicit = value.get("saturationReached").is_some();
            let mut draft: TheoryDraft =
                serde_json::from_value(value).context("draft has the wrong shape")?;
            if !explicit {
                draft.saturation_reached = saturation_reached(&themes);
            }
            draft
        }
        None => TheoryDraft {
            saturation_reached: saturation_reached(&themes),
            ..TheoryDraft::default()
        },
    };

    let theory = TheoryBuilder::new(config).build(&themes, &labels, draft)?;
    let warnings = theory
        .quality
        .as_ref()
        .map(|q| q.warnings())
        .unwrap_or_default();
    Ok(CommandOutput::new(to_value(&theory)?).with_warnings(warnings))
}

pub fn validate_theory(text: &str, config: &AnalysisConfig) -> Result<CommandOutput> {
    let theory: GroundedTheory = parse_input(text, "theory")?;
    let assessment = TheoryValidator::new(config).validate(&theory);
    let warnings = assessment.warnings();
    Ok(CommandOutput::new(to_value(&assessment)?).with_warnings(warnings))
}

pub fn relationships(text: &str) -> Result<CommandOutput> {
    let themes: Vec<Theme> = parse_input(text, "themes")?;
    let relationships = RelationshipEngine::default().infer(&themes);
    let divergent: Vec<Value> = divergent_pairs(&relationships)
        .into_iter()
        .map(|(a, b, forward, reverse)| {
            json!({ "a": a, "b": b, "forward": forward, "reverse": reverse })
        })
        .collect();
    Ok(CommandOutput::new(json!({
        "relationships": to_value(&relationships)?,
        "divergentPairs": divergent,
    })))
}

pub fn extract(text: &str) -> Result<CommandOutput> {
    Ok(CommandOutput::new(extract_json(text)?))
}

pub fn guidance(
    catalog: &MethodologyCatalog,
    methodology: &str,
    stage: &str,
    prompt: Option<&str>,
) -> Result<CommandOutput> {
    if catalog.get(methodology).is_none() {
        let known: Vec<&str> = catalog.ids().collect();
        anyhow::bail!(
            "unknown methodology '{methodology}' (known: {})",
            known.join(", ")
        );
    }
    let guidance = catalog.stage_guidance(methodology, stage);
    let warnings = if guidance.is_none() {
        vec![format!("no guidance for stage '{stage}' in '{methodology}'")]
    } else {
        Vec::new()
    };
    let mut value = json!({
        "methodology": methodology,
        "stage": stage,
        "guidance": guidance,
    });
    if let Some(prompt) = prompt {
        value["prompt"] = Value::String(catalog.append_guidance(prompt, methodology, stage));
    }
    Ok(CommandOutput::new(value).with_warnings(warnings))
}
