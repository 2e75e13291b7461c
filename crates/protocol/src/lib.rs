use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const CAPABILITIES_SCHEMA_VERSION: u32 = 1;

/// Stage of a grounded-theory analysis, used to look up methodology guidance
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStage {
    OpenCoding,
    AxialCoding,
    SelectiveCoding,
    ThemeDevelopment,
    TheoryBuilding,
}

impl AnalysisStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenCoding => "open_coding",
            Self::AxialCoding => "axial_coding",
            Self::SelectiveCoding => "selective_coding",
            Self::ThemeDevelopment => "theme_development",
            Self::TheoryBuilding => "theory_building",
        }
    }
}

/// Grounded-theory tradition a theory is framed in
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TheoryParadigm {
    #[default]
    Straussian,
    Glaserian,
    Constructivist,
}

impl TheoryParadigm {
    /// Methodology identifier in the guidance catalog
    pub fn methodology_id(&self) -> &'static str {
        match self {
            Self::Straussian => "straussian",
            Self::Glaserian => "glaserian",
            Self::Constructivist => "constructivist",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisDepth {
    Surface,
    #[default]
    Standard,
    Deep,
}

/// How codes were derived: from the data, from a framework, or both
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CodingMode {
    #[default]
    Inductive,
    Deductive,
    Hybrid,
}

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct ToolNextAction {
    pub tool: String,
    pub args: serde_json::Value,
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
    pub hint: Option<String>,
    #[serde(default)]
    pub next_actions: Vec<ToolNextAction>,
}

impl ErrorEnvelope {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            hint: None,
            next_actions: Vec::new(),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_next_action(mut self, action: ToolNextAction) -> Self {
        self.next_actions.push(action);
        self
    }
}

/// Successful tool output: the core result plus warnings for below-threshold quality
#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct ToolResponse<T> {
    pub project: String,
    pub result: T,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl<T> ToolResponse<T> {
    pub fn new(project: impl Into<String>, result: T) -> Self {
        Self {
            project: project.into(),
            result,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct CapabilitiesServer {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct Thresholds {
    pub codebook: f64,
    pub themes: f64,
    pub theory: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct Capabilities {
    pub schema_version: u32,
    pub server: CapabilitiesServer,
    pub tools: Vec<String>,
    pub methodologies: Vec<String>,
    pub thresholds: Thresholds,
    pub start_route: ToolNextAction,
}

/// Trimmed, non-empty project name
pub fn validate_project_name(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("project name must be a non-empty string");
    }
    if trimmed.chars().any(char::is_control) {
        anyhow::bail!("project name must not contain control characters");
    }
    Ok(trimmed.to_string())
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}
