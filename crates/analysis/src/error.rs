use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A validator or classifier was handed zero codes/themes
    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A cycle reachable from a root code
    #[error("Malformed hierarchy: cycle through {parent} -> {child}")]
    MalformedHierarchy { parent: String, child: String },

    /// Generative-service output that could not be parsed into the expected shape
    #[error("Malformed upstream output: {0}")]
    MalformedUpstreamOutput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl AnalysisError {
    pub fn empty_input(what: impl Into<String>) -> Self {
        Self::EmptyInput(what.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn malformed_upstream(msg: impl Into<String>) -> Self {
        Self::MalformedUpstreamOutput(msg.into())
    }

    /// Stable machine-readable code, used by the tool surface error envelope
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyInput(_) => "empty_input",
            Self::InvalidInput(_) => "invalid_request",
            Self::MalformedHierarchy { .. } => "malformed_hierarchy",
            Self::MalformedUpstreamOutput(_) => "malformed_upstream_output",
            Self::InvalidConfig(_) => "invalid_config",
            Self::Io(_) | Self::Toml(_) => "internal",
        }
    }
}
