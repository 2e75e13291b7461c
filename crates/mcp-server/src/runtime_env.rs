use qualcode_analysis::QualcodeConfig;
use std::env;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "QUALCODE_CONFIG";
pub const DATA_DIR_ENV: &str = "QUALCODE_DATA_DIR";

const DEFAULT_DATA_DIR: &str = ".qualcode/projects";

/// Process-level settings resolved once at startup
#[derive(Debug, Clone)]
pub struct RuntimeEnv {
    pub config: QualcodeConfig,
    pub data_dir: PathBuf,
    /// Problems found while resolving; the server still starts with defaults
    pub warnings: Vec<String>,
}

impl RuntimeEnv {
    pub fn from_env() -> Self {
        Self::resolve(env_path(CONFIG_ENV).as_deref(), env_path(DATA_DIR_ENV))
    }

    pub fn resolve(config_path: Option<&Path>, data_dir: Option<PathBuf>) -> Self {
        let mut warnings = Vec::new();

        let config = match config_path {
            None => QualcodeConfig::default(),
            Some(path) => match QualcodeConfig::from_file(path) {
                Ok(config) => config,
                Err(err) => {
                    warnings.push(format!(
                        "ignoring config {} ({err}); using defaults",
                        path.display()
                    ));
                    QualcodeConfig::default()
                }
            },
        };

        let data_dir = data_dir.unwrap_or_else(|| {
            dirs::home_dir()
                .map(|home| home.join(DEFAULT_DATA_DIR))
                .unwrap_or_else(|| {
                    warnings.push(format!(
                        "home_dir unavailable; storing projects under ./{DEFAULT_DATA_DIR}"
                    ));
                    PathBuf::from(DEFAULT_DATA_DIR)
                })
        });

        Self {
            config,
            data_dir,
            warnings,
        }
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    let value = env::var(key).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_data_dir_wins() {
        let env = RuntimeEnv::resolve(None, Some(PathBuf::from("/tmp/qc")));
        assert_eq!(env.data_dir, PathBuf::from("/tmp/qc"));
        assert!(env.warnings.is_empty());
        assert_eq!(env.config.analysis.theory_threshold, 0.65);
    }

    #[test]
    fn broken_config_falls_back_with_warning() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("qualcode.toml");
        std::fs::write(&path, "[analysis]\ncodebook_threshold = 3.0\n").unwrap();

        let env = RuntimeEnv::resolve(Some(&path), Some(tmp.path().to_path_buf()));
        assert_eq!(env.warnings.len(), 1);
        assert!(env.warnings[0].contains("using defaults"));
        assert_eq!(env.config.analysis.codebook_threshold, 0.7);
    }

    #[test]
    fn valid_config_is_loaded() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("qualcode.toml");
        std::fs::write(&path, "[analysis]\ntheory_threshold = 0.5\n").unwrap();

        let env = RuntimeEnv::resolve(Some(&path), Some(tmp.path().to_path_buf()));
        assert!(env.warnings.is_empty());
        assert_eq!(env.config.analysis.theory_threshold, 0.5);
    }
}
