use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_SOURCE_WORKBOOK: &str = "db_source.xlsx";
pub const DEFAULT_TEMPLATE_DATABASE: &str = "vitaminav.template.db";
pub const DEFAULT_TARGET_DATABASE: &str = "../../assets/vitaminav.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub source_workbook: PathBuf,
    pub template_database: PathBuf,
    pub target_database: PathBuf,
    pub failure_policy: FailurePolicy,
}

/// What the loader does when a row cannot be parsed or inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Record the failed row, keep loading, and fail the run at the end.
    #[default]
    Collect,
    /// Stop at the first failed row and roll the load back.
    Abort,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_workbook: PathBuf::from(DEFAULT_SOURCE_WORKBOOK),
            template_database: PathBuf::from(DEFAULT_TEMPLATE_DATABASE),
            target_database: PathBuf::from(DEFAULT_TARGET_DATABASE),
            failure_policy: FailurePolicy::Collect,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    /// Build a config from an environment map; every key is optional and
    /// falls back to the fixed paths next to the working directory.
    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let path = |key: &str, default: &str| {
            env_map
                .get(key)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default))
        };

        let source_workbook = path("SOURCE_WORKBOOK", DEFAULT_SOURCE_WORKBOOK);
        let template_database = path("TEMPLATE_DATABASE", DEFAULT_TEMPLATE_DATABASE);
        let target_database = path("TARGET_DATABASE", DEFAULT_TARGET_DATABASE);

        let failure_policy = match env_map
            .get("INSERT_FAILURE_POLICY")
            .map(|s| s.trim().to_ascii_lowercase())
            .as_deref()
            .unwrap_or("collect")
        {
            "collect" => FailurePolicy::Collect,
            "abort" => FailurePolicy::Abort,
            other => {
                return Err(ConfigError::InvalidValue(
                    "INSERT_FAILURE_POLICY".to_string(),
                    format!("must be collect or abort, got {}", other),
                ))
            }
        };

        Ok(Config {
            source_workbook,
            template_database,
            target_database,
            failure_policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_env() {
        let config = Config::from_env_map(HashMap::new()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.source_workbook, PathBuf::from("db_source.xlsx"));
        assert_eq!(
            config.target_database,
            PathBuf::from("../../assets/vitaminav.db")
        );
        assert_eq!(config.failure_policy, FailurePolicy::Collect);
    }

    #[test]
    fn test_paths_overridden() {
        let mut env_map = HashMap::new();
        env_map.insert("SOURCE_WORKBOOK".to_string(), "/data/in.xlsx".to_string());
        env_map.insert("TEMPLATE_DATABASE".to_string(), "/data/t.db".to_string());
        env_map.insert("TARGET_DATABASE".to_string(), "  ".to_string());
        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.source_workbook, PathBuf::from("/data/in.xlsx"));
        assert_eq!(config.template_database, PathBuf::from("/data/t.db"));
        assert_eq!(
            config.target_database,
            PathBuf::from(DEFAULT_TARGET_DATABASE)
        );
    }

    #[test]
    fn test_abort_policy() {
        let mut env_map = HashMap::new();
        env_map.insert("INSERT_FAILURE_POLICY".to_string(), "Abort".to_string());
        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.failure_policy, FailurePolicy::Abort);
    }

    #[test]
    fn test_invalid_policy() {
        let mut env_map = HashMap::new();
        env_map.insert("INSERT_FAILURE_POLICY".to_string(), "retry".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "INSERT_FAILURE_POLICY"),
            _ => panic!("Expected InvalidValue error"),
        }
    }
}
