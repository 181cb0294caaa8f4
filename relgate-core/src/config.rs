use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level relgate configuration, matching `relgate.toml`.
///
/// Every section defaults to the behavior of the original dashboard, so a
/// missing file or an empty table is always valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelgateConfig {
    #[serde(default)]
    pub conflict: ConflictSection,
    #[serde(default)]
    pub production: ProductionSection,
    #[serde(default)]
    pub rollback: RollbackSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictSection {
    /// Minimum distinct stories before a shared component counts as a
    /// conflict.
    pub min_stories: usize,
}

impl Default for ConflictSection {
    fn default() -> Self {
        Self { min_stories: 2 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionSection {
    /// Days behind production before a `BEHIND_PROD` classification is
    /// flagged as a warning.
    pub behind_warning_days: i64,
}

impl Default for ProductionSection {
    fn default() -> Self {
        Self {
            behind_warning_days: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollbackSection {
    /// Risky-component ratio at or above which a full rollback is
    /// recommended. The 0.5 default reproduces the historical
    /// `risky >= ceil(total / 2)` cutoff; it is a policy parameter, not a
    /// derived constant.
    pub full_threshold_ratio: f64,
}

impl Default for RollbackSection {
    fn default() -> Self {
        Self {
            full_threshold_ratio: 0.5,
        }
    }
}

impl RelgateConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        let config: Self =
            toml::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.conflict.min_stories < 1 {
            return Err(ConfigError::Invalid(
                "conflict.min_stories must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.rollback.full_threshold_ratio) {
            return Err(ConfigError::Invalid(format!(
                "rollback.full_threshold_ratio must be within 0.0..=1.0, got {}",
                self.rollback.full_threshold_ratio
            )));
        }
        if self.production.behind_warning_days < 0 {
            return Err(ConfigError::Invalid(
                "production.behind_warning_days must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn defaults_match_dashboard_behavior() {
        let config = RelgateConfig::default();
        assert_eq!(config.conflict.min_stories, 2);
        assert_eq!(config.production.behind_warning_days, 15);
        assert!((config.rollback.full_threshold_ratio - 0.5).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: RelgateConfig = toml::from_str(
            r#"
            [conflict]
            min_stories = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.conflict.min_stories, 3);
        assert_eq!(config.production.behind_warning_days, 15);
    }

    #[test]
    fn invalid_ratio_rejected() {
        let config: RelgateConfig = toml::from_str(
            r#"
            [rollback]
            full_threshold_ratio = 1.5
            "#,
        )
        .unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn zero_min_stories_rejected() {
        let config: RelgateConfig = toml::from_str(
            r#"
            [conflict]
            min_stories = 0
            "#,
        )
        .unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn load_missing_file() {
        let err = RelgateConfig::load(Path::new("/nonexistent/relgate.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[production]\nbehind_warning_days = 30").unwrap();
        let config = RelgateConfig::load(file.path()).unwrap();
        assert_eq!(config.production.behind_warning_days, 30);
    }
}
