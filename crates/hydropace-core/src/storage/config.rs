//! TOML-based application configuration.
//!
//! Stores:
//! - Pacing policy constants (velocity cap, deficit thresholds, tolerance)
//! - The waking window
//! - The goal profile and goal model coefficients
//!
//! Configuration is stored at `~/.config/hydropace/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::curve::WakeWindow;
use crate::error::ConfigError;
use crate::goal::{compute_daily_goal, GoalPolicy, GoalProfile};
use crate::plan::PacingPolicy;

/// Goal profile configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalConfig {
    #[serde(default = "default_weight_kg")]
    pub weight_kg: f64,
    #[serde(default)]
    pub fasting: bool,
    /// Fixed daily goal; 0 computes it from the model.
    #[serde(default)]
    pub fixed_goal_ml: u32,
    #[serde(default)]
    pub model: GoalPolicy,
}

fn default_weight_kg() -> f64 {
    70.0
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            weight_kg: default_weight_kg(),
            fasting: false,
            fixed_goal_ml: 0,
            model: GoalPolicy::default(),
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/hydropace/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub policy: PacingPolicy,
    #[serde(default)]
    pub window: WakeWindow,
    #[serde(default)]
    pub goal: GoalConfig,
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(n) if n.is_f64() => value
                        .parse::<f64>()
                        .ok()
                        .and_then(serde_json::Number::from_f64)
                        .map(serde_json::Value::Number)
                        .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as integer")))?,
                    serde_json::Value::Object(_) => {
                        return Err(invalid("cannot overwrite a whole section".to_string()))
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Check the window and policy are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.window
            .validate()
            .map_err(|e| ConfigError::InvalidValue {
                key: "window".to_string(),
                message: e.to_string(),
            })?;
        self.policy.validate()
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value does not parse as
    /// the existing type, or the result fails validation.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a value by key and persist to the default location.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.set_value(key, value)?;
        self.save()
    }

    /// Today's goal profile from config plus live inputs.
    pub fn profile(&self, steps: u32, medication_active: bool) -> GoalProfile {
        GoalProfile {
            weight_kg: self.goal.weight_kg,
            fasting: self.goal.fasting,
            medication_active,
            steps,
        }
    }

    /// Daily goal: the fixed value if set, otherwise the model's.
    pub fn daily_goal_ml(&self, steps: u32, medication_active: bool) -> i64 {
        if self.goal.fixed_goal_ml > 0 {
            return i64::from(self.goal.fixed_goal_ml);
        }
        compute_daily_goal(&self.profile(steps, medication_active), &self.goal.model).goal_ml
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.policy.velocity_cap_ml_per_hour, 800);
        assert_eq!(parsed.window.wake_hour, 7.0);
        assert_eq!(parsed.goal.model.base_ml_per_kg, 33.3);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("policy.tolerance_ml").as_deref(), Some("50"));
        assert_eq!(cfg.get("window.sleep_hour").as_deref(), Some("23.0"));
        assert_eq!(cfg.get("goal.fasting").as_deref(), Some("false"));
        assert!(cfg.get("policy.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_value_updates_nested_fields() {
        let mut cfg = Config::default();
        cfg.set_value("policy.velocity_cap_ml_per_hour", "700").unwrap();
        cfg.set_value("window.wake_hour", "6.5").unwrap();
        cfg.set_value("goal.fasting", "true").unwrap();
        cfg.set_value("goal.model.base_ml_per_kg", "35").unwrap();
        assert_eq!(cfg.policy.velocity_cap_ml_per_hour, 700);
        assert_eq!(cfg.window.wake_hour, 6.5);
        assert!(cfg.goal.fasting);
        assert_eq!(cfg.goal.model.base_ml_per_kg, 35.0);
    }

    #[test]
    fn set_value_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set_value("policy.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.set_value("nothing.here", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn set_value_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set_value("goal.fasting", "maybe").is_err());
        assert!(cfg.set_value("policy.tolerance_ml", "-5").is_err());
        assert!(cfg.set_value("policy", "1").is_err());
    }

    #[test]
    fn set_value_rejects_invalid_window() {
        let mut cfg = Config::default();
        let err = cfg.set_value("window.sleep_hour", "6").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert_eq!(cfg.window.sleep_hour, 23.0);
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn load_from_reads_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[policy]\nvelocity_cap_ml_per_hour = 600\n\n[goal]\nfixed_goal_ml = 2800\n",
        )
        .unwrap();
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.policy.velocity_cap_ml_per_hour, 600);
        assert_eq!(cfg.policy.large_deficit_ml, 500);
        assert_eq!(cfg.daily_goal_ml(0, false), 2800);
    }

    #[test]
    fn load_from_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "policy = [").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseFailed(_))
        ));
    }

    #[test]
    fn goal_is_computed_from_model_when_not_fixed() {
        let cfg = Config::default();
        assert_eq!(cfg.daily_goal_ml(0, false), 2331);
        assert_eq!(cfg.daily_goal_ml(5000, true), 2331 + 110 + 60);
    }
}
