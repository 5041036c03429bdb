//! Environment-based configuration.
//!
//! Every setting has a default; `NUTRI_*` variables override them.

use crate::error::NutriError;
use crate::rules::builtin::{self, DEFAULT_SCORING};
use crate::rules::schema::{KeywordTableDef, ScoringProfileDef};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_REGIONAL_URL: &str = "https://in.openfoodfacts.org";
pub const DEFAULT_GLOBAL_URL: &str = "https://world.openfoodfacts.net";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_ADMIN_EMAIL: &str = "admin";

#[derive(Debug, Clone)]
pub struct Config {
    /// Tried before the global source; `None` skips it.
    pub regional_url: Option<String>,
    pub global_url: String,
    /// Applied to every HTTP request.
    pub timeout: Duration,
    /// Append the offline demonstration source to the lookup chain.
    pub demo_fallback: bool,
    /// Scoring preset name or path to a scoring profile JSON file.
    pub scoring: String,
    /// Custom ingredient keyword table; the builtin table when unset.
    pub keywords: Option<PathBuf>,
    pub data_dir: PathBuf,
    pub admin_email: String,
    /// bcrypt hash of the admin password. Admin login is disabled when unset.
    pub admin_password_hash: Option<String>,
    pub bcrypt_cost: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            regional_url: Some(DEFAULT_REGIONAL_URL.to_string()),
            global_url: DEFAULT_GLOBAL_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            demo_fallback: true,
            scoring: DEFAULT_SCORING.to_string(),
            keywords: None,
            data_dir: default_data_dir(),
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
            admin_password_hash: None,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, NutriError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup (the environment, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, NutriError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(url) = lookup("NUTRI_REGIONAL_URL") {
            let url = url.trim();
            config.regional_url = if url.is_empty() {
                None
            } else {
                Some(check_url("NUTRI_REGIONAL_URL", url)?)
            };
        }
        if let Some(url) = lookup("NUTRI_GLOBAL_URL") {
            config.global_url = check_url("NUTRI_GLOBAL_URL", url.trim())?;
        }
        if let Some(secs) = lookup("NUTRI_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| NutriError::Config {
                key: "NUTRI_TIMEOUT_SECS".into(),
                reason: format!("'{}' is not a whole number of seconds", secs),
            })?;
            if secs == 0 {
                return Err(NutriError::Config {
                    key: "NUTRI_TIMEOUT_SECS".into(),
                    reason: "timeout must be greater than zero".into(),
                });
            }
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(flag) = lookup("NUTRI_DEMO_FALLBACK") {
            config.demo_fallback = parse_bool("NUTRI_DEMO_FALLBACK", &flag)?;
        }
        if let Some(scoring) = lookup("NUTRI_SCORING") {
            config.scoring = scoring.trim().to_string();
        }
        if let Some(path) = lookup("NUTRI_KEYWORDS") {
            let path = path.trim();
            config.keywords = (!path.is_empty()).then(|| PathBuf::from(path));
        }
        if let Some(dir) = lookup("NUTRI_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(email) = lookup("NUTRI_ADMIN_EMAIL") {
            config.admin_email = email.trim().to_string();
        }
        config.admin_password_hash = lookup("NUTRI_ADMIN_PASSWORD_HASH")
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty());
        if let Some(cost) = lookup("NUTRI_BCRYPT_COST") {
            let cost: u32 = cost.trim().parse().map_err(|_| NutriError::Config {
                key: "NUTRI_BCRYPT_COST".into(),
                reason: format!("'{}' is not a number", cost),
            })?;
            if !(4..=31).contains(&cost) {
                return Err(NutriError::Config {
                    key: "NUTRI_BCRYPT_COST".into(),
                    reason: format!("cost {} is outside 4..=31", cost),
                });
            }
            config.bcrypt_cost = cost;
        }

        Ok(config)
    }

    /// Resolve `scoring` to a profile: a preset name, or a path ending in `.json`.
    pub fn scoring_profile(&self) -> Result<ScoringProfileDef, NutriError> {
        if self.scoring.ends_with(".json") {
            crate::rules::load_scoring(Path::new(&self.scoring))
        } else {
            builtin::load_scoring_preset(&self.scoring)
        }
    }

    /// Resolve `keywords` to a table: the file when set, else the builtin one.
    pub fn keyword_table(&self) -> Result<KeywordTableDef, NutriError> {
        match self.keywords {
            Some(ref path) => crate::rules::load_keywords(path),
            None => builtin::load_keyword_table(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("nutri"))
        .unwrap_or_else(|| PathBuf::from(".nutri"))
}

fn check_url(key: &str, url: &str) -> Result<String, NutriError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(url.trim_end_matches('/').to_string())
    } else {
        Err(NutriError::Config {
            key: key.to_string(),
            reason: format!("'{}' is not an http(s) URL", url),
        })
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, NutriError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(NutriError::Config {
            key: key.to_string(),
            reason: format!("'{}' is not a boolean", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, NutriError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.regional_url.as_deref(), Some(DEFAULT_REGIONAL_URL));
        assert_eq!(config.global_url, DEFAULT_GLOBAL_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.demo_fallback);
        assert_eq!(config.scoring, "standard");
        assert!(config.admin_password_hash.is_none());
        assert!(config.keywords.is_none());
        assert_eq!(config.keyword_table().unwrap().name, "Ingredient keywords");
    }

    #[test]
    fn test_custom_keyword_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keywords.json");
        std::fs::write(
            &path,
            r#"{
                "name": "Allergens",
                "version": "1",
                "concerning": [{ "keyword": "peanut", "reason": "Peanut allergen." }],
                "beneficial": []
            }"#,
        )
        .unwrap();

        let config = config_from(&[("NUTRI_KEYWORDS", path.to_str().unwrap())]).unwrap();
        let table = config.keyword_table().unwrap();
        assert_eq!(table.name, "Allergens");
        assert_eq!(table.concerning[0].keyword, "peanut");

        let missing = config_from(&[("NUTRI_KEYWORDS", "/no/such/keywords.json")]).unwrap();
        assert!(matches!(
            missing.keyword_table(),
            Err(NutriError::RulesetLoad { .. })
        ));
    }

    #[test]
    fn test_empty_regional_disables_it() {
        let config = config_from(&[("NUTRI_REGIONAL_URL", "")]).unwrap();
        assert!(config.regional_url.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("NUTRI_GLOBAL_URL", "http://localhost:8080/"),
            ("NUTRI_TIMEOUT_SECS", "3"),
            ("NUTRI_DEMO_FALLBACK", "off"),
            ("NUTRI_SCORING", "legacy"),
            ("NUTRI_BCRYPT_COST", "4"),
            ("NUTRI_ADMIN_PASSWORD_HASH", "  "),
        ])
        .unwrap();
        assert_eq!(config.global_url, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert!(!config.demo_fallback);
        assert_eq!(config.bcrypt_cost, 4);
        assert!(config.admin_password_hash.is_none());
        assert_eq!(config.scoring_profile().unwrap().name, "Legacy health score");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(config_from(&[("NUTRI_TIMEOUT_SECS", "0")]).is_err());
        assert!(config_from(&[("NUTRI_TIMEOUT_SECS", "soon")]).is_err());
        assert!(config_from(&[("NUTRI_DEMO_FALLBACK", "maybe")]).is_err());
        assert!(config_from(&[("NUTRI_GLOBAL_URL", "ftp://x")]).is_err());
        assert!(config_from(&[("NUTRI_BCRYPT_COST", "2")]).is_err());
    }
}
