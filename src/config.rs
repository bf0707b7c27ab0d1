use std::env;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::policy::{ContentFilterLevel, ContentType};

/// Default number of active reports before content counts as hidden.
pub const DEFAULT_REPORTS_TO_HIDE: i64 = 5;

/// Per-type report counts at which normal content becomes hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportThresholds {
    pub user: i64,
    pub post: i64,
    pub comment: i64,
}

impl Default for ReportThresholds {
    fn default() -> Self {
        Self {
            user: DEFAULT_REPORTS_TO_HIDE,
            post: DEFAULT_REPORTS_TO_HIDE,
            comment: DEFAULT_REPORTS_TO_HIDE,
        }
    }
}

impl ReportThresholds {
    pub fn for_type(&self, content_type: ContentType) -> i64 {
        match content_type {
            ContentType::User => self.user,
            ContentType::Post => self.post,
            ContentType::Comment => self.comment,
        }
    }
}

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every value
/// has a default, so an empty environment gives a working setup.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub report_thresholds: ReportThresholds,
    /// Filter level applied when the viewer has no saved preference.
    pub default_content_filter: ContentFilterLevel,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary lookup, so tests don't have
    /// to touch the real environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let threshold = |key: &str| -> Result<i64> {
            let Some(raw) = lookup(key) else {
                return Ok(DEFAULT_REPORTS_TO_HIDE);
            };
            let value: i64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{key} must be an integer, got {raw:?}"))?;
            if value < 1 {
                anyhow::bail!("{key} must be at least 1, got {value}");
            }
            Ok(value)
        };

        let report_thresholds = ReportThresholds {
            user: threshold("SHROUD_USER_REPORTS_TO_HIDE")?,
            post: threshold("SHROUD_POST_REPORTS_TO_HIDE")?,
            comment: threshold("SHROUD_COMMENT_REPORTS_TO_HIDE")?,
        };

        let default_content_filter = match lookup("SHROUD_DEFAULT_CONTENT_FILTER") {
            Some(raw) => raw
                .trim()
                .parse::<ContentFilterLevel>()
                .context("Invalid SHROUD_DEFAULT_CONTENT_FILTER")?,
            // Unset means the strictest level
            None => ContentFilterLevel::Strict,
        };

        Ok(Self {
            db_path: lookup("SHROUD_DB_PATH").unwrap_or_else(|| "./shroud.db".to_string()),
            report_thresholds,
            default_content_filter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.db_path, "./shroud.db");
        assert_eq!(config.report_thresholds, ReportThresholds::default());
        assert_eq!(config.default_content_filter, ContentFilterLevel::Strict);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("SHROUD_DB_PATH", "/tmp/x.db"),
            ("SHROUD_POST_REPORTS_TO_HIDE", "3"),
            ("SHROUD_DEFAULT_CONTENT_FILTER", "MYGRANDMAHATES"),
        ])
        .unwrap();
        assert_eq!(config.db_path, "/tmp/x.db");
        assert_eq!(config.report_thresholds.for_type(ContentType::Post), 3);
        assert_eq!(config.report_thresholds.for_type(ContentType::User), 5);
        assert_eq!(config.default_content_filter, ContentFilterLevel::Relaxed);
    }

    #[test]
    fn test_threshold_must_be_positive() {
        let err = load(&[("SHROUD_COMMENT_REPORTS_TO_HIDE", "0")]).unwrap_err();
        assert!(err.to_string().contains("at least 1"));
        assert!(load(&[("SHROUD_USER_REPORTS_TO_HIDE", "many")]).is_err());
    }

    #[test]
    fn test_unknown_filter_level_is_rejected() {
        assert!(load(&[("SHROUD_DEFAULT_CONTENT_FILTER", "whatever")]).is_err());
    }
}
