//! Run configuration: built-in defaults, an optional JSON file, CLI overrides.

use crate::acquisition::http_client::{HttpConfig, DEFAULT_USER_AGENT};
use crate::cartography::class_counter::unique_classes;
use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Sitemaps crawled when none are configured.
pub const DEFAULT_SITEMAPS: &[&str] = &[
    "https://ubuntu.com/static/files/sitemap.xml",
    "https://ubuntu.com/tutorials/sitemap.xml",
    "https://ubuntu.com/engage/sitemap.xml",
    "https://ubuntu.com/server/docs/sitemap.xml",
    "https://ubuntu.com/ceph/docs/sitemap.xml",
    "https://ubuntu.com/security/livepatch/docs/sitemap.xml",
    "https://ubuntu.com/robotics/docs/sitemap.xml",
];

/// Classes tracked when none are configured.
pub const DEFAULT_CLASSES: &[&str] = &[
    "p-button",
    "p-button--positive",
    "p-button--negative",
    "p-button--brand",
    "p-button--link",
    "p-button--base",
];

/// On-disk config file. Every key is optional.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub sitemaps: Option<Vec<String>>,
    pub classes: Option<Vec<String>>,
    pub timeout_ms: Option<u64>,
    pub user_agent: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }
}

/// Values given on the command line; empty lists mean "not given".
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub sitemaps: Vec<String>,
    pub classes: Vec<String>,
    pub timeout_ms: Option<u64>,
    pub user_agent: Option<String>,
}

/// Fully resolved and validated configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CensusConfig {
    pub sitemaps: Vec<String>,
    pub classes: Vec<String>,
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl CensusConfig {
    /// Layer overrides over the file over the defaults, then validate.
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self, ConfigError> {
        let pick = |cli: Vec<String>, file: Option<Vec<String>>, default: &[&str]| {
            if !cli.is_empty() {
                cli
            } else if let Some(file) = file {
                file
            } else {
                default.iter().map(|s| s.to_string()).collect()
            }
        };

        let config = Self {
            sitemaps: pick(overrides.sitemaps, file.sitemaps, DEFAULT_SITEMAPS),
            classes: unique_classes(&pick(overrides.classes, file.classes, DEFAULT_CLASSES)),
            timeout: overrides
                .timeout_ms
                .or(file.timeout_ms)
                .map(Duration::from_millis),
            user_agent: overrides
                .user_agent
                .or(file.user_agent)
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sitemaps.is_empty() {
            return Err(ConfigError::NoSitemaps);
        }
        if self.classes.is_empty() {
            return Err(ConfigError::NoClasses);
        }

        for sitemap in &self.sitemaps {
            let parsed = Url::parse(sitemap).map_err(|e| ConfigError::SitemapUrl {
                url: sitemap.clone(),
                reason: e.to_string(),
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::SitemapUrl {
                    url: sitemap.clone(),
                    reason: format!("unsupported scheme {:?}", parsed.scheme()),
                });
            }
        }

        if let Some(bad) = self
            .classes
            .iter()
            .find(|c| c.is_empty() || c.chars().any(char::is_whitespace))
        {
            return Err(ConfigError::ClassName(bad.clone()));
        }

        Ok(())
    }

    pub fn http(&self) -> HttpConfig {
        HttpConfig {
            user_agent: self.user_agent.clone(),
            timeout: self.timeout,
        }
    }
}
