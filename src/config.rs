//! Environment configuration loaded from `~/.dagstertui/config.json`.
//!
//! ```json
//! { "environments": { "default": "prod", "prod": "https://dagster.example.com" } }
//! ```
//!
//! An environment value that names another environment is followed once,
//! which is how `default` points at a real backend.

use color_eyre::eyre::{eyre, Result, WrapErr};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_ENVIRONMENT: &str = "default";
const CONFIG_DIR: &str = ".dagstertui";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub environments: BTreeMap<String, String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&raw).wrap_err_with(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Resolve an environment name to a backend URL without a trailing slash.
    pub fn resolve(&self, environment: &str) -> Result<String> {
        let value = self.environments.get(environment).ok_or_else(|| {
            let known: Vec<_> = self.environments.keys().map(String::as_str).collect();
            if known.is_empty() {
                eyre!("Unknown environment '{environment}': no environments configured")
            } else {
                eyre!(
                    "Unknown environment '{environment}'. Known environments: {}",
                    known.join(", ")
                )
            }
        })?;

        let url = match self.environments.get(value) {
            Some(target) if value != environment => {
                tracing::debug!(environment, alias = %value, "following environment alias");
                target
            }
            _ => value,
        };

        let url = url.trim().trim_end_matches('/');
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(eyre!(
                "Environment '{environment}' resolves to '{url}', which is not an http(s) URL"
            ));
        }
        Ok(url.to_string())
    }
}

/// `$HOME/.dagstertui/config.json`
pub fn default_path() -> Result<PathBuf> {
    let home = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .ok_or_else(|| eyre!("Cannot locate home directory; set HOME"))?;
    Ok(PathBuf::from(home).join(CONFIG_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CONFIG: &str = r#"{
        "environments": {
            "default": "prod",
            "prod": "https://dagster.example.com/",
            "local": "http://localhost:3000",
            "broken": "ftp://nowhere"
        }
    }"#;

    #[test]
    fn resolves_direct_url() {
        let c = Config::from_json(CONFIG).unwrap();
        assert_eq!(c.resolve("local").unwrap(), "http://localhost:3000");
    }

    #[test]
    fn default_follows_alias_and_trims_slash() {
        let c = Config::from_json(CONFIG).unwrap();
        assert_eq!(c.resolve("default").unwrap(), "https://dagster.example.com");
    }

    #[test]
    fn default_may_hold_a_url() {
        let c = Config::from_json(r#"{"environments":{"default":"http://dagster:3000"}}"#).unwrap();
        assert_eq!(c.resolve(DEFAULT_ENVIRONMENT).unwrap(), "http://dagster:3000");
    }

    #[test]
    fn unknown_environment_lists_known() {
        let c = Config::from_json(CONFIG).unwrap();
        let err = c.resolve("staging").unwrap_err().to_string();
        assert!(err.contains("staging"));
        assert!(err.contains("local, prod"), "{err}");
    }

    #[test]
    fn empty_config_is_an_error() {
        let c = Config::from_json("{}").unwrap();
        assert!(c.resolve("default").unwrap_err().to_string().contains("no environments"));
    }

    #[test]
    fn non_http_url_rejected() {
        let c = Config::from_json(CONFIG).unwrap();
        assert!(c.resolve("broken").is_err());
    }

    #[test]
    fn alias_is_followed_only_once() {
        let c = Config::from_json(
            r#"{"environments":{"default":"a","a":"b","b":"https://b.example.com"}}"#,
        )
        .unwrap();
        assert!(c.resolve("default").is_err());
        assert_eq!(c.resolve("a").unwrap(), "https://b.example.com");
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(Config::from_json("{not json").is_err());
    }
}
