use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.toml";

/// Dotted keys that can be overridden from the environment. The variable
/// name is the key upper-cased with `.` replaced by `_`.
const ENV_KEYS: &[&str] = &[
    "app.secrets.csrf_token",
    "scraper.data_dir",
    "scraper.page_size",
    "scraper.throttle_ms",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub scraper: ScraperSettings,
    #[serde(skip)]
    source: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppSection {
    #[serde(default)]
    pub secrets: Secrets,
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Secrets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csrf_token: Option<String>,
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("csrf_token", &self.csrf_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperSettings {
    pub data_dir: PathBuf,
    pub page_size: usize,
    pub throttle_ms: u64,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            page_size: 10,
            throttle_ms: 1000,
        }
    }
}

/// The token attached to every outbound request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("leetscrape"))
    }

    /// `config.toml` in the working directory wins over the per-user one.
    pub fn default_path() -> Option<PathBuf> {
        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }
        Self::config_dir()
            .map(|d| d.join(CONFIG_FILE))
            .filter(|p| p.exists())
    }

    /// Loads the config file, then applies environment overrides.
    ///
    /// An explicit `path` must be readable. Without one, a missing default
    /// file just means built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let resolved = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path(),
        };

        let mut config = match resolved {
            Some(p) => Self::from_file(&p)?,
            None => {
                debug!("no config file found, using defaults");
                Config::default()
            }
        };
        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.source = Some(path.to_path_buf());
        info!(path = %path.display(), "app config loaded");
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Config, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        for key in ENV_KEYS {
            if let Some(value) = lookup(&env_var_name(key)) {
                self.set(key, value)?;
            }
        }
        Ok(())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), ConfigError> {
        let invalid = |value: String| ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        };
        match key {
            "app.secrets.csrf_token" => self.app.secrets.csrf_token = Some(value),
            "scraper.data_dir" => self.scraper.data_dir = PathBuf::from(value),
            "scraper.page_size" => match value.parse::<usize>() {
                Ok(n) if n > 0 => self.scraper.page_size = n,
                _ => return Err(invalid(value)),
            },
            "scraper.throttle_ms" => {
                self.scraper.throttle_ms = value.parse().map_err(|_| invalid(value))?
            }
            _ => return Err(invalid(value)),
        }
        Ok(())
    }

    pub fn credential(&self) -> Result<Credential, ConfigError> {
        match self.app.secrets.csrf_token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => Ok(Credential::new(token)),
            _ => Err(ConfigError::MissingCredential),
        }
    }

    /// Fills in the csrf token from a logged-in browser session and persists
    /// it next to the loaded config.
    pub fn login_from_browser(&mut self) -> Result<Credential, ConfigError> {
        let domains = vec!["leetcode.com".to_string()];
        let cookies =
            rookie::load(Some(domains)).map_err(|e| ConfigError::Browser(e.to_string()))?;
        let csrf = cookies
            .into_iter()
            .find(|c| c.name == "csrftoken")
            .map(|c| c.value)
            .ok_or_else(|| ConfigError::Browser("no csrftoken cookie for leetcode.com".into()))?;

        self.app.secrets.csrf_token = Some(csrf.clone());
        if let Err(e) = self.save() {
            tracing::warn!("csrf token found but config not saved: {e}");
        }
        Ok(Credential::new(csrf))
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = match &self.source {
            Some(p) => p.clone(),
            None => PathBuf::from(CONFIG_FILE),
        };
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|source| ConfigError::Write { path, source })
    }
}

fn env_var_name(key: &str) -> String {
    key.replace('.', "_").to_uppercase()
}
