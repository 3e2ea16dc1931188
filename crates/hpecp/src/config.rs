//! Connection profiles.
//!
//! Profiles live in an ini-style file, `~/.hpecp.conf` unless
//! `HPECP_CONFIG_FILE` says otherwise:
//!
//! ```ini
//! [default]
//! api_host = 127.0.0.1
//! api_port = 8080
//! use_ssl = True
//! verify_ssl = False
//! warn_ssl = False
//! username = admin
//! password = admin123
//!
//! [tenant1]
//! username = tenant-admin
//! ```
//!
//! A key missing from the selected profile falls back to `[default]`.

use std::path::{Path, PathBuf};

use ini::{Ini, Properties};

use crate::error::{ApiError, Result};

/// Default config file name, relative to the home directory.
pub const DEFAULT_CONFIG_FILE: &str = ".hpecp.conf";

/// Name of the fallback profile section.
pub const DEFAULT_PROFILE: &str = "default";

/// Environment variable overriding the config file location.
pub const CONFIG_FILE_ENV: &str = "HPECP_CONFIG_FILE";

/// Environment variable selecting the profile.
pub const PROFILE_ENV: &str = "PROFILE";

/// TLS certificate verification policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifySsl {
    /// Verify against the platform roots.
    Enabled,
    /// Accept any certificate.
    Disabled,
    /// Verify against an additional PEM CA bundle.
    CaBundle(PathBuf),
}

impl VerifySsl {
    fn parse(value: &str) -> Self {
        match parse_flag(value) {
            Some(true) => Self::Enabled,
            Some(false) => Self::Disabled,
            None => Self::CaBundle(expand_home(value)),
        }
    }
}

/// Connection and credential settings for one controller.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Login name.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Controller host name or address.
    pub api_host: String,
    /// Controller API port.
    pub api_port: u16,
    /// Use https.
    pub use_ssl: bool,
    /// Certificate verification policy.
    pub verify_ssl: VerifySsl,
    /// Log a warning when certificate checks are disabled.
    pub warn_ssl: bool,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("api_host", &self.api_host)
            .field("api_port", &self.api_port)
            .field("use_ssl", &self.use_ssl)
            .field("verify_ssl", &self.verify_ssl)
            .field("warn_ssl", &self.warn_ssl)
            .finish()
    }
}

impl ClientConfig {
    /// Loads a profile from an ini file. A leading `~` is expanded.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the file cannot be read, the profile
    /// section is missing, or a key is missing from both the profile and
    /// `[default]`.
    pub fn from_file(path: impl AsRef<Path>, profile: &str) -> Result<Self> {
        let path = expand_home(&path.as_ref().to_string_lossy());
        if !path.exists() {
            return Err(ApiError::config(format!(
                "could not find configuration file '{}'",
                path.display()
            )));
        }
        let ini = Ini::load_from_file(&path).map_err(|e| {
            ApiError::config(format!("could not read '{}': {e}", path.display()))
        })?;
        Self::from_ini(&ini, profile, &path.display().to_string())
    }

    /// Parses a profile from ini text.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_file`].
    pub fn from_ini_str(content: &str, profile: &str) -> Result<Self> {
        let ini = Ini::load_from_str(content)
            .map_err(|e| ApiError::config(format!("invalid configuration: {e}")))?;
        Self::from_ini(&ini, profile, "<string>")
    }

    fn from_ini(ini: &Ini, profile: &str, source: &str) -> Result<Self> {
        let selected = ini.section(Some(profile)).ok_or_else(|| {
            ApiError::config(format!("'{profile}' section not found in '{source}'"))
        })?;
        let fallback = ini.section(Some(DEFAULT_PROFILE));

        Self::from_lookup(|key| lookup(selected, fallback, key), |key| {
            format!("'{key}' not found in section '{profile}' or in the default section")
        })
    }

    /// Reads the profile from `HPECP_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] naming the first missing variable.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(
            |key| std::env::var(env_name(key)).ok(),
            |key| format!("environment variable '{}' is not set", env_name(key)),
        )
    }

    fn from_lookup<F, M>(get: F, missing: M) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
        M: Fn(&str) -> String,
    {
        let required = |key: &str| get(key).ok_or_else(|| ApiError::config(missing(key)));

        let username = required("username")?;
        let password = required("password")?;
        let api_host = required("api_host")?;
        let api_port = required("api_port")?;
        let api_port = api_port.trim().parse().map_err(|_| {
            ApiError::config(format!("api_port must be a port number, got '{api_port}'"))
        })?;

        Ok(Self {
            username,
            password,
            api_host,
            api_port,
            use_ssl: parse_flag(&required("use_ssl")?).unwrap_or(true),
            verify_ssl: VerifySsl::parse(&required("verify_ssl")?),
            warn_ssl: parse_flag(&required("warn_ssl")?).unwrap_or(true),
        })
    }

    /// Base URL of the controller API.
    #[must_use]
    pub fn base_url(&self) -> String {
        let scheme = if self.use_ssl { "https" } else { "http" };
        format!("{scheme}://{}:{}", self.api_host, self.api_port)
    }
}

/// `~/.hpecp.conf`, or the bare file name when no home directory exists.
#[must_use]
pub fn default_config_path() -> PathBuf {
    dirs::home_dir().map_or_else(
        || PathBuf::from(DEFAULT_CONFIG_FILE),
        |home| home.join(DEFAULT_CONFIG_FILE),
    )
}

fn lookup(selected: &Properties, fallback: Option<&Properties>, key: &str) -> Option<String> {
    selected
        .get(key)
        .or_else(|| fallback.and_then(|section| section.get(key)))
        .map(|value| value.trim().to_string())
}

fn env_name(key: &str) -> String {
    format!("HPECP_{}", key.to_ascii_uppercase())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
