//! Client configuration: defaults, JSON file, environment

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_BASE_URL: &str = "ZONA_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "ZONA_TIMEOUT_SECS";
pub const ENV_SESSION_ID: &str = "ZONA_SESSION_ID";
pub const ENV_PROVIDER: &str = "DEFAULT_PROVIDER";
pub const ENV_API_KEY: &str = "API_KEY";
pub const ENV_LICENSE_KEY: &str = "LICENSE_KEY";

/// Client configuration
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig
{   /// Backend root, endpoint paths are appended to it
    pub base_url: String
  , /// Per-request timeout in seconds
    pub timeout_secs: u64
  , /// Session id passed through to `/prompt`
    pub session_id: Option<String>
  , /// Provider passed through to `/prompt`
    pub provider: Option<crate::Provider>
  , /// Sent as `X-API-Key` when set
    pub api_key: Option<String>
  , /// Sent as `X-License-Key` when set
    pub license_key: Option<String>
}

impl Default for ClientConfig
{   fn default() -> Self
    {   ClientConfig
        {   base_url: DEFAULT_BASE_URL.to_string()
          , timeout_secs: DEFAULT_TIMEOUT_SECS
          , session_id: None
          , provider: None
          , api_key: None
          , license_key: None
        }
    }
}

// secrets stay out of logs
impl fmt::Debug for ClientConfig
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.debug_struct("ClientConfig")
          .field("base_url", &self.base_url)
          .field("timeout_secs", &self.timeout_secs)
          .field("session_id", &self.session_id)
          .field("provider", &self.provider)
          .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
          .field(
            "license_key",
            &self.license_key.as_ref().map(|_| "<redacted>")
          )
          .finish()
    }
}

impl ClientConfig
{   /// Config pointing at `base_url`, everything else default
    pub fn new(base_url: impl Into<String>) -> Self
    {   ClientConfig
        {   base_url: base_url.into()
          , ..ClientConfig::default()
        }
    }

    /// Load a JSON config file. Missing keys fall back to defaults.
    pub fn from_file(path: impl AsRef<Path>)
      -> Result<Self, crate::error::Error>
    {   let path = path.as_ref();
        debug!("Loading config from {}", path.display());
        let raw = fs::read_to_string(path).map_err(|e| {
          crate::error::Error::InvalidConfiguration(
            format!("cannot read {}: {}", path.display(), e)
          )
        })?;
        serde_json::from_str(&raw).map_err(|e| {
          crate::error::Error::InvalidConfiguration(
            format!("cannot parse {}: {}", path.display(), e)
          )
        })
    }

    /// Overlay the process environment
    pub fn apply_env(self) -> Result<Self, crate::error::Error>
    {   self.apply_vars(|name| std::env::var(name).ok())
    }

    /// Overlay variables from `lookup`; empty values are ignored
    pub fn apply_vars<F>(mut self, lookup: F)
      -> Result<Self, crate::error::Error>
    where
      F: Fn(&str) -> Option<String>
    {   let get = |name: &str| {
          lookup(name).filter(|v| !v.trim().is_empty())
        };

        if let Some(url) = get(ENV_BASE_URL)
        {   self.base_url = url;
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECS)
        {   self.timeout_secs = raw.trim().parse().map_err(|_| {
              crate::error::Error::InvalidConfiguration(
                format!("{} is not a number: {}", ENV_TIMEOUT_SECS, raw)
              )
            })?;
        }
        if let Some(session) = get(ENV_SESSION_ID)
        {   self.session_id = Some(session);
        }
        if let Some(provider) = get(ENV_PROVIDER)
        {   self.provider = Some(crate::Provider::from(provider));
        }
        if let Some(key) = get(ENV_API_KEY)
        {   self.api_key = Some(key);
        }
        if let Some(key) = get(ENV_LICENSE_KEY)
        {   self.license_key = Some(key);
        }
        Ok(self)
    }

    /// Parsed and checked backend root
    pub fn parsed_base_url(&self)
      -> Result<reqwest::Url, crate::error::Error>
    {   let url = reqwest::Url::parse(&self.base_url).map_err(|e| {
          crate::error::Error::InvalidConfiguration(
            format!("bad base URL {:?}: {}", self.base_url, e)
          )
        })?;
        if url.scheme() != "http" && url.scheme() != "https"
        {   return Err(crate::error::Error::InvalidConfiguration(
              format!("unsupported scheme: {}", url.scheme())
            ));
        }
        if url.cannot_be_a_base()
        {   return Err(crate::error::Error::InvalidConfiguration(
              format!("base URL cannot take paths: {}", url)
            ));
        }
        Ok(url)
    }

    pub fn timeout(&self) -> Duration
    {   Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), crate::error::Error>
    {   if self.timeout_secs == 0
        {   return Err(crate::error::Error::InvalidConfiguration(
              "timeout_secs must be greater than zero".to_string()
            ));
        }
        self.parsed_base_url().map(|_| ())
    }
}
