use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use seospyder_client::client::DEFAULT_TIMEOUT_SECS;
use seospyder_core::session;
use seospyder_core::state::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "~/.config/seospyder/config.toml";
pub const ENV_BASE_URL: &str = "SEOSPYDER_BASE_URL";
pub const ENV_XID: &str = "SEOSPYDER_XID";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default)]
    pub session: Session,
    #[serde(default)]
    pub logging: Logging,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Backend {
    pub base_url: String,
    pub timeout_secs: u64,
}
impl Default for Backend {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    pub xid: Option<String>,
    /// RFC 3339 time after which `xid` is no longer sent.
    pub expires_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub json: bool,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            json: false,
        }
    }
}

pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }

    /// Where the config lives: the explicit path or the default location.
    pub fn path_for(explicit: Option<&str>) -> PathBuf {
        expand_path(explicit.unwrap_or(DEFAULT_CONFIG_PATH))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let raw = toml::to_string_pretty(self).context("serializing config")?;
        std::fs::write(path, raw).with_context(|| format!("writing config: {}", path.display()))
    }

    /// Keep a session id from the sign-in popup for the session lifetime.
    pub fn store_session(&mut self, xid: &str, now: DateTime<Utc>) {
        self.session.xid = Some(xid.to_string());
        self.session.expires_at = Some(session::session_expiry(now).to_rfc3339());
    }

    /// Forget a stored session that has lapsed. Returns whether one was dropped.
    pub fn drop_expired_session(&mut self, now: DateTime<Utc>) -> bool {
        if self.session.xid.is_none()
            || session::is_session_current(self.session.expires_at.as_deref(), now)
        {
            return false;
        }
        warn!("Stored session expired; sign in again with `seospyder login`");
        self.session = Session::default();
        true
    }

    /// An explicit path must exist; the default location is optional.
    pub fn locate(explicit: Option<&str>) -> Result<Self> {
        match explicit {
            Some(path) => {
                let path = expand_path(path);
                if !path.exists() {
                    bail!("--config: {} does not exist", path.display());
                }
                Self::load(&path)
            }
            None => {
                let path = expand_path(DEFAULT_CONFIG_PATH);
                if path.exists() {
                    Self::load(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Environment beats the file.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.is_empty()) {
            self.backend.base_url = url;
        }
        if let Some(xid) = lookup(ENV_XID).filter(|v| !v.is_empty()) {
            self.session.xid = Some(xid);
            self.session.expires_at = None;
        }
    }

    /// Flags beat everything.
    pub fn apply_overrides(&mut self, base_url: Option<&str>, xid: Option<&str>) {
        if let Some(url) = base_url {
            self.backend.base_url = url.to_string();
        }
        if let Some(xid) = xid {
            self.session.xid = Some(xid.to_string());
            self.session.expires_at = None;
        }
    }
}
