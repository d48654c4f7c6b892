use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::error::RosterError;

pub const SETTINGS_FILE: &str = "roster.toml";
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub notice_ttl_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            notice_ttl_ms: 5_000,
            request_timeout_secs: 10,
        }
    }
}

impl Settings {
    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    base_url: Option<String>,
    notice_ttl_ms: Option<u64>,
    request_timeout_secs: Option<u64>,
}

pub fn load_settings() -> Settings {
    let mut settings = load_settings_file(Path::new(SETTINGS_FILE));
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
}

pub fn load_settings_file(path: &Path) -> Settings {
    let mut settings = Settings::default();

    let Ok(raw) = fs::read_to_string(path) else {
        return settings;
    };

    match toml::from_str::<FileSettings>(&raw) {
        Ok(file_cfg) => {
            if let Some(v) = file_cfg.base_url {
                settings.base_url = v;
            }
            if let Some(v) = file_cfg.notice_ttl_ms {
                settings.notice_ttl_ms = v;
            }
            if let Some(v) = file_cfg.request_timeout_secs {
                settings.request_timeout_secs = v;
            }
        }
        Err(err) => warn!("config: ignoring unreadable {}: {err}", path.display()),
    }

    settings
}

pub fn apply_env_overrides(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("ROSTER_BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = var("APP__BASE_URL") {
        settings.base_url = v;
    }

    if let Some(v) = var("APP__NOTICE_TTL_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.notice_ttl_ms = parsed;
        }
    }

    if let Some(v) = var("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }
}

/// Turns a configured base url into the root every endpoint path is joined
/// onto. Trailing slashes are dropped so `http://host/` and `http://host`
/// behave the same.
pub fn normalize_base_url(raw_base_url: &str) -> Result<Url, RosterError> {
    let trimmed = raw_base_url.trim().trim_end_matches('/');
    let candidate = if trimmed.is_empty() {
        DEFAULT_BASE_URL
    } else {
        trimmed
    };

    let url = Url::parse(candidate)?;
    if url.cannot_be_a_base() {
        return Err(RosterError::Config(format!(
            "base url '{candidate}' cannot carry endpoint paths"
        )));
    }
    if !matches!(url.scheme(), "http" | "https") {
        return Err(RosterError::Config(format!(
            "base url '{candidate}' must use http or https"
        )));
    }

    Ok(url)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
