use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use blog_api::{ClientConfig, DEFAULT_SESSION_COOKIE};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_TIMEOUT_MS: u64 = 3000;
const DEFAULT_SESSION_DIR: &str = ".blog";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub timeout_ms: u64,
    pub session_dir: PathBuf,
    pub session_cookie: String,
    pub log_level: String,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_url = get_or(&lookup, "BLOG_API_URL", DEFAULT_API_URL);
        let timeout_ms = parse_u64(&lookup, "BLOG_API_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?;
        let session_dir = PathBuf::from(get_or(&lookup, "BLOG_SESSION_DIR", DEFAULT_SESSION_DIR));
        let session_cookie = get_or(&lookup, "BLOG_SESSION_COOKIE", DEFAULT_SESSION_COOKIE);
        let log_level = lookup("RUST_LOG")
            .or_else(|| lookup("LOG_LEVEL"))
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            api_url,
            timeout_ms,
            session_dir,
            session_cookie,
            log_level,
        })
    }

    /// Настройки клиента; `server` из командной строки важнее `BLOG_API_URL`.
    pub fn client_config(&self, server: Option<String>) -> Result<ClientConfig> {
        let base_url = normalize_server(server.unwrap_or_else(|| self.api_url.clone()));
        let config = ClientConfig::new(&base_url)
            .with_context(|| format!("invalid server address '{base_url}'"))?
            .with_timeout(Duration::from_millis(self.timeout_ms))?
            .with_session_cookie(self.session_cookie.clone())?;
        Ok(config)
    }
}

pub fn normalize_server(server: String) -> String {
    let server = server.trim().to_string();
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn get_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> Result<u64> {
    let value = lookup(key)
        .unwrap_or_else(|| default.to_string())
        .trim()
        .parse::<u64>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}
