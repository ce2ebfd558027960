use std::{
    env, fs,
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{errors::Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_LONG_POLL_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);
/// Added on top of the long-poll timeout so a held-open `getUpdates` is not
/// cut off by the HTTP client.
const REQUEST_TIMEOUT_SLACK: Duration = Duration::from_secs(15);

/// Client settings.
#[derive(Clone)]
pub struct Config {
    pub token: String,
    /// Base URL without the `/bot<token>` suffix.
    pub api_url: String,
    pub long_poll_timeout: Duration,
    /// Wait between retries of a `getUpdates` that failed with a 5xx.
    pub retry_delay: Duration,
    pub request_timeout: Duration,

    // Webhook mode, used by the binary when `webhook_url` is set.
    pub webhook_url: Option<String>,
    pub webhook_cert: Option<PathBuf>,
    pub webhook_listen: SocketAddr,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("long_poll_timeout", &self.long_poll_timeout)
            .field("retry_delay", &self.retry_delay)
            .field("request_timeout", &self.request_timeout)
            .field("webhook_url", &self.webhook_url)
            .field("webhook_cert", &self.webhook_cert)
            .field("webhook_listen", &self.webhook_listen)
            .finish()
    }
}

impl Config {
    /// Defaults for everything but the token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: DEFAULT_API_URL.to_string(),
            long_poll_timeout: DEFAULT_LONG_POLL_TIMEOUT,
            retry_delay: DEFAULT_RETRY_DELAY,
            request_timeout: DEFAULT_LONG_POLL_TIMEOUT + REQUEST_TIMEOUT_SLACK,
            webhook_url: None,
            webhook_cert: None,
            webhook_listen: default_listen(),
        }
    }

    /// Point at a different server (a local Bot API server, or a test mock).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Read `TBOT_*` variables, after loading `.env` from the working
    /// directory if one exists.
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_env()
    }

    fn from_env() -> Result<Self> {
        let token = env_str("TBOT_TOKEN").unwrap_or_default();
        if token.trim().is_empty() {
            return Err(Error::Config(
                "TBOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let mut cfg = Self::new(token.trim());
        if let Some(url) = env_str("TBOT_API_URL").and_then(non_empty) {
            cfg = cfg.with_api_url(url);
        }

        cfg.long_poll_timeout =
            env_secs("TBOT_LONG_POLL_TIMEOUT")?.unwrap_or(cfg.long_poll_timeout);
        cfg.retry_delay = env_secs("TBOT_RETRY_DELAY")?.unwrap_or(cfg.retry_delay);
        cfg.request_timeout = env_secs("TBOT_REQUEST_TIMEOUT")?
            .unwrap_or(cfg.long_poll_timeout + REQUEST_TIMEOUT_SLACK);
        if cfg.request_timeout <= cfg.long_poll_timeout {
            return Err(Error::Config(
                "TBOT_REQUEST_TIMEOUT must exceed TBOT_LONG_POLL_TIMEOUT".to_string(),
            ));
        }

        cfg.webhook_url = env_str("TBOT_WEBHOOK_URL").and_then(non_empty);
        cfg.webhook_cert = env_str("TBOT_WEBHOOK_CERT")
            .and_then(non_empty)
            .map(PathBuf::from);
        if let Some(listen) = env_str("TBOT_WEBHOOK_LISTEN").and_then(non_empty) {
            cfg.webhook_listen = listen.trim().parse().map_err(|_| {
                Error::Config(format!(
                    "TBOT_WEBHOOK_LISTEN is not a socket address: {listen}"
                ))
            })?;
        }

        Ok(cfg)
    }

    /// `<api_url>/bot<token>`; never log this.
    pub fn bot_url(&self) -> String {
        format!("{}/bot{}", self.api_url, self.token)
    }

    /// `<api_url>/file/bot<token>`.
    pub fn file_url(&self) -> String {
        format!("{}/file/bot{}", self.api_url, self.token)
    }
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8443))
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_secs(key: &str) -> Result<Option<Duration>> {
    let Some(raw) = env_str(key).and_then(non_empty) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .map(|s| Some(Duration::from_secs(s)))
        .map_err(|_| Error::Config(format!("{key} must be a whole number of seconds: {raw}")))
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };
    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim().trim_start_matches("export ").trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = &val[1..val.len() - 1];
        }
        out.push((key.to_string(), val.to_string()));
    }
    out
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
