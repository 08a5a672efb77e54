use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_API_URL: &str = "https://alhaithamdoors.online.winchmohamedbahr.com/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
    /// Origin that internal stream paths (`/api/videos/stream/...`) are served from.
    pub media_origin: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        let api_base_url = api_base_url.into().trim_end_matches('/').to_string();
        let media_origin = media_origin_for(&api_base_url);
        Self {
            api_base_url,
            media_origin,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn from_env() -> Self {
        let mut config = Self::new(resolve_api_base_url());
        if let Ok(origin) = env::var("GARAGE_MEDIA_ORIGIN") {
            config.media_origin = origin.trim_end_matches('/').to_string();
        }
        config.timeout = resolve_timeout();
        config
    }
}

pub fn resolve_api_base_url() -> String {
    env::var("GARAGE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

pub fn resolve_timeout() -> Duration {
    env::var("GARAGE_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TIMEOUT)
}

pub fn resolve_session_path() -> PathBuf {
    if let Ok(path) = env::var("GARAGE_SESSION_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data/session.json")
}

fn media_origin_for(api_base_url: &str) -> String {
    api_base_url
        .strip_suffix("/api")
        .unwrap_or(api_base_url)
        .to_string()
}
