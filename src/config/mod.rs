use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub listing: ListingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Only paths under this prefix carry the bearer credential
    pub prefix: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub login_path: String,
    pub protected_paths: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    pub default_limit: u32,
    pub limit_options: Vec<u32>,
    pub max_entries: u32,
    pub search_debounce_ms: u64,
    pub default_sort_field: String,
    pub default_sort_direction: String,
}

impl PanelConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Ok(v) = env::var("PANEL_API_URL") {
            self.api.base_url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("PANEL_API_PREFIX") {
            self.api.prefix = v;
        }
        if let Ok(v) = env::var("PANEL_REQUEST_TIMEOUT_SECS") {
            self.api.request_timeout_secs = v.parse().unwrap_or(self.api.request_timeout_secs);
        }

        // Session overrides
        if let Ok(v) = env::var("PANEL_LOGIN_PATH") {
            self.session.login_path = v;
        }
        if let Ok(v) = env::var("PANEL_PROTECTED_PATHS") {
            self.session.protected_paths = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        // Listing overrides
        if let Ok(v) = env::var("PANEL_DEFAULT_LIMIT") {
            self.listing.default_limit = v.parse().unwrap_or(self.listing.default_limit);
        }
        if let Ok(v) = env::var("PANEL_LIMIT_OPTIONS") {
            let parsed: Vec<u32> = v.split(',').filter_map(|s| s.trim().parse().ok()).collect();
            if !parsed.is_empty() {
                self.listing.limit_options = parsed;
            }
        }
        if let Ok(v) = env::var("PANEL_MAX_ENTRIES") {
            self.listing.max_entries = v.parse().unwrap_or(self.listing.max_entries);
        }
        if let Ok(v) = env::var("PANEL_SEARCH_DEBOUNCE_MS") {
            self.listing.search_debounce_ms = v.parse().unwrap_or(self.listing.search_debounce_ms);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://localhost:8080".to_string(),
                prefix: "/api/v1".to_string(),
                request_timeout_secs: 60,
            },
            session: SessionConfig::default(),
            listing: ListingConfig::default(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: "https://staging.example.com".to_string(),
                prefix: "/api/v1".to_string(),
                request_timeout_secs: 30,
            },
            session: SessionConfig::default(),
            listing: ListingConfig::default(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: "https://app.example.com".to_string(),
                prefix: "/api/v1".to_string(),
                request_timeout_secs: 15,
            },
            session: SessionConfig::default(),
            listing: ListingConfig::default(),
        }
    }

    /// Development preset pointed at an explicit server, used by tests and `--server`
    pub fn for_server(base_url: impl Into<String>) -> Self {
        let mut config = Self::development();
        config.api.base_url = base_url.into().trim_end_matches('/').to_string();
        config
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            protected_paths: [
                "/",
                "/accounts",
                "/additional-analyses",
                "/koreksi-rules",
                "/obyek-rules",
                "/uploads",
            ]
            .iter()
            .map(|p| p.to_string())
            .collect(),
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_limit: 25,
            limit_options: vec![10, 25, 50, 100],
            max_entries: 10_000,
            search_debounce_ms: 300,
            default_sort_field: "created_at".to_string(),
            default_sort_direction: "desc".to_string(),
        }
    }
}

// Global singleton config - built once on first access
pub static CONFIG: Lazy<PanelConfig> = Lazy::new(PanelConfig::from_env);

pub fn config() -> &'static PanelConfig {
    &CONFIG
}
