use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::api::ApiClient;
use crate::auth::{AuthSession, CredentialStore, Navigator};
use crate::config::PanelConfig;
use crate::error::{ClientError, ClientResult};

pub const SESSION_FILE: &str = "session.json";

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("PANEL_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("analyses-panel")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// Credential store backed by a JSON object on disk, rewritten on every change
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    /// `session.json` in the config directory
    pub fn in_config_dir() -> anyhow::Result<Self> {
        Ok(Self::new(get_config_dir()?.join(SESSION_FILE)))
    }

    fn load(&self) -> ClientResult<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&content)
            .map_err(|e| ClientError::storage(format!("{} is not valid JSON: {}", self.path.display(), e)))
    }

    fn save(&self, entries: &HashMap<String, String>) -> ClientResult<()> {
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    fn update(&self, change: impl FnOnce(&mut HashMap<String, String>)) -> ClientResult<()> {
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());
        let mut entries = self.load()?;
        change(&mut entries);
        self.save(&entries)
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

/// A terminal cannot change location; it tells the user where to go instead
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, path: &str) {
        tracing::debug!("navigate to {}", path);
        eprintln!("Sign-in required ({}): run `analyses-panel auth login <username>`", path);
    }
}

/// Session for a visit to `current_path`, persisted in the config directory
pub fn open_session(config: &PanelConfig, current_path: &str) -> anyhow::Result<Arc<AuthSession>> {
    let store = Arc::new(FileCredentialStore::in_config_dir()?);
    let session = AuthSession::open(
        store,
        Arc::new(TerminalNavigator),
        config.session.clone(),
        config.api.prefix.clone(),
        current_path,
    )?;
    Ok(Arc::new(session))
}

pub fn api_client(config: &PanelConfig, session: Arc<AuthSession>) -> anyhow::Result<ApiClient> {
    Ok(ApiClient::new(&config.api, session)?)
}
