pub mod store;

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::error::{ClientError, ClientResult};

pub use store::{CredentialStore, MemoryStore};

/// Storage key for the bearer credential
pub const TOKEN_KEY: &str = "access_token";
/// Storage key for the serialized identity record
pub const USER_KEY: &str = "user";

/// Who the credential belongs to, as returned by the login endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub name: String,
}

impl Identity {
    pub fn new(username: impl Into<String>, name: impl Into<String>) -> Self {
        Self { username: username.into(), name: name.into() }
    }

    /// Label for the user badge: username, else display name, else "User"
    pub fn display_label(&self) -> &str {
        if !self.username.is_empty() {
            &self.username
        } else if !self.name.is_empty() {
            &self.name
        } else {
            "User"
        }
    }
}

/// Where the session sends the user when access is denied
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

#[derive(Debug, Default)]
struct Credential {
    token: Option<String>,
    identity: Identity,
}

/// Sole owner of the persisted credential. Nothing else reads the store.
pub struct AuthSession {
    store: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
    settings: SessionConfig,
    api_prefix: String,
    credential: RwLock<Credential>,
    redirected_to: Option<String>,
}

impl AuthSession {
    /// Load the persisted credential for a visit to `current_path`.
    ///
    /// Without a credential on a protected path the navigator is sent to the
    /// login path straight away; the returned session then reports
    /// [`redirected_to`](Self::redirected_to) and callers must not issue requests.
    pub fn open(
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
        settings: SessionConfig,
        api_prefix: impl Into<String>,
        current_path: &str,
    ) -> ClientResult<Self> {
        let token = store.get(TOKEN_KEY)?.filter(|t| !t.is_empty());
        let identity = match store.get(USER_KEY)? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("ignoring unreadable identity record: {}", e);
                Identity::default()
            }),
            None => Identity::default(),
        };

        let mut session = Self {
            store,
            navigator,
            settings,
            api_prefix: api_prefix.into(),
            credential: RwLock::new(Credential { token, identity }),
            redirected_to: None,
        };

        if !session.is_authenticated() && session.is_protected(current_path) {
            tracing::info!("no credential for protected path {}, redirecting", current_path);
            let login_path = session.settings.login_path.clone();
            session.navigator.navigate(&login_path);
            session.redirected_to = Some(login_path);
        }

        Ok(session)
    }

    pub fn redirected_to(&self) -> Option<&str> {
        self.redirected_to.as_deref()
    }

    /// Fails with `LoginRequired` when `open` had to redirect
    pub fn ensure_access(&self) -> ClientResult<()> {
        match &self.redirected_to {
            Some(login_path) => Err(ClientError::LoginRequired { login_path: login_path.clone() }),
            None => Ok(()),
        }
    }

    /// Protected paths match exactly or as a parent segment; "/" only matches itself.
    pub fn is_protected(&self, path: &str) -> bool {
        self.settings.protected_paths.iter().any(|p| {
            if p == "/" {
                path == "/"
            } else {
                path == p || path.strip_prefix(p.as_str()).is_some_and(|rest| rest.starts_with('/'))
            }
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().token.is_some()
    }

    pub fn identity(&self) -> Identity {
        self.read().identity.clone()
    }

    pub fn login(&self, token: impl Into<String>, identity: Identity) -> ClientResult<()> {
        let token = token.into();
        self.store.set(TOKEN_KEY, &token)?;
        self.store.set(USER_KEY, &serde_json::to_string(&identity)?)?;

        tracing::info!("signed in as {}", identity.display_label());
        let mut credential = self.write();
        credential.token = Some(token);
        credential.identity = identity;
        Ok(())
    }

    /// Clear the persisted credential and go to the login path
    pub fn logout(&self) -> ClientResult<()> {
        {
            let mut credential = self.write();
            credential.token = None;
            credential.identity = Identity::default();
        }
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_KEY)?;

        tracing::info!("signed out");
        self.navigator.navigate(&self.settings.login_path);
        Ok(())
    }

    /// Attach the bearer header when `path` is an API path and a credential is held
    pub fn authorize(&self, request: reqwest::RequestBuilder, path: &str) -> reqwest::RequestBuilder {
        if !path.starts_with(&self.api_prefix) {
            return request;
        }
        match &self.read().token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Credential> {
        self.credential.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Credential> {
        self.credential.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
