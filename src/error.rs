// Client-side error taxonomy for panel requests
use thiserror::Error;

/// Every failure a single user action can hit. None of these are fatal to the
/// process; the caller surfaces one message and abandons that action.
#[derive(Error, Debug)]
pub enum ClientError {
    // Request never completed (DNS, connect, timeout, reset)
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    // Response parsed, but the server reported failure
    #[error("{message}")]
    Server { status: u16, message: String },

    // Missing or expired credential, as reported by the server
    #[error("{0}")]
    Unauthorized(String),

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("credential storage error: {0}")]
    Storage(String),

    #[error("login required (go to {login_path})")]
    LoginRequired { login_path: String },

    #[error("{0}")]
    InvalidInput(String),
}

impl ClientError {
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        ClientError::Server { status, message: message.into() }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ClientError::Unauthorized(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        ClientError::Decode(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        ClientError::Storage(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        ClientError::InvalidInput(message.into())
    }

    /// HTTP status behind the failure, when there was a response at all
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            ClientError::Server { status, .. } => Some(*status),
            ClientError::Unauthorized(_) => Some(401),
            _ => None,
        }
    }

    /// Error code for scripted consumers of `--json` output
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Transport(_) => "NETWORK_ERROR",
            ClientError::Server { .. } => "SERVER_ERROR",
            ClientError::Unauthorized(_) => "UNAUTHORIZED",
            ClientError::Decode(_) => "INVALID_RESPONSE",
            ClientError::Storage(_) => "STORAGE_ERROR",
            ClientError::LoginRequired { .. } => "LOGIN_REQUIRED",
            ClientError::InvalidInput(_) => "INVALID_INPUT",
        }
    }

    /// One human-readable line for the notification area.
    ///
    /// `fallback` names the action ("Failed to load additional analyses") and
    /// is used when the server gave no message of its own.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Server { message, .. } | ClientError::Unauthorized(message)
                if !message.trim().is_empty() =>
            {
                message.clone()
            }
            ClientError::InvalidInput(message) => message.clone(),
            ClientError::LoginRequired { .. } => self.to_string(),
            _ => fallback.to_string(),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
