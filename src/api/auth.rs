// Session endpoints: login, logout, current user
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::ApiClient;
use crate::auth::Identity;
use crate::error::ClientResult;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// User record as returned by `/auth/login` and `/auth/me`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub is_active: bool,
}

impl UserInfo {
    pub fn identity(&self) -> Identity {
        Identity::new(self.username.clone(), self.name.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: UserInfo,
}

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a token and persist it in the session
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<UserInfo> {
        let body = LoginRequest { username: username.to_string(), password: password.to_string() };
        let reply = self
            .client
            .send_json::<_, LoginResponse>(Method::POST, &self.client.endpoint("auth/login"), &body)
            .await?;

        let login = reply.data;
        self.client.session().login(login.access_token, login.user.identity())?;
        Ok(login.user)
    }

    /// Tell the server, then clear the local session whatever it answered
    pub async fn logout(&self) -> ClientResult<()> {
        if self.client.session().is_authenticated() {
            let result = self
                .client
                .send_json::<_, Value>(Method::POST, &self.client.endpoint("auth/logout"), &json!({}))
                .await;
            if let Err(e) = result {
                tracing::warn!("server logout failed: {}", e);
            }
        }
        self.client.session().logout()
    }

    pub async fn me(&self) -> ClientResult<UserInfo> {
        self.client.get(&self.client.endpoint("auth/me"), &[]).await
    }
}
