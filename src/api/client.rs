use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::api::{Envelope, Reply};
use crate::auth::AuthSession;
use crate::config::ApiConfig;
use crate::error::{ClientError, ClientResult};

/// Thin wrapper over `reqwest::Client`. Every request goes through
/// [`ApiClient::request`], which is where the bearer credential is attached.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    prefix: String,
    session: Arc<AuthSession>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Arc<AuthSession>) -> ClientResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ClientError::invalid_input(format!("invalid API base URL '{}': {}", config.base_url, e)))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url,
            prefix: config.prefix.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Arc<AuthSession> {
        &self.session
    }

    /// `{prefix}/{tail}`, e.g. `endpoint("additional-analyses/7")`
    pub fn endpoint(&self, tail: &str) -> String {
        format!("{}/{}", self.prefix, tail.trim_start_matches('/'))
    }

    /// Build a request for an absolute path with the credential attached
    pub fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| ClientError::invalid_input(format!("invalid request path '{}': {}", path, e)))?;
        tracing::debug!("{} {}", method, url);
        Ok(self.session.authorize(self.http.request(method, url), path))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(String, String)]) -> ClientResult<T> {
        let request = self.request(Method::GET, path)?.query(query);
        Ok(read_envelope(request.send().await?).await?.data)
    }

    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> ClientResult<Reply<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(method, path)?.json(body);
        read_envelope(request.send().await?).await
    }

    pub async fn delete(&self, path: &str) -> ClientResult<Reply<Value>> {
        let request = self.request(Method::DELETE, path)?;
        read_envelope(request.send().await?).await
    }

    /// Multipart upload with the file under `field`
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        field: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<Reply<T>> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part(field.to_string(), part);
        let request = self.request(Method::POST, path)?.multipart(form);
        read_envelope(request.send().await?).await
    }

    /// Raw body of a binary endpoint (spreadsheet export, CSV template)
    pub async fn download(&self, method: Method, path: &str, body: Option<&Value>) -> ClientResult<Vec<u8>> {
        let mut request = self.request(method, path)?;
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Envelope<Value>>(&text).map(|e| e.text()).unwrap_or_default();
            return Err(failure(status, message));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Decode the `{success, data, message}` envelope, mapping failures onto the
/// client error taxonomy
pub async fn read_envelope<T: DeserializeOwned>(response: Response) -> ClientResult<Reply<T>> {
    let status = response.status();
    let text = response.text().await?;

    let envelope: Envelope<Value> = match serde_json::from_str(&text) {
        Ok(envelope) => envelope,
        Err(e) if status.is_success() => return Err(ClientError::decode(e.to_string())),
        Err(_) => return Err(failure(status, String::new())),
    };

    if !status.is_success() || !envelope.success {
        return Err(failure(status, envelope.text()));
    }

    let message = envelope.message.clone();
    let data = serde_json::from_value(envelope.data.unwrap_or(Value::Null))?;
    Ok(Reply { data, message })
}

fn failure(status: StatusCode, message: String) -> ClientError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::unauthorized(message),
        _ => ClientError::server(status.as_u16(), message),
    }
}
