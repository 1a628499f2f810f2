use std::path::Path;

use reqwest::Method;
use serde_json::Value;

use crate::api::{ApiClient, Page, Reply};
use crate::error::{ClientError, ClientResult};

use super::model::{AdditionalAnalysis, AdditionalAnalysisRequest, ExportRequest, ImportResult};

pub const RESOURCE: &str = "additional-analyses";

/// Typed calls for `{prefix}/additional-analyses`
#[derive(Clone)]
pub struct AnalysesApi {
    client: ApiClient,
}

impl AnalysesApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    fn path(&self, tail: &str) -> String {
        if tail.is_empty() {
            self.client.endpoint(RESOURCE)
        } else {
            self.client.endpoint(&format!("{}/{}", RESOURCE, tail))
        }
    }

    pub async fn list(&self, query: &[(String, String)]) -> ClientResult<Page<AdditionalAnalysis>> {
        self.client.get(&self.path(""), query).await
    }

    pub async fn get(&self, id: i64) -> ClientResult<AdditionalAnalysis> {
        self.client.get(&self.path(&id.to_string()), &[]).await
    }

    pub async fn create(&self, request: AdditionalAnalysisRequest) -> ClientResult<Reply<AdditionalAnalysis>> {
        let request = request.validate()?;
        self.client.send_json(Method::POST, &self.path(""), &request).await
    }

    pub async fn update(
        &self,
        id: i64,
        request: AdditionalAnalysisRequest,
    ) -> ClientResult<Reply<AdditionalAnalysis>> {
        let request = request.validate()?;
        self.client.send_json(Method::PUT, &self.path(&id.to_string()), &request).await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<Reply<Value>> {
        self.client.delete(&self.path(&id.to_string())).await
    }

    /// Permanent removal; `delete` only deactivates on the server
    pub async fn hard_delete(&self, id: i64) -> ClientResult<Reply<Value>> {
        self.client.delete(&self.path(&format!("{}/hard", id))).await
    }

    /// Every analysis attached to one account, unpaginated
    pub async fn by_account(&self, account_code: &str) -> ClientResult<Vec<AdditionalAnalysis>> {
        let account_code = account_code.trim();
        if account_code.is_empty() {
            return Err(ClientError::invalid_input("Account code is required"));
        }
        let rows: Option<Vec<AdditionalAnalysis>> =
            self.client.get(&self.path(&format!("account/{}", account_code)), &[]).await?;
        Ok(rows.unwrap_or_default())
    }

    /// Names accepted for `analysis_type`
    pub async fn types(&self) -> ClientResult<Vec<String>> {
        let types: Option<Vec<String>> = self.client.get(&self.path("types"), &[]).await?;
        Ok(types.unwrap_or_default())
    }

    pub async fn import(&self, file_name: &str, bytes: Vec<u8>) -> ClientResult<Reply<ImportResult>> {
        self.client.upload(&self.path("import"), "file", file_name, bytes).await
    }

    pub async fn import_file(&self, path: &Path) -> ClientResult<Reply<ImportResult>> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ClientError::invalid_input(format!("not a file: {}", path.display())))?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ClientError::invalid_input(format!("cannot read {}: {}", path.display(), e)))?;
        self.import(file_name, bytes).await
    }

    /// Spreadsheet of every row matching `request`
    pub async fn export(&self, request: &ExportRequest) -> ClientResult<Vec<u8>> {
        let body = serde_json::to_value(request)?;
        self.client.download(Method::POST, &self.path("export"), Some(&body)).await
    }

    pub async fn template(&self) -> ClientResult<Vec<u8>> {
        self.client.download(Method::GET, &self.path("template"), None).await
    }
}
