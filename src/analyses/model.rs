use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_INACTIVE: &str = "inactive";

/// One row of the additional-analyses table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalAnalysis {
    pub id: i64,
    pub account_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    pub analysis_type: String,
    pub analysis_title: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdditionalAnalysis {
    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }
}

/// Create/update body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdditionalAnalysisRequest {
    pub account_code: String,
    pub analysis_type: String,
    pub analysis_title: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub notes: String,
}

impl AdditionalAnalysisRequest {
    /// Trim fields, default the status, and reject what the server would reject
    pub fn validate(mut self) -> ClientResult<Self> {
        self.account_code = self.account_code.trim().to_string();
        self.analysis_type = self.analysis_type.trim().to_string();
        self.analysis_title = self.analysis_title.trim().to_string();
        self.status = self.status.trim().to_string();

        if self.account_code.is_empty() {
            return Err(ClientError::invalid_input("Account code is required"));
        }
        if self.analysis_type.is_empty() {
            return Err(ClientError::invalid_input("Analysis type is required"));
        }
        if self.analysis_title.is_empty() {
            return Err(ClientError::invalid_input("Analysis title is required"));
        }
        if self.status.is_empty() {
            self.status = STATUS_ACTIVE.to_string();
        }
        Ok(self)
    }
}

impl From<&AdditionalAnalysis> for AdditionalAnalysisRequest {
    fn from(row: &AdditionalAnalysis) -> Self {
        Self {
            account_code: row.account_code.clone(),
            analysis_type: row.analysis_type.clone(),
            analysis_title: row.analysis_title.clone(),
            status: row.status.clone(),
            notes: row.notes.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportRowError {
    #[serde(default)]
    pub row: u32,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportResult {
    #[serde(default)]
    pub success: u32,
    #[serde(default)]
    pub failed: u32,
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(default)]
    pub errors: Option<Vec<ImportRowError>>,
}

impl ImportResult {
    pub fn summary(&self) -> String {
        format!("Import completed: {} records imported, {} failed", self.success, self.failed)
    }
}

/// Body of the export request. Empty filters are left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub format: String,
    /// Columns to include; empty lets the server pick its default set
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
}

impl Default for ExportRequest {
    fn default() -> Self {
        Self { account_code: None, analysis_type: None, status: None, search: None, format: "excel".to_string(), columns: Vec::new() }
    }
}

/// `additional_analyses_2024-03-01.xlsx`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("additional_analyses_{}.xlsx", date.format("%Y-%m-%d"))
}

pub const TEMPLATE_FILE_NAME: &str = "additional_analyses_template.csv";

/// Per-page figures shown above the table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub rows_on_page: usize,
    pub active_on_page: usize,
    pub known_types: usize,
}

impl Statistics {
    pub fn compute(rows: &[AdditionalAnalysis], known_types: usize) -> Self {
        Self {
            rows_on_page: rows.len(),
            active_on_page: rows.iter().filter(|r| r.is_active()).count(),
            known_types,
        }
    }
}
