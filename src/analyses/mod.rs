//! The additional-analyses resource: row model, write body, and endpoint calls.

pub mod api;
pub mod model;

pub use api::{AnalysesApi, RESOURCE};
pub use model::{
    export_file_name, AdditionalAnalysis, AdditionalAnalysisRequest, ExportRequest, ImportResult, Statistics,
    TEMPLATE_FILE_NAME,
};
