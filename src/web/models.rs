//! Contains the data models for API requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{JobStatus, PrinterStatus};

/// Request to submit a batch of documents as one print job.
#[derive(Debug, Deserialize)]
pub struct SubmitJobRequest {
    pub printer_id: String,
    pub customer_id: String,
    pub document_ids: Vec<String>,
}

/// Query parameters for the job search endpoint. Times are RFC 3339.
#[derive(Debug, Default, Deserialize)]
pub struct SearchJobsQuery {
    pub customer_id: Option<String>,
    pub printer_id: Option<String>,
    pub document_id: Option<String>,
    pub status: Option<JobStatus>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePrinterRequest {
    /// Optional explicit id; generated when absent.
    pub id: Option<String>,
    #[serde(default)]
    pub brand_name: String,
    #[serde(default)]
    pub model: String,
    #[serde(default = "default_printer_status")]
    pub status: PrinterStatus,
}

fn default_printer_status() -> PrinterStatus {
    PrinterStatus::Enabled
}

#[derive(Debug, Deserialize)]
pub struct UpdatePrinterStatusRequest {
    pub status: PrinterStatus,
}

#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateDocumentRequest {
    pub customer_id: String,
    pub file_name: String,
    pub total_cost_page: u32,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
