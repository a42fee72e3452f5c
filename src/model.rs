// src/model.rs - Domain records shared by the store, dispatch core, and web API
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Administrative state of a printer. Jobs are only admitted to an
/// `Enabled` printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrinterStatus {
    Enabled,
    Maintenance,
    Disabled,
}

/// Lifecycle of a print job. Legal transitions are
/// `Pending -> Running -> Completed | Failed`; a job never skips
/// `Running` and never leaves a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Per-document progress, kept in lock-step with the owning job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    Pending,
    IsPrinting,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Printer {
    pub id: String,
    pub brand_name: String,
    pub model: String,
    pub status: PrinterStatus,
    /// True iff a worker is currently draining this printer's queue.
    pub busy: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub customer_id: String,
    pub file_name: String,
    /// Page cost precomputed by the CRUD layer at upload time.
    pub total_cost_page: u32,
    pub status: DocumentStatus,
    /// Set once the document is admitted into a print job.
    pub job_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A batch of documents submitted together for sequential printing on
/// one printer. `document_ids` order is print order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintJob {
    pub id: String,
    pub printer_id: String,
    pub customer_id: String,
    pub document_ids: Vec<String>,
    pub status: JobStatus,
    pub total_page_cost: u32,
    pub start_time: DateTime<Utc>,
    /// Set only when the job reaches `Completed` or `Failed`.
    pub end_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A print job with its documents embedded, as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct JobView {
    #[serde(flatten)]
    pub job: PrintJob,
    pub documents: Vec<Document>,
}
