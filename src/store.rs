// src/store.rs - In-memory job record store and printer registry
//
// Stands in for the relational schema of the surrounding CRUD layer.
// The dispatch core only relies on the narrow operations below, so a
// durable backend can replace this without touching the worker logic.
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::model::{
    Customer, Document, DocumentStatus, JobStatus, JobView, PrintJob, Printer, PrinterStatus,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Customer ID {0} not found")]
    CustomerNotFound(String),
    #[error("Printer ID {0} not found")]
    PrinterNotFound(String),
    #[error("Document ID {0} not found")]
    DocumentNotFound(String),
    #[error("PrintJob ID {0} not found")]
    JobNotFound(String),
    #[error("illegal job transition {from:?} -> {to:?}")]
    IllegalTransition { from: JobStatus, to: JobStatus },
}

/// Read-only filter over persisted jobs. Each bound is applied only
/// when present; `start_time`/`end_time` bound the job's creation time.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub customer_id: Option<String>,
    pub printer_id: Option<String>,
    pub document_id: Option<String>,
    pub status: Option<JobStatus>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

pub struct RecordStore {
    customers: RwLock<HashMap<String, Customer>>,
    printers: RwLock<HashMap<String, Printer>>,
    documents: RwLock<HashMap<String, Document>>,
    jobs: RwLock<HashMap<String, PrintJob>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self {
            customers: RwLock::new(HashMap::new()),
            printers: RwLock::new(HashMap::new()),
            documents: RwLock::new(HashMap::new()),
            jobs: RwLock::new(HashMap::new()),
        }
    }

    pub async fn create_customer(&self, name: String, email: String) -> Customer {
        let customer = Customer {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            email,
            created_at: Utc::now(),
        };
        self.customers
            .write()
            .await
            .insert(customer.id.clone(), customer.clone());
        customer
    }

    pub async fn get_customer(&self, id: &str) -> Result<Customer, StoreError> {
        self.customers
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::CustomerNotFound(id.to_string()))
    }

    /// Registers a printer. Seeded printers pass an explicit id; API
    /// callers let the store generate one. A printer always starts idle.
    pub async fn create_printer(
        &self,
        id: Option<String>,
        brand_name: String,
        model: String,
        status: PrinterStatus,
    ) -> Printer {
        let printer = Printer {
            id: id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            brand_name,
            model,
            status,
            busy: false,
            created_at: Utc::now(),
        };
        self.printers
            .write()
            .await
            .insert(printer.id.clone(), printer.clone());
        printer
    }

    pub async fn get_printer(&self, id: &str) -> Result<Printer, StoreError> {
        self.printers
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::PrinterNotFound(id.to_string()))
    }

    pub async fn list_printers(&self) -> Vec<Printer> {
        let mut printers: Vec<Printer> = self.printers.read().await.values().cloned().collect();
        printers.sort_by(|a, b| a.id.cmp(&b.id));
        printers
    }

    pub async fn set_printer_status(
        &self,
        id: &str,
        status: PrinterStatus,
    ) -> Result<Printer, StoreError> {
        let mut printers = self.printers.write().await;
        let printer = printers
            .get_mut(id)
            .ok_or_else(|| StoreError::PrinterNotFound(id.to_string()))?;
        printer.status = status;
        Ok(printer.clone())
    }

    pub async fn set_printer_busy(&self, id: &str, busy: bool) -> Result<(), StoreError> {
        let mut printers = self.printers.write().await;
        let printer = printers
            .get_mut(id)
            .ok_or_else(|| StoreError::PrinterNotFound(id.to_string()))?;
        printer.busy = busy;
        Ok(())
    }

    pub async fn create_document(
        &self,
        customer_id: &str,
        file_name: String,
        total_cost_page: u32,
    ) -> Result<Document, StoreError> {
        self.get_customer(customer_id).await?;
        let document = Document {
            id: uuid::Uuid::new_v4().to_string(),
            customer_id: customer_id.to_string(),
            file_name,
            total_cost_page,
            status: DocumentStatus::Pending,
            job_id: None,
            created_at: Utc::now(),
        };
        self.documents
            .write()
            .await
            .insert(document.id.clone(), document.clone());
        Ok(document)
    }

    pub async fn get_document(&self, id: &str) -> Result<Document, StoreError> {
        self.documents
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::DocumentNotFound(id.to_string()))
    }

    pub async fn update_document_status(
        &self,
        id: &str,
        status: DocumentStatus,
    ) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        let document = documents
            .get_mut(id)
            .ok_or_else(|| StoreError::DocumentNotFound(id.to_string()))?;
        document.status = status;
        Ok(())
    }

    /// Claims each document for the job and resets it to `Pending`,
    /// performed at admission time.
    pub async fn attach_documents_to_job(
        &self,
        job_id: &str,
        document_ids: &[String],
    ) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        for id in document_ids {
            let document = documents
                .get_mut(id)
                .ok_or_else(|| StoreError::DocumentNotFound(id.to_string()))?;
            document.job_id = Some(job_id.to_string());
            document.status = DocumentStatus::Pending;
        }
        Ok(())
    }

    /// Job-wide failure write: every document belonging to the job is
    /// forced to `Failed`, including ones that already printed.
    pub async fn fail_documents_of_job(&self, job_id: &str) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        for document in documents.values_mut() {
            if document.job_id.as_deref() == Some(job_id) {
                document.status = DocumentStatus::Failed;
            }
        }
        Ok(())
    }

    pub async fn create_job(
        &self,
        printer_id: &str,
        customer_id: &str,
        document_ids: Vec<String>,
        total_page_cost: u32,
    ) -> PrintJob {
        let now = Utc::now();
        let job = PrintJob {
            id: uuid::Uuid::new_v4().to_string(),
            printer_id: printer_id.to_string(),
            customer_id: customer_id.to_string(),
            document_ids,
            status: JobStatus::Pending,
            total_page_cost,
            start_time: now,
            end_time: None,
            created_at: now,
        };
        self.jobs.write().await.insert(job.id.clone(), job.clone());
        job
    }

    pub async fn get_job(&self, id: &str) -> Result<PrintJob, StoreError> {
        self.jobs
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::JobNotFound(id.to_string()))
    }

    /// Transitions a job, stamping `start_time` on entry to `Running`
    /// and `end_time` on entry to a terminal state. Anything outside
    /// `Pending -> Running -> Completed | Failed` is rejected.
    pub async fn update_job_status(&self, id: &str, to: JobStatus) -> Result<PrintJob, StoreError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(id)
            .ok_or_else(|| StoreError::JobNotFound(id.to_string()))?;
        let from = job.status;
        let legal = matches!(
            (from, to),
            (JobStatus::Pending, JobStatus::Running)
                | (JobStatus::Running, JobStatus::Completed)
                | (JobStatus::Running, JobStatus::Failed)
        );
        if !legal {
            return Err(StoreError::IllegalTransition { from, to });
        }
        job.status = to;
        match to {
            JobStatus::Running => job.start_time = Utc::now(),
            JobStatus::Completed | JobStatus::Failed => job.end_time = Some(Utc::now()),
            JobStatus::Pending => {}
        }
        Ok(job.clone())
    }

    pub async fn job_view(&self, id: &str) -> Result<JobView, StoreError> {
        let job = self.get_job(id).await?;
        let documents = self.documents.read().await;
        let mut embedded = Vec::with_capacity(job.document_ids.len());
        for document_id in &job.document_ids {
            let document = documents
                .get(document_id)
                .cloned()
                .ok_or_else(|| StoreError::DocumentNotFound(document_id.to_string()))?;
            embedded.push(document);
        }
        Ok(JobView {
            job,
            documents: embedded,
        })
    }

    /// PENDING jobs grouped per printer in creation order, used to
    /// re-seed the dispatch queues after a restart.
    pub async fn pending_jobs_for_recovery(&self) -> Vec<(String, Vec<String>)> {
        let jobs = self.jobs.read().await;
        let mut pending: Vec<&PrintJob> = jobs
            .values()
            .filter(|job| job.status == JobStatus::Pending)
            .collect();
        pending.sort_by_key(|job| job.created_at);

        let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
        for job in pending {
            grouped
                .entry(job.printer_id.clone())
                .or_default()
                .push(job.id.clone());
        }
        let mut out: Vec<(String, Vec<String>)> = grouped.into_iter().collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    /// Pure pass-through filter; validation of the filter itself lives
    /// in the dispatch service.
    pub async fn search_jobs(&self, filter: &JobFilter) -> Vec<JobView> {
        let jobs = self.jobs.read().await;
        let documents = self.documents.read().await;

        let mut matched: Vec<&PrintJob> = jobs
            .values()
            .filter(|job| {
                filter
                    .customer_id
                    .as_ref()
                    .is_none_or(|id| &job.customer_id == id)
                    && filter
                        .printer_id
                        .as_ref()
                        .is_none_or(|id| &job.printer_id == id)
                    && filter
                        .document_id
                        .as_ref()
                        .is_none_or(|id| job.document_ids.contains(id))
                    && filter.status.is_none_or(|status| job.status == status)
                    && filter.start_time.is_none_or(|start| job.created_at >= start)
                    && filter.end_time.is_none_or(|end| job.created_at <= end)
            })
            .collect();
        matched.sort_by_key(|job| job.created_at);

        matched
            .into_iter()
            .map(|job| JobView {
                job: job.clone(),
                documents: job
                    .document_ids
                    .iter()
                    .filter_map(|id| documents.get(id).cloned())
                    .collect(),
            })
            .collect()
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}
