// src/dispatch/mod.rs - Per-printer print-job dispatch queue
//
// One logical FIFO queue per printer id and a single-flight worker that
// drains it. Admission and the worker both go through the `slots` mutex,
// so the busy check-and-set is atomic: two concurrent submissions to an
// idle printer start exactly one worker.
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Weak};

use thiserror::Error;
use tokio::sync::Mutex;

use crate::executor::PrintExecutor;
use crate::model::{DocumentStatus, JobStatus, JobView, PrinterStatus};
use crate::store::{JobFilter, RecordStore, StoreError};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("at least one document ID must be provided")]
    EmptyDocumentList,
    #[error("Printer ID {0} is not enabled")]
    PrinterNotEnabled(String),
    #[error("startTime must be less than or equal to endTime")]
    InvalidTimeRange,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Per-printer queue state. `draining` is the single-flight latch: it is
/// set exactly once per cold start of a worker and cleared only by that
/// worker when it observes an empty backlog.
#[derive(Default)]
struct PrinterSlot {
    backlog: VecDeque<String>,
    draining: bool,
}

pub struct DispatchService {
    store: Arc<RecordStore>,
    executor: Arc<dyn PrintExecutor>,
    slots: Mutex<HashMap<String, PrinterSlot>>,
    weak: Weak<DispatchService>,
}

impl DispatchService {
    pub fn new(store: Arc<RecordStore>, executor: Arc<dyn PrintExecutor>) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            store,
            executor,
            slots: Mutex::new(HashMap::new()),
            weak: weak.clone(),
        })
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    /// Validates and admits a print request: either the whole job is
    /// created and enqueued, or nothing is. Returns the created job
    /// immediately; printing runs asynchronously on the worker.
    pub async fn submit_job(
        &self,
        printer_id: &str,
        customer_id: &str,
        document_ids: Vec<String>,
    ) -> Result<JobView, DispatchError> {
        if document_ids.is_empty() {
            return Err(DispatchError::EmptyDocumentList);
        }

        self.store.get_customer(customer_id).await?;
        let printer = self.store.get_printer(printer_id).await?;
        if printer.status != PrinterStatus::Enabled {
            return Err(DispatchError::PrinterNotEnabled(printer_id.to_string()));
        }

        let mut total_page_cost: u32 = 0;
        for document_id in &document_ids {
            let document = self.store.get_document(document_id).await?;
            total_page_cost += document.total_cost_page;
        }

        let job = self
            .store
            .create_job(printer_id, customer_id, document_ids.clone(), total_page_cost)
            .await;
        self.store
            .attach_documents_to_job(&job.id, &document_ids)
            .await?;

        tracing::info!(
            "job {} admitted: {} documents, {} pages, printer {}",
            job.id,
            document_ids.len(),
            total_page_cost,
            printer_id
        );
        self.enqueue(printer_id, &job.id).await;

        Ok(self.store.job_view(&job.id).await?)
    }

    /// Appends the job to the printer's queue and cold-starts a worker
    /// if none is draining. Both happen under one lock; the worker's
    /// empty-queue check takes the same lock, so no admission can slip
    /// between "backlog empty" and "worker stopped".
    async fn enqueue(&self, printer_id: &str, job_id: &str) {
        let mut slots = self.slots.lock().await;
        let slot = slots.entry(printer_id.to_string()).or_default();
        slot.backlog.push_back(job_id.to_string());
        if !slot.draining {
            slot.draining = true;
            if let Err(e) = self.store.set_printer_busy(printer_id, true).await {
                tracing::error!("failed to mark printer {} busy: {}", printer_id, e);
            }
            if let Some(service) = self.weak.upgrade() {
                tokio::spawn(service.drain(printer_id.to_string()));
            }
        }
    }

    /// Worker drain loop: one job at a time until the backlog is empty,
    /// then release the printer and stop. A failed job never stalls the
    /// queue; the loop always moves on to the next one.
    async fn drain(self: Arc<Self>, printer_id: String) {
        tracing::info!("worker started for printer {}", printer_id);
        loop {
            let next = {
                let mut slots = self.slots.lock().await;
                let slot = slots.entry(printer_id.clone()).or_default();
                match slot.backlog.pop_front() {
                    Some(job_id) => Some(job_id),
                    None => {
                        slot.draining = false;
                        if let Err(e) = self.store.set_printer_busy(&printer_id, false).await {
                            tracing::error!("failed to mark printer {} idle: {}", printer_id, e);
                        }
                        None
                    }
                }
            };
            let Some(job_id) = next else {
                tracing::info!("queue drained, worker for printer {} stopping", printer_id);
                break;
            };

            if let Err(e) = self.run_job(&job_id).await {
                // Store-unavailable class: log, best-effort mark the job
                // failed, and keep draining rather than wedging the printer.
                tracing::error!("job {} aborted by store failure: {}", job_id, e);
                let _ = self.store.update_job_status(&job_id, JobStatus::Failed).await;
                let _ = self.store.fail_documents_of_job(&job_id).await;
            }
        }
    }

    /// Executes one job: Pending -> Running, documents strictly in
    /// submission order, then Running -> Completed or Failed. Failure is
    /// job-wide: any document error fails every document in the job,
    /// including ones that already printed.
    async fn run_job(&self, job_id: &str) -> Result<(), StoreError> {
        let job = self.store.get_job(job_id).await?;
        self.store
            .update_job_status(job_id, JobStatus::Running)
            .await?;
        tracing::info!(
            "job {} running on printer {} ({} documents)",
            job_id,
            job.printer_id,
            job.document_ids.len()
        );

        let mut failure = None;
        for document_id in &job.document_ids {
            self.store
                .update_document_status(document_id, DocumentStatus::IsPrinting)
                .await?;
            let document = self.store.get_document(document_id).await?;
            match self.executor.print(&document).await {
                Ok(()) => {
                    self.store
                        .update_document_status(document_id, DocumentStatus::Completed)
                        .await?;
                }
                Err(e) => {
                    failure = Some((document_id.clone(), e));
                    break;
                }
            }
        }

        match failure {
            None => {
                self.store
                    .update_job_status(job_id, JobStatus::Completed)
                    .await?;
                tracing::info!("job {} completed", job_id);
            }
            Some((document_id, e)) => {
                tracing::warn!("job {} failed on document {}: {}", job_id, document_id, e);
                self.store
                    .update_job_status(job_id, JobStatus::Failed)
                    .await?;
                self.store.fail_documents_of_job(job_id).await?;
            }
        }
        Ok(())
    }

    /// Point lookup with embedded documents.
    pub async fn get_job(&self, job_id: &str) -> Result<JobView, DispatchError> {
        Ok(self.store.job_view(job_id).await?)
    }

    /// Validates the filter (referenced records must exist, time range
    /// must be ordered) and passes it through to the store.
    pub async fn search_jobs(&self, filter: JobFilter) -> Result<Vec<JobView>, DispatchError> {
        if let Some(customer_id) = &filter.customer_id {
            self.store.get_customer(customer_id).await?;
        }
        if let Some(printer_id) = &filter.printer_id {
            self.store.get_printer(printer_id).await?;
        }
        if let Some(document_id) = &filter.document_id {
            self.store.get_document(document_id).await?;
        }
        if let (Some(start), Some(end)) = (&filter.start_time, &filter.end_time) {
            if start > end {
                return Err(DispatchError::InvalidTimeRange);
            }
        }
        Ok(self.store.search_jobs(&filter).await)
    }

    /// Re-seeds the per-printer queues from PENDING jobs left in the
    /// store by a previous run and kicks their workers. Returns the
    /// number of jobs re-queued.
    pub async fn recover_pending(&self) -> usize {
        let mut recovered = 0;
        for (printer_id, job_ids) in self.store.pending_jobs_for_recovery().await {
            for job_id in job_ids {
                self.enqueue(&printer_id, &job_id).await;
                recovered += 1;
            }
        }
        if recovered > 0 {
            tracing::info!("re-queued {} pending jobs from a previous run", recovered);
        }
        recovered
    }
}
