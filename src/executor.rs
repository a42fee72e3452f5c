// src/executor.rs - The unit of work that actually prints one document
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::Document;

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("printer rejected document {0}")]
    Rejected(String),
    #[error("printer I/O error: {0}")]
    Io(String),
}

/// Abstraction over physical printing of a single document. The worker
/// calls this strictly sequentially within a job; this is the only
/// operation expected to suspend for a non-trivial duration.
#[async_trait]
pub trait PrintExecutor: Send + Sync {
    async fn print(&self, document: &Document) -> Result<(), ExecutorError>;
}

/// Fixed-latency stand-in for the real printer driver.
pub struct SimulatedExecutor {
    latency: Duration,
}

impl SimulatedExecutor {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl PrintExecutor for SimulatedExecutor {
    async fn print(&self, document: &Document) -> Result<(), ExecutorError> {
        tracing::debug!(
            "printing document {} ({}, {} pages)",
            document.id,
            document.file_name,
            document.total_cost_page
        );
        tokio::time::sleep(self.latency).await;
        Ok(())
    }
}
