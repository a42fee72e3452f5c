//! PrintHub - dispatch core for a university managed-print service.
//!
//! Customers submit batches of documents as print jobs against shared
//! printers. Each printer is served by at most one worker task at a time
//! (single-flight); jobs on the same printer run strictly in admission
//! order, while different printers drain independently.

pub mod config;
pub mod dispatch;
pub mod executor;
pub mod model;
pub mod store;
pub mod web;

pub use dispatch::{DispatchError, DispatchService};
pub use executor::{ExecutorError, PrintExecutor, SimulatedExecutor};
pub use store::{JobFilter, RecordStore, StoreError};
