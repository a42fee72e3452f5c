//! HTTP surface over the dispatch core.

pub mod api;
pub mod models;
