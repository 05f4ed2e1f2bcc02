//! Toolkit for the West and Central Africa NLP landscape research repository.
//!
//! Collects per-language metadata, hub listings and benchmark results into
//! YAML files under `Research/`, merges researcher overrides, scores the
//! organizations working on these languages and publishes everything as a
//! static site and office documents.

pub mod actors;
pub mod config;
pub mod docs;
pub mod error;
pub mod evaluations;
pub mod fetch;
pub mod languages;
pub mod records;
pub mod render;
pub mod report;
pub mod retry;
pub mod sources;
pub mod store;
