#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for ml-appraise
//!
//! This library consolidates all functionality for the ml-appraise tool, which classifies
//! references to machine-learning models, datasets and code repositories, collects metadata
//! about them, and produces a weighted trust score for every model.
//!
//! # Module Organization
//!
//! - [`intake`]: Turning raw URL lists into classified, cross-referenced entries
//! - [`facts`]: Metadata collection and normalization
//! - [`metrics`]: Individual heuristic metrics
//! - [`scoring`]: Failure-isolated metric execution and weighted aggregation
//! - [`reports`]: NDJSON, CSV and console output
//! - [`commands`]: Command-line interface and orchestration

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

pub mod facts;
pub mod intake;
pub mod metrics;
pub mod reports;
pub mod scoring;

pub use crate::commands::{Host, run};
