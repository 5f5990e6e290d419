//! Metadata collection and normalization
//!
//! This module gathers what is known about each classified entry from two external sources: the
//! model hub (metadata documents and README text) and the source-control host (commit authors,
//! file trees, license detection and README text).
//!
//! # Implementation Model
//!
//! The core type is [`ArtifactFacts`], which bundles the entry, the raw hub document, the
//! normalized [`Attributes`] derived from it, and the repository data.
//!
//! Each data source is wrapped in a [`ProviderResult`] which can be `Found`, `NotFound`,
//! `Unavailable` or `Error`, so a failed fetch becomes a marker inside the facts rather than an
//! error returned to the caller.
//!
//! The [`Collector`] drives the providers for a single entry. Entries are independent, so the
//! scoring command runs a bounded number of collections at once and keeps rows in input order.

mod artifact_facts;
mod attributes;
mod collector;
pub mod hosting;
pub mod hub;
mod progress;
mod provider_result;
mod readme_links;
mod repo_spec;
pub(crate) mod resilient_http;
mod throttler;

pub use artifact_facts::ArtifactFacts;
pub use attributes::{Attributes, LicenseHints, normalize, probe, scan_readme_for_license};
pub use collector::Collector;
pub use progress::Progress;
pub use provider_result::ProviderResult;
pub use readme_links::{find_repository_links, first_repository_link};
pub use repo_spec::RepoSpec;
