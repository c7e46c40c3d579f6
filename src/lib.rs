//! AI-assisted security scanning for source repositories
//!
//! The crate is organized around four systems, each exposing its surface
//! through an `api` module:
//!
//! - [`source`]: repository listing, content fetching and tree traversal
//! - [`analysis`]: per-file analysis, finding aggregation and summaries
//! - [`scan`]: scan records, lifecycle transitions and orchestration
//! - [`app`]: the command line shell on top of the above
//!
//! [`core`] holds the shared plumbing: configuration, logging, retry and
//! small helpers.

pub mod analysis;
pub mod app;
pub mod core;
pub mod scan;
pub mod source;
