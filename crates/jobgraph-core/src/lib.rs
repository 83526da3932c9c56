//! Job queue data model shared by the jobgraph crates.
//!
//! Jobs arrive from an external scheduler tool as JSON. This crate decodes that payload
//! leniently (unknown statuses, missing fields and string/number ids are all accepted) and
//! provides the small pure helpers the dashboard needs around it: status summaries, filters
//! and compact id-range labels.

pub mod error;
pub mod filter;
pub mod job;
pub mod range;
pub mod snapshot;
pub mod summary;

pub use error::{Error, Result};
pub use filter::JobFilter;
pub use job::{Job, JobId, JobStats, JobStatus, StatusCategory};
pub use range::format_range;
pub use snapshot::JobSnapshot;
pub use summary::StatusCounts;
