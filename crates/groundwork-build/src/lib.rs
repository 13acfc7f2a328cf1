//! Deployment packaging for Groundwork
//!
//! Stages an application directory (sources plus vendored dependencies)
//! into a gzipped tar archive ready for upload.

pub mod archive;
pub mod error;

pub use archive::ArchiveBuilder;
pub use error::{BuildError, Result};
