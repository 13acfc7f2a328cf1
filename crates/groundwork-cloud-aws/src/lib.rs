//! AWS adapter for Groundwork
//!
//! Satisfies the [`groundwork_cloud::CloudClient`] boundary by shelling out
//! to the aws CLI, the same credentials and configuration surface operators
//! already use. The provisioning core never sees the CLI; it only sees the
//! trait.

pub mod awscli;
pub mod client;
pub mod error;

pub use awscli::{AwsCli, CallerIdentity};
pub use client::AwsClient;
pub use error::{AwsError, Result};
