//! Groundwork provisioning core
//!
//! This crate provides the cloud client abstraction and the idempotent
//! provisioning workflow for Groundwork, keeping the ordering and state
//! logic independent of any concrete provider.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 Groundwork CLI                   │
//! │            (gw provision pool/table)             │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │              groundwork-cloud                    │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │          Client Abstraction               │   │
//! │  │  trait CloudClient { ... }                │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │ Policy Docs  │  │  State Store │            │
//! │  └──────────────┘  └──────────────┘            │
//! └───────────────────────┬─────────────────────────┘
//!                         │
//!                 ┌───────▼───────┐
//!                 │    aws CLI    │
//!                 │    adapter    │
//!                 └───────────────┘
//! ```

pub mod client;
pub mod error;
pub mod policy;
pub mod provision;
pub mod state;

// Re-exports
pub use client::{
    CloudClient, POOL_ID_POINTER, PoolCreated, ROLE_ARN_POINTER, RetryConfig, RoleCreated,
    TABLE_ARN_POINTER, TableCreated,
};
pub use error::{CloudError, Result};
pub use policy::{PolicyDocument, assume_role_policy, table_access_policy};
pub use provision::{
    PoolOutcome, Provisioner, TableOutcome, authenticated_role_name, table_policy_name,
};
pub use state::{StateKind, StateRecord, StateStore};
