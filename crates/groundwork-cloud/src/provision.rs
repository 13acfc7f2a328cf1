//! Idempotent provisioning workflow
//!
//! Each resource follows the same shape: require the directory's config
//! file, consult the state store, skip-or-create, persist the provider's
//! response before the next dependent step, then run the cheap association
//! calls unconditionally. A resource whose record was persisted by an
//! earlier run is never created again; its cached identifiers feed the
//! dependent steps instead.

use crate::client::{CloudClient, POOL_ID_POINTER, ROLE_ARN_POINTER, TABLE_ARN_POINTER};
use crate::error::{CloudError, Result};
use crate::policy;
use crate::state::{self, StateKind, StateRecord, StateStore};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;

/// Creation parameters expected in each resource directory
pub const CONFIG_FILE: &str = "config.json";

/// Generated trust policy, written into the pool directory for auditing
pub const ASSUME_ROLE_POLICY_FILE: &str = "assume_role_policy.json";

/// Generated table access policy, written into the table directory
pub const ROLE_POLICY_FILE: &str = "role_policy.json";

/// Name of the authenticated role derived from a pool name
pub fn authenticated_role_name(pool_name: &str) -> String {
    format!("{pool_name}_cognito_authenticated")
}

/// Name of the access policy derived from a table name
pub fn table_policy_name(table_name: &str) -> String {
    format!("{table_name}_table_access")
}

/// Outcome of a pool provisioning run
#[derive(Debug, Clone)]
pub struct PoolOutcome {
    pub pool_name: String,
    pub pool_id: String,
    pub role_name: String,
    pub role_arn: String,

    /// False when the pool record already existed and creation was skipped
    pub pool_created: bool,

    /// False when the role record already existed and creation was skipped
    pub role_created: bool,
}

/// Outcome of a table provisioning run
#[derive(Debug, Clone)]
pub struct TableOutcome {
    pub table_name: String,
    pub table_arn: String,
    pub policy_name: String,

    /// False when the table record already existed and creation was skipped
    pub table_created: bool,
}

/// Drives the provisioning workflow against a [`CloudClient`]
pub struct Provisioner {
    client: Arc<dyn CloudClient>,
}

impl Provisioner {
    pub fn new(client: Arc<dyn CloudClient>) -> Self {
        Self { client }
    }

    /// Provision an identity pool and its authenticated role, then refresh
    /// the pool-to-role binding.
    ///
    /// The binding is a pure association update; it is not gated on state
    /// and runs every time.
    pub async fn provision_identity_pool(&self, dir: &Path) -> Result<PoolOutcome> {
        let pool_name = resource_name(dir)?;
        let config = load_config(dir).await?;
        let store = StateStore::new(dir);

        let (pool_record, pool_created) = match store.load(StateKind::Pool).await? {
            Some(record) => {
                tracing::debug!("Identity pool {pool_name} already provisioned, skipping create");
                (record, false)
            }
            None => {
                tracing::info!("Creating identity pool: {pool_name}");
                let created = self.client.create_identity_pool(&pool_name, &config).await?;
                let record = StateRecord::new(created.payload);
                store.save(StateKind::Pool, &record).await?;
                (record, true)
            }
        };
        let pool_id = pool_record
            .field(POOL_ID_POINTER)
            .map_err(|e| unresolved(dir, e))?
            .to_string();

        let role_name = authenticated_role_name(&pool_name);
        let (role_record, role_created) = match store.load(StateKind::Role).await? {
            Some(record) => {
                tracing::debug!("Role {role_name} already provisioned, skipping create");
                (record, false)
            }
            None => {
                let trust_policy = policy::assume_role_policy(&pool_id);
                state::write_json(&dir.join(ASSUME_ROLE_POLICY_FILE), &trust_policy).await?;

                tracing::info!("Creating role: {role_name}");
                let created = self.client.create_role(&role_name, &trust_policy).await?;
                let record = StateRecord::new(created.payload);
                store.save(StateKind::Role, &record).await?;
                (record, true)
            }
        };
        let role_arn = role_record
            .field(ROLE_ARN_POINTER)
            .map_err(|e| unresolved(dir, e))?
            .to_string();

        self.client
            .set_identity_pool_roles(&pool_id, &role_arn)
            .await?;

        Ok(PoolOutcome {
            pool_name,
            pool_id,
            role_name,
            role_arn,
            pool_created,
            role_created,
        })
    }

    /// Provision a table, then refresh the authenticated role's access
    /// policy for it.
    ///
    /// The policy attachment overwrites on the provider side; like the
    /// pool-role binding it is not gated on state and runs every time.
    pub async fn provision_table(&self, dir: &Path, pool_name: &str) -> Result<TableOutcome> {
        let table_name = resource_name(dir)?;
        let config = load_config(dir).await?;
        let store = StateStore::new(dir);

        let (table_record, table_created) = match store.load(StateKind::Table).await? {
            Some(record) => {
                tracing::debug!("Table {table_name} already provisioned, skipping create");
                (record, false)
            }
            None => {
                tracing::info!("Creating table: {table_name}");
                let created = self.client.create_table(&table_name, &config).await?;
                let record = StateRecord::new(created.payload);
                store.save(StateKind::Table, &record).await?;
                (record, true)
            }
        };
        let table_arn = table_record
            .field(TABLE_ARN_POINTER)
            .map_err(|e| unresolved(dir, e))?
            .to_string();

        let access_policy = policy::table_access_policy(&table_arn);
        state::write_json(&dir.join(ROLE_POLICY_FILE), &access_policy).await?;

        let role_name = authenticated_role_name(pool_name);
        let policy_name = table_policy_name(&table_name);
        self.client
            .put_role_policy(&role_name, &policy_name, &access_policy)
            .await?;

        Ok(TableOutcome {
            table_name,
            table_arn,
            policy_name,
            table_created,
        })
    }
}

/// A resource is named after its config directory.
fn resource_name(dir: &Path) -> Result<String> {
    dir.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| CloudError::InvalidResourceDir(dir.to_path_buf()))
}

async fn load_config(dir: &Path) -> Result<Value> {
    let path = dir.join(CONFIG_FILE);
    let content = match fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(CloudError::MissingConfig(path));
        }
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_str(&content)?)
}

fn unresolved(dir: &Path, cause: CloudError) -> CloudError {
    CloudError::DependencyUnresolved {
        resource: dir.display().to_string(),
        detail: cause.to_string(),
    }
}
