//! Cloud client trait definition

use crate::error::{CloudError, Result};
use crate::policy::PolicyDocument;
use async_trait::async_trait;
use serde_json::Value;

/// JSON pointer to the identity pool id in a pool creation response.
pub const POOL_ID_POINTER: &str = "/IdentityPoolId";

/// JSON pointer to the role ARN in a role creation response.
pub const ROLE_ARN_POINTER: &str = "/Role/Arn";

/// JSON pointer to the table ARN in a table creation response.
pub const TABLE_ARN_POINTER: &str = "/TableDescription/TableArn";

/// Cloud provisioning abstraction
///
/// The orchestrator drives resource creation exclusively through this
/// trait; any concrete provider (or a test double) implements it.
///
/// All operations are single remote calls. `set_identity_pool_roles` and
/// `put_role_policy` overwrite on the provider side and are safe to repeat;
/// the three create operations are guarded by the orchestrator's state
/// store and run at most once per logical resource across runs.
#[async_trait]
pub trait CloudClient: Send + Sync {
    /// Create an identity pool. `config` is passed through verbatim.
    async fn create_identity_pool(&self, name: &str, config: &Value) -> Result<PoolCreated>;

    /// Create a role with the given trust policy.
    async fn create_role(&self, name: &str, trust_policy: &PolicyDocument) -> Result<RoleCreated>;

    /// Bind the authenticated role to an identity pool.
    async fn set_identity_pool_roles(
        &self,
        pool_id: &str,
        authenticated_role_arn: &str,
    ) -> Result<()>;

    /// Create a data table. `config` is passed through verbatim.
    async fn create_table(&self, name: &str, config: &Value) -> Result<TableCreated>;

    /// Attach an inline policy to a role. Overwrites any existing policy of
    /// the same name.
    async fn put_role_policy(
        &self,
        role_name: &str,
        policy_name: &str,
        policy: &PolicyDocument,
    ) -> Result<()>;
}

fn required_field(payload: &Value, pointer: &str) -> Result<String> {
    payload
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| CloudError::FieldNotFound {
            pointer: pointer.to_string(),
        })
}

/// Result of an identity pool creation call
#[derive(Debug, Clone)]
pub struct PoolCreated {
    /// Provider-assigned pool id
    pub id: String,

    /// Full provider response, persisted verbatim by the orchestrator
    pub payload: Value,
}

impl PoolCreated {
    pub fn from_payload(payload: Value) -> Result<Self> {
        let id = required_field(&payload, POOL_ID_POINTER)?;
        Ok(Self { id, payload })
    }
}

/// Result of a role creation call
#[derive(Debug, Clone)]
pub struct RoleCreated {
    /// ARN of the created role
    pub arn: String,

    /// Full provider response, persisted verbatim by the orchestrator
    pub payload: Value,
}

impl RoleCreated {
    pub fn from_payload(payload: Value) -> Result<Self> {
        let arn = required_field(&payload, ROLE_ARN_POINTER)?;
        Ok(Self { arn, payload })
    }
}

/// Result of a table creation call
#[derive(Debug, Clone)]
pub struct TableCreated {
    /// ARN of the created table
    pub arn: String,

    /// Full provider response, persisted verbatim by the orchestrator
    pub payload: Value,
}

impl TableCreated {
    pub fn from_payload(payload: Value) -> Result<Self> {
        let arn = required_field(&payload, TABLE_ARN_POINTER)?;
        Ok(Self { arn, payload })
    }
}

/// Retry configuration for client operations
///
/// Adapters retry transient failures only; validation and already-exists
/// responses are terminal for the call.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts per call
    pub max_attempts: u32,

    /// Initial delay between retries
    pub initial_delay: std::time::Duration,

    /// Maximum delay between retries
    pub max_delay: std::time::Duration,

    /// Backoff multiplier
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: std::time::Duration::from_secs(1),
            max_delay: std::time::Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pool_created_from_payload() {
        let created = PoolCreated::from_payload(json!({
            "IdentityPoolId": "us-east-1:abcd",
            "IdentityPoolName": "acme"
        }))
        .unwrap();
        assert_eq!(created.id, "us-east-1:abcd");
        assert_eq!(created.payload["IdentityPoolName"], "acme");
    }

    #[test]
    fn test_role_created_requires_nested_arn() {
        let err = RoleCreated::from_payload(json!({"Role": {"RoleName": "x"}})).unwrap_err();
        assert!(matches!(err, CloudError::FieldNotFound { ref pointer } if pointer == ROLE_ARN_POINTER));
    }

    #[test]
    fn test_table_created_from_payload() {
        let created = TableCreated::from_payload(json!({
            "TableDescription": {"TableArn": "arn:aws:dynamodb:us-east-1:123:table/notes"}
        }))
        .unwrap();
        assert_eq!(created.arn, "arn:aws:dynamodb:us-east-1:123:table/notes");
    }
}
