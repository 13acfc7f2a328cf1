//! CloudClient implementation backed by the aws CLI

use crate::awscli::AwsCli;
use crate::error::AwsError;
use async_trait::async_trait;
use groundwork_cloud::policy::PolicyDocument;
use groundwork_cloud::{
    CloudClient, CloudError, PoolCreated, RetryConfig, RoleCreated, TableCreated,
};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;

const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(60);

/// Failure classes worth retrying. Validation errors and already-exists
/// responses are terminal for the call.
const TRANSIENT_MARKERS: [&str; 5] = [
    "ThrottlingException",
    "Throttling",
    "RequestTimeout",
    "ServiceUnavailable",
    "Could not connect to the endpoint URL",
];

/// AWS-backed cloud client
pub struct AwsClient {
    cli: AwsCli,
    retry: RetryConfig,
    call_timeout: Duration,
}

impl AwsClient {
    pub fn new(cli: AwsCli) -> Self {
        Self {
            cli,
            retry: RetryConfig::default(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Run one remote call under a bounded timeout, retrying transient
    /// failures with backoff.
    async fn call<T, F, Fut>(
        &self,
        operation: &str,
        resource: &str,
        f: F,
    ) -> groundwork_cloud::Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = crate::error::Result<T>>,
    {
        let mut delay = self.retry.initial_delay;
        let mut attempt = 1;

        loop {
            let error = match tokio::time::timeout(self.call_timeout, f()).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(e)) => e,
                Err(_) => AwsError::Timeout(self.call_timeout),
            };

            if attempt >= self.retry.max_attempts || !is_transient(&error) {
                return Err(CloudError::RemoteCall {
                    operation: operation.to_string(),
                    resource: resource.to_string(),
                    message: error.to_string(),
                });
            }

            tracing::warn!(
                "{operation} for {resource} failed (attempt {attempt}): {error}, retrying in {delay:?}"
            );
            tokio::time::sleep(delay).await;
            delay = next_delay(delay, &self.retry);
            attempt += 1;
        }
    }
}

fn is_transient(error: &AwsError) -> bool {
    match error {
        AwsError::Timeout(_) => true,
        AwsError::CommandFailed(stderr) => {
            TRANSIENT_MARKERS.iter().any(|marker| stderr.contains(marker))
        }
        _ => false,
    }
}

fn next_delay(delay: Duration, retry: &RetryConfig) -> Duration {
    delay.mul_f64(retry.backoff_multiplier).min(retry.max_delay)
}

fn to_json(policy: &PolicyDocument) -> groundwork_cloud::Result<String> {
    Ok(serde_json::to_string(policy)?)
}

#[async_trait]
impl CloudClient for AwsClient {
    async fn create_identity_pool(
        &self,
        name: &str,
        config: &Value,
    ) -> groundwork_cloud::Result<PoolCreated> {
        let payload = self
            .call("create-identity-pool", name, || {
                self.cli.create_identity_pool(name, config)
            })
            .await?;
        PoolCreated::from_payload(payload)
    }

    async fn create_role(
        &self,
        name: &str,
        trust_policy: &PolicyDocument,
    ) -> groundwork_cloud::Result<RoleCreated> {
        let document = to_json(trust_policy)?;
        let payload = self
            .call("create-role", name, || {
                self.cli.create_role(name, &document)
            })
            .await?;
        RoleCreated::from_payload(payload)
    }

    async fn set_identity_pool_roles(
        &self,
        pool_id: &str,
        authenticated_role_arn: &str,
    ) -> groundwork_cloud::Result<()> {
        self.call("set-identity-pool-roles", pool_id, || {
            self.cli
                .set_identity_pool_roles(pool_id, authenticated_role_arn)
        })
        .await
    }

    async fn create_table(
        &self,
        name: &str,
        config: &Value,
    ) -> groundwork_cloud::Result<TableCreated> {
        let payload = self
            .call("create-table", name, || self.cli.create_table(name, config))
            .await?;
        TableCreated::from_payload(payload)
    }

    async fn put_role_policy(
        &self,
        role_name: &str,
        policy_name: &str,
        policy: &PolicyDocument,
    ) -> groundwork_cloud::Result<()> {
        let document = to_json(policy)?;
        self.call("put-role-policy", role_name, || {
            self.cli.put_role_policy(role_name, policy_name, &document)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttling_is_transient() {
        let error = AwsError::CommandFailed(
            "An error occurred (ThrottlingException) when calling the CreateTable operation"
                .to_string(),
        );
        assert!(is_transient(&error));
        assert!(is_transient(&AwsError::Timeout(Duration::from_secs(1))));
    }

    #[test]
    fn test_already_exists_is_terminal() {
        let error = AwsError::CommandFailed(
            "An error occurred (EntityAlreadyExists) when calling the CreateRole operation"
                .to_string(),
        );
        assert!(!is_transient(&error));

        let error = AwsError::CommandFailed(
            "An error occurred (ValidationException) when calling the CreateTable operation"
                .to_string(),
        );
        assert!(!is_transient(&error));
    }

    #[test]
    fn test_backoff_is_capped() {
        let retry = RetryConfig {
            max_attempts: 5,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(4),
            backoff_multiplier: 3.0,
        };
        let second = next_delay(retry.initial_delay, &retry);
        assert_eq!(second, Duration::from_secs(3));
        let third = next_delay(second, &retry);
        assert_eq!(third, Duration::from_secs(4));
    }
}
