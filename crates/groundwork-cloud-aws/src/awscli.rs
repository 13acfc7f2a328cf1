//! aws CLI wrapper
//!
//! Wraps the aws CLI commands the provisioning workflow needs. Each method
//! is a single invocation; retry and timeout policy live in the client
//! layer above.

use crate::error::{AwsError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// aws CLI wrapper
pub struct AwsCli {
    region: Option<String>,
    profile: Option<String>,
}

impl AwsCli {
    pub fn new(region: Option<String>, profile: Option<String>) -> Self {
        Self { region, profile }
    }

    /// Check if the aws CLI is installed and credentials resolve
    pub async fn check_auth(&self) -> Result<CallerIdentity> {
        let which = Command::new("which").arg("aws").output().await?;

        if !which.status.success() {
            return Err(AwsError::CliNotFound);
        }

        let output = self.run_command(&["sts", "get-caller-identity"]).await?;

        let identity: CallerIdentity = serde_json::from_str(&output)?;
        Ok(identity)
    }

    /// Run an aws command and return stdout
    async fn run_command(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("aws");
        if let Some(ref region) = self.region {
            cmd.arg("--region").arg(region);
        }
        if let Some(ref profile) = self.profile {
            cmd.arg("--profile").arg(profile);
        }
        cmd.args(args);
        cmd.arg("--output").arg("json");
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("Running: aws {}", args.join(" "));

        let output = cmd.output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AwsError::CommandFailed(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Create an identity pool
    pub async fn create_identity_pool(&self, name: &str, config: &Value) -> Result<Value> {
        let input = cli_input(config, "IdentityPoolName", name)?;
        let output = self
            .run_command(&[
                "cognito-identity",
                "create-identity-pool",
                "--cli-input-json",
                &input,
            ])
            .await?;

        Ok(serde_json::from_str(&output)?)
    }

    /// Create a role with a trust policy document
    pub async fn create_role(&self, name: &str, trust_policy: &str) -> Result<Value> {
        let output = self
            .run_command(&[
                "iam",
                "create-role",
                "--role-name",
                name,
                "--assume-role-policy-document",
                trust_policy,
            ])
            .await?;

        Ok(serde_json::from_str(&output)?)
    }

    /// Bind the authenticated role to an identity pool
    pub async fn set_identity_pool_roles(&self, pool_id: &str, role_arn: &str) -> Result<()> {
        let roles = format!("authenticated={role_arn}");
        self.run_command(&[
            "cognito-identity",
            "set-identity-pool-roles",
            "--identity-pool-id",
            pool_id,
            "--roles",
            &roles,
        ])
        .await?;
        Ok(())
    }

    /// Create a table
    pub async fn create_table(&self, name: &str, config: &Value) -> Result<Value> {
        let input = cli_input(config, "TableName", name)?;
        let output = self
            .run_command(&["dynamodb", "create-table", "--cli-input-json", &input])
            .await?;

        Ok(serde_json::from_str(&output)?)
    }

    /// Attach an inline policy to a role (overwrites same-named policy)
    pub async fn put_role_policy(
        &self,
        role_name: &str,
        policy_name: &str,
        policy: &str,
    ) -> Result<()> {
        self.run_command(&[
            "iam",
            "put-role-policy",
            "--role-name",
            role_name,
            "--policy-name",
            policy_name,
            "--policy-document",
            policy,
        ])
        .await?;
        Ok(())
    }

    /// Upload a packaged archive as a function's new code
    pub async fn update_function_code(&self, function: &str, archive: &Path) -> Result<Value> {
        let zip_file = format!("fileb://{}", archive.display());
        let output = self
            .run_command(&[
                "lambda",
                "update-function-code",
                "--function-name",
                function,
                "--zip-file",
                &zip_file,
            ])
            .await?;

        Ok(serde_json::from_str(&output)?)
    }
}

/// Merge the resource name into the directory's opaque creation parameters
/// to form the CLI input document.
fn cli_input(config: &Value, name_key: &str, name: &str) -> Result<String> {
    let mut input = config.as_object().cloned().unwrap_or_default();
    input.insert(name_key.to_string(), Value::String(name.to_string()));
    Ok(serde_json::to_string(&Value::Object(input))?)
}

/// Caller identity from `sts get-caller-identity`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallerIdentity {
    #[serde(rename = "Account")]
    pub account: String,

    #[serde(rename = "Arn")]
    pub arn: String,

    #[serde(rename = "UserId")]
    pub user_id: String,
}
