use colored::Colorize;
use groundwork_cloud::Provisioner;
use groundwork_cloud_aws::{AwsCli, AwsClient};
use std::path::Path;
use std::sync::Arc;

fn provisioner(region: Option<String>, profile: Option<String>) -> Provisioner {
    let client = AwsClient::new(AwsCli::new(region, profile));
    Provisioner::new(Arc::new(client))
}

pub async fn handle_pool(
    dir: &Path,
    region: Option<String>,
    profile: Option<String>,
) -> anyhow::Result<()> {
    println!("{}", "Provisioning identity pool...".blue().bold());
    println!("  Directory: {}", dir.display().to_string().cyan());

    let outcome = provisioner(region, profile)
        .provision_identity_pool(dir)
        .await?;

    if outcome.pool_created {
        println!(
            "  {} Pool {} created (ID: {})",
            "✓".green(),
            outcome.pool_name.cyan(),
            outcome.pool_id
        );
    } else {
        println!(
            "  - Pool {} already provisioned (ID: {})",
            outcome.pool_name.cyan(),
            outcome.pool_id
        );
    }

    if outcome.role_created {
        println!("  {} Role {} created", "✓".green(), outcome.role_name.cyan());
    } else {
        println!("  - Role {} already provisioned", outcome.role_name.cyan());
    }

    println!("  {} Authenticated role bound to pool", "✓".green());
    Ok(())
}

pub async fn handle_table(
    dir: &Path,
    pool: &str,
    region: Option<String>,
    profile: Option<String>,
) -> anyhow::Result<()> {
    println!("{}", "Provisioning table...".blue().bold());
    println!("  Directory: {}", dir.display().to_string().cyan());

    let outcome = provisioner(region, profile)
        .provision_table(dir, pool)
        .await?;

    if outcome.table_created {
        println!(
            "  {} Table {} created",
            "✓".green(),
            outcome.table_name.cyan()
        );
    } else {
        println!(
            "  - Table {} already provisioned",
            outcome.table_name.cyan()
        );
    }
    println!("  ARN: {}", outcome.table_arn);

    println!(
        "  {} Access policy {} attached",
        "✓".green(),
        outcome.policy_name.cyan()
    );
    Ok(())
}
