use colored::Colorize;
use groundwork_cloud_aws::AwsCli;

pub async fn handle(region: Option<String>, profile: Option<String>) -> anyhow::Result<()> {
    let cli = AwsCli::new(region, profile);
    let identity = cli.check_auth().await?;

    println!("{} Credentials resolve", "✓".green());
    println!("  Account: {}", identity.account.cyan());
    println!("  Caller:  {}", identity.arn);
    Ok(())
}
