use colored::Colorize;
use groundwork_cloud_aws::AwsCli;
use std::path::Path;

pub async fn handle(
    function: &str,
    archive: &Path,
    region: Option<String>,
    profile: Option<String>,
) -> anyhow::Result<()> {
    if !archive.exists() {
        anyhow::bail!(
            "Archive not found: {} (run `gw build` first)",
            archive.display()
        );
    }

    println!("{}", "Uploading function code...".blue().bold());

    let cli = AwsCli::new(region, profile);
    let result = cli.update_function_code(function, archive).await?;

    let last_modified = result
        .get("LastModified")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");
    println!(
        "  {} Function {} updated (last modified: {})",
        "✓".green(),
        function.cyan(),
        last_modified
    );
    Ok(())
}
