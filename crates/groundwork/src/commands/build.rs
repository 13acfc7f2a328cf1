use colored::Colorize;
use groundwork_build::ArchiveBuilder;
use std::path::{Path, PathBuf};

pub async fn handle(source: &Path, output: Option<PathBuf>) -> anyhow::Result<()> {
    let dest = output.unwrap_or_else(|| default_output(source));

    println!("{}", "Packaging deployment archive...".blue().bold());
    println!("  Source: {}", source.display().to_string().cyan());

    ArchiveBuilder::write_archive(source, &dest)?;

    println!(
        "  {} Archive written: {}",
        "✓".green(),
        dest.display().to_string().cyan()
    );
    Ok(())
}

fn default_output(source: &Path) -> PathBuf {
    let name = source
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("package");
    source.with_file_name(format!("{name}.tar.gz"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_next_to_source() {
        let output = default_output(Path::new("backend/app"));
        assert_eq!(output, PathBuf::from("backend/app.tar.gz"));
    }
}
