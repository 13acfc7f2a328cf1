use crate::error::{BuildError, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs;
use std::path::Path;
use tar::Builder;

// Direct code uploads above this size are rejected by the provider.
const MAX_ARCHIVE_SIZE: usize = 50 * 1024 * 1024;

pub struct ArchiveBuilder;

impl ArchiveBuilder {
    /// Stage a source directory into a gzipped tar archive
    pub fn create_archive(source: &Path) -> Result<Vec<u8>> {
        if !source.is_dir() {
            return Err(BuildError::SourceNotFound(source.to_path_buf()));
        }

        tracing::debug!("Creating archive from: {}", source.display());

        let mut archive_data = Vec::new();
        {
            let encoder = GzEncoder::new(&mut archive_data, Compression::default());
            let mut tar = Builder::new(encoder);

            tar.append_dir_all(".", source).map_err(BuildError::Io)?;
            tar.finish().map_err(BuildError::Io)?;
        }

        tracing::debug!("Archive created: {} bytes", archive_data.len());

        Self::check_archive_size(archive_data.len());

        Ok(archive_data)
    }

    /// Stage a source directory and write the archive to `dest`
    pub fn write_archive(source: &Path, dest: &Path) -> Result<()> {
        let data = Self::create_archive(source)?;

        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(dest, data)?;

        tracing::info!("Wrote archive: {}", dest.display());
        Ok(())
    }

    fn check_archive_size(size: usize) {
        if size > MAX_ARCHIVE_SIZE {
            tracing::warn!(
                "Archive is {}MB, above the direct-upload limit. Consider trimming staged dependencies.",
                size / 1024 / 1024
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_create_archive_roundtrip() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("handler.py"), "def handler(): pass").unwrap();

        let deps = temp_dir.path().join("vendor");
        fs::create_dir(&deps).unwrap();
        fs::write(deps.join("lib.py"), "VERSION = 1").unwrap();

        let archive = ArchiveBuilder::create_archive(temp_dir.path()).unwrap();
        assert!(!archive.is_empty());

        let extract_dir = tempdir().unwrap();
        let decoder = flate2::read::GzDecoder::new(std::io::Cursor::new(archive));
        let mut tar = tar::Archive::new(decoder);
        tar.unpack(extract_dir.path()).unwrap();

        assert!(extract_dir.path().join("handler.py").exists());
        assert!(extract_dir.path().join("vendor/lib.py").exists());
    }

    #[test]
    fn test_missing_source_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("nope");

        let err = ArchiveBuilder::create_archive(&missing).unwrap_err();
        assert!(matches!(err, BuildError::SourceNotFound(_)));
    }

    #[test]
    fn test_write_archive_creates_parent_dirs() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("handler.py"), "x = 1").unwrap();

        let dest = temp_dir.path().join("dist/package.tar.gz");
        ArchiveBuilder::write_archive(temp_dir.path(), &dest).unwrap();

        assert!(dest.exists());
    }
}
