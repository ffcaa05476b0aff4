use crate::error::{Error, Result};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    time::SystemTime,
};
use tracing::{debug, info};

/// Writes the customized instruction file with atomic operations.
pub(crate) struct Writer {
    output_path: PathBuf,
    backup_existing: bool,
}

impl Writer {
    /// Creates a new writer for the given output path.
    pub(crate) fn new(output_path: impl Into<PathBuf>, backup_existing: bool) -> Self {
        Self {
            output_path: output_path.into(),
            backup_existing,
        }
    }

    /// Writes the resolved instructions to the output path.
    ///
    /// Parent directories are created if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation, the backup, or the file
    /// write fails.
    pub(crate) fn write(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
        }

        self.write_file_atomic(&self.output_path, content)?;

        info!(
            "Customized instructions saved to {}",
            self.output_path.display()
        );
        Ok(())
    }

    /// Writes a file atomically with optional backup.
    ///
    /// # Process
    ///
    /// 1. Creates backup if file exists and backup is enabled
    /// 2. Writes content to temporary file
    /// 3. Syncs temporary file to disk
    /// 4. Atomically renames temporary file to target path
    ///
    /// This ensures no data loss if the write is interrupted.
    fn write_file_atomic(&self, path: &Path, content: &str) -> Result<()> {
        if path.exists() && self.backup_existing {
            self.backup_file(path)?;
        }

        let temp_path = path.with_extension("tmp");
        let mut temp_file = fs::File::create(&temp_path).map_err(|e| Error::io(&temp_path, e))?;

        temp_file
            .write_all(content.as_bytes())
            .map_err(|e| Error::io(&temp_path, e))?;

        temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;

        drop(temp_file);

        fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))?;

        Ok(())
    }

    /// Creates a timestamped backup of an existing file.
    fn backup_file(&self, path: &Path) -> Result<()> {
        let timestamp = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)?
            .as_nanos();

        let filename = path
            .file_name()
            .ok_or_else(|| Error::config("Invalid file path"))?
            .to_string_lossy();

        let backup_name = format!("{}.backup.{}", filename, timestamp);
        let backup_path = path
            .parent()
            .ok_or_else(|| Error::config("Invalid file path"))?
            .join(backup_name);

        fs::copy(path, &backup_path).map_err(|e| Error::io(&backup_path, e))?;

        debug!("Created backup: {}", backup_path.display());
        Ok(())
    }
}
