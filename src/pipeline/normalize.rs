use std::path::{Path, PathBuf};

use crate::error::NormalizeError;
use crate::pipeline::flatten::{flatten_metrics, flatten_workouts};
use crate::pipeline::parse;
use crate::types::export::{ExportDocument, ExportFormat};
use crate::types::record::FlatRecord;

/// Flattens export files into one record table for a single owning user.
///
/// Each processed file appends its records to an internal list that
/// [`Normalizer::records`] concatenates. Construct one instance per batch.
#[derive(Debug, Default)]
pub struct Normalizer {
    files: Vec<Vec<FlatRecord>>,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Workout records first, then metric records.
    pub fn process_document(&mut self, document: &ExportDocument, user_id: &str) -> Vec<FlatRecord> {
        let mut records = flatten_workouts(document, user_id);
        records.extend(flatten_metrics(document, user_id));

        self.files.push(records.clone());
        records
    }

    pub fn process_bytes(
        &mut self,
        bytes: &[u8],
        user_id: &str,
    ) -> Result<Vec<FlatRecord>, NormalizeError> {
        let document = parse::parse(bytes, ExportFormat::Json)?;
        Ok(self.process_document(&document, user_id))
    }

    pub fn process_file(
        &mut self,
        path: &Path,
        user_id: &str,
    ) -> Result<Vec<FlatRecord>, NormalizeError> {
        // The handle is closed once `read` returns.
        let bytes = std::fs::read(path).map_err(|source| NormalizeError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!("Parsing export file: {}", path.display());

        let records = self.process_bytes(&bytes, user_id).inspect_err(|e| {
            tracing::warn!("Failed to normalize {}: {}", path.display(), e);
        })?;

        tracing::debug!("{} produced {} records", path.display(), records.len());
        Ok(records)
    }

    /// Processes every `.json` file in `dir`, sorted by file name, under one
    /// user. Returns the full accumulated table. On failure, records appended
    /// during this call are discarded before the error is returned.
    pub fn process_directory(
        &mut self,
        dir: &Path,
        user_id: &str,
    ) -> Result<Vec<FlatRecord>, NormalizeError> {
        let files = export_files(dir)?;
        let checkpoint = self.files.len();

        tracing::info!("Normalizing {} export files from {}", files.len(), dir.display());

        for path in &files {
            if let Err(e) = self.process_file(path, user_id) {
                self.files.truncate(checkpoint);
                return Err(e);
            }
        }

        let records = self.records();
        tracing::info!(
            "Normalized {} records from {} for user {}",
            records.len(),
            dir.display(),
            user_id
        );
        Ok(records)
    }

    pub fn records(&self) -> Vec<FlatRecord> {
        self.files.concat()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

fn export_files(dir: &Path) -> Result<Vec<PathBuf>, NormalizeError> {
    let io_error = |source| NormalizeError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if !path.is_file() {
            continue;
        }
        let is_export = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(ExportFormat::from_filename)
            == Some(ExportFormat::Json);
        if is_export {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
