use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::{EditorConfig, DOWNLOAD_BASE_NAME, DOWNLOAD_EXTENSION};
use crate::domain::entities::edit::EditBuffer;
use crate::domain::entities::session::ExportArtifact;
use crate::domain::entities::workbook::{LoadedWorkbook, Sheet};
use crate::usecase::ports::workbook_codec::{WorkbookCodec, WorkbookError};
use crate::usecase::services::edit_service::commit_edits;

pub fn download_file_name(append_date: bool, today: NaiveDate) -> String {
    let mut name = DOWNLOAD_BASE_NAME.to_string();
    if append_date {
        name.push('_');
        name.push_str(&today.format("%Y%m%d").to_string());
    }
    format!("{name}.{DOWNLOAD_EXTENSION}")
}

/// Output sheets in original order: the reconciled table in place of the
/// active sheet, every other sheet as uploaded.
pub fn build_output(workbook: &LoadedWorkbook, active_sheet: &str, reconciled: &Sheet) -> Vec<Sheet> {
    workbook
        .sheets
        .iter()
        .map(|sheet| {
            if sheet.name == active_sheet {
                reconciled.clone()
            } else {
                sheet.clone()
            }
        })
        .collect()
}

pub struct ExportService {
    codec: Arc<dyn WorkbookCodec>,
    config: EditorConfig,
}

impl ExportService {
    pub fn new(codec: Arc<dyn WorkbookCodec>, config: EditorConfig) -> Self {
        Self { codec, config }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn mirror_path(&self, workbook: &LoadedWorkbook) -> Option<PathBuf> {
        if !self.config.mirror_upload {
            return None;
        }
        // Only the final path component of the upload name is used.
        let file_name = Path::new(&workbook.file_name).file_name()?;
        Some(self.config.mirror_dir.join(file_name))
    }

    /// Commits the buffer into `active_sheet` and serializes the whole
    /// workbook. The buffer is only read.
    pub fn save(
        &self,
        workbook: &LoadedWorkbook,
        active_sheet: &str,
        edits: &EditBuffer,
        append_date: bool,
        today: NaiveDate,
    ) -> Result<ExportArtifact, WorkbookError> {
        let pristine = workbook.sheet(active_sheet).ok_or_else(|| {
            WorkbookError::Export(format!("sheet not found in workbook: {active_sheet}"))
        })?;
        let reconciled = commit_edits(pristine, edits);
        let output = build_output(workbook, active_sheet, &reconciled);

        let mirrored_to = match self.mirror_path(workbook) {
            Some(path) => {
                self.codec.encode_to_path(&output, &path)?;
                info!(path = %path.display(), "wrote workbook mirror");
                Some(path)
            }
            None => None,
        };

        let bytes = self.codec.encode_to_buffer(&output)?;
        let file_name = download_file_name(append_date, today);
        info!(
            file = %file_name,
            sheet = %active_sheet,
            bytes = bytes.len(),
            "prepared download"
        );

        Ok(ExportArtifact {
            file_name,
            bytes,
            mirrored_to,
        })
    }

    pub fn write_download(&self, artifact: &ExportArtifact, path: &Path) -> Result<(), WorkbookError> {
        std::fs::write(path, &artifact.bytes).map_err(|err| {
            warn!(path = %path.display(), error = %err, "download write failed");
            WorkbookError::Io(format!("{}: {err}", path.display()))
        })?;
        info!(path = %path.display(), bytes = artifact.bytes.len(), "saved download");
        Ok(())
    }
}
