use std::path::PathBuf;

use crate::domain::entities::edit::EditBuffer;
use crate::domain::entities::workbook::LoadedWorkbook;

/// Result of the last successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mirrored_to: Option<PathBuf>,
}

/// Everything one editing session owns. Created empty when the window opens
/// and dropped with it.
#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    pub workbook: Option<LoadedWorkbook>,
    pub selected_sheet: Option<String>,
    pub selected_item: Option<String>,
    pub edits: EditBuffer,
    pub append_date: bool,
    pub last_export: Option<ExportArtifact>,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }
}
