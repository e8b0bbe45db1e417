use std::path::Path;

use thiserror::Error;

use crate::domain::entities::workbook::Sheet;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkbookError {
    #[error("failed to load workbook: {0}")]
    Load(String),

    #[error("failed to export workbook: {0}")]
    Export(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for WorkbookError {
    fn from(err: std::io::Error) -> Self {
        WorkbookError::Io(err.to_string())
    }
}

/// Reads and writes the spreadsheet container format.
pub trait WorkbookCodec: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<Vec<Sheet>, WorkbookError>;

    fn encode_to_buffer(&self, sheets: &[Sheet]) -> Result<Vec<u8>, WorkbookError>;

    fn encode_to_path(&self, sheets: &[Sheet], path: &Path) -> Result<(), WorkbookError>;
}
