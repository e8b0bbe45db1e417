use std::path::Path;

use crate::domain::entities::workbook::Sheet;
use crate::infra::xlsx::reader::read_xlsx_sheets;
use crate::infra::xlsx::writer::{write_xlsx_to_buffer, write_xlsx_to_path};
use crate::usecase::ports::workbook_codec::{WorkbookCodec, WorkbookError};

/// `.xlsx` codec: calamine on the way in, rust_xlsxwriter on the way out.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxCodec;

impl WorkbookCodec for XlsxCodec {
    fn decode(&self, bytes: &[u8]) -> Result<Vec<Sheet>, WorkbookError> {
        read_xlsx_sheets(bytes).map_err(|err| WorkbookError::Load(format!("{err:#}")))
    }

    fn encode_to_buffer(&self, sheets: &[Sheet]) -> Result<Vec<u8>, WorkbookError> {
        write_xlsx_to_buffer(sheets).map_err(|err| WorkbookError::Export(format!("{err:#}")))
    }

    fn encode_to_path(&self, sheets: &[Sheet], path: &Path) -> Result<(), WorkbookError> {
        write_xlsx_to_path(sheets, path).map_err(|err| WorkbookError::Export(format!("{err:#}")))
    }
}
