use std::sync::Arc;

use tracing::info;

use crate::domain::entities::workbook::{LoadedWorkbook, UploadedFile};
use crate::usecase::ports::workbook_codec::{WorkbookCodec, WorkbookError};

pub struct LoadService {
    codec: Arc<dyn WorkbookCodec>,
}

impl LoadService {
    pub fn new(codec: Arc<dyn WorkbookCodec>) -> Self {
        Self { codec }
    }

    /// Opens an upload. No upload yields `Ok(None)`; a blob that is not a
    /// workbook is an error.
    pub fn load(&self, upload: Option<&UploadedFile>) -> Result<Option<LoadedWorkbook>, WorkbookError> {
        let Some(upload) = upload else {
            return Ok(None);
        };

        let sheets = self.codec.decode(&upload.bytes)?;
        info!(
            file = %upload.name,
            sheets = sheets.len(),
            bytes = upload.bytes.len(),
            "loaded workbook"
        );

        Ok(Some(LoadedWorkbook {
            file_name: upload.name.clone(),
            sheets,
        }))
    }
}
