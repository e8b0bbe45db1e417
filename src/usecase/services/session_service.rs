use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::EditorConfig;
use crate::domain::entities::edit::EditKey;
use crate::domain::entities::session::{EditorSession, ExportArtifact};
use crate::domain::entities::workbook::UploadedFile;
use crate::usecase::ports::workbook_codec::{WorkbookCodec, WorkbookError};
use crate::usecase::services::export_service::ExportService;
use crate::usecase::services::load_service::LoadService;
use crate::usecase::services::selection_service::{default_item, fields_for_item, resolve_item, Field};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Workbook(#[from] WorkbookError),

    #[error("no workbook has been uploaded")]
    NoWorkbook,

    #[error("no sheet is selected")]
    NoSheetSelected,

    #[error("sheet not found: {0}")]
    UnknownSheet(String),
}

/// One discrete user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Upload(UploadedFile),
    ClearUpload,
    SelectSheet(String),
    SelectItem(String),
    EditField { column: String, value: String },
    SetAppendDate(bool),
    Save { today: NaiveDate },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Loaded { file_name: String, sheets: usize },
    Cleared,
    Updated,
    /// The edit targeted no visible row or column and was dropped.
    Ignored,
    Edited,
    Saved { file_name: String, mirrored: bool },
}

/// Everything the UI needs to draw one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorView {
    pub file_name: Option<String>,
    pub sheet_names: Vec<String>,
    pub selected_sheet: Option<String>,
    pub item_ids: Vec<String>,
    pub selected_item: Option<String>,
    pub fields: Vec<Field>,
    /// Buffered edits targeting the selected sheet.
    pub pending_edits: usize,
    pub append_date: bool,
    pub download_name: Option<String>,
}

pub struct SessionService {
    loader: LoadService,
    exporter: ExportService,
}

impl SessionService {
    pub fn new(codec: Arc<dyn WorkbookCodec>, config: EditorConfig) -> Self {
        Self {
            loader: LoadService::new(codec.clone()),
            exporter: ExportService::new(codec, config),
        }
    }

    pub fn exporter(&self) -> &ExportService {
        &self.exporter
    }

    pub fn handle(
        &self,
        session: &mut EditorSession,
        event: SessionEvent,
    ) -> Result<SessionOutcome, SessionError> {
        match event {
            SessionEvent::Upload(upload) => self.upload(session, &upload),
            SessionEvent::ClearUpload => {
                session.workbook = None;
                session.selected_sheet = None;
                session.selected_item = None;
                session.last_export = None;
                Ok(SessionOutcome::Cleared)
            }
            SessionEvent::SelectSheet(sheet_name) => select_sheet(session, sheet_name),
            SessionEvent::SelectItem(item) => {
                debug!(item = %item, "select item");
                session.selected_item = Some(item);
                Ok(SessionOutcome::Updated)
            }
            SessionEvent::EditField { column, value } => Ok(edit_field(session, column, value)),
            SessionEvent::SetAppendDate(append_date) => {
                session.append_date = append_date;
                Ok(SessionOutcome::Updated)
            }
            SessionEvent::Save { today } => self.save(session, today),
        }
    }

    fn upload(
        &self,
        session: &mut EditorSession,
        upload: &UploadedFile,
    ) -> Result<SessionOutcome, SessionError> {
        let workbook = match self.loader.load(Some(upload)) {
            Ok(Some(workbook)) => workbook,
            Ok(None) => return Err(SessionError::NoWorkbook),
            Err(err) => {
                warn!(file = %upload.name, error = %err, "upload rejected");
                return Err(err.into());
            }
        };

        let first_sheet = workbook.first_sheet();
        session.selected_sheet = first_sheet.map(|sheet| sheet.name.clone());
        session.selected_item = first_sheet.and_then(default_item);
        session.last_export = None;

        let outcome = SessionOutcome::Loaded {
            file_name: workbook.file_name.clone(),
            sheets: workbook.sheets.len(),
        };
        session.workbook = Some(workbook);
        Ok(outcome)
    }

    fn save(
        &self,
        session: &mut EditorSession,
        today: NaiveDate,
    ) -> Result<SessionOutcome, SessionError> {
        let workbook = session.workbook.as_ref().ok_or(SessionError::NoWorkbook)?;
        let active_sheet = session
            .selected_sheet
            .as_deref()
            .ok_or(SessionError::NoSheetSelected)?;

        let artifact: ExportArtifact = self.exporter.save(
            workbook,
            active_sheet,
            &session.edits,
            session.append_date,
            today,
        )?;

        let outcome = SessionOutcome::Saved {
            file_name: artifact.file_name.clone(),
            mirrored: artifact.mirrored_to.is_some(),
        };
        session.last_export = Some(artifact);
        Ok(outcome)
    }

    pub fn view(&self, session: &EditorSession) -> EditorView {
        let Some(workbook) = session.workbook.as_ref() else {
            return EditorView {
                append_date: session.append_date,
                ..EditorView::default()
            };
        };

        let active = session
            .selected_sheet
            .as_deref()
            .and_then(|name| workbook.sheet(name));
        let selected_item =
            active.and_then(|sheet| resolve_item(sheet, session.selected_item.as_deref()));
        let fields = match (active, selected_item.as_deref()) {
            (Some(sheet), Some(item)) => {
                fields_for_item(sheet, item, &session.edits).unwrap_or_default()
            }
            _ => Vec::new(),
        };

        EditorView {
            file_name: Some(workbook.file_name.clone()),
            sheet_names: workbook.sheet_names(),
            selected_sheet: active.map(|sheet| sheet.name.clone()),
            item_ids: active.map(|sheet| sheet.item_ids()).unwrap_or_default(),
            selected_item,
            fields,
            pending_edits: active
                .map(|sheet| session.edits.pending_for_sheet(&sheet.name).count())
                .unwrap_or(0),
            append_date: session.append_date,
            download_name: session
                .last_export
                .as_ref()
                .map(|artifact| artifact.file_name.clone()),
        }
    }
}

fn select_sheet(
    session: &mut EditorSession,
    sheet_name: String,
) -> Result<SessionOutcome, SessionError> {
    let workbook = session.workbook.as_ref().ok_or(SessionError::NoWorkbook)?;
    let sheet = workbook
        .sheet(&sheet_name)
        .ok_or_else(|| SessionError::UnknownSheet(sheet_name.clone()))?;

    if session.selected_sheet.as_deref() != Some(sheet_name.as_str()) {
        session.selected_item = default_item(sheet);
    }
    debug!(sheet = %sheet_name, "select sheet");
    session.selected_sheet = Some(sheet_name);
    Ok(SessionOutcome::Updated)
}

fn edit_field(session: &mut EditorSession, column: String, value: String) -> SessionOutcome {
    let target = session.workbook.as_ref().and_then(|workbook| {
        let sheet = workbook.sheet(session.selected_sheet.as_deref()?)?;
        let item = resolve_item(sheet, session.selected_item.as_deref())?;
        sheet.column_index(&column)?;
        Some(EditKey::new(sheet.name.as_str(), item, column.as_str()))
    });

    match target {
        Some(key) => {
            debug!(sheet = %key.sheet, item = %key.item, column = %key.column, "field edited");
            session.edits.set(key, value);
            SessionOutcome::Edited
        }
        None => {
            debug!(column = %column, "edit ignored, no selected row");
            SessionOutcome::Ignored
        }
    }
}
