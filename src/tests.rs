use std::sync::Arc;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

use crate::config::EditorConfig;
use crate::domain::entities::edit::{EditBuffer, EditKey};
use crate::domain::entities::session::EditorSession;
use crate::domain::entities::workbook::{CellValue, UploadedFile};
use crate::infra::xlsx::codec::XlsxCodec;
use crate::infra::xlsx::reader::read_xlsx_sheets;
use crate::usecase::ports::workbook_codec::{WorkbookCodec, WorkbookError};
use crate::usecase::services::export_service::ExportService;
use crate::usecase::services::load_service::LoadService;
use crate::usecase::services::session_service::{
    SessionError, SessionEvent, SessionOutcome, SessionService,
};

fn text(value: &str) -> CellValue {
    CellValue::Text(value.to_string())
}

fn fixed_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 17).expect("valid date")
}

/// Two sheets: "Materials" (Name/Lot) and "Suppliers" with mixed cell types.
fn materials_fixture() -> Vec<u8> {
    let mut workbook = Workbook::new();

    let materials = workbook.add_worksheet();
    materials.set_name("Materials").expect("sheet name");
    materials.write_string(0, 0, "Name").expect("header");
    materials.write_string(0, 1, "Lot").expect("header");
    materials.write_string(1, 0, "Glove").expect("cell");
    materials.write_string(1, 1, "123").expect("cell");
    materials.write_string(2, 0, "Mask").expect("cell");
    materials.write_string(2, 1, "456").expect("cell");

    let suppliers = workbook.add_worksheet();
    suppliers.set_name("Suppliers").expect("sheet name");
    suppliers.write_string(0, 0, "Supplier").expect("header");
    suppliers.write_string(0, 1, "Rating").expect("header");
    suppliers.write_string(0, 2, "Approved").expect("header");
    suppliers.write_string(1, 0, "Acme").expect("cell");
    suppliers.write_number(1, 1, 4.5).expect("cell");
    suppliers.write_boolean(1, 2, true).expect("cell");
    suppliers.write_string(2, 0, "Globex").expect("cell");
    suppliers.write_number(2, 1, 3.0).expect("cell");

    workbook.save_to_buffer().expect("fixture should serialize")
}

fn upload() -> UploadedFile {
    UploadedFile {
        name: "materials.xlsx".to_string(),
        bytes: materials_fixture(),
    }
}

fn service(config: EditorConfig) -> SessionService {
    SessionService::new(Arc::new(XlsxCodec), config)
}

fn loaded_session(service: &SessionService) -> EditorSession {
    let mut session = EditorSession::new();
    service
        .handle(&mut session, SessionEvent::Upload(upload()))
        .expect("fixture upload should load");
    session
}

fn edit(service: &SessionService, session: &mut EditorSession, column: &str, value: &str) {
    service
        .handle(
            session,
            SessionEvent::EditField {
                column: column.to_string(),
                value: value.to_string(),
            },
        )
        .expect("edit should be accepted");
}

#[test]
fn reader_parses_headers_and_typed_cells() {
    let sheets = read_xlsx_sheets(&materials_fixture()).expect("fixture should parse");

    assert_eq!(sheets.len(), 2);
    assert_eq!(sheets[0].name, "Materials");
    assert_eq!(sheets[0].columns, vec!["Name", "Lot"]);
    assert_eq!(sheets[0].item_ids(), vec!["Glove", "Mask"]);
    assert_eq!(
        sheets[1].rows,
        vec![
            vec![text("Acme"), CellValue::Number(4.5), CellValue::Bool(true)],
            vec![text("Globex"), CellValue::Number(3.0), CellValue::Empty],
        ]
    );
}

#[test]
fn reader_names_blank_headers() {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Blank").expect("sheet name");
    sheet.write_string(0, 0, "Id").expect("header");
    sheet.write_string(0, 2, "Note").expect("header");
    sheet.write_string(1, 0, "A").expect("cell");
    let bytes = workbook.save_to_buffer().expect("serialize");

    let sheets = read_xlsx_sheets(&bytes).expect("should parse");

    assert_eq!(sheets[0].columns, vec!["Id", "Unnamed: 1", "Note"]);
    assert_eq!(sheets[0].rows[0].len(), 3);
}

#[test]
fn loader_returns_none_without_upload() {
    let loader = LoadService::new(Arc::new(XlsxCodec));

    assert_eq!(loader.load(None), Ok(None));
}

#[test]
fn loader_rejects_non_workbook_blob() {
    let loader = LoadService::new(Arc::new(XlsxCodec));
    let bogus = UploadedFile {
        name: "notes.xlsx".to_string(),
        bytes: b"this is not a zip container".to_vec(),
    };

    let result = loader.load(Some(&bogus));

    assert!(matches!(result, Err(WorkbookError::Load(_))), "got {result:?}");
}

#[test]
fn upload_selects_first_sheet_and_item() {
    let service = service(EditorConfig::default());
    let session = loaded_session(&service);

    let view = service.view(&session);

    assert_eq!(view.file_name.as_deref(), Some("materials.xlsx"));
    assert_eq!(view.sheet_names, vec!["Materials", "Suppliers"]);
    assert_eq!(view.selected_sheet.as_deref(), Some("Materials"));
    assert_eq!(view.item_ids, vec!["Glove", "Mask"]);
    assert_eq!(view.selected_item.as_deref(), Some("Glove"));
    assert_eq!(view.fields.len(), 2);
    assert_eq!(view.fields[1].value, "123");
}

#[test]
fn failed_upload_keeps_previous_session() {
    let service = service(EditorConfig::default());
    let mut session = loaded_session(&service);
    edit(&service, &mut session, "Lot", "999");

    let result = service.handle(
        &mut session,
        SessionEvent::Upload(UploadedFile {
            name: "broken.xlsx".to_string(),
            bytes: vec![0, 1, 2, 3],
        }),
    );

    assert!(matches!(
        result,
        Err(SessionError::Workbook(WorkbookError::Load(_)))
    ));
    let view = service.view(&session);
    assert_eq!(view.file_name.as_deref(), Some("materials.xlsx"));
    assert_eq!(view.fields[1].value, "999");
}

#[test]
fn end_to_end_edit_and_save_without_date() {
    let service = service(EditorConfig::default());
    let mut session = loaded_session(&service);

    service
        .handle(&mut session, SessionEvent::SelectSheet("Materials".to_string()))
        .expect("select sheet");
    service
        .handle(&mut session, SessionEvent::SelectItem("Glove".to_string()))
        .expect("select item");
    edit(&service, &mut session, "Lot", "999");
    let outcome = service
        .handle(&mut session, SessionEvent::Save { today: fixed_day() })
        .expect("save should succeed");

    assert_eq!(
        outcome,
        SessionOutcome::Saved {
            file_name: "GMP_ancillary_materials.xlsx".to_string(),
            mirrored: false,
        }
    );
    let artifact = session.last_export.clone().expect("artifact stored");
    let exported = read_xlsx_sheets(&artifact.bytes).expect("export should parse");
    assert_eq!(exported[0].name, "Materials");
    assert_eq!(
        exported[0].rows,
        vec![vec![text("Glove"), text("999")], vec![text("Mask"), text("456")]]
    );
    assert_eq!(service.view(&session).download_name.as_deref(), Some("GMP_ancillary_materials.xlsx"));
}

#[test]
fn save_with_date_appends_stamp() {
    let service = service(EditorConfig::default());
    let mut session = loaded_session(&service);

    service
        .handle(&mut session, SessionEvent::SetAppendDate(true))
        .expect("toggle");
    service
        .handle(&mut session, SessionEvent::Save { today: fixed_day() })
        .expect("save");

    let artifact = session.last_export.expect("artifact stored");
    assert_eq!(artifact.file_name, "GMP_ancillary_materials_20240517.xlsx");
}

#[test]
fn untouched_sheets_pass_through_unchanged() {
    let service = service(EditorConfig::default());
    let mut session = loaded_session(&service);
    let original = read_xlsx_sheets(&materials_fixture()).expect("fixture should parse");

    edit(&service, &mut session, "Lot", "999");
    service
        .handle(&mut session, SessionEvent::Save { today: fixed_day() })
        .expect("save");

    let artifact = session.last_export.expect("artifact stored");
    let exported = read_xlsx_sheets(&artifact.bytes).expect("export should parse");
    assert_eq!(exported[1], original[1]);
}

#[test]
fn repeated_headers_are_edited_as_separate_columns() {
    let mut workbook = Workbook::new();
    let lots = workbook.add_worksheet();
    lots.set_name("Materials").expect("sheet name");
    for (col, value) in ["Name", "Lot", "Lot"].into_iter().enumerate() {
        lots.write_string(0, col as u16, value).expect("header");
    }
    for (col, value) in ["Glove", "111", "222"].into_iter().enumerate() {
        lots.write_string(1, col as u16, value).expect("cell");
    }
    let bytes = workbook.save_to_buffer().expect("fixture should serialize");

    let service = service(EditorConfig::default());
    let mut session = EditorSession::new();
    service
        .handle(
            &mut session,
            SessionEvent::Upload(UploadedFile {
                name: "lots.xlsx".to_string(),
                bytes,
            }),
        )
        .expect("upload");

    edit(&service, &mut session, "Lot.1", "999");

    let fields: Vec<(String, String)> = service
        .view(&session)
        .fields
        .into_iter()
        .map(|field| (field.column, field.value))
        .collect();
    assert_eq!(
        fields,
        vec![
            ("Name".to_string(), "Glove".to_string()),
            ("Lot".to_string(), "111".to_string()),
            ("Lot.1".to_string(), "999".to_string()),
        ]
    );

    service
        .handle(&mut session, SessionEvent::Save { today: fixed_day() })
        .expect("save");
    let artifact = session.last_export.expect("artifact stored");
    let exported = read_xlsx_sheets(&artifact.bytes).expect("export should parse");
    assert_eq!(exported[0].rows[0], vec![text("Glove"), text("111"), text("999")]);
}

#[test]
fn sheets_offset_from_a1_keep_their_position() {
    let mut workbook = Workbook::new();
    let materials = workbook.add_worksheet();
    materials.set_name("Materials").expect("sheet name");
    materials.write_string(0, 0, "Name").expect("header");
    materials.write_string(1, 0, "Glove").expect("cell");
    let other = workbook.add_worksheet();
    other.set_name("Other").expect("sheet name");
    other.write_string(0, 1, "Code").expect("header");
    other.write_string(0, 2, "Qty").expect("header");
    other.write_string(1, 1, "A-1").expect("cell");
    other.write_number(1, 2, 7.0).expect("cell");
    let bytes = workbook.save_to_buffer().expect("fixture should serialize");

    let original = read_xlsx_sheets(&bytes).expect("fixture should parse");
    assert_eq!(original[1].origin, (0, 1));

    let service = service(EditorConfig::default());
    let mut session = EditorSession::new();
    service
        .handle(
            &mut session,
            SessionEvent::Upload(UploadedFile {
                name: "offset.xlsx".to_string(),
                bytes,
            }),
        )
        .expect("upload");
    service
        .handle(&mut session, SessionEvent::Save { today: fixed_day() })
        .expect("save");

    let artifact = session.last_export.expect("artifact stored");
    let exported = read_xlsx_sheets(&artifact.bytes).expect("export should parse");
    assert_eq!(exported[1], original[1]);
}

#[test]
fn edits_on_other_sheets_are_not_exported() {
    let service = service(EditorConfig::default());
    let mut session = loaded_session(&service);
    let original = read_xlsx_sheets(&materials_fixture()).expect("fixture should parse");

    service
        .handle(&mut session, SessionEvent::SelectSheet("Suppliers".to_string()))
        .expect("select sheet");
    edit(&service, &mut session, "Rating", "5");
    service
        .handle(&mut session, SessionEvent::SelectSheet("Materials".to_string()))
        .expect("select sheet");
    service
        .handle(&mut session, SessionEvent::Save { today: fixed_day() })
        .expect("save");

    let artifact = session.last_export.clone().expect("artifact stored");
    let exported = read_xlsx_sheets(&artifact.bytes).expect("export should parse");
    assert_eq!(exported[1], original[1]);
    assert_eq!(session.edits.len(), 1, "skipped edits stay buffered");
}

#[test]
fn navigating_back_restores_uncommitted_value() {
    let service = service(EditorConfig::default());
    let mut session = loaded_session(&service);

    edit(&service, &mut session, "Lot", "999");
    service
        .handle(&mut session, SessionEvent::SelectItem("Mask".to_string()))
        .expect("select item");
    assert_eq!(service.view(&session).fields[1].value, "456");

    service
        .handle(&mut session, SessionEvent::SelectSheet("Suppliers".to_string()))
        .expect("select sheet");
    service
        .handle(&mut session, SessionEvent::SelectSheet("Materials".to_string()))
        .expect("select sheet");
    service
        .handle(&mut session, SessionEvent::SelectItem("Glove".to_string()))
        .expect("select item");

    let view = service.view(&session);
    assert_eq!(view.fields[1].value, "999");
    assert!(view.fields[1].edited);
}

#[test]
fn saving_twice_is_idempotent() {
    let service = service(EditorConfig::default());
    let mut session = loaded_session(&service);
    edit(&service, &mut session, "Lot", "999");

    service
        .handle(&mut session, SessionEvent::Save { today: fixed_day() })
        .expect("first save");
    let first = session.last_export.clone().expect("first artifact");
    service
        .handle(&mut session, SessionEvent::Save { today: fixed_day() })
        .expect("second save");
    let second = session.last_export.clone().expect("second artifact");

    let first_sheets = read_xlsx_sheets(&first.bytes).expect("parse first");
    let second_sheets = read_xlsx_sheets(&second.bytes).expect("parse second");
    assert_eq!(first_sheets, second_sheets);
    assert_eq!(first.file_name, second.file_name);
}

#[test]
fn stale_item_selection_resolves_to_no_row() {
    let service = service(EditorConfig::default());
    let mut session = loaded_session(&service);

    service
        .handle(&mut session, SessionEvent::SelectItem("Gown".to_string()))
        .expect("selecting is never an error");
    let view = service.view(&session);
    assert_eq!(view.selected_item, None);
    assert!(view.fields.is_empty());

    let outcome = service
        .handle(
            &mut session,
            SessionEvent::EditField {
                column: "Lot".to_string(),
                value: "1".to_string(),
            },
        )
        .expect("edit without row is a no-op");
    assert_eq!(outcome, SessionOutcome::Ignored);
    assert!(session.edits.is_empty());
}

#[test]
fn unknown_sheet_is_rejected() {
    let service = service(EditorConfig::default());
    let mut session = loaded_session(&service);

    let result = service.handle(&mut session, SessionEvent::SelectSheet("Nope".to_string()));

    assert_eq!(result, Err(SessionError::UnknownSheet("Nope".to_string())));
    assert_eq!(session.selected_sheet.as_deref(), Some("Materials"));
}

#[test]
fn save_without_upload_reports_missing_workbook() {
    let service = service(EditorConfig::default());
    let mut session = EditorSession::new();

    let result = service.handle(&mut session, SessionEvent::Save { today: fixed_day() });

    assert_eq!(result, Err(SessionError::NoWorkbook));
}

#[test]
fn mirror_writes_upload_name_when_enabled() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let service = service(EditorConfig::default().with_mirror(temp_dir.path()));
    let mut session = loaded_session(&service);
    edit(&service, &mut session, "Lot", "999");

    service
        .handle(&mut session, SessionEvent::Save { today: fixed_day() })
        .expect("save");

    let artifact = session.last_export.expect("artifact stored");
    let mirror = temp_dir.path().join("materials.xlsx");
    assert_eq!(artifact.mirrored_to.as_deref(), Some(mirror.as_path()));
    let mirrored = std::fs::read(&mirror).expect("mirror should exist");
    let sheets = read_xlsx_sheets(&mirrored).expect("mirror should parse");
    assert_eq!(sheets[0].rows[0][1], text("999"));
}

#[test]
fn mirror_is_skipped_by_default() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config = EditorConfig {
        mirror_dir: temp_dir.path().to_path_buf(),
        ..EditorConfig::default()
    };
    let service = service(config);
    let mut session = loaded_session(&service);

    service
        .handle(&mut session, SessionEvent::Save { today: fixed_day() })
        .expect("save");

    assert_eq!(session.last_export.and_then(|a| a.mirrored_to), None);
    assert!(!temp_dir.path().join("materials.xlsx").exists());
}

#[test]
fn failed_export_leaves_buffer_intact() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let missing_dir = temp_dir.path().join("does-not-exist");
    let service = service(EditorConfig::default().with_mirror(missing_dir));
    let mut session = loaded_session(&service);
    edit(&service, &mut session, "Lot", "999");
    let before = session.edits.clone();

    let result = service.handle(&mut session, SessionEvent::Save { today: fixed_day() });

    assert!(matches!(
        result,
        Err(SessionError::Workbook(WorkbookError::Export(_)))
    ));
    assert_eq!(session.edits, before);
    assert!(session.last_export.is_none());
}

#[test]
fn write_download_persists_artifact_bytes() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let exporter = ExportService::new(Arc::new(XlsxCodec), EditorConfig::default());
    let workbook = LoadService::new(Arc::new(XlsxCodec))
        .load(Some(&upload()))
        .expect("load")
        .expect("workbook present");
    let mut edits = EditBuffer::new();
    edits.set(EditKey::new("Materials", "Mask", "Lot"), "789");

    let artifact = exporter
        .save(&workbook, "Materials", &edits, false, fixed_day())
        .expect("save");
    let target = temp_dir.path().join(&artifact.file_name);
    exporter
        .write_download(&artifact, &target)
        .expect("download write");

    let written = std::fs::read(&target).expect("download should exist");
    assert_eq!(written, artifact.bytes);
    let sheets = XlsxCodec.decode(&written).expect("download should parse");
    assert_eq!(sheets[0].rows[1][1], text("789"));
}

#[test]
fn clearing_upload_keeps_buffered_edits() {
    let service = service(EditorConfig::default());
    let mut session = loaded_session(&service);
    edit(&service, &mut session, "Lot", "999");

    let outcome = service
        .handle(&mut session, SessionEvent::ClearUpload)
        .expect("clear");

    assert_eq!(outcome, SessionOutcome::Cleared);
    assert_eq!(service.view(&session).file_name, None);
    assert_eq!(session.edits.len(), 1);

    service
        .handle(&mut session, SessionEvent::Upload(upload()))
        .expect("re-upload");
    assert_eq!(service.view(&session).fields[1].value, "999");
}
