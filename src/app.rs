use std::sync::Arc;

use chrono::Local;
use dioxus::prelude::*;
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};
use tracing::{error, info};

use crate::config::{EditorConfig, APP_TITLE, UPLOAD_EXTENSIONS};
use crate::domain::entities::session::EditorSession;
use crate::domain::entities::workbook::UploadedFile;
use crate::infra::xlsx::codec::XlsxCodec;
use crate::platform::desktop::blocking::run_blocking;
use crate::ui::components::{options_for, DropdownId, DropdownSelect, FieldInput};
use crate::ui::state::app_state::AppState;
use crate::usecase::services::session_service::{
    SessionEvent, SessionOutcome, SessionService,
};

fn show_error(title: &str, message: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title(title)
        .set_description(message)
        .set_buttons(MessageButtons::Ok)
        .show();
}

pub fn outcome_status(outcome: &SessionOutcome) -> Option<String> {
    match outcome {
        SessionOutcome::Loaded { file_name, sheets } => {
            Some(format!("Loaded {file_name} ({sheets} sheets)"))
        }
        SessionOutcome::Cleared => Some("Upload cleared".to_string()),
        SessionOutcome::Saved {
            file_name,
            mirrored: true,
        } => Some(format!(
            "Saved all changes, {file_name} is ready (copy written next to the upload name)"
        )),
        SessionOutcome::Saved { file_name, .. } => {
            Some(format!("Saved all changes, {file_name} is ready"))
        }
        SessionOutcome::Updated | SessionOutcome::Edited | SessionOutcome::Ignored => None,
    }
}

/// Feeds one event through the session. Failures surface as a dialog and
/// leave the session (edit buffer included) as it was.
fn dispatch(
    service: &SessionService,
    mut session: Signal<EditorSession>,
    mut status: Signal<String>,
    event: SessionEvent,
) {
    let result = service.handle(&mut session.write(), event);
    match result {
        Ok(outcome) => {
            if let Some(message) = outcome_status(&outcome) {
                status.set(message);
            }
        }
        Err(err) => {
            error!(error = %err, "action failed");
            status.set(format!("Failed: {err}"));
            show_error("Action failed", &err.to_string());
        }
    }
}

#[component]
pub fn App() -> Element {
    let AppState {
        session,
        mut busy,
        mut status,
        mut open_dropdown,
        dropdown_pos,
    } = AppState::new();

    let service = use_hook(|| {
        EditorConfig::desktop_defaults()
            .map(|config| Arc::new(SessionService::new(Arc::new(XlsxCodec), config)))
            .map_err(|err| format!("{err:#}"))
    });
    let service = match service {
        Ok(service) => service,
        Err(err) => {
            return rsx! {
                div {
                    p { "Unable to resolve working directories: {err}" }
                }
            };
        }
    };

    let view = service.view(&session.read());
    let has_workbook = view.file_name.is_some();
    let file_label = view
        .file_name
        .clone()
        .unwrap_or_else(|| "No file selected".to_string());
    let sheet_options = options_for(&view.sheet_names);
    let item_options = options_for(&view.item_ids);
    let has_row = view.selected_item.is_some();
    let fields = view.fields.clone();
    let append_date = view.append_date;
    let pending_edits = view.pending_edits;
    let download_name = view.download_name.clone().unwrap_or_default();
    let has_download = view.download_name.is_some();

    let service_for_upload = service.clone();
    let service_for_clear = service.clone();
    let service_for_sheet = service.clone();
    let service_for_item = service.clone();
    let service_for_edit = service.clone();
    let service_for_append = service.clone();
    let service_for_save = service.clone();
    let service_for_download = service.clone();

    rsx! {
        div {
            style: "display: flex; flex-direction: column; gap: 12px; padding: 16px; font-family: sans-serif;",
            onclick: move |_| open_dropdown.set(None),
            h1 { "{APP_TITLE}" }

            nav {
                style: "display: flex; gap: 12px; align-items: center; flex-wrap: wrap;",
                button {
                    disabled: busy(),
                    onclick: move |_| {
                        if busy() {
                            return;
                        }
                        let Some(file_path) = FileDialog::new()
                            .add_filter("Excel workbook", UPLOAD_EXTENSIONS)
                            .pick_file() else {
                            status.set("Upload cancelled".to_string());
                            return;
                        };

                        *busy.write() = true;
                        status.set(format!("Loading {}", file_path.display()));
                        let read = run_blocking("read_upload", || std::fs::read(&file_path));
                        match read {
                            Ok(bytes) => {
                                let name = file_path
                                    .file_name()
                                    .map(|name| name.to_string_lossy().into_owned())
                                    .unwrap_or_else(|| file_path.display().to_string());
                                info!(file = %name, "upload picked");
                                run_blocking("load_workbook", || {
                                    dispatch(
                                        &service_for_upload,
                                        session,
                                        status,
                                        SessionEvent::Upload(UploadedFile { name, bytes }),
                                    )
                                });
                            }
                            Err(err) => {
                                error!(path = %file_path.display(), error = %err, "upload read failed");
                                status.set(format!("Failed to read {}: {err}", file_path.display()));
                                show_error("Upload failed", &err.to_string());
                            }
                        }
                        *busy.write() = false;
                    },
                    "Choose an Excel file"
                }
                span { "{file_label}" }
                if has_workbook {
                    button {
                        disabled: busy(),
                        onclick: move |_| {
                            dispatch(&service_for_clear, session, status, SessionEvent::ClearUpload);
                        },
                        "Clear"
                    }
                }
            }

            if has_workbook {
                div {
                    style: "display: flex; gap: 16px; align-items: center; flex-wrap: wrap;",
                    DropdownSelect {
                        id: DropdownId::Sheet,
                        label: "Select a sheet",
                        options: sheet_options,
                        selected: view.selected_sheet.clone(),
                        open_dropdown,
                        dropdown_pos,
                        on_select: move |sheet: String| {
                            dispatch(&service_for_sheet, session, status, SessionEvent::SelectSheet(sheet));
                        },
                    }
                    DropdownSelect {
                        id: DropdownId::Item,
                        label: "Select an item",
                        options: item_options,
                        selected: view.selected_item.clone(),
                        open_dropdown,
                        dropdown_pos,
                        on_select: move |item: String| {
                            dispatch(&service_for_item, session, status, SessionEvent::SelectItem(item));
                        },
                    }
                }

                if has_row {
                    div {
                        style: "display: flex; flex-direction: column; max-width: 480px;",
                        for field in fields {
                            FieldInput {
                                key: "{field.column}",
                                field: field.clone(),
                                on_input: {
                                    let service_for_edit = service_for_edit.clone();
                                    move |(column, value): (String, String)| {
                                        dispatch(
                                            &service_for_edit,
                                            session,
                                            status,
                                            SessionEvent::EditField { column, value },
                                        );
                                    }
                                },
                            }
                        }
                    }
                } else {
                    p { "No item selected." }
                }

                label {
                    style: "display: flex; align-items: center; gap: 8px;",
                    input {
                        r#type: "checkbox",
                        checked: append_date,
                        onclick: move |_| {
                            dispatch(
                                &service_for_append,
                                session,
                                status,
                                SessionEvent::SetAppendDate(!append_date),
                            );
                        }
                    }
                    span { "Append today's date to filename" }
                }

                div {
                    style: "display: flex; gap: 12px; align-items: center;",
                    button {
                        disabled: busy(),
                        onclick: move |_| {
                            *busy.write() = true;
                            let today = Local::now().date_naive();
                            run_blocking("save_workbook", || {
                                dispatch(&service_for_save, session, status, SessionEvent::Save { today })
                            });
                            *busy.write() = false;
                        },
                        "Save All Changes"
                    }
                    span { "{pending_edits} pending edit(s) on this sheet" }
                }

                if has_download {
                    button {
                        disabled: busy(),
                        onclick: move |_| {
                            let Some(artifact) = session.read().last_export.clone() else {
                                return;
                            };
                            let exporter = service_for_download.exporter();
                            let Some(target) = FileDialog::new()
                                .set_directory(&exporter.config().download_dir)
                                .set_file_name(&artifact.file_name)
                                .add_filter("Excel workbook", UPLOAD_EXTENSIONS)
                                .save_file() else {
                                status.set("Download cancelled".to_string());
                                return;
                            };
                            let written = run_blocking("write_download", || {
                                exporter.write_download(&artifact, &target)
                            });
                            match written {
                                Ok(()) => status.set(format!("Downloaded to {}", target.display())),
                                Err(err) => {
                                    status.set(format!("Failed: {err}"));
                                    show_error("Download failed", &err.to_string());
                                }
                            }
                        },
                        "Download Edited File ({download_name})"
                    }
                }
            }

            p {
                style: "color: #555;",
                "{status}"
            }
        }
    }
}
