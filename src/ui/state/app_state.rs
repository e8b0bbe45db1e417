use dioxus::prelude::{use_signal, Signal};

use crate::domain::entities::session::EditorSession;
use crate::ui::components::DropdownId;

pub struct AppState {
    pub session: Signal<EditorSession>,
    pub busy: Signal<bool>,
    pub status: Signal<String>,
    pub open_dropdown: Signal<Option<DropdownId>>,
    pub dropdown_pos: Signal<Option<(f64, f64)>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            session: use_signal(EditorSession::new),
            busy: use_signal(|| false),
            status: use_signal(|| "Ready".to_string()),
            open_dropdown: use_signal(|| None::<DropdownId>),
            dropdown_pos: use_signal(|| None::<(f64, f64)>),
        }
    }
}
