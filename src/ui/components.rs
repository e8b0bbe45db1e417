use std::collections::HashMap;

use dioxus::prelude::*;

use crate::usecase::services::selection_service::Field;

pub const NONE_LABEL: &str = "(none)";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropdownId {
    Sheet,
    Item,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DropdownOption {
    pub value: String,
    pub label: String,
}

impl DropdownOption {
    pub fn plain(value: &str) -> Self {
        Self {
            value: value.to_string(),
            label: if value.is_empty() {
                NONE_LABEL.to_string()
            } else {
                value.to_string()
            },
        }
    }
}

/// Builds one option per value. Repeats of a value are labelled with their
/// occurrence (`Glove (2)`) so rows sharing an ID stay distinguishable.
pub fn options_for(values: &[String]) -> Vec<DropdownOption> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    values
        .iter()
        .map(|value| {
            let count = seen.entry(value.as_str()).or_insert(0);
            *count += 1;
            let mut option = DropdownOption::plain(value);
            if *count > 1 {
                option.label = format!("{} ({count})", option.label);
            }
            option
        })
        .collect()
}

/// Position of the option that stands for `selected`. Lookups resolve to the
/// first row with a given ID, so only the first occurrence counts.
pub fn selected_index(options: &[DropdownOption], selected: Option<&str>) -> Option<usize> {
    let selected = selected?;
    options.iter().position(|opt| opt.value == selected)
}

pub fn dropdown_label(options: &[DropdownOption], selected: Option<&str>) -> String {
    selected_index(options, selected)
        .map(|idx| options[idx].label.clone())
        .unwrap_or_else(|| NONE_LABEL.to_string())
}

#[component]
pub fn DropdownSelect(
    id: DropdownId,
    label: &'static str,
    options: Vec<DropdownOption>,
    selected: Option<String>,
    mut open_dropdown: Signal<Option<DropdownId>>,
    mut dropdown_pos: Signal<Option<(f64, f64)>>,
    on_select: EventHandler<String>,
) -> Element {
    let is_open = open_dropdown() == Some(id);
    let active = selected_index(&options, selected.as_deref());
    let selected_label = dropdown_label(&options, selected.as_deref());
    let (left, top) = dropdown_pos().unwrap_or((0.0, 0.0));
    let count = options.len();
    let disabled = options.is_empty();

    rsx! {
        div {
            style: "position: relative; display: inline-flex; align-items: center; gap: 6px;",
            span { "{label}" }
            button {
                style: "border: 1px solid #bbb; background: #fff; padding: 4px 10px; border-radius: 6px; cursor: pointer;",
                disabled,
                title: "{count} option(s)",
                onclick: move |event| {
                    event.stop_propagation();
                    if is_open {
                        open_dropdown.set(None);
                    } else {
                        let point = event.client_coordinates();
                        dropdown_pos.set(Some((point.x, point.y + 24.0)));
                        open_dropdown.set(Some(id));
                    }
                },
                "{selected_label}"
            }
        }

        if is_open {
            div {
                style: "position: fixed; left: {left}px; top: {top}px; min-width: 200px; max-height: 320px; overflow-y: auto; background: #fff; border: 1px solid #bbb; border-radius: 8px; box-shadow: 0 10px 24px rgba(0,0,0,0.15); z-index: 1200;",
                onclick: move |event| event.stop_propagation(),
                for (idx, option) in options.into_iter().enumerate() {
                    DropdownRow {
                        key: "{idx}",
                        option,
                        active: active == Some(idx),
                        on_pick: move |value: String| {
                            on_select.call(value);
                            open_dropdown.set(None);
                        },
                    }
                }
            }
        }
    }
}

#[component]
fn DropdownRow(option: DropdownOption, active: bool, on_pick: EventHandler<String>) -> Element {
    let background = if active { "#eef4ff" } else { "transparent" };
    let weight = if active { "600" } else { "400" };
    let value = option.value.clone();

    rsx! {
        div {
            style: "padding: 8px 10px; cursor: pointer; background: {background}; font-weight: {weight};",
            onclick: move |_| on_pick.call(value.clone()),
            "{option.label}"
        }
    }
}

/// Text input for one column of the selected item.
#[component]
pub fn FieldInput(field: Field, on_input: EventHandler<(String, String)>) -> Element {
    let column = field.column.clone();
    let marker = if field.edited { " *" } else { "" };

    rsx! {
        label {
            style: "display: flex; flex-direction: column; gap: 4px; padding: 4px 0;",
            span { "{field.column}{marker}" }
            input {
                r#type: "text",
                style: "padding: 4px 8px; border: 1px solid #bbb; border-radius: 4px;",
                value: "{field.value}",
                oninput: move |event| {
                    on_input.call((column.clone(), event.value()));
                }
            }
        }
    }
}
