use crate::domain::entities::edit::{EditBuffer, EditKey};
use crate::domain::entities::workbook::Sheet;

/// One text input for the selected item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub column: String,
    pub original: String,
    /// Buffered value if the user changed it, otherwise `original`.
    pub value: String,
    pub edited: bool,
}

pub fn item_ids(sheet: &Sheet) -> Vec<String> {
    sheet.item_ids()
}

pub fn find_item_row(sheet: &Sheet, item: &str) -> Option<usize> {
    sheet.find_item_row(item)
}

/// Keeps `selected` only while it still names a row of `sheet`.
pub fn resolve_item(sheet: &Sheet, selected: Option<&str>) -> Option<String> {
    let selected = selected?;
    find_item_row(sheet, selected).map(|_| selected.to_string())
}

pub fn default_item(sheet: &Sheet) -> Option<String> {
    item_ids(sheet).into_iter().next()
}

pub fn fields_for_item(sheet: &Sheet, item: &str, edits: &EditBuffer) -> Option<Vec<Field>> {
    let row_idx = find_item_row(sheet, item)?;

    let fields = sheet
        .columns
        .iter()
        .enumerate()
        .map(|(col_idx, column)| {
            let original = sheet
                .cell(row_idx, col_idx)
                .map(|cell| cell.display())
                .unwrap_or_default();
            let key = EditKey::new(sheet.name.as_str(), item, column.as_str());
            let pending = edits.pending(&key);
            Field {
                column: column.clone(),
                value: edits.get(&key, &original).to_string(),
                edited: pending.is_some(),
                original,
            }
        })
        .collect();

    Some(fields)
}
