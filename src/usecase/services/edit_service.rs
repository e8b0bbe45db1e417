use tracing::debug;

use crate::domain::entities::edit::{EditBuffer, EditKey};
use crate::domain::entities::workbook::{CellValue, Sheet};

/// An entry is applied only when it targets the active sheet, an item that
/// is still listed there, and a column the sheet has. Everything else stays
/// in the buffer untouched.
pub fn is_applicable(key: &EditKey, active: &Sheet, items: &[String]) -> bool {
    key.sheet == active.name
        && items.iter().any(|item| *item == key.item)
        && active.column_index(&key.column).is_some()
}

/// Reconciles `edits` into a copy of the pristine active sheet.
///
/// Always starts from `pristine`, so committing the same buffer twice yields
/// the same table.
pub fn commit_edits(pristine: &Sheet, edits: &EditBuffer) -> Sheet {
    let mut reconciled = pristine.clone();
    let items = pristine.item_ids();

    let mut applied = 0_usize;
    let mut skipped = 0_usize;
    for (key, value) in edits.iter() {
        if !is_applicable(key, pristine, &items) {
            skipped += 1;
            continue;
        }
        let (Some(row_idx), Some(col_idx)) = (
            pristine.find_item_row(&key.item),
            pristine.column_index(&key.column),
        ) else {
            skipped += 1;
            continue;
        };
        if reconciled.set_cell(row_idx, col_idx, CellValue::Text(value.to_string())) {
            applied += 1;
        }
    }

    debug!(sheet = %pristine.name, applied, skipped, "committed edits");
    reconciled
}
