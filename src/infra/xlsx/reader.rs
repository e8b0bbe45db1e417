use std::collections::HashSet;
use std::io::Cursor;

use anyhow::{Context, Result};
use calamine::{Data, Range, Reader, Xlsx};

use crate::domain::entities::workbook::{CellValue, Sheet};

pub fn cell_to_value(cell: &Data) -> CellValue {
    match cell {
        Data::String(v) => CellValue::Text(v.to_string()),
        Data::Float(v) => CellValue::Number(*v),
        Data::Int(v) => CellValue::Number(*v as f64),
        Data::Bool(v) => CellValue::Bool(*v),
        Data::DateTime(v) => CellValue::DateTime(v.as_f64()),
        Data::DateTimeIso(v) => CellValue::Text(v.to_string()),
        Data::DurationIso(v) => CellValue::Text(v.to_string()),
        Data::Error(v) => CellValue::Text(format!("{v:?}")),
        Data::Empty => CellValue::Empty,
    }
}

fn header_name(cell: Option<&Data>, col_idx: usize) -> String {
    let name = cell.map(cell_to_value).map(|value| value.display()).unwrap_or_default();
    if name.trim().is_empty() {
        format!("Unnamed: {col_idx}")
    } else {
        name
    }
}

/// Repeated header names get a `.N` suffix (`Lot`, `Lot.1`, ...) so every
/// column has its own name. A suffix never reuses a name present in the row.
pub fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let present: HashSet<String> = headers.iter().cloned().collect();
    let mut used: HashSet<String> = HashSet::with_capacity(headers.len());

    headers
        .into_iter()
        .map(|name| {
            if used.insert(name.clone()) {
                return name;
            }
            let mut suffix = 1_usize;
            loop {
                let candidate = format!("{name}.{suffix}");
                if !present.contains(&candidate) && used.insert(candidate.clone()) {
                    return candidate;
                }
                suffix += 1;
            }
        })
        .collect()
}

pub fn range_to_sheet(name: &str, range: &Range<Data>) -> Sheet {
    let origin = range.start().unwrap_or((0, 0));
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Sheet::new(name, Vec::new(), Vec::new());
    };

    let width = header.len();
    let columns = dedupe_headers(
        (0..width)
            .map(|col_idx| header_name(header.get(col_idx), col_idx))
            .collect(),
    );

    let data: Vec<Vec<CellValue>> = rows
        .map(|row| {
            (0..width)
                .map(|col_idx| row.get(col_idx).map(cell_to_value).unwrap_or(CellValue::Empty))
                .collect()
        })
        .collect();

    Sheet::new(name, columns, data).with_origin(origin)
}

pub fn read_xlsx_sheets(bytes: &[u8]) -> Result<Vec<Sheet>> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).context("upload is not a valid xlsx workbook")?;

    let sheet_names = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(sheet_names.len());
    for sheet_name in sheet_names {
        let range = workbook
            .worksheet_range(&sheet_name)
            .with_context(|| format!("failed to read sheet: {sheet_name}"))?;
        sheets.push(range_to_sheet(&sheet_name, &range));
    }

    Ok(sheets)
}
