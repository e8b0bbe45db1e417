use chrono::{Duration, NaiveDate};

/// A single cell as read from an uploaded workbook.
///
/// Untouched sheets keep their cell types through export; edited cells are
/// always written back as [`CellValue::Text`].
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Excel serial date (days since 1899-12-30, fractional part is time of day).
    DateTime(f64),
}

impl CellValue {
    /// String shown in text inputs and used as the item identifier.
    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(v) => v.clone(),
            CellValue::Number(v) => v.to_string(),
            CellValue::Bool(v) => v.to_string(),
            CellValue::DateTime(serial) => {
                format_excel_serial(*serial).unwrap_or_else(|| serial.to_string())
            }
        }
    }
}

fn format_excel_serial(serial: f64) -> Option<String> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round();
    if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
        return None;
    }
    let moment = epoch.checked_add_signed(Duration::milliseconds(millis as i64))?;
    Some(moment.format("%Y-%m-%d %H:%M:%S").to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    /// Zero-based (row, column) of the header's first cell in the worksheet.
    pub origin: (u32, u32),
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            origin: (0, 0),
            columns,
            rows,
        }
    }

    pub fn with_origin(mut self, origin: (u32, u32)) -> Self {
        self.origin = origin;
        self
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column)
    }

    pub fn cell(&self, row_idx: usize, col_idx: usize) -> Option<&CellValue> {
        self.rows.get(row_idx).and_then(|row| row.get(col_idx))
    }

    /// Values of the first column in row order. Duplicates are kept.
    pub fn item_ids(&self) -> Vec<String> {
        if self.columns.is_empty() {
            return Vec::new();
        }
        self.rows
            .iter()
            .map(|row| row.first().map(CellValue::display).unwrap_or_default())
            .collect()
    }

    /// First row whose identifier matches `item`.
    pub fn find_item_row(&self, item: &str) -> Option<usize> {
        if self.columns.is_empty() {
            return None;
        }
        self.rows.iter().position(|row| {
            row.first()
                .map(|cell| cell.display() == item)
                .unwrap_or(false)
        })
    }

    pub fn set_cell(&mut self, row_idx: usize, col_idx: usize, value: CellValue) -> bool {
        match self.rows.get_mut(row_idx).and_then(|row| row.get_mut(col_idx)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }
}

/// Raw bytes handed over by the file picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// An uploaded workbook. Sheets are kept exactly as parsed so that every
/// export starts from the original tables.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedWorkbook {
    pub file_name: String,
    pub sheets: Vec<Sheet>,
}

impl LoadedWorkbook {
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|sheet| sheet.name.clone()).collect()
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    pub fn first_sheet(&self) -> Option<&Sheet> {
        self.sheets.first()
    }
}
