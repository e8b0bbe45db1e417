use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet};

use crate::domain::entities::workbook::{CellValue, Sheet};

const DATE_NUM_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

fn col_num(col_idx: usize) -> Result<ColNum> {
    ColNum::try_from(col_idx).with_context(|| format!("column index out of range: {col_idx}"))
}

fn row_num(row_idx: usize) -> Result<RowNum> {
    RowNum::try_from(row_idx).with_context(|| format!("row index out of range: {row_idx}"))
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: RowNum,
    col: ColNum,
    value: &CellValue,
    date_format: &Format,
) -> Result<()> {
    match value {
        CellValue::Empty => {}
        CellValue::Text(v) if v.is_empty() => {}
        CellValue::Text(v) => {
            worksheet.write_string(row, col, v.as_str())?;
        }
        CellValue::Number(v) => {
            worksheet.write_number(row, col, *v)?;
        }
        CellValue::Bool(v) => {
            worksheet.write_boolean(row, col, *v)?;
        }
        CellValue::DateTime(serial) => {
            worksheet.write_number_with_format(row, col, *serial, date_format)?;
        }
    }
    Ok(())
}

fn write_sheet(workbook: &mut Workbook, sheet: &Sheet) -> Result<()> {
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format(DATE_NUM_FORMAT);

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet.name.as_str())
        .with_context(|| format!("invalid sheet name: {}", sheet.name))?;

    let (first_row, first_col) = (sheet.origin.0 as usize, sheet.origin.1 as usize);
    let header_row = row_num(first_row)?;
    for (col_idx, header) in sheet.columns.iter().enumerate() {
        worksheet
            .write_string_with_format(
                header_row,
                col_num(first_col + col_idx)?,
                header.as_str(),
                &header_format,
            )
            .with_context(|| format!("failed to write header {header} on {}", sheet.name))?;
    }

    // Data starts on the row below the header.
    for (row_idx, cells) in sheet.rows.iter().enumerate() {
        let excel_row = row_num(first_row + 1 + row_idx)?;
        for (col_idx, value) in cells.iter().enumerate() {
            write_cell(worksheet, excel_row, col_num(first_col + col_idx)?, value, &date_format)
                .with_context(|| {
                    format!(
                        "failed to write cell ({excel_row}, {col_idx}) on {}",
                        sheet.name
                    )
                })?;
        }
    }

    Ok(())
}

pub fn build_xlsx_workbook(sheets: &[Sheet]) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    for sheet in sheets {
        write_sheet(&mut workbook, sheet)?;
    }
    Ok(workbook)
}

pub fn write_xlsx_to_buffer(sheets: &[Sheet]) -> Result<Vec<u8>> {
    let mut workbook = build_xlsx_workbook(sheets)?;
    workbook
        .save_to_buffer()
        .context("failed to serialize workbook to memory")
}

pub fn write_xlsx_to_path(sheets: &[Sheet], path: &Path) -> Result<()> {
    let mut workbook = build_xlsx_workbook(sheets)?;
    workbook
        .save(path)
        .with_context(|| format!("failed to save workbook: {}", path.display()))
}
