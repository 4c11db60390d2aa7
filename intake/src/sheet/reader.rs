//! Reads a spreadsheet upload into header-keyed rows.
//!
//! `.csv` files go through the `csv` crate; every other extension is handed to
//! `calamine`, which sniffs xlsx/xlsm/xls/ods and reads the first worksheet.
//! The first row is always the header row. Cell values are rendered to strings
//! and trimmed; rows where every cell is blank are dropped.

use crate::error::{IntakeError, Result};
use calamine::{open_workbook_auto_from_rs, Reader};
use std::io::Cursor;
use std::path::Path;

/// One data row: `(header, cell)` pairs in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetRow {
    cells: Vec<(String, String)>,
}

impl SheetRow {
    pub fn headers(&self) -> Vec<&str> {
        self.cells.iter().map(|(h, _)| h.as_str()).collect()
    }

    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }

    fn from_cells(headers: &[String], values: impl Iterator<Item = String>) -> Option<Self> {
        let mut values = values;
        let cells: Vec<(String, String)> = headers
            .iter()
            .map(|h| (h.clone(), values.next().unwrap_or_default().trim().to_string()))
            .filter(|(h, _)| !h.trim().is_empty())
            .collect();
        if cells.iter().all(|(_, v)| v.is_empty()) {
            return None;
        }
        Some(SheetRow { cells })
    }
}

/// Reads all data rows of `bytes`. Zero rows is `Ok(vec![])`.
pub fn read_rows(file_name: &str, bytes: &[u8]) -> Result<Vec<SheetRow>> {
    let is_csv = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if is_csv {
        read_csv(bytes)
    } else {
        read_workbook(bytes)
    }
}

fn read_csv(bytes: &[u8]) -> Result<Vec<SheetRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| IntakeError::Parse(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IntakeError::Parse(e.to_string()))?;
        if let Some(row) = SheetRow::from_cells(&headers, record.iter().map(str::to_string)) {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn read_workbook(bytes: &[u8]) -> Result<Vec<SheetRow>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| IntakeError::Parse(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IntakeError::Parse("workbook has no worksheets".to_string()))?
        .map_err(|e| IntakeError::Parse(e.to_string()))?;

    let mut lines = range.rows();
    let Some(header_line) = lines.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_line.iter().map(|c| c.to_string()).collect();

    Ok(lines
        .filter_map(|line| SheetRow::from_cells(&headers, line.iter().map(|c| c.to_string())))
        .collect())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[test]
    fn csv_rows_are_keyed_by_header_and_trimmed() {
        let data = "Lab report no.,Description,Gross weight\n 1001 ,Natural Ruby, 2.10 \n";
        let rows = read_rows("batch.csv", data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Lab report no."), Some("1001"));
        assert_eq!(rows[0].get("Gross weight"), Some("2.10"));
        assert_eq!(
            rows[0].headers(),
            vec!["Lab report no.", "Description", "Gross weight"]
        );
    }

    #[test]
    fn blank_lines_and_short_rows() {
        let data = "Lab No,Color,Clarity\n,,\n1002,Blue\n";
        let rows = read_rows("BATCH.CSV", data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Clarity"), Some(""));
    }

    #[test]
    fn header_only_file_has_no_rows() {
        let rows = read_rows("empty.csv", b"Lab No,Color\n").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn garbage_workbook_is_a_parse_error() {
        let err = read_rows("batch.xlsx", b"definitely not a workbook").unwrap_err();
        assert!(matches!(err, IntakeError::Parse(_)));
    }

    /// Two-sheet workbook: the batch first, an unrelated sheet second.
    pub(crate) fn batch_workbook() -> Vec<u8> {
        let mut workbook = rust_xlsxwriter::Workbook::new();

        let batch = workbook.add_worksheet();
        batch.set_name("Batch").unwrap();
        batch.write_string(0, 0, "Lab report no.").unwrap();
        batch.write_string(0, 1, "Description").unwrap();
        batch.write_string(0, 2, "Gross weight").unwrap();
        batch.write_number(1, 0, 1001.0).unwrap();
        batch.write_string(1, 1, " Natural Ruby ").unwrap();
        batch.write_number(1, 2, 2.1).unwrap();
        batch.write_number(3, 0, 1002.0).unwrap();

        let notes = workbook.add_worksheet();
        notes.set_name("Notes").unwrap();
        notes.write_string(0, 0, "Lab report no.").unwrap();
        notes.write_number(1, 0, 9999.0).unwrap();

        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn workbook_reads_first_sheet_with_numbers_as_text() {
        let rows = read_rows("batch.xlsx", &batch_workbook()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Lab report no."), Some("1001"));
        assert_eq!(rows[0].get("Description"), Some("Natural Ruby"));
        assert_eq!(rows[0].get("Gross weight"), Some("2.1"));
        assert_eq!(rows[1].get("Lab report no."), Some("1002"));
        assert_eq!(rows[1].get("Gross weight"), Some(""));
    }
}
