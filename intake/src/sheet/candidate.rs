use super::columns::{CanonicalField, ColumnMapping, ColumnProfile};
use super::reader::{read_rows, SheetRow};
use crate::error::{IntakeError, Result};
use log::info;

/// One spreadsheet row mapped onto certificate fields. Unmapped fields are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateRecord {
    pub lab_report_number: String,
    pub description: String,
    pub gross_weight: String,
    pub total_estimated_weight: String,
    pub shape_cut: String,
    pub color: String,
    pub clarity: String,
    pub comments: String,
}

impl CandidateRecord {
    pub fn from_row(row: &SheetRow, mapping: &ColumnMapping) -> Self {
        let cell = |field: CanonicalField| {
            mapping
                .get(field)
                .and_then(|header| row.get(header))
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };
        CandidateRecord {
            lab_report_number: cell(CanonicalField::LabReportNumber),
            description: cell(CanonicalField::Description),
            gross_weight: cell(CanonicalField::GrossWeight),
            total_estimated_weight: cell(CanonicalField::TotalEstWeight),
            shape_cut: cell(CanonicalField::ShapeCut),
            color: cell(CanonicalField::Color),
            clarity: cell(CanonicalField::Clarity),
            comments: cell(CanonicalField::Comments),
        }
    }
}

/// Parses a spreadsheet upload into candidate records.
///
/// Columns are resolved from the headers of the first row, so a missing
/// identifier column fails before any record is built.
pub fn parse_candidates(
    file_name: &str,
    bytes: &[u8],
    profile: &ColumnProfile,
) -> Result<Vec<CandidateRecord>> {
    let rows = read_rows(file_name, bytes)?;
    let Some(first) = rows.first() else {
        return Err(IntakeError::EmptySheet);
    };
    let mapping = profile.resolve(&first.headers())?;

    let records: Vec<CandidateRecord> = rows
        .iter()
        .map(|row| CandidateRecord::from_row(row, &mapping))
        .collect();
    info!("Parsed {} certificate rows from {}", records.len(), file_name);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_row_maps_five_columns_verbatim() {
        let data = "Lab report no.,Description,Gross weight,color,clarity\n\
                    1001, Natural Ruby ,2.10 ct,Pigeon Blood,VS1\n";
        let records =
            parse_candidates("batch.csv", data.as_bytes(), &ColumnProfile::builtin()).unwrap();
        assert_eq!(
            records,
            vec![CandidateRecord {
                lab_report_number: "1001".into(),
                description: "Natural Ruby".into(),
                gross_weight: "2.10 ct".into(),
                total_estimated_weight: String::new(),
                shape_cut: String::new(),
                color: "Pigeon Blood".into(),
                clarity: "VS1".into(),
                comments: String::new(),
            }]
        );
    }

    #[test]
    fn missing_identifier_column_builds_nothing() {
        let data = "Description,color\nRuby,Red\n";
        let err =
            parse_candidates("batch.csv", data.as_bytes(), &ColumnProfile::builtin()).unwrap_err();
        assert!(matches!(err, IntakeError::ColumnNotFound { .. }));
    }

    #[test]
    fn empty_sheet_is_reported_separately() {
        let err = parse_candidates("batch.csv", b"Lab No\n", &ColumnProfile::builtin())
            .unwrap_err();
        assert!(matches!(err, IntakeError::EmptySheet));
    }

    #[test]
    fn workbook_rows_become_candidates() {
        let workbook = crate::sheet::reader::tests::batch_workbook();
        let records =
            parse_candidates("Batch.XLSX", &workbook, &ColumnProfile::builtin()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].lab_report_number, "1001");
        assert_eq!(records[0].description, "Natural Ruby");
        assert_eq!(records[0].gross_weight, "2.1");
        assert_eq!(records[1].lab_report_number, "1002");
    }
}
