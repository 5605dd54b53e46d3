use std::io::Cursor;

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};

use crate::error::{AmountFormatError, ImportError};

use super::{
    amount::normalize_amount,
    delimited::ColumnIndexes,
    parser::{ParsedStatement, StatementParser},
};

/// Reads the first worksheet of an xlsx/xls/ods workbook.
pub struct SpreadsheetParser;

impl StatementParser for SpreadsheetParser {
    fn parse(&self, contents: &[u8]) -> Result<ParsedStatement, ImportError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(contents)).map_err(|err| {
            tracing::warn!("error opening workbook: {}", err);
            ImportError::EmptyOrUnparseable
        })?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or(ImportError::EmptyOrUnparseable)?
            .map_err(|err| {
                tracing::warn!("error reading first worksheet: {}", err);
                ImportError::EmptyOrUnparseable
            })?;

        parse_range(&range)
    }
}

pub(crate) fn parse_range(range: &Range<Data>) -> Result<ParsedStatement, ImportError> {
    let mut rows = range.rows();

    let header = rows.next().ok_or(ImportError::EmptyOrUnparseable)?;
    let header: Vec<String> = header.iter().map(cell_text).collect();
    let columns = ColumnIndexes::from_headers(header.iter().map(String::as_str)).ok_or_else(|| {
        tracing::warn!(?header, "worksheet is missing a required column");
        ImportError::EmptyOrUnparseable
    })?;

    let mut parsed = ParsedStatement::default();

    for row in rows {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }

        let date = row.get(columns.date).map(date_text).unwrap_or_default();
        let amount = row
            .get(columns.amount)
            .map(cell_amount)
            .unwrap_or_else(|| Err(AmountFormatError(String::new())));
        let details = row.get(columns.details).map(cell_text).unwrap_or_default();

        parsed.push_amount(date, amount, details);
    }

    Ok(parsed)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

fn date_text(cell: &Data) -> String {
    match cell {
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|dt| dt.date().format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| cell.to_string()),
        Data::DateTimeIso(s) => s.split('T').next().unwrap_or(s).to_string(),
        other => cell_text(other),
    }
}

fn cell_amount(cell: &Data) -> Result<f64, AmountFormatError> {
    match cell {
        Data::Float(f) => Ok(*f),
        Data::Int(i) => Ok(*i as f64),
        Data::String(s) => normalize_amount(s),
        other => Err(AmountFormatError(other.to_string())),
    }
}
