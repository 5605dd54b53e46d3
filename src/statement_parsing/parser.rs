use serde::Serialize;

use crate::error::ImportError;

use super::{delimited::DelimitedParser, pdf::PdfTableParser, spreadsheet::SpreadsheetParser};

/// One statement line, before classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawRow {
    pub date: String,
    pub amount: f64,
    pub details: String,
}

#[derive(Debug, Default, PartialEq)]
pub struct ParsedStatement {
    pub rows: Vec<RawRow>,
    /// Rows dropped because their amount could not be read.
    pub skipped: usize,
}

impl ParsedStatement {
    pub(crate) fn push_amount(
        &mut self,
        date: String,
        amount: Result<f64, crate::error::AmountFormatError>,
        details: String,
    ) {
        match amount {
            Ok(amount) => self.rows.push(RawRow {
                date,
                amount,
                details,
            }),
            Err(err) => {
                tracing::debug!(%date, "skipping row: {}", err);
                self.skipped += 1;
            }
        }
    }
}

pub trait StatementParser: Sync + Send {
    fn parse(&self, contents: &[u8]) -> Result<ParsedStatement, ImportError>;
}

/// Statement formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementFormat {
    Delimited,
    Spreadsheet,
    PdfTable,
}

impl StatementFormat {
    pub fn from_file_name(file_name: &str) -> Result<Self, ImportError> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(StatementFormat::Delimited),
            "xlsx" | "xls" | "ods" => Ok(StatementFormat::Spreadsheet),
            "pdf" => Ok(StatementFormat::PdfTable),
            _ => Err(ImportError::UnsupportedFormat(extension)),
        }
    }

    pub fn parser(&self) -> &'static dyn StatementParser {
        match self {
            StatementFormat::Delimited => &DelimitedParser,
            StatementFormat::Spreadsheet => &SpreadsheetParser,
            StatementFormat::PdfTable => &PdfTableParser,
        }
    }
}

/// Picks the parser from the file name and runs it.
///
/// A statement that yields no usable rows is an error, even when the parser
/// itself did not fail.
pub fn parse_statement(file_name: &str, contents: &[u8]) -> Result<ParsedStatement, ImportError> {
    let format = StatementFormat::from_file_name(file_name)?;
    let parsed = format.parser().parse(contents)?;

    if parsed.rows.is_empty() {
        return Err(ImportError::EmptyOrUnparseable);
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            StatementFormat::from_file_name("kaspi.CSV"),
            Ok(StatementFormat::Delimited)
        );
        assert_eq!(
            StatementFormat::from_file_name("statement.2024.xlsx"),
            Ok(StatementFormat::Spreadsheet)
        );
        assert_eq!(
            StatementFormat::from_file_name("gold.pdf"),
            Ok(StatementFormat::PdfTable)
        );
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        assert_eq!(
            StatementFormat::from_file_name("notes.txt"),
            Err(ImportError::UnsupportedFormat("txt".to_owned()))
        );
        assert_eq!(
            StatementFormat::from_file_name("no_extension"),
            Err(ImportError::UnsupportedFormat(String::new()))
        );
    }

    #[test]
    fn empty_statement_is_rejected() {
        let result = parse_statement("empty.csv", b"date,amount,details\n");
        assert_eq!(result, Err(ImportError::EmptyOrUnparseable));
    }

    #[test]
    fn statement_with_only_bad_amounts_is_rejected() {
        let result = parse_statement("bad.csv", b"date,amount,details\n2024-01-05,abc,Magnum\n");
        assert_eq!(result, Err(ImportError::EmptyOrUnparseable));
    }

    #[test]
    fn parses_csv_statement() {
        let parsed = parse_statement(
            "ok.csv",
            "date,amount,details\n2024-01-05,1500,Magnum\n".as_bytes(),
        )
        .expect("parsed");

        assert_eq!(
            parsed.rows,
            vec![RawRow {
                date: "2024-01-05".to_owned(),
                amount: 1500.0,
                details: "Magnum".to_owned(),
            }]
        );
        assert_eq!(parsed.skipped, 0);
    }
}
