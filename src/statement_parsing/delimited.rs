use crate::error::ImportError;

use super::{
    amount::normalize_amount,
    parser::{ParsedStatement, StatementParser},
};

pub const DATE_COLUMN: &str = "date";
pub const AMOUNT_COLUMN: &str = "amount";
pub const DETAILS_COLUMN: &str = "details";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Positions of the required columns inside a header row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnIndexes {
    pub date: usize,
    pub amount: usize,
    pub details: usize,
}

impl ColumnIndexes {
    pub fn from_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        let (mut date, mut amount, mut details) = (None, None, None);

        for (index, header) in headers.into_iter().enumerate() {
            match header.trim() {
                DATE_COLUMN => date = date.or(Some(index)),
                AMOUNT_COLUMN => amount = amount.or(Some(index)),
                DETAILS_COLUMN => details = details.or(Some(index)),
                _ => continue,
            }
        }

        Some(ColumnIndexes {
            date: date?,
            amount: amount?,
            details: details?,
        })
    }
}

pub struct DelimitedParser;

impl DelimitedParser {
    fn delimiter(contents: &[u8]) -> u8 {
        let header = contents.split(|b| *b == b'\n').next().unwrap_or_default();

        if header.contains(&b';') && !header.contains(&b',') {
            b';'
        } else {
            b','
        }
    }
}

impl StatementParser for DelimitedParser {
    fn parse(&self, contents: &[u8]) -> Result<ParsedStatement, ImportError> {
        let contents = contents.strip_prefix(UTF8_BOM).unwrap_or(contents);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(Self::delimiter(contents))
            .from_reader(contents);

        let headers = reader.headers().map_err(|err| {
            tracing::warn!("error reading csv header: {}", err);
            ImportError::EmptyOrUnparseable
        })?;

        let columns = ColumnIndexes::from_headers(headers.iter()).ok_or_else(|| {
            tracing::warn!(?headers, "csv is missing a required column");
            ImportError::EmptyOrUnparseable
        })?;

        let mut parsed = ParsedStatement::default();

        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(err) => {
                    tracing::debug!("skipping unreadable csv record: {}", err);
                    parsed.skipped += 1;
                    continue;
                }
            };

            let date = record.get(columns.date).unwrap_or("").trim().to_string();
            let amount = normalize_amount(record.get(columns.amount).unwrap_or(""));
            let details = record.get(columns.details).unwrap_or("").trim().to_string();

            parsed.push_amount(date, amount, details);
        }

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement_parsing::parser::RawRow;

    fn row(date: &str, amount: f64, details: &str) -> RawRow {
        RawRow {
            date: date.to_owned(),
            amount,
            details: details.to_owned(),
        }
    }

    #[test]
    fn reads_columns_by_header_name() {
        let csv = "details,amount,date\nMagnum,1500,2024-01-05\nпополнение счета,5000,2024-01-06\n";
        let parsed = DelimitedParser.parse(csv.as_bytes()).expect("parsed");

        assert_eq!(
            parsed.rows,
            vec![
                row("2024-01-05", 1500.0, "Magnum"),
                row("2024-01-06", 5000.0, "пополнение счета"),
            ]
        );
    }

    #[test]
    fn sniffs_semicolon_delimiter_and_bom() {
        let csv = "\u{feff}date;amount;details\n05.01.24;\"1 234,50 ₸\";WOLT.COM\n";
        let parsed = DelimitedParser.parse(csv.as_bytes()).expect("parsed");

        assert_eq!(parsed.rows, vec![row("05.01.24", 1234.5, "WOLT.COM")]);
    }

    #[test]
    fn skips_and_counts_bad_amounts() {
        let csv = "date,amount,details\n\
            2024-01-05,abc,Magnum\n\
            2024-01-06,,Beeline\n\
            2024-01-07,300,Beeline\n";
        let parsed = DelimitedParser.parse(csv.as_bytes()).expect("parsed");

        assert_eq!(parsed.rows, vec![row("2024-01-07", 300.0, "Beeline")]);
        assert_eq!(parsed.skipped, 2);
    }

    #[test]
    fn missing_details_cell_becomes_empty() {
        let csv = "date,amount,details\n2024-01-05,100\n";
        let parsed = DelimitedParser.parse(csv.as_bytes()).expect("parsed");

        assert_eq!(parsed.rows, vec![row("2024-01-05", 100.0, "")]);
    }

    #[test]
    fn missing_required_column_is_unparseable() {
        let csv = "date,sum,details\n2024-01-05,100,Magnum\n";
        assert_eq!(
            DelimitedParser.parse(csv.as_bytes()),
            Err(ImportError::EmptyOrUnparseable)
        );
    }

    #[test]
    fn header_names_must_match_exactly() {
        assert_eq!(
            ColumnIndexes::from_headers(["Date", "amount", "details"]),
            None
        );
        assert_eq!(
            ColumnIndexes::from_headers([" date ", "amount", "x", "details"]),
            Some(ColumnIndexes {
                date: 0,
                amount: 1,
                details: 3
            })
        );
    }
}
