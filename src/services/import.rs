use anyhow::Context;

use crate::{
    classification::{CategoryRules, Classification},
    data::{BatchCounts, Data, LedgerEntry, NewExpense, NewTransfer},
    error::{ApiError, ImportError},
    statement_parsing::{ParsedStatement, RawRow, parse_booking_date, parse_statement},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub rows_added: usize,
    pub expenses_added: usize,
    pub transfers_added: usize,
    pub rows_skipped: usize,
}

pub fn classify_row(rules: &CategoryRules, row: RawRow) -> LedgerEntry {
    let booked_on = parse_booking_date(&row.date);

    match rules.classify(&row.details) {
        Classification::Transfer => LedgerEntry::Transfer(NewTransfer {
            date: row.date,
            booked_on,
            amount: row.amount,
            details: row.details,
        }),
        Classification::Expense { category } => LedgerEntry::Expense(NewExpense {
            date: row.date,
            booked_on,
            category,
            amount: row.amount,
            details: row.details,
        }),
    }
}

/// Parses an uploaded statement, classifies every row and stores the result
/// as one batch.
#[tracing::instrument(skip(data, rules, contents), fields(bytes = contents.len()))]
pub async fn import_statement(
    data: &Data,
    rules: &CategoryRules,
    file_name: String,
    contents: Vec<u8>,
) -> Result<ImportReport, ApiError> {
    let parsed = parse_in_background(file_name, contents).await?;

    let rows_skipped = parsed.skipped;
    let entries: Vec<LedgerEntry> = parsed
        .rows
        .into_iter()
        .map(|row| classify_row(rules, row))
        .collect();

    let BatchCounts {
        expenses,
        transfers,
    } = data
        .record_batch(&entries)
        .await
        .context("error storing statement rows")?;

    if rows_skipped > 0 {
        tracing::info!(rows_skipped, "some statement rows had unreadable amounts");
    }

    Ok(ImportReport {
        rows_added: expenses + transfers,
        expenses_added: expenses,
        transfers_added: transfers,
        rows_skipped,
    })
}

async fn parse_in_background(
    file_name: String,
    contents: Vec<u8>,
) -> Result<ParsedStatement, ApiError> {
    let parsed = tokio::task::spawn_blocking(move || parse_statement(&file_name, &contents))
        .await
        .map_err(|err| {
            tracing::warn!("statement parser task failed: {}", err);
            ImportError::EmptyOrUnparseable
        })?;

    parsed.map_err(|err| {
        tracing::warn!("rejected statement: {:?}", err);
        ApiError::from(err)
    })
}
