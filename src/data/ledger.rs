use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{SqliteConnection, prelude::FromRow, query, query_as};

use super::Data;

#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub date: String,
    pub booked_on: Option<NaiveDate>,
    pub category: String,
    pub amount: f64,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTransfer {
    pub date: String,
    pub booked_on: Option<NaiveDate>,
    pub amount: f64,
    pub details: String,
}

/// A classified statement row, ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEntry {
    Expense(NewExpense),
    Transfer(NewTransfer),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchCounts {
    pub expenses: usize,
    pub transfers: usize,
}

#[derive(Debug, Serialize, FromRow, PartialEq)]
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
pub struct ExpenseRecord {
    pub id: i64,
    pub date: String,
    pub booked_on: Option<NaiveDate>,
    pub category: String,
    pub amount: f64,
    pub details: String,
}

#[derive(Debug, Serialize, FromRow, PartialEq)]
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
pub struct TransferRecord {
    pub id: i64,
    pub date: String,
    pub booked_on: Option<NaiveDate>,
    pub amount: f64,
    pub details: String,
}

impl Data {
    #[tracing::instrument(skip(self))]
    pub async fn record_expense(&self, expense: &NewExpense) -> Result<i64, sqlx::Error> {
        let _guard = self.write_lock.lock().await;
        let mut conn = self.pool.acquire().await?;

        insert_expense(&mut conn, expense, Utc::now()).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn record_transfer(&self, transfer: &NewTransfer) -> Result<i64, sqlx::Error> {
        let _guard = self.write_lock.lock().await;
        let mut conn = self.pool.acquire().await?;

        insert_transfer(&mut conn, transfer, Utc::now()).await
    }

    /// Stores one upload. Either every entry lands or none does.
    #[tracing::instrument(skip(self, entries), fields(entries = entries.len()))]
    pub async fn record_batch(&self, entries: &[LedgerEntry]) -> Result<BatchCounts, sqlx::Error> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;

        let created_at = Utc::now();
        let mut counts = BatchCounts::default();

        for entry in entries {
            match entry {
                LedgerEntry::Expense(expense) => {
                    insert_expense(&mut tx, expense, created_at).await?;
                    counts.expenses += 1;
                }
                LedgerEntry::Transfer(transfer) => {
                    insert_transfer(&mut tx, transfer, created_at).await?;
                    counts.transfers += 1;
                }
            }
        }

        tx.commit().await?;

        tracing::info!(
            expenses = counts.expenses,
            transfers = counts.transfers,
            "recorded batch"
        );

        Ok(counts)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_expenses(&self) -> Result<Vec<ExpenseRecord>, sqlx::Error> {
        let rows = query_as::<_, ExpenseRecord>(
            "select id, date, booked_on, category, amount, details from expenses order by id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_transfers(&self) -> Result<Vec<TransferRecord>, sqlx::Error> {
        let rows = query_as::<_, TransferRecord>(
            "select id, date, booked_on, amount, details from transfers order by id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

async fn insert_expense(
    conn: &mut SqliteConnection,
    expense: &NewExpense,
    created_at: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    let result = query(
        r#"
        insert into expenses (date, booked_on, category, amount, details, created_at)
        values (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&expense.date)
    .bind(expense.booked_on)
    .bind(&expense.category)
    .bind(expense.amount)
    .bind(&expense.details)
    .bind(created_at)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

async fn insert_transfer(
    conn: &mut SqliteConnection,
    transfer: &NewTransfer,
    created_at: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    let result = query(
        r#"
        insert into transfers (date, booked_on, amount, details, created_at)
        values (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&transfer.date)
    .bind(transfer.booked_on)
    .bind(transfer.amount)
    .bind(&transfer.details)
    .bind(created_at)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}
