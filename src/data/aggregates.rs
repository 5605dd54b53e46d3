use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use futures::TryStreamExt;
use indexmap::IndexMap;
use sqlx::{query_as, query_scalar};

use super::Data;

/// Month bucket for expenses whose date could not be read.
pub const UNKNOWN_MONTH: &str = "unknown";

impl Data {
    /// Totals per category, in order of each category's first expense.
    #[tracing::instrument(skip(self))]
    pub async fn sum_by_category(&self) -> Result<IndexMap<String, f64>, sqlx::Error> {
        let rows = query_as::<_, (String, f64)>(
            r#"
            select category, sum(amount) as total
            from expenses
            group by category
            order by min(id)
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    /// Totals per category, largest first.
    #[tracing::instrument(skip(self))]
    pub async fn categories_by_total(&self) -> Result<Vec<(String, f64)>, sqlx::Error> {
        let rows = query_as::<_, (String, f64)>(
            r#"
            select category, sum(amount) as total
            from expenses
            group by category
            order by total desc, min(id)
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Totals per day, ascending. Days are ISO dates, rows with an unreadable
    /// date fall back to the raw string from the statement.
    #[tracing::instrument(skip(self))]
    pub async fn sum_by_date(&self) -> Result<IndexMap<String, f64>, sqlx::Error> {
        let rows = query_as::<_, (String, f64)>(
            r#"
            select coalesce(booked_on, date) as day, sum(amount) as total
            from expenses
            group by day
            order by day
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }

    /// Totals per calendar month (`YYYY-MM`), ascending, with undated
    /// expenses last under [`UNKNOWN_MONTH`].
    #[tracing::instrument(skip(self))]
    pub async fn sum_by_month(&self) -> Result<IndexMap<String, f64>, sqlx::Error> {
        let mut rows = query_as::<_, (Option<NaiveDate>, f64)>(
            "select booked_on, sum(amount) from expenses group by booked_on",
        )
        .fetch(&self.pool);

        let mut months: BTreeMap<(i32, u32), f64> = BTreeMap::new();
        let mut unknown: Option<f64> = None;

        while let Some((booked_on, total)) = rows.try_next().await? {
            match booked_on {
                Some(day) => *months.entry((day.year(), day.month())).or_default() += total,
                None => *unknown.get_or_insert(0.0) += total,
            }
        }

        let mut result: IndexMap<String, f64> = months
            .into_iter()
            .map(|((year, month), total)| (format!("{year}-{month:02}"), total))
            .collect();

        if let Some(total) = unknown {
            result.insert(UNKNOWN_MONTH.to_owned(), total);
        }

        Ok(result)
    }

    #[tracing::instrument(skip(self))]
    pub async fn total_expense(&self) -> Result<f64, sqlx::Error> {
        let total = query_scalar::<_, f64>("select coalesce(sum(amount), 0.0) from expenses")
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    /// How many expenses share the exact same details text.
    #[tracing::instrument(skip(self))]
    pub async fn transaction_counts(&self) -> Result<IndexMap<String, i64>, sqlx::Error> {
        let rows = query_as::<_, (String, i64)>(
            "select details, count(*) from expenses group by details order by details",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }
}
