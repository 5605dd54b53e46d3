use std::{str::FromStr, sync::Arc};

use anyhow::{Context, Result};
use sqlx::{
    SqlitePool, query,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use tokio::sync::Mutex;

use crate::config::Config;

mod aggregates;

mod ledger;
pub use ledger::*;

const SCHEMA: &[&str] = &[
    r#"
    create table if not exists expenses (
        id integer primary key autoincrement,
        date text not null,
        booked_on text,
        category text not null,
        amount real not null,
        details text not null,
        created_at text not null
    )
    "#,
    r#"
    create table if not exists transfers (
        id integer primary key autoincrement,
        date text not null,
        booked_on text,
        amount real not null,
        details text not null,
        created_at text not null
    )
    "#,
    "create index if not exists expenses_booked_on_idx on expenses (booked_on)",
    "create index if not exists expenses_category_idx on expenses (category)",
];

/// The ledger: expenses and transfers, both append only.
#[derive(Clone)]
pub struct Data {
    pool: SqlitePool,
    // sqlite allows one writer, ids and multi row inserts go through here
    write_lock: Arc<Mutex<()>>,
}

impl Data {
    pub async fn new(config: &Config) -> Result<Self> {
        Self::connect(&config.database_url, config.database_max_connections).await
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .context("invalid database url")?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("error connecting to sqlite")?;

        let data = Self {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        };

        data.create_tables()
            .await
            .context("error creating tables")?;

        return Ok(data);
    }

    #[tracing::instrument(skip(self))]
    async fn create_tables(&self) -> Result<(), sqlx::Error> {
        for statement in SCHEMA {
            query(statement).execute(&self.pool).await?;
        }

        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    #[cfg(test)]
    pub async fn in_memory() -> Self {
        // a single connection, every new one would see its own empty database
        Self::connect("sqlite::memory:", 1)
            .await
            .expect("in memory database")
    }
}
