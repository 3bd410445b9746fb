use std::{str::FromStr, time::Instant};

use anyhow::Context;
use sqlx::{
    pool::PoolConnection,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Sqlite, SqliteConnection, SqlitePool,
};
use tracing::debug;

use crate::config::AppConfig;

const CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id       INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        email    TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL
    )
"#;

const DROP_USERS: &str = "DROP TABLE IF EXISTS users";

pub async fn connect(config: &AppConfig) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.database_url)
        .with_context(|| format!("parse database url {}", config.database_url))?
        .create_if_missing(true);
    let db = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .context("connect to database")?;
    Ok(db)
}

/// Single-connection in-memory pool. Every pooled connection to `:memory:` is its own
/// database, so the one connection must never be recycled.
#[cfg(test)]
pub async fn connect_in_memory() -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
    let db = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .context("open in-memory database")?;
    Ok(db)
}

pub async fn create_schema(conn: &mut SqliteConnection) -> sqlx::Result<()> {
    sqlx::query(CREATE_USERS).execute(&mut *conn).await?;
    Ok(())
}

pub async fn drop_schema(conn: &mut SqliteConnection) -> sqlx::Result<()> {
    sqlx::query(DROP_USERS).execute(&mut *conn).await?;
    Ok(())
}

/// A connection checked out of the pool for the lifetime of one command.
///
/// The connection goes back to the pool when the session is dropped, which covers
/// early returns and `?` propagation as well as [`Session::end`].
pub struct Session {
    conn: PoolConnection<Sqlite>,
    opened_at: Instant,
}

impl Session {
    pub async fn begin(db: &SqlitePool) -> sqlx::Result<Self> {
        let conn = db.acquire().await?;
        debug!("session opened");
        Ok(Self {
            conn,
            opened_at: Instant::now(),
        })
    }

    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut *self.conn
    }

    /// Consumes the guard; dropping it hands the connection back to the pool.
    pub fn end(self) {}
}

impl Drop for Session {
    fn drop(&mut self) {
        debug!(
            elapsed_ms = self.opened_at.elapsed().as_millis() as u64,
            "session released"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn table_exists(conn: &mut SqliteConnection) -> bool {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'users'",
        )
        .fetch_optional(&mut *conn)
        .await
        .expect("query sqlite_master");
        row.is_some()
    }

    #[tokio::test]
    async fn create_and_drop_schema() {
        let db = connect_in_memory().await.expect("pool");
        let mut session = Session::begin(&db).await.expect("session");

        create_schema(session.conn()).await.expect("create");
        assert!(table_exists(session.conn()).await);

        // idempotent
        create_schema(session.conn()).await.expect("create again");

        drop_schema(session.conn()).await.expect("drop");
        assert!(!table_exists(session.conn()).await);
    }

    #[tokio::test]
    async fn ended_session_returns_connection_to_pool() {
        let db = connect_in_memory().await.expect("pool");

        let mut first = Session::begin(&db).await.expect("first session");
        create_schema(first.conn()).await.expect("create");
        first.end();

        // Single-connection pool: this only succeeds if the first session released it,
        // and it must be the same in-memory database.
        let mut second = Session::begin(&db).await.expect("second session");
        assert!(table_exists(second.conn()).await);
    }

    #[tokio::test]
    async fn session_released_on_error_path() {
        let db = connect_in_memory().await.expect("pool");

        async fn failing(db: &SqlitePool) -> sqlx::Result<()> {
            let mut session = Session::begin(db).await?;
            sqlx::query("SELECT * FROM missing_table")
                .execute(session.conn())
                .await?;
            Ok(())
        }

        assert!(failing(&db).await.is_err());
        assert!(Session::begin(&db).await.is_ok());
    }
}
