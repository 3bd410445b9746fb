use crate::config::AppConfig;
use crate::db::{self, Session};
use anyhow::Context;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);
        let db = db::connect(&config).await?;

        let state = Self::from_parts(db, config);
        state.ensure_schema().await?;
        Ok(state)
    }

    pub fn from_parts(db: SqlitePool, config: Arc<AppConfig>) -> Self {
        Self { db, config }
    }

    pub async fn session(&self) -> anyhow::Result<Session> {
        Session::begin(&self.db).await.context("open database session")
    }

    async fn ensure_schema(&self) -> anyhow::Result<()> {
        let mut session = self.session().await?;
        db::create_schema(session.conn())
            .await
            .context("create users table")?;
        session.end();
        Ok(())
    }

    #[cfg(test)]
    pub async fn in_memory() -> Self {
        let db = db::connect_in_memory().await.expect("in-memory pool ok");
        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            max_connections: 1,
        });
        let state = Self::from_parts(db, config);
        state.ensure_schema().await.expect("schema ok");
        state
    }
}
