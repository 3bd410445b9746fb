use std::io::Write;

use clap::Parser;

mod app;
mod cli;
mod config;
mod db;
mod state;
mod users;

use crate::{
    cli::Cli,
    config::AppConfig,
    state::AppState,
    users::handlers::{OutputFormat, Render},
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "userctl=warn,sqlx=warn".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    // stdout carries command output, so logs go to stderr
    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();
    let config = AppConfig::from_env()?.with_database_url(cli.database_url);
    let app_state = AppState::init(config).await?;
    tracing::debug!(database_url = %app_state.config.database_url, "database ready");

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let mut stdout = std::io::stdout();
    let result = app::run(&app_state, cli.command, &mut Render::new(&mut stdout, format)).await;
    stdout.flush()?;

    app_state.db.close().await;
    result
}
