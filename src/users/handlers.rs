use std::io::Write;

use anyhow::Context;
use serde::Serialize;
use tracing::{error, instrument};

use crate::{
    state::AppState,
    users::{
        dto::{Message, Pagination, UserPage},
        error::StoreError,
        repo_types::User,
        services::UserStore,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Writes command results to stdout (or any writer) in the selected format.
pub struct Render<'a> {
    out: &'a mut dyn Write,
    format: OutputFormat,
}

impl<'a> Render<'a> {
    pub fn new(out: &'a mut dyn Write, format: OutputFormat) -> Self {
        Self { out, format }
    }

    fn json<T: Serialize>(&mut self, value: &T) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(&mut *self.out, value).context("encode json output")?;
        writeln!(self.out)?;
        Ok(())
    }

    pub fn message(&mut self, message: impl Into<String>) -> anyhow::Result<()> {
        let message = message.into();
        match self.format {
            OutputFormat::Text => writeln!(self.out, "{message}")?,
            OutputFormat::Json => self.json(&Message { message })?,
        }
        Ok(())
    }

    pub fn user(&mut self, user: &User) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "{user}")?,
            OutputFormat::Json => self.json(user)?,
        }
        Ok(())
    }

    pub fn users(&mut self, users: &[User]) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Text => {
                for user in users {
                    writeln!(self.out, "{user}")?;
                }
            }
            OutputFormat::Json => self.json(&users)?,
        }
        Ok(())
    }

    /// An empty page is a message in text mode but keeps the page shape in JSON.
    pub fn page(&mut self, page: &UserPage) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Text if page.users.is_empty() => writeln!(self.out, "No users found")?,
            OutputFormat::Text => {
                self.users(&page.users)?;
                let first = u64::from(page.offset) + 1;
                let last = u64::from(page.offset) + page.users.len() as u64;
                writeln!(self.out, "Showing {first}-{last} of {} users", page.total)?;
            }
            OutputFormat::Json => self.json(page)?,
        }
        Ok(())
    }
}

/// Anything other than the two expected outcomes ends the command.
fn unhandled(op: &'static str, err: StoreError) -> anyhow::Error {
    error!(error = %err, op, "store operation failed");
    anyhow::Error::new(err).context(op)
}

#[instrument(skip(state, out))]
pub async fn initialize(state: &AppState, out: &mut Render<'_>) -> anyhow::Result<()> {
    let mut store = UserStore::open(state).await?;
    store
        .initialize()
        .await
        .map_err(|e| unhandled("initialize", e))?;
    store.close();
    out.message("Database Initialized")
}

#[instrument(skip(state, out))]
pub async fn get_user(
    state: &AppState,
    out: &mut Render<'_>,
    username: &str,
) -> anyhow::Result<()> {
    let mut store = UserStore::open(state).await?;
    let result = store.get(username).await;
    store.close();
    match result {
        Ok(user) => out.user(&user),
        Err(StoreError::NotFound(_)) => out.message(format!("{username} not found!")),
        Err(e) => Err(unhandled("get_user", e)),
    }
}

#[instrument(skip(state, out))]
pub async fn get_all_users(state: &AppState, out: &mut Render<'_>) -> anyhow::Result<()> {
    let mut store = UserStore::open(state).await?;
    let users = store
        .list_all()
        .await
        .map_err(|e| unhandled("get_all_users", e))?;
    store.close();
    if users.is_empty() {
        return out.message("No users found");
    }
    out.users(&users)
}

#[instrument(skip(state, out))]
pub async fn change_email(
    state: &AppState,
    out: &mut Render<'_>,
    username: &str,
    new_email: &str,
) -> anyhow::Result<()> {
    let mut store = UserStore::open(state).await?;
    let result = store.change_email(username, new_email).await;
    store.close();
    match result {
        Ok(user) => out.message(format!(
            "Updated {}'s email to {}",
            user.username, user.email
        )),
        Err(StoreError::NotFound(_)) => {
            out.message(format!("{username} not found! Unable to update email."))
        }
        Err(e) => Err(unhandled("change_email", e)),
    }
}

#[instrument(skip(state, out, password))]
pub async fn create_user(
    state: &AppState,
    out: &mut Render<'_>,
    username: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<()> {
    let mut store = UserStore::open(state).await?;
    let result = store.create(username, email, password).await;
    store.close();
    match result {
        Ok(user) => out.user(&user),
        Err(StoreError::DuplicateKey) => out.message("Username or email already taken!"),
        Err(e) => Err(unhandled("create_user", e)),
    }
}

#[instrument(skip(state, out))]
pub async fn delete_user(
    state: &AppState,
    out: &mut Render<'_>,
    username: &str,
) -> anyhow::Result<()> {
    let mut store = UserStore::open(state).await?;
    let result = store.delete(username).await;
    store.close();
    match result {
        Ok(_) => out.message(format!("{username} deleted")),
        Err(StoreError::NotFound(_)) => {
            out.message(format!("{username} not found! Unable to delete user."))
        }
        Err(e) => Err(unhandled("delete_user", e)),
    }
}

#[instrument(skip(state, out))]
pub async fn search_user(
    state: &AppState,
    out: &mut Render<'_>,
    query: &str,
) -> anyhow::Result<()> {
    let mut store = UserStore::open(state).await?;
    let users = store
        .search(query)
        .await
        .map_err(|e| unhandled("search_user", e))?;
    store.close();
    if users.is_empty() {
        return out.message(format!(
            "No users found with {query} in username or email"
        ));
    }
    out.users(&users)
}

#[instrument(skip(state, out))]
pub async fn list_users(
    state: &AppState,
    out: &mut Render<'_>,
    page: Pagination,
) -> anyhow::Result<()> {
    let mut store = UserStore::open(state).await?;
    let page = store
        .list_paginated(page)
        .await
        .map_err(|e| unhandled("list_users", e))?;
    store.close();
    out.page(&page)
}
