use sqlx::Connection;
use tracing::{debug, info, instrument, warn};

use crate::db::{self, Session};
use crate::state::AppState;
use crate::users::{
    dto::{Pagination, UserPage},
    error::StoreError,
    repo_types::User,
};

pub const SEED_USERNAME: &str = "bob";
pub const SEED_EMAIL: &str = "bob@mail.com";
pub const SEED_PASSWORD: &str = "bobpass";

/// Repository over the `users` table, bound to one session.
pub struct UserStore {
    session: Session,
}

impl UserStore {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub async fn open(state: &AppState) -> anyhow::Result<Self> {
        Ok(Self::new(state.session().await?))
    }

    pub fn close(self) {
        self.session.end();
    }

    /// Drops and recreates the schema, then inserts the seed user. Existing data is lost.
    #[instrument(skip(self))]
    pub async fn initialize(&mut self) -> Result<(), StoreError> {
        let mut tx = self.session.conn().begin().await?;
        db::drop_schema(&mut *tx).await?;
        db::create_schema(&mut *tx).await?;
        let seed = User::insert(&mut *tx, SEED_USERNAME, SEED_EMAIL, SEED_PASSWORD).await?;
        tx.commit().await?;
        info!(user_id = seed.id, "schema recreated and seeded");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get(&mut self, username: &str) -> Result<User, StoreError> {
        User::find_by_username(self.session.conn(), username)
            .await?
            .ok_or_else(|| StoreError::NotFound(username.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn list_all(&mut self) -> Result<Vec<User>, StoreError> {
        Ok(User::list_all(self.session.conn()).await?)
    }

    /// Uniqueness of the new email is left to the table constraint; a conflict comes
    /// back as `StoreError::Database`, not `DuplicateKey`.
    #[instrument(skip(self))]
    pub async fn change_email(
        &mut self,
        username: &str,
        new_email: &str,
    ) -> Result<User, StoreError> {
        let Some(mut user) = User::find_by_username(self.session.conn(), username).await? else {
            warn!(%username, "change_email on unknown user");
            return Err(StoreError::NotFound(username.to_string()));
        };
        User::update_email(self.session.conn(), user.id, new_email).await?;
        user.email = new_email.to_string();
        info!(user_id = user.id, "email updated");
        Ok(user)
    }

    /// Inserts a new user inside a transaction. On a username or email collision the
    /// transaction is rolled back and `DuplicateKey` is returned.
    #[instrument(skip(self, password))]
    pub async fn create(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, StoreError> {
        let mut tx = self.session.conn().begin().await?;
        match User::insert(&mut *tx, username, email, password).await {
            Ok(user) => {
                tx.commit().await.map_err(StoreError::from_insert)?;
                info!(user_id = user.id, "user created");
                Ok(user)
            }
            Err(e) => {
                let err = StoreError::from_insert(e);
                tx.rollback().await?;
                warn!(error = %err, "create rolled back");
                Err(err)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn delete(&mut self, username: &str) -> Result<User, StoreError> {
        let Some(user) = User::find_by_username(self.session.conn(), username).await? else {
            warn!(%username, "delete on unknown user");
            return Err(StoreError::NotFound(username.to_string()));
        };
        User::delete_by_id(self.session.conn(), user.id).await?;
        info!(user_id = user.id, "user deleted");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn search(&mut self, query: &str) -> Result<Vec<User>, StoreError> {
        let users = User::search(self.session.conn(), query).await?;
        debug!(matches = users.len(), "search done");
        Ok(users)
    }

    #[instrument(skip(self))]
    pub async fn list_paginated(&mut self, page: Pagination) -> Result<UserPage, StoreError> {
        let total = User::count(self.session.conn()).await?;
        let users =
            User::list_page(self.session.conn(), i64::from(page.limit), i64::from(page.offset))
                .await?;
        Ok(UserPage {
            total,
            limit: page.limit,
            offset: page.offset,
            users,
        })
    }
}
