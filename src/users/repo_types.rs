use std::fmt;

use serde::Serialize;
use sqlx::FromRow;

/// User record in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct User {
    pub id: i64,          // assigned on insert, never reused
    pub username: String, // unique
    pub email: String,    // unique
    pub password: String, // stored as given
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "id={} username='{}' email='{}' password='{}'",
            self.id, self.username, self.email, self.password
        )
    }
}
