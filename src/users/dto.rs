use serde::Serialize;

use crate::users::repo_types::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
}
pub const DEFAULT_LIMIT: u32 = 10;

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// One window of users plus the size of the whole table.
#[derive(Debug, Serialize)]
pub struct UserPage {
    pub total: i64,
    pub limit: u32,
    pub offset: u32,
    pub users: Vec<User>,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}
