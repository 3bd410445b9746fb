//! Command-line surface: one subcommand per user-store operation.

use clap::{Args, Parser, Subcommand};

use crate::users::dto::{Pagination, DEFAULT_LIMIT};

/// Manage the users table.
#[derive(Debug, Parser)]
#[command(name = "userctl", version, about = "Create, inspect and edit user records")]
pub struct Cli {
    /// Database URL; overrides DATABASE_URL.
    #[arg(long, global = true, value_name = "URL")]
    pub database_url: Option<String>,

    /// Print results as JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Drop and recreate the users table, then add the seed user.
    Initialize,

    /// Get user by username
    GetUser { username: String },

    /// Get all users
    GetAllUsers,

    /// Change email by username
    ChangeEmail { username: String, new_email: String },

    /// Create new user
    CreateUser {
        username: String,
        email: String,
        password: String,
    },

    /// Delete user by username
    DeleteUser { username: String },

    /// Search for user by partial match on username or email
    SearchUser {
        /// Partial search for username or email
        query: String,
    },

    /// List users with pagination
    ListUsers(PageArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Args)]
pub struct PageArgs {
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub limit: u32,
    #[arg(long, default_value_t = 0)]
    pub offset: u32,
}

impl From<PageArgs> for Pagination {
    fn from(args: PageArgs) -> Self {
        Self {
            limit: args.limit,
            offset: args.offset,
        }
    }
}
