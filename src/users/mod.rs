pub mod dto;
pub mod error;
pub mod handlers;
mod repo;
pub mod repo_types;
pub mod services;
