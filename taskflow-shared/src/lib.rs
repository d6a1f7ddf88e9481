//! # Taskflow Shared Library
//!
//! Domain core of the Taskflow project tracker, used by the API server.
//!
//! ## Module Organization
//!
//! - `models`: users, projects, tasks, comments and their SQL queries
//! - `store`: the persistence seam with PostgreSQL and in-memory backends
//! - `db`: connection pool and embedded migrations
//! - `auth`: passwords, session tokens, the request actor, authorization policy
//! - `services`: credential, project, task and comment operations
//! - `error`: the service error taxonomy

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

/// Current version of the Taskflow shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
