/// Data model
///
/// Each module holds one entity, its input structs and its PostgreSQL
/// queries. Cross-entity references are plain ids; population into display
/// shapes happens in the services.
///
/// # Models
///
/// - `user`: accounts, display summaries
/// - `project`: projects and their member list
/// - `task`: kanban tasks with status and priority
/// - `comment`: task discussion

pub mod comment;
pub mod project;
pub mod task;
pub mod user;
