/// PostgreSQL plumbing
///
/// - `pool`: connection pool construction, health check and shutdown
/// - `migrations`: embedded schema migrations
///
/// Only [`crate::store::PgStore`] and the binary's startup path touch this
/// module; services go through [`crate::store::Store`].

pub mod migrations;
pub mod pool;
