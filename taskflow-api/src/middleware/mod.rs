/// Request middleware
///
/// - `session`: resolves the bearer token or `token` cookie to an actor

pub mod session;
