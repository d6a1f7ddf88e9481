/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: HS256 session tokens
/// - [`actor`]: the resolved identity threaded through service calls
/// - [`authorization`]: owner/member/author predicates

pub mod actor;
pub mod authorization;
pub mod jwt;
pub mod password;
