//! Request identity
//!
//! Resolves which user's plans and logs a request operates on.

mod middleware;

pub use middleware::{CurrentUser, RequiredUser, USER_ID_HEADER};
