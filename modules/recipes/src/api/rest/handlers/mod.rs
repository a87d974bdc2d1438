//! HTTP handlers. Each resource handler receives the caller through
//! [`CurrentUser`](crate::api::rest::auth::CurrentUser) and scopes every
//! service call to that user.

pub mod ingredients;
pub mod recipes;
pub mod tags;
pub mod users;

