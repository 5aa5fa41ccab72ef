//! Accounts and roles for the management API.

pub mod roles;
pub mod users;
