//! CLI command implementations.

pub mod hash_password;
pub mod issue_token;
pub mod serve;
