//! HTTP routes.

pub mod documents;
pub mod health;
pub mod publickey;
