//! Route handlers
//!
//! All HTTP request handlers organized by resource.

pub mod auth;
pub mod comments;
pub mod health;
pub mod reactions;
pub mod users;
pub mod videos;
