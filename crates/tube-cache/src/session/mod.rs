//! Refresh session storage.

mod refresh_token;

pub use refresh_token::{RefreshSession, RefreshSessionStore};
