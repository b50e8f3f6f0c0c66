//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] for the duration of a
//! request and orchestrates repositories, the reaction engine and event
//! publishing.

pub mod auth;
pub mod comment;
pub mod context;
pub mod error;
pub mod reaction;
pub mod user;
pub mod video;

pub use auth::AuthService;
pub use comment::CommentService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use reaction::ReactionService;
pub use user::UserService;
pub use video::VideoService;
