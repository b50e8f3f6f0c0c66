//! Database models - SQLx-compatible structs for PostgreSQL tables

mod comment;
mod reaction;
mod user;
mod video;

pub use comment::CommentModel;
pub use reaction::{CountersModel, ReactionModel};
pub use user::{CredentialsModel, UserModel};
pub use video::VideoModel;
