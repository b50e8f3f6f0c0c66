//! Domain entities - core business objects

mod comment;
mod reaction;
mod target;
mod user;
mod video;

pub use comment::{Comment, MAX_COMMENT_LENGTH};
pub use reaction::Reaction;
pub use target::Target;
pub use user::User;
pub use video::Video;
