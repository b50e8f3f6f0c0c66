//! Repository implementations
//!
//! PostgreSQL implementations of the repository and engagement traits
//! defined in tube-core.

mod comment;
mod engagement;
mod error;
mod user;
mod video;

pub use comment::PgCommentRepository;
pub use engagement::{PgEngagementStore, PgEngagementUnit, PgTargetResolver};
pub use user::PgUserRepository;
pub use video::PgVideoRepository;
