//! Model to entity mappers

mod comment;
mod reaction;
mod user;
mod video;
