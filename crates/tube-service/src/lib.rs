//! # tube-service
//!
//! Application layer: the reaction engine, services, and DTOs.

pub mod dto;
pub mod engine;
pub mod services;

pub use engine::{ReactionEngine, ReactionOutcome};
pub use services::{ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult};
