//! Data transfer objects for API requests and responses
//!
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers from domain entities and engine outcomes to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use mappers::paginate;

pub use requests::{
    CreateCommentRequest, CreateVideoRequest, LoginRequest, LogoutRequest, ReactRequest,
    RefreshTokenRequest, RegisterRequest, UpdateCommentRequest, UpdateUserRequest,
    UpdateVideoRequest,
};

pub use responses::{
    AuthResponse, CommentResponse, CurrentUserResponse, HealthChecks, HealthResponse,
    LikeStatusResponse, PaginatedResponse, PaginationMeta, PublicUserResponse, ReactionResponse,
    ReadinessResponse, TargetResponse, VideoResponse,
};
