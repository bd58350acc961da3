//! # forum-service
//!
//! Application layer: services that orchestrate repositories, the cache
//! tier, and notifications, plus the request/response DTOs of the API.

pub mod dto;
pub mod services;

pub use services::{
    AuthService, ChatService, CommentService, CommunityService, CustomFeedService,
    NotificationService, PostService, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult, UserService, VoteService,
};
