//! Repository traits (ports)

mod repositories;

pub use repositories::{
    ChatRepository, CommentRepository, CommunityRepository, CustomFeedRepository,
    FollowRepository, NotificationRepository, PostQuery, PostRepository, RepoResult,
    UserRepository, VoteRepository,
};
