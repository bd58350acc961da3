//! Data transfer objects for API requests and responses

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    AddFeedCommunityRequest, ChangePasswordRequest, CreateCommentRequest, CreateCommunityRequest,
    CreateCustomFeedRequest, CreatePostRequest, LoginRequest, LogoutRequest, Page,
    RefreshTokenRequest, RegisterRequest, SearchQuery, SendMessageRequest, StartChatRequest,
    UpdateCommentRequest, UpdateCustomFeedRequest, UpdatePostRequest, UpdateProfileRequest,
    VoteRequest,
    DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT,
};

pub use responses::{
    AuthResponse, ChatMessageResponse, ChatMessagesResponse, ChatParticipantResponse,
    ChatResponse, CommentResponse, CommunityResponse, CurrentUserResponse, CustomFeedResponse,
    FavoriteResponse, FeedCommunityResponse, FollowResponse, HealthChecks, HealthResponse,
    MembershipResponse, MessageResponse, NotificationListResponse, NotificationResponse,
    PostResponse, ProfileResponse, ProfileUserResponse, ReadinessResponse, SaveResponse,
    UnreadCountResponse, UserResponse, UserSummaryResponse, VoteResponse,
};
