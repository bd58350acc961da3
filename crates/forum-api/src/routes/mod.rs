//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::handlers::{
    auth, chats, comments, communities, custom_feeds, health, notifications, posts, users, votes,
};
use crate::state::AppState;

/// API router without the health checks
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (kept apart so they bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(community_routes())
        .merge(post_routes())
        .merge(comment_routes())
        .merge(notification_routes())
        .merge(custom_feed_routes())
        .merge(chat_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/auth/logout", post(auth::logout))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/@me",
            get(users::get_current_user).patch(users::update_current_user),
        )
        .route("/users/@me/password", put(users::change_password))
        .route("/users/search", get(users::search_users))
        .route("/users/:username/profile", get(users::get_profile))
        .route("/users/:username/follow", post(users::toggle_follow))
        .route("/users/:username/followers", get(users::get_followers))
}

fn community_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/communities",
            get(communities::list_popular).post(communities::create_community),
        )
        .route("/communities/search", get(communities::search_communities))
        .route("/communities/joined", get(communities::list_joined))
        .route("/communities/:name", get(communities::get_community))
        .route(
            "/communities/:name/join",
            post(communities::join_community).delete(communities::leave_community),
        )
        .route("/communities/:name/posts", get(communities::list_community_posts))
}

fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(posts::list_posts).post(posts::create_post))
        // Static segment; matched ahead of :post_id
        .route("/posts/saved", get(posts::list_saved))
        .route(
            "/posts/:post_id",
            get(posts::get_post)
                .patch(posts::update_post)
                .delete(posts::delete_post),
        )
        .route("/posts/:post_id/vote", post(votes::vote_post))
        .route("/posts/:post_id/save", post(posts::toggle_save))
        .route(
            "/posts/:post_id/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
}

fn comment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/comments/:comment_id",
            patch(comments::update_comment).delete(comments::delete_comment),
        )
        .route("/comments/:comment_id/vote", post(votes::vote_comment))
}

fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/read-all", post(notifications::mark_all_read))
        .route(
            "/notifications/:notification_id/read",
            post(notifications::mark_read),
        )
        .route(
            "/notifications/:notification_id",
            delete(notifications::delete_notification),
        )
}

fn custom_feed_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/custom-feeds",
            get(custom_feeds::list_own).post(custom_feeds::create_feed),
        )
        .route("/custom-feeds/user/:username", get(custom_feeds::list_public))
        .route(
            "/custom-feeds/:feed_id",
            get(custom_feeds::get_feed)
                .put(custom_feeds::update_feed)
                .delete(custom_feeds::delete_feed),
        )
        .route("/custom-feeds/:feed_id/posts", get(custom_feeds::feed_posts))
        .route(
            "/custom-feeds/:feed_id/favorite",
            put(custom_feeds::toggle_favorite),
        )
        .route(
            "/custom-feeds/:feed_id/communities",
            post(custom_feeds::add_community),
        )
        .route(
            "/custom-feeds/:feed_id/communities/:community_id",
            delete(custom_feeds::remove_community),
        )
}

fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/chats", get(chats::list_chats).post(chats::start_chat))
        // Static segment; matched ahead of :chat_id
        .route("/chats/unread-count", get(chats::unread_count))
        .route(
            "/chats/:chat_id/messages",
            get(chats::list_messages).post(chats::send_message),
        )
        .route("/chats/:chat_id/read", post(chats::mark_read))
        .route(
            "/chats/:chat_id/messages/:message_id",
            delete(chats::delete_message),
        )
}
