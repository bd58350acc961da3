//! API Integration Tests
//!
//! These tests need either a running server at `TEST_SERVER_URL`, or
//! `DATABASE_URL`, `REDIS_URL` and `JWT_SECRET` so one can be started
//! in-process. Without either every test returns early.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use std::time::Duration;

use futures::future::join_all;
use integration_tests::{assert_json, assert_status, fixtures::*, TestServer};
use reqwest::StatusCode;
use serde_json::json;

macro_rules! server {
    () => {
        match TestServer::start().await {
            Some(server) => server,
            None => return,
        }
    };
}

async fn register(server: &TestServer) -> AuthResponse {
    let response = server
        .post("/auth/register", None, &RegisterRequest::unique())
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn create_community(server: &TestServer, token: &str) -> CommunityResponse {
    let response = server
        .post("/communities", Some(token), &CreateCommunityRequest::unique())
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn create_post(server: &TestServer, token: &str, community: &str) -> PostResponse {
    let request = CreatePostRequest {
        title: "Integration post".to_string(),
        content: "Body".to_string(),
        community: community.to_string(),
    };
    let response = server.post("/posts", Some(token), &request).await.unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn vote(server: &TestServer, token: &str, path: &str, direction: &VoteRequest) -> VoteResponse {
    let response = server.post(path, Some(token), direction).await.unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

async fn get_post(server: &TestServer, token: Option<&str>, id: &str) -> PostResponse {
    let response = server.get(&format!("/posts/{id}"), token).await.unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

/// Author, community and a fresh post at the 1/0 baseline
async fn seeded_post(server: &TestServer) -> (AuthResponse, PostResponse) {
    let author = register(server).await;
    let community = create_community(server, &author.access_token).await;
    let post = create_post(server, &author.access_token, &community.name).await;
    (author, post)
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = server!();
    let response = server.get_raw("/health").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    let server = server!();
    let response = server.get_raw("/health/ready").await.unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "ready");
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_register_and_duplicate() {
    let server = server!();
    let request = RegisterRequest::unique();

    let response = server.post("/auth/register", None, &request).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(auth.user.username, request.username);
    assert_eq!(auth.user.email, request.email);
    assert_eq!(auth.user.karma, 1);
    assert!(!auth.access_token.is_empty());

    let response = server.post("/auth/register", None, &request).await.unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();
}

#[tokio::test]
async fn test_login_by_username_or_email() {
    let server = server!();
    let request = RegisterRequest::unique();
    server.post("/auth/register", None, &request).await.unwrap();

    for login in [request.username.clone(), request.email.clone()] {
        let body = LoginRequest {
            login,
            password: request.password.clone(),
        };
        let response = server.post("/auth/login", None, &body).await.unwrap();
        let auth: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(auth.user.username, request.username);
    }

    let wrong = LoginRequest {
        login: request.username,
        password: "wrong-password".to_string(),
    };
    let response = server.post("/auth/login", None, &wrong).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_refresh_rotates_and_logout_revokes() {
    let server = server!();
    let auth = register(&server).await;

    let refresh = RefreshTokenRequest {
        refresh_token: auth.refresh_token.clone(),
    };
    let response = server.post("/auth/refresh", None, &refresh).await.unwrap();
    let rotated: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();

    // The presented token is single use
    let response = server.post("/auth/refresh", None, &refresh).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server
        .post(
            "/auth/logout",
            Some(&rotated.access_token),
            &json!({ "refreshToken": rotated.refresh_token }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .post(
            "/auth/refresh",
            None,
            &RefreshTokenRequest {
                refresh_token: rotated.refresh_token,
            },
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_current_user_requires_token() {
    let server = server!();

    let response = server.get("/users/@me", None).await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body.error.code, "MISSING_AUTHORIZATION");

    let auth = register(&server).await;
    let response = server.get("/users/@me", Some(&auth.access_token)).await.unwrap();
    let me: CurrentUser = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(me.id, auth.user.id);
}

// ============================================================================
// Community Tests
// ============================================================================

#[tokio::test]
async fn test_community_membership() {
    let server = server!();
    let creator = register(&server).await;
    let member = register(&server).await;
    let community = create_community(&server, &creator.access_token).await;
    assert_eq!(community.member_count, 1);
    assert_eq!(community.is_joined, Some(true));

    let path = format!("/communities/{}/join", community.name);
    for _ in 0..2 {
        let response = server.post(&path, Some(&member.access_token), &json!({})).await.unwrap();
        let joined: MembershipResponse = assert_json(response, StatusCode::OK).await.unwrap();
        assert!(joined.joined);
        assert_eq!(joined.member_count, 2);
    }

    let response = server.delete(&path, &member.access_token).await.unwrap();
    let left: MembershipResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!left.joined);
    assert_eq!(left.member_count, 1);

    let response = server.delete(&path, &creator.access_token).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Vote Tests
// ============================================================================

#[tokio::test]
async fn test_new_post_starts_at_baseline() {
    let server = server!();
    let (author, post) = seeded_post(&server).await;

    assert_eq!((post.upvotes, post.downvotes), (1, 0));
    assert_eq!(post.vote_count, 1);
    assert_eq!(post.user_vote, None);
    assert_eq!(post.author, author.user.username);
}

#[tokio::test]
async fn test_down_then_up_worked_example() {
    let server = server!();
    let (_, post) = seeded_post(&server).await;
    let voter = register(&server).await;
    let path = format!("/posts/{}/vote", post.id);

    let down = vote(&server, &voter.access_token, &path, &DOWN).await;
    assert_eq!(down.vote_count, 0);
    assert_eq!(down.user_vote.as_deref(), Some("down"));

    let up = vote(&server, &voter.access_token, &path, &UP).await;
    assert_eq!(up.vote_count, 2);
    assert_eq!(up.user_vote.as_deref(), Some("up"));

    let stored = get_post(&server, Some(&voter.access_token), &post.id).await;
    assert_eq!((stored.upvotes, stored.downvotes), (2, 0));
    assert_eq!(stored.user_vote.as_deref(), Some("up"));

    let anonymous = get_post(&server, None, &post.id).await;
    assert_eq!(anonymous.user_vote, None);
}

#[tokio::test]
async fn test_repeat_vote_withdraws() {
    let server = server!();
    let (_, post) = seeded_post(&server).await;
    let voter = register(&server).await;
    let path = format!("/posts/{}/vote", post.id);

    vote(&server, &voter.access_token, &path, &UP).await;
    let again = vote(&server, &voter.access_token, &path, &UP).await;
    assert_eq!(again.vote_count, 1);
    assert_eq!(again.user_vote, None);
}

#[tokio::test]
async fn test_vote_errors() {
    let server = server!();
    let (author, post) = seeded_post(&server).await;
    let path = format!("/posts/{}/vote", post.id);

    let response = server.post(&path, None, &UP).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server
        .post(&path, Some(&author.access_token), &json!({ "direction": "sideways" }))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server
        .post("/posts/1/vote", Some(&author.access_token), &UP)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server
        .post("/comments/1/vote", Some(&author.access_token), &UP)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_concurrent_distinct_voters() {
    const VOTERS: usize = 12;

    let server = server!();
    let (_, post) = seeded_post(&server).await;
    let voters = join_all((0..VOTERS).map(|_| register(&server))).await;
    let path = format!("/posts/{}/vote", post.id);

    let responses = join_all(
        voters
            .iter()
            .map(|voter| server.post(&path, Some(&voter.access_token), &UP)),
    )
    .await;
    for response in responses {
        assert_status(response.unwrap(), StatusCode::OK).await.unwrap();
    }

    let stored = get_post(&server, None, &post.id).await;
    assert_eq!(stored.upvotes, 1 + VOTERS as i32);
    assert_eq!(stored.downvotes, 0);
}

#[tokio::test]
async fn test_concurrent_duplicate_submissions_stay_consistent() {
    let server = server!();
    let (_, post) = seeded_post(&server).await;
    let voter = register(&server).await;
    let path = format!("/posts/{}/vote", post.id);

    join_all((0..7).map(|_| server.post(&path, Some(&voter.access_token), &UP))).await;

    let stored = get_post(&server, Some(&voter.access_token), &post.id).await;
    assert_eq!(stored.downvotes, 0);
    match stored.user_vote.as_deref() {
        Some("up") => assert_eq!(stored.upvotes, 2),
        None => assert_eq!(stored.upvotes, 1),
        other => panic!("unexpected vote state {other:?}"),
    }
}

#[tokio::test]
async fn test_comment_votes_and_replies() {
    let server = server!();
    let (author, post) = seeded_post(&server).await;
    let voter = register(&server).await;

    let comments = format!("/posts/{}/comments", post.id);
    let response = server
        .post(
            &comments,
            Some(&author.access_token),
            &CreateCommentRequest {
                content: "Root".to_string(),
                parent_id: None,
            },
        )
        .await
        .unwrap();
    let root: CommentResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(root.post_id, post.id);
    assert_eq!(root.depth, 0);
    assert_eq!(root.vote_count, 1);

    let response = server
        .post(
            &comments,
            Some(&voter.access_token),
            &CreateCommentRequest {
                content: "Reply".to_string(),
                parent_id: Some(root.id.clone()),
            },
        )
        .await
        .unwrap();
    let reply: CommentResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(reply.depth, 1);
    assert_eq!(reply.parent_id.as_deref(), Some(root.id.as_str()));

    let cast = vote(&server, &voter.access_token, &format!("/comments/{}/vote", root.id), &DOWN).await;
    assert_eq!(cast.vote_count, 0);

    let response = server.get(&comments, Some(&voter.access_token)).await.unwrap();
    let listed: Vec<CommentResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, root.id);
    assert_eq!(listed[0].user_vote.as_deref(), Some("down"));
    assert_eq!(listed[1].user_vote, None);

    let stored = get_post(&server, None, &post.id).await;
    assert_eq!(stored.comment_count, 2);
}

// ============================================================================
// Notification Tests
// ============================================================================

#[tokio::test]
async fn test_upvote_notifies_author() {
    let server = server!();
    let (author, post) = seeded_post(&server).await;
    let voter = register(&server).await;

    vote(&server, &voter.access_token, &format!("/posts/{}/vote", post.id), &UP).await;

    // Delivered after the response
    let mut list = NotificationListResponse {
        notifications: Vec::new(),
        unread_count: 0,
    };
    for _ in 0..30 {
        let response = server.get("/notifications", Some(&author.access_token)).await.unwrap();
        list = assert_json(response, StatusCode::OK).await.unwrap();
        if !list.notifications.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    assert_eq!(list.notifications.len(), 1);
    assert_eq!(list.unread_count, 1);
    let note = &list.notifications[0];
    assert_eq!(note.kind, "upvote");
    assert!(note.message.starts_with(&voter.user.username));
    assert!(!note.read);

    let response = server
        .post("/notifications/read-all", Some(&author.access_token), &json!({}))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get("/notifications", Some(&author.access_token)).await.unwrap();
    let list: NotificationListResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(list.unread_count, 0);
}

// ============================================================================
// Saved Posts / Follows / Custom Feeds
// ============================================================================

#[tokio::test]
async fn test_save_toggle() {
    let server = server!();
    let (_, post) = seeded_post(&server).await;
    let reader = register(&server).await;
    let path = format!("/posts/{}/save", post.id);

    let response = server.post(&path, Some(&reader.access_token), &json!({})).await.unwrap();
    let saved: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(saved["saved"], true);

    let response = server.get("/posts/saved", Some(&reader.access_token)).await.unwrap();
    let listed: Vec<PostResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].saved);

    server.post(&path, Some(&reader.access_token), &json!({})).await.unwrap();
    let stored = get_post(&server, Some(&reader.access_token), &post.id).await;
    assert!(!stored.saved);
}

#[tokio::test]
async fn test_follow_toggle() {
    let server = server!();
    let follower = register(&server).await;
    let target = register(&server).await;
    let path = format!("/users/{}/follow", target.user.username);

    let response = server.post(&path, Some(&follower.access_token), &json!({})).await.unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["following"], true);

    let response = server
        .get(&format!("/users/{}/followers", target.user.username), None)
        .await
        .unwrap();
    let followers: Vec<serde_json::Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(followers.len(), 1);
    assert_eq!(followers[0]["username"], follower.user.username.as_str());

    let response = server.post(&path, Some(&follower.access_token), &json!({})).await.unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["following"], false);

    let own = format!("/users/{}/follow", follower.user.username);
    let response = server.post(&own, Some(&follower.access_token), &json!({})).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_custom_feed_flow() {
    let server = server!();
    let owner = register(&server).await;
    let other = register(&server).await;
    let community = create_community(&server, &owner.access_token).await;
    create_post(&server, &owner.access_token, &community.name).await;

    let response = server
        .post(
            "/custom-feeds",
            Some(&owner.access_token),
            &json!({ "name": "Morning reads", "isPrivate": true }),
        )
        .await
        .unwrap();
    let feed: serde_json::Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    let feed_id = feed["id"].as_str().unwrap().to_string();

    let response = server
        .post(
            &format!("/custom-feeds/{feed_id}/communities"),
            Some(&owner.access_token),
            &json!({ "communityId": community.id }),
        )
        .await
        .unwrap();
    let feed: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(feed["communityCount"], 1);

    let response = server
        .get(&format!("/custom-feeds/{feed_id}/posts"), Some(&owner.access_token))
        .await
        .unwrap();
    let posts: Vec<PostResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(posts.len(), 1);

    let response = server
        .get(&format!("/custom-feeds/{feed_id}"), Some(&other.access_token))
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .post(
            "/custom-feeds",
            Some(&owner.access_token),
            &json!({ "name": "MORNING READS" }),
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();

    let response = server
        .delete(&format!("/custom-feeds/{feed_id}"), &owner.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_chat_flow() {
    let server = server!();
    let amy = register(&server).await;
    let zed = register(&server).await;

    let response = server
        .post("/chats", Some(&amy.access_token), &json!({ "username": zed.user.username }))
        .await
        .unwrap();
    let chat: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    let chat_id = chat["id"].as_str().unwrap().to_string();
    assert_eq!(chat["otherUser"]["username"], zed.user.username.as_str());

    let response = server
        .post("/chats", Some(&zed.access_token), &json!({ "username": amy.user.username }))
        .await
        .unwrap();
    let again: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(again["id"], chat_id.as_str());

    let messages = format!("/chats/{chat_id}/messages");
    for content in ["hello", "are you there"] {
        let response = server
            .post(&messages, Some(&amy.access_token), &json!({ "content": content }))
            .await
            .unwrap();
        assert_status(response, StatusCode::CREATED).await.unwrap();
    }

    let response = server.get("/chats/unread-count", Some(&zed.access_token)).await.unwrap();
    let unread: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(unread["unreadCount"], 2);

    let response = server.get(&messages, Some(&zed.access_token)).await.unwrap();
    let page: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page["messages"][0]["content"], "hello");

    let response = server
        .post(&format!("/chats/{chat_id}/read"), Some(&zed.access_token), &json!({}))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get("/chats/unread-count", Some(&zed.access_token)).await.unwrap();
    let unread: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(unread["unreadCount"], 0);

    let outsider = register(&server).await;
    let response = server.get(&messages, Some(&outsider.access_token)).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .post("/chats", Some(&amy.access_token), &json!({ "username": amy.user.username }))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}
