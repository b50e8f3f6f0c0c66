//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Running Redis instance
//! - Environment variables: DATABASE_URL, REDIS_URL (JWT_SECRET optional)
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_json, assert_status, check_test_env, fixtures::*, TestServer,
};
use reqwest::StatusCode;

async fn register(server: &TestServer) -> AuthResponse {
    let request = RegisterRequest::unique();
    let response = server.post("/auth/register", &request).await.unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn upload(server: &TestServer, token: &str) -> VideoResponse {
    let response = server
        .post_auth("/videos", token, &CreateVideoRequest::unique())
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn comment_on(server: &TestServer, token: &str, video_id: &str) -> CommentResponse {
    let response = server
        .post_auth(
            &format!("/videos/{video_id}/comments"),
            token,
            &CreateCommentRequest::new("first!"),
        )
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn react(server: &TestServer, token: &str, path: &str) -> ReactionResponse {
    let response = server.post_empty_auth(path, token).await.unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/health").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get("/health/ready").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_register_login_refresh() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    let response = server.post("/auth/register", &request).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(auth.user.username, request.username);
    assert_eq!(auth.token_type, "Bearer");

    let response = server
        .post("/auth/login", &LoginRequest::from_register(&request))
        .await
        .unwrap();
    let login: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(login.user.id, auth.user.id);

    let body = serde_json::json!({ "refresh_token": login.refresh_token });
    let response = server.post("/auth/refresh", &body).await.unwrap();
    let refreshed: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!refreshed.access_token.is_empty());

    // The rotated-out refresh token is single use.
    let response = server.post("/auth/refresh", &body).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_register_duplicate_email() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    server.post("/auth/register", &request).await.unwrap();

    let response = server.post("/auth/register", &request).await.unwrap();
    let error: ErrorBody = assert_json(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(error.code, "EMAIL_ALREADY_EXISTS");
}

#[tokio::test]
async fn test_login_wrong_password() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();
    server.post("/auth/register", &request).await.unwrap();

    let mut login = LoginRequest::from_register(&request);
    login.password = "WrongPass999".to_string();

    let response = server.post("/auth/login", &login).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_current_user_profile() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server).await;

    let response = server.get_auth("/users/@me", &auth.access_token).await.unwrap();
    let me: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(me.id, auth.user.id);
    assert!(me.email.is_some());

    let response = server.get(&format!("/users/{}", auth.user.id)).await.unwrap();
    let public: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(public.email.is_none());
}

// ============================================================================
// Video / Comment Tests
// ============================================================================

#[tokio::test]
async fn test_video_lifecycle() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = register(&server).await;
    let stranger = register(&server).await;
    let video = upload(&server, &owner.access_token).await;
    assert_eq!(video.owner_id, owner.user.id);
    assert_eq!((video.likes, video.dislikes, video.views), (0, 0, 0));

    let response = server.get(&format!("/videos/{}", video.id)).await.unwrap();
    let fetched: VideoResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(fetched.views, 1);

    let patch = serde_json::json!({ "title": "Renamed" });
    let response = server
        .patch_auth(&format!("/videos/{}", video.id), &stranger.access_token, &patch)
        .await
        .unwrap();
    let error: ErrorBody = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(error.code, "NOT_VIDEO_OWNER");

    let response = server
        .patch_auth(&format!("/videos/{}", video.id), &owner.access_token, &patch)
        .await
        .unwrap();
    let updated: VideoResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(updated.title, "Renamed");

    let response = server
        .get(&format!("/users/{}/videos", owner.user.id))
        .await
        .unwrap();
    let page: Page<VideoResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.data.len(), 1);
    assert!(!page.pagination.has_more);
}

#[tokio::test]
async fn test_list_videos_paginates() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = register(&server).await;
    for _ in 0..3 {
        upload(&server, &owner.access_token).await;
    }

    let path = format!("/users/{}/videos?limit=2", owner.user.id);
    let response = server.get(&path).await.unwrap();
    let first: Page<VideoResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(first.data.len(), 2);
    assert!(first.pagination.has_more);
    assert_eq!(first.pagination.limit, 2);

    let cursor = first.pagination.before.expect("older cursor");
    let response = server.get(&format!("{path}&before={cursor}")).await.unwrap();
    let second: Page<VideoResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(second.data.len(), 1);
    assert!(!second.pagination.has_more);
    assert!(first.data.iter().all(|v| v.id != second.data[0].id));

    // Exactly full, and nothing after it
    let response = server
        .get(&format!("/users/{}/videos?limit=3", owner.user.id))
        .await
        .unwrap();
    let whole: Page<VideoResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(whole.data.len(), 3);
    assert!(!whole.pagination.has_more);
}

#[tokio::test]
async fn test_comment_edit_and_moderation() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = register(&server).await;
    let viewer = register(&server).await;
    let video = upload(&server, &owner.access_token).await;
    let comment = comment_on(&server, &viewer.access_token, &video.id).await;
    assert_eq!(comment.author_id, viewer.user.id);

    let edit = serde_json::json!({ "content": "edited" });
    let response = server
        .patch_auth(&format!("/comments/{}", comment.id), &owner.access_token, &edit)
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .patch_auth(&format!("/comments/{}", comment.id), &viewer.access_token, &edit)
        .await
        .unwrap();
    let edited: CommentResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(edited.content, "edited");

    // The video owner may remove comments under their video.
    let response = server
        .delete_auth(&format!("/comments/{}", comment.id), &owner.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get(&format!("/comments/{}", comment.id)).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Engagement Tests
// ============================================================================

#[tokio::test]
async fn test_like_dislike_scenario() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = register(&server).await;
    let viewer = register(&server).await;
    let video = upload(&server, &owner.access_token).await;
    let token = &viewer.access_token;

    let disliked = react(&server, token, &format!("/videos/{}/dislike", video.id)).await;
    assert_eq!((disliked.likes, disliked.dislikes), (0, 1));
    assert_eq!(disliked.status, "dislike");
    assert_eq!(disliked.data["dislikes"], 1);

    let response = server
        .get_auth(&format!("/videos/{}/like-status", video.id), token)
        .await
        .unwrap();
    let status: LikeStatus = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(status, LikeStatus { liked: false, disliked: true });

    let switched = react(&server, token, &format!("/videos/{}/like", video.id)).await;
    assert_eq!((switched.likes, switched.dislikes), (1, 0));
    assert_eq!(switched.message, "Changed dislike to like");

    let removed = react(&server, token, &format!("/videos/{}/like", video.id)).await;
    assert_eq!((removed.likes, removed.dislikes), (0, 0));
    assert_eq!(removed.message, "Like removed");
    assert_eq!(removed.status, "none");
}

#[tokio::test]
async fn test_comment_reactions_via_kind_body() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = register(&server).await;
    let viewer = register(&server).await;
    let video = upload(&server, &owner.access_token).await;
    let comment = comment_on(&server, &owner.access_token, &video.id).await;

    let path = format!("/comments/{}/reactions", comment.id);
    let response = server
        .post_auth(&path, &viewer.access_token, &ReactRequest::new("like"))
        .await
        .unwrap();
    let liked: ReactionResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!((liked.likes, liked.dislikes), (1, 0));
    assert_eq!(liked.data["id"], comment.id.as_str());

    let response = server
        .post_auth(&path, &viewer.access_token, &ReactRequest::new("love"))
        .await
        .unwrap();
    let error: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.code, "INVALID_REACTION_KIND");
    assert!(!error.message.is_empty());

    // Counters are untouched by the rejected request.
    let response = server.get(&format!("/comments/{}", comment.id)).await.unwrap();
    let fetched: CommentResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!((fetched.likes, fetched.dislikes), (1, 0));
}

#[tokio::test]
async fn test_concurrent_likes_from_many_users() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = register(&server).await;
    let video = upload(&server, &owner.access_token).await;

    let mut tokens = Vec::new();
    for _ in 0..10 {
        tokens.push(register(&server).await.access_token);
    }

    let url = server.url(&format!("/videos/{}/like", video.id));
    let handles: Vec<_> = tokens
        .into_iter()
        .map(|token| {
            let request = server.client.post(url.clone()).bearer_auth(token);
            tokio::spawn(async move { request.send().await })
        })
        .collect();
    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert_status(response, StatusCode::OK).await.unwrap();
    }

    let response = server.get(&format!("/videos/{}", video.id)).await.unwrap();
    let fetched: VideoResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!((fetched.likes, fetched.dislikes), (10, 0));
}

#[tokio::test]
async fn test_reaction_errors() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let viewer = register(&server).await;

    let response = server
        .client
        .post(server.url("/videos/1/like"))
        .send()
        .await
        .unwrap();
    let error: ErrorBody = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(error.code, "MISSING_AUTHORIZATION");

    let response = server
        .post_empty_auth("/videos/1/like", &viewer.access_token)
        .await
        .unwrap();
    let error: ErrorBody = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(error.code, "UNKNOWN_TARGET");

    let response = server
        .get_auth("/comments/1/like-status", &viewer.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_delete_video_cascades() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = register(&server).await;
    let viewer = register(&server).await;
    let video = upload(&server, &owner.access_token).await;
    let comment = comment_on(&server, &viewer.access_token, &video.id).await;

    react(&server, &viewer.access_token, &format!("/videos/{}/like", video.id)).await;
    react(&server, &owner.access_token, &format!("/comments/{}/dislike", comment.id)).await;

    let response = server
        .delete_auth(&format!("/videos/{}", video.id), &viewer.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = server
        .delete_auth(&format!("/videos/{}", video.id), &owner.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.get(&format!("/videos/{}", video.id)).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server.get(&format!("/comments/{}", comment.id)).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server
        .post_empty_auth(&format!("/comments/{}/like", comment.id), &viewer.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}
