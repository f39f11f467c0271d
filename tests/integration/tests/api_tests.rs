//! REST bootstrap endpoint tests
//!
//! Each test starts its own in-process server with in-memory history.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_json, assert_status, unique_user_id, ErrorEnvelope, GuestCreateRequest, GuestSession,
    JoinRoomRequest, RoomView, TestServer,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/health").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["rooms"], 0);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/health").await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

// ============================================================================
// Rooms
// ============================================================================

#[tokio::test]
async fn test_create_room() {
    let server = TestServer::start().await.unwrap();
    let user = unique_user_id();
    let token = server.token_for(&user, "alice");

    let room = server.create_room(&token, "Sprint 9").await.unwrap();

    assert_eq!(room.name, "Sprint 9");
    assert_eq!(room.admin_id, user);
    assert_eq!(room.invite_code.len(), 6);
    assert!(room
        .invite_code
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    assert!(room.has_participant(&user));
    assert!(room.current_story.is_none());
}

#[tokio::test]
async fn test_create_room_requires_auth() {
    let server = TestServer::start().await.unwrap();

    let response = server.post("/rooms", &json!({ "name": "Sprint 9" })).await.unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body.error.code, "MISSING_AUTH");
}

#[tokio::test]
async fn test_create_room_rejects_bad_token() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post_auth("/rooms", "not-a-jwt", &json!({ "name": "Sprint 9" }))
        .await
        .unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body.error.code, "INVALID_TOKEN");
}

#[tokio::test]
async fn test_create_room_validation() {
    let server = TestServer::start().await.unwrap();
    let token = server.token_for(&unique_user_id(), "alice");

    let response = server
        .post_auth("/rooms", &token, &json!({ "name": "" }))
        .await
        .unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "VALIDATION_ERROR");

    let response = server
        .post_auth("/rooms", &token, &json!({ "title": "wrong field" }))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_join_room_by_code() {
    let server = TestServer::start().await.unwrap();
    let alice = unique_user_id();
    let bob = unique_user_id();
    let room = server
        .create_room(&server.token_for(&alice, "alice"), "Sprint 9")
        .await
        .unwrap();

    let bob_token = server.token_for(&bob, "bob");
    let request = JoinRoomRequest {
        invite_code: room.invite_code.to_lowercase(),
    };
    for _ in 0..2 {
        let response = server
            .post_auth("/rooms/join", &bob_token, &request)
            .await
            .unwrap();
        let joined: RoomView = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(joined.id, room.id);
        assert_eq!(joined.participants.iter().filter(|p| p.id == bob).count(), 1);
    }

    let response = server
        .post_auth(
            "/rooms/join",
            &bob_token,
            &JoinRoomRequest {
                invite_code: "ZZZZZ9".to_string(),
            },
        )
        .await
        .unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(body.error.code, "NOT_FOUND");
}

#[tokio::test]
async fn test_get_room_access() {
    let server = TestServer::start().await.unwrap();
    let alice = unique_user_id();
    let alice_token = server.token_for(&alice, "alice");
    let room = server.create_room(&alice_token, "Sprint 9").await.unwrap();

    let path = format!("/rooms/{}", room.id);
    let response = server.get_auth(&path, &alice_token).await.unwrap();
    let fetched: RoomView = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(fetched.invite_code, room.invite_code);

    let outsider = server.token_for(&unique_user_id(), "eve");
    let response = server.get_auth(&path, &outsider).await.unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body.error.code, "PERMISSION_DENIED");

    let response = server.get_auth("/rooms/no-such-room", &alice_token).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server.get(&path).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Guests
// ============================================================================

#[tokio::test]
async fn test_guest_join_and_read_room() {
    let server = TestServer::start().await.unwrap();
    let room = server
        .create_room(&server.token_for(&unique_user_id(), "alice"), "Sprint 9")
        .await
        .unwrap();

    let session = server.guest_join("bob", &room.invite_code).await.unwrap();
    assert_eq!(session.username, "bob");
    assert_eq!(session.room.id, room.id);
    let me = session
        .room
        .participants
        .iter()
        .find(|p| p.id == session.guest_id)
        .unwrap();
    assert!(me.is_guest);
    assert_eq!(me.username, "bob");

    let path = format!("/rooms/{}?guest_id={}", room.id, session.guest_id);
    let response = server.get(&path).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let path = format!("/rooms/{}/completed-stories?guest_id={}", room.id, session.guest_id);
    let response = server.get(&path).await.unwrap();
    let stories: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(stories.is_empty());

    let path = format!("/rooms/{}?guest_id=made-up", room.id);
    let response = server.get(&path).await.unwrap();
    let body: ErrorEnvelope = assert_json(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body.error.code, "UNKNOWN_GUEST");
}

#[tokio::test]
async fn test_guest_join_unknown_code() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post("/guest/join", &json!({ "username": "bob", "room_code": "NOPE00" }))
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_guest_create_room() {
    let server = TestServer::start().await.unwrap();

    let request = GuestCreateRequest {
        username: "carol".to_string(),
        room_name: "Guest room".to_string(),
    };
    let response = server.post("/guest/create", &request).await.unwrap();
    let session: GuestSession = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(session.room.name, "Guest room");
    assert_eq!(session.room.admin_id, session.guest_id);
    assert!(session.room.has_participant(&session.guest_id));

    let response = server.get("/health").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["rooms"], 1);
}
