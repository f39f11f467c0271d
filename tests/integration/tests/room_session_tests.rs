//! Live room session tests over real WebSockets
//!
//! Run with: cargo test -p integration-tests --test room_session_tests

use std::time::Duration;

use integration_tests::{
    assert_json, handshake_status, unique_user_id, Closed, CompletedStoryView, RoomView,
    TestServer, WsClient,
};
use reqwest::StatusCode;
use serde_json::json;

/// Alice owns a fresh room and bob is a guest in it, both connected
struct Table {
    server: TestServer,
    room: RoomView,
    alice_id: String,
    alice_token: String,
    bob_id: String,
    alice: WsClient,
    bob: WsClient,
}

async fn seat_table(server: TestServer) -> Table {
    let alice_id = unique_user_id();
    let alice_token = server.token_for(&alice_id, "alice");
    let room = server.create_room(&alice_token, "Sprint 9").await.unwrap();
    let guest = server.guest_join("bob", &room.invite_code).await.unwrap();

    let mut alice = WsClient::user(&server.ws_url(), &room.id, &alice_id, &alice_token)
        .await
        .unwrap();
    alice.expect("room_state").await.unwrap();
    alice.expect("user_connected").await.unwrap();

    let mut bob = WsClient::guest(&server.ws_url(), &room.id, &guest.guest_id)
        .await
        .unwrap();
    bob.expect("user_connected").await.unwrap();
    let joined = alice.expect("user_connected").await.unwrap();
    assert_eq!(joined["content"]["user_id"], guest.guest_id.as_str());

    Table {
        server,
        room,
        alice_id,
        alice_token,
        bob_id: guest.guest_id,
        alice,
        bob,
    }
}

/// Alice starts a story and opens voting; returns the story id
async fn open_round(table: &mut Table, title: &str) -> String {
    table
        .alice
        .send("new_story", json!({ "title": title }))
        .await
        .unwrap();
    let story = table.bob.expect("new_story").await.unwrap();
    let story_id = story["content"]["id"].as_str().unwrap().to_string();

    table
        .alice
        .send("start_voting", json!({ "story_id": story_id }))
        .await
        .unwrap();
    table.alice.expect("start_voting").await.unwrap();
    table.bob.expect("start_voting").await.unwrap();
    story_id
}

#[tokio::test]
async fn test_handshake_rejections() {
    let server = TestServer::start().await.unwrap();
    let alice_id = unique_user_id();
    let token = server.token_for(&alice_id, "alice");
    let room = server.create_room(&token, "Sprint 9").await.unwrap();
    let base = server.ws_url();

    let url = format!("{base}/rooms/missing/ws?token={token}");
    assert_eq!(handshake_status(&url).await, Some(404));

    let url = format!("{base}/rooms/{}/ws?token=garbage", room.id);
    assert_eq!(handshake_status(&url).await, Some(401));

    let url = format!("{base}/rooms/{}/ws", room.id);
    assert_eq!(handshake_status(&url).await, Some(401));

    let url = format!("{base}/rooms/{}/guest-ws/never-issued", room.id);
    assert_eq!(handshake_status(&url).await, Some(403));

    // A guest id only opens the room it was issued for
    let other = server.create_room(&token, "Other").await.unwrap();
    let guest = server.guest_join("bob", &other.invite_code).await.unwrap();
    let url = format!("{base}/rooms/{}/guest-ws/{}", room.id, guest.guest_id);
    assert_eq!(handshake_status(&url).await, Some(403));
}

#[tokio::test]
async fn test_join_burst_lists_existing_users() {
    let table = seat_table(TestServer::start().await.unwrap()).await;
    let Table {
        server,
        room,
        alice_id,
        bob_id,
        alice: _alice,
        bob: _bob,
        ..
    } = table;

    let carol_id = unique_user_id();
    let token = server.token_for(&carol_id, "carol");
    let mut carol = WsClient::user(&server.ws_url(), &room.id, &carol_id, &token)
        .await
        .unwrap();

    let state = carol.next_message().await.unwrap();
    assert_eq!(state["message_type"], "room_state");
    assert_eq!(state["content"]["id"], room.id.as_str());

    let mut existing = Vec::new();
    loop {
        let message = carol.next_message().await.unwrap();
        match message["message_type"].as_str() {
            Some("existing_user") => {
                existing.push(message["content"]["user_id"].as_str().unwrap().to_string());
            }
            Some("user_connected") => {
                assert_eq!(message["content"]["user_id"], carol_id.as_str());
                break;
            }
            other => panic!("unexpected frame {other:?}"),
        }
    }
    existing.sort();
    let mut expected = vec![alice_id, bob_id];
    expected.sort();
    assert_eq!(existing, expected);
}

#[tokio::test]
async fn test_full_estimation_round() {
    let mut table = seat_table(TestServer::start().await.unwrap()).await;
    let story_id = open_round(&mut table, "Login flow").await;

    table
        .bob
        .send("vote", json!({ "story_id": story_id, "value": 8 }))
        .await
        .unwrap();
    let vote = table.alice.expect("vote").await.unwrap();
    assert_eq!(vote["user_id"], table.bob_id.as_str());
    assert_eq!(vote["content"]["username"], "bob");

    table
        .alice
        .send("vote", json!({ "story_id": story_id, "value": 8 }))
        .await
        .unwrap();

    for client in [&mut table.alice, &mut table.bob] {
        let results = client.expect("end_voting").await.unwrap();
        assert_eq!(results["user_id"], "system");
        assert_eq!(results["content"]["story_id"], story_id.as_str());
        assert_eq!(results["content"]["final_score"], 8);
        assert_eq!(results["content"]["votes"].as_array().unwrap().len(), 2);
    }

    table
        .alice
        .send(
            "save_final_score",
            json!({ "story": { "id": story_id, "title": "Login flow", "final_score": 8 } }),
        )
        .await
        .unwrap();
    table.bob.expect("save_final_score").await.unwrap();
    let completed = table.bob.expect("completed_story").await.unwrap();
    assert_eq!(completed["content"]["final_score"], 8);
    assert_eq!(completed["content"]["title"], "Login flow");

    let path = format!("/rooms/{}/completed-stories", table.room.id);
    let response = table
        .server
        .get_auth(&path, &table.alice_token)
        .await
        .unwrap();
    let stories: Vec<CompletedStoryView> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(stories.len(), 1);
    assert_eq!(stories[0].story_id, story_id);
    assert_eq!(stories[0].final_score, 8);

    let path = format!("/rooms/{}", table.room.id);
    let response = table
        .server
        .get_auth(&path, &table.alice_token)
        .await
        .unwrap();
    let room: RoomView = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(room.current_story.is_none());
    assert_eq!(room.completed_stories.len(), 1);
}

#[tokio::test]
async fn test_rejections_answer_only_the_sender() {
    let mut table = seat_table(TestServer::start().await.unwrap()).await;

    table
        .bob
        .send("new_story", json!({ "title": "Not yours" }))
        .await
        .unwrap();
    let error = table.bob.expect("error").await.unwrap();
    assert_eq!(error["content"]["code"], "PERMISSION_DENIED");
    assert_eq!(error["content"]["in_reply_to"], "new_story");

    // Noise that is dropped without any reply
    table.bob.send_raw("{not json".to_string()).await.unwrap();
    table.bob.send_binary(vec![1, 2, 3]).await.unwrap();
    table.bob.send("dance", json!({})).await.unwrap();

    table
        .alice
        .send("vote", json!({ "story_id": "nope", "value": 8 }))
        .await
        .unwrap();
    let error = table.alice.expect("error").await.unwrap();
    assert_eq!(error["content"]["code"], "NOT_FOUND");

    let seen_by_alice = table.alice.collect_for(Duration::from_millis(200)).await;
    assert!(seen_by_alice.is_empty(), "unexpected frames: {seen_by_alice:?}");
    let seen_by_bob = table.bob.collect_for(Duration::from_millis(200)).await;
    assert!(seen_by_bob.is_empty(), "unexpected frames: {seen_by_bob:?}");

    // The connection survived all of it
    let story_id = open_round(&mut table, "Still here").await;
    assert!(!story_id.is_empty());
}

#[tokio::test]
async fn test_disconnect_completes_round() {
    let mut table = seat_table(TestServer::start().await.unwrap()).await;

    let carol_id = unique_user_id();
    let token = table.server.token_for(&carol_id, "carol");
    let carol = WsClient::user(&table.server.ws_url(), &table.room.id, &carol_id, &token)
        .await
        .unwrap();
    table.alice.expect("user_connected").await.unwrap();

    let story_id = open_round(&mut table, "Checkout").await;
    table
        .alice
        .send("vote", json!({ "story_id": story_id, "value": 5 }))
        .await
        .unwrap();
    table
        .bob
        .send("vote", json!({ "story_id": story_id, "value": 5 }))
        .await
        .unwrap();
    table.alice.expect("vote").await.unwrap();
    table.alice.expect("vote").await.unwrap();

    carol.close().await.unwrap();

    let gone = table.alice.expect("user_disconnected").await.unwrap();
    assert_eq!(gone["content"]["user_id"], carol_id.as_str());
    let results = table.alice.expect("end_voting").await.unwrap();
    assert_eq!(results["user_id"], "system");
    assert_eq!(results["content"]["final_score"], 5);
}

#[tokio::test]
async fn test_reconnect_churn_keeps_room_consistent() {
    let mut table = seat_table(TestServer::start().await.unwrap()).await;
    let story_id = open_round(&mut table, "Search").await;

    table
        .bob
        .send("vote", json!({ "story_id": story_id, "value": 3 }))
        .await
        .unwrap();
    table.alice.expect("vote").await.unwrap();

    // A second tab comes and goes without announcing a departure
    let second_tab = WsClient::user(
        &table.server.ws_url(),
        &table.room.id,
        &table.alice_id,
        &table.alice_token,
    )
    .await
    .unwrap();
    table.bob.expect("user_connected").await.unwrap();
    second_tab.close().await.unwrap();

    for _ in 0..3 {
        let reconnect = WsClient::user(
            &table.server.ws_url(),
            &table.room.id,
            &table.alice_id,
            &table.alice_token,
        )
        .await
        .unwrap();
        reconnect.close().await.unwrap();
    }

    let frames = table.bob.collect_for(Duration::from_millis(300)).await;
    assert!(frames.iter().all(|f| f["message_type"] != "user_disconnected"));

    let path = format!("/rooms/{}", table.room.id);
    let response = table
        .server
        .get_auth(&path, &table.alice_token)
        .await
        .unwrap();
    let room: RoomView = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(room.participants.len(), 2);
    let story = room.current_story.unwrap();
    assert_eq!(story["state"], "voting_open");
    assert_eq!(story["votes"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_reaction_relay() {
    let mut table = seat_table(TestServer::start().await.unwrap()).await;

    table
        .bob
        .send(
            "emoji_reaction",
            json!({ "emoji": "👏", "fromUserId": "someone-else", "toUserId": table.alice_id }),
        )
        .await
        .unwrap();

    let reaction = table.alice.expect("emoji_reaction").await.unwrap();
    assert_eq!(reaction["content"]["emoji"], "👏");
    assert_eq!(reaction["content"]["fromUserId"], table.bob_id.as_str());
    assert!(reaction["content"]["timestamp"].as_i64().unwrap() > 0);

    let echoed = table.bob.collect_for(Duration::from_millis(200)).await;
    assert!(echoed.is_empty());
}

#[tokio::test]
async fn test_idle_connection_times_out() {
    let server = TestServer::start_with(&[
        ("WS_HEARTBEAT_INTERVAL_MS", "50"),
        ("WS_HEARTBEAT_TIMEOUT_MS", "150"),
    ])
    .await
    .unwrap();
    let alice_id = unique_user_id();
    let token = server.token_for(&alice_id, "alice");
    let room = server.create_room(&token, "Sprint 9").await.unwrap();
    let guest = server.guest_join("bob", &room.invite_code).await.unwrap();

    // Alice never reads, so she never answers the server's pings
    let mut alice = WsClient::user(&server.ws_url(), &room.id, &alice_id, &token)
        .await
        .unwrap();

    // Bob keeps reading, which answers pings and keeps him alive
    let mut bob = WsClient::guest(&server.ws_url(), &room.id, &guest.guest_id)
        .await
        .unwrap();
    let gone = bob.expect("user_disconnected").await.unwrap();
    assert_eq!(gone["content"]["user_id"], alice_id.as_str());

    // Bob is still registered
    let frames = bob.collect_for(Duration::from_millis(400)).await;
    assert!(frames.iter().all(|f| f["message_type"] != "user_disconnected"));

    // Alice's socket is gone; her pong replies may race the close frame,
    // so only the end of the stream is checked
    let closed = alice.expect_close(Duration::from_secs(3)).await.unwrap();
    assert!(matches!(closed, Closed::Code(4009) | Closed::NoCode));
}

#[tokio::test]
async fn test_history_outlives_idle_room() {
    let server = TestServer::start_with(&[
        ("ROOM_IDLE_TTL_MS", "500"),
        ("ROOM_SWEEP_INTERVAL_MS", "50"),
    ])
    .await
    .unwrap();
    let mut table = seat_table(server).await;
    let story_id = open_round(&mut table, "Archive").await;

    for client in [&mut table.alice, &mut table.bob] {
        client
            .send("vote", json!({ "story_id": story_id, "value": 13 }))
            .await
            .unwrap();
    }
    table.alice.expect("end_voting").await.unwrap();
    table
        .alice
        .send(
            "save_final_score",
            json!({ "story": { "id": story_id, "final_score": 13 } }),
        )
        .await
        .unwrap();
    table.alice.expect("completed_story").await.unwrap();

    // Connected rooms are never evicted, however long they live
    tokio::time::sleep(Duration::from_millis(700)).await;
    let room_path = format!("/rooms/{}", table.room.id);
    let response = table
        .server
        .get_auth(&room_path, &table.alice_token)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    table.alice.close().await.unwrap();
    table.bob.close().await.unwrap();

    let mut status = StatusCode::OK;
    for _ in 0..100 {
        status = table
            .server
            .get_auth(&room_path, &table.alice_token)
            .await
            .unwrap()
            .status();
        if status == StatusCode::NOT_FOUND {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert_eq!(status, StatusCode::NOT_FOUND);

    let history_path = format!("/rooms/{}/completed-stories", table.room.id);
    let response = table
        .server
        .get_auth(&history_path, &table.alice_token)
        .await
        .unwrap();
    let stories: Vec<CompletedStoryView> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(stories.len(), 1);
    assert_eq!(stories[0].story_id, story_id);
    assert_eq!(stories[0].final_score, 13);

    // The guest id went away with the room
    let response = table
        .server
        .get(&format!("{history_path}?guest_id={}", table.bob_id))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let url = format!(
        "{}/rooms/{}/guest-ws/{}",
        table.server.ws_url(),
        table.room.id,
        table.bob_id
    );
    assert_eq!(handshake_status(&url).await, Some(404));
}
