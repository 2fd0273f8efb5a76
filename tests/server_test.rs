//! Tests for the HTTP routes, driven in-process.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use strictly_ludo::{ActionResponse, GameSession, GameStatus, RoomRegistry, router};
use tower::ServiceExt;

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("router failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body failed")
        .to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn post(app: &Router, room: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(format!("/api/game/{}", room))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    call(app, request).await
}

async fn get(app: &Router, path: &str) -> (StatusCode, Value) {
    let request = Request::get(path).body(Body::empty()).expect("request");
    call(app, request).await
}

async fn two_player_room(app: &Router, room: &str) {
    let (status, _) = post(
        app,
        room,
        json!({"action": "join", "playerName": "Alice", "playerColor": "red"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = post(
        app,
        room,
        json!({"action": "join", "playerName": "Bob", "playerColor": "blue"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_room_is_404() {
    let app = router(RoomRegistry::new());
    let (status, body) = get(&app, "/api/game/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Room missing not found");
}

#[tokio::test]
async fn test_join_returns_player_and_state() {
    let app = router(RoomRegistry::new());
    let (status, body) = post(
        &app,
        "r1",
        json!({"action": "join", "playerName": "Alice", "playerColor": "red"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let response: ActionResponse = serde_json::from_value(body.clone()).unwrap();
    assert!(response.success);
    let player_id = response.player_id.unwrap();
    assert_eq!(response.game_state.players()[0].id(), &player_id);
    assert_eq!(body["gameState"]["status"], "waiting");
    assert_eq!(body["gameState"]["diceValue"], 0);
    assert_eq!(body["gameState"]["players"][0]["pieces"][0]["position"], "home");
    assert_eq!(
        body["gameState"]["players"][0]["pieces"][0]["id"],
        format!("{}-red-0", player_id)
    );

    let (status, state) = get(&app, "/api/game/r1").await;
    assert_eq!(status, StatusCode::OK);
    let session: GameSession = serde_json::from_value(state).unwrap();
    assert_eq!(session.players().len(), 1);
}

#[tokio::test]
async fn test_join_errors_are_400() {
    let app = router(RoomRegistry::new());
    two_player_room(&app, "r2").await;

    let (status, body) = post(
        &app,
        "r2",
        json!({"action": "join", "playerName": "Eve", "playerColor": "red"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Color red is already taken");

    let (status, _) = post(&app, "r2", json!({"action": "join", "playerColor": "green"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_start_and_roll() {
    let app = router(RoomRegistry::new());

    let (status, _) = post(&app, "r3", json!({"action": "start"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = post(&app, "r3", json!({"action": "roll_dice"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    two_player_room(&app, "r3").await;
    let (status, body) = post(&app, "r3", json!({"action": "start"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["gameState"]["status"], "playing");
    assert_eq!(body["gameState"]["players"][0]["isActive"], true);

    let (status, body) = post(
        &app,
        "r3",
        json!({"action": "roll_dice", "playerColor": "red"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let response: ActionResponse = serde_json::from_value(body).unwrap();
    let value = response.dice_value.unwrap().get();
    assert!((1..=6).contains(&value));
    // All pieces are home, so only a six keeps the turn.
    assert_eq!(response.turn_passed, Some(value != 6));
    assert_eq!(*response.game_state.status(), GameStatus::Playing);
}

#[tokio::test]
async fn test_move_piece_errors() {
    let app = router(RoomRegistry::new());
    two_player_room(&app, "r4").await;

    let (status, _) = post(
        &app,
        "r4",
        json!({"action": "move_piece", "pieceId": "x", "diceValue": 6}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "not playing yet");

    post(&app, "r4", json!({"action": "start"})).await;
    let (status, _) = post(
        &app,
        "r4",
        json!({"action": "move_piece", "pieceId": "x", "diceValue": 6}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, state) = get(&app, "/api/game/r4").await;
    let piece_id = state["players"][0]["pieces"][0]["id"].as_str().unwrap().to_string();
    let (status, body) = post(
        &app,
        "r4",
        json!({"action": "move_piece", "pieceId": piece_id, "diceValue": 3}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid move"));

    let (_, after) = get(&app, "/api/game/r4").await;
    assert_eq!(after, state);
}

#[tokio::test]
async fn test_unrecognized_action_is_400() {
    let app = router(RoomRegistry::new());
    let (status, body) = post(&app, "r5", json!({"action": "leave_room"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unrecognized action 'leave_room'");

    let (status, rooms) = get(&app, "/api/game").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rooms, json!([]));
}

#[tokio::test]
async fn test_list_rooms() {
    let app = router(RoomRegistry::new());
    two_player_room(&app, "b").await;
    two_player_room(&app, "a").await;
    let (_, rooms) = get(&app, "/api/game").await;
    assert_eq!(rooms, json!(["a", "b"]));
}

#[tokio::test]
async fn test_malformed_bodies_are_400_with_error_body() {
    let app = router(RoomRegistry::new());
    two_player_room(&app, "r6").await;
    post(&app, "r6", json!({"action": "start"})).await;
    let (_, before) = get(&app, "/api/game/r6").await;

    let (status, body) = post(&app, "r6", json!({"playerName": "Eve"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unrecognized action ''");

    let (status, body) = post(
        &app,
        "r6",
        json!({"action": "move_piece", "pieceId": "x", "diceValue": -1}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid move"));

    let (status, body) = post(
        &app,
        "r6",
        json!({"action": "roll_dice", "playerColor": "purple"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid color purple");

    let request = Request::post("/api/game/r6")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let (status, body) = call(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Malformed request"));

    let (_, after) = get(&app, "/api/game/r6").await;
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_malformed_body_does_not_create_room() {
    let app = router(RoomRegistry::new());
    let (status, _) = post(&app, "ghost", json!({"action": "join", "playerColor": 7})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = get(&app, "/api/game/ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
