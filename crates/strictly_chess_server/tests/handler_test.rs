//! Tests for routing connection events through the session handler.

mod common;

use common::RecordingConnection;
use strictly_chess_server::{
    ConnectParams, EndMessage, GameOver, GamesManager, Message, MoveMessage, SessionHandler,
    Winner,
};

fn connected_pair(handler: &SessionHandler) -> (String, std::sync::Arc<RecordingConnection>, std::sync::Arc<RecordingConnection>) {
    let alice = RecordingConnection::new();
    let bob = RecordingConnection::new();
    assert!(handler.on_player_connect("alice".into(), alice.handle(), ConnectParams::default()));
    assert!(handler.on_player_connect("bob".into(), bob.handle(), ConnectParams::default()));
    let game_id = match bob.last() {
        Some(Message::Init(init)) => init.game_id,
        other => panic!("expected init, got {other:?}"),
    };
    alice.take();
    bob.take();
    (game_id, alice, bob)
}

#[test]
fn test_connect_params_from_query_keys() {
    let params: ConnectParams = serde_json::from_value(serde_json::json!({
        "customGameId": "room",
        "isCreator": true
    }))
    .unwrap();
    assert_eq!(params.custom_game_id.as_deref(), Some("room"));
    assert!(params.is_creator);
    assert!(params.rematch_game_id.is_none());

    let bare: ConnectParams = serde_json::from_value(serde_json::json!({})).unwrap();
    assert_eq!(bare, ConnectParams::default());
}

#[test]
fn test_missing_custom_room_reports_and_closes() {
    let handler = SessionHandler::new(GamesManager::default());
    let connection = RecordingConnection::new();
    let params = ConnectParams {
        custom_game_id: Some("room".into()),
        ..ConnectParams::default()
    };

    let keep_open = handler.on_player_connect("bob".into(), connection.handle(), params);

    assert!(!keep_open);
    assert!(connection.is_closed());
    assert!(matches!(
        connection.last(),
        Some(Message::CommunicationError(error)) if error.user_message.contains("doesn't exist")
    ));
}

#[test]
fn test_creator_opens_custom_room() {
    let handler = SessionHandler::new(GamesManager::default());
    let connection = RecordingConnection::new();
    let params = ConnectParams {
        custom_game_id: Some("room".into()),
        is_creator: true,
        ..ConnectParams::default()
    };
    assert!(handler.on_player_connect("alice".into(), connection.handle(), params));
    assert_eq!(handler.manager().active_game_count(), 1);
}

#[test]
fn test_bad_square_keeps_connection_open() {
    let handler = SessionHandler::new(GamesManager::default());
    let (game_id, alice, _bob) = connected_pair(&handler);

    let keep_open = handler.on_player_message(
        "alice",
        &alice.handle(),
        Message::Move(MoveMessage::new("wp5", "e2", "e9", game_id.as_str())),
    );

    assert!(keep_open);
    assert!(!alice.is_closed());
    assert!(matches!(alice.last(), Some(Message::CommunicationError(_))));
}

#[test]
fn test_unknown_game_closes_connection() {
    let handler = SessionHandler::new(GamesManager::default());
    let connection = RecordingConnection::new();

    let keep_open = handler.on_player_message(
        "alice",
        &connection.handle(),
        Message::Move(MoveMessage::new("wp5", "e2", "e4", "missing")),
    );

    assert!(!keep_open);
    assert!(connection.is_closed());
}

#[test]
fn test_end_flags_dispatch_in_order() {
    let handler = SessionHandler::new(GamesManager::default());
    let (game_id, alice, bob) = connected_pair(&handler);

    let offer = EndMessage {
        offer_draw: true,
        ..EndMessage::new(game_id.clone())
    };
    assert!(handler.on_player_message("alice", &alice.handle(), Message::End(offer)));
    assert!(bob.ends().pop().unwrap().offer_draw);

    let decline = EndMessage {
        draw_denied: true,
        ..EndMessage::new(game_id.clone())
    };
    assert!(handler.on_player_message("bob", &bob.handle(), Message::End(decline)));
    assert!(alice.ends().pop().unwrap().draw_denied);

    let leave = EndMessage {
        left_game: true,
        rematch: true,
        ..EndMessage::new(game_id)
    };
    assert!(handler.on_player_message("alice", &alice.handle(), Message::End(leave)));
    assert!(bob.is_closed());
    assert_eq!(handler.manager().active_game_count(), 0);
}

#[test]
fn test_disconnect_routes_to_manager() {
    let handler = SessionHandler::new(GamesManager::default());
    let (_game_id, alice, bob) = connected_pair(&handler);

    handler.on_player_disconnect("bob", &bob.handle());

    assert!(alice.ends().pop().unwrap().left_game);
    assert_eq!(handler.manager().active_game_count(), 0);
}

#[test]
fn test_client_announced_result_is_refused() {
    let handler = SessionHandler::new(GamesManager::default());
    let (game_id, alice, bob) = connected_pair(&handler);

    let forged = Message::End(EndMessage {
        ended: true,
        game_over: Some(GameOver::new(Winner::Black, "Checkmate")),
        ..EndMessage::new(game_id.clone())
    });
    let keep_open = handler.on_player_message("bob", &bob.handle(), forged);

    assert!(!keep_open);
    assert!(alice.messages().is_empty());
    assert!(matches!(bob.last(), Some(Message::CommunicationError(_))));
    let snapshot = handler.manager().game_snapshot(&game_id).unwrap();
    assert!(snapshot.result().is_none());
}
