//! WebSocket message dispatch
//!
//! Entry point for inbound actions and disconnects. Handlers resolve the
//! sender's room, run one Game operation under the room lock and deliver the
//! resulting envelopes before releasing it, so every player sees a room's
//! messages in the order its actions ran. Errors go back to the sender only.

use std::sync::Arc;

use crate::broadcast::Envelope;
use crate::error::{GameError, GameResult};
use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::game::Progress;
use crate::state::{normalize_code, AppState, SharedGame};
use crate::types::{GamePhase, RoomCode};

use super::{lobby, round};

/// Handle a client message, deliver the outcome and return what was sent
pub async fn handle_message(
    msg: ClientMessage,
    conn_id: &str,
    state: &Arc<AppState>,
) -> Vec<Envelope> {
    let action = msg.action();
    let result = match msg {
        ClientMessage::CreateRoom {
            name,
            mode,
            category,
            rounds,
            timer,
        } => lobby::handle_create_room(state, conn_id, name, mode, category, rounds, timer).await,

        ClientMessage::JoinRoom { room_code, name } => {
            lobby::handle_join_room(state, conn_id, room_code, name).await
        }

        ClientMessage::StartGame { room_code } => {
            lobby::handle_start_game(state, conn_id, room_code).await
        }

        ClientMessage::NextRound { room_code } => {
            lobby::handle_next_round(state, conn_id, room_code).await
        }

        ClientMessage::RerollTemplate { room_code } => {
            round::handle_reroll_template(state, conn_id, room_code).await
        }

        ClientMessage::SubmitMeme {
            room_code,
            caption,
            text1,
            text2,
        } => round::handle_submit_meme(state, conn_id, room_code, caption, text1, text2).await,

        ClientMessage::SubmitVote { room_code, value } => {
            round::handle_submit_vote(state, conn_id, room_code, value).await
        }
    };

    match result {
        Ok(envelopes) => envelopes,
        Err(e) => {
            tracing::warn!("{} from {} rejected: {}", action, conn_id, e);
            deliver(state, vec![Envelope::to(conn_id, ServerMessage::from(&e))]).await
        }
    }
}

/// Push envelopes to their recipients. Callers still hold the room lock.
pub(super) async fn deliver(state: &AppState, envelopes: Vec<Envelope>) -> Vec<Envelope> {
    state.gateway.deliver(&envelopes).await;
    envelopes
}

/// Look up the room an action names and check the sender belongs to it
pub(super) async fn resolve_room(
    state: &Arc<AppState>,
    conn_id: &str,
    room_code: &str,
) -> GameResult<(RoomCode, SharedGame)> {
    let code = normalize_code(room_code);
    let game = state.registry.get_room(&code).await?;
    if state.gateway.room_of(conn_id).await.as_deref() != Some(code.as_str()) {
        return Err(GameError::NotInRoom);
    }
    Ok((code, game))
}

/// Remove a closed connection's player, tell the rest of the room and return
/// what was sent
pub async fn handle_disconnect(conn_id: &str, state: &Arc<AppState>) -> Vec<Envelope> {
    let Some(code) = state.gateway.unregister(conn_id).await else {
        return Vec::new();
    };
    let Ok(shared) = state.registry.get_room(&code).await else {
        return Vec::new();
    };

    let mut game = shared.lock().await;
    let Some(departure) = game.remove_player(conn_id) else {
        return Vec::new();
    };

    if departure.room_empty {
        drop(game);
        state.registry.destroy_if_empty(&code).await;
        return Vec::new();
    }

    let recipients = game.player_ids();
    let mut envelopes = vec![Envelope::to_all(
        recipients.clone(),
        ServerMessage::PlayerLeft {
            player_id: departure.player.id.clone(),
            name: departure.player.name.clone(),
            players: game.players_info(),
        },
    )];

    if let Some(host_id) = departure.new_host {
        envelopes.push(Envelope::to_all(
            recipients.clone(),
            ServerMessage::HostChanged { host_id },
        ));
    }

    let progressed = match departure.progress {
        Progress::SubmissionsComplete => round::begin_voting(&mut game),
        Progress::MemeComplete => round::advance_voting(&mut game),
        Progress::MemeSkipped => round::show_current_or_finish(&mut game),
        Progress::None => Ok(counts_after_departure(&game)),
    };
    match progressed {
        Ok(more) => envelopes.extend(more),
        Err(e) => tracing::error!("Room {}: progression after departure failed: {}", code, e),
    }

    deliver(state, envelopes).await
}

/// Refresh waiting counters, whose totals just shrank
fn counts_after_departure(game: &crate::state::Game) -> Vec<Envelope> {
    let total = game.players().len();
    let message = match game.phase() {
        GamePhase::Creating => ServerMessage::PlayerReadyCount {
            count: game.ready_count(),
            total,
        },
        GamePhase::Voting => ServerMessage::PlayerVotedCount {
            count: game.acted_count(),
            total,
        },
        _ => return Vec::new(),
    };
    vec![Envelope::to_all(game.player_ids(), message)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::messages_for;
    use crate::state::game::tests::provider;

    fn state() -> Arc<AppState> {
        Arc::new(AppState::with_seed(provider(), 5))
    }

    async fn create(state: &Arc<AppState>, conn: &str) -> RoomCode {
        let out = handle_message(
            ClientMessage::CreateRoom {
                name: conn.to_string(),
                mode: None,
                category: None,
                rounds: Some(2),
                timer: None,
            },
            conn,
            state,
        )
        .await;
        match &out[0].message {
            ServerMessage::RoomCreated { room_code, .. } => room_code.clone(),
            other => panic!("Expected RoomCreated, got {:?}", other),
        }
    }

    async fn join(state: &Arc<AppState>, conn: &str, code: &str) -> Vec<Envelope> {
        handle_message(
            ClientMessage::JoinRoom {
                room_code: code.to_lowercase(),
                name: conn.to_string(),
            },
            conn,
            state,
        )
        .await
    }

    fn error_code(envelopes: &[Envelope]) -> Option<String> {
        envelopes.iter().find_map(|e| match &e.message {
            ServerMessage::Error { code, .. } => Some(code.clone()),
            _ => None,
        })
    }

    #[tokio::test]
    async fn test_unknown_room_is_reported_to_sender() {
        let state = state();
        let out = join(&state, "c1", "QQQQ").await;
        assert_eq!(out.len(), 1);
        assert!(out[0].is_for("c1"));
        assert_eq!(error_code(&out).as_deref(), Some("ROOM_NOT_FOUND"));
    }

    #[tokio::test]
    async fn test_join_notifies_others() {
        let state = state();
        let code = create(&state, "host").await;
        let out = join(&state, "guest", &code).await;

        let guest = messages_for(&out, "guest");
        assert!(matches!(guest[0], ServerMessage::RoomJoined { is_host: false, .. }));
        let host = messages_for(&out, "host");
        assert!(matches!(host[0], ServerMessage::PlayerJoined { .. }));
        assert_eq!(host.len(), 1);
    }

    #[tokio::test]
    async fn test_cannot_join_twice() {
        let state = state();
        let code = create(&state, "host").await;
        let out = join(&state, "host", &code).await;
        assert_eq!(error_code(&out).as_deref(), Some("ALREADY_IN_ROOM"));
    }

    #[tokio::test]
    async fn test_start_requires_host_and_players() {
        let state = state();
        let code = create(&state, "host").await;

        let out = handle_message(
            ClientMessage::StartGame {
                room_code: code.clone(),
            },
            "host",
            &state,
        )
        .await;
        assert_eq!(error_code(&out).as_deref(), Some("INSUFFICIENT_PLAYERS"));

        join(&state, "guest", &code).await;
        let out = handle_message(
            ClientMessage::StartGame {
                room_code: code.clone(),
            },
            "guest",
            &state,
        )
        .await;
        assert_eq!(error_code(&out).as_deref(), Some("NOT_HOST"));
    }

    #[tokio::test]
    async fn test_action_for_foreign_room_rejected() {
        let state = state();
        let first = create(&state, "a").await;
        let _second = create(&state, "b").await;

        let out = handle_message(
            ClientMessage::RerollTemplate { room_code: first },
            "b",
            &state,
        )
        .await;
        assert_eq!(error_code(&out).as_deref(), Some("NOT_IN_ROOM"));
    }

    #[tokio::test]
    async fn test_disconnect_of_last_player_destroys_room() {
        let state = state();
        let code = create(&state, "host").await;
        assert_eq!(state.registry.room_count().await, 1);

        let out = handle_disconnect("host", &state).await;
        assert!(out.is_empty());
        assert!(state.registry.get_room(&code).await.is_err());
        assert_eq!(state.registry.room_count().await, 0);
    }

    #[tokio::test]
    async fn test_lone_player_after_results_returns_to_lobby() {
        let state = state();
        let code = create(&state, "host").await;
        join(&state, "b", &code).await;
        let room = || code.clone();

        handle_message(ClientMessage::StartGame { room_code: room() }, "host", &state).await;
        for conn in ["host", "b"] {
            let msg = ClientMessage::SubmitMeme {
                room_code: room(),
                caption: format!("{} caption", conn),
                text1: String::new(),
                text2: String::new(),
            };
            handle_message(msg, conn, &state).await;
        }
        for _ in 0..2 {
            for conn in ["host", "b"] {
                let msg = ClientMessage::SubmitVote {
                    room_code: room(),
                    value: 1,
                };
                handle_message(msg, conn, &state).await;
            }
        }
        let summary = state.registry.room_summary(&code).await.unwrap();
        assert_eq!(summary.phase, GamePhase::Results);
        assert_eq!(summary.round, 1);

        handle_disconnect("b", &state).await;
        let out = handle_message(ClientMessage::NextRound { room_code: room() }, "host", &state).await;
        let to_host = messages_for(&out, "host");
        assert!(matches!(
            to_host.as_slice(),
            [ServerMessage::BackToLobby { .. }]
        ));
        let summary = state.registry.room_summary(&code).await.unwrap();
        assert_eq!(summary.phase, GamePhase::Lobby);
        assert_eq!(summary.round, 0);

        // The room is open again
        let out = join(&state, "c", &code).await;
        assert!(error_code(&out).is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_joins_reach_host_in_order() {
        let state = state();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        state.gateway.register("host".to_string(), tx).await;
        let code = create(&state, "host").await;

        let joins: Vec<_> = (1..8)
            .map(|i| {
                let state = state.clone();
                let code = code.clone();
                tokio::spawn(async move { join(&state, &format!("p{}", i), &code).await })
            })
            .collect();
        for handle in joins {
            handle.await.unwrap();
        }

        let mut sizes = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            if let ServerMessage::PlayerJoined { players, .. } = msg {
                sizes.push(players.len());
            }
        }
        assert_eq!(sizes, (2..=8).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_handlers_deliver_what_they_return() {
        let state = state();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        state.gateway.register("host".to_string(), tx).await;
        let code = create(&state, "host").await;
        join(&state, "guest", &code).await;
        let out = handle_disconnect("guest", &state).await;

        let mut received = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            received.push(msg);
        }
        assert_eq!(received.len(), 3);
        assert!(matches!(received[0], ServerMessage::RoomCreated { .. }));
        assert!(matches!(received[1], ServerMessage::PlayerJoined { .. }));
        assert_eq!(received.last(), messages_for(&out, "host").last().copied());
    }

    #[tokio::test]
    async fn test_host_disconnect_reassigns_host() {
        let state = state();
        let code = create(&state, "host").await;
        join(&state, "b", &code).await;
        join(&state, "c", &code).await;

        let out = handle_disconnect("host", &state).await;
        let to_b = messages_for(&out, "b");
        assert!(matches!(to_b[0], ServerMessage::PlayerLeft { .. }));
        assert_eq!(
            to_b[1],
            &ServerMessage::HostChanged {
                host_id: "b".to_string()
            }
        );
        assert!(!out.iter().any(|e| e.is_for("host")));

        // Disconnecting twice is harmless
        assert!(handle_disconnect("host", &state).await.is_empty());
    }
}
