//! Room membership and round control handlers
//!
//! Creating and joining rooms, plus the host-only start and continue actions.

use std::sync::Arc;

use crate::broadcast::Envelope;
use crate::error::{GameError, GameResult};
use crate::protocol::ServerMessage;
use crate::state::game::RoundStart;
use crate::state::{AppState, Game};
use crate::types::*;

use super::handlers::{deliver, resolve_room};

pub async fn handle_create_room(
    state: &Arc<AppState>,
    conn_id: &str,
    name: String,
    mode: Option<GameMode>,
    category: Option<String>,
    rounds: Option<u32>,
    timer: Option<u32>,
) -> GameResult<Vec<Envelope>> {
    if state.gateway.room_of(conn_id).await.is_some() {
        return Err(GameError::AlreadyInRoom);
    }

    let config = GameConfig::normalized(mode, category, rounds, timer);
    let code = state
        .registry
        .create_room(conn_id.to_string(), &name, config)
        .await;
    state.gateway.bind(conn_id, code.clone()).await;

    let shared = state.registry.get_room(&code).await?;
    let game = shared.lock().await;
    let envelopes = vec![Envelope::to(
        conn_id,
        ServerMessage::RoomCreated {
            room_code: code,
            player_id: conn_id.to_string(),
            is_host: true,
            config: game.config().clone(),
            players: game.players_info(),
        },
    )];
    Ok(deliver(state, envelopes).await)
}

pub async fn handle_join_room(
    state: &Arc<AppState>,
    conn_id: &str,
    room_code: String,
    name: String,
) -> GameResult<Vec<Envelope>> {
    if state.gateway.room_of(conn_id).await.is_some() {
        return Err(GameError::AlreadyInRoom);
    }

    let joined = state
        .registry
        .join_room(&room_code, conn_id.to_string(), &name)
        .await?;
    state.gateway.bind(conn_id, joined.code.clone()).await;

    let game = &joined.game;
    let players = game.players_info();
    let others: Vec<PlayerId> = players
        .iter()
        .filter(|p| p.player_id != conn_id)
        .map(|p| p.player_id.clone())
        .collect();

    let envelopes = vec![
        Envelope::to(
            conn_id,
            ServerMessage::RoomJoined {
                room_code: joined.code.clone(),
                player_id: conn_id.to_string(),
                is_host: false,
                config: game.config().clone(),
                players: players.clone(),
            },
        ),
        Envelope::to_all(
            others,
            ServerMessage::PlayerJoined {
                player_id: joined.player.id.clone(),
                name: joined.player.name.clone(),
                players,
            },
        ),
    ];
    Ok(deliver(state, envelopes).await)
}

pub async fn handle_start_game(
    state: &Arc<AppState>,
    conn_id: &str,
    room_code: String,
) -> GameResult<Vec<Envelope>> {
    let (_, shared) = resolve_room(state, conn_id, &room_code).await?;
    let mut game = shared.lock().await;

    game.ensure_host(conn_id)?;
    if game.phase() != GamePhase::Lobby {
        return Err(GameError::InvalidPhase);
    }
    let start = game.start_round()?;
    Ok(deliver(state, round_started(&game, start)).await)
}

/// Continue after a results screen: next round, or back to the lobby once
/// the game cannot go on
pub async fn handle_next_round(
    state: &Arc<AppState>,
    conn_id: &str,
    room_code: String,
) -> GameResult<Vec<Envelope>> {
    let (_, shared) = resolve_room(state, conn_id, &room_code).await?;
    let mut game = shared.lock().await;

    game.ensure_host(conn_id)?;
    if game.phase() != GamePhase::Results {
        return Err(GameError::InvalidPhase);
    }

    if game.is_game_over() {
        game.return_to_lobby()?;
        let envelopes = vec![Envelope::to_all(
            game.player_ids(),
            ServerMessage::BackToLobby {
                players: game.players_info(),
            },
        )];
        return Ok(deliver(state, envelopes).await);
    }

    let start = game.start_round()?;
    Ok(deliver(state, round_started(&game, start)).await)
}

/// One `round_started` per player, each with their own template
fn round_started(game: &Game, start: RoundStart) -> Vec<Envelope> {
    let config = game.config();
    let budget = chrono::Duration::seconds(i64::from(config.timer_seconds));
    let deadline = (chrono::Utc::now() + budget).to_rfc3339();

    start
        .templates
        .into_iter()
        .map(|(player_id, template)| {
            let rerolls_left = game
                .player(&player_id)
                .map(|p| p.rerolls_left)
                .unwrap_or(REROLLS_PER_ROUND);
            Envelope::to(
                player_id,
                ServerMessage::RoundStarted {
                    round: start.round,
                    total: start.total,
                    template,
                    theme: start.theme.clone(),
                    mode: config.mode,
                    timer: config.timer_seconds,
                    rerolls_left,
                    deadline: deadline.clone(),
                },
            )
        })
        .collect()
}
