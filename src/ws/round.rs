//! In-round handlers: rerolls, submissions and votes
//!
//! The progression helpers here are shared with the disconnect path, which
//! can complete a phase on behalf of a departed player.

use std::sync::Arc;

use crate::broadcast::Envelope;
use crate::error::{GameError, GameResult};
use crate::protocol::ServerMessage;
use crate::state::{AppState, Game};
use crate::types::Caption;

use super::handlers::{deliver, resolve_room};

pub async fn handle_reroll_template(
    state: &Arc<AppState>,
    conn_id: &str,
    room_code: String,
) -> GameResult<Vec<Envelope>> {
    let (_, shared) = resolve_room(state, conn_id, &room_code).await?;
    let mut game = shared.lock().await;

    let reroll = game.reroll_template(conn_id)?;
    let envelopes = vec![Envelope::to(
        conn_id,
        ServerMessage::TemplateRerolled {
            template: reroll.template,
            rerolls_left: reroll.rerolls_left,
        },
    )];
    Ok(deliver(state, envelopes).await)
}

pub async fn handle_submit_meme(
    state: &Arc<AppState>,
    conn_id: &str,
    room_code: String,
    caption: String,
    text1: String,
    text2: String,
) -> GameResult<Vec<Envelope>> {
    let (_, shared) = resolve_room(state, conn_id, &room_code).await?;
    let mut game = shared.lock().await;

    let all_submitted = game.submit_meme(conn_id, Caption::new(&caption, &text1, &text2))?;
    let mut envelopes = vec![Envelope::to_all(
        game.player_ids(),
        ServerMessage::PlayerReadyCount {
            count: game.ready_count(),
            total: game.players().len(),
        },
    )];

    if all_submitted {
        envelopes.extend(begin_voting(&mut game)?);
    }
    Ok(deliver(state, envelopes).await)
}

pub async fn handle_submit_vote(
    state: &Arc<AppState>,
    conn_id: &str,
    room_code: String,
    value: i64,
) -> GameResult<Vec<Envelope>> {
    let (_, shared) = resolve_room(state, conn_id, &room_code).await?;
    let mut game = shared.lock().await;

    let all_acted = game.cast_vote(conn_id, value)?;
    let mut envelopes = vec![Envelope::to_all(
        game.player_ids(),
        ServerMessage::PlayerVotedCount {
            count: game.acted_count(),
            total: game.players().len(),
        },
    )];

    if all_acted {
        envelopes.extend(advance_voting(&mut game)?);
    }
    Ok(deliver(state, envelopes).await)
}

/// Open voting and show everyone the first meme
pub(super) fn begin_voting(game: &mut Game) -> GameResult<Vec<Envelope>> {
    game.start_voting()?;
    let current_meme = game.current_meme().ok_or(GameError::InvalidPhase)?;
    Ok(vec![Envelope::to_all(
        game.player_ids(),
        ServerMessage::VotingStarted { current_meme },
    )])
}

/// The current meme is done: show the next one or the round results
pub(super) fn advance_voting(game: &mut Game) -> GameResult<Vec<Envelope>> {
    game.advance_meme()?;
    show_current_or_finish(game)
}

/// Show the meme now in the current slot, or finish the round if none is left
pub(super) fn show_current_or_finish(game: &mut Game) -> GameResult<Vec<Envelope>> {
    let recipients = game.player_ids();
    match game.current_meme() {
        Some(current_meme) => Ok(vec![Envelope::to_all(
            recipients,
            ServerMessage::NextMeme { current_meme },
        )]),
        None => {
            let summary = game.finalize_results()?;
            Ok(vec![Envelope::to_all(
                recipients,
                ServerMessage::from(summary),
            )])
        }
    }
}
