use rand::seq::SliceRandom;
use std::collections::HashMap;

use super::Game;
use crate::error::{GameError, GameResult};
use crate::types::*;

impl Game {
    /// Record a player's meme.
    ///
    /// Returns whether every current player has now submitted. A repeat
    /// submission from a player who is already ready changes nothing.
    pub fn submit_meme(&mut self, player_id: &str, caption: Caption) -> GameResult<bool> {
        self.ensure_phase(GamePhase::Creating)?;
        if caption.is_blank() {
            return Err(GameError::EmptyCaption);
        }

        let player = self.player_mut(player_id)?;
        if player.ready {
            return Ok(false);
        }
        player.ready = true;
        self.memes.insert(player_id.to_string(), caption);

        tracing::info!(
            "Room {}: meme from {} ({}/{})",
            self.code,
            player_id,
            self.ready_count(),
            self.players.len()
        );
        Ok(self.all_submitted())
    }

    /// Number of players who submitted this round
    pub fn ready_count(&self) -> usize {
        self.players
            .iter()
            .filter(|p| self.memes.contains_key(&p.id))
            .count()
    }

    pub(super) fn all_submitted(&self) -> bool {
        !self.players.is_empty() && self.ready_count() == self.players.len()
    }

    /// Shuffle the submitted memes and open voting on the first one
    pub fn start_voting(&mut self) -> GameResult<()> {
        self.ensure_phase(GamePhase::Creating)?;
        if !self.all_submitted() {
            return Err(GameError::InvalidPhase);
        }

        let mut order = self.player_ids();
        order.shuffle(&mut self.rng);
        self.meme_order = order;
        self.meme_index = 0;
        self.acted.clear();
        self.votes = self
            .meme_order
            .iter()
            .map(|id| (id.clone(), HashMap::new()))
            .collect();
        for player in &mut self.players {
            player.ready = false;
        }

        self.phase = GamePhase::Voting;
        tracing::info!(
            "Room {}: voting started on {} memes",
            self.code,
            self.meme_order.len()
        );
        Ok(())
    }
}
