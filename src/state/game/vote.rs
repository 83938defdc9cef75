use super::Game;
use crate::error::{GameError, GameResult};
use crate::types::*;

impl Game {
    /// The meme currently being voted on, if any remain
    pub fn current_meme(&self) -> Option<MemeView> {
        if self.phase != GamePhase::Voting {
            return None;
        }
        let creator_id = self.meme_order.get(self.meme_index)?;
        let creator = self.player(creator_id)?;
        let meme = self.memes.get(creator_id)?;
        let template = self
            .templates
            .get(creator_id)
            .cloned()
            .unwrap_or_else(|| Template::placeholder(&self.config.category));

        Some(MemeView {
            creator_id: creator_id.clone(),
            creator_name: creator.name.clone(),
            caption: meme.caption.clone(),
            text1: meme.text1.clone(),
            text2: meme.text2.clone(),
            template,
            index: self.meme_index + 1,
            total: self.meme_order.len(),
        })
    }

    /// Vote on the current meme.
    ///
    /// A creator voting on their own meme passes: it counts as acting but
    /// scores nothing. Only the first action per voter per meme counts.
    /// Returns whether every current player has acted on this meme.
    pub fn cast_vote(&mut self, voter_id: &str, value: i64) -> GameResult<bool> {
        self.ensure_phase(GamePhase::Voting)?;
        let value = VoteValue::try_from(value)?;
        if self.player(voter_id).is_none() {
            return Err(GameError::NotInRoom);
        }
        let creator_id = self
            .meme_order
            .get(self.meme_index)
            .cloned()
            .ok_or(GameError::InvalidPhase)?;

        if self.acted.contains(voter_id) {
            return Ok(false);
        }
        self.acted.insert(voter_id.to_string());

        if voter_id != creator_id {
            self.votes
                .entry(creator_id.clone())
                .or_default()
                .insert(voter_id.to_string(), value);
        }

        tracing::debug!(
            "Room {}: {} acted on meme by {} ({}/{})",
            self.code,
            voter_id,
            creator_id,
            self.acted_count(),
            self.players.len()
        );
        Ok(self.all_acted())
    }

    /// Number of current players who acted on the current meme
    pub fn acted_count(&self) -> usize {
        self.players
            .iter()
            .filter(|p| self.acted.contains(&p.id))
            .count()
    }

    pub(super) fn all_acted(&self) -> bool {
        !self.players.is_empty() && self.acted_count() == self.players.len()
    }

    pub(super) fn voting_exhausted(&self) -> bool {
        self.meme_index >= self.meme_order.len()
    }

    /// Move on to the next meme. Returns whether all memes have been voted on.
    pub fn advance_meme(&mut self) -> GameResult<bool> {
        self.ensure_phase(GamePhase::Voting)?;
        if !self.voting_exhausted() {
            self.meme_index += 1;
        }
        self.acted.clear();
        Ok(self.voting_exhausted())
    }
}
