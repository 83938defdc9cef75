use super::Game;
use crate::error::{GameError, GameResult};
use crate::types::*;

/// What a departure unlocked for the remaining players
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Nothing to do
    None,
    /// Everyone left has submitted; voting can start
    SubmissionsComplete,
    /// Everyone left has acted on the current meme
    MemeComplete,
    /// The current meme belonged to the departed player and was dropped
    MemeSkipped,
}

/// Outcome of removing a player
#[derive(Debug, Clone)]
pub struct Departure {
    pub player: Player,
    /// Set when the host left and someone else took over
    pub new_host: Option<PlayerId>,
    pub room_empty: bool,
    pub progress: Progress,
}

impl Game {
    /// Add a player to the lobby
    pub fn add_player(&mut self, player_id: PlayerId, name: &str) -> GameResult<()> {
        if self.phase != GamePhase::Lobby {
            return Err(GameError::GameAlreadyStarted);
        }
        if self.player(&player_id).is_some() {
            return Ok(());
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(GameError::RoomFull);
        }

        let player = Player::new(player_id, name);
        tracing::info!("Room {}: {} joined ({})", self.code, player.name, player.id);
        self.players.push(player);
        Ok(())
    }

    /// Remove a player in any phase.
    ///
    /// Votes the player already cast on other memes are kept so round scores
    /// never go down. Returns `None` if the player was not in the room.
    pub fn remove_player(&mut self, player_id: &str) -> Option<Departure> {
        let position = self.players.iter().position(|p| p.id == player_id)?;
        let player = self.players.remove(position);

        self.templates.remove(player_id);
        self.memes.remove(player_id);
        self.votes.remove(player_id);
        self.acted.remove(player_id);

        let mut skipped = false;
        if let Some(order_pos) = self.meme_order.iter().position(|id| id == player_id) {
            self.meme_order.remove(order_pos);
            if self.phase == GamePhase::Voting {
                if order_pos < self.meme_index {
                    self.meme_index -= 1;
                } else if order_pos == self.meme_index {
                    // The next meme slides into the current slot
                    self.acted.clear();
                    skipped = true;
                }
            }
        }

        let mut new_host = None;
        if self.host_id == player.id {
            if let Some(first) = self.players.first() {
                self.host_id = first.id.clone();
                new_host = Some(first.id.clone());
                tracing::info!("Room {}: host passed to {}", self.code, first.name);
            }
        }

        let room_empty = self.players.is_empty();
        let progress = if room_empty {
            Progress::None
        } else {
            self.progress_after_departure(skipped)
        };

        tracing::info!(
            "Room {}: {} left during {:?}, {} remaining",
            self.code,
            player.name,
            self.phase,
            self.players.len()
        );

        Some(Departure {
            player,
            new_host,
            room_empty,
            progress,
        })
    }

    fn progress_after_departure(&self, skipped: bool) -> Progress {
        match self.phase {
            GamePhase::Creating if self.all_submitted() => Progress::SubmissionsComplete,
            GamePhase::Voting if skipped => Progress::MemeSkipped,
            GamePhase::Voting if !self.voting_exhausted() && self.all_acted() => {
                Progress::MemeComplete
            }
            _ => Progress::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::*;
    use super::*;

    #[test]
    fn test_add_player_rules() {
        let mut game = game(&["A"]);
        assert!(game.add_player("B".to_string(), "B").is_ok());
        // Same id again is a no-op
        assert!(game.add_player("B".to_string(), "B").is_ok());
        assert_eq!(game.players().len(), 2);

        for i in 0..6 {
            game.add_player(format!("P{}", i), "P").unwrap();
        }
        assert_eq!(game.players().len(), MAX_PLAYERS);
        assert_eq!(
            game.add_player("Z".to_string(), "Z"),
            Err(GameError::RoomFull)
        );
    }

    #[test]
    fn test_add_player_after_start_fails() {
        let mut game = game(&["A", "B"]);
        game.start_round().unwrap();
        assert_eq!(
            game.add_player("C".to_string(), "C"),
            Err(GameError::GameAlreadyStarted)
        );
    }

    #[test]
    fn test_host_passes_to_earliest_joiner() {
        let mut game = game(&["A", "B", "C"]);
        let departure = game.remove_player("A").unwrap();

        assert_eq!(departure.new_host.as_deref(), Some("B"));
        assert_eq!(game.host_id(), "B");
        assert!(!departure.room_empty);

        // Non-host leaving keeps the host
        let departure = game.remove_player("C").unwrap();
        assert!(departure.new_host.is_none());
        assert_eq!(game.host_id(), "B");
    }

    #[test]
    fn test_last_player_leaving_empties_room() {
        let mut game = game(&["A"]);
        let departure = game.remove_player("A").unwrap();
        assert!(departure.room_empty);
        assert_eq!(departure.progress, Progress::None);
        assert!(game.is_empty());
        assert!(game.remove_player("A").is_none());
    }

    #[test]
    fn test_departure_completes_submissions() {
        let mut game = game(&["A", "B", "C"]);
        game.start_round().unwrap();
        game.submit_meme("A", Caption::new("", "a", "")).unwrap();
        game.submit_meme("B", Caption::new("", "b", "")).unwrap();

        let departure = game.remove_player("C").unwrap();
        assert_eq!(departure.progress, Progress::SubmissionsComplete);
        assert!(game.start_voting().is_ok());
        assert_eq!(game.current_meme().unwrap().total, 2);
    }

    #[test]
    fn test_departure_of_pending_voter_completes_meme() {
        let mut game = game(&["A", "B", "C"]);
        to_voting(&mut game);
        let creator = game.current_meme().unwrap().creator_id;
        let absent = game
            .player_ids()
            .into_iter()
            .find(|id| *id != creator)
            .unwrap();

        for id in game.player_ids() {
            if id != absent {
                assert!(!game.cast_vote(&id, 1).unwrap());
            }
        }

        let departure = game.remove_player(&absent).unwrap();
        assert_eq!(departure.progress, Progress::MemeComplete);

        // Remaining players can finish the round without the departed one
        assert!(!game.advance_meme().unwrap());
        vote_everything(&mut game, 0);
        assert!(game.finalize_results().is_ok());
    }

    #[test]
    fn test_departure_of_current_creator_skips_meme() {
        let mut game = game(&["A", "B", "C"]);
        to_voting(&mut game);
        let first = game.current_meme().unwrap();

        let departure = game.remove_player(&first.creator_id).unwrap();
        assert_eq!(departure.progress, Progress::MemeSkipped);

        let next = game.current_meme().unwrap();
        assert_ne!(next.creator_id, first.creator_id);
        assert_eq!(next.index, 1);
        assert_eq!(next.total, 2);
    }

    #[test]
    fn test_departure_keeps_scores_already_awarded() {
        let mut game = game(&["A", "B", "C"]);
        to_voting(&mut game);
        let creator = game.current_meme().unwrap().creator_id;
        let voter = game
            .player_ids()
            .into_iter()
            .find(|id| *id != creator)
            .unwrap();

        game.cast_vote(&voter, 1).unwrap();
        game.remove_player(&voter).unwrap();
        assert_eq!(game.round_score(&creator), 2);
    }
}
