use super::Game;
use crate::error::{GameError, GameResult};
use crate::types::*;

/// Results of a finished round
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {
    /// Sorted by round score, ties in join order
    pub entries: Vec<RoundEntry>,
    /// Sorted by cumulative score, ties in join order
    pub leaderboard: Vec<Standing>,
    pub is_final: bool,
    /// Set on the final round only
    pub winner: Option<Standing>,
}

impl Game {
    /// Bank round scores and move to the results phase.
    ///
    /// Only valid once every meme has been voted on.
    pub fn finalize_results(&mut self) -> GameResult<RoundSummary> {
        self.ensure_phase(GamePhase::Voting)?;
        if !self.voting_exhausted() {
            return Err(GameError::InvalidPhase);
        }

        let banked: Vec<u32> = self.players.iter().map(|p| self.round_score(&p.id)).collect();
        for (player, points) in self.players.iter_mut().zip(banked) {
            player.score += points;
        }
        self.phase = GamePhase::Results;

        let mut entries: Vec<RoundEntry> = self
            .players
            .iter()
            .map(|p| {
                let meme = self.memes.get(&p.id).cloned().unwrap_or_default();
                RoundEntry {
                    player_id: p.id.clone(),
                    player_name: p.name.clone(),
                    caption: meme.caption,
                    text1: meme.text1,
                    text2: meme.text2,
                    template: self.templates.get(&p.id).cloned(),
                    round_score: self.round_score(&p.id),
                    total_score: p.score,
                }
            })
            .collect();
        // Stable sort keeps join order among ties
        entries.sort_by(|a, b| b.round_score.cmp(&a.round_score));

        let leaderboard = self.leaderboard();
        let is_final = self.is_final_round();
        let winner = if is_final {
            leaderboard.first().cloned()
        } else {
            None
        };

        tracing::info!(
            "Room {}: round {} finished{}",
            self.code,
            self.round_no,
            winner
                .as_ref()
                .map(|w| format!(", winner {} with {}", w.name, w.score))
                .unwrap_or_default()
        );

        Ok(RoundSummary {
            entries,
            leaderboard,
            is_final,
            winner,
        })
    }

    /// Cumulative standings. Ties go to the earlier joiner, which is an
    /// arbitrary but fixed rule.
    pub fn leaderboard(&self) -> Vec<Standing> {
        let mut standings: Vec<Standing> = self
            .players
            .iter()
            .map(|p| Standing {
                player_id: p.id.clone(),
                name: p.name.clone(),
                score: p.score,
            })
            .collect();
        standings.sort_by(|a, b| b.score.cmp(&a.score));
        standings
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::*;
    use super::*;

    #[test]
    fn test_finalize_requires_exhausted_voting() {
        let mut game = game(&["A", "B"]);
        assert_eq!(game.finalize_results(), Err(GameError::InvalidPhase));

        to_voting(&mut game);
        assert_eq!(game.finalize_results(), Err(GameError::InvalidPhase));
        assert_eq!(game.phase(), GamePhase::Voting);
    }

    #[test]
    fn test_finalize_banks_round_scores() {
        let mut game = game(&["A", "B", "C"]);
        to_voting(&mut game);
        vote_everything(&mut game, 1);

        let summary = game.finalize_results().unwrap();
        assert_eq!(game.phase(), GamePhase::Results);
        assert!(!summary.is_final);
        assert!(summary.winner.is_none());
        // Each meme gets +2 from both other players
        for entry in &summary.entries {
            assert_eq!(entry.round_score, 4);
            assert_eq!(entry.total_score, 4);
        }
        assert_eq!(game.player("B").unwrap().score, 4);

        // Scores carry into the next round
        to_voting(&mut game);
        vote_everything(&mut game, 0);
        game.finalize_results().unwrap();
        assert_eq!(game.player("B").unwrap().score, 6);
    }

    #[test]
    fn test_finalize_twice_fails() {
        let mut game = game(&["A", "B"]);
        to_voting(&mut game);
        vote_everything(&mut game, 1);
        game.finalize_results().unwrap();
        assert_eq!(game.finalize_results(), Err(GameError::InvalidPhase));
        assert_eq!(game.player("A").unwrap().score, 2);
    }

    #[test]
    fn test_entries_sorted_by_round_score() {
        let mut game = game(&["A", "B", "C"]);
        to_voting(&mut game);
        while let Some(meme) = game.current_meme() {
            let value = if meme.creator_id == "C" { 1 } else { -1 };
            for id in game.player_ids() {
                game.cast_vote(&id, value).unwrap();
            }
            game.advance_meme().unwrap();
        }

        let summary = game.finalize_results().unwrap();
        let order: Vec<_> = summary.entries.iter().map(|e| e.player_id.as_str()).collect();
        assert_eq!(order, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_final_round_winner_tie_goes_to_earlier_joiner() {
        let mut game = game_with(GameMode::Normal, 1, &["A", "B", "C"]);
        to_voting(&mut game);
        vote_everything(&mut game, -1);

        game.players[0].score = 10;
        game.players[1].score = 12;
        game.players[2].score = 12;

        let summary = game.finalize_results().unwrap();
        assert!(summary.is_final);
        assert_eq!(summary.winner.unwrap().player_id, "B");
        let board: Vec<_> = summary.leaderboard.iter().map(|s| s.score).collect();
        assert_eq!(board, vec![12, 12, 10]);
        assert_eq!(summary.leaderboard[1].player_id, "C");
    }
}
