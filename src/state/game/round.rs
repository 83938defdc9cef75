use rand::seq::IndexedRandom;

use super::Game;
use crate::error::{GameError, GameResult};
use crate::types::*;

/// Everything players need to begin a round
#[derive(Debug, Clone)]
pub struct RoundStart {
    pub round: u32,
    pub total: u32,
    pub theme: Option<String>,
    /// Template per player, in join order
    pub templates: Vec<(PlayerId, Template)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reroll {
    pub template: Template,
    pub rerolls_left: u32,
}

impl Game {
    /// Start the next round from the lobby or from a non-final results screen
    pub fn start_round(&mut self) -> GameResult<RoundStart> {
        match self.phase {
            GamePhase::Lobby => {}
            GamePhase::Results if !self.is_final_round() => {}
            _ => return Err(GameError::InvalidPhase),
        }
        if self.players.len() < MIN_PLAYERS {
            return Err(GameError::InsufficientPlayers(MIN_PLAYERS));
        }

        self.round_no += 1;
        self.clear_round_state();
        for player in &mut self.players {
            player.ready = false;
            player.rerolls_left = REROLLS_PER_ROUND;
        }

        let category = self.config.category.clone();
        if self.config.mode == GameMode::SameMeme {
            let shared = self.provider.get_template(&category, &mut self.rng);
            for player in &self.players {
                self.templates.insert(player.id.clone(), shared.clone());
            }
        } else {
            for player in &self.players {
                let template = self.provider.get_template(&category, &mut self.rng);
                self.templates.insert(player.id.clone(), template);
            }
        }

        if self.config.mode == GameMode::Themes {
            self.theme = THEMES.choose(&mut self.rng).map(|t| t.to_string());
        }

        self.phase = GamePhase::Creating;
        tracing::info!(
            "Room {}: round {}/{} started with {} players",
            self.code,
            self.round_no,
            self.config.rounds,
            self.players.len()
        );

        let templates = self
            .players
            .iter()
            .filter_map(|p| {
                self.templates
                    .get(&p.id)
                    .map(|t| (p.id.clone(), t.clone()))
            })
            .collect();

        Ok(RoundStart {
            round: self.round_no,
            total: self.config.rounds,
            theme: self.theme.clone(),
            templates,
        })
    }

    /// Swap a player's template for a fresh draw
    pub fn reroll_template(&mut self, player_id: &str) -> GameResult<Reroll> {
        self.ensure_phase(GamePhase::Creating)?;

        let player = self.player_mut(player_id)?;
        if player.ready {
            return Err(GameError::InvalidPhase);
        }
        if player.rerolls_left == 0 {
            return Err(GameError::NoRerollsLeft);
        }
        player.rerolls_left -= 1;
        let rerolls_left = player.rerolls_left;

        let category = self.config.category.clone();
        let template = self.provider.get_template(&category, &mut self.rng);
        self.templates
            .insert(player_id.to_string(), template.clone());

        tracing::debug!(
            "Room {}: {} rerolled, {} left",
            self.code,
            player_id,
            rerolls_left
        );
        Ok(Reroll {
            template,
            rerolls_left,
        })
    }

    pub fn is_final_round(&self) -> bool {
        self.round_no >= self.config.rounds
    }

    /// No further round can be played: the last one is done or too few
    /// players remain
    pub fn is_game_over(&self) -> bool {
        self.is_final_round() || self.players.len() < MIN_PLAYERS
    }

    /// Reset the finished game so the same room can play again
    pub fn return_to_lobby(&mut self) -> GameResult<()> {
        if self.phase != GamePhase::Results || !self.is_game_over() {
            return Err(GameError::InvalidPhase);
        }

        self.clear_round_state();
        self.round_no = 0;
        for player in &mut self.players {
            player.score = 0;
            player.ready = false;
            player.rerolls_left = REROLLS_PER_ROUND;
        }
        self.phase = GamePhase::Lobby;
        tracing::info!("Room {}: back to lobby", self.code);
        Ok(())
    }
}
