//! Per-room game state machine.
//!
//! Every operation checks the current phase before mutating anything and
//! returns a plain result; callers decide what to tell which players.

mod player;
mod round;
mod score;
mod submission;
mod vote;

use rand::rngs::StdRng;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::content::ContentProvider;
use crate::error::{GameError, GameResult};
use crate::types::*;

pub use player::{Departure, Progress};
pub use round::{Reroll, RoundStart};
pub use score::RoundSummary;

pub struct Game {
    code: RoomCode,
    host_id: PlayerId,
    config: GameConfig,
    phase: GamePhase,
    round_no: u32,
    /// Join order; also vote and display order
    players: Vec<Player>,
    theme: Option<String>,
    templates: HashMap<PlayerId, Template>,
    memes: HashMap<PlayerId, Caption>,
    /// creator -> (voter -> vote)
    votes: HashMap<PlayerId, HashMap<PlayerId, VoteValue>>,
    meme_order: Vec<PlayerId>,
    meme_index: usize,
    /// Players who voted or passed on the current meme
    acted: HashSet<PlayerId>,
    provider: Arc<dyn ContentProvider>,
    rng: StdRng,
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("code", &self.code)
            .field("host_id", &self.host_id)
            .field("phase", &self.phase)
            .field("round_no", &self.round_no)
            .field("players", &self.players.len())
            .field("provider", &self.provider.name())
            .finish()
    }
}

impl Game {
    /// Create a game in the lobby with the host as its only player
    pub fn new(
        code: RoomCode,
        host_id: PlayerId,
        host_name: &str,
        config: GameConfig,
        provider: Arc<dyn ContentProvider>,
        rng: StdRng,
    ) -> Self {
        Self {
            code,
            host_id: host_id.clone(),
            config,
            phase: GamePhase::Lobby,
            round_no: 0,
            players: vec![Player::new(host_id, host_name)],
            theme: None,
            templates: HashMap::new(),
            memes: HashMap::new(),
            votes: HashMap::new(),
            meme_order: Vec::new(),
            meme_index: 0,
            acted: HashSet::new(),
            provider,
            rng,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn host_id(&self) -> &str {
        &self.host_id
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn round_no(&self) -> u32 {
        self.round_no
    }

    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    fn player_mut(&mut self, player_id: &str) -> GameResult<&mut Player> {
        self.players
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or(GameError::NotInRoom)
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn template_for(&self, player_id: &str) -> Option<&Template> {
        self.templates.get(player_id)
    }

    /// Round score of a player in the current round
    pub fn round_score(&self, player_id: &str) -> u32 {
        self.votes
            .get(player_id)
            .map(|votes| votes.values().map(|v| v.points()).sum::<u32>())
            .unwrap_or(0)
    }

    /// Reject privileged actions from anyone but the host
    pub fn ensure_host(&self, player_id: &str) -> GameResult<()> {
        if self.host_id != player_id {
            return Err(GameError::NotHost);
        }
        Ok(())
    }

    fn ensure_phase(&self, phase: GamePhase) -> GameResult<()> {
        if self.phase != phase {
            return Err(GameError::InvalidPhase);
        }
        Ok(())
    }

    /// Public player list in join order
    pub fn players_info(&self) -> Vec<PlayerInfo> {
        self.players
            .iter()
            .map(|p| PlayerInfo {
                player_id: p.id.clone(),
                name: p.name.clone(),
                score: p.score,
                is_host: p.id == self.host_id,
            })
            .collect()
    }

    /// Clear everything scoped to a single round
    fn clear_round_state(&mut self) {
        self.templates.clear();
        self.memes.clear();
        self.votes.clear();
        self.meme_order.clear();
        self.meme_index = 0;
        self.acted.clear();
        self.theme = None;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::content::FixedProvider;
    use rand::SeedableRng;

    pub fn template(name: &str) -> Template {
        Template {
            name: name.to_string(),
            description: format!("{} description", name),
            category: "test".to_string(),
            image: Some(format!("test/{}.png", name)),
            image_kind: ImageKind::Custom,
        }
    }

    pub fn provider() -> Arc<dyn ContentProvider> {
        Arc::new(FixedProvider::new(vec![
            template("drake"),
            template("doge"),
            template("pikachu"),
            template("harold"),
        ]))
    }

    pub fn game_with(mode: GameMode, rounds: u32, names: &[&str]) -> Game {
        let config = GameConfig {
            mode,
            rounds,
            ..GameConfig::default()
        };
        let mut game = Game::new(
            "ABCD".to_string(),
            names[0].to_string(),
            names[0],
            config,
            provider(),
            StdRng::seed_from_u64(42),
        );
        for name in &names[1..] {
            game.add_player(name.to_string(), name).unwrap();
        }
        game
    }

    pub fn game(names: &[&str]) -> Game {
        game_with(GameMode::Normal, 3, names)
    }

    /// Start a round and have every player submit
    pub fn to_voting(game: &mut Game) {
        game.start_round().unwrap();
        for id in game.player_ids() {
            game.submit_meme(&id, Caption::new("", &format!("{} top", id), ""))
                .unwrap();
        }
        game.start_voting().unwrap();
    }

    /// Every player votes `value` on each meme until voting is exhausted
    pub fn vote_everything(game: &mut Game, value: i64) {
        loop {
            for id in game.player_ids() {
                game.cast_vote(&id, value).unwrap();
            }
            if game.advance_meme().unwrap() {
                break;
            }
        }
    }

    #[test]
    fn test_new_game_starts_in_lobby() {
        let game = game(&["A"]);
        assert_eq!(game.phase(), GamePhase::Lobby);
        assert_eq!(game.round_no(), 0);
        assert_eq!(game.host_id(), "A");
        assert_eq!(game.players().len(), 1);
    }

    #[test]
    fn test_players_info_flags_host() {
        let game = game(&["A", "B"]);
        let info = game.players_info();
        assert_eq!(info.len(), 2);
        assert!(info[0].is_host);
        assert!(!info[1].is_host);
    }

    #[test]
    fn test_ensure_host() {
        let game = game(&["A", "B"]);
        assert!(game.ensure_host("A").is_ok());
        assert_eq!(game.ensure_host("B"), Err(GameError::NotHost));
    }
}
