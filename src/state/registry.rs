use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use super::game::Game;
use crate::content::ContentProvider;
use crate::error::{GameError, GameResult};
use crate::types::*;

/// A room's game, locked for the duration of one action
pub type SharedGame = Arc<Mutex<Game>>;

/// Unambiguous uppercase letters (no I, L or O)
const CODE_CHARS: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ";
const CODE_LENGTH: usize = 4;

/// Room codes are case-insensitive on input
pub fn normalize_code(code: &str) -> RoomCode {
    code.trim().to_uppercase()
}

/// A player who just joined, with their room still locked so the join is
/// announced before any other action in it
#[derive(Debug)]
pub struct JoinedRoom {
    pub code: RoomCode,
    pub player: Player,
    pub game: OwnedMutexGuard<Game>,
}

/// Summary of a live room
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub room_code: RoomCode,
    pub phase: GamePhase,
    pub round: u32,
    pub config: GameConfig,
    pub player_count: usize,
    pub max_players: usize,
}

/// All live rooms, keyed by code.
///
/// Lock order is always registry first, then a single room.
pub struct RoomRegistry {
    rooms: RwLock<HashMap<RoomCode, SharedGame>>,
    provider: Arc<dyn ContentProvider>,
    /// Source for room codes and per-room seeds
    rng: Mutex<StdRng>,
}

impl RoomRegistry {
    pub fn new(provider: Arc<dyn ContentProvider>) -> Self {
        Self::with_rng(provider, StdRng::from_rng(&mut rand::rng()))
    }

    /// Deterministic registry for tests
    pub fn with_seed(provider: Arc<dyn ContentProvider>, seed: u64) -> Self {
        Self::with_rng(provider, StdRng::seed_from_u64(seed))
    }

    fn with_rng(provider: Arc<dyn ContentProvider>, rng: StdRng) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            provider,
            rng: Mutex::new(rng),
        }
    }

    pub fn provider(&self) -> &Arc<dyn ContentProvider> {
        &self.provider
    }

    /// Create a room in the lobby with the host as its only player
    pub async fn create_room(
        &self,
        host_id: PlayerId,
        host_name: &str,
        config: GameConfig,
    ) -> RoomCode {
        let mut rooms = self.rooms.write().await;
        let mut rng = self.rng.lock().await;

        // Generate a unique code (check for collisions)
        let code = loop {
            let code: RoomCode = (0..CODE_LENGTH)
                .map(|_| CODE_CHARS[rng.random_range(0..CODE_CHARS.len())] as char)
                .collect();
            if !rooms.contains_key(&code) {
                break code;
            }
            tracing::debug!("Room code collision on {}, retrying", code);
        };
        let game_rng = StdRng::seed_from_u64(rng.random());
        drop(rng);

        let game = Game::new(
            code.clone(),
            host_id,
            host_name,
            config,
            self.provider.clone(),
            game_rng,
        );
        rooms.insert(code.clone(), Arc::new(Mutex::new(game)));
        tracing::info!("Room {} created ({} live)", code, rooms.len());
        code
    }

    pub async fn get_room(&self, code: &str) -> GameResult<SharedGame> {
        self.rooms
            .read()
            .await
            .get(&normalize_code(code))
            .cloned()
            .ok_or(GameError::RoomNotFound)
    }

    /// Add a player to a room that is still in its lobby
    pub async fn join_room(
        &self,
        code: &str,
        player_id: PlayerId,
        name: &str,
    ) -> GameResult<JoinedRoom> {
        let code = normalize_code(code);
        // Held across the room lock so teardown cannot interleave
        let rooms = self.rooms.read().await;
        let shared = rooms.get(&code).ok_or(GameError::RoomNotFound)?;
        let mut game = shared.clone().lock_owned().await;

        if game.is_empty() {
            return Err(GameError::RoomNotFound);
        }
        if game.phase() != GamePhase::Lobby {
            return Err(GameError::GameAlreadyStarted);
        }
        if game.players().len() >= MAX_PLAYERS {
            return Err(GameError::RoomFull);
        }
        game.add_player(player_id.clone(), name)?;

        let player = game
            .player(&player_id)
            .cloned()
            .ok_or(GameError::NotInRoom)?;
        Ok(JoinedRoom { code, player, game })
    }

    /// Remove a room unconditionally
    pub async fn destroy_room(&self, code: &str) -> bool {
        let removed = self
            .rooms
            .write()
            .await
            .remove(&normalize_code(code))
            .is_some();
        if removed {
            tracing::info!("Room {} destroyed", code);
        }
        removed
    }

    /// Remove a room if nobody is left in it
    pub async fn destroy_if_empty(&self, code: &str) -> bool {
        let code = normalize_code(code);
        let mut rooms = self.rooms.write().await;
        let empty = match rooms.get(&code) {
            Some(shared) => shared.lock().await.is_empty(),
            None => return false,
        };
        if empty {
            rooms.remove(&code);
            tracing::info!("Room {} destroyed ({} live)", code, rooms.len());
        }
        empty
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    pub async fn room_summary(&self, code: &str) -> GameResult<RoomSummary> {
        let shared = self.get_room(code).await?;
        let game = shared.lock().await;
        Ok(RoomSummary {
            room_code: game.code().to_string(),
            phase: game.phase(),
            round: game.round_no(),
            config: game.config().clone(),
            player_count: game.players().len(),
            max_players: MAX_PLAYERS,
        })
    }
}
