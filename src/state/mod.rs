pub mod game;
pub mod registry;

use std::sync::Arc;

use crate::content::ContentProvider;
use crate::gateway::ConnectionGateway;

pub use game::Game;
pub use registry::{normalize_code, JoinedRoom, RoomRegistry, RoomSummary, SharedGame};

/// Shared application state
pub struct AppState {
    pub registry: RoomRegistry,
    pub gateway: ConnectionGateway,
}

impl AppState {
    pub fn new(provider: Arc<dyn ContentProvider>) -> Self {
        Self {
            registry: RoomRegistry::new(provider),
            gateway: ConnectionGateway::new(),
        }
    }

    /// State with deterministic room codes and shuffles
    pub fn with_seed(provider: Arc<dyn ContentProvider>, seed: u64) -> Self {
        Self {
            registry: RoomRegistry::with_seed(provider, seed),
            gateway: ConnectionGateway::new(),
        }
    }

    pub fn provider(&self) -> &Arc<dyn ContentProvider> {
        self.registry.provider()
    }
}
