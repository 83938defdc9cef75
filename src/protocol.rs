use crate::error::GameError;
use crate::state::game::RoundSummary;
use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    CreateRoom {
        name: String,
        #[serde(default)]
        mode: Option<GameMode>,
        #[serde(default)]
        category: Option<String>,
        #[serde(default)]
        rounds: Option<u32>,
        #[serde(default)]
        timer: Option<u32>,
    },
    JoinRoom {
        room_code: RoomCode,
        name: String,
    },
    StartGame {
        room_code: RoomCode,
    },
    RerollTemplate {
        room_code: RoomCode,
    },
    SubmitMeme {
        room_code: RoomCode,
        #[serde(default)]
        caption: String,
        #[serde(default)]
        text1: String,
        #[serde(default)]
        text2: String,
    },
    SubmitVote {
        room_code: RoomCode,
        value: i64,
    },
    NextRound {
        room_code: RoomCode,
    },
}

impl ClientMessage {
    /// Action name for logging
    pub fn action(&self) -> &'static str {
        match self {
            ClientMessage::CreateRoom { .. } => "create_room",
            ClientMessage::JoinRoom { .. } => "join_room",
            ClientMessage::StartGame { .. } => "start_game",
            ClientMessage::RerollTemplate { .. } => "reroll_template",
            ClientMessage::SubmitMeme { .. } => "submit_meme",
            ClientMessage::SubmitVote { .. } => "submit_vote",
            ClientMessage::NextRound { .. } => "next_round",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "t", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Sent to the creator of a new room
    RoomCreated {
        room_code: RoomCode,
        player_id: PlayerId,
        is_host: bool,
        config: GameConfig,
        players: Vec<PlayerInfo>,
    },
    /// Sent to a player who joined an existing room
    RoomJoined {
        room_code: RoomCode,
        player_id: PlayerId,
        is_host: bool,
        config: GameConfig,
        players: Vec<PlayerInfo>,
    },
    /// Broadcast to everyone else in the room
    PlayerJoined {
        player_id: PlayerId,
        name: String,
        players: Vec<PlayerInfo>,
    },
    PlayerLeft {
        player_id: PlayerId,
        name: String,
        players: Vec<PlayerInfo>,
    },
    HostChanged {
        host_id: PlayerId,
    },
    /// Sent to each player with their own template
    RoundStarted {
        round: u32,
        total: u32,
        template: Template,
        theme: Option<String>,
        mode: GameMode,
        timer: u32,
        rerolls_left: u32,
        /// Advisory caption deadline (RFC 3339)
        deadline: String,
    },
    TemplateRerolled {
        template: Template,
        rerolls_left: u32,
    },
    PlayerReadyCount {
        count: usize,
        total: usize,
    },
    VotingStarted {
        current_meme: MemeView,
    },
    PlayerVotedCount {
        count: usize,
        total: usize,
    },
    NextMeme {
        current_meme: MemeView,
    },
    RoundResults {
        per_player: Vec<RoundEntry>,
        is_final: bool,
        winner: Option<Standing>,
        leaderboard: Vec<Standing>,
    },
    BackToLobby {
        players: Vec<PlayerInfo>,
    },
    Error {
        message: String,
        code: String,
    },
}

impl From<&GameError> for ServerMessage {
    fn from(e: &GameError) -> Self {
        ServerMessage::Error {
            message: e.to_string(),
            code: e.code().to_string(),
        }
    }
}

impl From<RoundSummary> for ServerMessage {
    fn from(summary: RoundSummary) -> Self {
        ServerMessage::RoundResults {
            per_player: summary.entries,
            is_final: summary.is_final,
            winner: summary.winner,
            leaderboard: summary.leaderboard,
        }
    }
}
