/// Result type for game operations
pub type GameResult<T> = Result<T, GameError>;

/// Recoverable errors reported to the connection that caused them
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Room not found")]
    RoomNotFound,

    #[error("Room is full")]
    RoomFull,

    #[error("Game already started")]
    GameAlreadyStarted,

    #[error("Action not allowed in the current phase")]
    InvalidPhase,

    #[error("Only the host can do that")]
    NotHost,

    #[error("Write at least one caption")]
    EmptyCaption,

    #[error("Vote must be -1, 0 or 1")]
    InvalidVote,

    #[error("No template changes left this round")]
    NoRerollsLeft,

    #[error("At least {0} players are needed")]
    InsufficientPlayers(usize),

    #[error("You are not in this room")]
    NotInRoom,

    #[error("You are already in a room")]
    AlreadyInRoom,
}

impl GameError {
    /// Stable machine-readable code sent alongside the message
    pub fn code(&self) -> &'static str {
        match self {
            GameError::RoomNotFound => "ROOM_NOT_FOUND",
            GameError::RoomFull => "ROOM_FULL",
            GameError::GameAlreadyStarted => "GAME_ALREADY_STARTED",
            GameError::InvalidPhase => "INVALID_PHASE",
            GameError::NotHost => "NOT_HOST",
            GameError::EmptyCaption => "EMPTY_CAPTION",
            GameError::InvalidVote => "INVALID_VOTE",
            GameError::NoRerollsLeft => "NO_REROLLS_LEFT",
            GameError::InsufficientPlayers(_) => "INSUFFICIENT_PLAYERS",
            GameError::NotInRoom => "NOT_IN_ROOM",
            GameError::AlreadyInRoom => "ALREADY_IN_ROOM",
        }
    }
}
