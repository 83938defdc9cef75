use serde::{Deserialize, Serialize};

/// Opaque ID types for type safety
pub type PlayerId = String;
pub type ConnectionId = String;
pub type RoomCode = String;

/// Maximum number of players in one room
pub const MAX_PLAYERS: usize = 8;
/// Minimum number of players needed to start a round
pub const MIN_PLAYERS: usize = 2;
/// Template rerolls granted to every player at the start of a round
pub const REROLLS_PER_ROUND: u32 = 5;
pub const MAX_NAME_CHARS: usize = 20;
pub const MAX_CAPTION_CHARS: usize = 200;
pub const DEFAULT_PLAYER_NAME: &str = "Player";

/// Themes drawn in themes mode
pub const THEMES: &[&str] = &[
    "Work and Office 💼",
    "Love and Relationships 💕",
    "Technology 💻",
    "Food 🍕",
    "Sports ⚽",
    "School and Studying 📚",
    "Weekend and Parties 🎉",
    "Family 👨‍👩‍👧‍👦",
    "Animals 🐱",
    "Travel ✈️",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Lobby,
    Creating,
    Voting,
    Results,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    #[default]
    Normal,
    Themes,
    SameMeme,
    Relaxed,
}

/// Caption timers the client offers, in seconds
pub const ALLOWED_TIMERS: &[u32] = &[60, 90];
pub const DEFAULT_TIMER: u32 = 60;
pub const DEFAULT_ROUNDS: u32 = 5;
pub const MAX_ROUNDS: u32 = 20;
pub const DEFAULT_CATEGORY: &str = "classic";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub mode: GameMode,
    pub rounds: u32,
    pub category: String,
    /// Advisory caption time budget, enforced by clients only
    pub timer_seconds: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Normal,
            rounds: DEFAULT_ROUNDS,
            category: DEFAULT_CATEGORY.to_string(),
            timer_seconds: DEFAULT_TIMER,
        }
    }
}

impl GameConfig {
    /// Build a config from optional client values, replacing anything out of range
    pub fn normalized(
        mode: Option<GameMode>,
        category: Option<String>,
        rounds: Option<u32>,
        timer: Option<u32>,
    ) -> Self {
        let category = category
            .map(|c| c.trim().to_lowercase())
            .filter(|c| is_category_name(c))
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        Self {
            mode: mode.unwrap_or_default(),
            rounds: rounds.unwrap_or(DEFAULT_ROUNDS).clamp(1, MAX_ROUNDS),
            category,
            timer_seconds: timer
                .filter(|t| ALLOWED_TIMERS.contains(t))
                .unwrap_or(DEFAULT_TIMER),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Classic,
    Custom,
    None,
}

/// A meme image plus metadata; passed to clients unchanged
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub name: String,
    pub description: String,
    pub category: String,
    pub image: Option<String>,
    pub image_kind: ImageKind,
}

impl Template {
    /// Placeholder used when a category has no content
    pub fn placeholder(category: &str) -> Self {
        Self {
            name: "Mystery Image".to_string(),
            description: "No images found for this category. Add some to the templates folder!"
                .to_string(),
            category: category.to_string(),
            image: None,
            image_kind: ImageKind::None,
        }
    }
}

/// Caption text fields of one meme
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Caption {
    pub caption: String,
    pub text1: String,
    pub text2: String,
}

impl Caption {
    pub fn new(caption: &str, text1: &str, text2: &str) -> Self {
        Self {
            caption: clip(caption, MAX_CAPTION_CHARS),
            text1: clip(text1, MAX_CAPTION_CHARS),
            text2: clip(text2, MAX_CAPTION_CHARS),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.caption.is_empty() && self.text1.is_empty() && self.text2.is_empty()
    }
}

/// Category names double as folder names: lowercase ascii, digits, `_` and `-`
pub fn is_category_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
}

/// Trim and cut a string to at most `max` characters
pub fn clip(text: &str, max: usize) -> String {
    text.trim().chars().take(max).collect::<String>().trim_end().to_string()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VoteValue {
    Approve,
    Neutral,
    Reject,
}

impl VoteValue {
    /// Points awarded to the meme's creator
    pub fn points(self) -> u32 {
        match self {
            VoteValue::Approve => 2,
            VoteValue::Neutral => 1,
            VoteValue::Reject => 0,
        }
    }
}

impl TryFrom<i64> for VoteValue {
    type Error = crate::error::GameError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(VoteValue::Approve),
            0 => Ok(VoteValue::Neutral),
            -1 => Ok(VoteValue::Reject),
            _ => Err(crate::error::GameError::InvalidVote),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
    pub ready: bool,
    pub rerolls_left: u32,
}

impl Player {
    pub fn new(id: PlayerId, name: &str) -> Self {
        let name = clip(name, MAX_NAME_CHARS);
        Self {
            id,
            name: if name.is_empty() {
                DEFAULT_PLAYER_NAME.to_string()
            } else {
                name
            },
            score: 0,
            ready: false,
            rerolls_left: REROLLS_PER_ROUND,
        }
    }
}

/// Public view of a player in join order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    pub player_id: PlayerId,
    pub name: String,
    pub score: u32,
    pub is_host: bool,
}

/// The meme currently up for voting
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemeView {
    pub creator_id: PlayerId,
    pub creator_name: String,
    pub caption: String,
    pub text1: String,
    pub text2: String,
    pub template: Template,
    /// 1-based position in the presentation order
    pub index: usize,
    pub total: usize,
}

/// One player's line in the round results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoundEntry {
    pub player_id: PlayerId,
    pub player_name: String,
    pub caption: String,
    pub text1: String,
    pub text2: String,
    pub template: Option<Template>,
    pub round_score: u32,
    pub total_score: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub player_id: PlayerId,
    pub name: String,
    pub score: u32,
}
