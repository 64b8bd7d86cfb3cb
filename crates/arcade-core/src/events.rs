use serde::{Deserialize, Serialize};

/// Final tally handed to the reward layer when a session ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinalStats {
    pub score: u64,
    pub max_combo: f64,
    pub duration_ms: f32,
    pub success_count: u32,
    pub fail_count: u32,
}

/// Difficulty channel raised when a wall is passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DifficultyChannel {
    SpawnRate,
    GapWidth,
    PlayerSpeed,
}

impl DifficultyChannel {
    pub const ALL: [DifficultyChannel; 3] = [
        DifficultyChannel::SpawnRate,
        DifficultyChannel::GapWidth,
        DifficultyChannel::PlayerSpeed,
    ];
}

/// Events emitted by a session and its minigame variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GameEvent {
    Start,
    End(FinalStats),
    Pause,
    Resume,
    Score {
        points_added: u64,
        total_score: u64,
    },
    Combo {
        combo: f64,
        is_new_max: bool,
    },
    ComboReset,
    TimeWarning {
        remaining_ms: f32,
    },
    TimeUp,
    ObstacleSpawned {
        id: u64,
        gap_start: f32,
        gap_width: f32,
    },
    ObstaclePassed {
        id: u64,
        walls_passed: u32,
        channel: DifficultyChannel,
    },
    Collision {
        obstacle_id: u64,
    },
    CharCorrect {
        ch: char,
        position: usize,
    },
    CharWrong {
        expected: char,
        got: char,
    },
    SequenceComplete {
        length: usize,
        bonus: u64,
    },
}

/// Payload-free tag used to subscribe to a class of [`GameEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    Start,
    End,
    Pause,
    Resume,
    Score,
    Combo,
    ComboReset,
    TimeWarning,
    TimeUp,
    ObstacleSpawned,
    ObstaclePassed,
    Collision,
    CharCorrect,
    CharWrong,
    SequenceComplete,
}

impl EventKind {
    pub const ALL: [EventKind; 15] = [
        EventKind::Start,
        EventKind::End,
        EventKind::Pause,
        EventKind::Resume,
        EventKind::Score,
        EventKind::Combo,
        EventKind::ComboReset,
        EventKind::TimeWarning,
        EventKind::TimeUp,
        EventKind::ObstacleSpawned,
        EventKind::ObstaclePassed,
        EventKind::Collision,
        EventKind::CharCorrect,
        EventKind::CharWrong,
        EventKind::SequenceComplete,
    ];
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::Start => EventKind::Start,
            GameEvent::End(_) => EventKind::End,
            GameEvent::Pause => EventKind::Pause,
            GameEvent::Resume => EventKind::Resume,
            GameEvent::Score { .. } => EventKind::Score,
            GameEvent::Combo { .. } => EventKind::Combo,
            GameEvent::ComboReset => EventKind::ComboReset,
            GameEvent::TimeWarning { .. } => EventKind::TimeWarning,
            GameEvent::TimeUp => EventKind::TimeUp,
            GameEvent::ObstacleSpawned { .. } => EventKind::ObstacleSpawned,
            GameEvent::ObstaclePassed { .. } => EventKind::ObstaclePassed,
            GameEvent::Collision { .. } => EventKind::Collision,
            GameEvent::CharCorrect { .. } => EventKind::CharCorrect,
            GameEvent::CharWrong { .. } => EventKind::CharWrong,
            GameEvent::SequenceComplete { .. } => EventKind::SequenceComplete,
        }
    }
}
