use serde::{Deserialize, Serialize};

pub const MIN_TIMER_SECS: u32 = 15;
pub const MAX_TIMER_SECS: u32 = 120;
pub const DEFAULT_TIMER_SECS: u32 = 30;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TieVoteBehavior {
    #[default]
    NoElimination,
    RandomElimination,
    Revote,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    #[default]
    System,
    Light,
    Dark,
}

/// User preferences that shape a game. Missing fields deserialize to defaults
/// so older preference files keep loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GameSettings {
    pub timer_enabled: bool,
    pub timer_duration: u32,
    pub difficulty: Difficulty,
    pub allow_self_voting: bool,
    pub tie_vote_behavior: TieVoteBehavior,
    pub theme_mode: ThemeMode,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            timer_enabled: false,
            timer_duration: DEFAULT_TIMER_SECS,
            difficulty: Difficulty::Medium,
            allow_self_voting: false,
            tie_vote_behavior: TieVoteBehavior::NoElimination,
            theme_mode: ThemeMode::System,
        }
    }
}

impl GameSettings {
    pub fn normalized(mut self) -> Self {
        self.timer_duration = self.timer_duration.clamp(MIN_TIMER_SECS, MAX_TIMER_SECS);
        self
    }

    pub fn turn_seconds(&self) -> Option<u32> {
        self.timer_enabled.then_some(self.timer_duration)
    }
}

/// Bounds the setup screen offers. The rules only require `3 <= players` and
/// `1 <= impostors < players`; these are the tighter limits a UI presents.
pub struct SetupLimits;

impl SetupLimits {
    pub const MIN_PLAYERS: usize = 3;
    pub const MAX_PLAYERS: usize = 12;
    pub const MAX_IMPOSTORS: usize = 3;

    pub fn max_impostors(players: usize) -> usize {
        Self::MAX_IMPOSTORS.min(players.saturating_sub(1))
    }

    pub fn accepts(players: usize, impostors: usize) -> bool {
        (Self::MIN_PLAYERS..=Self::MAX_PLAYERS).contains(&players)
            && (1..=Self::max_impostors(players)).contains(&impostors)
    }
}
