use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::settings::GameSettings;
use crate::tally::VoteTally;

pub type PlayerId = usize;

/// Recorded in place of an empty clue so a pass is distinguishable from a
/// player who has not answered yet.
pub const PASSED_CLUE: &str = "—";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Civilian,
    Impostor,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub role: Role,
    pub eliminated: bool,
    pub clue: String,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            role: Role::Civilian,
            eliminated: false,
            clue: String::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.eliminated
    }

    pub fn has_clue(&self) -> bool {
        !self.clue.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Civilians,
    Impostors,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum GamePhase {
    #[default]
    NotStarted,
    RoleReveal {
        current_player_index: usize,
    },
    ClueRound {
        current_player_index: PlayerId,
        remaining_time: Option<u32>,
    },
    Discussion,
    Voting {
        votes: BTreeMap<PlayerId, u32>,
    },
    EliminationReveal {
        eliminated_player_id: PlayerId,
    },
    GameEnd {
        winner: Winner,
    },
}

impl GamePhase {
    pub fn name(&self) -> &'static str {
        match self {
            GamePhase::NotStarted => "not_started",
            GamePhase::RoleReveal { .. } => "role_reveal",
            GamePhase::ClueRound { .. } => "clue_round",
            GamePhase::Discussion => "discussion",
            GamePhase::Voting { .. } => "voting",
            GamePhase::EliminationReveal { .. } => "elimination_reveal",
            GamePhase::GameEnd { .. } => "game_end",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundHistory {
    pub round_number: u32,
    pub clues: BTreeMap<PlayerId, String>,
    pub votes: BTreeMap<PlayerId, PlayerId>,
    pub eliminated_player_id: Option<PlayerId>,
}

/// The whole observable game. The secret word is held in the open: who gets
/// to see it is decided by whoever renders a turn, not by this type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct GameState {
    pub players: Vec<Player>,
    pub secret_word: String,
    pub current_phase: GamePhase,
    pub settings: GameSettings,
    pub starting_player_id: Option<PlayerId>,
    pub round_history: Vec<RoundHistory>,
    pub ballots: VoteTally,
}

impl GameState {
    pub fn with_settings(settings: GameSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn active_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_active())
    }

    pub fn impostor_count(&self) -> usize {
        self.players
            .iter()
            .filter(|p| p.role == Role::Impostor)
            .count()
    }

    pub(crate) fn clear_clues(&mut self) {
        for player in self.players.iter_mut() {
            player.clue.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_serializes_with_type_tag() {
        let phase = GamePhase::ClueRound {
            current_player_index: 2,
            remaining_time: Some(15),
        };
        let json = serde_json::to_value(&phase).unwrap();
        assert_eq!(json["type"], "clue_round");
        assert_eq!(json["current_player_index"], 2);
        assert_eq!(json["remaining_time"], 15);
    }

    #[test]
    fn fresh_state_is_not_started() {
        let state = GameState::default();
        assert_eq!(state.current_phase, GamePhase::NotStarted);
        assert!(state.players.is_empty());
        assert!(state.secret_word.is_empty());
        assert_eq!(state.starting_player_id, None);
    }
}
