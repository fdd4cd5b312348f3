use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

mod model;
pub mod roles;
pub mod rotation;
mod settings;
pub mod tally;
pub mod win;
mod words;

pub use model::{GamePhase, GameState, Player, PlayerId, Role, RoundHistory, Winner, PASSED_CLUE};
pub use settings::{
    Difficulty, GameSettings, SetupLimits, ThemeMode, TieVoteBehavior, DEFAULT_TIMER_SECS,
    MAX_TIMER_SECS, MIN_TIMER_SECS,
};
pub use tally::VoteTally;
pub use words::{WordBank, WordProvider};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Intent {
    StartGame {
        names: Vec<String>,
        impostor_count: usize,
    },
    RevealNextRole,
    SubmitClue {
        text: String,
    },
    Tick {
        player_id: PlayerId,
    },
    StartVoting,
    CastVote {
        voter_id: PlayerId,
        candidate_id: PlayerId,
    },
    FinalizeVoting,
    ContinueAfterElimination,
    UpdateSettings {
        settings: GameSettings,
    },
    ResetGame,
}

impl Intent {
    pub fn cancels_turn_timer(&self) -> bool {
        matches!(
            self,
            Intent::StartGame { .. } | Intent::SubmitClue { .. } | Intent::ResetGame
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum GameEvent {
    GameStarted {
        players: usize,
        impostors: usize,
        starting_player_id: PlayerId,
    },
    RoleRevealed {
        player_id: PlayerId,
    },
    TurnStarted {
        player_id: PlayerId,
        remaining_time: Option<u32>,
    },
    TimerTicked {
        player_id: PlayerId,
        remaining_time: u32,
    },
    ClueSubmitted {
        player_id: PlayerId,
        clue: String,
        timed_out: bool,
    },
    DiscussionStarted,
    VotingStarted,
    VoteCast {
        voter_id: PlayerId,
        candidate_id: PlayerId,
    },
    TieResolved {
        tied: Vec<PlayerId>,
        behavior: TieVoteBehavior,
    },
    PlayerEliminated {
        player_id: PlayerId,
        role: Role,
    },
    GameFinished {
        winner: Winner,
    },
    SettingsUpdated,
    GameReset,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("intent not valid in the current phase")]
    WrongPhase,
    #[error("at least {} players are required", SetupLimits::MIN_PLAYERS)]
    TooFewPlayers,
    #[error("impostor count must leave at least one civilian")]
    InvalidImpostorCount,
    #[error("word list is empty")]
    EmptyWordList,
    #[error("player not found")]
    UnknownPlayer,
    #[error("player already eliminated")]
    EliminatedPlayer,
    #[error("self voting is disabled")]
    SelfVoteNotAllowed,
    #[error("timer tick does not match the current turn")]
    StaleTick,
}

/// Applies one intent to the game. On error the state is left exactly as it
/// was, so a rejected intent is a no-op that the caller can still observe.
pub fn apply_intent<R: Rng>(
    state: &mut GameState,
    intent: Intent,
    rng: &mut R,
    words: &dyn WordProvider,
) -> Result<Vec<GameEvent>, GameError> {
    let mut events = Vec::new();
    match intent {
        Intent::StartGame {
            names,
            impostor_count,
        } => start_game(state, &names, impostor_count, rng, words, &mut events)?,
        Intent::RevealNextRole => reveal_next_role(state, &mut events)?,
        Intent::SubmitClue { text } => submit_clue(state, &text, false, &mut events)?,
        Intent::Tick { player_id } => tick(state, player_id, &mut events)?,
        Intent::StartVoting => start_voting(state, &mut events)?,
        Intent::CastVote {
            voter_id,
            candidate_id,
        } => cast_vote(state, voter_id, candidate_id, &mut events)?,
        Intent::FinalizeVoting => finalize_voting(state, rng, &mut events)?,
        Intent::ContinueAfterElimination => continue_after_elimination(state, &mut events)?,
        Intent::UpdateSettings { settings } => {
            // The running turn keeps its remaining time; new turns pick this up.
            state.settings = settings.normalized();
            events.push(GameEvent::SettingsUpdated);
        }
        Intent::ResetGame => {
            *state = GameState::with_settings(state.settings.clone());
            events.push(GameEvent::GameReset);
        }
    }
    Ok(events)
}

fn display_name(id: PlayerId, raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        format!("Player {}", id + 1)
    } else {
        trimmed.to_string()
    }
}

fn start_game<R: Rng>(
    state: &mut GameState,
    names: &[String],
    impostor_count: usize,
    rng: &mut R,
    words: &dyn WordProvider,
    events: &mut Vec<GameEvent>,
) -> Result<(), GameError> {
    if names.len() < SetupLimits::MIN_PLAYERS {
        return Err(GameError::TooFewPlayers);
    }
    if impostor_count == 0 || impostor_count >= names.len() {
        return Err(GameError::InvalidImpostorCount);
    }

    let mut players: Vec<Player> = names
        .iter()
        .enumerate()
        .map(|(id, name)| Player::new(id, display_name(id, name)))
        .collect();
    roles::assign_roles(&mut players, impostor_count, rng);

    let secret_word = words.draw(state.settings.difficulty, rng);
    if secret_word.is_empty() {
        return Err(GameError::EmptyWordList);
    }
    let starting_player_id =
        roles::choose_starting_player(&players, rng).ok_or(GameError::InvalidImpostorCount)?;

    events.push(GameEvent::GameStarted {
        players: players.len(),
        impostors: impostor_count,
        starting_player_id,
    });

    *state = GameState {
        players,
        secret_word,
        current_phase: GamePhase::RoleReveal {
            current_player_index: 0,
        },
        settings: state.settings.clone(),
        starting_player_id: Some(starting_player_id),
        round_history: Vec::new(),
        ballots: VoteTally::new(),
    };
    Ok(())
}

fn reveal_next_role(state: &mut GameState, events: &mut Vec<GameEvent>) -> Result<(), GameError> {
    let current = match state.current_phase {
        GamePhase::RoleReveal {
            current_player_index,
        } => current_player_index,
        _ => return Err(GameError::WrongPhase),
    };

    events.push(GameEvent::RoleRevealed { player_id: current });
    let next = current + 1;
    if next < state.players.len() {
        state.current_phase = GamePhase::RoleReveal {
            current_player_index: next,
        };
    } else {
        start_clue_round(state, events);
    }
    Ok(())
}

/// Every round opens with the same starting player. If they have been voted
/// out, the next active player in roster order opens instead.
fn start_clue_round(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let origin = state.starting_player_id.unwrap_or(0);
    match rotation::first_active_from(&state.players, origin) {
        Some(player_id) => begin_turn(state, player_id, events),
        None => open_discussion(state, events),
    }
}

fn begin_turn(state: &mut GameState, player_id: PlayerId, events: &mut Vec<GameEvent>) {
    let remaining_time = state.settings.turn_seconds();
    state.current_phase = GamePhase::ClueRound {
        current_player_index: player_id,
        remaining_time,
    };
    events.push(GameEvent::TurnStarted {
        player_id,
        remaining_time,
    });
}

fn open_discussion(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.current_phase = GamePhase::Discussion;
    events.push(GameEvent::DiscussionStarted);
}

fn submit_clue(
    state: &mut GameState,
    text: &str,
    timed_out: bool,
    events: &mut Vec<GameEvent>,
) -> Result<(), GameError> {
    let current = match state.current_phase {
        GamePhase::ClueRound {
            current_player_index,
            ..
        } => current_player_index,
        _ => return Err(GameError::WrongPhase),
    };

    let clue = match text.trim() {
        "" => PASSED_CLUE.to_string(),
        trimmed => trimmed.to_string(),
    };
    let player = state
        .players
        .get_mut(current)
        .ok_or(GameError::UnknownPlayer)?;
    player.clue = clue.clone();
    events.push(GameEvent::ClueSubmitted {
        player_id: current,
        clue,
        timed_out,
    });

    let next = rotation::next_active(&state.players, current);
    let everyone_answered = state.active_players().all(Player::has_clue);
    match next {
        Some(next) if !everyone_answered => begin_turn(state, next, events),
        _ => open_discussion(state, events),
    }
    Ok(())
}

fn tick(
    state: &mut GameState,
    player_id: PlayerId,
    events: &mut Vec<GameEvent>,
) -> Result<(), GameError> {
    let remaining = match state.current_phase {
        GamePhase::ClueRound {
            current_player_index,
            remaining_time: Some(remaining),
        } if current_player_index == player_id => remaining,
        _ => return Err(GameError::StaleTick),
    };

    let remaining = remaining.saturating_sub(1);
    if remaining == 0 {
        return submit_clue(state, "", true, events);
    }
    state.current_phase = GamePhase::ClueRound {
        current_player_index: player_id,
        remaining_time: Some(remaining),
    };
    events.push(GameEvent::TimerTicked {
        player_id,
        remaining_time: remaining,
    });
    Ok(())
}

fn start_voting(state: &mut GameState, events: &mut Vec<GameEvent>) -> Result<(), GameError> {
    if !matches!(state.current_phase, GamePhase::Discussion) {
        return Err(GameError::WrongPhase);
    }
    state.ballots.clear();
    state.current_phase = GamePhase::Voting {
        votes: BTreeMap::new(),
    };
    events.push(GameEvent::VotingStarted);
    Ok(())
}

fn cast_vote(
    state: &mut GameState,
    voter_id: PlayerId,
    candidate_id: PlayerId,
    events: &mut Vec<GameEvent>,
) -> Result<(), GameError> {
    if !matches!(state.current_phase, GamePhase::Voting { .. }) {
        return Err(GameError::WrongPhase);
    }
    let voter = state.player(voter_id).ok_or(GameError::UnknownPlayer)?;
    let candidate = state.player(candidate_id).ok_or(GameError::UnknownPlayer)?;
    if !voter.is_active() || !candidate.is_active() {
        return Err(GameError::EliminatedPlayer);
    }
    if voter_id == candidate_id && !state.settings.allow_self_voting {
        return Err(GameError::SelfVoteNotAllowed);
    }

    state.ballots.cast(voter_id, candidate_id);
    state.current_phase = GamePhase::Voting {
        votes: state.ballots.counts(&state.players),
    };
    events.push(GameEvent::VoteCast {
        voter_id,
        candidate_id,
    });
    Ok(())
}

fn finalize_voting<R: Rng>(
    state: &mut GameState,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) -> Result<(), GameError> {
    if !matches!(state.current_phase, GamePhase::Voting { .. }) {
        return Err(GameError::WrongPhase);
    }
    if state.ballots.is_empty() {
        open_discussion(state, events);
        return Ok(());
    }

    let counts = state.ballots.counts(&state.players);
    let tied = tally::leaders(&counts);
    match tied.as_slice() {
        [] => open_discussion(state, events),
        [single] => eliminate(state, *single, events),
        _ => {
            let behavior = state.settings.tie_vote_behavior;
            events.push(GameEvent::TieResolved {
                tied: tied.clone(),
                behavior,
            });
            match behavior {
                TieVoteBehavior::RandomElimination => {
                    let chosen = tied[rng.gen_range(0..tied.len())];
                    eliminate(state, chosen, events);
                }
                TieVoteBehavior::NoElimination => {
                    state.clear_clues();
                    open_discussion(state, events);
                }
                TieVoteBehavior::Revote => {
                    state.ballots.clear();
                    state.current_phase = GamePhase::Voting {
                        votes: BTreeMap::new(),
                    };
                    events.push(GameEvent::VotingStarted);
                }
            }
        }
    }
    Ok(())
}

fn eliminate(state: &mut GameState, player_id: PlayerId, events: &mut Vec<GameEvent>) {
    let clues = state
        .players
        .iter()
        .map(|p| (p.id, p.clue.clone()))
        .collect();
    let votes = state.ballots.ballots().clone();

    let Some(player) = state.players.get_mut(player_id) else {
        open_discussion(state, events);
        return;
    };
    player.eliminated = true;
    let role = player.role;

    let round_number = state.round_history.len() as u32 + 1;
    state.round_history.push(RoundHistory {
        round_number,
        clues,
        votes,
        eliminated_player_id: Some(player_id),
    });
    state.current_phase = GamePhase::EliminationReveal {
        eliminated_player_id: player_id,
    };
    events.push(GameEvent::PlayerEliminated { player_id, role });
}

fn continue_after_elimination(
    state: &mut GameState,
    events: &mut Vec<GameEvent>,
) -> Result<(), GameError> {
    if !matches!(state.current_phase, GamePhase::EliminationReveal { .. }) {
        return Err(GameError::WrongPhase);
    }

    match win::evaluate_winner(&state.players) {
        Some(winner) => {
            state.current_phase = GamePhase::GameEnd { winner };
            events.push(GameEvent::GameFinished { winner });
        }
        None => {
            state.clear_clues();
            start_clue_round(state, events);
        }
    }
    Ok(())
}
