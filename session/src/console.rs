//! Line commands for driving a session from a terminal.

use game_core::{Difficulty, GameSettings, Intent, PlayerId, SetupLimits, TieVoteBehavior};

pub const HELP: &str = "\
commands:
  start <name,name,...> <impostors>   deal a new game
  reveal                              next player has seen their role
  clue <word> | pass                  give (or skip) the current clue
  vote-start                          open voting after discussion
  vote <voter> <candidate>            cast or change a vote (player ids)
  finalize                            close voting
  continue                            move on after an elimination
  reset                               back to the start screen
  state                               print the full game state
  words <easy|medium|hard>            list a word tier
  timer <on|off|seconds>              clue timer settings
  difficulty <easy|medium|hard>
  tie <none|random|revote>
  selfvote <on|off>
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Intent(Intent),
    Settings(SettingsChange),
    Show,
    Words(Difficulty),
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsChange {
    TimerEnabled(bool),
    TimerDuration(u32),
    Difficulty(Difficulty),
    TieBehavior(TieVoteBehavior),
    SelfVoting(bool),
}

impl SettingsChange {
    pub fn apply(self, mut settings: GameSettings) -> GameSettings {
        match self {
            SettingsChange::TimerEnabled(enabled) => settings.timer_enabled = enabled,
            SettingsChange::TimerDuration(secs) => {
                settings.timer_enabled = true;
                settings.timer_duration = secs;
            }
            SettingsChange::Difficulty(difficulty) => settings.difficulty = difficulty,
            SettingsChange::TieBehavior(behavior) => settings.tie_vote_behavior = behavior,
            SettingsChange::SelfVoting(allow) => settings.allow_self_voting = allow,
        }
        settings.normalized()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty line")]
    Empty,
    #[error("unknown command `{0}` (try `help`)")]
    UnknownCommand(String),
    #[error("missing {0}")]
    MissingArgument(&'static str),
    #[error("invalid {name}: `{value}`")]
    InvalidArgument { name: &'static str, value: String },
    #[error("setup needs {min}-{max} players and 1-{impostors} impostors")]
    Setup {
        min: usize,
        max: usize,
        impostors: usize,
    },
}

pub fn parse_line(line: &str) -> Result<ConsoleCommand, ParseError> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    let intent = match command.to_ascii_lowercase().as_str() {
        "" => return Err(ParseError::Empty),
        "start" => parse_start(rest)?,
        "reveal" => Intent::RevealNextRole,
        "clue" => Intent::SubmitClue {
            text: rest.to_string(),
        },
        "pass" => Intent::SubmitClue {
            text: String::new(),
        },
        "vote-start" | "voting" => Intent::StartVoting,
        "vote" => parse_vote(rest)?,
        "finalize" => Intent::FinalizeVoting,
        "continue" => Intent::ContinueAfterElimination,
        "reset" => Intent::ResetGame,
        "state" => return Ok(ConsoleCommand::Show),
        "help" => return Ok(ConsoleCommand::Help),
        "quit" | "exit" => return Ok(ConsoleCommand::Quit),
        "words" => return Ok(ConsoleCommand::Words(parse_difficulty(rest)?)),
        "timer" => {
            let change = match rest {
                "" => return Err(ParseError::MissingArgument("timer setting")),
                "on" => SettingsChange::TimerEnabled(true),
                "off" => SettingsChange::TimerEnabled(false),
                secs => SettingsChange::TimerDuration(parse_number("timer seconds", secs)?),
            };
            return Ok(ConsoleCommand::Settings(change));
        }
        "difficulty" => {
            return Ok(ConsoleCommand::Settings(SettingsChange::Difficulty(
                parse_difficulty(rest)?,
            )))
        }
        "tie" => {
            let behavior = match rest {
                "" => return Err(ParseError::MissingArgument("tie behavior")),
                "none" => TieVoteBehavior::NoElimination,
                "random" => TieVoteBehavior::RandomElimination,
                "revote" => TieVoteBehavior::Revote,
                other => return Err(invalid("tie behavior", other)),
            };
            return Ok(ConsoleCommand::Settings(SettingsChange::TieBehavior(
                behavior,
            )));
        }
        "selfvote" => {
            return Ok(ConsoleCommand::Settings(SettingsChange::SelfVoting(
                parse_switch(rest)?,
            )))
        }
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(ConsoleCommand::Intent(intent))
}

fn invalid(name: &'static str, value: &str) -> ParseError {
    ParseError::InvalidArgument {
        name,
        value: value.to_string(),
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, ParseError> {
    raw.parse().map_err(|_| invalid(name, raw))
}

fn parse_switch(raw: &str) -> Result<bool, ParseError> {
    match raw {
        "" => Err(ParseError::MissingArgument("on/off")),
        "on" => Ok(true),
        "off" => Ok(false),
        other => Err(invalid("switch", other)),
    }
}

fn parse_difficulty(raw: &str) -> Result<Difficulty, ParseError> {
    match raw.to_ascii_lowercase().as_str() {
        "" => Err(ParseError::MissingArgument("difficulty")),
        "easy" => Ok(Difficulty::Easy),
        "medium" => Ok(Difficulty::Medium),
        "hard" => Ok(Difficulty::Hard),
        _ => Err(invalid("difficulty", raw)),
    }
}

fn parse_start(rest: &str) -> Result<Intent, ParseError> {
    let (names, count) = rest
        .rsplit_once(char::is_whitespace)
        .ok_or(ParseError::MissingArgument("player names and impostor count"))?;
    let impostor_count: usize = parse_number("impostor count", count.trim())?;
    let names: Vec<String> = names.split(',').map(|n| n.trim().to_string()).collect();

    if !SetupLimits::accepts(names.len(), impostor_count) {
        return Err(ParseError::Setup {
            min: SetupLimits::MIN_PLAYERS,
            max: SetupLimits::MAX_PLAYERS,
            impostors: SetupLimits::max_impostors(names.len()),
        });
    }
    Ok(Intent::StartGame {
        names,
        impostor_count,
    })
}

fn parse_vote(rest: &str) -> Result<Intent, ParseError> {
    let mut parts = rest.split_whitespace();
    let voter_id: PlayerId = parse_number(
        "voter",
        parts.next().ok_or(ParseError::MissingArgument("voter"))?,
    )?;
    let candidate_id: PlayerId = parse_number(
        "candidate",
        parts.next().ok_or(ParseError::MissingArgument("candidate"))?,
    )?;
    Ok(Intent::CastVote {
        voter_id,
        candidate_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_start_with_spaced_names() {
        let command = parse_line("start Ann Lee, bob ,, dee 1").unwrap();
        assert_eq!(
            command,
            ConsoleCommand::Intent(Intent::StartGame {
                names: vec!["Ann Lee".into(), "bob".into(), String::new(), "dee".into()],
                impostor_count: 1,
            })
        );
    }

    #[test]
    fn start_respects_setup_limits() {
        assert!(matches!(
            parse_line("start a,b,c 3"),
            Err(ParseError::Setup { impostors: 2, .. })
        ));
        assert!(matches!(
            parse_line("start a,b 1"),
            Err(ParseError::Setup { .. })
        ));
        assert_eq!(
            parse_line("start a,b,c x"),
            Err(ParseError::InvalidArgument {
                name: "impostor count",
                value: "x".into()
            })
        );
    }

    #[test]
    fn parses_turn_commands() {
        assert_eq!(
            parse_line("clue  red fruit ").unwrap(),
            ConsoleCommand::Intent(Intent::SubmitClue {
                text: "red fruit".into()
            })
        );
        assert_eq!(
            parse_line("pass").unwrap(),
            ConsoleCommand::Intent(Intent::SubmitClue {
                text: String::new()
            })
        );
        assert_eq!(
            parse_line("vote 2 0").unwrap(),
            ConsoleCommand::Intent(Intent::CastVote {
                voter_id: 2,
                candidate_id: 0
            })
        );
        assert_eq!(
            parse_line("vote 2"),
            Err(ParseError::MissingArgument("candidate"))
        );
        assert_eq!(
            parse_line("FINALIZE").unwrap(),
            ConsoleCommand::Intent(Intent::FinalizeVoting)
        );
    }

    #[test]
    fn parses_settings_commands() {
        assert_eq!(
            parse_line("timer 45").unwrap(),
            ConsoleCommand::Settings(SettingsChange::TimerDuration(45))
        );
        assert_eq!(
            parse_line("tie revote").unwrap(),
            ConsoleCommand::Settings(SettingsChange::TieBehavior(TieVoteBehavior::Revote))
        );
        assert_eq!(
            parse_line("words Hard").unwrap(),
            ConsoleCommand::Words(Difficulty::Hard)
        );
        assert!(parse_line("selfvote maybe").is_err());
    }

    #[test]
    fn settings_change_applies_and_clamps() {
        let settings = SettingsChange::TimerDuration(5).apply(GameSettings::default());
        assert!(settings.timer_enabled);
        assert_eq!(settings.timer_duration, 15);

        let settings = SettingsChange::SelfVoting(true).apply(settings);
        assert!(settings.allow_self_voting);
        assert!(settings.timer_enabled);
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(parse_line("   "), Err(ParseError::Empty));
        assert_eq!(
            parse_line("dance"),
            Err(ParseError::UnknownCommand("dance".into()))
        );
    }
}
