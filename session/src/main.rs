use std::sync::Arc;

use game_core::{GameEvent, GameSettings, WordBank, WordProvider};
use serde::Serialize;
use session::console::{self, ConsoleCommand, ParseError};
use session::{telemetry, SessionConfig, SessionHandle, SettingsStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

#[tokio::main]
async fn main() {
    telemetry::init_tracing();
    let config = SessionConfig::from_env();
    let store = match &config.settings_path {
        Some(path) => SettingsStore::with_persistence(path.clone()).await,
        None => SettingsStore::in_memory(GameSettings::default()),
    };
    let session = SessionHandle::spawn(&config, store, Arc::new(WordBank));

    // Timer-driven changes happen between commands, so echo them as they land.
    let mut events = session.events();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(GameEvent::TimerTicked { .. }) => {}
                Ok(event) => print_json("event", &event),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    });

    println!("{}", console::HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let command = match console::parse_line(&line) {
            Ok(command) => command,
            Err(ParseError::Empty) => continue,
            Err(err) => {
                println!("error: {err}");
                continue;
            }
        };

        match command {
            ConsoleCommand::Quit => break,
            ConsoleCommand::Help => println!("{}", console::HELP),
            ConsoleCommand::Show => print_json("state", &session.state()),
            ConsoleCommand::Words(difficulty) => {
                println!("{}", WordBank.words_for(difficulty).join(", "))
            }
            ConsoleCommand::Settings(change) => {
                let settings = change.apply(session.state().settings);
                match session.update_settings(settings).await {
                    Ok(()) => print_json("settings", &session.state().settings),
                    Err(err) => println!("error: {err}"),
                }
            }
            ConsoleCommand::Intent(intent) => match session.dispatch(intent).await {
                Ok(_) => print_json("phase", &session.state().current_phase),
                Err(err) => println!("error: {err}"),
            },
        }
    }
}

fn print_json<T: Serialize>(label: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => println!("{label}: {json}"),
        Err(err) => eprintln!("failed to encode {label}: {err}"),
    }
}
