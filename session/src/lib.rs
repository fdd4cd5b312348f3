use std::sync::Arc;

use game_core::{
    apply_intent, GameError, GameEvent, GamePhase, GameSettings, GameState, Intent, PlayerId,
    WordProvider,
};
use rand_chacha::ChaCha8Rng;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{debug, info, info_span, Span};
use uuid::Uuid;

pub mod config;
pub mod console;
pub mod preferences;
pub mod telemetry;
mod timer;

pub use config::SessionConfig;
pub use preferences::{PreferencesError, SettingsStore};

use timer::{TimerTick, TurnTimer};

const COMMAND_BUFFER: usize = 32;
const EVENT_BUFFER: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session closed")]
    Closed,
    #[error("game error: {0}")]
    Game(#[from] GameError),
    #[error("preferences error: {0}")]
    Preferences(#[from] PreferencesError),
}

struct Command {
    intent: Intent,
    reply: oneshot::Sender<Result<Vec<GameEvent>, GameError>>,
}

#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    state: watch::Receiver<GameState>,
    events: broadcast::Sender<GameEvent>,
    store: SettingsStore,
}

impl SessionHandle {
    pub fn spawn(
        config: &SessionConfig,
        store: SettingsStore,
        words: Arc<dyn WordProvider + Send + Sync>,
    ) -> Self {
        let state = GameState::with_settings(store.read());
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (tick_tx, tick_rx) = mpsc::channel(COMMAND_BUFFER);
        let (state_tx, state_rx) = watch::channel(state.clone());
        let (event_tx, _) = broadcast::channel(EVENT_BUFFER);

        let actor = SessionActor {
            state,
            rng: config.rng(),
            words,
            timer: TurnTimer::default(),
            tick_tx,
            state_tx,
            event_tx: event_tx.clone(),
            game_span: Span::none(),
        };
        tokio::spawn(actor.run(command_rx, tick_rx, store.subscribe()));

        Self {
            commands: command_tx,
            state: state_rx,
            events: event_tx,
            store,
        }
    }

    pub async fn dispatch(&self, intent: Intent) -> Result<Vec<GameEvent>, SessionError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command { intent, reply })
            .await
            .map_err(|_| SessionError::Closed)?;
        let events = response.await.map_err(|_| SessionError::Closed)??;
        Ok(events)
    }

    pub fn state(&self) -> GameState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<GameState> {
        self.state.clone()
    }

    pub fn events(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    pub async fn start_game(
        &self,
        names: Vec<String>,
        impostor_count: usize,
    ) -> Result<Vec<GameEvent>, SessionError> {
        self.dispatch(Intent::StartGame {
            names,
            impostor_count,
        })
        .await
    }

    pub async fn reveal_next_role(&self) -> Result<Vec<GameEvent>, SessionError> {
        self.dispatch(Intent::RevealNextRole).await
    }

    pub async fn submit_clue(&self, text: impl Into<String>) -> Result<Vec<GameEvent>, SessionError> {
        self.dispatch(Intent::SubmitClue { text: text.into() }).await
    }

    pub async fn start_voting(&self) -> Result<Vec<GameEvent>, SessionError> {
        self.dispatch(Intent::StartVoting).await
    }

    pub async fn cast_vote(
        &self,
        voter_id: PlayerId,
        candidate_id: PlayerId,
    ) -> Result<Vec<GameEvent>, SessionError> {
        self.dispatch(Intent::CastVote {
            voter_id,
            candidate_id,
        })
        .await
    }

    pub async fn finalize_voting(&self) -> Result<Vec<GameEvent>, SessionError> {
        self.dispatch(Intent::FinalizeVoting).await
    }

    pub async fn continue_after_elimination(&self) -> Result<Vec<GameEvent>, SessionError> {
        self.dispatch(Intent::ContinueAfterElimination).await
    }

    pub async fn reset_game(&self) -> Result<Vec<GameEvent>, SessionError> {
        self.dispatch(Intent::ResetGame).await
    }

    pub async fn update_settings(&self, settings: GameSettings) -> Result<(), SessionError> {
        self.store.write(settings).await?;
        // Writes from other handles may land first; wait for whatever the store holds last.
        let mut state = self.state.clone();
        state
            .wait_for(|s| s.settings == self.store.read())
            .await
            .map_err(|_| SessionError::Closed)?;
        Ok(())
    }
}

struct SessionActor {
    state: GameState,
    rng: ChaCha8Rng,
    words: Arc<dyn WordProvider + Send + Sync>,
    timer: TurnTimer,
    tick_tx: mpsc::Sender<TimerTick>,
    state_tx: watch::Sender<GameState>,
    event_tx: broadcast::Sender<GameEvent>,
    game_span: Span,
}

impl SessionActor {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut ticks: mpsc::Receiver<TimerTick>,
        mut settings: watch::Receiver<GameSettings>,
    ) {
        let mut settings_open = true;
        loop {
            tokio::select! {
                command = commands.recv() => {
                    let Some(Command { intent, reply }) = command else {
                        break;
                    };
                    let result = self.handle(intent);
                    let _ = reply.send(result);
                }
                Some(tick) = ticks.recv() => self.handle_tick(tick),
                changed = settings.changed(), if settings_open => match changed {
                    Ok(()) => {
                        let latest = settings.borrow_and_update().clone();
                        if latest != self.state.settings {
                            let _ = self.handle(Intent::UpdateSettings { settings: latest });
                        }
                    }
                    Err(_) => settings_open = false,
                },
            }
        }
        self.timer.cancel();
        debug!("session closed");
    }

    fn handle(&mut self, intent: Intent) -> Result<Vec<GameEvent>, GameError> {
        let span = self.game_span.clone();
        let _entered = span.enter();

        // A stale tick must never land on a turn that has already moved on.
        if intent.cancels_turn_timer() {
            self.timer.cancel();
        }

        let result = apply_intent(&mut self.state, intent, &mut self.rng, self.words.as_ref());
        let turn_started = match &result {
            Ok(events) => {
                self.record(events);
                events
                    .iter()
                    .any(|e| matches!(e, GameEvent::TurnStarted { .. }))
            }
            Err(err) => {
                debug!(
                    error = %err,
                    phase = self.state.current_phase.name(),
                    "intent rejected"
                );
                false
            }
        };

        self.sync_timer(turn_started);
        self.state_tx.send_replace(self.state.clone());
        result
    }

    fn handle_tick(&mut self, tick: TimerTick) {
        if !self.timer.accepts(&tick) {
            debug!(player_id = tick.player_id, "dropping stale timer tick");
            return;
        }
        let _ = self.handle(Intent::Tick {
            player_id: tick.player_id,
        });
    }

    fn sync_timer(&mut self, turn_started: bool) {
        match self.state.current_phase {
            GamePhase::ClueRound {
                current_player_index,
                remaining_time: Some(remaining),
            } => {
                if turn_started || !self.timer.is_running_for(current_player_index) {
                    self.timer
                        .start(current_player_index, remaining, self.tick_tx.clone());
                }
            }
            _ => self.timer.cancel(),
        }
    }

    fn record(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::GameStarted {
                    players,
                    impostors,
                    ..
                } => {
                    let game_id = Uuid::new_v4();
                    self.game_span = info_span!("game", %game_id);
                    self.game_span
                        .in_scope(|| info!(players, impostors, "game started"));
                }
                GameEvent::PlayerEliminated { player_id, role } => {
                    info!(player_id, ?role, "player eliminated");
                }
                GameEvent::GameFinished { winner } => {
                    info!(?winner, "game finished");
                }
                GameEvent::GameReset => {
                    info!("game reset");
                    self.game_span = Span::none();
                }
                GameEvent::SettingsUpdated => {
                    debug!(settings = ?self.state.settings, "settings merged");
                }
                _ => {}
            }
            let _ = self.event_tx.send(event.clone());
        }
    }
}
