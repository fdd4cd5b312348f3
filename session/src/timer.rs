use std::time::Duration;

use game_core::PlayerId;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TimerTick {
    pub generation: u64,
    pub player_id: PlayerId,
}

struct Running {
    player_id: PlayerId,
    handle: JoinHandle<()>,
}

/// Countdown for the current clue turn. At most one is live; each start or
/// cancel moves to a new generation so ticks already queued by an older
/// countdown can be recognized and dropped.
#[derive(Default)]
pub(crate) struct TurnTimer {
    generation: u64,
    running: Option<Running>,
}

impl TurnTimer {
    pub fn start(&mut self, player_id: PlayerId, seconds: u32, ticks: mpsc::Sender<TimerTick>) {
        self.cancel();
        let generation = self.generation;
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            for _ in 0..seconds {
                interval.tick().await;
                let tick = TimerTick {
                    generation,
                    player_id,
                };
                if ticks.send(tick).await.is_err() {
                    break;
                }
            }
        });
        self.running = Some(Running { player_id, handle });
    }

    pub fn cancel(&mut self) {
        self.generation += 1;
        if let Some(running) = self.running.take() {
            running.handle.abort();
        }
    }

    pub fn is_running_for(&self, player_id: PlayerId) -> bool {
        self.running
            .as_ref()
            .is_some_and(|running| running.player_id == player_id)
    }

    pub fn accepts(&self, tick: &TimerTick) -> bool {
        tick.generation == self.generation && self.is_running_for(tick.player_id)
    }
}

impl Drop for TurnTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
