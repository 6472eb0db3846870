use std::thread;
use std::time::{Duration, Instant};

use scaffolder_core::{update, AppState, Msg};

use crate::effects::EffectRunner;

/// Drives the pure core against the engine: messages go through `update`,
/// the resulting effects are handed to the engine, and completions are
/// pumped back in as messages.
pub struct AppDriver {
    state: AppState,
    runner: EffectRunner,
    in_flight: usize,
}

impl AppDriver {
    pub fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        // Every engine command answers with exactly one event.
        self.in_flight += effects.len();
        self.runner.run(effects);
    }

    /// Pump engine completions until nothing is in flight. Returns false if
    /// the timeout expired with work still outstanding.
    pub fn pump_until_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.in_flight > 0 {
            if Instant::now() > deadline {
                return false;
            }
            match self.runner.try_recv() {
                Some(msg) => {
                    self.in_flight -= 1;
                    self.dispatch(msg);
                }
                None => thread::sleep(Duration::from_millis(20)),
            }
        }
        true
    }
}
