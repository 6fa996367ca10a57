//! Background clock for turn countdowns.
//!
//! The game itself never looks at a clock. This worker is the tick source:
//! once per interval it asks the service to tick every running game.

use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

use crate::dice::Dice;
use crate::service::GameService;
use crate::store::EventStore;

/// Statistics from the countdown worker.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CountdownStats {
    /// Completed tick rounds.
    pub rounds: usize,
    /// Sum of games ticked over all rounds.
    pub games_ticked: usize,
    /// Rounds that could not list the stored games.
    pub errors: usize,
}

/// A thread that ticks running games at a fixed interval.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use dice_game::{CountdownWorker, GameConfig, GameService, HashMapEventStore, RandomDice};
///
/// let service = Arc::new(GameService::new(
///     HashMapEventStore::new(),
///     RandomDice::default(),
///     GameConfig::default(),
/// ));
/// let worker = CountdownWorker::spawn(Arc::clone(&service), Duration::from_millis(10));
/// let stats = worker.stop();
/// assert_eq!(stats.games_ticked, 0);
/// ```
pub struct CountdownWorker {
    stop_tx: Sender<()>,
    handle: Option<JoinHandle<CountdownStats>>,
}

impl CountdownWorker {
    /// Spawn a worker ticking at the configured interval.
    pub fn spawn_configured<S, D>(service: Arc<GameService<S, D>>) -> Self
    where
        S: EventStore + 'static,
        D: Dice + Send + 'static,
    {
        let interval = service.config().tick_interval();
        Self::spawn(service, interval)
    }

    pub fn spawn<S, D>(service: Arc<GameService<S, D>>, interval: Duration) -> Self
    where
        S: EventStore + 'static,
        D: Dice + Send + 'static,
    {
        let (stop_tx, stop_rx) = channel::<()>();

        let handle = thread::spawn(move || {
            let mut stats = CountdownStats::default();

            loop {
                // Sleeping on the stop channel lets stop() interrupt the wait.
                match stop_rx.recv_timeout(interval) {
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    Err(RecvTimeoutError::Timeout) => {}
                }

                match service.tick_running() {
                    Ok(ticked) => {
                        stats.games_ticked += ticked;
                        if ticked > 0 {
                            debug!(ticked, "countdown round");
                        }
                    }
                    Err(err) => {
                        stats.errors += 1;
                        warn!(error = %err, "countdown round failed");
                    }
                }
                stats.rounds += 1;
            }

            stats
        });

        Self {
            stop_tx,
            handle: Some(handle),
        }
    }

    /// Signal the worker to stop and wait for it to finish.
    pub fn stop(mut self) -> CountdownStats {
        let _ = self.stop_tx.send(());
        match self.handle.take() {
            Some(handle) => handle.join().unwrap_or_default(),
            None => CountdownStats::default(),
        }
    }

    /// Signal the worker to stop without waiting.
    pub fn signal_stop(&self) {
        let _ = self.stop_tx.send(());
    }
}

impl Drop for CountdownWorker {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
    }
}
