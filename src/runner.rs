use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use crate::model::InstrumentState;
use crate::random::RandomSource;
use crate::simulator::{MarketSimulator, MarketSummary};

/// Cadence that drives the simulation.
pub trait TickSource {
    /// Resolves at the next tick. `false` means no further ticks will come.
    fn next_tick(&mut self) -> impl Future<Output = bool> + Send;

    /// Called when the simulation switches from paused to running.
    fn resume(&mut self) {}
}

/// Wall-clock cadence. The first tick fires one full period after creation.
pub struct IntervalTicks {
    interval: Interval,
}

impl IntervalTicks {
    pub fn new(period: Duration) -> Self {
        assert!(!period.is_zero(), "tick period must be > 0");
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }

    pub fn period(&self) -> Duration {
        self.interval.period()
    }
}

impl TickSource for IntervalTicks {
    async fn next_tick(&mut self) -> bool {
        self.interval.tick().await;
        true
    }

    /// Restart the phase so the first live tick is a full period away.
    fn resume(&mut self) {
        self.interval.reset();
    }
}

/// Ticks fired by hand through a channel. Ends when every sender is dropped.
pub struct ManualTicks {
    rx: mpsc::Receiver<()>,
}

impl ManualTicks {
    pub fn channel(buffer: usize) -> (mpsc::Sender<()>, Self) {
        let (tx, rx) = mpsc::channel(buffer);
        (tx, Self { rx })
    }
}

impl TickSource for ManualTicks {
    async fn next_tick(&mut self) -> bool {
        self.rx.recv().await.is_some()
    }
}

/// Everything a consumer needs after one tick, published as a unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScannerFrame {
    pub summary: MarketSummary,
    pub instruments: Vec<InstrumentState>,
}

impl ScannerFrame {
    pub fn capture<R: RandomSource>(simulator: &MarketSimulator<R>) -> Self {
        Self {
            summary: simulator.summary(),
            instruments: simulator.snapshot(),
        }
    }
}

/// Drive `simulator` from `ticks` until shutdown or the tick source ends.
///
/// `control` carries the running flag and `shutdown` stops the loop. Both are
/// polled ahead of the tick source, so a pause sent before an interval
/// elapses is honoured on that interval. A resume restarts the tick source's
/// phase through [`TickSource::resume`]. Each applied tick publishes a full
/// frame; paused intervals publish nothing. Returns the simulator in its
/// final state.
pub async fn run<R, T>(
    mut simulator: MarketSimulator<R>,
    mut ticks: T,
    mut control: watch::Receiver<bool>,
    mut shutdown: watch::Receiver<bool>,
    publish: watch::Sender<ScannerFrame>,
) -> MarketSimulator<R>
where
    R: RandomSource,
    T: TickSource,
{
    simulator.set_running(*control.borrow_and_update());
    publish.send_replace(ScannerFrame::capture(&simulator));

    let mut control_open = true;
    loop {
        tokio::select! {
            biased;
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow_and_update() {
                    tracing::info!(ticks = simulator.tick_count(), "Simulation runner shutting down");
                    break;
                }
            }
            changed = control.changed(), if control_open => {
                match changed {
                    Ok(()) => {
                        let running = *control.borrow_and_update();
                        if running && !simulator.is_running() {
                            ticks.resume();
                        }
                        simulator.set_running(running);
                    }
                    Err(_) => {
                        tracing::debug!("Control channel closed, keeping last running flag");
                        control_open = false;
                    }
                }
            }
            more = ticks.next_tick() => {
                if !more {
                    tracing::info!(ticks = simulator.tick_count(), "Tick source exhausted");
                    break;
                }
                if simulator.tick() {
                    publish.send_replace(ScannerFrame::capture(&simulator));
                }
            }
        }
    }
    simulator
}
