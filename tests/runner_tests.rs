use std::time::Duration;

use tokio::sync::watch;

use market_scanner::instrument_catalog::default_seeds;
use market_scanner::random::SeededRandom;
use market_scanner::runner::{run, IntervalTicks, ManualTicks, ScannerFrame, TickSource};
use market_scanner::MarketSimulator;

fn simulator(seed: u64) -> MarketSimulator {
    MarketSimulator::new(&default_seeds(), 60, SeededRandom::from_seed(seed)).unwrap()
}

#[tokio::test]
async fn each_tick_publishes_a_ranked_frame() {
    let sim = simulator(10);
    let (tick_tx, ticks) = ManualTicks::channel(8);
    let (_control_tx, control_rx) = watch::channel(true);
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let (frame_tx, mut frame_rx) = watch::channel(ScannerFrame::capture(&sim));
    let handle = tokio::spawn(run(sim, ticks, control_rx, shutdown_rx, frame_tx));

    for n in 1..=3u64 {
        tick_tx.send(()).await.unwrap();
        let frame = frame_rx
            .wait_for(|f| f.summary.tick_count == n)
            .await
            .unwrap()
            .clone();
        assert_eq!(frame.instruments.len(), 6);
        assert!(frame
            .instruments
            .windows(2)
            .all(|w| w[0].change_percent.abs() >= w[1].change_percent.abs()));
        assert_eq!(
            frame.summary.top_mover.as_deref(),
            Some(frame.instruments[0].symbol.as_str())
        );
    }

    drop(tick_tx);
    let sim = handle.await.unwrap();
    assert_eq!(sim.tick_count(), 3);
}

#[tokio::test]
async fn pause_freezes_snapshot_across_intervals() {
    let sim = simulator(11);
    let (tick_tx, ticks) = ManualTicks::channel(16);
    let (control_tx, control_rx) = watch::channel(true);
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let (frame_tx, mut frame_rx) = watch::channel(ScannerFrame::capture(&sim));
    let handle = tokio::spawn(run(sim, ticks, control_rx, shutdown_rx, frame_tx));

    tick_tx.send(()).await.unwrap();
    let before_pause = frame_rx
        .wait_for(|f| f.summary.tick_count == 1)
        .await
        .unwrap()
        .clone();

    control_tx.send(false).unwrap();
    for _ in 0..5 {
        tick_tx.send(()).await.unwrap();
    }
    drop(tick_tx);

    let sim = handle.await.unwrap();
    assert!(!sim.is_running());
    assert_eq!(sim.tick_count(), 1);
    assert_eq!(sim.snapshot(), before_pause.instruments);
    assert_eq!(frame_rx.borrow().instruments, before_pause.instruments);
}

#[tokio::test]
async fn resume_continues_from_frozen_state() {
    let sim = simulator(12);
    let frozen = sim.snapshot();
    // Capacity 1: a send only completes once the runner has taken the
    // previous tick, and the runner handles a tick before it yields.
    let (tick_tx, ticks) = ManualTicks::channel(1);
    let (control_tx, control_rx) = watch::channel(false);
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let (frame_tx, mut frame_rx) = watch::channel(ScannerFrame::capture(&sim));
    let handle = tokio::spawn(run(sim, ticks, control_rx, shutdown_rx, frame_tx));

    tick_tx.send(()).await.unwrap();
    tick_tx.send(()).await.unwrap();
    drop(tick_tx.reserve().await.unwrap());
    {
        let frame = frame_rx.borrow();
        assert_eq!(frame.summary.tick_count, 0);
        assert!(!frame.summary.running);
        assert_eq!(frame.instruments, frozen);
    }

    control_tx.send(true).unwrap();
    tick_tx.send(()).await.unwrap();
    let frame = frame_rx
        .wait_for(|f| f.summary.tick_count == 1)
        .await
        .unwrap()
        .clone();
    assert!(frame.summary.running);

    // Paused ticks draw nothing, so one live tick matches one tick from the seed.
    let mut reference = simulator(12);
    assert!(reference.tick());
    assert_eq!(frame.instruments, reference.snapshot());

    drop(tick_tx);
    let sim = handle.await.unwrap();
    assert!(sim.is_running());
    assert_eq!(sim.tick_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn resume_waits_a_full_period_for_the_first_tick() {
    let period = Duration::from_millis(2_000);
    let sim = simulator(14);
    let (control_tx, control_rx) = watch::channel(false);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (frame_tx, mut frame_rx) = watch::channel(ScannerFrame::capture(&sim));
    let handle = tokio::spawn(run(
        sim,
        IntervalTicks::new(period),
        control_rx,
        shutdown_rx,
        frame_tx,
    ));

    // The 2s interval passes while paused; resume lands halfway to the next one.
    tokio::time::sleep(Duration::from_millis(3_000)).await;
    let resumed_at = tokio::time::Instant::now();
    control_tx.send(true).unwrap();

    frame_rx
        .wait_for(|f| f.summary.tick_count == 1)
        .await
        .unwrap();
    assert!(resumed_at.elapsed() >= period);

    shutdown_tx.send(true).unwrap();
    let sim = handle.await.unwrap();
    assert_eq!(sim.tick_count(), 1);
}

#[tokio::test]
async fn shutdown_stops_the_runner() {
    let sim = simulator(13);
    let (_tick_tx, ticks) = ManualTicks::channel(1);
    let (_control_tx, control_rx) = watch::channel(true);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (frame_tx, _frame_rx) = watch::channel(ScannerFrame::capture(&sim));
    let handle = tokio::spawn(run(sim, ticks, control_rx, shutdown_rx, frame_tx));

    shutdown_tx.send(true).unwrap();
    let sim = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("runner did not stop")
        .unwrap();
    assert_eq!(sim.tick_count(), 0);
}

#[test]
fn manual_ticks_wait_for_a_send() {
    let (_tx, mut ticks) = ManualTicks::channel(1);
    let mut next = tokio_test::task::spawn(ticks.next_tick());
    tokio_test::assert_pending!(next.poll());
}

#[tokio::test(start_paused = true)]
async fn interval_ticks_wait_one_full_period() {
    let period = Duration::from_millis(2_000);
    let mut ticks = IntervalTicks::new(period);
    assert_eq!(ticks.period(), period);

    let start = tokio::time::Instant::now();
    assert!(ticks.next_tick().await);
    assert!(start.elapsed() >= period);
    assert!(ticks.next_tick().await);
    assert!(start.elapsed() >= period * 2);
}

#[tokio::test(start_paused = true)]
async fn interval_resume_restarts_the_period() {
    let period = Duration::from_millis(2_000);
    let mut ticks = IntervalTicks::new(period);

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    ticks.resume();
    let resumed_at = tokio::time::Instant::now();
    assert!(ticks.next_tick().await);
    assert!(resumed_at.elapsed() >= period);
}
