use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

use market_scanner::config::Config;
use market_scanner::input::parse_command;
use market_scanner::random::SeededRandom;
use market_scanner::runner::{self, IntervalTicks, ScannerFrame};
use market_scanner::MarketSimulator;

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        config
            .logging
            .level
            .parse()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    });
    // stdout carries JSON frames, logs go to stderr
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.logging.json {
        builder.with_ansi(false).json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config);

    let period = config.simulation.refresh_interval()?;
    let seeds = config.seeds();
    tracing::info!(
        instruments = seeds.len(),
        refresh_ms = period.as_millis() as u64,
        seed = ?config.simulation.seed,
        live = config.simulation.start_live,
        "Starting market-scanner"
    );

    let rng = SeededRandom::from_optional_seed(config.simulation.seed);
    let simulator = MarketSimulator::new(&seeds, config.simulation.window_len, rng)
        .context("failed to initialize simulator")?;

    let (control_tx, control_rx) = watch::channel(config.simulation.start_live);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (frame_tx, mut frame_rx) = watch::channel(ScannerFrame::capture(&simulator));

    let runner_handle = tokio::spawn(runner::run(
        simulator,
        IntervalTicks::new(period),
        control_rx,
        shutdown_rx,
        frame_tx,
    ));

    if config.output.json_snapshots {
        tokio::spawn(async move {
            loop {
                let line = {
                    let frame = frame_rx.borrow_and_update();
                    serde_json::to_string(&*frame)
                };
                match line {
                    Ok(line) => println!("{}", line),
                    Err(e) => tracing::error!(error = %e, "Failed to encode frame"),
                }
                if frame_rx.changed().await.is_err() {
                    break;
                }
            }
        });
    }

    let input_shutdown = shutdown_tx.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read operator input");
                    break;
                }
            };
            let Some(cmd) = parse_command(&line) else {
                tracing::warn!(input = %line.trim(), "Unknown command (p/r/t/q)");
                continue;
            };
            let running = *control_tx.borrow();
            match cmd.apply(running) {
                Some(next) => {
                    let _ = control_tx.send(next);
                }
                None => {
                    let _ = input_shutdown.send(true);
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupt received");
            let _ = shutdown_tx.send(true);
        }
        _ = shutdown_wait(shutdown_tx.subscribe()) => {}
    }

    let simulator = runner_handle.await.context("simulation runner panicked")?;
    let summary = simulator.summary();
    tracing::info!(
        ticks = summary.tick_count,
        top_mover = ?summary.top_mover,
        "market-scanner stopped"
    );
    Ok(())
}

async fn shutdown_wait(mut rx: watch::Receiver<bool>) {
    while !*rx.borrow_and_update() {
        if rx.changed().await.is_err() {
            return;
        }
    }
}
