use super::config;
use crate::interface_adapters::clock::SystemClock;
use crate::interface_adapters::controls::{HeadlessDrawTool, HeadlessGeocoder, LoggingNamingDialog};
use crate::interface_adapters::fixtures::FixtureDataSource;
use crate::interface_adapters::headless::HeadlessSurface;
use crate::interface_adapters::operator::read_operator_commands;
use crate::use_cases::{MapCommand, MapSession, SessionPorts, map_task};
use std::io;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::sync::{Notify, mpsc};
use tracing::{error, info};

/// Runs a headless map session fed by operator commands on stdin.
pub async fn run() -> io::Result<()> {
    let tuning = match config::load_tuning(config::tuning_file().as_deref()) {
        Ok(tuning) => tuning,
        Err(error) => {
            error!(%error, "failed to load tuning");
            return Err(io::Error::new(io::ErrorKind::InvalidInput, error));
        }
    };

    let source = match config::fixtures_dir() {
        Some(dir) => FixtureDataSource::from_dir(dir, config::fetch_delay()),
        None => FixtureDataSource::embedded(config::fetch_delay()),
    };

    let surface = HeadlessSurface::new();
    let mut session = MapSession::new(
        SessionPorts {
            surface: surface.clone(),
            draw: HeadlessDrawTool::new(),
            geocoder: HeadlessGeocoder::new(),
            dialog: LoggingNamingDialog::new(),
            clock: SystemClock,
        },
        tuning,
    );
    session.load(&source).await;

    // command_tx/rx: operator input goes to the single map task.
    let (command_tx, command_rx) = mpsc::channel::<MapCommand>(config::COMMAND_CHANNEL_CAPACITY);
    let shutdown = Arc::new(Notify::new());

    tokio::spawn(read_operator_commands(
        BufReader::new(tokio::io::stdin()),
        command_tx,
    ));

    let ctrl_c = Arc::clone(&shutdown);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.notify_one();
        }
    });

    if let Some(limit) = config::run_for() {
        let deadline = Arc::clone(&shutdown);
        tokio::spawn(async move {
            tokio::time::sleep(limit).await;
            info!(?limit, "run time limit reached");
            deadline.notify_one();
        });
    }

    info!(frame_interval = ?config::frame_interval(), "map session running");
    let session = map_task(session, command_rx, config::frame_interval(), shutdown).await;

    let snapshot = session.snapshot();
    info!(
        trackers = snapshot.trackers,
        zones = snapshot.zones,
        tasks = snapshot.tasks,
        leftover_layers = surface.layer_ids().len(),
        "map session finished"
    );
    Ok(())
}
