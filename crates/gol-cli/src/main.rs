//! Terminal host for the toroidal Game of Life simulator.

mod telemetry;

use anyhow::{Context, Result};
use gol_core::SimulationConfig;
use gol_sim::{Simulator, SystemClock, TextSink};
use tokio::signal;
use tokio::time::{sleep, Duration};
use tracing::info;

/// Upper bound on how long the host loop idles with no timer pending
const IDLE_WAIT: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_telemetry()?;

    // Load configuration
    let config = match std::env::var("GOL_CONFIG") {
        Ok(path) => SimulationConfig::from_json_file(&path)
            .with_context(|| format!("failed to load config from {}", path))?,
        Err(_) => SimulationConfig::default(),
    };
    config.validate()?;

    info!(
        "Starting {}x{} simulation, {} generation(s) per tick",
        config.width, config.height, config.step_size
    );

    let sink = TextSink::new(std::io::stdout()).with_cursor_home(true);
    let mut sim = Simulator::from_config(&config, SystemClock::new(), sink)?;
    sim.play();

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        let wait = sim.clock().time_until_next().unwrap_or(IDLE_WAIT);

        tokio::select! {
            _ = sleep(wait) => {
                sim.pump();
            }
            _ = &mut shutdown => {
                break;
            }
        }
    }

    sim.pause();
    info!(
        generation = sim.engine().generation(),
        population = sim.engine().population(),
        ticks = sim.ticks(),
        "Simulation stopped"
    );

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
