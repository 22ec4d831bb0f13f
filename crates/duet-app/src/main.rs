mod config;
mod input;
mod terminal;

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use config::ProcessEnv;
use duet_proc::TokioSpawner;
use duet_session::Controller;
use duet_store::{History, SqliteStore};
use input::AppEvent;
use terminal::{RawModeGuard, TerminalDisplay};
use tokio::sync::mpsc;

fn main() -> Result<()> {
    let env = ProcessEnv;

    // Set up the ~/.duet directory (or $DUET_HOME).
    let duet_home = config::data_dir(&env)
        .context("could not determine data directory; set DUET_HOME or HOME")?;
    fs::create_dir_all(&duet_home)
        .with_context(|| format!("failed to create {}", duet_home.display()))?;

    init_logging(&duet_home.join("duet.log"), &config::log_filter(&env))?;
    log::info!("duet v{} starting up", env!("CARGO_PKG_VERSION"));

    // Open (or create) the SQLite database at ~/.duet/duet.db.
    let db_path = duet_home.join("duet.db");
    let db = duet_store::open(&db_path)
        .with_context(|| format!("failed to open database {}", db_path.display()))?;

    // Seed default settings on first launch.
    config::seed_defaults(&db).context("failed to seed settings")?;
    let controller_config =
        config::controller_config(&env, &db).context("failed to read settings")?;
    log::info!(
        "shell `{} {}`, assistant `{}`",
        controller_config.shell.program,
        controller_config.shell.flag,
        controller_config.assistant_program
    );

    let markup_rules = config::markup_rules(&db).context("failed to read settings")?;

    let history = History::load(SqliteStore::new(db));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    let _raw_mode = RawModeGuard::enable().context("failed to enable raw mode")?;

    runtime.block_on(async move {
        let (input_tx, mut input_rx) = mpsc::unbounded_channel();
        input::spawn_input_thread(input_tx).context("failed to spawn input thread")?;

        let (spawner, mut job_rx) = TokioSpawner::channel();
        let mut controller = Controller::new(
            TerminalDisplay::stdout(),
            spawner,
            history,
            controller_config,
        );
        controller.start();
        if let Some(rules) = &markup_rules {
            let rules: Vec<(&str, &str)> =
                rules.iter().map(|(p, r)| (p.as_str(), r.as_str())).collect();
            if controller.set_markup_rules(&rules) {
                log::info!("using {} custom markup rules", rules.len());
            }
        }

        loop {
            tokio::select! {
                event = input_rx.recv() => match event {
                    Some(AppEvent::Input(text)) => controller.handle_input(&text),
                    Some(AppEvent::Quit) | None => break,
                },
                Some(job_event) = job_rx.recv() => controller.handle_job_event(job_event),
            }
        }

        if controller.running_jobs() > 0 {
            log::info!("exiting with {} job(s) still running", controller.running_jobs());
        }
        Ok(())
    })
}

/// Log to a file; stdout belongs to the session display.
fn init_logging(path: &Path, filter: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter)
        .try_init()
        .context("failed to install logger")?;
    Ok(())
}
