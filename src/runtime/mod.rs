use std::env;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::catalog::CatalogClient;
use crate::config;
use crate::mpris::ControlCmd;
use crate::playback::{PlaybackController, RodioBackend};

mod cli;
mod event_loop;
mod logging;
mod mpris_sync;
mod settings;
mod startup;

pub fn run() -> Result<()> {
    let (settings, settings_warning) = settings::load_settings();
    let args: Vec<String> = env::args().skip(1).collect();

    let command = cli::Command::parse(&args)?;

    // CLI commands still log; an unwritable log dir only costs the log.
    let _log_guard = match logging::init(&settings.logging) {
        Ok(guard) => Some(guard),
        Err(e) => {
            if command.is_some() {
                eprintln!("playdeck: logging disabled: {e:#}");
            }
            None
        }
    };
    if let Some(msg) = settings_warning {
        warn!("{msg}");
        if command.is_some() {
            eprintln!("playdeck: {msg}");
        }
    }

    match command {
        Some(cmd) => cli::execute(cmd, &settings),
        None => run_tui(&settings),
    }
}

fn run_tui(settings: &config::Settings) -> Result<()> {
    info!(base_url = %settings.api.base_url, "starting playdeck");

    let catalog = CatalogClient::new(&settings.api).context("building catalog client")?;
    let backend = RodioBackend::open_default(
        Duration::from_millis(settings.playback.tick_interval_ms),
        Duration::from_secs(settings.api.timeout_secs),
    )
    .context("opening audio output")?;
    let mut controller = PlaybackController::new(
        backend,
        settings.api.base_url.clone(),
        settings.playback.autoplay,
    );
    let snapshots = controller.subscribe();

    let mut app = App::new();
    if let Err(e) = startup::load_catalog(&catalog, &mut app) {
        let reason = format!("{e:#}");
        warn!(error = %reason, "initial catalog load failed");
        app.set_status(format!("catalog unavailable ({reason}); press r to retry"));
    }

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);
    mpris_sync::update_mpris(&mpris, &app, &settings.api.base_url);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = {
        let mut services = event_loop::Services {
            settings,
            controller: &mut controller,
            snapshots: &snapshots,
            catalog: &catalog,
            mpris: &mpris,
            control_rx: &control_rx,
        };
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(&mut terminal, &mut app, &mut services, &mut state)
    };

    controller.close();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("playdeck exiting");
    run_result
}

#[cfg(test)]
mod tests;
