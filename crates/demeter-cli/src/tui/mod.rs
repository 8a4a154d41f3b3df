//! Terminal dashboard.
//!
//! Ties the poller from `demeter-core` to a ratatui event loop:
//!
//! - Terminal setup and restoration
//! - Polling in a background task, results drained every frame
//! - Keyboard input mapped to [`input::Action`]s
//! - Graceful shutdown of the poller on exit

pub mod app;
pub mod input;
pub mod ui;

pub use app::{App, Tab, Theme};

use std::io::{self, stdout};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::{info, warn};

use demeter_core::{
    Command, DashboardEvent, DemeterClient, Metric, PollerConfig, PollerHandle, ThresholdConfig,
    poller,
};

/// Everything the dashboard needs to start.
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    pub backend_url: String,
    pub timeout: Duration,
    pub poll_interval: Duration,
    pub history_capacity: usize,
    pub thresholds: ThresholdConfig,
    pub theme: Theme,
    pub default_metric: Option<Metric>,
}

/// Enable raw mode and switch to the alternate screen.
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Leave raw mode and return to the main screen.
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Run the dashboard until the user quits.
pub async fn run(options: DashboardOptions) -> Result<()> {
    let DashboardOptions {
        backend_url,
        timeout,
        poll_interval,
        history_capacity,
        thresholds,
        theme,
        default_metric,
    } = options;

    let client = DemeterClient::with_timeout(&backend_url, timeout)
        .with_context(|| format!("Invalid backend URL: {}", backend_url))?;
    info!(url = %client.base_url(), ?poll_interval, "Starting dashboard");

    let mut app = App::new(
        client.base_url(),
        history_capacity,
        thresholds,
        theme,
        default_metric,
    );

    let (handle, mut events) = poller::spawn(
        Arc::new(client),
        PollerConfig {
            poll_interval,
            ..PollerConfig::default()
        },
    );

    let mut terminal = setup_terminal()?;
    let result = run_event_loop(&mut terminal, &mut app, &handle, &mut events);
    restore_terminal()?;

    handle.shutdown().await;
    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    handle: &PollerHandle,
    events: &mut mpsc::Receiver<DashboardEvent>,
) -> Result<()> {
    while !app.should_quit() {
        app.clean_expired_notifications();

        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            let action = input::handle_key(key.code, app.panel_open());
            if let Some(cmd) = input::apply_action(app, action) {
                let submitting = matches!(cmd, Command::SubmitSetpoints(_));
                if !handle.try_send(cmd) {
                    warn!("Poller is not accepting commands");
                    if submitting {
                        app.submit_failed("Failed to send data to the device.");
                    }
                }
            }
        }

        // Non-blocking receive of poller events
        while let Ok(event) = events.try_recv() {
            app.handle_event(event);
        }
    }

    Ok(())
}
