//! Background polling controller.
//!
//! The poller runs as a tokio task that fetches the current reading once on
//! start and then every `poll_interval`. The windowed history and the
//! all-time series are each fetched once, in their own tasks, so they may
//! arrive in any order relative to the polls.
//!
//! The task is owned by a [`PollerHandle`]. Dropping the handle, calling
//! [`PollerHandle::cancel`], or sending [`Command::Shutdown`] stops every
//! task it spawned, including requests that are still in flight. No event is
//! sent after cancellation has been observed.
//!
//! Polls are awaited one at a time; a tick that comes due while a request is
//! still outstanding is skipped rather than queued.

use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use demeter_types::TargetValues;

use crate::client::HistoryRange;
use crate::messages::{Command, DashboardEvent};
use crate::setpoint;
use crate::traits::SensorBackend;

/// Cadence of current-reading polls when nothing else is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Shortest accepted poll interval.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

const CHANNEL_CAPACITY: usize = 32;

/// Warn on this many consecutive failures before going quiet.
const NOISY_FAILURES: u32 = 3;

/// What the poller fetches and how often.
#[derive(Debug, Clone, PartialEq)]
pub struct PollerConfig {
    pub poll_interval: Duration,
    /// Fetch the windowed history once on start.
    pub fetch_history: bool,
    /// Which view feeds the windowed history.
    pub history_range: HistoryRange,
    /// Fetch the all-time series once on start.
    pub fetch_all_time: bool,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            fetch_history: true,
            history_range: HistoryRange::Week,
            fetch_all_time: true,
        }
    }
}

impl PollerConfig {
    /// Only poll the current reading; skip both history fetches.
    pub fn readings_only(poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            fetch_history: false,
            fetch_all_time: false,
            ..Self::default()
        }
    }
}

/// Owning handle for a running poller.
///
/// The poller is cancelled when the handle is dropped.
#[derive(Debug)]
pub struct PollerHandle {
    command_tx: mpsc::Sender<Command>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Queue a command without waiting. Returns false if the queue is full
    /// or the poller has stopped.
    pub fn try_send(&self, command: Command) -> bool {
        self.command_tx.try_send(command).is_ok()
    }

    /// Ask for an immediate current-reading poll.
    pub fn refresh(&self) -> bool {
        self.try_send(Command::RefreshReading)
    }

    /// Queue a setpoint submission. The outcome arrives as
    /// [`DashboardEvent::SetpointSubmitted`].
    pub fn submit(&self, values: TargetValues) -> bool {
        self.try_send(Command::SubmitSetpoints(values))
    }

    /// Stop polling. In-flight requests are abandoned.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancel and wait for the poll loop to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take()
            && let Err(e) = task.await
        {
            warn!(error = %e, "Poller task ended abnormally");
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Start polling `backend`.
///
/// Must be called from within a tokio runtime. Returns the owning handle and
/// the stream of events for the UI.
pub fn spawn<B>(backend: Arc<B>, config: PollerConfig) -> (PollerHandle, mpsc::Receiver<DashboardEvent>)
where
    B: SensorBackend + ?Sized + 'static,
{
    let (command_tx, command_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (event_tx, event_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let cancel = CancellationToken::new();

    let poller = Poller {
        backend,
        config,
        command_rx,
        event_tx,
        cancel: cancel.clone(),
        consecutive_failures: 0,
    };
    let task = tokio::spawn(poller.run());

    let handle = PollerHandle {
        command_tx,
        cancel,
        task: Some(task),
    };
    (handle, event_rx)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Series {
    Window,
    AllTime,
}

struct Poller<B: ?Sized> {
    backend: Arc<B>,
    config: PollerConfig,
    command_rx: mpsc::Receiver<Command>,
    event_tx: mpsc::Sender<DashboardEvent>,
    cancel: CancellationToken,
    consecutive_failures: u32,
}

impl<B> Poller<B>
where
    B: SensorBackend + ?Sized + 'static,
{
    async fn run(mut self) {
        let period = self.config.poll_interval.max(MIN_POLL_INTERVAL);
        info!(interval = ?period, "Poller started");

        if self.config.fetch_history {
            self.spawn_history(self.config.history_range, Series::Window);
        }
        if self.config.fetch_all_time {
            self.spawn_history(HistoryRange::All, Series::AllTime);
        }

        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => {
                    debug!("Poller cancelled");
                    break;
                }

                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(Command::RefreshReading) => {
                            if !self.poll_reading().await {
                                break;
                            }
                            ticker.reset();
                        }
                        Some(Command::SubmitSetpoints(values)) => {
                            self.spawn_submission(values);
                        }
                        Some(Command::Shutdown) => {
                            info!("Poller received shutdown command");
                            break;
                        }
                        None => {
                            info!("Command channel closed, stopping poller");
                            break;
                        }
                    }
                }

                _ = ticker.tick() => {
                    if !self.poll_reading().await {
                        break;
                    }
                }
            }
        }

        self.cancel.cancel();
        info!("Poller stopped");
    }

    /// Fetch the current reading and report it. Returns false when the
    /// poller should stop.
    async fn poll_reading(&mut self) -> bool {
        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return false,
            result = self.backend.current_reading() => result,
        };

        let event = match result {
            Ok(reading) => {
                if self.consecutive_failures > 0 {
                    info!(
                        failures = self.consecutive_failures,
                        "Backend reachable again"
                    );
                }
                self.consecutive_failures = 0;
                debug!(
                    temperature = reading.temperature,
                    ph = reading.ph,
                    ec = reading.ec,
                    "Polled current reading"
                );
                DashboardEvent::ReadingUpdated {
                    reading,
                    at: OffsetDateTime::now_utc(),
                }
            }
            Err(e) => {
                self.consecutive_failures += 1;
                let attempt = self.consecutive_failures;
                if attempt <= NOISY_FAILURES {
                    warn!(error = %e, attempt, "Failed to fetch current reading");
                } else if attempt == NOISY_FAILURES + 1 {
                    error!(
                        error = %e,
                        attempt,
                        "Failed to fetch current reading, will keep polling quietly"
                    );
                } else {
                    debug!(error = %e, attempt, "Failed to fetch current reading");
                }
                DashboardEvent::ReadingFailed {
                    error: e.to_string(),
                }
            }
        };

        send_event(&self.event_tx, &self.cancel, event).await
    }

    fn spawn_history(&self, range: HistoryRange, series: Series) {
        let backend = Arc::clone(&self.backend);
        let event_tx = self.event_tx.clone();
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return,
                result = backend.history(range) => result,
            };

            let event = match (series, result) {
                (Series::Window, Ok(points)) => {
                    info!(%range, points = points.len(), "Loaded history window");
                    DashboardEvent::HistoryLoaded(points)
                }
                (Series::Window, Err(e)) => {
                    warn!(%range, error = %e, "Failed to fetch history window");
                    DashboardEvent::HistoryFailed {
                        error: e.to_string(),
                    }
                }
                (Series::AllTime, Ok(points)) => {
                    info!(points = points.len(), "Loaded all-time series");
                    DashboardEvent::AllTimeLoaded(points)
                }
                (Series::AllTime, Err(e)) => {
                    warn!(error = %e, "Failed to fetch all-time series");
                    DashboardEvent::AllTimeFailed {
                        error: e.to_string(),
                    }
                }
            };

            send_event(&event_tx, &cancel, event).await;
        });
    }

    fn spawn_submission(&self, values: TargetValues) {
        let backend = Arc::clone(&self.backend);
        let event_tx = self.event_tx.clone();
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return,
                outcome = setpoint::submit(&*backend, &values) => outcome,
            };
            send_event(&event_tx, &cancel, DashboardEvent::SetpointSubmitted(outcome)).await;
        });
    }
}

/// Deliver an event unless the poller was cancelled. Returns false when the
/// event could not be delivered.
async fn send_event(
    event_tx: &mpsc::Sender<DashboardEvent>,
    cancel: &CancellationToken,
    event: DashboardEvent,
) -> bool {
    if cancel.is_cancelled() {
        return false;
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        sent = event_tx.send(event) => {
            if sent.is_err() {
                debug!("Event receiver dropped");
            }
            sent.is_ok()
        }
    }
}
