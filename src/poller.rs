use reqwest::header::ACCEPT;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::error::{FetchError, FetchResult, PollviewError, PollviewResult};
use crate::source::Source;
use crate::state::{AppState, PollStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollCommand {
    /// Issue one fetch now, outside the timer.
    Refresh,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    FetchStarted { seq: u64 },
    Loaded { seq: u64, info: Value },
    Failed { seq: u64, error: FetchError },
}

impl PollEvent {
    /// Applies a poll result in arrival order. Returns true if the document changed.
    ///
    /// Whatever resolves last wins, even if it was issued earlier than the
    /// result currently shown. Failures are recorded and otherwise dropped.
    pub fn apply(self, state: &mut AppState, status: &mut PollStatus) -> bool {
        match self {
            PollEvent::FetchStarted { .. } => {
                status.record_issued();
                false
            }
            PollEvent::Loaded { seq, info } => {
                if matches!(status.last_applied_seq, Some(last) if last > seq) {
                    debug!(seq, "older response resolved after a newer one; applying anyway");
                }
                status.record_success(seq);
                state.replace(info)
            }
            PollEvent::Failed { seq, error } => {
                debug!(seq, kind = error.kind(), "ignoring failed fetch");
                status.record_failure(error);
                false
            }
        }
    }
}

/// Fetches the source once and parses the body as JSON.
///
/// No timeout is applied; a hung server keeps this future pending.
pub async fn fetch_json(client: &reqwest::Client, source: &Source) -> FetchResult<Value> {
    let bytes = match source {
        Source::Http(url) => {
            let resp = client
                .get(url.clone())
                .header(ACCEPT, "application/json")
                .send()
                .await?
                .error_for_status()?;
            resp.bytes().await?.to_vec()
        }
        Source::File(path) => tokio::fs::read(path)
            .await
            .map_err(|e| FetchError::io(format!("{}: {}", path.display(), e)))?,
    };
    serde_json::from_slice(&bytes).map_err(|e| FetchError::decode(e.to_string()))
}

#[derive(Clone, Debug)]
pub struct Poller {
    client: reqwest::Client,
    source: Source,
    interval: Duration,
    next_seq: Arc<AtomicU64>,
}

impl Poller {
    pub fn new(source: Source, interval: Duration) -> PollviewResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pollview/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PollviewError::config(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            source,
            interval,
            next_seq: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub async fn load_data(&self) -> FetchResult<Value> {
        fetch_json(&self.client, &self.source).await
    }

    /// Issues a fetch on its own task and reports the outcome on `tx`.
    /// Nothing waits for the previous fetch, so fetches may overlap.
    pub fn spawn_fetch(&self, tx: &UnboundedSender<PollEvent>) -> JoinHandle<()> {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed) + 1;
        let _ = tx.send(PollEvent::FetchStarted { seq });
        debug!(seq, source = %self.source, "fetch issued");

        let client = self.client.clone();
        let source = self.source.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let event = match fetch_json(&client, &source).await {
                Ok(info) => {
                    debug!(seq, "fetch resolved");
                    PollEvent::Loaded { seq, info }
                }
                Err(error) => {
                    warn!(seq, %error, "fetch failed; keeping previous state");
                    PollEvent::Failed { seq, error }
                }
            };
            let _ = tx.send(event);
        })
    }

    /// Fetches immediately, then once per interval, until the event
    /// receiver is dropped. In-flight fetches are never aborted.
    pub async fn run(self, tx: UnboundedSender<PollEvent>, mut cmd_rx: UnboundedReceiver<PollCommand>) {
        info!(source = %self.source, interval_ms = self.interval.as_millis() as u64, "poller started");

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut commands_open = true;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.spawn_fetch(&tx);
                }
                cmd = cmd_rx.recv(), if commands_open => match cmd {
                    Some(PollCommand::Refresh) => {
                        debug!("manual refresh");
                        self.spawn_fetch(&tx);
                    }
                    None => commands_open = false,
                },
            }

            if tx.is_closed() {
                debug!("event receiver dropped; poller stopping");
                break;
            }
        }
    }

    pub fn spawn(self, tx: UnboundedSender<PollEvent>, cmd_rx: UnboundedReceiver<PollCommand>) -> JoinHandle<()> {
        tokio::spawn(self.run(tx, cmd_rx))
    }
}
