use std::io::Write;

use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::info;

use crate::error::PollviewResult;
use crate::poller::{PollEvent, Poller};
use crate::state::{AppState, PollStatus};

/// Writes the current document as a single compact JSON line.
pub fn write_state<W: Write>(out: &mut W, state: &AppState) -> PollviewResult<()> {
    serde_json::to_writer(&mut *out, state.info())?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

/// Applies events as they arrive and prints the document whenever a fetch
/// changes it. Returns when the event channel closes.
pub async fn drive<W: Write>(
    rx: &mut UnboundedReceiver<PollEvent>,
    state: &mut AppState,
    status: &mut PollStatus,
    out: &mut W,
) -> PollviewResult<()> {
    while let Some(event) = rx.recv().await {
        if event.apply(state, status) {
            write_state(out, state)?;
        }
    }
    Ok(())
}

/// Polls forever, printing to stdout.
pub async fn run_headless(poller: Poller) -> PollviewResult<()> {
    let (tx_evt, mut rx_evt) = mpsc::unbounded_channel::<PollEvent>();
    // Headless mode has no refresh key; the sender just stays alive.
    let (_tx_cmd, rx_cmd) = mpsc::unbounded_channel();

    info!(source = %poller.source(), "running headless");
    let _poller = poller.spawn(tx_evt, rx_cmd);

    let mut state = AppState::new();
    let mut status = PollStatus::default();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    drive(&mut rx_evt, &mut state, &mut status, &mut out).await
}

/// Single fetch, pretty-printed. Unlike the poll loop, a failure here is fatal.
pub async fn once_into<W: Write>(poller: &Poller, out: &mut W) -> PollviewResult<()> {
    let info: Value = poller.load_data().await?;
    serde_json::to_writer_pretty(&mut *out, &info)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

pub async fn run_once(poller: Poller) -> PollviewResult<()> {
    let mut out = std::io::stdout().lock();
    once_into(&poller, &mut out).await
}
