mod app;
mod cli;
mod config;
mod error;
mod headless;
mod json_ui;
mod logging;
mod poller;
mod source;
mod state;
mod tui;

use clap::Parser;
use color_eyre::Result;
use crossterm::event;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

use app::App;
use cli::{AppMode, Cli};
use config::PollConfig;
use poller::{PollCommand, PollEvent, Poller};
use tui::{restore_terminal, setup_terminal};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    cli.validate()?;
    let cfg = PollConfig::resolve(&cli)?;
    let mode = cli.get_mode();
    let _log_guard = logging::init(&cfg, mode)?;

    let poller = Poller::new(cfg.parsed_source()?, cfg.interval())?;
    info!(source = %poller.source(), interval_ms = cfg.interval_ms, ?mode, "starting pollview");

    match mode {
        AppMode::Once => headless::run_once(poller).await?,
        AppMode::Headless => headless::run_headless(poller).await?,
        AppMode::Tui => run_tui(poller)?,
    }
    Ok(())
}

fn run_tui(poller: Poller) -> Result<()> {
    let (tx_cmd, rx_cmd) = mpsc::unbounded_channel::<PollCommand>();
    let (tx_evt, rx_evt) = mpsc::unbounded_channel::<PollEvent>();

    let mut app = App::new(tx_cmd, rx_evt, poller.source().to_string(), poller.interval());
    let poll_task = poller.spawn(tx_evt, rx_cmd);

    let mut terminal = setup_terminal()?;
    let outcome = event_loop(&mut terminal, &mut app);
    restore_terminal(terminal)?;

    // Fetches already in flight are left to finish or die with the runtime.
    poll_task.abort();
    outcome
}

fn event_loop(terminal: &mut tui::DefaultTerminal, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        let timeout = Duration::from_millis(80);
        if event::poll(timeout)? {
            let ev = event::read()?;
            if app.on_event(ev) {
                break;
            }
        }

        app.drain_events();
    }
    Ok(())
}
