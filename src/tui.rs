use crossterm::{cursor, execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io;

use crate::error::{PollviewError, PollviewResult};

pub type DefaultTerminal = Terminal<CrosstermBackend<io::Stdout>>;

pub fn setup_terminal() -> PollviewResult<DefaultTerminal> {
    install_panic_hook();
    terminal::enable_raw_mode().map_err(|e| PollviewError::tui(format!("raw mode: {}", e)))?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

pub fn restore_terminal(mut terminal: DefaultTerminal) -> PollviewResult<()> {
    terminal.show_cursor()?;
    execute!(
        terminal.backend_mut(),
        terminal::LeaveAlternateScreen,
        cursor::Show
    )?;
    terminal::disable_raw_mode()?;
    Ok(())
}

/// Leave the alternate screen before the panic message is printed.
fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), terminal::LeaveAlternateScreen, cursor::Show);
        previous(info);
    }));
}
