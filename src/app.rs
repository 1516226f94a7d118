use crate::json_ui::{json_lines, render_state};
use crate::poller::{PollCommand, PollEvent};
use crate::state::{AppState, PollStatus};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

const PAGE: u16 = 10;

pub struct App {
    pub state: AppState,
    pub status: PollStatus,

    pub source_label: String,
    pub interval: Duration,

    pub tx: UnboundedSender<PollCommand>,
    pub rx: UnboundedReceiver<PollEvent>,

    pub scroll_offset: u16,
}

impl App {
    pub fn new(
        tx: UnboundedSender<PollCommand>,
        rx: UnboundedReceiver<PollEvent>,
        source_label: String,
        interval: Duration,
    ) -> Self {
        Self {
            state: AppState::new(),
            status: PollStatus::default(),
            source_label,
            interval,
            tx,
            rx,
            scroll_offset: 0,
        }
    }

    /// Returns true when the user asked to quit.
    pub fn on_event(&mut self, ev: crossterm::event::Event) -> bool {
        use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
        let Event::Key(k) = ev else {
            return false;
        };
        if k.modifiers.contains(KeyModifiers::CONTROL) && matches!(k.code, KeyCode::Char('c')) {
            return true;
        }
        if k.kind != KeyEventKind::Press {
            return false;
        }
        match k.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('r') => {
                let _ = self.tx.send(PollCommand::Refresh);
            }
            KeyCode::Up => self.scroll_offset = self.scroll_offset.saturating_sub(1),
            KeyCode::Down => self.scroll_by(1),
            KeyCode::PageUp => self.scroll_offset = self.scroll_offset.saturating_sub(PAGE),
            KeyCode::PageDown => self.scroll_by(PAGE),
            KeyCode::Home => self.scroll_offset = 0,
            KeyCode::End => self.scroll_offset = self.max_scroll(),
            _ => {}
        }
        false
    }

    /// Applies every pending poll result in arrival order. Returns how many
    /// results changed the document.
    pub fn drain_events(&mut self) -> usize {
        let mut changed = 0;
        while let Ok(ev) = self.rx.try_recv() {
            if ev.apply(&mut self.state, &mut self.status) {
                changed += 1;
            }
        }
        if changed > 0 {
            self.scroll_offset = self.scroll_offset.min(self.max_scroll());
        }
        changed
    }

    fn max_scroll(&self) -> u16 {
        let lines = json_lines(self.state.info()).len();
        u16::try_from(lines.saturating_sub(1)).unwrap_or(u16::MAX)
    }

    fn scroll_by(&mut self, n: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(n).min(self.max_scroll());
    }

    pub fn render(&self, f: &mut Frame) {
        let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(4)]).split(f.area());
        let title = format!("📄 {}", self.source_label);
        render_state(f, &self.state, &title, self.scroll_offset, chunks[0]);
        self.render_status(f, chunks[1]);
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let s = &self.status;
        let updated = s
            .last_update
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "never".into());

        let mut first = vec![
            Span::styled(format!("every {}ms", self.interval.as_millis()), Style::default().fg(Color::Gray)),
            Span::raw("  "),
            Span::styled(format!("fetched {}/{}", s.resolved, s.issued), Style::default().fg(Color::White)),
        ];
        if s.failed > 0 {
            first.push(Span::styled(format!(" ({} failed)", s.failed), Style::default().fg(Color::Red)));
        }
        if s.in_flight() > 0 {
            first.push(Span::styled(format!(" ({} in flight)", s.in_flight()), Style::default().fg(Color::Yellow)));
        }
        first.push(Span::raw("  "));
        first.push(Span::styled(format!("updated {}", updated), Style::default().fg(Color::Green)));
        if s.stale_applies > 0 {
            first.push(Span::styled(
                format!("  {} out-of-order", s.stale_applies),
                Style::default().fg(Color::Magenta),
            ));
        }

        let second = match &s.last_error {
            Some(err) => Line::from(vec![
                Span::styled(format!("{} error: ", err.kind()), Style::default().fg(Color::Red).bold()),
                Span::styled(err.to_string(), Style::default().fg(Color::Red)),
            ]),
            None => Line::from(Span::styled(
                "r refresh · ↑↓ scroll · q quit",
                Style::default().fg(Color::DarkGray).italic(),
            )),
        };

        let para = Paragraph::new(vec![Line::from(first), second]).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Status")
                .title_style(Style::default().fg(Color::Magenta).bold()),
        );
        f.render_widget(para, area);
    }
}
