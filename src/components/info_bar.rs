use clap::crate_version;
use ratatui::{
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Color, Style},
  text::Line,
  widgets::Paragraph,
};

use crate::{action::Action, components::Component, mode::Mode, tui::Frame};

pub struct InfoBar {
  mode: Mode,
  message: Option<Line<'static>>,
}

impl InfoBar {
  pub fn new() -> Self {
    Self { mode: Mode::default(), message: None }
  }

  fn hints(&self) -> &'static str {
    match self.mode {
      Mode::Articles => "j/k select  ←/→ page  v view  x dismiss  enter read  r refresh  f feedback  q quit",
      Mode::Reader => "j/k scroll  esc back",
      Mode::Feedback => "tab next field  ctrl-s submit  esc back",
    }
  }
}

impl Component for InfoBar {
  fn update(&mut self, action: Action) -> color_eyre::Result<Option<Action>> {
    match action {
      Action::Status(message) => {
        self.message = Some(Line::styled(message, Style::default().fg(Color::Green)));
      },
      Action::Error(message) | Action::FetchFailed(message) => {
        self.message = Some(Line::styled(message, Style::default().fg(Color::Red)));
      },
      Action::ReaderFailed { url } => {
        self.message = Some(Line::styled(format!("Failed to load {url}"), Style::default().fg(Color::Red)));
      },
      Action::ModeChange(mode) => {
        self.mode = mode;
        self.message = None;
      },
      _ => {},
    }
    Ok(None)
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> color_eyre::Result<()> {
    let [name_area, message_area] = Layout::horizontal([Constraint::Length(20), Constraint::Fill(1)]).areas(area);

    let paragraph = Paragraph::new("Nuusvoer ".to_string() + crate_version!());
    f.render_widget(paragraph, name_area);

    let message = self.message.clone().unwrap_or_else(|| Line::styled(self.hints(), Style::default().fg(Color::DarkGray)));
    f.render_widget(Paragraph::new(message).alignment(Alignment::Right), message_area);
    Ok(())
  }
}
