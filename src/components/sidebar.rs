use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span, Text},
  widgets::{Block, BorderType, Borders, Paragraph},
};

use super::hit;
use crate::{action::Action, components::Component, mode::Mode, tui::Frame, view_mode::ViewMode};

/// Greeting, view toggle and the way into the feedback form.
pub struct Sidebar {
  mode: Mode,
  view_mode: ViewMode,
  list_button: Rect,
  grid_button: Rect,
  feedback_button: Rect,
}

impl Sidebar {
  pub fn new(view_mode: ViewMode) -> Self {
    Self {
      mode: Mode::default(),
      view_mode,
      list_button: Rect::default(),
      grid_button: Rect::default(),
      feedback_button: Rect::default(),
    }
  }

  fn toggle_style(&self, view_mode: ViewMode) -> Style {
    if self.view_mode == view_mode {
      Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
      Style::default().fg(Color::Gray)
    }
  }
}

impl Component for Sidebar {
  fn handle_mouse_events(&mut self, mouse: MouseEvent) -> color_eyre::Result<Option<Action>> {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
      return Ok(None);
    }
    let action = if hit(self.list_button, mouse.column, mouse.row) {
      Some(Action::SetViewMode(ViewMode::List))
    } else if hit(self.grid_button, mouse.column, mouse.row) {
      Some(Action::SetViewMode(ViewMode::Grid))
    } else if hit(self.feedback_button, mouse.column, mouse.row) && self.mode != Mode::Feedback {
      Some(Action::OpenFeedback)
    } else {
      None
    };
    Ok(action)
  }

  fn update(&mut self, action: Action) -> color_eyre::Result<Option<Action>> {
    match action {
      Action::ViewModeChanged(view_mode) => {
        self.view_mode = view_mode;
      },
      Action::ModeChange(mode) => {
        self.mode = mode;
      },
      _ => {},
    }
    Ok(None)
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> color_eyre::Result<()> {
    let block = Block::default().borders(Borders::RIGHT).border_type(BorderType::Rounded);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [header, _, toggle_title, toggle, _, feedback_title, feedback, _] = Layout::vertical([
      Constraint::Length(2),
      Constraint::Length(1),
      Constraint::Length(1),
      Constraint::Length(3),
      Constraint::Length(1),
      Constraint::Length(1),
      Constraint::Length(3),
      Constraint::Fill(1),
    ])
    .areas(inner);

    let greeting = Text::from(vec![
      Line::styled("Hi Reader,", Style::default().add_modifier(Modifier::BOLD)),
      Line::styled("Here's your News!", Style::default().fg(Color::Gray)),
    ]);
    f.render_widget(Paragraph::new(greeting), header);

    let section_style = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    f.render_widget(Paragraph::new(Span::styled("View Toggle", section_style)), toggle_title);

    let [list_button, grid_button] = Layout::horizontal([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)]).areas(toggle);
    self.list_button = list_button;
    self.grid_button = grid_button;
    for (label, view_mode, button) in [("≡ List", ViewMode::List, list_button), ("⊞ Grid", ViewMode::Grid, grid_button)] {
      let paragraph = Paragraph::new(Span::styled(label, self.toggle_style(view_mode)))
        .alignment(Alignment::Center)
        .block(Block::bordered().border_type(BorderType::Rounded));
      f.render_widget(paragraph, button);
    }

    f.render_widget(Paragraph::new(Span::styled("Have a Feedback?", section_style)), feedback_title);
    self.feedback_button = feedback;
    let button_style = if self.mode == Mode::Feedback {
      Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    };
    let paragraph = Paragraph::new(Span::styled("We're Listening!", button_style))
      .alignment(Alignment::Center)
      .block(Block::bordered().border_type(BorderType::Rounded).border_style(Style::default().fg(Color::Green)));
    f.render_widget(paragraph, feedback);
    Ok(())
  }
}
