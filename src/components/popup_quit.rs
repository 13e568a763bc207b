use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span, Text},
  widgets::{block::Title, Block, BorderType, Clear, Paragraph},
};

use crate::{action::Action, components::Component, config::Config, tui::Frame};

const POPUP_WIDTH: u16 = 32;
const POPUP_HEIGHT: u16 = 5;

pub struct QuitPopup {
  config: Config,
  show: bool,
}

impl QuitPopup {
  pub fn new() -> Self {
    Self { config: Config::default(), show: false }
  }

  /// Whether the popup is currently swallowing key presses.
  pub fn is_shown(&self) -> bool {
    self.show
  }
}

impl Component for QuitPopup {
  fn register_config_handler(&mut self, config: Config) -> color_eyre::Result<()> {
    self.config = config;
    Ok(())
  }

  fn handle_key_events(&mut self, key: KeyEvent) -> color_eyre::Result<Option<Action>> {
    if self.show {
      match key.code {
        KeyCode::Char('y') | KeyCode::Enter => return Ok(Some(Action::Quit)),
        KeyCode::Char('n') | KeyCode::Esc => {
          self.show = false;
        },
        _ => {},
      }
    }

    Ok(None)
  }

  fn update(&mut self, action: Action) -> color_eyre::Result<Option<Action>> {
    if action == Action::ConfirmQuit {
      if self.config.confirm_quit {
        self.show = true;
      } else {
        return Ok(Some(Action::Quit));
      }
    }
    Ok(None)
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> color_eyre::Result<()> {
    if !self.show {
      return Ok(());
    }
    let [_, row, _] =
      Layout::vertical([Constraint::Fill(1), Constraint::Length(POPUP_HEIGHT), Constraint::Fill(1)]).areas(area);
    let [_, popup_area, _] =
      Layout::horizontal([Constraint::Fill(1), Constraint::Length(POPUP_WIDTH.min(area.width)), Constraint::Fill(1)])
        .areas(row);

    let text = Text::from(vec![
      Line::styled("Leave the headlines?", Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
      Line::default(),
      Line::from(vec![
        Span::styled("[y]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw("es    "),
        Span::styled("[n]", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::raw("o"),
      ]),
    ]);
    let block = Block::bordered()
      .border_type(BorderType::Rounded)
      .border_style(Style::default().fg(Color::Yellow))
      .title(Title::from(" Quit ").alignment(Alignment::Center));
    f.render_widget(Clear, popup_area);
    f.render_widget(Paragraph::new(text).alignment(Alignment::Center).block(block), popup_area);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::components::test_utils::{buffer_text, render};

  fn confirming() -> QuitPopup {
    let mut popup = QuitPopup::new();
    popup.register_config_handler(Config { confirm_quit: true, ..Config::default() }).unwrap();
    popup
  }

  #[test]
  fn asks_before_quitting() {
    let mut popup = confirming();
    assert_eq!(popup.update(Action::ConfirmQuit).unwrap(), None);
    assert!(popup.is_shown());
    assert_eq!(popup.handle_key_events(KeyEvent::from(KeyCode::Char('y'))).unwrap(), Some(Action::Quit));
  }

  #[test]
  fn no_hides_the_popup() {
    let mut popup = confirming();
    popup.update(Action::ConfirmQuit).unwrap();
    popup.handle_key_events(KeyEvent::from(KeyCode::Char('n'))).unwrap();
    assert!(!popup.is_shown());
  }

  #[test]
  fn draws_only_while_shown() {
    let mut popup = confirming();
    assert!(!buffer_text(&render(&mut popup, 60, 12)).contains("Leave the headlines?"));
    popup.update(Action::ConfirmQuit).unwrap();
    assert!(buffer_text(&render(&mut popup, 60, 12)).contains("Leave the headlines?"));
  }

  #[test]
  fn quits_directly_without_confirmation() {
    let mut popup = QuitPopup::new();
    assert_eq!(popup.update(Action::ConfirmQuit).unwrap(), Some(Action::Quit));
    assert_eq!(popup.update(Action::Tick).unwrap(), None);
  }
}
