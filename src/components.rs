use color_eyre::eyre::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;

use crate::{
  action::Action,
  config::Config,
  tui::{Event, Frame},
};

pub mod article_list;
pub mod article_reader;
pub mod feedback_form;
pub mod info_bar;
pub mod popup_quit;
pub mod sidebar;

/// A piece of the screen that reacts to terminal events and actions.
pub trait Component {
  #[allow(unused_variables)]
  fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
    Ok(())
  }

  #[allow(unused_variables)]
  fn register_config_handler(&mut self, config: Config) -> Result<()> {
    Ok(())
  }

  #[allow(unused_variables)]
  fn init(&mut self, area: Rect) -> Result<()> {
    Ok(())
  }

  fn handle_events(&mut self, event: Option<Event>) -> Result<Option<Action>> {
    let r = match event {
      Some(Event::Key(key_event)) => self.handle_key_events(key_event)?,
      Some(Event::Mouse(mouse_event)) => self.handle_mouse_events(mouse_event)?,
      _ => None,
    };
    Ok(r)
  }

  #[allow(unused_variables)]
  fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
    Ok(None)
  }

  #[allow(unused_variables)]
  fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
    Ok(None)
  }

  #[allow(unused_variables)]
  fn update(&mut self, action: Action) -> Result<Option<Action>> {
    Ok(None)
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()>;
}

/// Whether the terminal cell `(column, row)` lies inside `area`.
pub(crate) fn hit(area: Rect, column: u16, row: u16) -> bool {
  column >= area.x && column < area.x + area.width && row >= area.y && row < area.y + area.height
}

#[cfg(test)]
pub(crate) mod test_utils {
  use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

  use super::Component;

  pub fn render(component: &mut dyn Component, width: u16, height: u16) -> Buffer {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal
      .draw(|f| {
        let area = f.size();
        component.draw(f, area).unwrap();
      })
      .unwrap();
    terminal.backend().buffer().clone()
  }

  pub fn buffer_text(buffer: &Buffer) -> String {
    let width = buffer.area.width as usize;
    buffer
      .content
      .chunks(width)
      .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
      .collect::<Vec<_>>()
      .join("\n")
  }
}
