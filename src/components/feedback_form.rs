use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Text},
  widgets::{block::Title, Block, BorderType, Paragraph, Wrap},
};

use super::{hit, Component};
use crate::{
  action::Action,
  feedback::{FeedbackData, FieldKind, FieldSpec, FIELDS},
  mode::Mode,
  tui::{Event, Frame},
};

/// Field indices laid out per row; pairs share a row.
const ROWS: [&[usize]; 5] = [&[0], &[1], &[2, 3], &[4, 5], &[6]];

const SUBMIT: usize = FIELDS.len();

pub struct FeedbackForm {
  mode: Mode,
  data: FeedbackData,
  focus: usize,
  submitted: bool,
  field_areas: [Rect; FIELDS.len()],
  submit_area: Rect,
}

impl Default for FeedbackForm {
  fn default() -> Self {
    Self::new()
  }
}

impl FeedbackForm {
  pub fn new() -> Self {
    Self {
      mode: Mode::default(),
      data: FeedbackData::default(),
      focus: 0,
      submitted: false,
      field_areas: [Rect::default(); FIELDS.len()],
      submit_area: Rect::default(),
    }
  }

  fn reset(&mut self) {
    self.data = FeedbackData::default();
    self.focus = 0;
    self.submitted = false;
  }

  fn focused_field(&self) -> Option<FieldSpec> {
    FIELDS.get(self.focus).copied()
  }

  fn focus_next(&mut self) {
    self.focus = (self.focus + 1) % (SUBMIT + 1);
  }

  fn focus_previous(&mut self) {
    self.focus = if self.focus == 0 { SUBMIT } else { self.focus - 1 };
  }

  fn insert(&mut self, s: &str) {
    if let Some(spec) = self.focused_field() {
      let value = self.data.field_mut(spec.id);
      match spec.kind {
        FieldKind::TextArea => value.push_str(s),
        FieldKind::Input | FieldKind::Select => value.extend(s.chars().filter(|c| *c != '\n' && *c != '\r')),
      }
      self.submitted = false;
    }
  }

  fn submit(&mut self) -> Result<Action> {
    let form = serde_json::to_string(&self.data)?;
    tracing::info!(%form, "Feedback submitted");
    self.submitted = true;
    Ok(Action::Status("Thank you for your feedback!".to_string()))
  }

  fn row_height(row: &[usize]) -> u16 {
    row
      .iter()
      .map(|&idx| {
        let spec = FIELDS[idx];
        let base = if spec.kind == FieldKind::TextArea { 4 } else { 3 };
        base + u16::from(spec.hint.is_some())
      })
      .max()
      .unwrap_or(3)
  }

  fn draw_field(&self, f: &mut Frame<'_>, idx: usize, area: Rect) {
    let spec = FIELDS[idx];
    let focused = self.focus == idx;
    let [field_area, hint_area] =
      Layout::vertical([Constraint::Fill(1), Constraint::Length(u16::from(spec.hint.is_some()))]).areas(area);

    let border_style = if focused { Style::default().fg(Color::Yellow) } else { Style::default().fg(Color::DarkGray) };
    let mut block = Block::bordered()
      .border_type(BorderType::Rounded)
      .border_style(border_style)
      .title(Line::styled(spec.label, Style::default().fg(Color::White)));
    if let Some(icon) = spec.icon {
      block = block.title(Title::from(icon.symbol()).alignment(Alignment::Right));
    }
    let inner = block.inner(field_area);

    let value = self.data.field(spec.id);
    let text = if value.is_empty() {
      Text::from(Line::styled(spec.placeholder, Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC)))
    } else {
      Text::from(value)
    };
    f.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }).block(block), field_area);

    if let Some(hint) = spec.hint {
      f.render_widget(Paragraph::new(Line::styled(hint, Style::default().fg(Color::Red))), hint_area);
    }

    if focused && inner.width > 0 && inner.height > 0 {
      let last_line = value.rsplit('\n').next().unwrap_or_default();
      let rows = value.matches('\n').count() as u16;
      let x = inner.x + (last_line.chars().count() as u16).min(inner.width - 1);
      let y = inner.y + rows.min(inner.height - 1);
      f.set_cursor(x, y);
    }
  }
}

impl Component for FeedbackForm {
  fn handle_events(&mut self, event: Option<Event>) -> Result<Option<Action>> {
    let r = match event {
      Some(Event::Key(key_event)) => self.handle_key_events(key_event)?,
      Some(Event::Mouse(mouse_event)) => self.handle_mouse_events(mouse_event)?,
      Some(Event::Paste(s)) if self.mode == Mode::Feedback => {
        self.insert(&s);
        None
      },
      _ => None,
    };
    Ok(r)
  }

  fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
    if self.mode != Mode::Feedback {
      return Ok(None);
    }
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
      return Ok(None);
    }
    match key.code {
      KeyCode::Tab | KeyCode::Down => self.focus_next(),
      KeyCode::BackTab | KeyCode::Up => self.focus_previous(),
      KeyCode::Enter => match self.focused_field().map(|spec| spec.kind) {
        Some(FieldKind::TextArea) => self.insert("\n"),
        Some(_) => self.focus_next(),
        None => return Ok(Some(Action::SubmitFeedback)),
      },
      KeyCode::Backspace => {
        if let Some(spec) = self.focused_field() {
          self.data.field_mut(spec.id).pop();
        }
      },
      KeyCode::Char(c) => {
        let mut buf = [0; 4];
        self.insert(c.encode_utf8(&mut buf));
      },
      _ => {},
    }
    Ok(None)
  }

  fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
    if self.mode != Mode::Feedback || mouse.kind != MouseEventKind::Down(MouseButton::Left) {
      return Ok(None);
    }
    if hit(self.submit_area, mouse.column, mouse.row) {
      self.focus = SUBMIT;
      return Ok(Some(Action::SubmitFeedback));
    }
    if let Some(idx) = self.field_areas.iter().position(|area| hit(*area, mouse.column, mouse.row)) {
      self.focus = idx;
    }
    Ok(None)
  }

  fn update(&mut self, action: Action) -> Result<Option<Action>> {
    match action {
      Action::ModeChange(mode) => {
        if self.mode == Mode::Feedback && mode != Mode::Feedback {
          self.reset();
        }
        self.mode = mode;
      },
      Action::SubmitFeedback if self.mode == Mode::Feedback => {
        return Ok(Some(self.submit()?));
      },
      _ => {},
    }
    Ok(None)
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
    let block = Block::bordered().border_type(BorderType::Rounded);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut constraints = vec![Constraint::Length(2), Constraint::Length(1)];
    constraints.extend(ROWS.iter().map(|row| Constraint::Length(Self::row_height(row))));
    constraints.push(Constraint::Length(3));
    constraints.push(Constraint::Fill(1));
    let areas = Layout::vertical(constraints).split(inner);

    let header = Text::from(vec![
      Line::styled("Thank you for your time!", Style::default().add_modifier(Modifier::BOLD)),
      Line::styled("Please provide the details below.", Style::default().fg(Color::Gray)),
    ]);
    f.render_widget(Paragraph::new(header), areas[0]);

    for (row, row_area) in ROWS.iter().zip(areas.iter().skip(2)) {
      let cells = Layout::horizontal(vec![Constraint::Ratio(1, row.len() as u32); row.len()]).split(*row_area);
      for (&idx, cell) in row.iter().zip(cells.iter()) {
        self.field_areas[idx] = *cell;
        self.draw_field(f, idx, *cell);
      }
    }

    let [submit_area, _] =
      Layout::horizontal([Constraint::Length(22), Constraint::Fill(1)]).areas(areas[2 + ROWS.len()]);
    self.submit_area = submit_area;
    let submit_style = if self.focus == SUBMIT {
      Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    };
    let label = if self.submitted { "Submitted ✓" } else { "Submit Feedback" };
    let button = Paragraph::new(Line::styled(label, submit_style))
      .alignment(Alignment::Center)
      .block(Block::bordered().border_type(BorderType::Rounded).border_style(Style::default().fg(Color::Green)));
    f.render_widget(button, submit_area);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::components::test_utils::{buffer_text, render};

  fn open_form() -> FeedbackForm {
    let mut form = FeedbackForm::new();
    form.update(Action::ModeChange(Mode::Feedback)).unwrap();
    form
  }

  fn type_str(form: &mut FeedbackForm, s: &str) {
    for c in s.chars() {
      let code = if c == '\n' { KeyCode::Enter } else { KeyCode::Char(c) };
      form.handle_key_events(KeyEvent::from(code)).unwrap();
    }
  }

  #[test]
  fn typing_fills_the_focused_field() {
    let mut form = open_form();
    type_str(&mut form, "Asha Rao");
    form.handle_key_events(KeyEvent::from(KeyCode::Tab)).unwrap();
    type_str(&mut form, "12 MG Road\nBengaluru");
    form.handle_key_events(KeyEvent::from(KeyCode::Backspace)).unwrap();

    assert_eq!(form.data.full_name, "Asha Rao");
    assert_eq!(form.data.address, "12 MG Road\nBengalur");
  }

  #[test]
  fn enter_advances_from_inputs() {
    let mut form = open_form();
    type_str(&mut form, "Asha\n");
    type_str(&mut form, "x");
    assert_eq!(form.data.full_name, "Asha");
    assert_eq!(form.data.address, "x");
  }

  #[test]
  fn ignores_keys_outside_the_form() {
    let mut form = FeedbackForm::new();
    type_str(&mut form, "ignored");
    assert_eq!(form.data, FeedbackData::default());
  }

  #[test]
  fn focus_wraps_through_the_submit_button() {
    let mut form = open_form();
    form.handle_key_events(KeyEvent::from(KeyCode::BackTab)).unwrap();
    assert_eq!(form.focus, SUBMIT);
    assert_eq!(form.handle_key_events(KeyEvent::from(KeyCode::Enter)).unwrap(), Some(Action::SubmitFeedback));
    form.handle_key_events(KeyEvent::from(KeyCode::Tab)).unwrap();
    assert_eq!(form.focus, 0);
  }

  #[test]
  fn submit_reports_status() {
    let mut form = open_form();
    type_str(&mut form, "Asha");
    let action = form.update(Action::SubmitFeedback).unwrap();
    assert_eq!(action, Some(Action::Status("Thank you for your feedback!".to_string())));
    assert_eq!(form.data.full_name, "Asha");
  }

  #[test]
  fn leaving_the_form_discards_it() {
    let mut form = open_form();
    type_str(&mut form, "Asha");
    form.update(Action::ModeChange(Mode::Articles)).unwrap();
    assert_eq!(form.data, FeedbackData::default());
  }

  #[test]
  fn paste_goes_into_the_focused_field() {
    let mut form = open_form();
    form.handle_events(Some(Event::Paste("Asha\nRao".to_string()))).unwrap();
    assert_eq!(form.data.full_name, "AshaRao");
  }

  #[test]
  fn renders_labels_placeholders_and_hint() {
    let mut form = open_form();
    let text = buffer_text(&render(&mut form, 100, 32));
    assert!(text.contains("Thank you for your time!"));
    assert!(text.contains("Full Name"));
    assert!(text.contains("Enter Your Full Name"));
    assert!(text.contains("Mobile Number"));
    assert!(text.contains("Please enter a valid e-mail"));
    assert!(text.contains("Submit Feedback"));
  }
}
