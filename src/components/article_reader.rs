use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use html5ever::{parse_document, tendril::TendrilSink, tree_builder::TreeBuilderOpts, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use ratatui::{
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span, Text},
  widgets::{Block, BorderType, Paragraph, Wrap},
};

use super::Component;
use crate::{action::Action, mode::Mode, tui::Frame};

/// Renders the readable part of an article inside the main area.
#[derive(Default)]
pub struct ArticleReader {
  url: String,
  title: String,
  text: Option<Text<'static>>,
  loading: bool,
  scroll_position: (u16, u16),
  mode: Mode,
}

impl ArticleReader {
  pub fn new() -> Self {
    Self::default()
  }

  fn set_content(&mut self, title: String, content: &str) -> Result<()> {
    self.title = title;
    self.text = Some(html_to_text(content)?);
    self.loading = false;
    self.scroll_position = (0, 0);
    Ok(())
  }

  fn scroll_down(&mut self) {
    self.scroll_position.0 = self.scroll_position.0.saturating_add(1);
  }

  fn scroll_up(&mut self) {
    self.scroll_position.0 = self.scroll_position.0.saturating_sub(1);
  }
}

/// Converts an HTML fragment into styled terminal text.
pub fn html_to_text(html: &str) -> Result<Text<'static>> {
  let opts = ParseOpts {
    tree_builder: TreeBuilderOpts { drop_doctype: true, ..Default::default() },
    ..Default::default()
  };
  let dom = parse_document(RcDom::default(), opts).from_utf8().read_from(&mut html.as_bytes())?;

  let mut text = Text::default();
  let mut spans = Vec::new();
  walk_dom(&dom.document, &mut text, &mut spans, Style::default());
  flush_line(&mut text, &mut spans);
  Ok(text)
}

fn flush_line(text: &mut Text<'static>, spans: &mut Vec<Span<'static>>) {
  if !spans.is_empty() {
    text.lines.push(Line::from(std::mem::take(spans)));
  }
}

/// An empty line counts as ending in whitespace.
fn ends_with_space(spans: &[Span<'_>]) -> bool {
  spans.last().map_or(true, |span| span.content.ends_with(' '))
}

fn walk_children(handle: &Handle, text: &mut Text<'static>, spans: &mut Vec<Span<'static>>, style: Style) {
  for child in handle.children.borrow().iter() {
    walk_dom(child, text, spans, style);
  }
}

fn walk_dom(handle: &Handle, text: &mut Text<'static>, spans: &mut Vec<Span<'static>>, style: Style) {
  match &handle.data {
    NodeData::Document => walk_children(handle, text, spans, style),
    NodeData::Text { contents } => {
      let content = contents.borrow();
      let collapsed = content.split_whitespace().collect::<Vec<_>>().join(" ");
      if content.starts_with(char::is_whitespace) && !ends_with_space(spans) {
        spans.push(Span::raw(" "));
      }
      if !collapsed.is_empty() {
        spans.push(Span::styled(collapsed, style));
        if content.ends_with(char::is_whitespace) {
          spans.push(Span::raw(" "));
        }
      }
    },
    NodeData::Element { name, .. } => match name.local.as_ref() {
      "script" | "style" | "head" | "noscript" => {},
      "p" | "div" | "li" | "blockquote" => {
        flush_line(text, spans);
        walk_children(handle, text, spans, style);
        flush_line(text, spans);
        if name.local.as_ref() == "p" {
          text.lines.push(Line::default());
        }
      },
      "br" => flush_line(text, spans),
      "h1" | "h2" | "h3" | "h4" => {
        flush_line(text, spans);
        walk_children(handle, text, spans, style.add_modifier(Modifier::BOLD).fg(Color::Cyan));
        flush_line(text, spans);
        text.lines.push(Line::default());
      },
      "a" => walk_children(handle, text, spans, style.fg(Color::Blue).add_modifier(Modifier::UNDERLINED)),
      "em" | "i" => walk_children(handle, text, spans, style.add_modifier(Modifier::ITALIC)),
      "strong" | "b" => walk_children(handle, text, spans, style.add_modifier(Modifier::BOLD)),
      _ => walk_children(handle, text, spans, style),
    },
    _ => {},
  }
}

impl Component for ArticleReader {
  fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
    if self.mode == Mode::Reader {
      match key.code {
        KeyCode::Char('j') | KeyCode::Down => self.scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => self.scroll_up(),
        KeyCode::PageDown => self.scroll_position.0 = self.scroll_position.0.saturating_add(10),
        KeyCode::PageUp => self.scroll_position.0 = self.scroll_position.0.saturating_sub(10),
        _ => {},
      }
    }
    Ok(None)
  }

  fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
    if self.mode == Mode::Reader {
      match mouse.kind {
        MouseEventKind::ScrollUp => self.scroll_up(),
        MouseEventKind::ScrollDown => self.scroll_down(),
        _ => {},
      }
    }
    Ok(None)
  }

  fn update(&mut self, action: Action) -> Result<Option<Action>> {
    match action {
      Action::OpenArticle(article) => {
        self.url = article.url;
        self.title = article.title;
        self.text = None;
        self.loading = true;
        self.scroll_position = (0, 0);
      },
      // Content for an article that is no longer open is dropped.
      Action::UpdateReader { url, title, content } if url == self.url => {
        self.set_content(title, &content)?;
      },
      Action::ReaderFailed { url } if url == self.url => {
        self.loading = false;
      },
      Action::ModeChange(mode) => {
        self.mode = mode;
      },
      _ => {},
    }
    Ok(None)
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
    let block = Block::bordered()
      .border_type(BorderType::Rounded)
      .border_style(Style::default().fg(Color::Green))
      .title(Line::styled(self.title.clone(), Style::default().add_modifier(Modifier::BOLD)));

    let paragraph = match &self.text {
      Some(text) => Paragraph::new(text.clone()).wrap(Wrap { trim: true }).scroll(self.scroll_position),
      None if self.loading => Paragraph::new("Loading article..."),
      None => Paragraph::new(Line::styled("Could not load this article.", Style::default().fg(Color::Red))),
    };
    f.render_widget(paragraph.block(block), area);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::{
    components::test_utils::{buffer_text, render},
    news::Article,
  };

  fn plain(text: &Text<'_>) -> Vec<String> {
    text.lines.iter().map(|line| line.spans.iter().map(|span| span.content.as_ref()).collect()).collect()
  }

  #[test]
  fn paragraphs_become_separate_lines() {
    let text = html_to_text("<p>First   paragraph.</p><p>Second <a href=\"#\">link</a> here.</p>").unwrap();
    assert_eq!(plain(&text), ["First paragraph.", "", "Second link here.", ""]);
  }

  #[test]
  fn headings_are_bold_and_scripts_dropped() {
    let text = html_to_text("<h2>Title</h2><script>var x = 1;</script><p>Body</p>").unwrap();
    assert_eq!(plain(&text), ["Title", "", "Body", ""]);
    assert!(text.lines[0].spans[0].style.add_modifier.contains(Modifier::BOLD));
  }

  #[test]
  fn shows_loading_then_content() {
    let mut reader = ArticleReader::new();
    let article = Article {
      title: "Monsoon arrives early".to_string(),
      url: "https://example.com/monsoon".to_string(),
      ..Article::default()
    };
    reader.update(Action::OpenArticle(article)).unwrap();
    let text = buffer_text(&render(&mut reader, 60, 8));
    assert!(text.contains("Monsoon arrives early"));
    assert!(text.contains("Loading article..."));

    reader
      .update(Action::UpdateReader {
        url: "https://example.com/stale".to_string(),
        title: "Stale".to_string(),
        content: "<p>Old news.</p>".to_string(),
      })
      .unwrap();
    assert!(reader.loading);

    reader
      .update(Action::UpdateReader {
        url: "https://example.com/monsoon".to_string(),
        title: "Monsoon arrives early".to_string(),
        content: "<p>Rain.</p>".to_string(),
      })
      .unwrap();
    let text = buffer_text(&render(&mut reader, 60, 8));
    assert!(text.contains("Rain."));
  }

  #[test]
  fn only_failures_for_the_open_article_stop_loading() {
    let mut reader = ArticleReader::new();
    let article = Article { title: "Budget session".to_string(), url: "https://b".to_string(), ..Article::default() };
    reader.update(Action::OpenArticle(article)).unwrap();

    reader.update(Action::ReaderFailed { url: "https://a".to_string() }).unwrap();
    reader.update(Action::Error("Failed to draw: boom".to_string())).unwrap();
    assert!(reader.loading);
    assert!(buffer_text(&render(&mut reader, 60, 8)).contains("Loading article..."));

    reader.update(Action::ReaderFailed { url: "https://b".to_string() }).unwrap();
    assert!(!reader.loading);
    assert!(buffer_text(&render(&mut reader, 60, 8)).contains("Could not load this article."));
  }

  #[test]
  fn scrolls_only_while_reading() {
    let mut reader = ArticleReader::new();
    reader.handle_key_events(KeyEvent::from(KeyCode::Char('j'))).unwrap();
    assert_eq!(reader.scroll_position, (0, 0));

    reader.update(Action::ModeChange(Mode::Reader)).unwrap();
    reader.handle_key_events(KeyEvent::from(KeyCode::Char('j'))).unwrap();
    reader.handle_key_events(KeyEvent::from(KeyCode::Char('j'))).unwrap();
    reader.handle_key_events(KeyEvent::from(KeyCode::Char('k'))).unwrap();
    assert_eq!(reader.scroll_position, (1, 0));
  }
}
