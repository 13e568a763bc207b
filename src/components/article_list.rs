use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
  layout::{Alignment, Constraint, Layout, Margin, Rect},
  prelude::{Color, Line, Modifier, Span, Style, Text},
  widgets::{
    block::Title, Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Scrollbar, ScrollbarOrientation,
    ScrollbarState, Wrap,
  },
};

use super::{hit, Component};
use crate::{
  action::Action,
  mode::Mode,
  news::Article,
  pagination::Paginator,
  tui::Frame,
  view_mode::{grid_columns, ViewMode},
};

const CARD_HEIGHT: u16 = 6;

pub struct ArticleList {
  mode: Mode,
  view_mode: ViewMode,
  articles: Vec<Article>,
  loading: bool,
  error: Option<String>,
  paginator: Paginator,
  state: ListState,
  scrollbar_state: ScrollbarState,
  previous_button: Rect,
  next_button: Rect,
}

impl Default for ArticleList {
  fn default() -> Self {
    Self::new(ViewMode::default())
  }
}

impl ArticleList {
  pub fn new(view_mode: ViewMode) -> Self {
    Self {
      mode: Mode::default(),
      view_mode,
      articles: Vec::new(),
      loading: true,
      error: None,
      paginator: Paginator::default(),
      state: ListState::default().with_selected(Some(0)),
      scrollbar_state: ScrollbarState::default(),
      previous_button: Rect::default(),
      next_button: Rect::default(),
    }
  }

  pub fn current_page(&self) -> &[Article] {
    self.paginator.slice(&self.articles)
  }

  /// The highlighted article on the current page.
  pub fn selected(&self) -> Option<&Article> {
    self.state.selected().and_then(|idx| self.current_page().get(idx))
  }

  fn active(&self) -> bool {
    self.mode == Mode::Articles && !self.loading
  }

  fn clamp_selection(&mut self) {
    let page_len = self.current_page().len();
    if page_len == 0 {
      self.state.select(None);
    } else {
      let idx = self.state.selected().unwrap_or(0).min(page_len - 1);
      self.state.select(Some(idx));
    }
  }

  fn select_next(&mut self) {
    let page_len = self.current_page().len();
    if page_len > 0 {
      let idx = self.state.selected().unwrap_or(0);
      self.state.select(Some((idx + 1) % page_len));
    }
  }

  fn select_previous(&mut self) {
    let page_len = self.current_page().len();
    if page_len > 0 {
      let idx = self.state.selected().unwrap_or(0);
      self.state.select(Some(if idx == 0 { page_len - 1 } else { idx - 1 }));
    }
  }

  fn next_page(&mut self) {
    if self.paginator.next() {
      self.state.select(Some(0));
    }
  }

  fn previous_page(&mut self) {
    if self.paginator.previous() {
      self.state.select(Some(0));
    }
  }

  /// Drops the highlighted article from the in-memory list.
  fn dismiss_selected(&mut self) -> Option<Article> {
    let idx = self.paginator.range().start + self.state.selected()?;
    if idx >= self.articles.len() {
      return None;
    }
    let article = self.articles.remove(idx);
    self.paginator.set_len(self.articles.len());
    self.clamp_selection();
    Some(article)
  }

  fn set_articles(&mut self, articles: Vec<Article>) {
    self.articles = articles;
    self.loading = false;
    self.error = None;
    self.paginator.reset(self.articles.len());
    self.state.select(Some(0));
    self.clamp_selection();
  }

  fn card_text(article: &Article, selected: bool) -> Text<'_> {
    let title_style = if selected {
      Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
    };
    Text::from(vec![
      Line::styled(article.title.as_str(), title_style),
      Line::styled(article.source_label(), Style::default().fg(Color::Gray)),
      Line::styled(article.author_label(), Style::default().fg(Color::DarkGray)),
      Line::styled(article.published_label(), Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC)),
    ])
  }

  fn draw_list(&mut self, f: &mut Frame<'_>, area: Rect) {
    let selected = self.state.selected();
    let items: Vec<ListItem> = self
      .paginator
      .slice(&self.articles)
      .iter()
      .enumerate()
      .map(|(i, article)| {
        let mut text = Self::card_text(article, selected == Some(i));
        if let Some(title) = text.lines.first_mut() {
          title.spans.push(Span::styled("  ✕", Style::default().fg(Color::DarkGray)));
        }
        text.lines.push(Line::from(""));
        ListItem::new(text)
      })
      .collect();
    let len = items.len();

    let list = List::new(items)
      .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded).title("Headlines"))
      .highlight_symbol("┃ ")
      .repeat_highlight_symbol(true)
      .scroll_padding(1);

    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
      .begin_symbol(None)
      .end_symbol(None)
      .track_symbol(None)
      .thumb_symbol("▌");

    self.scrollbar_state = ScrollbarState::new(len).position(selected.unwrap_or(0));

    f.render_stateful_widget(list, area, &mut self.state);
    f.render_stateful_widget(scrollbar, area.inner(&Margin { vertical: 1, horizontal: 0 }), &mut self.scrollbar_state);
  }

  fn draw_grid(&mut self, f: &mut Frame<'_>, area: Rect) {
    let columns = grid_columns(area.width);
    let selected = self.state.selected();
    let page = self.current_page();
    let rows = page.len().div_ceil(columns);

    let row_areas = Layout::vertical(vec![Constraint::Length(CARD_HEIGHT); rows]).split(area);
    for (row, row_area) in row_areas.iter().enumerate() {
      let cells = Layout::horizontal(vec![Constraint::Ratio(1, columns as u32); columns]).split(*row_area);
      for (column, cell) in cells.iter().enumerate() {
        let idx = row * columns + column;
        let Some(article) = page.get(idx) else { break };
        let is_selected = selected == Some(idx);
        let border_style =
          if is_selected { Style::default().fg(Color::Green) } else { Style::default().fg(Color::DarkGray) };
        let card = Paragraph::new(Self::card_text(article, is_selected)).wrap(Wrap { trim: true }).block(
          Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(Title::from("✕").alignment(Alignment::Right)),
        );
        f.render_widget(card, *cell);
      }
    }
  }

  fn draw_pagination(&mut self, f: &mut Frame<'_>, area: Rect) {
    let enabled = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    let disabled = Style::default().fg(Color::DarkGray);
    let label = format!(" {} ", self.paginator.label());
    let [_, previous_button, label_area, next_button, _] = Layout::horizontal([
      Constraint::Fill(1),
      Constraint::Length(3),
      Constraint::Length(label.chars().count() as u16),
      Constraint::Length(3),
      Constraint::Fill(1),
    ])
    .areas(area);
    self.previous_button = previous_button;
    self.next_button = next_button;

    let previous_style = if self.paginator.has_previous() { enabled } else { disabled };
    let next_style = if self.paginator.has_next() { enabled } else { disabled };
    f.render_widget(Paragraph::new(Span::styled(" ◀ ", previous_style)), previous_button);
    f.render_widget(Paragraph::new(Span::styled(label, Style::default().fg(Color::Gray))), label_area);
    f.render_widget(Paragraph::new(Span::styled(" ▶ ", next_style)), next_button);
  }
}

impl Component for ArticleList {
  fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
    if !self.active() {
      return Ok(None);
    }
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.select_previous(),
      KeyCode::Char('x') | KeyCode::Delete => {
        if let Some(article) = self.dismiss_selected() {
          log::info!("Dismissed {}", article.url);
        }
      },
      KeyCode::Char('l') | KeyCode::Enter => {
        if let Some(article) = self.selected() {
          return Ok(Some(Action::OpenArticle(article.clone())));
        }
      },
      _ => {},
    }
    Ok(None)
  }

  fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
    if self.active() {
      match mouse.kind {
        MouseEventKind::ScrollDown => self.select_next(),
        MouseEventKind::ScrollUp => self.select_previous(),
        MouseEventKind::Down(MouseButton::Left) if hit(self.previous_button, mouse.column, mouse.row) => {
          self.previous_page()
        },
        MouseEventKind::Down(MouseButton::Left) if hit(self.next_button, mouse.column, mouse.row) => self.next_page(),
        _ => {},
      }
    }
    Ok(None)
  }

  fn update(&mut self, action: Action) -> Result<Option<Action>> {
    match action {
      Action::RequestRefresh => {
        self.loading = true;
      },
      Action::ArticlesLoaded(articles) => {
        self.set_articles(articles);
      },
      Action::FetchFailed(error) => {
        self.set_articles(Vec::new());
        self.error = Some(error);
      },
      Action::ViewModeChanged(view_mode) => {
        self.view_mode = view_mode;
      },
      Action::ModeChange(mode) => {
        self.mode = mode;
      },
      Action::NextPage if self.active() => self.next_page(),
      Action::PreviousPage if self.active() => self.previous_page(),
      _ => {},
    }
    Ok(None)
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
    if self.loading {
      let paragraph = Paragraph::new("Loading articles...").block(Block::bordered().border_type(BorderType::Rounded));
      f.render_widget(paragraph, area);
      return Ok(());
    }

    let [content_area, pagination_area] = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);

    if self.articles.is_empty() {
      let message = match &self.error {
        Some(error) => Line::styled(format!("Error fetching articles: {error}"), Style::default().fg(Color::Red)),
        None => Line::styled("No articles", Style::default().fg(Color::Gray)),
      };
      let paragraph =
        Paragraph::new(message).wrap(Wrap { trim: true }).block(Block::bordered().border_type(BorderType::Rounded));
      f.render_widget(paragraph, content_area);
    } else {
      match self.view_mode {
        ViewMode::List => self.draw_list(f, content_area),
        ViewMode::Grid => self.draw_grid(f, content_area),
      }
    }

    self.draw_pagination(f, pagination_area);
    Ok(())
  }
}
