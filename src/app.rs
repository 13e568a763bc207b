use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{
  layout::{Constraint, Layout},
  prelude::Rect,
};
use readability::extractor;
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::{
  action::Action,
  cli::Cli,
  components::{
    article_list::ArticleList, article_reader::ArticleReader, feedback_form::FeedbackForm, info_bar::InfoBar,
    popup_quit::QuitPopup, sidebar::Sidebar, Component,
  },
  config::Config,
  mode::Mode,
  news::{Article, NewsClient},
  tui,
  view_mode::ViewMode,
};

const SIDEBAR_WIDTH: u16 = 30;

pub struct App {
  pub config: Config,
  pub tick_rate: f64,
  pub frame_rate: f64,
  pub sidebar: Sidebar,
  pub article_list: ArticleList,
  pub article_reader: ArticleReader,
  pub feedback_form: FeedbackForm,
  pub info_bar: InfoBar,
  pub quit_popup: QuitPopup,
  pub news: NewsClient,
  pub should_quit: bool,
  pub should_suspend: bool,
  pub mode: Mode,
  pub view_mode: ViewMode,
  pub fetching: bool,
  pub last_tick_key_events: Vec<KeyEvent>,
}

impl App {
  pub fn new(args: Cli) -> Result<Self> {
    let mut config = Config::new()?;
    if let Some(country) = args.country {
      config.news.country = country;
    }
    log::info!("Config directory: {}", config.config._config_dir.display());
    let mut app = Self::with_config(config, args.view.unwrap_or_default())?;
    app.tick_rate = args.tick_rate;
    app.frame_rate = args.frame_rate;
    Ok(app)
  }

  pub fn with_config(config: Config, view_mode: ViewMode) -> Result<Self> {
    let news = NewsClient::new(config.news.clone())?;
    Ok(Self {
      config,
      tick_rate: 1.0,
      frame_rate: 4.0,
      sidebar: Sidebar::new(view_mode),
      article_list: ArticleList::new(view_mode),
      article_reader: ArticleReader::new(),
      feedback_form: FeedbackForm::new(),
      info_bar: InfoBar::new(),
      quit_popup: QuitPopup::new(),
      news,
      should_quit: false,
      should_suspend: false,
      mode: Mode::default(),
      view_mode,
      fetching: false,
      last_tick_key_events: Vec::new(),
    })
  }

  fn components_mut(&mut self) -> [&mut dyn Component; 6] {
    [
      &mut self.sidebar,
      &mut self.article_list,
      &mut self.article_reader,
      &mut self.feedback_form,
      &mut self.info_bar,
      &mut self.quit_popup,
    ]
  }

  pub async fn run(&mut self) -> Result<()> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel();

    let mut tui = tui::Tui::new()?.tick_rate(self.tick_rate).frame_rate(self.frame_rate).mouse(true).paste(true);
    tui.enter()?;

    let config = self.config.clone();
    let size = tui.size()?;
    for component in self.components_mut() {
      component.register_action_handler(action_tx.clone())?;
      component.register_config_handler(config.clone())?;
      component.init(size)?;
    }

    action_tx.send(Action::ModeChange(self.mode))?;
    action_tx.send(Action::ViewModeChanged(self.view_mode))?;
    action_tx.send(Action::RequestRefresh)?;

    loop {
      if let Some(e) = tui.next().await {
        match e {
          tui::Event::Tick => action_tx.send(Action::Tick)?,
          tui::Event::Render => action_tx.send(Action::Render)?,
          tui::Event::Resize(x, y) => action_tx.send(Action::Resize(x, y))?,
          tui::Event::Key(key) => self.handle_key(key, &action_tx)?,
          _ => {},
        }
        self.dispatch_event(e, &action_tx)?;
      }

      while let Ok(action) = action_rx.try_recv() {
        match action {
          Action::Resize(w, h) => {
            tui.resize(Rect::new(0, 0, w, h))?;
            self.render(&mut tui, &action_tx)?;
          },
          Action::Render => self.render(&mut tui, &action_tx)?,
          action => self.update(action, &action_tx)?,
        }
      }

      if self.should_suspend {
        tui.suspend()?;
        action_tx.send(Action::Resume)?;
        tui = tui::Tui::new()?.tick_rate(self.tick_rate).frame_rate(self.frame_rate).mouse(true).paste(true);
        tui.enter()?;
      } else if self.should_quit {
        tui.stop()?;
        break;
      }
    }
    tui.exit()?;
    Ok(())
  }

  /// Looks the key up in the keymap of the current mode, including multi-key sequences.
  fn handle_key(&mut self, key: KeyEvent, action_tx: &UnboundedSender<Action>) -> Result<()> {
    if self.quit_popup.is_shown() {
      return Ok(());
    }
    let key = KeyEvent::new(key.code, key.modifiers);
    if let Some(action) = self.config.action_for(self.mode, &[key]) {
      log::debug!("Got action: {action:?}");
      action_tx.send(action.clone())?;
    } else {
      self.last_tick_key_events.push(key);
      if let Some(action) = self.config.action_for(self.mode, &self.last_tick_key_events) {
        log::debug!("Got action: {action:?}");
        action_tx.send(action.clone())?;
      }
    }
    Ok(())
  }

  fn dispatch_event(&mut self, event: tui::Event, action_tx: &UnboundedSender<Action>) -> Result<()> {
    if self.quit_popup.is_shown() && matches!(event, tui::Event::Key(_) | tui::Event::Mouse(_)) {
      if let Some(action) = self.quit_popup.handle_events(Some(event))? {
        action_tx.send(action)?;
      }
      return Ok(());
    }
    for component in self.components_mut() {
      if let Some(action) = component.handle_events(Some(event.clone()))? {
        action_tx.send(action)?;
      }
    }
    Ok(())
  }

  fn change_mode(&mut self, mode: Mode, action_tx: &UnboundedSender<Action>) -> Result<()> {
    if self.mode != mode {
      self.mode = mode;
      self.last_tick_key_events.clear();
      action_tx.send(Action::ModeChange(mode))?;
    }
    Ok(())
  }

  fn set_view_mode(&mut self, view_mode: ViewMode, action_tx: &UnboundedSender<Action>) -> Result<()> {
    if self.view_mode != view_mode {
      self.view_mode = view_mode;
      action_tx.send(Action::ViewModeChanged(view_mode))?;
    }
    Ok(())
  }

  fn spawn_fetch(&mut self, action_tx: &UnboundedSender<Action>) {
    if self.fetching {
      log::debug!("Fetch already in flight");
      return;
    }
    self.fetching = true;
    let news = self.news.clone();
    let tx = action_tx.clone();
    tokio::spawn(async move {
      let action = match news.top_headlines().await {
        Ok(articles) => Action::ArticlesLoaded(articles),
        Err(e) => {
          log::error!("Error fetching articles: {e}");
          Action::FetchFailed(e.to_string())
        },
      };
      // The app is shutting down if nobody is listening.
      let _ = tx.send(action);
    });
  }

  fn spawn_reader(&self, article: Article, action_tx: &UnboundedSender<Action>) {
    let tx = action_tx.clone();
    tokio::spawn(async move {
      let url = article.url.clone();
      let result = tokio::task::spawn_blocking(move || extractor::scrape(&url)).await;
      let action = match result {
        Ok(Ok(product)) => Action::UpdateReader { url: article.url, title: article.title, content: product.content },
        Ok(Err(e)) => {
          log::error!("Failed to extract {}: {e:?}", article.url);
          Action::ReaderFailed { url: article.url }
        },
        Err(e) => {
          log::error!("Reader task for {} failed: {e}", article.url);
          Action::ReaderFailed { url: article.url }
        },
      };
      let _ = tx.send(action);
    });
  }

  pub fn update(&mut self, action: Action, action_tx: &UnboundedSender<Action>) -> Result<()> {
    if action != Action::Tick && action != Action::Render {
      log::debug!("{action}");
    }
    match action {
      Action::Tick => {
        self.last_tick_key_events.clear();
      },
      Action::Quit => self.should_quit = true,
      Action::Suspend => self.should_suspend = true,
      Action::Resume => self.should_suspend = false,
      Action::RequestRefresh => self.spawn_fetch(action_tx),
      Action::ArticlesLoaded(_) | Action::FetchFailed(_) => self.fetching = false,
      Action::ToggleViewMode => self.set_view_mode(self.view_mode.toggle(), action_tx)?,
      Action::SetViewMode(view_mode) => self.set_view_mode(view_mode, action_tx)?,
      Action::OpenArticle(ref article) => {
        log::info!("Opening {}", article.url);
        self.spawn_reader(article.clone(), action_tx);
        self.change_mode(Mode::Reader, action_tx)?;
      },
      Action::CloseReader | Action::CloseFeedback => self.change_mode(Mode::Articles, action_tx)?,
      Action::OpenFeedback => self.change_mode(Mode::Feedback, action_tx)?,
      _ => {},
    }
    for component in self.components_mut() {
      if let Some(action) = component.update(action.clone())? {
        action_tx.send(action)?
      };
    }
    Ok(())
  }

  fn render(&mut self, tui: &mut tui::Tui, action_tx: &UnboundedSender<Action>) -> Result<()> {
    let mut errors = Vec::new();
    let mode = self.mode;
    tui.draw(|f| {
      let [main_area, info_area] = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(f.size());
      let [sidebar_area, content_area] =
        Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Fill(1)]).areas(main_area);
      let full_area = f.size();

      let content: &mut dyn Component = match mode {
        Mode::Articles => &mut self.article_list,
        Mode::Reader => &mut self.article_reader,
        Mode::Feedback => &mut self.feedback_form,
      };
      let layers: [(&mut dyn Component, Rect); 4] = [
        (&mut self.sidebar, sidebar_area),
        (content, content_area),
        (&mut self.info_bar, info_area),
        (&mut self.quit_popup, full_area),
      ];
      for (component, area) in layers {
        if let Err(e) = component.draw(f, area) {
          errors.push(e);
        }
      }
    })?;
    for e in errors {
      action_tx.send(Action::Error(format!("Failed to draw: {e:?}")))?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
  use pretty_assertions::assert_eq;
  use tokio::sync::mpsc::UnboundedReceiver;

  use super::*;
  use crate::components::test_utils::{buffer_text, render};

  fn app() -> (App, UnboundedSender<Action>, UnboundedReceiver<Action>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let app = App::with_config(Config::default(), ViewMode::List).unwrap();
    (app, tx, rx)
  }

  fn drain(rx: &mut UnboundedReceiver<Action>) -> Vec<Action> {
    let mut actions = Vec::new();
    while let Ok(action) = rx.try_recv() {
      actions.push(action);
    }
    actions
  }

  #[test]
  fn toggling_broadcasts_the_new_view_mode() {
    let (mut app, tx, mut rx) = app();
    app.update(Action::ToggleViewMode, &tx).unwrap();
    assert_eq!(app.view_mode, ViewMode::Grid);
    assert_eq!(drain(&mut rx), [Action::ViewModeChanged(ViewMode::Grid)]);

    app.update(Action::SetViewMode(ViewMode::Grid), &tx).unwrap();
    assert!(drain(&mut rx).is_empty());
  }

  #[test]
  fn feedback_navigation_changes_mode() {
    let (mut app, tx, mut rx) = app();
    app.update(Action::OpenFeedback, &tx).unwrap();
    assert_eq!(app.mode, Mode::Feedback);
    assert_eq!(drain(&mut rx), [Action::ModeChange(Mode::Feedback)]);

    app.update(Action::CloseFeedback, &tx).unwrap();
    assert_eq!(app.mode, Mode::Articles);
    assert_eq!(drain(&mut rx), [Action::ModeChange(Mode::Articles)]);
  }

  #[test]
  fn keys_resolve_through_the_current_mode() {
    let config: Config = json5::from_str(include_str!("../.config/config.json5")).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::with_config(config, ViewMode::List).unwrap();

    app.handle_key(KeyEvent::from(crossterm::event::KeyCode::Char('f')), &tx).unwrap();
    assert_eq!(drain(&mut rx), [Action::OpenFeedback]);

    app.mode = Mode::Feedback;
    app.handle_key(KeyEvent::from(crossterm::event::KeyCode::Char('f')), &tx).unwrap();
    assert!(drain(&mut rx).is_empty());
    app.handle_key(KeyEvent::from(crossterm::event::KeyCode::Esc), &tx).unwrap();
    assert_eq!(drain(&mut rx), [Action::CloseFeedback]);
  }

  #[test]
  fn quit_popup_blocks_clicks_underneath() {
    let (mut app, tx, mut rx) = app();
    app.quit_popup.register_config_handler(Config { confirm_quit: true, ..Config::default() }).unwrap();
    render(&mut app.sidebar, SIDEBAR_WIDTH, 20);
    // Middle of the Grid toggle button.
    let click = tui::Event::Mouse(MouseEvent {
      kind: MouseEventKind::Down(MouseButton::Left),
      column: 22,
      row: 5,
      modifiers: KeyModifiers::NONE,
    });

    app.dispatch_event(click.clone(), &tx).unwrap();
    assert_eq!(drain(&mut rx), [Action::SetViewMode(ViewMode::Grid)]);

    app.update(Action::ConfirmQuit, &tx).unwrap();
    assert!(app.quit_popup.is_shown());
    app.dispatch_event(click, &tx).unwrap();
    assert!(drain(&mut rx).is_empty());
  }

  #[tokio::test]
  async fn fetch_without_api_key_reports_failure() {
    let (mut app, tx, mut rx) = app();
    app.update(Action::RequestRefresh, &tx).unwrap();
    assert!(app.fetching);

    // A second request while the first is in flight is dropped.
    app.update(Action::RequestRefresh, &tx).unwrap();

    let action = rx.recv().await.unwrap();
    assert!(matches!(action, Action::FetchFailed(ref message) if message.contains("API key")));
    app.update(action, &tx).unwrap();
    assert!(!app.fetching);
    assert!(buffer_text(&render(&mut app.article_list, 80, 10)).contains("No API key configured"));
    assert!(rx.try_recv().is_err());
  }
}
