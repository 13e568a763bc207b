use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{mode::Mode, news::Article, view_mode::ViewMode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display, Deserialize)]
pub enum Action {
  Tick,
  Render,
  Resize(u16, u16),
  Suspend,
  Resume,
  ConfirmQuit,
  Quit,
  RequestRefresh,
  ArticlesLoaded(Vec<Article>),
  FetchFailed(String),
  ModeChange(Mode),
  ToggleViewMode,
  SetViewMode(ViewMode),
  ViewModeChanged(ViewMode),
  NextPage,
  PreviousPage,
  OpenArticle(Article),
  UpdateReader { url: String, title: String, content: String },
  ReaderFailed { url: String },
  CloseReader,
  OpenFeedback,
  CloseFeedback,
  SubmitFeedback,
  Status(String),
  Error(String),
}
