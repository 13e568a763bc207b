use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::Display;

/// How the article list lays out its cards.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, ValueEnum)]
pub enum ViewMode {
  #[default]
  List,
  Grid,
}

impl ViewMode {
  pub fn toggle(self) -> Self {
    match self {
      ViewMode::List => ViewMode::Grid,
      ViewMode::Grid => ViewMode::List,
    }
  }
}

/// Number of card columns that fit into `width` terminal cells in grid mode.
pub fn grid_columns(width: u16) -> usize {
  match width {
    w if w >= 120 => 3,
    w if w >= 80 => 2,
    _ => 1,
  }
}
