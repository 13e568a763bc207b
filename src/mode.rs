use serde::{Deserialize, Serialize};

/// Which screen currently owns the main area and the keyboard.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
  #[default]
  #[serde(alias = "articles")]
  Articles,
  #[serde(alias = "reader")]
  Reader,
  #[serde(alias = "feedback")]
  Feedback,
}
