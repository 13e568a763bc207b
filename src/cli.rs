use clap::Parser;

use crate::{utils::version, view_mode::ViewMode};

#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
  #[arg(short, long, value_name = "FLOAT", help = "Tick rate, i.e. number of ticks per second", default_value_t = 1.0)]
  pub tick_rate: f64,

  #[arg(short, long, value_name = "FLOAT", help = "Frame rate, i.e. number of frames per second", default_value_t = 4.0)]
  pub frame_rate: f64,

  #[arg(short, long, value_name = "CODE", help = "Two-letter country code for the headlines, overrides the config")]
  pub country: Option<String>,

  #[arg(short, long, value_enum, help = "Initial article layout")]
  pub view: Option<ViewMode>,
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn defaults() {
    let cli = Cli::parse_from(["nuusvoer"]);
    assert_eq!(cli.tick_rate, 1.0);
    assert_eq!(cli.frame_rate, 4.0);
    assert_eq!(cli.country, None);
    assert_eq!(cli.view, None);
  }

  #[test]
  fn country_and_view() {
    let cli = Cli::parse_from(["nuusvoer", "--country", "za", "--view", "grid"]);
    assert_eq!(cli.country.as_deref(), Some("za"));
    assert_eq!(cli.view, Some(ViewMode::Grid));
  }
}
