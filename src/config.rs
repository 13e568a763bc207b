use std::{collections::HashMap, path::PathBuf};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use derive_deref::{Deref, DerefMut};
use serde::{
  de::{self, Deserializer},
  Deserialize,
};

use crate::{action::Action, mode::Mode};

const CONFIG: &str = include_str!("../.config/config.json5");

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
  #[serde(default)]
  pub _data_dir: PathBuf,
  #[serde(default)]
  pub _config_dir: PathBuf,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
  #[serde(default, flatten)]
  pub config: AppConfig,
  #[serde(default = "default_as_true")]
  pub confirm_quit: bool,
  #[serde(default)]
  pub news: NewsConfig,
  #[serde(default)]
  pub keybindings: KeyBindings,
}

impl Config {
  pub fn new() -> Result<Self> {
    let default_config: Config = json5::from_str(CONFIG)?;
    let data_dir = crate::utils::get_data_dir();
    let config_dir = crate::utils::get_config_dir();
    let mut builder = config::Config::builder()
      .set_default("_data_dir", data_dir.to_string_lossy().to_string())?
      .set_default("_config_dir", config_dir.to_string_lossy().to_string())?;

    let config_files = [
      ("config.json5", config::FileFormat::Json5),
      ("config.json", config::FileFormat::Json),
      ("config.yaml", config::FileFormat::Yaml),
      ("config.toml", config::FileFormat::Toml),
      ("config.ini", config::FileFormat::Ini),
    ];
    let mut found_config = false;
    for (file, format) in &config_files {
      builder = builder.add_source(config::File::from(config_dir.join(file)).format(*format).required(false));
      if config_dir.join(file).exists() {
        found_config = true
      }
    }
    if !found_config {
      log::warn!("No configuration file found in {}, using defaults", config_dir.display());
    }

    builder = builder.add_source(
      config::Environment::with_prefix(crate::utils::PROJECT_NAME.as_str()).prefix_separator("_").separator("__"),
    );

    let mut cfg: Self = builder.build()?.try_deserialize()?;

    for (mode, default_bindings) in default_config.keybindings.iter() {
      let user_bindings = cfg.keybindings.entry(*mode).or_default();
      for (key, action) in default_bindings.iter() {
        user_bindings.entry(key.clone()).or_insert_with(|| action.clone());
      }
    }

    Ok(cfg)
  }

  /// Action bound to `keys` in `mode`, if any.
  pub fn action_for(&self, mode: Mode, keys: &[KeyEvent]) -> Option<&Action> {
    self.keybindings.get(&mode).and_then(|keymap| keymap.get(keys))
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
  pub endpoint: String,
  pub country: String,
  pub api_key: Option<String>,
}

impl Default for NewsConfig {
  fn default() -> Self {
    Self { endpoint: "https://newsapi.org/v2/top-headlines".to_string(), country: "in".to_string(), api_key: None }
  }
}

#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct KeyBindings(pub HashMap<Mode, HashMap<Vec<KeyEvent>, Action>>);

impl<'de> Deserialize<'de> for KeyBindings {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let parsed_map = HashMap::<Mode, HashMap<String, Action>>::deserialize(deserializer)?;

    let mut keybindings = HashMap::new();
    for (mode, inner_map) in parsed_map {
      let mut converted = HashMap::new();
      for (key_str, action) in inner_map {
        let keys = parse_key_sequence(&key_str).map_err(de::Error::custom)?;
        converted.insert(keys, action);
      }
      keybindings.insert(mode, converted);
    }

    Ok(KeyBindings(keybindings))
  }
}

fn parse_key_event(raw: &str) -> Result<KeyEvent, String> {
  let raw_lower = raw.to_ascii_lowercase();
  let (remaining, modifiers) = extract_modifiers(&raw_lower);
  parse_key_code_with_modifiers(remaining, modifiers)
}

fn extract_modifiers(raw: &str) -> (&str, KeyModifiers) {
  let mut modifiers = KeyModifiers::empty();
  let mut current = raw;

  loop {
    match current {
      rest if rest.starts_with("ctrl-") => {
        modifiers.insert(KeyModifiers::CONTROL);
        current = &rest[5..];
      },
      rest if rest.starts_with("alt-") => {
        modifiers.insert(KeyModifiers::ALT);
        current = &rest[4..];
      },
      rest if rest.starts_with("shift-") => {
        modifiers.insert(KeyModifiers::SHIFT);
        current = &rest[6..];
      },
      _ => break,
    };
  }

  (current, modifiers)
}

fn parse_key_code_with_modifiers(raw: &str, mut modifiers: KeyModifiers) -> Result<KeyEvent, String> {
  let c = match raw {
    "esc" => KeyCode::Esc,
    "enter" => KeyCode::Enter,
    "left" => KeyCode::Left,
    "right" => KeyCode::Right,
    "up" => KeyCode::Up,
    "down" => KeyCode::Down,
    "home" => KeyCode::Home,
    "end" => KeyCode::End,
    "pageup" => KeyCode::PageUp,
    "pagedown" => KeyCode::PageDown,
    "backtab" => {
      modifiers.insert(KeyModifiers::SHIFT);
      KeyCode::BackTab
    },
    "backspace" => KeyCode::Backspace,
    "delete" => KeyCode::Delete,
    "insert" => KeyCode::Insert,
    "tab" => KeyCode::Tab,
    "space" => KeyCode::Char(' '),
    "hyphen" | "minus" => KeyCode::Char('-'),
    f if f.len() > 1 && f.starts_with('f') && f[1..].parse::<u8>().is_ok() => {
      KeyCode::F(f[1..].parse::<u8>().map_err(|e| e.to_string())?)
    },
    c if c.chars().count() == 1 => {
      let mut c = c.chars().next().ok_or_else(|| format!("Unable to parse `{raw}`"))?;
      if modifiers.contains(KeyModifiers::SHIFT) {
        c = c.to_ascii_uppercase();
      }
      KeyCode::Char(c)
    },
    _ => return Err(format!("Unable to parse `{raw}`")),
  };
  Ok(KeyEvent::new(c, modifiers))
}

pub fn parse_key_sequence(raw: &str) -> Result<Vec<KeyEvent>, String> {
  if raw.chars().filter(|c| *c == '>').count() != raw.chars().filter(|c| *c == '<').count() {
    return Err(format!("Unable to parse `{raw}`"));
  }
  let raw = if !raw.contains("><") {
    let raw = raw.strip_prefix('<').unwrap_or(raw);
    raw.strip_suffix('>').unwrap_or(raw)
  } else {
    raw
  };
  raw
    .split("><")
    .map(|seq| seq.strip_prefix('<').or_else(|| seq.strip_suffix('>')).unwrap_or(seq))
    .map(parse_key_event)
    .collect()
}

const fn default_as_true() -> bool {
  true
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn default_config_parses() {
    let config: Config = json5::from_str(CONFIG).unwrap();
    assert!(config.confirm_quit);
    assert_eq!(config.news, NewsConfig::default());

    let quit = parse_key_sequence("<q>").unwrap();
    assert_eq!(config.action_for(Mode::Articles, &quit), Some(&Action::ConfirmQuit));
    assert_eq!(config.action_for(Mode::Reader, &quit), Some(&Action::CloseReader));
    assert_eq!(config.action_for(Mode::Feedback, &quit), None);

    let submit = parse_key_sequence("<Ctrl-s>").unwrap();
    assert_eq!(config.action_for(Mode::Feedback, &submit), Some(&Action::SubmitFeedback));
  }

  #[test]
  fn feedback_mode_leaves_plain_letters_to_the_form() {
    let config: Config = json5::from_str(CONFIG).unwrap();
    for c in 'a'..='z' {
      let keys = vec![KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)];
      assert_eq!(config.action_for(Mode::Feedback, &keys), None, "`{c}` is bound in feedback mode");
    }
  }

  #[test]
  fn simple_keys() {
    assert_eq!(parse_key_event("a").unwrap(), KeyEvent::new(KeyCode::Char('a'), KeyModifiers::empty()));
    assert_eq!(parse_key_event("enter").unwrap(), KeyEvent::new(KeyCode::Enter, KeyModifiers::empty()));
    assert_eq!(parse_key_event("esc").unwrap(), KeyEvent::new(KeyCode::Esc, KeyModifiers::empty()));
    assert_eq!(parse_key_event("f5").unwrap(), KeyEvent::new(KeyCode::F(5), KeyModifiers::empty()));
  }

  #[test]
  fn with_modifiers() {
    assert_eq!(parse_key_event("ctrl-a").unwrap(), KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));
    assert_eq!(parse_key_event("Ctrl-S").unwrap(), KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
    assert_eq!(
      parse_key_event("ctrl-alt-a").unwrap(),
      KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL | KeyModifiers::ALT)
    );
    assert_eq!(parse_key_event("shift-x").unwrap(), KeyEvent::new(KeyCode::Char('X'), KeyModifiers::SHIFT));
  }

  #[test]
  fn sequences() {
    assert_eq!(
      parse_key_sequence("<g><g>").unwrap(),
      vec![
        KeyEvent::new(KeyCode::Char('g'), KeyModifiers::empty()),
        KeyEvent::new(KeyCode::Char('g'), KeyModifiers::empty()),
      ]
    );
    assert_eq!(parse_key_sequence("<right>").unwrap(), vec![KeyEvent::new(KeyCode::Right, KeyModifiers::empty())]);
  }

  #[test]
  fn invalid_keys() {
    assert!(parse_key_event("invalid-key").is_err());
    assert!(parse_key_event("ctrl-invalid-key").is_err());
    assert!(parse_key_sequence("<q").is_err());
  }
}
