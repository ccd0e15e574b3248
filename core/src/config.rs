use failure::Error;

use serde_derive::Deserialize;

use std::fs;
use std::path::Path;

use crate::codec::Format;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct History {
  /// Check that every new commit can be undone before recording it
  pub verify_commits: bool,
}

impl Default for History {
  fn default() -> History {
    History {
      verify_commits: cfg!(debug_assertions),
    }
  }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Container {
  pub format: Format,
}

impl Default for Container {
  fn default() -> Container {
    Container {
      format: Format::Binary,
    }
  }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
  pub history: History,
  pub container: Container,
}

impl Config {
  pub fn from_file<P>(path: P) -> Result<Config, Error>
  where
    P: AsRef<Path>,
  {
    let content = fs::read_to_string(path.as_ref())?;
    Config::from_str(content.as_str())
  }

  pub fn from_str<'a, T>(content: T) -> Result<Config, Error>
  where
    T: Into<&'a str>,
  {
    let config: Config = toml::from_str(content.into())?;
    Ok(config)
  }
}
