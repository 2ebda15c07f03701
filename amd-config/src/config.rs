use ahash::HashMap;
use serde::Serialize;
use std::path::PathBuf;

/// A statically-recovered configuration value.
///
/// `Unknown` is not an error: it records that a key exists in the source but
/// its value cannot be determined without executing code. Downstream tooling
/// can thereby distinguish "key present, value unknown" from "key absent".
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
  /// Present in the source but not statically determinable. Serializes as
  /// `null`.
  Unknown,
  /// An explicit `null` literal. Serializes the same as `Unknown` but stays
  /// distinct in-process.
  Null,
  Str(String),
  Num(f64),
  Bool(bool),
  Arr(Vec<ConfigValue>),
  Obj(ConfigMap),
}

impl ConfigValue {
  pub fn as_str(&self) -> Option<&str> {
    match self {
      ConfigValue::Str(s) => Some(s),
      _ => None,
    }
  }
}

pub type ConfigMap = HashMap<String, ConfigValue>;

/// Configuration as extracted from source, before it has been tailored to the
/// location of the file it was found in. `base_dir` is only set by the
/// `data-main` strategy and is still relative to that attribute at this
/// point.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawConfig {
  pub base_dir: Option<String>,
  pub entries: ConfigMap,
}

impl RawConfig {
  pub fn from_entries(entries: ConfigMap) -> RawConfig {
    RawConfig {
      base_dir: None,
      entries,
    }
  }
}

/// A discovered AMD loader configuration, tailored to the file it was found
/// in: `base_dir` is always present and always an absolute, normalized path.
/// This is the only configuration type handed to callers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AmdConfig {
  #[serde(rename = "baseDir")]
  pub base_dir: PathBuf,
  #[serde(flatten)]
  pub entries: ConfigMap,
}

impl AmdConfig {
  pub fn get(&self, key: &str) -> Option<&ConfigValue> {
    self.entries.get(key)
  }
}
