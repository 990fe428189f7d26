use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

pub const MODE_KEY: &str = "mode";
pub const PRIMARY_COLOR_KEY: &str = "primaryColor";
pub const ACCENT_COLOR_KEY: &str = "accentColor";
pub const SCHEME_ID_KEY: &str = "schemeId";

/// Light or dark display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!("unknown theme mode '{other}', expected 'light' or 'dark'")),
        }
    }
}

/// Per-user theme document as stored by the backend.
///
/// This is an open JSON object: the known keys (`mode`, `primaryColor`,
/// `accentColor`, `schemeId`) have typed accessors, and every other key is
/// carried through merges and saves untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeConfig(Map<String, Value>);

impl ThemeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Stored mode. A missing or unrecognised value reads as absent.
    pub fn mode(&self) -> Option<ThemeMode> {
        self.get_str(MODE_KEY).and_then(|mode| mode.parse().ok())
    }

    pub fn primary_color(&self) -> Option<&str> {
        self.get_str(PRIMARY_COLOR_KEY)
    }

    pub fn accent_color(&self) -> Option<&str> {
        self.get_str(ACCENT_COLOR_KEY)
    }

    pub fn scheme_id(&self) -> Option<&str> {
        self.get_str(SCHEME_ID_KEY)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.set(key, value);
        self
    }

    pub fn with_mode(self, mode: ThemeMode) -> Self {
        self.with(MODE_KEY, Value::String(mode.as_str().to_string()))
    }

    pub fn with_primary_color(self, color: &str) -> Self {
        self.with(PRIMARY_COLOR_KEY, Value::String(color.to_string()))
    }

    pub fn with_accent_color(self, color: &str) -> Self {
        self.with(ACCENT_COLOR_KEY, Value::String(color.to_string()))
    }

    pub fn with_scheme_id(self, scheme_id: &str) -> Self {
        self.with(SCHEME_ID_KEY, Value::String(scheme_id.to_string()))
    }

    /// Shallow merge: every top-level key of `overlay` replaces the same key here.
    pub fn merged(&self, overlay: &ThemeConfig) -> ThemeConfig {
        let mut merged = self.0.clone();
        for (key, value) in &overlay.0 {
            merged.insert(key.clone(), value.clone());
        }
        ThemeConfig(merged)
    }
}

/// Builds the document to PUT for a save of `partial`.
///
/// `partial` is shallowly merged over `remote`. The resulting `mode` is taken
/// from `partial`, then `remote`, then `local_mode`.
pub fn merge_for_save(
    remote: Option<&ThemeConfig>,
    partial: &ThemeConfig,
    local_mode: ThemeMode,
) -> ThemeConfig {
    let base = remote.cloned().unwrap_or_default();
    let mode = partial
        .mode()
        .or_else(|| remote.and_then(ThemeConfig::mode))
        .unwrap_or(local_mode);
    base.merged(partial).with_mode(mode)
}
