use super::color::hex_to_hsl;
use super::config::{ThemeConfig, ThemeMode};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

pub const PRIMARY_SLOT: &str = "--primary";
pub const RING_SLOT: &str = "--ring";
pub const ACCENT_SLOT: &str = "--accent";

/// All slots written by [`apply_theme_styles`].
pub const THEME_SLOTS: [&str; 3] = [PRIMARY_SLOT, ACCENT_SLOT, RING_SLOT];

/// Destination for derived presentation state.
pub trait StyleSink: Send + Sync {
    fn set_property(&self, slot: &str, value: &str);
    fn remove_property(&self, slot: &str);
    fn set_mode(&self, mode: ThemeMode);
}

/// Writes the colour slots derived from `config`.
///
/// `primaryColor` feeds `--primary` and `--ring`, `accentColor` feeds
/// `--accent`. Colours that fail to parse are logged and left unset.
/// Slots whose key is absent are not touched.
pub fn apply_theme_styles(sink: &dyn StyleSink, config: &ThemeConfig) {
    if let Some(primary) = config.primary_color() {
        match hex_to_hsl(primary) {
            Ok(hsl) => {
                sink.set_property(PRIMARY_SLOT, &hsl);
                sink.set_property(RING_SLOT, &hsl);
            }
            Err(e) => log::warn!("Skipping primary colour: {e}"),
        }
    }

    if let Some(accent) = config.accent_color() {
        match hex_to_hsl(accent) {
            Ok(hsl) => sink.set_property(ACCENT_SLOT, &hsl),
            Err(e) => log::warn!("Skipping accent colour: {e}"),
        }
    }
}

pub fn clear_theme_styles(sink: &dyn StyleSink) {
    for slot in THEME_SLOTS {
        sink.remove_property(slot);
    }
}

/// Snapshot of derived style state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StyleSnapshot {
    pub mode: ThemeMode,
    pub properties: BTreeMap<String, String>,
}

impl StyleSnapshot {
    pub fn property(&self, slot: &str) -> Option<&str> {
        self.properties.get(slot).map(String::as_str)
    }
}

/// In-memory [`StyleSink`], read back by the terminal front end and by tests.
#[derive(Debug, Default)]
pub struct DerivedStyles {
    state: Mutex<StyleSnapshot>,
}

impl DerivedStyles {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, StyleSnapshot> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> StyleSnapshot {
        self.state().clone()
    }
}

impl StyleSink for DerivedStyles {
    fn set_property(&self, slot: &str, value: &str) {
        self.state()
            .properties
            .insert(slot.to_string(), value.to_string());
    }

    fn remove_property(&self, slot: &str) {
        self.state().properties.remove(slot);
    }

    fn set_mode(&self, mode: ThemeMode) {
        self.state().mode = mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_sets_primary_and_ring() {
        let styles = DerivedStyles::new();
        let config = ThemeConfig::new()
            .with_primary_color("#0ea5e9")
            .with_accent_color("#0284c7");

        apply_theme_styles(&styles, &config);

        let snapshot = styles.snapshot();
        assert_eq!(snapshot.property(PRIMARY_SLOT), Some("199 89% 48%"));
        assert_eq!(snapshot.property(RING_SLOT), Some("199 89% 48%"));
        assert!(snapshot.property(ACCENT_SLOT).is_some());
    }

    #[test]
    fn test_invalid_colour_is_skipped() {
        let styles = DerivedStyles::new();
        let config = ThemeConfig::new()
            .with_primary_color("not-a-colour")
            .with_accent_color("#ff0000");

        apply_theme_styles(&styles, &config);

        let snapshot = styles.snapshot();
        assert_eq!(snapshot.property(PRIMARY_SLOT), None);
        assert_eq!(snapshot.property(RING_SLOT), None);
        assert_eq!(snapshot.property(ACCENT_SLOT), Some("0 100% 50%"));
    }

    #[test]
    fn test_clear_removes_every_slot() {
        let styles = DerivedStyles::new();
        apply_theme_styles(
            &styles,
            &ThemeConfig::new()
                .with_primary_color("#10b981")
                .with_accent_color("#059669"),
        );
        clear_theme_styles(&styles);
        assert!(styles.snapshot().properties.is_empty());
    }
}
