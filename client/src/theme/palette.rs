use super::config::ThemeConfig;
use serde::Serialize;

/// Predefined primary/accent colour pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub primary: &'static str,
    pub accent: &'static str,
}

impl Palette {
    /// Partial theme written when this palette is selected.
    pub fn as_partial(&self) -> ThemeConfig {
        ThemeConfig::new()
            .with_primary_color(self.primary)
            .with_accent_color(self.accent)
            .with_scheme_id(self.id)
    }
}

pub const DEFAULT_PALETTE_ID: &str = "ocean-blue";

pub static PALETTES: [Palette; 5] = [
    Palette {
        id: "ocean-blue",
        name: "Ocean Blue",
        description: "Calm and professional blue tones",
        primary: "#0ea5e9",
        accent: "#0284c7",
    },
    Palette {
        id: "emerald-green",
        name: "Emerald Green",
        description: "Fresh and vibrant green shades",
        primary: "#10b981",
        accent: "#059669",
    },
    Palette {
        id: "sunset-orange",
        name: "Sunset Orange",
        description: "Warm and energetic orange hues",
        primary: "#f59e0b",
        accent: "#d97706",
    },
    Palette {
        id: "royal-purple",
        name: "Royal Purple",
        description: "Elegant and sophisticated purple",
        primary: "#a855f7",
        accent: "#9333ea",
    },
    Palette {
        id: "crimson-red",
        name: "Crimson Red",
        description: "Bold and powerful red accents",
        primary: "#ef4444",
        accent: "#dc2626",
    },
];

pub fn find(id: &str) -> Option<&'static Palette> {
    PALETTES.iter().find(|palette| palette.id == id)
}

fn default_palette() -> &'static Palette {
    &PALETTES[0]
}

/// Palette the given theme corresponds to.
///
/// Resolved by `schemeId`, then by a case-insensitive `primaryColor` match,
/// then the default palette.
pub fn selected_palette(config: Option<&ThemeConfig>) -> &'static Palette {
    let Some(config) = config else {
        return default_palette();
    };

    if let Some(palette) = config.scheme_id().and_then(find) {
        return palette;
    }

    config
        .primary_color()
        .and_then(|primary| {
            PALETTES
                .iter()
                .find(|palette| palette.primary.eq_ignore_ascii_case(primary))
        })
        .unwrap_or_else(default_palette)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_prefers_scheme_id() {
        let config = ThemeConfig::new()
            .with_scheme_id("royal-purple")
            .with_primary_color("#10b981");
        assert_eq!(selected_palette(Some(&config)).id, "royal-purple");
    }

    #[test]
    fn test_selection_matches_primary_case_insensitively() {
        let config = ThemeConfig::new().with_primary_color("#F59E0B");
        assert_eq!(selected_palette(Some(&config)).id, "sunset-orange");

        let unknown_scheme = ThemeConfig::new()
            .with_scheme_id("midnight")
            .with_primary_color("#EF4444");
        assert_eq!(selected_palette(Some(&unknown_scheme)).id, "crimson-red");
    }

    #[test]
    fn test_selection_defaults_to_ocean_blue() {
        assert_eq!(selected_palette(None).id, DEFAULT_PALETTE_ID);
        let custom = ThemeConfig::new().with_primary_color("#123456");
        assert_eq!(selected_palette(Some(&custom)).id, DEFAULT_PALETTE_ID);
    }

    #[test]
    fn test_partial_carries_both_colours_and_id() {
        let partial = find("emerald-green").unwrap().as_partial();
        assert_eq!(partial.primary_color(), Some("#10b981"));
        assert_eq!(partial.accent_color(), Some("#059669"));
        assert_eq!(partial.scheme_id(), Some("emerald-green"));
        assert_eq!(partial.mode(), None);
    }
}
