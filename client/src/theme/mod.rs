//! Display theme: configuration document, colour conversion, palettes and
//! the synchronizer that ties them to the authenticated user.

pub mod color;
pub mod config;
pub mod palette;
pub mod style;
pub mod sync;

pub use color::hex_to_hsl;
pub use config::{ThemeConfig, ThemeMode};
pub use palette::{PALETTES, Palette};
pub use style::{DerivedStyles, StyleSink};
pub use sync::{ModeChange, ThemePhase, ThemeSynchronizer};
