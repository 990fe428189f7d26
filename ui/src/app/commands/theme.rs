use crate::app::App;
use crate::app::cli::ThemeCommand;
use crate::app::view::{self, ThemeView};
use crate::error::{AppError, AppResult};
use nimbus_client::theme::{ModeChange, PALETTES, ThemeMode};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ModeReport {
    mode: ThemeMode,
    saved: bool,
}

/// Text for a mode change. A failed save is reported as an error because the
/// change would not outlive this process.
pub fn describe_mode_change(mode: ThemeMode, change: &ModeChange) -> AppResult<String> {
    match change {
        ModeChange::Unchanged => Ok(format!("Already using {mode} mode.")),
        ModeChange::Persisted => Ok(format!("Switched to {mode} mode.")),
        ModeChange::LocalOnly => Err(AppError::Api(
            "The saved theme is not loaded, so the mode was not saved.".to_string(),
        )),
        ModeChange::PersistFailed(reason) => Err(AppError::Api(format!(
            "Switched to {mode} mode but saving failed: {reason}"
        ))),
    }
}

pub async fn run(app: &App, command: ThemeCommand) -> AppResult<()> {
    let theme = &app.console().theme;
    let output = app.output();

    match command {
        ThemeCommand::Show => {
            let theme_view = ThemeView::new(
                &theme.phase().await,
                theme.mode().await,
                theme.selected_palette().await,
                theme.remote().await,
                app.styles().snapshot(),
            );
            output.emit(&theme_view, view::theme_summary)
        }
        ThemeCommand::Mode { mode } => {
            app.require_user().await?;
            let change = theme.set_mode(mode).await;
            report_mode(app, &change).await
        }
        ThemeCommand::Toggle => {
            app.require_user().await?;
            let change = theme.toggle().await;
            report_mode(app, &change).await
        }
        ThemeCommand::Palette { id } => {
            app.require_user().await?;
            let saved = theme.apply_palette(&id).await?;
            let palette = theme.selected_palette().await;
            output.emit(&saved, |_| format!("Applied the {} palette.", palette.name))
        }
        ThemeCommand::Palettes => {
            let selected = theme.selected_palette().await;
            output.emit(&PALETTES[..], |_| view::palettes_table(selected))
        }
    }
}

async fn report_mode(app: &App, change: &ModeChange) -> AppResult<()> {
    let mode = app.console().theme.mode().await;
    let message = describe_mode_change(mode, change)?;
    let report = ModeReport {
        mode,
        saved: *change == ModeChange::Persisted,
    };
    app.output().emit(&report, |_| message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_change_messages() {
        assert_eq!(
            describe_mode_change(ThemeMode::Dark, &ModeChange::Persisted).unwrap(),
            "Switched to dark mode."
        );
        assert_eq!(
            describe_mode_change(ThemeMode::Light, &ModeChange::Unchanged).unwrap(),
            "Already using light mode."
        );
        assert!(matches!(
            describe_mode_change(ThemeMode::Dark, &ModeChange::PersistFailed("offline".into())),
            Err(AppError::Api(msg)) if msg.contains("offline")
        ));
        assert!(describe_mode_change(ThemeMode::Dark, &ModeChange::LocalOnly).is_err());
    }
}
