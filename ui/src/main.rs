use clap::Parser;
use nimbus::app::cli::ConfigCommand;
use nimbus::app::commands;
use nimbus::config::{self, ConfigLoadResult};
use nimbus::{App, AppError, AppResult, Cli, Command, Output, logger};
use std::io::IsTerminal;
use std::process::ExitCode;

fn report(error: &AppError) -> ExitCode {
    log::error!("{error}");
    eprintln!("{error}");
    ExitCode::FAILURE
}

fn finish(result: AppResult<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.global.json || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let output = Output::new(cli.global.json);
    if let Command::Config(ConfigCommand::Init { force }) = cli.command {
        return finish(commands::config::init(force, output));
    }

    let app_config = match config::init_config(cli.global.config.as_deref()) {
        ConfigLoadResult::Success(config) => config,
        ConfigLoadResult::LoadError(msg) | ConfigLoadResult::DeserializeError(msg) => {
            return report(&AppError::Config(msg.clone()));
        }
    };

    if let Err(errors) = app_config.validate() {
        eprintln!("Configuration is invalid:\n");
        for error in &errors {
            eprintln!("{}\n", error.user_message());
        }
        return ExitCode::FAILURE;
    }

    if let Err(e) = logger::setup_logger(app_config.logging()) {
        eprintln!("Warning: Failed to initialize logger: {e}");
    }

    let result = match cli.command {
        Command::Config(_) => commands::config::show(app_config, output),
        command => match App::new(app_config, &cli.global) {
            Ok(app) => app.run(command).await,
            Err(e) => Err(e),
        },
    };

    finish(result)
}
