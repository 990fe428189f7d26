use clap::{Args, Parser, Subcommand};
use nimbus_client::model::Role;
use nimbus_client::theme::ThemeMode;
use std::path::PathBuf;

/// Nimbus cloud dashboard from the terminal
///
/// Manage your session, resources, users and dashboard theme against a
/// Nimbus backend.
#[derive(Parser, Debug)]
#[command(name = "nimbus")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Configuration file (defaults to ./config.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backend URL, overriding api.base_url
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Keep the session in memory only; nothing is read from or written to disk
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Sign in and remember the session
    Login {
        /// Account email
        #[arg(long, short)]
        email: Option<String>,
    },

    /// Create an account and sign in
    Register {
        /// Account email
        #[arg(long, short)]
        email: Option<String>,

        /// Name shown on the dashboard
        #[arg(long)]
        display_name: Option<String>,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Show or edit your profile
    Profile(ProfileArgs),

    /// Resource counts by status
    Dashboard,

    /// Manage cloud resources and templates
    #[command(subcommand)]
    Resources(ResourceCommand),

    /// Manage users (admin only)
    #[command(subcommand)]
    Users(UserCommand),

    /// Show or change the dashboard theme
    #[command(subcommand)]
    Theme(ThemeCommand),

    /// Inspect or create the configuration file
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ProfileArgs {
    #[arg(long)]
    pub display_name: Option<String>,
    #[arg(long)]
    pub bio: Option<String>,
    #[arg(long)]
    pub tagline: Option<String>,
    #[arg(long)]
    pub avatar_url: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ResourceCommand {
    /// List resources
    List,

    /// Show one resource
    Show { id: i64 },

    /// Create a resource
    Create(NewResourceArgs),

    /// Edit a resource; omitted fields keep their current value
    Update {
        id: i64,

        #[arg(long)]
        title: Option<String>,

        /// Resource name as shown in the cloud provider
        #[arg(long = "name")]
        resource_name: Option<String>,

        #[command(flatten)]
        fields: ResourceFields,
    },

    /// Delete a resource
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// List importable templates
    Templates,

    /// Import templates as resources
    Import {
        /// Template ids
        #[arg(required = true, num_args = 1..)]
        ids: Vec<i64>,
    },

    /// Ask the backend to create its default templates
    Seed,

    /// List known icon keys
    Icons,
}

#[derive(Args, Debug, Clone)]
pub struct NewResourceArgs {
    #[arg(long)]
    pub title: String,

    /// Resource name as shown in the cloud provider
    #[arg(long = "name")]
    pub resource_name: String,

    #[command(flatten)]
    pub fields: ResourceFields,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ResourceFields {
    #[arg(long)]
    pub description: Option<String>,

    /// Icon key, see `nimbus resources icons`
    #[arg(long)]
    pub icon: Option<String>,

    /// Status text such as Running, Stopped or Pending
    #[arg(long)]
    pub status: Option<String>,

    #[arg(long)]
    pub region: Option<String>,

    /// Creation time as YYYY-MM-DDTHH:MM
    #[arg(long)]
    pub created_at: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum UserCommand {
    /// List all users
    List,

    /// Change a user's role
    SetRole { user_id: String, role: Role },

    /// Delete a user
    Delete {
        user_id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Set a new password for a user
    ResetPassword { user_id: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ThemeCommand {
    /// Show the saved theme and derived colours
    Show,

    /// Switch to light or dark mode
    Mode { mode: ThemeMode },

    /// Flip between light and dark mode
    Toggle,

    /// Apply one of the predefined colour schemes
    Palette { id: String },

    /// List the predefined colour schemes
    Palettes,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Write a commented config.toml to the working directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
