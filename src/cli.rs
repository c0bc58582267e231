use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "moneybotsapi", version, about = "Moneybots API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the API server (default)
    Start,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Manage API users
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display current configuration (with secrets masked)
    Show,

    /// Validate the environment
    Validate,
}

#[derive(Subcommand, Debug, Clone)]
pub enum UserCommands {
    /// Create a user, or reset the password of an existing one
    Add {
        #[arg(long)]
        user_id: String,

        /// Can also be given through MB_API_USER_PASSWORD
        #[arg(long, env = "MB_API_USER_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

impl Cli {
    /// Get the command to execute, defaulting to Start if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Start)
    }
}
