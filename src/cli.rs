//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Nepstay - hostel listing marketplace API
#[derive(Parser, Debug)]
#[command(name = "nepstay")]
#[command(version)]
#[command(about = "Hostel listing marketplace API", long_about = None)]
pub struct Cli {
    /// Configuration file path (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Create the initial admin account if it does not exist
    SeedAdmin {
        /// Admin email (default: admin.email from config)
        #[arg(long)]
        email: Option<String>,

        /// Admin password (default: admin.password from config, else prompt)
        #[arg(long)]
        password: Option<String>,

        /// Read password from stdin (for scripting)
        #[arg(long, conflicts_with = "password")]
        stdin: bool,
    },

    /// Insert the bundled sample hostels
    SeedDemo {
        /// Insert even when hostels already exist
        #[arg(long)]
        force: bool,
    },

    /// Generate example configuration file
    GenerateConfig {
        /// Output path (default: stdout)
        output_path: Option<String>,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    pub fn command_or_default(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}
