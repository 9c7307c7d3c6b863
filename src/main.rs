use clap::Parser;
use colored::Colorize;

use nepstay::cli::{Cli, Commands};
use nepstay::config::{get_config, init_config_from};
use nepstay::runtime::modes::{run_cli, run_server};
use nepstay::system::init_logging;

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config_from(cli.config.as_deref());

    let command = cli.command_or_default();

    // generate-config 输出到 stdout，不初始化日志
    let _guard = if matches!(command, Commands::GenerateConfig { .. }) {
        None
    } else {
        match init_logging(&get_config()) {
            Ok(guard) => Some(guard),
            Err(e) => {
                eprintln!("{} {:#}", "Failed to initialize logging:".red().bold(), e);
                std::process::exit(1);
            }
        }
    };

    let result = match command {
        Commands::Serve => run_server().await,
        other => run_cli(other).await,
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
