//! CLI mode
//!
//! 一次性管理命令：初始化管理员、导入示例数据、生成配置文件。

use colored::Colorize;
use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::cli::Commands;
use crate::config::{StaticConfig, get_config};
use crate::services::{AuthService, HostelPayload, HostelService};
use crate::storage::{SeaOrmStorage, StorageFactory};

const DEMO_HOSTELS: &str = include_str!("../../../data/demo_hostels.json");

/// Run a non-server command
pub async fn run_cli(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Serve => bail!("serve is not a one-shot command"),
        Commands::GenerateConfig { output_path, force } => generate_config(output_path, force),
        Commands::SeedAdmin {
            email,
            password,
            stdin,
        } => {
            let storage = connect().await?;
            seed_admin(storage, email, password, stdin).await
        }
        Commands::SeedDemo { force } => {
            let storage = connect().await?;
            seed_demo(storage, force).await
        }
    }
}

async fn connect() -> Result<Arc<SeaOrmStorage>> {
    StorageFactory::create()
        .await
        .context("Failed to connect to database")
}

fn generate_config(output_path: Option<String>, force: bool) -> Result<()> {
    let Some(path) = output_path else {
        println!("{}", StaticConfig::generate_sample_config());
        return Ok(());
    };

    if std::path::Path::new(&path).exists() && !force {
        bail!("{} already exists, use --force to overwrite", path);
    }

    StaticConfig::default()
        .save_to_file(&path)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path, e))?;
    println!("{} {}", "Configuration written to".green(), path.white().bold());
    Ok(())
}

/// 密码来源：--stdin > --password > 配置 > 交互输入
fn resolve_password(password: Option<String>, stdin: bool) -> Result<String> {
    if stdin {
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        return Ok(line.trim().to_string());
    }

    if let Some(password) = password.or_else(|| get_config().admin.password.clone()) {
        return Ok(password);
    }

    prompt_password_with_confirm()
}

fn prompt_password_with_confirm() -> Result<String> {
    if !io::stdin().is_terminal() {
        bail!("No password provided. Use --password, --stdin or admin.password in config.");
    }

    print!("Enter admin password: ");
    io::stdout().flush()?;
    let password = rpassword::read_password().context("Failed to read password")?;

    print!("Confirm password: ");
    io::stdout().flush()?;
    let confirm = rpassword::read_password().context("Failed to read password")?;

    if password != confirm {
        bail!("Passwords do not match");
    }
    Ok(password)
}

async fn seed_admin(
    storage: Arc<SeaOrmStorage>,
    email: Option<String>,
    password: Option<String>,
    stdin: bool,
) -> Result<()> {
    let email = email.unwrap_or_else(|| get_config().admin.email.clone());
    let password = resolve_password(password, stdin)?;

    let service = AuthService::new(storage);
    let (admin, created) = service
        .seed_admin(&email, &password)
        .await
        .context("Failed to seed admin")?;

    if created {
        info!("Initial admin created: {}", admin.email);
        println!("{} {}", "Initial admin created:".green().bold(), admin.email);
    } else {
        println!("{} {}", "Admin user already exists:".yellow(), admin.email);
    }
    Ok(())
}

/// 示例数据
pub fn demo_payloads() -> Result<Vec<HostelPayload>> {
    serde_json::from_str(DEMO_HOSTELS).context("Bundled demo data is not valid JSON")
}

async fn seed_demo(storage: Arc<SeaOrmStorage>, force: bool) -> Result<()> {
    let existing = storage
        .load_hostels_for_analytics(false, None)
        .await?
        .len();
    if existing > 0 && !force {
        println!(
            "{} ({} hostels present, use --force to insert anyway)",
            "Skipping demo data".yellow(),
            existing
        );
        return Ok(());
    }

    let service = HostelService::new(storage);
    let payloads = demo_payloads()?;
    let total = payloads.len();
    for payload in payloads {
        let hostel = service
            .create(payload)
            .await
            .context("Failed to insert demo hostel")?;
        println!("  {} {}", "+".green(), hostel.slug);
    }

    println!("{} {} hostels", "Inserted".green().bold(), total);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_payloads_validate() {
        let payloads = demo_payloads().unwrap();
        assert!(!payloads.is_empty());
        for payload in payloads {
            let name = payload.name.clone();
            assert!(payload.into_new_hostel().is_ok(), "{:?}", name);
        }
    }

    #[test]
    fn test_resolve_password_prefers_argument() {
        assert_eq!(
            resolve_password(Some("secret123".into()), false).unwrap(),
            "secret123"
        );
    }
}
