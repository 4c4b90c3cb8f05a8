//! CLI mode
//!
//! Operator commands that run without the HTTP server.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::cli::{ConfigCommands, TokenCommands};
use crate::config::StaticConfig;
use crate::runtime::lifetime;
use crate::services::ProfileService;

const DEFAULT_SAMPLE_PATH: &str = "config.example.toml";

pub async fn run_config_command(action: ConfigCommands) -> Result<()> {
    match action {
        ConfigCommands::Generate { output_path, force } => config_generate(output_path, force),
    }
}

fn config_generate(output_path: Option<String>, force: bool) -> Result<()> {
    let path = output_path.unwrap_or_else(|| DEFAULT_SAMPLE_PATH.to_string());

    if !force && Path::new(&path).exists() {
        anyhow::bail!("{} already exists, pass --force to overwrite", path);
    }

    println!(
        "{} {}",
        "Generating configuration file...".yellow(),
        path.blue()
    );

    StaticConfig::default()
        .save_to_file(&path)
        .map_err(|e| anyhow::anyhow!("{}", e))
        .with_context(|| format!("Failed to write {}", path))?;

    println!(
        "  {} {}",
        "Configuration file generated successfully".green(),
        path.blue()
    );
    Ok(())
}

pub async fn run_token_command(action: TokenCommands) -> Result<()> {
    match action {
        TokenCommands::Issue { email, name } => token_issue(&email, name).await,
    }
}

async fn token_issue(email: &str, name: Option<String>) -> Result<()> {
    let storage = lifetime::startup::prepare_storage().await?;
    let profiles = ProfileService::new(storage.clone());

    let user = profiles
        .sign_in(email, name, None)
        .await
        .map_err(|e| anyhow::anyhow!(e.format_simple()))
        .context("Failed to create user")?;

    let token = crate::api::jwt::get_jwt_service()
        .generate_access_token(&user.id, &user.email)
        .context("Failed to sign token")?;

    storage.close().await;

    println!("{} {} <{}>", "User:".green(), user.id, user.email);
    println!("{}", token);
    Ok(())
}
