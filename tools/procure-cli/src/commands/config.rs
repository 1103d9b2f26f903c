//! Configuration management commands.

use std::fs;

use anyhow::{bail, Context as _, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, StorageBackend, CONFIG_FILE_NAMES};
use crate::context::Context;

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let config = &ctx.config;

    ctx.output.info("[storage]");
    let backend = match config.storage.backend {
        StorageBackend::File => "file",
        StorageBackend::Memory => "memory",
    };
    ctx.output.kv("backend", backend);
    ctx.output
        .kv("path", &ctx.resolve_path(&config.storage.path).display().to_string());
    if let Some(quota) = config.storage.quota_bytes {
        ctx.output.kv("quota_bytes", &quota.to_string());
    }

    ctx.output.info("[catalog]");
    ctx.output
        .kv("path", &ctx.resolve_path(&config.catalog.path).display().to_string());

    ctx.output.info("[session]");
    ctx.output
        .kv("id", config.session.id.as_deref().unwrap_or("(remembered in store)"));

    ctx.output.info("[cart]");
    ctx.output.kv("key_prefix", &config.cart.key_prefix);
    ctx.output.kv("currency", config.cart.currency.code());

    ctx.output.info("[log]");
    ctx.output.kv("level", &config.log.level);

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let config_path = cwd.join(CONFIG_FILE_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    ctx.output.success(&format!("Created: {}", config_path.display()));
    Ok(())
}
