use std::path::Path;

use scanwatch_core::config::ClientConfig;

use crate::cli::ConfigCommands;
use crate::commands::common::load_config;
use crate::error::CliError;

/// Values passed to `scanwatch config set`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigUpdate {
    pub server_url: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub confirm_cooldown_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

impl ConfigUpdate {
    pub const fn is_empty(&self) -> bool {
        self.server_url.is_none()
            && self.poll_interval_ms.is_none()
            && self.confirm_cooldown_ms.is_none()
            && self.request_timeout_secs.is_none()
    }
}

pub fn run_config(
    command: ConfigCommands,
    config_path: &Path,
    server: Option<&str>,
) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show { json } => run_config_show(config_path, server, json),
        ConfigCommands::Set {
            server_url,
            poll_interval_ms,
            confirm_cooldown_ms,
            request_timeout_secs,
        } => {
            let update = ConfigUpdate {
                server_url,
                poll_interval_ms,
                confirm_cooldown_ms,
                request_timeout_secs,
            };
            run_config_set(config_path, update)?;
            println!("{}", config_path.display());
            Ok(())
        }
    }
}

fn run_config_show(
    config_path: &Path,
    server: Option<&str>,
    as_json: bool,
) -> Result<(), CliError> {
    let config = load_config(config_path, server)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let source = if config_path.exists() {
        config_path.display().to_string()
    } else {
        format!("{} (not created yet)", config_path.display())
    };
    println!("config file:          {source}");
    println!("server_url:           {}", config.server_url);
    println!("poll_interval_ms:     {}", config.poll_interval_ms);
    println!("confirm_cooldown_ms:  {}", config.confirm_cooldown_ms);
    println!("request_timeout_secs: {}", config.request_timeout_secs);
    Ok(())
}

/// Merge `update` into the saved config file and write it back.
pub fn run_config_set(
    config_path: &Path,
    update: ConfigUpdate,
) -> Result<ClientConfig, CliError> {
    if update.is_empty() {
        return Err(CliError::NothingToUpdate);
    }

    let config = apply_config_update(ClientConfig::load_from_path(config_path)?, update)?;
    config.save_to_path(config_path)?;
    Ok(config)
}

pub fn apply_config_update(
    mut config: ClientConfig,
    update: ConfigUpdate,
) -> Result<ClientConfig, CliError> {
    if let Some(url) = update.server_url.filter(|url| !url.trim().is_empty()) {
        config.server_url = url;
    }
    if let Some(value) = update.poll_interval_ms {
        config.poll_interval_ms = value;
    }
    if let Some(value) = update.confirm_cooldown_ms {
        config.confirm_cooldown_ms = value;
    }
    if let Some(value) = update.request_timeout_secs {
        config.request_timeout_secs = value;
    }

    Ok(config.validated()?)
}
