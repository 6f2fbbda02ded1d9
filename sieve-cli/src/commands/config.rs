use anyhow::{Result, bail};
use clap::{Args, Subcommand};

use super::OutputContext;
use crate::config::Config;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write a configuration file holding the reference query literals
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
    /// Show configuration file path
    Path,
}

pub fn execute(args: ConfigArgs, path: Option<&str>, output: &OutputContext) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(&Config::load(path)?, output),
        ConfigCommands::Init { force } => init_config(path, force, output),
        ConfigCommands::Path => show_path(path, output),
    }
}

fn show_config(cfg: &Config, output: &OutputContext) -> Result<()> {
    if output.json {
        return output.print_json(cfg);
    }
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}

fn init_config(path: Option<&str>, force: bool, output: &OutputContext) -> Result<()> {
    let config_path = Config::resolve_path(path);
    if config_path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    Config::default().save_to_path(&config_path)?;
    output.print_success(&format!("Wrote {}", config_path.display()));
    Ok(())
}

fn show_path(path: Option<&str>, output: &OutputContext) -> Result<()> {
    let config_path = Config::resolve_path(path);
    if output.json {
        return output.print_json(&serde_json::json!({ "path": config_path }));
    }
    println!("{}", config_path.display());
    Ok(())
}
