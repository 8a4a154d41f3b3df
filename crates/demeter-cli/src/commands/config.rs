//! Config command implementation.

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use crate::cli::ConfigAction;
use crate::config::Config;

pub fn cmd_config(action: ConfigAction, quiet: bool, no_color: bool) -> Result<()> {
    let path = Config::path();

    match action {
        ConfigAction::Show => {
            let config = Config::load();
            let content = toml::to_string_pretty(&config).context("Failed to serialize config")?;
            if !quiet {
                let header = format!("# {}", path.display());
                if no_color {
                    println!("{}", header);
                } else {
                    println!("{}", header.dimmed());
                }
            }
            print!("{}", content);
        }
        ConfigAction::Get { key } => {
            println!("{}", Config::load().get(key));
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load();
            config.set(key, &value)?;
            config.save()?;
            if !quiet {
                eprintln!("Set {:?} = {}", key, config.get(key));
            }
        }
        ConfigAction::Unset { key } => {
            let mut config = Config::load();
            config.unset(key);
            config.save()?;
            if !quiet {
                eprintln!("Reset {:?} to {}", key, config.get(key));
            }
        }
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            if path.exists() {
                eprintln!("Config already exists at {}", path.display());
            } else {
                Config::default().save()?;
                if !quiet {
                    eprintln!("Created {}", path.display());
                }
            }
        }
    }

    Ok(())
}
