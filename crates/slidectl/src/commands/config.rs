use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> Result<()> {
    let path = Config::path()?;
    match command {
        ConfigCommands::Show => show(&path),
        ConfigCommands::Set { key, value } => {
            set_at(&path, &key, &value)?;
            println!("{} {key} = {value}", "Saved".green().bold());
            Ok(())
        }
    }
}

fn show(path: &Path) -> Result<()> {
    let exists = path.exists();
    let config = Config::load_or_default_from(path)?;

    println!("{} {}", "Config file:".bold(), path.display());
    if !exists {
        println!("{}", "(not created yet, showing defaults)".dimmed());
    }
    println!();
    print_value("defaults.theme", config.theme());
    print_value(
        "defaults.transition",
        config.transition().map(|k| k.name()).unwrap_or("slide"),
    );
    print_value("defaults.animated", &config.animated().to_string());
    print_value(
        "defaults.settle_ms",
        &config.settle().as_millis().to_string(),
    );
    print_value("defaults.start_slide", &config.start_slide().to_string());
    Ok(())
}

fn print_value(key: &str, value: &str) {
    println!("  {:<22} {}", key.cyan(), value);
}

/// Update one key in the config file at `path`. An existing file that does not
/// load is left untouched.
fn set_at(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut config = Config::load_or_default_from(path)?;
    config.set(key, value)?;
    config.save_to(path)?;
    tracing::info!(key, value, path = %path.display(), "config updated");
    Ok(())
}
