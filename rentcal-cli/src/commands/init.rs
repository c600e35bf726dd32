use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use rentcal_core::Settings;

pub fn run(explicit: Option<&Path>) -> Result<()> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => Settings::config_path()?,
    };

    if path.exists() {
        let message = format!("Config already exists at {}", path.display());
        println!("{}", message.dimmed());
        return Ok(());
    }

    Settings::create_default_config(&path)?;
    println!("{} {}", "Created".green(), path.display());
    Ok(())
}
