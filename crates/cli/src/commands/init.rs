//! Initialize .protograph.toml configuration

use anyhow::Result;
use protograph_core::config::CONFIG_FILE_NAME;
use protograph_core::ProtographConfig;
use std::path::Path;

pub fn run(path: Option<&Path>) -> Result<()> {
    let target_path = path.unwrap_or_else(|| Path::new("."));
    let config_path = target_path.join(CONFIG_FILE_NAME);

    if config_path.exists() {
        println!("{} already exists at {:?}", CONFIG_FILE_NAME, config_path);
        return Ok(());
    }

    let config = ProtographConfig::default();
    config.save(&config_path)?;

    println!("Created {} at {:?}", CONFIG_FILE_NAME, config_path);
    println!("\nSet [graph] root_message to pin the root, then run:");
    println!("  protograph inspect <descriptor-set>");

    Ok(())
}
