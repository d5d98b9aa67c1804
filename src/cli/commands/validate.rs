//! Validate configuration command.

use anyhow::Result;
use std::path::Path;
use tactic_config::load_config;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    if let Err(e) = config.validate() {
        println!("Policy configuration error: {}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Execution mode: {:?}", config.execution.mode);
    println!("Order quantity: {}", config.execution.order_quantity);
    println!("Series capacity: {}", config.replay.series_capacity);

    Ok(())
}
