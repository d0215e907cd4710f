use clap::Parser;
use eyre::Result;
use hand_control_lib::{init_tracing, SessionConfig};
use tracing::info;

#[derive(Parser)]
#[command(name = "config_test")]
#[command(about = "Test gesture car session configuration files")]
struct Cli {
    #[arg(short, long, default_value = "config/session.toml")]
    config: String,

    /// Write a default configuration to the given path and exit
    #[arg(long)]
    write_default: bool,
}

fn main() -> Result<()> {
    let _guard = init_tracing("config_test");
    let cli = Cli::parse();

    if cli.write_default {
        SessionConfig::default().save_to_file(&cli.config)?;
        info!("Wrote default configuration to {}", cli.config);
        return Ok(());
    }

    info!("Testing configuration file: {}", cli.config);
    test_config(&cli.config)?;

    Ok(())
}

fn test_config(config_path: &str) -> Result<()> {
    println!("Testing configuration file: {}", config_path);

    let config = match SessionConfig::load_from_file(config_path) {
        Ok(config) => {
            println!("✓ Session configuration loaded successfully");
            config
        }
        Err(e) => {
            println!("✗ Failed to load session configuration: {}", e);
            return Err(e);
        }
    };

    match config.validate() {
        Ok(_) => println!("✓ Configuration validation passed"),
        Err(e) => {
            println!("✗ Configuration validation failed: {}", e);
            return Err(e);
        }
    }

    println!("  Controller: {}", config.controller.endpoint());
    println!("  Connect timeout: {:?}", config.controller.connect_timeout());
    println!("  Action cooldown: {:?}", config.controller.action_cooldown());
    println!("  Smoothing window: {} frames", config.handler.buffer_size);
    println!("  Open ratio: {}", config.thresholds.open_ratio);
    println!("  Visibility margin: {}", config.thresholds.visibility_margin);
    println!("  Orientation threshold: {}", config.thresholds.orientation_threshold);
    println!(
        "  Handedness confidence floor: {}",
        config.thresholds.handedness_confidence_floor
    );

    Ok(())
}
