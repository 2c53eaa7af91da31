// emu-gfx - Main Entry Point
//
// Runs the presenter demo: a test-pattern machine drawn through the
// two-pass pipeline with flash feedback, mute icon and debug overlay.

use emu_gfx::frontend::{run_frontend, FrontendConfig, CONFIG_FILE};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("emu-gfx v{}", env!("CARGO_PKG_VERSION"));
    println!("==============================");
    println!();

    // Load or create configuration
    let config = FrontendConfig::load_or_default(CONFIG_FILE);
    println!("Configuration loaded from '{}'", CONFIG_FILE);
    println!();

    run_frontend(config)?;

    println!("Window closed.");
    Ok(())
}
