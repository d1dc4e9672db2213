//! Main application entry point (native).

use clap::Parser;
use sketchboard_app::Cli;

fn main() {
    env_logger::init();
    log::info!("Starting Sketchboard");

    if let Err(e) = sketchboard_app::run(Cli::parse()) {
        log::error!("{e}");
        eprintln!("sketchboard: {e}");
        std::process::exit(1);
    }
}
