mod build;
mod cli;
mod constants;
mod decode;
mod flash;
mod rtt;

use anyhow::Result;
use critical_section as _;
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Build { features, release } => {
            println!("Building firmware...");
            build::build_firmware(features.as_deref(), *release)?;
            println!("Build complete!");
        }
        Commands::Flash { features, release, force } => {
            flash::flash_firmware(features.as_deref(), *release, *force)?;
        }
        Commands::Run { features, release } => {
            flash::flash_firmware(features.as_deref(), *release, false)?;

            println!("Attaching RTT...");
            rtt::run(&constants::app_elf(*release))?;
        }
        Commands::Attach { release } => {
            rtt::run(&constants::app_elf(*release))?;
        }
        Commands::Decode { capture, divisors } => {
            decode::decode_capture(capture, divisors)?;
        }
    }

    Ok(())
}
