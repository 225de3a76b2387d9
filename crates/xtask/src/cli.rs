use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the firmware
    Build {
        /// Replaces the default features (`adc`) when given
        #[arg(long)]
        features: Option<String>,

        #[arg(long)]
        release: bool,
    },
    /// Build and flash the firmware
    Flash {
        #[arg(long)]
        features: Option<String>,

        #[arg(long)]
        release: bool,

        #[arg(long)]
        force: bool,
    },
    /// Build, flash, and run with RTT logging
    Run {
        #[arg(long)]
        features: Option<String>,

        #[arg(long)]
        release: bool,
    },
    /// Attach to target and show RTT logs
    Attach {
        #[arg(long)]
        release: bool,
    },
    /// Decode a raw capture of the serial stream
    Decode {
        /// File holding the bytes received from the device
        capture: PathBuf,

        /// Decimation divisor per bioamp channel, comma separated
        #[arg(long, value_delimiter = ',', default_value = "2,5")]
        divisors: Vec<u8>,
    },
}
