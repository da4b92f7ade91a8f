use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collect alignment statistics into a JSON report
    Stats {
        /// Path to the SAM/BAM/CRAM file, "-" for stdin
        bam_file: String,

        /// Output file for the JSON report, "-" for stdout
        #[arg(short = 'o', long = "output", default_value = "-")]
        output_file: String,

        /// Reference FASTA, required for CRAM input
        #[arg(short = 'r', long = "reference")]
        reference_file: Option<String>,

        /// Collector tree configuration (TOML)
        #[arg(short = 'c', long = "config")]
        config_file: Option<String>,

        /// Write a report snapshot to stderr every N records
        #[arg(short = 'u', long = "update-interval")]
        update_interval: Option<u64>,

        /// Stop after this many records
        #[arg(long)]
        max_records: Option<u64>,
    },

    /// Print the effective configuration as TOML
    PrintConfig {
        /// Collector tree configuration (TOML)
        #[arg(short = 'c', long = "config")]
        config_file: Option<String>,

        /// Also store it as the user configuration
        #[arg(long)]
        save: bool,
    },
}
