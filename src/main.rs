use bamstats_tree::{cli, commands, config::Config};
use clap::Parser;

fn main() {
    let args = cli::Args::parse();
    setup_logging(args.verbose);

    let result = match args.command {
        cli::Commands::Stats {
            bam_file,
            output_file,
            reference_file,
            config_file,
            update_interval,
            max_records,
        } => Config::resolve(config_file.as_deref())
            .map_err(anyhow::Error::from)
            .and_then(|mut config| {
                if let Some(interval) = update_interval {
                    config.update_interval = interval;
                }
                if max_records.is_some() {
                    config.max_records = max_records;
                }
                commands::stats::run(bam_file, output_file, reference_file, config)
            }),
        cli::Commands::PrintConfig { config_file, save } => {
            Config::resolve(config_file.as_deref())
                .map_err(anyhow::Error::from)
                .and_then(|config| commands::print_config::run(config, save))
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}
