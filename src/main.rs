use clap::Parser;
use context_bundle::app::{self, cli::Cli, error::ContextError};
use std::process;

fn main() {
    let args = Cli::parse();
    setup_logging(args.quiet, args.verbose);

    if let Err(e) = app::run(args) {
        eprintln!("Error: {:#}", e);
        let exit_code = match e.downcast_ref::<ContextError>() {
            Some(ContextError::FileWrite { .. }) | Some(ContextError::FileRead { .. }) => 2,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn setup_logging(quiet: bool, verbose: u8) {
    let level = if quiet {
        log::LevelFilter::Error
    } else {
        match verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}
