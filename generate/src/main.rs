use clap::Parser;
use fakegen_generate::cli::{Args, initialize};
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    let args: Arc<Args> = Args::parse().into();

    // Logs go to stderr so the generated C can be piped from stdout.
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_writer(std::io::stderr)
        .init();

    let config = match initialize(args) {
        Ok(Some(config)) => config,
        Ok(None) => return,
        Err(e) => {
            error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = fakegen_generate::run(&config) {
        error!("Error: {e}");
        std::process::exit(1);
    }
}
