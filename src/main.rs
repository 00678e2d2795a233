mod cli;

use crate::cli::ParseOutcome;
use anyhow::Result as Fallible;
use log::info;
use ramhog::config::Config;
use ramhog::hog::Hog;
use ramhog::shutdown::{self, RunState};
use ramhog::utils;
use std::panic;
use std::process;
use std::sync::Arc;

fn main() {
    init_logging();

    let config = match cli::parse_args(std::env::args_os()) {
        ParseOutcome::Help(output) => {
            let _ = output.print();
            process::exit(0);
        }
        ParseOutcome::Invalid(err) => {
            let _ = err.print();
            process::exit(1);
        }
        ParseOutcome::Run(config) => config,
    };

    let success = match panic::catch_unwind(move || main_(config)) {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            utils::report_failure(&e);
            false
        }
        Err(e) => {
            utils::report_panic(&*e);
            false
        }
    };
    process::exit(if success { 0 } else { 1 });
}

fn main_(config: Config) -> Fallible<()> {
    info!("configuration: {}", config);

    let state = Arc::new(RunState::new());
    shutdown::install_handlers(state.clone())?;

    info!("starting memory allocation, press Ctrl+C to stop and exit gracefully");
    Hog::new(&config, &state).run();
    info!("cleanup complete, goodbye!");

    Ok(())
}

fn init_logging() {
    // This doesn't use from_default_env() because it doesn't allow to override filter_module()
    // with the RUST_LOG environment variable
    let mut env = env_logger::Builder::new();
    env.filter_module("ramhog", log::LevelFilter::Info);
    if let Ok(content) = std::env::var("RUST_LOG") {
        env.parse_filters(&content);
    }
    env.init();
}
