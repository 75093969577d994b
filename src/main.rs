// src/main.rs

mod app_logic;
mod cli;
mod core;
mod logging;

use crate::core::CoreScriptRunner;

use clap::Parser;
use std::sync::Arc;

fn main() {
    let args = cli::CliArgs::parse();
    let log_sink = logging::init();
    let script_runner = Arc::new(CoreScriptRunner::new());

    if let Err(err) = app_logic::execute(&args, &log_sink, script_runner) {
        log::error!("Main: {err} Exiting.");
        std::process::exit(err.exit_code());
    }
}
