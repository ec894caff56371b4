mod app;
mod calendar;
mod cli;
mod color;
mod constants;
mod domain;
mod error;
mod logging;
mod resolver;
mod storage;
mod store;
mod styling;

use std::io;

use logging::LogTarget;

fn main() -> Result<(), io::Error> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        logging::init(LogTarget::Stderr);
        cli::run_cli();
        return Ok(());
    }

    logging::init(LogTarget::File);
    app::run_ui()
}
