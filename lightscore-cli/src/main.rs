//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use env_logger::Env;
use lightscore_cli::CliError;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    match lightscore_cli::run() {
        Ok(()) => {}
        // Clap renders help, version and usage errors itself.
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("lightscore: {err}");
            std::process::exit(1);
        }
    }
}
