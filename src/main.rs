use std::env;
use std::path::Path;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use mysh::config::{Config, DEFAULT_LOG_FILTER};
use mysh::session;

const USAGE: &str = "usage: mysh [batch-file]";

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let config = Config::from_env();
    init_tracing(&config);

    let args: Vec<_> = env::args_os().skip(1).collect();
    let result = match args.as_slice() {
        [] => session::run_interactive(&config),
        [script] => session::run_batch(Path::new(script)),
        _ => {
            eprintln!("{}", USAGE);
            return ExitCode::from(2);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("mysh: {}", e);
            ExitCode::FAILURE
        }
    }
}
