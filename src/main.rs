use std::io;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use scapr::app::run_app;
use scapr::capture::SystemBackend;
use scapr::config::{DEFAULT_LOG_FILTER, ENV_LOG};
use scapr::interrupt::Interrupt;

fn main() -> ExitCode {
    // Diagnostics go to stderr; stdout is the interactive console.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(ENV_LOG)
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(io::stderr)
        .init();

    let interrupt = match Interrupt::ctrl_c() {
        Ok(interrupt) => interrupt,
        Err(e) => {
            eprintln!("ERROR: failed to start signal handling: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut backend = SystemBackend::detect();

    let stdin = io::stdin();
    let code = run_app(
        std::env::args_os(),
        &mut backend,
        &interrupt,
        &mut stdin.lock(),
        &mut io::stdout(),
        &mut io::stderr(),
    );
    ExitCode::from(code)
}
