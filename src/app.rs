//! End-to-end program flow: arguments in, exit status out.

use std::ffi::OsString;
use std::io::{self, BufRead, Write};

use clap::Parser;
use clap::error::ErrorKind;

use crate::capture::CaptureBackend;
use crate::cli::{APP_TITLE, Args};
use crate::interrupt::Interrupt;
use crate::runner::{self, RunOutcome, StopReason};

/// Run scapr with `argv` (program name first) and return the exit status.
///
/// Console text goes to `out`, diagnostics to `err`. Invalid `--folder` or
/// `--region`, an unavailable capture backend and a console that can no
/// longer be written return 1; argument syntax errors return clap's status;
/// everything else returns 0.
pub fn run_app<I, T, B, R, W, E>(
    argv: I,
    backend: &mut B,
    interrupt: &Interrupt,
    input: &mut R,
    out: &mut W,
    err: &mut E,
) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    B: CaptureBackend + ?Sized,
    R: BufRead,
    W: Write,
    E: Write,
{
    match drive(argv, backend, interrupt, input, out, err) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "console write failed");
            1
        }
    }
}

fn drive<I, T, B, R, W, E>(
    argv: I,
    backend: &mut B,
    interrupt: &Interrupt,
    input: &mut R,
    out: &mut W,
    err: &mut E,
) -> io::Result<u8>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    B: CaptureBackend + ?Sized,
    R: BufRead,
    W: Write,
    E: Write,
{
    writeln!(out, "\n{}", APP_TITLE)?;

    let args = match Args::try_parse_from(argv) {
        Ok(args) => args,
        Err(e) => {
            let rendered = e.render().to_string();
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => write!(out, "{}", rendered)?,
                _ => write!(err, "{}", rendered)?,
            }
            return Ok(e.exit_code().clamp(0, 255) as u8);
        }
    };

    let config = match args.resolve() {
        Ok(config) => config,
        Err(e) => {
            writeln!(err, "\nERROR: {}", e)?;
            return Ok(1);
        }
    };
    tracing::debug!(?config, "resolved configuration");

    writeln!(out, "  Run \"scapr -h\" (or --help) to see available options.\n")?;

    match runner::run(&config, backend, interrupt, input, out) {
        Ok(RunOutcome { captures, stop, .. }) => {
            tracing::info!(captures = captures.len(), ?stop, "run finished");
            if stop == StopReason::Completed {
                writeln!(out, "\nDone. {} screenshot(s) saved.", captures.len())?;
            }
            Ok(0)
        }
        Err(e) => {
            writeln!(err, "\nERROR: {}", e)?;
            Ok(e.exit_code())
        }
    }
}
