//! The capture loop and the confirmation gate in front of it.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Local;

use crate::capture::{CaptureBackend, save_jpeg};
use crate::config::Configuration;
use crate::error::ScaprResult;
use crate::interrupt::{Interrupt, Pause};
use crate::session::Session;

/// Why a run ended without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The requested number of captures was taken
    Completed,
    /// The user interrupted the loop
    Interrupted,
    /// The user answered no at the confirmation prompt
    Declined,
}

/// Result of a run that ended without error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Directory the captures went to
    pub session_dir: PathBuf,
    /// Files written, in capture order
    pub captures: Vec<PathBuf>,
    /// How the run ended
    pub stop: StopReason,
}

/// Captures left before the loop stops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Remaining {
    Unbounded,
    Bounded(u64),
}

impl Remaining {
    fn new(stop_count: Option<u64>) -> Self {
        stop_count.map_or(Remaining::Unbounded, Remaining::Bounded)
    }

    fn is_exhausted(&self) -> bool {
        *self == Remaining::Bounded(0)
    }

    fn decrement(&mut self) {
        if let Remaining::Bounded(n) = self {
            *n = n.saturating_sub(1);
        }
    }

    fn label(&self) -> String {
        match self {
            Remaining::Unbounded => String::new(),
            Remaining::Bounded(n) => format!(" ({} remaining)", n),
        }
    }
}

/// Print what the run is about to do
pub fn describe<W: Write>(config: &Configuration, out: &mut W) -> std::io::Result<()> {
    match &config.region {
        None => writeln!(out, "Capture full screen.")?,
        Some(region) => writeln!(out, "Capture screen region {}.", region)?,
    }
    if let Some(count) = config.stop_count {
        writeln!(out, "Number of screenshots to take is {}.", count)?;
    }
    writeln!(
        out,
        "Number of seconds between screenshots is {}.",
        config.interval_seconds
    )?;
    if config.flat_output {
        writeln!(out, "Screenshots will be saved to '{}'.", config.output_root.display())?;
    } else {
        writeln!(
            out,
            "Screenshots will be saved to a new session folder in '{}'.",
            config.output_root.display()
        )?;
    }
    Ok(())
}

/// Ask whether to start. Empty input, `y` and `yes` accept; end of input declines.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> std::io::Result<bool> {
    write!(out, "\nContinue [Y,n]? ")?;
    out.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        writeln!(out)?;
        return Ok(false);
    }
    let answer = answer.trim().to_lowercase();
    Ok(matches!(answer.as_str(), "" | "y" | "yes"))
}

/// Take captures into `session` until the count runs out or `interrupt` is raised.
///
/// Each iteration names the file, captures, writes the JPEG, then pauses for
/// the configured interval. The first capture failure ends the run.
pub fn capture_loop<B, W>(
    config: &Configuration,
    session: &Session,
    backend: &mut B,
    interrupt: &Interrupt,
    out: &mut W,
) -> ScaprResult<RunOutcome>
where
    B: CaptureBackend + ?Sized,
    W: Write,
{
    let interval = Duration::from_secs(config.interval_seconds);
    let mut remaining = Remaining::new(config.stop_count);
    let mut captures = Vec::new();

    let outcome = |captures: Vec<PathBuf>, stop: StopReason| RunOutcome {
        session_dir: session.dir.clone(),
        captures,
        stop,
    };

    while !remaining.is_exhausted() {
        if interrupt.is_raised() {
            writeln!(out, "\n\nStopped.\n")?;
            return Ok(outcome(captures, StopReason::Interrupted));
        }

        writeln!(
            out,
            "\nCapturing screen{}. Press [Ctrl]+[C] to stop.\n",
            remaining.label()
        )?;
        remaining.decrement();

        let path = session.capture_path(Local::now());
        let start = Instant::now();
        let image = backend.capture(config.region)?;
        let (width, height) = (image.width(), image.height());
        save_jpeg(image, &path, config.jpeg_quality)?;
        tracing::debug!(
            path = %path.display(),
            width,
            height,
            source = backend.source_type(),
            elapsed = ?start.elapsed(),
            "saved capture"
        );
        captures.push(path);

        if interrupt.pause(interval) == Pause::Interrupted {
            writeln!(out, "\n\nStopped.\n")?;
            return Ok(outcome(captures, StopReason::Interrupted));
        }
    }

    Ok(outcome(captures, StopReason::Completed))
}

/// Run the gate and the loop for an already resolved configuration
pub fn run<B, R, W>(
    config: &Configuration,
    backend: &mut B,
    interrupt: &Interrupt,
    input: &mut R,
    out: &mut W,
) -> ScaprResult<RunOutcome>
where
    B: CaptureBackend + ?Sized,
    R: BufRead,
    W: Write,
{
    describe(config, out)?;

    if !config.auto_start && !confirm(input, out)? {
        return Ok(RunOutcome {
            session_dir: config.output_root.clone(),
            captures: Vec::new(),
            stop: StopReason::Declined,
        });
    }

    // Named after the moment the run actually starts, not the prompt.
    let session = Session::plan(config);
    session.create()?;
    if !session.flat {
        writeln!(out, "Session folder is '{}'.", session.dir.display())?;
    }
    interrupt.arm();
    capture_loop(config, &session, backend, interrupt, out)
}
