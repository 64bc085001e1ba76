//! End-to-end runs of the scapr command line against a mock screen

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use pretty_assertions::assert_eq;
use regex::Regex;

use scapr::error::CaptureResult;
use scapr::{CaptureBackend, Interrupt, InterruptHandle, MockScreen, Region, run_app};

/// Output of one `run_app` call
struct Run {
    code: u8,
    stdout: String,
    stderr: String,
}

fn run_with(args: &[&str], screen: &mut MockScreen, stdin: &str) -> Run {
    let interrupt = Interrupt::manual().expect("Failed to build interrupt");
    let mut out = Vec::new();
    let mut err = Vec::new();
    let argv = std::iter::once("scapr").chain(args.iter().copied());

    let code = run_app(argv, screen, &interrupt, &mut Cursor::new(stdin), &mut out, &mut err);
    Run {
        code,
        stdout: String::from_utf8(out).unwrap(),
        stderr: String::from_utf8(err).unwrap(),
    }
}

fn run(args: &[&str]) -> Run {
    run_with(args, &mut MockScreen::new(320, 200), "")
}

fn entries(dir: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    paths.sort();
    paths
}

fn jpegs(dir: &Path) -> Vec<PathBuf> {
    entries(dir)
        .into_iter()
        .filter(|p| p.extension().is_some_and(|ext| ext == "jpg"))
        .collect()
}

/// Screen that presses Ctrl+C right after its first capture
struct CtrlCAfterCapture {
    screen: MockScreen,
    handle: InterruptHandle,
}

impl CaptureBackend for CtrlCAfterCapture {
    fn capture(&mut self, region: Option<Region>) -> CaptureResult<DynamicImage> {
        let image = self.screen.capture(region)?;
        self.handle.raise();
        Ok(image)
    }

    fn source_type(&self) -> &str {
        "ctrl-c"
    }
}

#[test]
fn test_session_subfolder_run() {
    let tmp = tempfile::tempdir().unwrap();
    let folder = tmp.path().to_str().unwrap();

    let result = run(&["--auto", "--folder", folder, "--count", "2", "--seconds", "1"]);
    assert_eq!(result.code, 0, "stderr: {}", result.stderr);

    let created = entries(tmp.path());
    assert_eq!(created.len(), 1, "Should have one session folder");
    let session = &created[0];
    assert!(session.is_dir());

    let pattern = Regex::new(r"^scapr_\d{8}_\d{6}$").unwrap();
    let name = session.file_name().unwrap().to_str().unwrap();
    assert!(pattern.is_match(name), "unexpected session folder {:?}", name);

    let shots = jpegs(session);
    assert_eq!(shots.len(), 2, "Should have two .jpg files");
    let file_pattern = Regex::new(r"^screenshot-\d{6}_\d{6}\.jpg$").unwrap();
    for shot in &shots {
        let file_name = shot.file_name().unwrap().to_str().unwrap();
        assert!(file_pattern.is_match(file_name), "unexpected file {:?}", file_name);
        let decoded = image::open(shot).expect("capture should be a readable JPEG");
        assert!(!decoded.color().has_alpha());
    }
}

#[test]
fn test_flat_run() {
    let tmp = tempfile::tempdir().unwrap();
    let folder = tmp.path().to_str().unwrap();

    let result = run(&["--auto", "--folder", folder, "--count", "2", "--seconds", "1", "--flat"]);
    assert_eq!(result.code, 0, "stderr: {}", result.stderr);

    let created = entries(tmp.path());
    assert_eq!(created.len(), 2);
    assert!(created.iter().all(|p| p.is_file()), "No subfolder expected");
    assert_eq!(jpegs(tmp.path()).len(), 2);
}

#[test]
fn test_flat_runs_accumulate() {
    let tmp = tempfile::tempdir().unwrap();
    let folder = tmp.path().to_str().unwrap();
    let args = ["--auto", "--folder", folder, "--count", "2", "--seconds", "1", "--flat"];

    assert_eq!(run(&args).code, 0);
    assert_eq!(run(&args).code, 0);
    assert_eq!(jpegs(tmp.path()).len(), 4);
}

#[test]
fn test_inverted_region_is_rejected() {
    let mut screen = MockScreen::new(320, 200);
    let result = run_with(&["--region", "600,600,100,100"], &mut screen, "");

    assert_eq!(result.code, 1);
    assert!(result.stderr.contains("Invalid region"), "stderr: {}", result.stderr);
    assert_eq!(screen.captures(), 0);
}

#[test]
fn test_malformed_region_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let folder = tmp.path().to_str().unwrap();

    for region in ["1,2,3", "a,b,c,d"] {
        let result = run(&["--auto", "--folder", folder, "--region", region, "--count", "1"]);
        assert_eq!(result.code, 1);
        assert!(result.stderr.contains("four integers"), "stderr: {}", result.stderr);
    }
    assert!(entries(tmp.path()).is_empty());
}

#[test]
fn test_missing_folder_is_rejected() {
    let mut screen = MockScreen::new(320, 200);
    let result = run_with(&["--folder", "/does/not/exist"], &mut screen, "");

    assert_eq!(result.code, 1);
    assert!(result.stderr.contains("Folder not found"), "stderr: {}", result.stderr);
    assert_eq!(screen.captures(), 0);
}

#[test]
fn test_region_capture_size() {
    let tmp = tempfile::tempdir().unwrap();
    let folder = tmp.path().to_str().unwrap();

    let result = run(&[
        "--auto", "--flat", "--folder", folder, "--region", "10,20,110,70", "--count", "1",
        "--seconds", "1",
    ]);
    assert_eq!(result.code, 0, "stderr: {}", result.stderr);
    assert!(result.stdout.contains("Capture screen region (10, 20, 110, 70)."));

    let shots = jpegs(tmp.path());
    assert_eq!(shots.len(), 1);
    let decoded = image::open(&shots[0]).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (100, 50));
}

#[test]
fn test_declined_prompt_exits_cleanly() {
    let tmp = tempfile::tempdir().unwrap();
    let folder = tmp.path().to_str().unwrap();
    let mut screen = MockScreen::new(320, 200);

    let result = run_with(&["--folder", folder, "--count", "1"], &mut screen, "n\n");
    assert_eq!(result.code, 0);
    assert!(result.stdout.contains("Continue [Y,n]?"));
    assert_eq!(screen.captures(), 0);
    assert!(entries(tmp.path()).is_empty());
}

#[test]
fn test_confirmed_prompt_runs() {
    let tmp = tempfile::tempdir().unwrap();
    let folder = tmp.path().to_str().unwrap();
    let mut screen = MockScreen::new(320, 200);

    let result = run_with(
        &["--folder", folder, "--count", "1", "--seconds", "1", "--flat"],
        &mut screen,
        "\n",
    );
    assert_eq!(result.code, 0, "stderr: {}", result.stderr);
    assert_eq!(jpegs(tmp.path()).len(), 1);
}

#[test]
fn test_unavailable_backend_reports_helper() {
    let tmp = tempfile::tempdir().unwrap();
    let folder = tmp.path().to_str().unwrap();
    let mut screen = MockScreen::unavailable("no supported display server");

    let result = run_with(&["--auto", "--flat", "--folder", folder, "--count", "2"], &mut screen, "");
    assert_eq!(result.code, 1);
    assert!(result.stderr.contains("gnome-screenshot"), "stderr: {}", result.stderr);
    assert!(jpegs(tmp.path()).is_empty());
}

#[test]
fn test_help_exits_zero() {
    let result = run(&["--help"]);
    assert_eq!(result.code, 0);
    assert!(result.stdout.contains("--region"));
    assert!(result.stdout.contains("--flat"));
}

#[test]
fn test_bad_count_is_a_usage_error() {
    let result = run(&["--count", "many"]);
    assert_eq!(result.code, 2);
    assert!(!result.stderr.is_empty());
}

#[test]
fn test_interrupt_ends_unbounded_run_cleanly() {
    let tmp = tempfile::tempdir().unwrap();
    let folder = tmp.path().to_str().unwrap();
    let interrupt = Interrupt::manual().expect("Failed to build interrupt");
    let mut backend = CtrlCAfterCapture {
        screen: MockScreen::new(320, 200),
        handle: interrupt.handle(),
    };
    let mut out = Vec::new();
    let mut err = Vec::new();

    let argv = ["scapr", "--auto", "--flat", "--folder", folder, "--seconds", "3600"];
    let code = run_app(argv, &mut backend, &interrupt, &mut Cursor::new(""), &mut out, &mut err);

    let stdout = String::from_utf8(out).unwrap();
    assert_eq!(code, 0, "stderr: {}", String::from_utf8_lossy(&err));
    assert!(stdout.contains("Stopped."), "stdout: {}", stdout);
    assert!(!stdout.contains("Done."));
    assert_eq!(jpegs(tmp.path()).len(), 1);
}
