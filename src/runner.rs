use anyhow::{Context, Result, bail};
use std::process::{Command, Stdio};

/// Run a command and capture stdout, failing on a non-zero exit
pub fn run_capture(cmd: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(cmd)
        .args(args)
        .output()
        .with_context(|| format!("Failed to execute: {} {}", cmd, args.join(" ")))?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("{} {} failed: {}", cmd, args.join(" "), stderr.trim())
    }
}

/// Run a query command, returning (exited zero, trimmed stdout)
pub fn run_output(cmd: &str, args: &[&str]) -> Result<(bool, String)> {
    let output = Command::new(cmd)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("Failed to execute: {} {}", cmd, args.join(" ")))?;

    Ok((
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).trim().to_string(),
    ))
}

/// Run a command for its side effect, failing on a non-zero exit
pub fn run_checked(cmd: &str, args: &[&str]) -> Result<()> {
    log::debug!("Running: {} {}", cmd, args.join(" "));
    run_capture(cmd, args).map(|_| ())
}

/// Run a query command silently, returning whether it exited zero
///
/// A command that cannot be spawned at all is an error, not a "no".
pub fn run_status(cmd: &str, args: &[&str]) -> Result<bool> {
    let status = Command::new(cmd)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .with_context(|| format!("Failed to execute: {} {}", cmd, args.join(" ")))?;
    Ok(status.success())
}

/// Check if a command exists
pub fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_run_status_reports_exit_code() {
        assert!(run_status("true", &[]).unwrap());
        assert!(!run_status("false", &[]).unwrap());
    }

    #[test]
    fn test_run_status_missing_binary_is_error() {
        assert!(run_status("definitely-not-a-real-command-xyz", &[]).is_err());
    }

    #[test]
    fn test_run_checked_surfaces_failure() {
        let err = run_checked("sh", &["-c", "echo boom >&2; exit 3"]).unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_run_output_keeps_stdout_on_failure() {
        let (ok, out) = run_output("sh", &["-c", "echo partial; exit 1"]).unwrap();
        assert!(!ok);
        assert_eq!(out, "partial");
    }

    #[test]
    fn test_run_capture_trims_stdout() {
        assert_eq!(run_capture("echo", &["hello"]).unwrap(), "hello");
    }
}
