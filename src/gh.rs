//! Thin wrapper over the `gh` CLI.
//!
//! Every GitHub call in Lookout goes through [`run`]. Authentication is
//! whatever `gh` is logged in as, or a per-identity `GH_CONFIG_DIR` when
//! one is given.

use std::{path::Path, process::Command};

/// Run `gh` with the given args and return stdout on success.
pub fn run(args: &[&str], gh_config: Option<&Path>) -> Result<String, String> {
    let mut command = Command::new("gh");
    command.args(args);
    if let Some(dir) = gh_config {
        command.env("GH_CONFIG_DIR", dir);
    }

    let output = command
        .output()
        .map_err(|e| format!("failed to run gh: {e}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("gh {} failed: {}", args.join(" "), stderr.trim()));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Extract an issue number from a GitHub issue URL.
///
/// Example: `https://github.com/owner/repo/issues/42` → `42`.
pub fn parse_issue_number(url: &str) -> Result<u64, String> {
    url.trim()
        .rsplit('/')
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| format!("could not parse issue number from: {url}"))
}
