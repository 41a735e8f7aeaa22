//! System clipboard through the platform's copy command.
//!
//! The text is piped into the first command that exists and exits cleanly.

use std::io::Write;
use std::process::{Command, Stdio};

use log::{debug, info};

/// A copy command and its arguments.
type Candidate = (&'static str, &'static [&'static str]);

#[cfg(target_os = "macos")]
const CANDIDATES: &[Candidate] = &[("pbcopy", &[])];

#[cfg(target_os = "windows")]
const CANDIDATES: &[Candidate] = &[("cmd", &["/C", "clip"])];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const CANDIDATES: &[Candidate] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

pub fn copy_to_clipboard(text: &str) -> Result<(), String> {
    copy_with(CANDIDATES, text)
}

fn copy_with(candidates: &[Candidate], text: &str) -> Result<(), String> {
    let mut last_error = None;
    for (cmd, args) in candidates {
        match pipe_into(cmd, args, text) {
            Ok(()) => {
                info!("Copied {} chars via {}", text.chars().count(), cmd);
                return Ok(());
            }
            Err(e) => {
                debug!("{}", e);
                last_error = Some(e);
            }
        }
    }

    let tried = candidates
        .iter()
        .map(|(cmd, _)| *cmd)
        .collect::<Vec<_>>()
        .join(", ");
    Err(last_error
        .map(|e| format!("{e} (tried: {tried})"))
        .unwrap_or_else(|| "No clipboard command configured".to_string()))
}

fn pipe_into(cmd: &str, args: &[&str], input: &str) -> Result<(), String> {
    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|_| format!("Clipboard command `{cmd}` not available"))?;

    if let Some(mut stdin) = child.stdin.take() {
        if let Err(e) = stdin.write_all(input.as_bytes()) {
            drop(stdin);
            // Reap the child even though its exit status no longer matters.
            let _ = child.wait();
            return Err(format!("Writing to `{cmd}` failed: {e}"));
        }
        // stdin drops here so the command sees EOF
    }

    match child.wait() {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(format!("Clipboard command `{cmd}` exited with {status}")),
        Err(e) => Err(format!("Clipboard command `{cmd}` failed: {e}")),
    }
}
