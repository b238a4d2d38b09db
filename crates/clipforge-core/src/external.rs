//! Subprocess invocation for the two side-effecting session actions: piping
//! the running value through `jq`, and opening it in the user's editor.

use crate::error::{ClipforgeError, Result};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

// ---------------------------------------------------------------------------
// jq
// ---------------------------------------------------------------------------

fn resolve_jq(explicit: Option<&str>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(PathBuf::from(path)),
        None => which::which("jq").map_err(|_| ClipforgeError::ToolNotFound("jq".to_string())),
    }
}

/// Pipe `input` through `jq -r <filter>`. A missing binary is
/// `ToolNotFound`; a non-zero exit (bad filter, bad JSON) is `ToolFailed`
/// carrying jq's stderr.
pub fn run_jq(input: &str, filter: &str, jq_bin: Option<&str>) -> Result<String> {
    let jq = resolve_jq(jq_bin)?;
    tracing::debug!(jq = %jq.display(), filter, "running jq");

    let mut child = Command::new(&jq)
        .arg("-r")
        .arg(filter)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| ClipforgeError::ToolFailed {
            tool: "jq".to_string(),
            message: e.to_string(),
        })?;

    if let Some(stdin) = child.stdin.as_mut() {
        stdin.write_all(input.as_bytes())?;
    }
    let output = child.wait_with_output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ClipforgeError::ToolFailed {
            tool: "jq".to_string(),
            message: stderr.trim().to_string(),
        });
    }

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    // jq always terminates its output with a newline; drop it so repeated
    // filters don't accumulate blank lines.
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

// ---------------------------------------------------------------------------
// Editor
// ---------------------------------------------------------------------------

fn resolve_editor(explicit: Option<&str>) -> String {
    if let Some(editor) = explicit {
        return editor.to_string();
    }
    std::env::var("VISUAL")
        .or_else(|_| std::env::var("EDITOR"))
        .unwrap_or_else(|_| "vi".to_string())
}

/// Write `input` to a tempfile, open it in the user's editor, and read the
/// result back once the editor exits.
pub fn edit_text(input: &str, editor_override: Option<&str>) -> Result<String> {
    let editor = resolve_editor(editor_override);
    let mut tmp = tempfile::Builder::new()
        .prefix("clipforge-")
        .suffix(".txt")
        .tempfile()?;
    tmp.write_all(input.as_bytes())?;
    tmp.flush()?;

    tracing::debug!(editor, path = %tmp.path().display(), "opening editor");
    let status = Command::new(&editor)
        .arg(tmp.path())
        .status()
        .map_err(|_| ClipforgeError::ToolNotFound(editor.clone()))?;
    if !status.success() {
        return Err(ClipforgeError::ToolFailed {
            tool: editor,
            message: format!("exited with {status}"),
        });
    }

    Ok(std::fs::read_to_string(tmp.path())?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
