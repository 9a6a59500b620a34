// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Clipboard access.
//!
//! Octogit never links against a windowing system. Instead, text is piped
//! into whatever clipboard tool the platform provides: `pbcopy` on macOS,
//! `clip` on Windows, and `wl-copy`, `xclip`, or `xsel` elsewhere. The user
//! may also name their own tool in the settings file.
//!
//! A successful copy is acknowledged through a [`CopyIndicator`] that stays
//! visible for a short while before reverting. A failed copy is not an
//! error for the learner; the indicator simply never shows up.

use std::{
    cell::RefCell,
    ffi::{OsStr, OsString},
    io::Write,
    process::{Command, Stdio},
    time::{Duration, Instant},
};
use tracing::{debug, instrument};

/// Default visibility of the copy confirmation.
pub const DEFAULT_INDICATOR_DURATION: Duration = Duration::from_millis(2000);

/// Write-only access to a clipboard.
pub trait Clipboard {
    /// Place text on the clipboard.
    fn write_text(&self, text: &str) -> Result<()>;
}

/// Clipboard reached through external platform tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemClipboard {
    candidates: Vec<Vec<OsString>>,
}

impl SystemClipboard {
    /// Construct new clipboard trying platform tools in order.
    pub fn new() -> Self {
        Self {
            candidates: platform_candidates(),
        }
    }

    /// Construct new clipboard using one specific tool.
    ///
    /// First element is the program, the rest are its arguments.
    pub fn with_command(command: impl IntoIterator<Item = impl Into<OsString>>) -> Self {
        let command = command.into_iter().map(Into::into).collect::<Vec<_>>();
        let candidates = if command.is_empty() {
            platform_candidates()
        } else {
            vec![command]
        };

        Self { candidates }
    }

    /// Tools to try in order.
    pub fn candidates(&self) -> &[Vec<OsString>] {
        self.candidates.as_slice()
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard for SystemClipboard {
    #[instrument(skip(self, text), level = "debug")]
    fn write_text(&self, text: &str) -> Result<()> {
        let mut failures = Vec::new();
        for candidate in &self.candidates {
            let Some((program, args)) = candidate.split_first() else {
                continue;
            };

            match pipe_into(program, args, text) {
                Ok(()) => {
                    debug!("copied text through {:?}", program);
                    return Ok(());
                }
                Err(err) => {
                    debug!("clipboard tool {:?} failed: {err}", program);
                    failures.push(format!("{}: {err}", program.to_string_lossy()));
                }
            }
        }

        Err(ClipboardError::Unavailable(failures.join("; ")))
    }
}

/// Clipboard kept in memory.
///
/// Records every write. Can be told to fail in order to exercise the
/// degraded path.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    writes: RefCell<Vec<String>>,
    broken: bool,
}

impl MemoryClipboard {
    /// Construct new working memory clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct new memory clipboard that rejects every write.
    pub fn broken() -> Self {
        Self {
            writes: RefCell::default(),
            broken: true,
        }
    }

    /// Latest text placed on the clipboard.
    pub fn contents(&self) -> Option<String> {
        self.writes.borrow().last().cloned()
    }

    /// Every text placed on the clipboard, oldest first.
    pub fn writes(&self) -> Vec<String> {
        self.writes.borrow().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        if self.broken {
            return Err(ClipboardError::Unavailable("clipboard is broken".into()));
        }

        self.writes.borrow_mut().push(text.to_owned());
        Ok(())
    }
}

/// Time-boxed confirmation of a copied command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyIndicator {
    command: String,
    copied_at: Instant,
    duration: Duration,
}

impl CopyIndicator {
    /// Construct new indicator for command copied at target instant.
    pub fn new(command: impl Into<String>, copied_at: Instant, duration: Duration) -> Self {
        Self {
            command: command.into(),
            copied_at,
            duration,
        }
    }

    /// Copied command.
    pub fn command(&self) -> &str {
        self.command.as_str()
    }

    /// Check if indicator should still be shown at target instant.
    pub fn is_visible(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.copied_at) < self.duration
    }
}

fn platform_candidates() -> Vec<Vec<OsString>> {
    let tools: &[&[&str]] = if cfg!(target_os = "macos") {
        &[&["pbcopy"]]
    } else if cfg!(windows) {
        &[&["clip"]]
    } else {
        &[
            &["wl-copy"],
            &["xclip", "-selection", "clipboard"],
            &["xsel", "--clipboard", "--input"],
        ]
    };

    tools
        .iter()
        .map(|tool| tool.iter().map(OsString::from).collect())
        .collect()
}

fn pipe_into(
    program: impl AsRef<OsStr>,
    args: impl IntoIterator<Item = impl AsRef<OsStr>>,
    text: &str,
) -> std::io::Result<()> {
    let mut child = Command::new(program.as_ref())
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    // INVARIANT: Close stdin before waiting so the tool sees end of input.
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()),
        None => Ok(()),
    };

    // INVARIANT: Always reap the child, even if it stopped reading early.
    let status = child.wait();
    written?;
    let status = status?;
    if !status.success() {
        return Err(std::io::Error::other(format!(
            "command {:?} exited with {status}",
            program.as_ref()
        )));
    }

    Ok(())
}

/// Clipboard error types.
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    /// No clipboard tool accepted the text.
    #[error("no usable clipboard tool: {0}")]
    Unavailable(String),
}

/// Friendly result alias :3
pub type Result<T, E = ClipboardError> = std::result::Result<T, E>;
