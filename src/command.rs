//! Message-from-command collaborator.
//!
//! A job may configure its notification text as a command line instead of
//! a literal string; the command runs in the job's workspace and its
//! captured standard output becomes the message. Command lines written on
//! one platform are normalized before running on the other: path
//! separators are rewritten (URLs excepted) and environment variable
//! references are converted between `%VAR%` and `$VAR` syntax.

use std::path::PathBuf;
use std::process::Stdio;

use regex::Regex;
use tokio::process::Command;

use crate::error::CommandError;

pub const UNIX_SEP: &str = "/";
pub const WINDOWS_SEP: &str = "\\";

/// A command line plus the execution environment it runs in.
#[derive(Debug, Clone, Default)]
pub struct CommandSpec {
    /// The command line, whitespace-tokenized at launch.
    pub line: String,
    /// Working directory; defaults to the current directory.
    pub workdir: Option<PathBuf>,
    /// Extra environment variables for the child process.
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            workdir: None,
            env: Vec::new(),
        }
    }

    pub fn with_workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

/// Rewrite path separators inside each whitespace-delimited word.
///
/// Words containing a URL scheme (`http:`, `https:`, `ftp:`, `git:`) are
/// left alone so remote references survive the rewrite.
pub fn convert_separator(line: &str, new_sep: &str) -> String {
    let words = Regex::new(r"\S+").expect("static regex");
    let urls = Regex::new(r"(https?|ftp|git):").expect("static regex");

    words
        .replace_all(line, |caps: &regex::Captures| {
            let word = &caps[0];
            if urls.is_match(word) {
                word.to_string()
            } else {
                word.replace(['/', '\\'], new_sep)
            }
        })
        .into_owned()
}

/// Convert Windows-style environment variables to UNIX-style.
/// E.g. `script --opt=%OPT%` to `script --opt=$OPT`.
pub fn convert_env_vars_to_unix(line: &str) -> String {
    let re = Regex::new(r"%([a-zA-Z0-9_]+)%").expect("static regex");
    re.replace_all(line, "$$${1}").into_owned()
}

/// Convert UNIX-style environment variables to Windows-style.
/// E.g. `script --opt=$OPT` to `script --opt=%OPT%`.
pub fn convert_env_vars_to_windows(line: &str) -> String {
    let re = Regex::new(r"\$([a-zA-Z0-9_]+)").expect("static regex");
    re.replace_all(line, "%${1}%").into_owned()
}

/// Normalize a command line for the platform it is about to run on.
fn normalize_for_platform(line: &str) -> String {
    if cfg!(windows) {
        convert_env_vars_to_windows(&convert_separator(line, WINDOWS_SEP))
    } else {
        convert_env_vars_to_unix(&convert_separator(line, UNIX_SEP))
    }
}

/// Run the command and capture its standard output as the message text.
///
/// Waits until the command exits; no timeout is applied here, the caller
/// owns cancellation. A launch failure or non-zero exit is an error - the
/// orchestrator treats either the same as an absent message.
pub async fn capture_output(spec: &CommandSpec) -> Result<String, CommandError> {
    let line = normalize_for_platform(&spec.line);
    let mut tokens = line.split_whitespace();
    let Some(program) = tokens.next() else {
        return Err(CommandError::EmptyCommandLine);
    };

    tracing::debug!(program = %program, "running message command");

    let mut cmd = Command::new(program);
    cmd.args(tokens);
    if let Some(dir) = &spec.workdir {
        cmd.current_dir(dir);
    }
    cmd.envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    cmd.stdin(Stdio::null());

    let output = cmd
        .output()
        .await
        .map_err(|e| CommandError::LaunchFailed(e.to_string()))?;

    if !output.status.success() {
        return Err(CommandError::NonZeroExit(output.status.code().unwrap_or(-1)));
    }

    // The console may hand us non-UTF-8 bytes; decode lossily rather than
    // refusing to post anything.
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
