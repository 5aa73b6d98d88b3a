//! WebP conversion through an external encoder binary
//!
//! The encoder is invoked as `<binary> -q <quality> <input> -o <output>`.
//! Process spawning goes through [`CommandRunner`] so tests can fake it.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};

/// Captured result of a finished subprocess
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

pub trait CommandRunner {
    fn run(&self, program: &str, args: &[OsString]) -> std::io::Result<CommandOutput>;
}

/// Runs commands for real
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[OsString]) -> std::io::Result<CommandOutput> {
        let output = Command::new(program).args(args).output()?;
        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

pub struct Encoder<R> {
    binary: String,
    quality: u8,
    runner: R,
}

impl Encoder<SystemRunner> {
    pub fn new(binary: impl Into<String>, quality: u8) -> Self {
        Self::with_runner(binary, quality, SystemRunner)
    }
}

impl<R: CommandRunner> Encoder<R> {
    pub fn with_runner(binary: impl Into<String>, quality: u8, runner: R) -> Self {
        Self {
            binary: binary.into(),
            quality,
            runner,
        }
    }

    /// Arguments for converting `input` into `output`
    pub fn args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "-q".into(),
            self.quality.to_string().into(),
            input.as_os_str().to_owned(),
            "-o".into(),
            output.as_os_str().to_owned(),
        ]
    }

    /// Convert `input` to `output`.
    ///
    /// Succeeds only if the encoder exits zero and leaves a non-empty file.
    /// On failure, an output this call created is removed again.
    pub fn encode(&self, input: &Path, output: &Path) -> Result<()> {
        let existed = output.exists();
        let args = self.args(input, output);
        log::info!(
            "Running {} {}",
            self.binary,
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let result = self.run_checked(&args, output);
        if result.is_err() {
            self.discard_partial(output, existed);
        }
        result
    }

    fn run_checked(&self, args: &[OsString], output: &Path) -> Result<()> {
        let out = self.runner.run(&self.binary, args).map_err(|e| {
            Error::Encode(format!("failed to run {}: {}", self.binary, e))
        })?;
        if !out.stdout.trim().is_empty() {
            log::debug!("{} output: {}", self.binary, out.stdout.trim());
        }

        if !out.success() {
            let code = out
                .code
                .map_or_else(|| "signal".to_string(), |c| c.to_string());
            let stderr = out.stderr.trim();
            return Err(Error::Encode(if stderr.is_empty() {
                format!("{} exited with status {}", self.binary, code)
            } else {
                format!("{} exited with status {}: {}", self.binary, code, stderr)
            }));
        }

        match std::fs::metadata(output) {
            Ok(metadata) if metadata.is_file() && metadata.len() > 0 => Ok(()),
            Ok(_) => Err(Error::Encode(format!(
                "{} produced an empty file at {}",
                self.binary,
                output.display()
            ))),
            Err(_) => Err(Error::Encode(format!(
                "{} reported success but {} is missing",
                self.binary,
                output.display()
            ))),
        }
    }

    fn discard_partial(&self, output: &Path, existed: bool) {
        let Ok(metadata) = std::fs::metadata(output) else {
            return;
        };
        // A pre-existing file is left alone unless the encoder truncated it
        if !metadata.is_file() || (existed && metadata.len() > 0) {
            return;
        }
        match std::fs::remove_file(output) {
            Ok(()) => log::info!("Removed partial output {}", output.display()),
            Err(e) => log::warn!("Failed to remove partial output {}: {}", output.display(), e),
        }
    }
}
