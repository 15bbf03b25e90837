//! Test helpers for behavioral specifications.
//!
//! Provides a fluent DSL for testing `relay` CLI behavior, in the style of
//! the teacher's CLI spec harness but against a stateless HTTP client
//! rather than a daemon-backed process, so these specs only exercise
//! argument parsing, help text, and error formatting that don't require a
//! live `relayd`.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use assert_cmd::Command;

/// Build a `relay` command.
pub fn cli() -> CliBuilder {
    CliBuilder::new()
}

pub struct CliBuilder {
    args: Vec<String>,
}

impl CliBuilder {
    fn new() -> Self {
        Self { args: Vec::new() }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    fn command(self) -> Command {
        let mut cmd = Command::cargo_bin("relay").expect("relay binary should build");
        cmd.args(&self.args);
        cmd
    }

    /// Run and expect success (exit code 0).
    pub fn passes(self) -> RunAssert {
        let output = self.command().output().expect("command should run");
        assert!(
            output.status.success(),
            "expected command to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    /// Run and expect failure (non-zero exit code).
    pub fn fails(self) -> RunAssert {
        let output = self.command().output().expect("command should run");
        assert!(
            !output.status.success(),
            "expected command to fail, but it passed\nstdout: {}",
            String::from_utf8_lossy(&output.stdout)
        );
        RunAssert { output }
    }
}

pub struct RunAssert {
    output: std::process::Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(stdout.contains(expected), "stdout does not contain '{expected}'\nstdout: {stdout}");
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(stderr.contains(expected), "stderr does not contain '{expected}'\nstderr: {stderr}");
        self
    }
}
