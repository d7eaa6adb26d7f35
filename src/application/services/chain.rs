//! Chain client wrapper
//!
//! Thin wrapper around the `cleos` binary: builds argument vectors, journals
//! and executes them, and turns non-zero exits into errors. The wallet URL is
//! threaded into every invocation.

use std::path::PathBuf;
use std::process::Output;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::infrastructure::traits::CommandRunner;
use crate::infrastructure::Journal;

/// Wrapper for the command-line chain client.
pub struct ChainClient {
    cmd: Arc<dyn CommandRunner>,
    journal: Journal,
    program: PathBuf,
    wallet_url: String,
}

impl ChainClient {
    pub fn new(
        cmd: Arc<dyn CommandRunner>,
        journal: Journal,
        program: PathBuf,
        wallet_url: impl Into<String>,
    ) -> Self {
        Self {
            cmd,
            journal,
            program,
            wallet_url: wallet_url.into(),
        }
    }

    fn argv<'a>(&'a self, args: &'a [&'a str]) -> Vec<&'a str> {
        let mut argv = vec!["--wallet-url", self.wallet_url.as_str()];
        argv.extend_from_slice(args);
        argv
    }

    fn command_line(&self, args: &[&str]) -> String {
        format!(
            "{} --wallet-url {} {}",
            self.program.display(),
            self.wallet_url,
            args.join(" ")
        )
    }

    fn exec(&self, args: &[&str]) -> ApplicationResult<Output> {
        let line = self.command_line(args);
        self.journal.record(&line);
        debug!("cleos: {}", line);

        let program = self.program.to_string_lossy();
        self.cmd
            .run(program.as_ref(), &self.argv(args))
            .map_err(|e| ApplicationError::OperationFailed {
                context: format!("run {line}"),
                source: Box::new(e),
            })
    }

    fn check(&self, args: &[&str], output: Output) -> ApplicationResult<Output> {
        if output.status.success() {
            return Ok(output);
        }
        Err(ApplicationError::CommandFailed {
            command: self.command_line(args),
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Run a chain command; non-zero exit is an error.
    pub fn run(&self, args: &[&str]) -> ApplicationResult<()> {
        let output = self.exec(args)?;
        self.check(args, output)?;
        Ok(())
    }

    /// Run a chain command, retrying unconditionally until it succeeds.
    pub fn run_retry(&self, args: &[&str]) -> ApplicationResult<()> {
        loop {
            let output = self.exec(args)?;
            if output.status.success() {
                return Ok(());
            }
            warn!("command failed, retrying: {}", self.command_line(args));
        }
    }

    /// Run a chain command and capture its stdout.
    pub fn output(&self, args: &[&str]) -> ApplicationResult<String> {
        let output = self.exec(args)?;
        let output = self.check(args, output)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run a chain command and parse its stdout as JSON.
    pub fn output_json(&self, args: &[&str]) -> ApplicationResult<serde_json::Value> {
        let stdout = self.output(args)?;
        serde_json::from_str(&stdout).map_err(|e| ApplicationError::OperationFailed {
            context: format!("parse JSON from {}", self.command_line(args)),
            source: Box::new(e),
        })
    }
}
