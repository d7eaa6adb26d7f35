//! Shared test doubles for the I/O boundary traits.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::os::unix::process::ExitStatusExt;
use std::process::{ExitStatus, Output};
use std::sync::Mutex;
use std::time::Duration;

use rushctl::infrastructure::traits::{Clock, CommandRunner};

/// Canned response for a scripted command.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl MockResponse {
    pub fn ok() -> Self {
        Self {
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    pub fn ok_with(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn fail(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    fn into_output(self) -> Output {
        Output {
            status: ExitStatus::from_raw(self.exit_code << 8),
            stdout: self.stdout.into_bytes(),
            stderr: self.stderr.into_bytes(),
        }
    }
}

struct Stub {
    pattern: String,
    responses: VecDeque<MockResponse>,
}

/// Command runner recording every invocation.
///
/// Responses are stubbed by substring match on the full command line; the
/// first matching stub answers, popping queued responses until one is left,
/// which then repeats. Unmatched commands succeed with empty output.
#[derive(Default)]
pub struct MockCommandRunner {
    runs: Mutex<Vec<String>>,
    spawns: Mutex<Vec<String>>,
    stubs: Mutex<Vec<Stub>>,
}

impl MockCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stub all commands whose line contains `pattern` with one response.
    pub fn stub(&self, pattern: impl Into<String>, response: MockResponse) {
        self.stub_seq(pattern, vec![response]);
    }

    /// Stub a sequence of responses; the last one repeats.
    pub fn stub_seq(&self, pattern: impl Into<String>, responses: Vec<MockResponse>) {
        self.stubs.lock().unwrap().push(Stub {
            pattern: pattern.into(),
            responses: responses.into(),
        });
    }

    /// Command lines executed via `run`, in order.
    pub fn run_lines(&self) -> Vec<String> {
        self.runs.lock().unwrap().clone()
    }

    /// Command lines launched via `spawn`, in order.
    pub fn spawn_lines(&self) -> Vec<String> {
        self.spawns.lock().unwrap().clone()
    }

    /// All executed lines containing the given substring.
    pub fn lines_matching(&self, pattern: &str) -> Vec<String> {
        self.run_lines()
            .into_iter()
            .filter(|line| line.contains(pattern))
            .collect()
    }

    fn respond(&self, line: &str) -> MockResponse {
        let mut stubs = self.stubs.lock().unwrap();
        for stub in stubs.iter_mut() {
            if line.contains(&stub.pattern) {
                return if stub.responses.len() > 1 {
                    stub.responses.pop_front().unwrap_or_else(MockResponse::ok)
                } else {
                    stub.responses.front().cloned().unwrap_or_else(MockResponse::ok)
                };
            }
        }
        MockResponse::ok()
    }
}

impl CommandRunner for MockCommandRunner {
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output> {
        let line = format!("{} {}", cmd, args.join(" "));
        self.runs.lock().unwrap().push(line.clone());
        Ok(self.respond(&line).into_output())
    }

    fn spawn(&self, cmd: &str, args: &[&str]) -> io::Result<u32> {
        let line = format!("{} {}", cmd, args.join(" "));
        self.spawns.lock().unwrap().push(line);
        Ok(4242)
    }
}

/// Clock recording requested sleeps instead of blocking.
#[derive(Default)]
pub struct MockClock {
    sleeps: Mutex<Vec<Duration>>,
}

impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl Clock for MockClock {
    fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}
