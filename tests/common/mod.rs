//! Shared test helpers: canned tool output and fixture loading.
#![allow(dead_code)]

use std::cell::RefCell;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use xctest_parser::{CommandRunner, Result, XcTestError};

/// Path to a file under `tests/fixtures`.
pub fn fixture_path<P: AsRef<Path>>(relative_path: P) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(relative_path)
}

/// Contents of a fixture file.
pub fn fixture<P: AsRef<Path>>(relative_path: P) -> String {
    let path = fixture_path(relative_path);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {:?}: {}", path, e))
}

/// A stand-in test binary. Extraction never reads it, but validation needs a
/// regular file to exist.
pub fn fake_binary() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"\xcf\xfa\xed\xfe").unwrap();
    file
}

/// `CommandRunner` that answers from a table keyed by command prefix and
/// records every command it was asked to run, plus any stdin it was fed.
#[derive(Default)]
pub struct FakeRunner {
    replies: Vec<(String, std::result::Result<String, i32>)>,
    commands: RefCell<Vec<String>>,
    inputs: RefCell<Vec<String>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `stdout` to commands starting with `prefix`.
    pub fn on(mut self, prefix: &str, stdout: impl Into<String>) -> Self {
        self.replies.push((prefix.to_string(), Ok(stdout.into())));
        self
    }

    /// Fail commands starting with `prefix` with exit `code`.
    pub fn fail(mut self, prefix: &str, code: i32) -> Self {
        self.replies.push((prefix.to_string(), Err(code)));
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.borrow().clone()
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.borrow().clone()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, command: &str) -> Result<String> {
        self.commands.borrow_mut().push(command.to_string());
        let reply = self
            .replies
            .iter()
            .find(|(prefix, _)| command.starts_with(prefix.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or(Err(127));
        reply.map_err(|code| XcTestError::CommandFailed {
            command: command.to_string(),
            status: format!("exit status: {}", code),
            stderr: String::new(),
        })
    }

    fn run_with_input(&self, command: &str, input: &str) -> Result<String> {
        self.inputs.borrow_mut().push(input.to_string());
        self.run(command)
    }
}
