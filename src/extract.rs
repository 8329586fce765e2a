//! Caller-facing extraction API.

use crate::config::ParserConfig;
use crate::error::Result;
use crate::exec::ShellRunner;
use crate::symbols::{self, NmSymbolSource, SymbolSource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Language a test binary was compiled from. Chosen by the caller; binaries
/// are never sniffed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestKind {
    Objc,
    Swift,
}

impl FromStr for TestKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "objc" => Ok(TestKind::Objc),
            "swift" => Ok(TestKind::Swift),
            _ => Err(format!("Unknown test kind: {}. Use 'objc' or 'swift'", s)),
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestKind::Objc => write!(f, "objc"),
            TestKind::Swift => write!(f, "swift"),
        }
    }
}

/// Extracts test identifiers using an injected [`SymbolSource`].
#[derive(Debug, Clone)]
pub struct XcTestParser<S> {
    source: S,
}

impl<S: SymbolSource> XcTestParser<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Enumerate the test methods of `binary` as `Class/method` identifiers.
    pub fn parse<P: AsRef<Path>>(&self, binary: P, kind: TestKind) -> Result<BTreeSet<String>> {
        let binary = binary.as_ref();
        let tests = match kind {
            TestKind::Objc => symbols::parse_objc_tests(binary, &self.source)?,
            TestKind::Swift => symbols::parse_swift_tests(binary, &self.source)?,
        };
        info!(
            binary = %binary.display(),
            kind = %kind,
            tests = tests.len(),
            "Extracted test methods"
        );
        Ok(tests)
    }

    pub fn parse_objc_tests<P: AsRef<Path>>(&self, binary: P) -> Result<BTreeSet<String>> {
        self.parse(binary, TestKind::Objc)
    }

    pub fn parse_swift_tests<P: AsRef<Path>>(&self, binary: P) -> Result<BTreeSet<String>> {
        self.parse(binary, TestKind::Swift)
    }
}

impl XcTestParser<NmSymbolSource<ShellRunner>> {
    /// Parser that runs the real toolchain as described by `config`.
    pub fn from_config(config: &ParserConfig) -> Self {
        Self::new(NmSymbolSource::from_config(config))
    }
}

impl Default for XcTestParser<NmSymbolSource<ShellRunner>> {
    fn default() -> Self {
        Self::from_config(&ParserConfig::default())
    }
}

/// Parser over the stock Xcode toolchain.
pub type DefaultParser = XcTestParser<NmSymbolSource<ShellRunner>>;

/// Enumerate Objective-C test methods with the default toolchain.
pub fn parse_objc_tests<P: AsRef<Path>>(binary: P) -> Result<BTreeSet<String>> {
    DefaultParser::default().parse_objc_tests(binary)
}

/// Enumerate Swift test methods with the default toolchain.
pub fn parse_swift_tests<P: AsRef<Path>>(binary: P) -> Result<BTreeSet<String>> {
    DefaultParser::default().parse_swift_tests(binary)
}
