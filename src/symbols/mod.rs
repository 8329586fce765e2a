//! # Symbols Module
//!
//! Symbol listings are obtained from external tools through a [`SymbolSource`]
//! and turned into normalized test identifiers by the per-language parsers in
//! [`objc`] and [`swift`]. Keeping the source behind a trait isolates the
//! pattern matching from process invocation.

use crate::config::ParserConfig;
use crate::error::{Result, XcTestError};
use crate::exec::{shell_quote, CommandRunner, ShellRunner};
use std::path::Path;
use tracing::debug;

pub mod objc;
pub mod patterns;
pub mod swift;

pub use objc::{parse_objc_line, parse_objc_symbols, parse_objc_tests};
pub use swift::{parse_swift_line, parse_swift_symbols, parse_swift_tests};

/// Provider of textual symbol listings for a binary.
pub trait SymbolSource {
    /// Defined symbols, one per line, in `nm -U` format.
    fn defined_symbols(&self, binary: &Path) -> Result<String>;

    /// Global defined symbols run through the Swift demangler, one
    /// `<mangled> ---> <demangled>` pair per line.
    fn demangled_global_symbols(&self, binary: &Path) -> Result<String>;
}

impl<S: SymbolSource + ?Sized> SymbolSource for &S {
    fn defined_symbols(&self, binary: &Path) -> Result<String> {
        (**self).defined_symbols(binary)
    }

    fn demangled_global_symbols(&self, binary: &Path) -> Result<String> {
        (**self).demangled_global_symbols(binary)
    }
}

/// [`SymbolSource`] backed by `nm`, `getconf`, `xargs` and a demangler.
#[derive(Debug, Clone)]
pub struct NmSymbolSource<R> {
    runner: R,
    nm: String,
    demangler: String,
    getconf: String,
    xargs: String,
}

impl<R: CommandRunner> NmSymbolSource<R> {
    /// Wrap `runner` using the tool names from `config`.
    pub fn new(runner: R, config: &ParserConfig) -> Self {
        Self {
            runner,
            nm: config.nm.clone(),
            demangler: config.demangler.clone(),
            getconf: config.getconf.clone(),
            xargs: config.xargs.clone(),
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// The OS limit on the combined size of exec arguments.
    ///
    /// Demangling passes every global symbol as an argument, which easily
    /// exceeds this for large binaries, so the value bounds each `xargs`
    /// batch.
    pub fn arg_max(&self) -> Result<u64> {
        let command = format!("{} ARG_MAX", self.getconf);
        let output = self.runner.run(&command)?;
        match output.trim().parse::<u64>() {
            Ok(value) if value > 0 => {
                debug!(arg_max = value, "Queried argument list limit");
                Ok(value)
            }
            _ => Err(XcTestError::UnexpectedOutput { command, output }),
        }
    }
}

impl NmSymbolSource<ShellRunner> {
    /// Production source running real tools through the configured shell.
    pub fn from_config(config: &ParserConfig) -> Self {
        Self::new(ShellRunner::from_config(config), config)
    }
}

impl<R: CommandRunner> SymbolSource for NmSymbolSource<R> {
    fn defined_symbols(&self, binary: &Path) -> Result<String> {
        let command = format!("{} -U {}", self.nm, quote_path(binary));
        self.runner.run(&command)
    }

    /// Lists the symbols first and feeds them to `xargs` as a separate
    /// command, so a failing `nm` is reported rather than masked by the
    /// pipeline's final exit status.
    fn demangled_global_symbols(&self, binary: &Path) -> Result<String> {
        let arg_max = self.arg_max()?;
        let listing = format!("{} -gU {}", self.nm, quote_path(binary));
        let symbols = self.runner.run(&listing)?;
        if symbols.trim().is_empty() {
            debug!(binary = %binary.display(), "No global symbols to demangle");
            return Ok(String::new());
        }

        let demangle = format!("{} -s {} {}", self.xargs, arg_max, self.demangler);
        self.runner.run_with_input(&demangle, &symbols)
    }
}

fn quote_path(path: &Path) -> String {
    shell_quote(&path.to_string_lossy())
}

/// Turn a raw `Class.method` or `Class method` capture into a test
/// identifier by replacing `.` and spaces with `/`.
pub fn method_name(raw: &str) -> String {
    raw.replace(['.', ' '], "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Replies to commands by prefix and records every command line along
    /// with any stdin it was given.
    struct ScriptedRunner {
        replies: Vec<(&'static str, &'static str)>,
        seen: RefCell<Vec<String>>,
        inputs: RefCell<Vec<String>>,
    }

    impl ScriptedRunner {
        fn new(replies: Vec<(&'static str, &'static str)>) -> Self {
            Self {
                replies,
                seen: RefCell::new(Vec::new()),
                inputs: RefCell::new(Vec::new()),
            }
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn run(&self, command: &str) -> Result<String> {
            self.seen.borrow_mut().push(command.to_string());
            self.replies
                .iter()
                .find(|(prefix, _)| command.starts_with(prefix))
                .map(|(_, reply)| reply.to_string())
                .ok_or_else(|| XcTestError::CommandFailed {
                    command: command.to_string(),
                    status: "exit status: 127".into(),
                    stderr: String::new(),
                })
        }

        fn run_with_input(&self, command: &str, input: &str) -> Result<String> {
            self.inputs.borrow_mut().push(input.to_string());
            self.run(command)
        }
    }

    #[test]
    fn test_method_name_replaces_dots_and_spaces() {
        assert_eq!(method_name("MyTests testLayout"), "MyTests/testLayout");
        assert_eq!(method_name("Mod.MyTests.testLayout"), "Mod/MyTests/testLayout");
        assert_eq!(method_name("NoSeparators"), "NoSeparators");
    }

    #[test]
    fn test_defined_symbols_quotes_binary_path() {
        let runner = ScriptedRunner::new(vec![("nm -U", "")]);
        let source = NmSymbolSource::new(&runner, &ParserConfig::default());
        source
            .defined_symbols(Path::new("/tmp/My Tests.xctest/My Tests"))
            .unwrap();
        assert_eq!(
            runner.seen.borrow().as_slice(),
            ["nm -U '/tmp/My Tests.xctest/My Tests'"]
        );
    }

    #[test]
    fn test_demangling_is_batched_by_arg_max() {
        let runner = ScriptedRunner::new(vec![
            ("getconf ARG_MAX", "262144\n"),
            ("nm -gU", "_T04Demo9DemoTestsC10testAddingyyF\n_main"),
            ("xargs", ""),
        ]);
        let source = NmSymbolSource::new(&runner, &ParserConfig::default());
        source
            .demangled_global_symbols(Path::new("SwiftTests"))
            .unwrap();
        assert_eq!(
            runner.seen.borrow().as_slice(),
            [
                "getconf ARG_MAX",
                "nm -gU 'SwiftTests'",
                "xargs -s 262144 xcrun swift-demangle"
            ]
        );
        assert_eq!(
            runner.inputs.borrow().as_slice(),
            ["_T04Demo9DemoTestsC10testAddingyyF\n_main"]
        );
    }

    #[test]
    fn test_listing_failure_skips_demangler() {
        let runner = ScriptedRunner::new(vec![("getconf ARG_MAX", "262144")]);
        let source = NmSymbolSource::new(&runner, &ParserConfig::default());
        let err = source
            .demangled_global_symbols(Path::new("NotMachO"))
            .unwrap_err();
        assert_eq!(err.command(), Some("nm -gU 'NotMachO'"));
        assert_eq!(runner.seen.borrow().len(), 2);
    }

    #[test]
    fn test_empty_listing_skips_demangler() {
        let runner = ScriptedRunner::new(vec![("getconf ARG_MAX", "262144"), ("nm -gU", "")]);
        let source = NmSymbolSource::new(&runner, &ParserConfig::default());
        let output = source
            .demangled_global_symbols(Path::new("Empty"))
            .unwrap();
        assert!(output.is_empty());
        assert_eq!(runner.seen.borrow().len(), 2);
    }

    #[test]
    fn test_configured_tool_names_are_used() {
        let config = ParserConfig {
            nm: "/opt/llvm/bin/llvm-nm".into(),
            demangler: "swift demangle --compact".into(),
            ..ParserConfig::default()
        };
        let runner = ScriptedRunner::new(vec![
            ("getconf", "4096"),
            ("/opt/llvm", "_T0x"),
            ("xargs", ""),
        ]);
        let source = NmSymbolSource::new(&runner, &config);
        source.demangled_global_symbols(Path::new("T")).unwrap();
        assert_eq!(runner.seen.borrow()[1], "/opt/llvm/bin/llvm-nm -gU 'T'");
        assert_eq!(runner.seen.borrow()[2], "xargs -s 4096 swift demangle --compact");
    }

    #[test]
    fn test_non_numeric_arg_max_is_rejected() {
        let runner = ScriptedRunner::new(vec![("getconf", "undefined")]);
        let source = NmSymbolSource::new(&runner, &ParserConfig::default());
        match source.arg_max() {
            Err(XcTestError::UnexpectedOutput { command, output }) => {
                assert_eq!(command, "getconf ARG_MAX");
                assert_eq!(output, "undefined");
            }
            other => panic!("expected UnexpectedOutput, got {:?}", other),
        }
    }

    #[test]
    fn test_arg_max_failure_stops_before_listing() {
        let runner = ScriptedRunner::new(vec![]);
        let source = NmSymbolSource::new(&runner, &ParserConfig::default());
        assert!(source
            .demangled_global_symbols(Path::new("SwiftTests"))
            .is_err());
        assert_eq!(runner.seen.borrow().len(), 1);
    }
}
