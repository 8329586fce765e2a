//! Swift test method extraction from demangled global symbols.

use super::{method_name, patterns, SymbolSource};
use crate::error::Result;
use crate::io::validate_binary;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, trace};

/// Parse one `<mangled> ---> <demangled>` line, returning the test
/// identifier (`Class/method`) if it names a Swift test method.
pub fn parse_swift_line(line: &str) -> Option<String> {
    patterns::RE_SWIFT_TEST_METHOD
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|raw| method_name(raw.as_str()))
}

/// Collect the test identifiers from demangler output.
pub fn parse_swift_symbols(output: &str) -> BTreeSet<String> {
    let mut results = BTreeSet::new();
    let mut lines = 0usize;
    for line in output.lines() {
        lines += 1;
        if let Some(name) = parse_swift_line(line) {
            results.insert(name);
        } else {
            trace!(line, "Skipped swift symbol line");
        }
    }
    debug!(lines, tests = results.len(), "Parsed swift symbol listing");
    results
}

/// Enumerate the Swift test methods in `binary`.
pub fn parse_swift_tests<S: SymbolSource>(binary: &Path, source: &S) -> Result<BTreeSet<String>> {
    validate_binary(binary)?;
    let output = source.demangled_global_symbols(binary)?;
    Ok(parse_swift_symbols(&output))
}
