//! Objective-C test method extraction from `nm -U` listings.

use super::{method_name, patterns, SymbolSource};
use crate::error::Result;
use crate::io::validate_binary;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, trace};

/// Parse one `nm` line, returning the test identifier if it names an
/// Objective-C test method.
pub fn parse_objc_line(line: &str) -> Option<String> {
    patterns::RE_OBJC_TEST_METHOD
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|raw| method_name(raw.as_str()))
}

/// Collect the test identifiers from a full `nm -U` listing.
pub fn parse_objc_symbols(output: &str) -> BTreeSet<String> {
    let mut results = BTreeSet::new();
    let mut lines = 0usize;
    for line in output.lines() {
        lines += 1;
        match parse_objc_line(line) {
            Some(name) => {
                results.insert(name);
            }
            None => trace!(line, "Skipped objc symbol line"),
        }
    }
    debug!(lines, tests = results.len(), "Parsed objc symbol listing");
    results
}

/// Enumerate the Objective-C test methods in `binary`.
pub fn parse_objc_tests<S: SymbolSource>(binary: &Path, source: &S) -> Result<BTreeSet<String>> {
    validate_binary(binary)?;
    let output = source.defined_symbols(binary)?;
    Ok(parse_objc_symbols(&output))
}
