//! Enumerate XCTest methods in compiled Objective-C and Swift test binaries.
//!
//! Symbols are listed with `nm` (demangled with `swift-demangle` for Swift)
//! and matched line by line; the result is a set of `Class/method`
//! identifiers.
//!
//! ```no_run
//! let tests = xctest_parser::parse_objc_tests("EarlGreyExampleTests.xctest/EarlGreyExampleTests")?;
//! for test in &tests {
//!     println!("{}", test);
//! }
//! # Ok::<(), xctest_parser::XcTestError>(())
//! ```

pub mod config;
pub mod error;
pub mod exec;
pub mod extract;
pub mod io;
pub mod logging;
pub mod symbols;
pub mod timeout;

pub use config::ParserConfig;
pub use error::{Result, XcTestError};
pub use exec::{CommandRunner, ShellRunner};
pub use extract::{parse_objc_tests, parse_swift_tests, DefaultParser, TestKind, XcTestParser};
pub use io::validate_binary;
pub use symbols::{NmSymbolSource, SymbolSource};
