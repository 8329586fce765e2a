//! Precompiled patterns over `nm` and `swift-demangle` output lines.
//!
//! These are contracts with the external tools' text format: if a line shape
//! changes upstream, matching silently stops. Each pattern has exactly one
//! capture group holding the raw `Class<sep>method` name.

use once_cell::sync::Lazy;
use regex::Regex;

// Objective-C instance methods in the text section whose selector begins with
// "test", e.g. `000089b0 t -[EarlGreyExampleTests testLayout]`.
pub static RE_OBJC_TEST_METHOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#".+\st\s-\[(.+\stest.+)\]"#).expect("valid objc test method regex")
});

// Demangled Swift test methods taking no arguments and returning Void, e.g.
// `_T0...yyF ---> Module.SomeTests.testLayout() -> ()`. The greedy module
// prefix leaves `Class.method` in the capture.
pub static RE_SWIFT_TEST_METHOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#".+\s--->\s.+\.(.+\.test.+)\(\)\s->\s\(\)"#)
        .expect("valid swift test method regex")
});
