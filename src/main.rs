//! xctest-parser - list the test methods compiled into an XCTest binary

use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use xctest_parser::{logging, ParserConfig, TestKind, XcTestParser};

#[derive(Parser)]
#[command(name = "xctest-parser")]
#[command(about = "List test methods in compiled Objective-C and Swift XCTest binaries")]
#[command(version)]
struct Cli {
    /// Language the test binary was written in: objc or swift
    #[arg(value_parser = TestKind::from_str)]
    kind: TestKind,

    /// Path to the test binary (inside the .xctest bundle)
    binary: PathBuf,

    /// JSON file overriding tool names and timeout
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Abort any single tool invocation after this many seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Print a JSON object instead of one test per line
    #[arg(long)]
    json: bool,

    /// Emit logs as JSON (filter with RUST_LOG)
    #[arg(long)]
    log_json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    binary: &'a str,
    kind: TestKind,
    tests: Vec<&'a str>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.log_json {
        logging::init_tracing_json();
    } else {
        logging::init_tracing();
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => ParserConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ParserConfig::default(),
    };
    if cli.timeout.is_some() {
        config.timeout_seconds = cli.timeout;
    }

    let kind = cli.kind;
    let tests = XcTestParser::from_config(&config)
        .parse(&cli.binary, kind)
        .with_context(|| format!("Failed to list {} tests in {}", kind, cli.binary.display()))?;

    if cli.json {
        let binary = cli.binary.to_string_lossy();
        let report = Report {
            binary: &binary,
            kind,
            tests: tests.iter().map(String::as_str).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for test in &tests {
            println!("{}", test);
        }
    }

    Ok(())
}
