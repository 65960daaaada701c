// ABOUTME: CLI that validates workout plan JSON files against the plan engine rules
// ABOUTME: Prints the full findings report and exits non-zero when any plan is invalid
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 REBLD

//! # plan-lint
//!
//! Validate one or more workout plan JSON files:
//!
//! ```bash
//! plan-lint fixtures/hypertrophy.json fixtures/cut.json
//! ```
//!
//! Exit code 0 when every plan is valid, 1 otherwise.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use rebld_plan_engine::plan::validate_workout_plan;

/// Validate REBLD workout plan JSON files
#[derive(Debug, Parser)]
#[command(name = "plan-lint", version, about)]
struct Cli {
    /// Plan JSON files to validate
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Print the findings report for valid plans too
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut all_valid = true;

    for file in &cli.files {
        let raw = fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        let plan: Value = serde_json::from_str(&raw)
            .with_context(|| format!("{} is not valid JSON", file.display()))?;

        let result = validate_workout_plan(&plan);

        if result.valid {
            println!(
                "{}: OK ({} warning(s))",
                file.display(),
                result.warnings.len()
            );
            if cli.verbose {
                println!("{}", result.summary());
            }
        } else {
            all_valid = false;
            println!("{}: INVALID", file.display());
            println!("{}", result.summary());
        }
    }

    Ok(if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
