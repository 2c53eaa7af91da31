// xtask - Development automation for emu-gfx
//
// Usage: cargo run -p xtask -- <command>
//
// Commands wrap cargo invocations for the presenter crate: CI gate, test
// suites grouped by what they exercise, criterion bench groups and the
// test-pattern demo window.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::process::{Command, Stdio};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "x")]
#[command(about = "Development automation for emu-gfx")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format check, clippy, then every test suite
    Ci,
    /// Format the workspace (or check formatting)
    Fmt {
        #[arg(long)]
        check: bool,
    },
    /// Run clippy over all targets with warnings denied
    Clippy,
    /// Run test suites
    Test {
        /// Suites to run (default: all)
        #[arg(value_enum)]
        suites: Vec<Suite>,
    },
    /// Run criterion benchmarks
    Bench {
        /// Bench group filter, e.g. viewport, machine_frame, resolve_view, overlay
        group: Option<String>,
    },
    /// Open the test-pattern demo window
    Demo {
        /// RUST_LOG filter
        #[arg(long, default_value = "info")]
        log: String,
        #[arg(long)]
        release: bool,
    },
}

/// Groups of tests that can be run on their own
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Suite {
    /// Unit tests inside the library
    Unit,
    /// Texture creation, resize and upload rules against the recording backend
    Lifecycle,
    /// Viewport placement properties
    Viewport,
    /// Flash and mute icon frame sequences
    Overlay,
}

impl Suite {
    const ALL: [Suite; 4] = [Suite::Unit, Suite::Lifecycle, Suite::Viewport, Suite::Overlay];

    fn name(self) -> &'static str {
        match self {
            Suite::Unit => "unit",
            Suite::Lifecycle => "lifecycle",
            Suite::Viewport => "viewport",
            Suite::Overlay => "overlay",
        }
    }

    /// cargo test target selection for the suite
    fn target_args(self) -> &'static [&'static str] {
        match self {
            Suite::Unit => &["--lib", "--bins"],
            Suite::Lifecycle => &["--test", "texture_lifecycle"],
            Suite::Viewport => &["--test", "viewport_tests"],
            Suite::Overlay => &["--test", "overlay_tests"],
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci => run_ci(),
        Commands::Fmt { check } => cargo(fmt_args(check)),
        Commands::Clippy => cargo(clippy_args()),
        Commands::Test { suites } => run_suites(&suites),
        Commands::Bench { group } => run_bench(group.as_deref()),
        Commands::Demo { log, release } => run_demo(&log, release),
    }
}

fn fmt_args(check: bool) -> Vec<String> {
    let mut args = vec!["fmt".to_string(), "--all".to_string()];
    if check {
        args.extend(["--".to_string(), "--check".to_string()]);
    }
    args
}

fn clippy_args() -> Vec<String> {
    ["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn run_ci() -> Result<()> {
    println!("{}", "=== emu-gfx CI ===".bold().blue());
    let start = Instant::now();

    step("fmt", || cargo(fmt_args(true)))?;
    step("clippy", || cargo(clippy_args()))?;
    run_suites(&[])?;

    println!(
        "\n{} {}",
        "✓ CI passed in".green().bold(),
        format!("{:.2}s", start.elapsed().as_secs_f64()).bold()
    );
    Ok(())
}

fn run_suites(requested: &[Suite]) -> Result<()> {
    let suites: &[Suite] = if requested.is_empty() {
        &Suite::ALL
    } else {
        requested
    };

    let mut failed = Vec::new();
    for &suite in suites {
        let mut args = vec!["test".to_string()];
        args.extend(suite.target_args().iter().map(|s| s.to_string()));
        if step(&format!("test {}", suite.name()), || cargo(args)).is_err() {
            failed.push(suite.name());
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        bail!("Failed suites: {}", failed.join(", "))
    }
}

fn run_bench(group: Option<&str>) -> Result<()> {
    let mut args = vec![
        "bench".to_string(),
        "--bench".to_string(),
        "present_bench".to_string(),
    ];
    if let Some(group) = group {
        args.extend(["--".to_string(), group.to_string()]);
    }
    cargo(args)
}

fn run_demo(log: &str, release: bool) -> Result<()> {
    println!("{}", "=== Presenter demo ===".bold().blue());
    println!("{} RUST_LOG={}", "→".blue(), log.cyan());
    println!(
        "{} F1 debug window, F2/F3 flash, M mute, P pattern, F9 screenshot, F10 snapshot",
        "ℹ".blue()
    );

    let mut args = vec!["run".to_string(), "--bin".to_string(), "emu-gfx".to_string()];
    if release {
        args.push("--release".to_string());
    }

    let status = Command::new("cargo")
        .args(&args)
        .env("RUST_LOG", log)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;
    if !status.success() {
        bail!("Demo exited with {}", status);
    }
    Ok(())
}

/// Run one named step and report its outcome on a single line
fn step<F>(name: &str, task: F) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    println!("{} {}", "→".blue(), name.bold());
    let start = Instant::now();
    match task() {
        Ok(()) => {
            println!(
                "{} {} ({:.2}s)",
                "✓".green().bold(),
                name,
                start.elapsed().as_secs_f64()
            );
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "✗".red().bold(), name);
            Err(e)
        }
    }
}

fn cargo(args: Vec<String>) -> Result<()> {
    let status = Command::new("cargo")
        .args(&args)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;
    if !status.success() {
        bail!("cargo {} failed with {}", args.join(" "), status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suites_select_integration_targets() {
        assert_eq!(Suite::Lifecycle.target_args(), &["--test", "texture_lifecycle"]);
        assert_eq!(Suite::Viewport.target_args(), &["--test", "viewport_tests"]);
        assert_eq!(Suite::Overlay.target_args(), &["--test", "overlay_tests"]);
        assert_eq!(Suite::ALL.len(), 4);
    }

    #[test]
    fn test_cargo_args_have_no_feature_flags() {
        let all: Vec<String> = clippy_args().into_iter().chain(fmt_args(true)).collect();
        assert!(all.iter().all(|a| !a.contains("features")));
        assert_eq!(fmt_args(true).last().map(String::as_str), Some("--check"));
    }
}
