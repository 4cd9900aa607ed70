use std::{
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use casejam::{FramingPlan, Harness, PlanManifest, RunStats, builder};
use chrono::{DateTime, Local};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Serialize;

const SOLVER_TEMPLATE: &str = include_str!("../templates/solver.rs");

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.action {
        Action::Run(args) => run_cases(&args),
        Action::Init { path, force } => write_template(&path, force),
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "casejam",
    version,
    about = "Frame numbered test cases from judge input and write `Case #i:` output"
)]
struct Cli {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Solve every case of an input file with a built-in transform
    Run(RunArgs),
    /// Write a solver skeleton that uses the casejam library
    Init {
        path: PathBuf,
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Input file, `-` or absent for stdin
    input: Option<PathBuf>,
    /// Output file, `-` or absent for stdout
    output: Option<PathBuf>,
    /// Fixed number of lines per case
    #[arg(long, default_value_t = 1, conflicts_with = "plan")]
    lines: usize,
    /// TOML framing plan for cases with a varying layout
    #[arg(long)]
    plan: Option<PathBuf>,
    #[arg(long, value_enum, default_value = "join")]
    transform: Transform,
    /// Separator used by the `join` transform
    #[arg(long, default_value = " ")]
    separator: String,
    /// Report slow cases and the total run time on stderr
    #[arg(long)]
    time: bool,
    /// Write a JSON run summary to this file
    #[arg(long)]
    summary: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
enum Transform {
    /// First line of the case
    First,
    /// All lines joined by `--separator`
    Join,
    /// Number of lines in the case
    Count,
}

impl Transform {
    fn apply(self, lines: &[String], separator: &str) -> String {
        match self {
            Transform::First => lines.first().cloned().unwrap_or_default(),
            Transform::Join => lines.join(separator),
            Transform::Count => lines.len().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SlowCase {
    case: u64,
    duration_ms: u128,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    input: String,
    output: String,
    transform: Transform,
    started_at: DateTime<Local>,
    finished_at: DateTime<Local>,
    status: &'static str,
    total_cases: Option<u64>,
    solved: Option<u64>,
    duration_ms: Option<u128>,
    slow_cases: Vec<SlowCase>,
    error: Option<String>,
}

fn run_cases(args: &RunArgs) -> Result<()> {
    let plan = match &args.plan {
        Some(path) => PlanManifest::load(path)
            .and_then(PlanManifest::into_plan)
            .with_context(|| format!("failed to load framing plan {}", path.display()))?,
        None => FramingPlan::fixed_lines(args.lines)?,
    };

    let input = file_arg(args.input.as_deref());
    let output = file_arg(args.output.as_deref());
    let reader: Box<dyn Read> = match input {
        Some(path) => Box::new(builder::open_input(path)?),
        None => Box::new(io::stdin()),
    };
    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(builder::create_output(path)?),
        None => Box::new(io::stdout()),
    };

    let mut options = Harness::from_streams(reader, writer).with_plan(plan);
    if args.time {
        options = options.time_execution();
    }

    let start = Local::now();
    let transform = args.transform;
    let separator = args.separator.clone();
    let outcome = options.solve(move |lines| Ok(transform.apply(lines, &separator)));
    let end = Local::now();

    let summary = RunSummary {
        input: display_arg(input, "stdin"),
        output: display_arg(output, "stdout"),
        transform,
        started_at: start,
        finished_at: end,
        status: if outcome.is_ok() { "passed" } else { "failed" },
        total_cases: outcome.as_ref().ok().map(|stats| stats.total_cases),
        solved: outcome.as_ref().ok().map(|stats| stats.solved),
        duration_ms: outcome.as_ref().ok().map(|stats| stats.elapsed.as_millis()),
        slow_cases: outcome.as_ref().map(slow_cases).unwrap_or_default(),
        error: outcome.as_ref().err().map(|err| err.to_string()),
    };
    if let Some(path) = &args.summary {
        fs::write(path, serde_json::to_string_pretty(&summary)?)
            .with_context(|| format!("failed to write summary {}", path.display()))?;
    }

    match outcome {
        Ok(stats) => {
            eprintln!(
                "{} {}/{} cases written to {}",
                "completed:".green().bold(),
                stats.solved,
                stats.total_cases,
                summary.output
            );
            Ok(())
        }
        Err(err) => {
            eprintln!("{} {}", "failed:".red().bold(), summary.input);
            Err(err).with_context(|| format!("run over {} aborted", summary.input))
        }
    }
}

fn slow_cases(stats: &RunStats) -> Vec<SlowCase> {
    stats
        .slow_cases
        .iter()
        .map(|timing| SlowCase {
            case: timing.case,
            duration_ms: timing.elapsed.as_millis(),
        })
        .collect()
}

fn file_arg(path: Option<&Path>) -> Option<&Path> {
    path.filter(|path| *path != Path::new("-"))
}

fn display_arg(path: Option<&Path>, stream: &str) -> String {
    path.map(|path| path.display().to_string())
        .unwrap_or_else(|| stream.to_string())
}

fn write_template(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists - pass --force to overwrite it",
            path.display()
        );
    }
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, SOLVER_TEMPLATE)
        .with_context(|| format!("failed to write solver template {}", path.display()))?;
    println!("{} {}", "created".green().bold(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn built_in_transforms() {
        let case = lines(&["3", "a", "b"]);
        assert_eq!(Transform::First.apply(&case, ","), "3");
        assert_eq!(Transform::Join.apply(&case, ","), "3,a,b");
        assert_eq!(Transform::Count.apply(&case, ","), "3");
        assert_eq!(Transform::First.apply(&[], ","), "");
    }

    #[test]
    fn dash_means_standard_stream() {
        assert_eq!(file_arg(Some(Path::new("-"))), None);
        assert_eq!(file_arg(Some(Path::new("a.in"))), Some(Path::new("a.in")));
        assert_eq!(display_arg(None, "stdin"), "stdin");
    }

    #[test]
    fn template_refuses_to_overwrite() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("solver").join("main.rs");
        write_template(&path, false).expect("first write");
        assert!(write_template(&path, false).is_err());
        write_template(&path, true).expect("forced write");
        let content = fs::read_to_string(&path).expect("template readable");
        assert!(content.contains("Harness::from_args"));
    }

    #[test]
    fn cli_parses_run_arguments() {
        let cli = Cli::try_parse_from([
            "casejam", "run", "a.in", "a.out", "--lines", "2", "--transform", "count", "--time",
        ])
        .expect("arguments parse");
        match cli.action {
            Action::Run(args) => {
                assert_eq!(args.lines, 2);
                assert!(args.time);
                assert!(matches!(args.transform, Transform::Count));
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn cli_rejects_lines_with_plan() {
        assert!(
            Cli::try_parse_from(["casejam", "run", "--lines", "2", "--plan", "p.toml"]).is_err()
        );
    }
}
