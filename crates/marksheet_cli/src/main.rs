//! Command-line front end for the student marks store.
//!
//! # Responsibility
//! - Map subcommands onto store actions for one-shot use.
//! - Offer an interactive shell that keeps one session (and its sort
//!   toggle) alive across commands.

mod actions;

use actions::{execute, parse_shell_line, Action};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use marksheet_core::{
    core_version, default_log_level, init_logging, FileStudentRepository, GradingScheme,
    LogLevel, SortDirection, StudentId, StudentRepository, StudentService,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

const SHELL_HELP: &str = "\
commands:
  list [--json]              list students as `code - name`
  summary                    every report plus count and average
  show <code>                one student's report
  highest | lowest           student with the highest/lowest total
  sort [asc|desc]            sort by total; without a direction, toggles
  add <code>,<name>,<cw1>,<cw2>,<cw3>,<exam>
  delete <code>
  help | quit";

#[derive(Debug, Parser)]
#[command(name = "marksheet", version, about = "Student marks records manager")]
struct Cli {
    /// Marks file; created empty when missing.
    #[arg(long, env = "MARKSHEET_FILE", default_value = "studentMarks.txt")]
    file: PathBuf,

    /// JSON grading scheme override (score bounds and grade thresholds).
    #[arg(long)]
    scheme: Option<PathBuf>,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error; defaults by build mode.
    #[arg(long, requires = "log_dir")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List students as `code - name`.
    List {
        #[arg(long)]
        json: bool,
    },
    /// Print every report followed by count and average percentage.
    Summary,
    /// Print one student's report.
    Show {
        #[arg(allow_negative_numbers = true)]
        code: StudentId,
    },
    /// Student with the highest total.
    Highest,
    /// Student with the lowest total.
    Lowest,
    /// Sort by total and rewrite the file.
    Sort {
        /// Sort descending instead of ascending.
        #[arg(long)]
        desc: bool,
    },
    /// Add a student from raw field values.
    Add {
        #[arg(
            num_args = 6,
            value_names = ["CODE", "NAME", "CW1", "CW2", "CW3", "EXAM"],
            allow_hyphen_values = true
        )]
        fields: Vec<String>,
    },
    /// Delete a student by code.
    Delete {
        #[arg(allow_negative_numbers = true)]
        code: StudentId,
    },
    /// Interactive session reading commands from stdin.
    Shell,
    /// Print the core library version.
    Version,
}

impl Command {
    fn action(&self) -> Option<Action> {
        let action = match self {
            Self::List { json } => Action::List { json: *json },
            Self::Summary => Action::Summary,
            Self::Show { code } => Action::Show(*code),
            Self::Highest => Action::Highest,
            Self::Lowest => Action::Lowest,
            Self::Sort { desc } => Action::Sort(Some(if *desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            })),
            Self::Add { fields } => Action::Add(fields.clone()),
            Self::Delete { code } => Action::Delete(*code),
            Self::Shell | Self::Version => return None,
        };
        Some(action)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = match &cli.log_level {
            Some(raw) => raw.parse::<LogLevel>().context("invalid --log-level")?,
            None => default_log_level(),
        };
        init_logging(level, log_dir)
            .with_context(|| format!("failed to start logging in `{}`", log_dir.display()))?;
    }

    if let Command::Version = cli.command {
        println!("marksheet_core version={}", core_version());
        return Ok(());
    }

    let scheme = load_scheme(cli.scheme.as_deref())?;
    let mut service = StudentService::open(FileStudentRepository::new(&cli.file), scheme)
        .with_context(|| format!("failed to open marks file `{}`", cli.file.display()))?;
    for skipped in service.skipped_lines() {
        eprintln!(
            "warning: skipped line {}: {}",
            skipped.line_number, skipped.reason
        );
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command.action() {
        Some(action) => execute(&mut service, &action, &mut out),
        None => run_shell(&mut service, io::stdin().lock(), &mut out),
    }
}

fn load_scheme(path: Option<&Path>) -> Result<GradingScheme> {
    let Some(path) = path else {
        return Ok(GradingScheme::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scheme `{}`", path.display()))?;
    let scheme: GradingScheme = serde_json::from_str(&text)
        .with_context(|| format!("invalid scheme JSON in `{}`", path.display()))?;
    scheme.validate()?;
    Ok(scheme)
}

fn run_shell<R: StudentRepository>(
    service: &mut StudentService<R>,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    info!("event=shell_start module=cli records={}", service.len());
    writeln!(out, "{} students loaded. Type `help` for commands.", service.len())?;

    for line in input.lines() {
        let line = line?;
        match line.trim() {
            "quit" | "exit" => break,
            "help" => {
                writeln!(out, "{SHELL_HELP}")?;
                continue;
            }
            _ => {}
        }

        // Failures are reported and the session continues.
        let outcome = parse_shell_line(&line).and_then(|action| match action {
            Some(action) => execute(service, &action, out),
            None => Ok(()),
        });
        if let Err(err) = outcome {
            writeln!(out, "error: {err:#}")?;
        }
    }
    Ok(())
}
