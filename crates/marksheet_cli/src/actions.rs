//! Store actions shared by one-shot subcommands and the interactive shell.
//!
//! # Responsibility
//! - Run one user-triggered operation against the student service.
//! - Render the outcome as plain text.
//!
//! # Invariants
//! - Each action either completes or returns an error; nothing is retried.

use anyhow::{bail, Result};
use marksheet_core::{
    SortDirection, StudentId, StudentReport, StudentRepository, StudentService,
};
use std::io::Write;

const SEPARATOR_WIDTH: usize = 40;

/// One operation a user can trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// `id - name` lines, or JSON when `json` is set.
    List { json: bool },
    /// Every report followed by count and average percentage.
    Summary,
    Show(StudentId),
    Highest,
    Lowest,
    /// `None` toggles the session's stored direction.
    Sort(Option<SortDirection>),
    /// Raw `[id, name, cw1, cw2, cw3, exam]` input.
    Add(Vec<String>),
    Delete(StudentId),
}

/// Executes `action` and writes its output to `out`.
pub fn execute<R: StudentRepository>(
    service: &mut StudentService<R>,
    action: &Action,
    out: &mut impl Write,
) -> Result<()> {
    match action {
        Action::List { json } => {
            if *json {
                writeln!(out, "{}", serde_json::to_string_pretty(service.students())?)?;
            } else if service.is_empty() {
                writeln!(out, "No students available.")?;
            } else {
                for student in service.students() {
                    writeln!(out, "{} - {}", student.id, student.name)?;
                }
            }
        }
        Action::Summary => {
            let Some(summary) = service.class_summary() else {
                writeln!(out, "No students available.")?;
                return Ok(());
            };
            for student in service.students() {
                write!(out, "{}", StudentReport::new(student, service.scheme()))?;
                writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH))?;
            }
            writeln!(out)?;
            writeln!(out, "Total Students: {}", summary.count)?;
            writeln!(out, "Average Percentage: {}%", summary.mean_percentage)?;
        }
        Action::Show(id) => {
            let student = service.get_student(*id)?;
            write!(out, "{}", StudentReport::new(student, service.scheme()))?;
        }
        Action::Highest | Action::Lowest => {
            let (label, student) = if *action == Action::Highest {
                ("Highest", service.highest())
            } else {
                ("Lowest", service.lowest())
            };
            let Some(student) = student else {
                writeln!(out, "No students available.")?;
                return Ok(());
            };
            writeln!(out, "{label} Scoring Student:")?;
            writeln!(out)?;
            write!(out, "{}", StudentReport::new(student, service.scheme()))?;
        }
        Action::Sort(direction) => {
            let applied = match direction {
                Some(direction) => {
                    service.sort_by_total(*direction)?;
                    *direction
                }
                None => service.toggle_sort()?,
            };
            writeln!(out, "Students sorted by total score ({applied}).")?;
        }
        Action::Add(fields) => {
            let id = service.add_from_fields(fields.as_slice())?;
            writeln!(out, "Student {id} added successfully.")?;
        }
        Action::Delete(id) => {
            let removed = service.delete_student(*id)?;
            writeln!(out, "Student {} ({}) removed.", removed.id, removed.name)?;
        }
    }
    Ok(())
}

/// Parses one shell line into an action.
///
/// Returns `Ok(None)` for blank lines.
pub fn parse_shell_line(line: &str) -> Result<Option<Action>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map(|(verb, rest)| (verb, rest.trim()))
        .unwrap_or((line, ""));

    let action = match verb.to_ascii_lowercase().as_str() {
        "list" => Action::List {
            json: rest == "--json",
        },
        "summary" => Action::Summary,
        "show" => Action::Show(parse_id(rest)?),
        "highest" => Action::Highest,
        "lowest" => Action::Lowest,
        "sort" => match rest {
            "" => Action::Sort(None),
            "asc" => Action::Sort(Some(SortDirection::Ascending)),
            "desc" => Action::Sort(Some(SortDirection::Descending)),
            other => bail!("unknown sort direction `{other}`; expected asc|desc"),
        },
        "add" => Action::Add(rest.split(',').map(str::to_string).collect()),
        "delete" => Action::Delete(parse_id(rest)?),
        other => bail!("unknown command `{other}`; type `help` for a list"),
    };
    Ok(Some(action))
}

fn parse_id(raw: &str) -> Result<StudentId> {
    match raw.trim().parse() {
        Ok(id) => Ok(id),
        Err(_) => bail!("student code must be an integer, got `{raw}`"),
    }
}

#[cfg(test)]
mod tests {
    use super::{execute, parse_shell_line, Action};
    use marksheet_core::{
        FileStudentRepository, GradingScheme, SortDirection, StudentService,
    };

    fn service_with(
        dir: &tempfile::TempDir,
        contents: &str,
    ) -> StudentService<FileStudentRepository> {
        let path = dir.path().join("marks.txt");
        std::fs::write(&path, contents).unwrap();
        StudentService::open(FileStudentRepository::new(path), GradingScheme::default()).unwrap()
    }

    fn run(service: &mut StudentService<FileStudentRepository>, action: Action) -> String {
        let mut out = Vec::new();
        execute(service, &action, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parses_shell_verbs() {
        assert_eq!(parse_shell_line("  ").unwrap(), None);
        assert_eq!(
            parse_shell_line("SHOW 12").unwrap(),
            Some(Action::Show(12))
        );
        assert_eq!(parse_shell_line("sort").unwrap(), Some(Action::Sort(None)));
        assert_eq!(
            parse_shell_line("sort desc").unwrap(),
            Some(Action::Sort(Some(SortDirection::Descending)))
        );
        assert_eq!(
            parse_shell_line("add 3,Cy,1,2,3,4").unwrap(),
            Some(Action::Add(
                ["3", "Cy", "1", "2", "3", "4"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            ))
        );
        assert!(parse_shell_line("delete abc").is_err());
        assert!(parse_shell_line("frobnicate").is_err());
    }

    #[test]
    fn summary_ends_with_count_and_average() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = service_with(&dir, "2\n1,Alice,15,18,20,70\n2,Bob,10,10,10,40\n");

        let text = run(&mut service, Action::Summary);
        assert!(text.starts_with("Name: Alice\n"));
        assert!(text.ends_with("Total Students: 2\nAverage Percentage: 60.31%\n"));
    }

    #[test]
    fn empty_store_messages() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = service_with(&dir, "");

        assert_eq!(run(&mut service, Action::Highest), "No students available.\n");
        assert_eq!(run(&mut service, Action::Summary), "No students available.\n");
        assert_eq!(
            run(&mut service, Action::List { json: false }),
            "No students available.\n"
        );
    }

    #[test]
    fn toggled_sort_reports_applied_direction() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = service_with(&dir, "1,A,1,1,1,1\n2,B,9,9,9,9\n");

        assert_eq!(
            run(&mut service, Action::Sort(None)),
            "Students sorted by total score (ascending).\n"
        );
        assert_eq!(
            run(&mut service, Action::Sort(None)),
            "Students sorted by total score (descending).\n"
        );
        assert_eq!(run(&mut service, Action::List { json: false }), "2 - B\n1 - A\n");
    }
}
