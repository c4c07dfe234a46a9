//! Persistence line codec.
//!
//! A stored task is one line: `[T][X] body`, where `T` is the type tag (`T`, `D`, `E`),
//! `X` is the done mark (`X` or a space) and `body` is the display text of the task,
//! e.g. `[E][ ] team sync (from: Dec 02 2024 6:00pm to: Dec 02 2024 7:00pm)`.
//!
//! Fields are read at fixed offsets rather than by scanning for delimiters. Lines written
//! by older builds carry a list number in front (`1. [D] [X] body`); those are still read
//! with their own offsets, see [`LineLayout`].

use crate::dates::parse_date_time;
use crate::error::{Error, Result};
use crate::task::{Task, TaskKind};

const BY_MARKER: &str = " (by:";
const FROM_MARKER: &str = " (from:";
const TO_MARKER: &str = " to:";

/// Byte offsets of the fields in a persistence line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineLayout {
    pub tag: usize,
    pub mark: usize,
    pub body: usize,
}

impl LineLayout {
    /// `[T][X] body`, the layout written by [`to_line`].
    pub const COMPACT: LineLayout = LineLayout { tag: 1, mark: 4, body: 7 };
    /// `1. [T] [X] body`, read for compatibility with existing files.
    pub const LEGACY: LineLayout = LineLayout { tag: 4, mark: 8, body: 11 };

    /// Pick the layout of `line` from its bracket positions.
    pub fn detect(line: &str) -> LineLayout {
        let b = line.as_bytes();
        if b.len() >= 6 && b[0] == b'[' && b[2] == b']' && b[3] == b'[' && b[5] == b']' {
            LineLayout::COMPACT
        } else {
            LineLayout::LEGACY
        }
    }
}

fn invalid(line: &str, reason: &str) -> Error {
    Error::InvalidFormat(format!("{reason} in '{line}'"))
}

/// Case-insensitive search for an ASCII marker. ASCII lowercasing keeps byte offsets intact.
fn find_marker(haystack: &str, marker: &str) -> Option<usize> {
    haystack.to_ascii_lowercase().find(marker)
}

/// Check that `description` survives [`to_line`] followed by [`parse`].
///
/// The field markers are found by first occurrence, so a description holding one of them
/// would cut the line short. Control characters (newlines in particular) would split it.
pub fn check_description(description: &str) -> Result<()> {
    if description.chars().any(char::is_control) {
        return Err(Error::ControlCharacter);
    }
    for marker in [BY_MARKER, FROM_MARKER] {
        if find_marker(description, marker).is_some() {
            return Err(Error::ReservedMarker(marker.trim_start()));
        }
    }
    Ok(())
}

/// Encode a task as a persistence line.
pub fn to_line(task: &Task) -> String {
    format!("[{}]{}", task.kind().tag(), task)
}

/// Decode a line produced by [`to_line`] (or by an older build, see [`LineLayout::LEGACY`]).
pub fn parse(line: &str) -> Result<Task> {
    if line.is_empty() {
        return Err(Error::InvalidFormat("line cannot be null or empty".into()));
    }

    let layout = LineLayout::detect(line);
    let bytes = line.as_bytes();
    let tag = *bytes.get(layout.tag).ok_or_else(|| invalid(line, "missing type tag"))?;
    let mark = *bytes.get(layout.mark).ok_or_else(|| invalid(line, "missing done mark"))?;
    let body = line
        .get(layout.body..)
        .ok_or_else(|| invalid(line, "missing description"))?;

    let (description, kind) = match tag {
        b'D' => {
            let inner = body
                .strip_suffix(')')
                .ok_or_else(|| invalid(line, "missing closing ')'"))?;
            let at = find_marker(inner, BY_MARKER)
                .ok_or_else(|| invalid(line, "missing '(by:'"))?;
            let due = inner
                .get(at + BY_MARKER.len() + 1..)
                .ok_or_else(|| invalid(line, "missing due date"))?;
            (&inner[..at], TaskKind::Deadline { by: parse_date_time(due)? })
        }
        b'E' => {
            let inner = body
                .strip_suffix(')')
                .ok_or_else(|| invalid(line, "missing closing ')'"))?;
            let from_at = find_marker(inner, FROM_MARKER)
                .ok_or_else(|| invalid(line, "missing '(from:'"))?;
            let after_from = from_at + FROM_MARKER.len();
            let to_at = find_marker(&inner[after_from..], TO_MARKER)
                .map(|i| i + after_from)
                .ok_or_else(|| invalid(line, "missing 'to:'"))?;
            let from = inner
                .get(after_from + 1..to_at)
                .ok_or_else(|| invalid(line, "missing start time"))?;
            let to = inner
                .get(to_at + TO_MARKER.len() + 1..)
                .ok_or_else(|| invalid(line, "missing end time"))?;
            (
                &inner[..from_at],
                TaskKind::Event {
                    from: parse_date_time(from)?,
                    to: parse_date_time(to)?,
                },
            )
        }
        _ => (body, TaskKind::ToDo),
    };

    if description.is_empty() {
        return Err(invalid(line, "empty description"));
    }

    let mut task = Task::new(description, kind);
    task.set_done(mark == b'X');
    Ok(task)
}

/// [`parse`] for callers holding an optional line; `None` is rejected like an empty line.
pub fn parse_opt(line: Option<&str>) -> Result<Task> {
    match line {
        Some(line) => parse(line),
        None => Err(Error::InvalidFormat("line cannot be null or empty".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn assert_invalid_format(line: &str) {
        match parse(line) {
            Err(Error::InvalidFormat(_)) => {}
            other => panic!("expected InvalidFormat for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_to_line() {
        let mut task = Task::event("team sync", at(2024, 12, 2, 18, 0), at(2024, 12, 2, 19, 0));
        task.set_done(true);
        assert_eq!(
            to_line(&task),
            "[E][X] team sync (from: Dec 02 2024 6:00pm to: Dec 02 2024 7:00pm)"
        );
        assert_eq!(to_line(&Task::todo("read book")), "[T][ ] read book");
    }

    #[test]
    fn test_parse_deadline() {
        let task = parse("[D][ ] submit report (by: Dec 02 2024)").unwrap();
        assert_eq!(task, Task::deadline("submit report", at(2024, 12, 2, 0, 0)));
        assert!(!task.is_done());
    }

    #[test]
    fn test_parse_event() {
        let task =
            parse("[E][X] team sync (from: Dec 02 2024 6:00pm to: Dec 02 2024 7:00pm)").unwrap();
        assert!(task.is_done());
        assert_eq!(task.description(), "team sync");
        assert_eq!(
            task.kind(),
            &TaskKind::Event { from: at(2024, 12, 2, 18, 0), to: at(2024, 12, 2, 19, 0) }
        );
    }

    #[test]
    fn test_parse_todo_and_unknown_tag() {
        let task = parse("[T][X] read book").unwrap();
        assert_eq!(task.kind(), &TaskKind::ToDo);
        assert_eq!(task.description(), "read book");
        assert!(task.is_done());

        // Anything that is not D or E reads as a plain todo.
        let task = parse("[Q][ ] water plants").unwrap();
        assert_eq!(task.kind(), &TaskKind::ToDo);
        assert!(!task.is_done());
    }

    #[test]
    fn test_markers_are_case_insensitive() {
        let task = parse("[D][ ] submit report (BY: 02/12/2024 1800)").unwrap();
        assert_eq!(task.kind(), &TaskKind::Deadline { by: at(2024, 12, 2, 18, 0) });

        let task = parse("[E][ ] trip (From: Dec 02 2024 TO: Dec 05 2024)").unwrap();
        assert_eq!(
            task.kind(),
            &TaskKind::Event { from: at(2024, 12, 2, 0, 0), to: at(2024, 12, 5, 0, 0) }
        );
    }

    #[test]
    fn test_legacy_layout() {
        assert_eq!(LineLayout::detect("1. [D] [X] pay rent"), LineLayout::LEGACY);
        let task = parse("1. [D] [X] pay rent (by: 01/01/2025 0900)").unwrap();
        assert!(task.is_done());
        assert_eq!(task.description(), "pay rent");
        assert_eq!(task.kind(), &TaskKind::Deadline { by: at(2025, 1, 1, 9, 0) });

        let task = parse("2. [T] [ ] read book").unwrap();
        assert_eq!(task, Task::todo("read book"));
    }

    #[test]
    fn test_event_description_may_contain_to() {
        let task = parse("[E][ ] go to: market (from: Dec 02 2024 to: Dec 03 2024)").unwrap();
        assert_eq!(task.description(), "go to: market");
    }

    #[test]
    fn test_round_trip() {
        let mut tasks = vec![
            Task::todo("read book"),
            Task::deadline("submit report", at(2024, 12, 2, 0, 0)),
            Task::deadline("file taxes", at(2025, 4, 15, 23, 59)),
            Task::event("team sync", at(2024, 12, 2, 18, 0), at(2024, 12, 2, 19, 30)),
            Task::event("holiday", at(2024, 12, 24, 0, 0), at(2024, 12, 20, 0, 0)),
            Task::todo("ünïcödé description"),
        ];
        let done: Vec<Task> = tasks
            .iter()
            .cloned()
            .map(|mut t| {
                t.set_done(true);
                t
            })
            .collect();
        tasks.extend(done);

        for task in tasks {
            let line = to_line(&task);
            assert_eq!(parse(&line).unwrap(), task, "line {line:?}");
        }
    }

    #[test]
    fn test_round_trip_with_seconds() {
        let odd = NaiveDate::from_ymd_opt(2024, 12, 2)
            .unwrap()
            .and_hms_milli_opt(0, 0, 30, 999)
            .unwrap();
        let later = NaiveDate::from_ymd_opt(2024, 12, 2)
            .unwrap()
            .and_hms_opt(18, 45, 59)
            .unwrap();
        for task in [Task::deadline("x", odd), Task::event("y", odd, later)] {
            let line = to_line(&task);
            assert_eq!(parse(&line).unwrap(), task, "line {line:?}");
        }
        assert_eq!(to_line(&Task::deadline("x", odd)), "[D][ ] x (by: Dec 02 2024)");
    }

    #[test]
    fn test_first_by_marker_wins() {
        // The due date starts right after the first marker, so the rest of the line is
        // read as one date and rejected.
        assert!(matches!(
            parse("[D][ ] a (by: b) (by: Dec 02 2024)"),
            Err(Error::InvalidDateFormat(_))
        ));
        let task = parse("[D][ ] a (by: Dec 02 2024) (by: Dec 03 2024)");
        assert!(matches!(task, Err(Error::InvalidDateFormat(_))));
    }

    #[test]
    fn test_missing_closing_paren() {
        assert_invalid_format("[D][ ] report (by: Dec 02 2024");
        assert_invalid_format("[E][ ] party (from: Dec 02 2024 to: Dec 03 2024");
    }

    #[test]
    fn test_multibyte_right_after_marker() {
        assert_invalid_format("[D][ ] x (by:é…)");
        assert_invalid_format("[E][ ] x (from:é to: Dec 02 2024)");
        assert_invalid_format("[E][ ] x (from: Dec 02 2024 to:é)");
    }

    #[test]
    fn test_check_description() {
        assert!(check_description("pay (by friday) bill").is_ok());
        assert!(check_description("go to: market").is_ok());
        assert!(matches!(check_description("pay (By: friday)"), Err(Error::ReservedMarker("(by:"))));
        assert!(matches!(check_description("x (from: y"), Err(Error::ReservedMarker("(from:"))));
        assert!(matches!(check_description("a\nb"), Err(Error::ControlCharacter)));
        assert!(matches!(check_description("a\rb"), Err(Error::ControlCharacter)));
    }

    #[test]
    fn test_empty_and_missing_lines() {
        assert_invalid_format("");
        assert!(matches!(parse_opt(None), Err(Error::InvalidFormat(_))));
        assert!(parse_opt(Some("[T][ ] ok")).is_ok());
    }

    #[test]
    fn test_malformed_lines_never_panic() {
        for line in [
            "x",
            "[T][ ]",
            "[T][ ] ",
            "[D][ ] report",
            "[D][ ] report (by: Dec 02 2024",
            "[D][ ] (by: Dec 02 2024)",
            "[E][ ] party (from: Dec 02 2024)",
            "[E][ ] party (to: Dec 02 2024 from: Dec 01 2024)",
            "1. [T] [ ]",
            "12é",
        ] {
            assert_invalid_format(line);
        }
    }

    #[test]
    fn test_bad_date_surfaces_as_date_error() {
        assert!(matches!(
            parse("[D][ ] report (by: someday)"),
            Err(Error::InvalidDateFormat(_))
        ));
    }
}
