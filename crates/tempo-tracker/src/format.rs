// SPDX-FileCopyrightText: 2026 Tempo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The message-format contract: every string the bot sends.
//!
//! Chat history doubles as the audit log, so the `#START`/`#STOP` markers
//! and the duration formats are load-bearing; downstream tooling greps for
//! them. Change nothing here without checking consumers.

use chrono::TimeDelta;

use tempo_core::types::{CompletedSession, Session, UserTotal, Username};

/// Marker prefix of session-start notifications.
pub const START_CODE: &str = "#START";
/// Marker prefix of session-stop notifications.
pub const STOP_CODE: &str = "#STOP";

/// Menu label and callback id of the who-is-working report.
pub const ISWORKING: &str = "Who is working ?";
/// Menu label and callback id of the time summary report.
pub const SUMMARY: &str = "Summary";

pub const CHOOSE_TASK: &str = "Choose a task:";
pub const ALLOW_DELETE_PROMPT: &str = "Please allow me to delete messages!";
pub const UNKNOWN_COMMAND: &str = "Sorry, I didn't understand that command.";
pub const INVALID_CATALOG: &str = "Sorry, I couldn't read that tasks file.";
pub const NO_ONE_WORKING: &str = "No one is working at the moment.";
pub const NO_ONE_EVER_WORKED: &str = "No one ever worked here since I'm alive.";

/// One working day, in seconds. Durations are reported in JEH
/// (journée-équivalent-homme, an 8-hour man-day) above this threshold.
const JEH_SECONDS: i64 = 28_800;

pub fn start_comment_prompt(author: &Username) -> String {
    format!("Please {author} comment what you will work on.")
}

pub fn stop_comment_prompt(author: &Username) -> String {
    format!("Please {author} comment what you did.")
}

pub fn catalog_prompt(author: &Username) -> String {
    format!("Please {author} send tasks in toml format.")
}

pub fn catalog_updated(author: &Username) -> String {
    format!("{author} has updated project tasks.")
}

pub fn already_working(author: &Username) -> String {
    format!("{author} is already working.")
}

pub fn data_menu_prompt(author: &Username) -> String {
    format!("What do you want to do {author}?")
}

/// Human duration: `1JEH 2h 3m 4s`, zero units skipped, seconds always
/// present. `compact` drops the spaces.
pub fn pretty_time_delta(seconds: i64, compact: bool) -> String {
    let mut secs = seconds.max(0);
    let jeh = secs / JEH_SECONDS;
    secs %= JEH_SECONDS;
    let hours = secs / 3600;
    secs %= 3600;
    let minutes = secs / 60;
    secs %= 60;

    let mut parts = Vec::new();
    if jeh > 0 {
        parts.push(format!("{jeh}JEH"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    parts.push(format!("{secs}s"));

    parts.join(if compact { "" } else { " " })
}

/// Exact duration: `H:MM:SS`, with a `N day(s), ` prefix past 24 hours.
pub fn format_exact_duration(delta: TimeDelta) -> String {
    let total = delta.num_seconds().max(0);
    let days = total / 86_400;
    let rem = total % 86_400;
    let hours = rem / 3600;
    let minutes = (rem % 3600) / 60;
    let seconds = rem % 60;

    if days > 0 {
        let unit = if days == 1 { "day" } else { "days" };
        format!("{days} {unit}, {hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{hours}:{minutes:02}:{seconds:02}")
    }
}

fn start_suffix(session: &Session) -> String {
    if session.task.is_none() && session.start_comment.is_none() {
        return String::new();
    }

    // The comment is parenthesized only when a task is also named;
    // on its own it reads as the thing being worked on.
    let comment = match (&session.task, &session.start_comment) {
        (Some(_), Some(comment)) => Some(format!("({comment})")),
        (None, Some(comment)) => Some(comment.clone()),
        _ => None,
    };

    let mut parts = vec![" on".to_string()];
    if let Some(task) = &session.task {
        parts.push(task.clone());
    }
    if let Some(comment) = comment {
        parts.push(comment);
    }
    parts.join(" ")
}

/// The `#START` notification for a freshly started session.
pub fn start_message(session: &Session) -> String {
    format!(
        "{START_CODE} {} started working{}",
        session.author,
        start_suffix(session)
    )
}

/// The `#STOP` notification for a sealed session.
pub fn stop_message(completed: &CompletedSession) -> String {
    let session = completed.session();
    let mut suffix = String::new();
    if let Some(task) = &session.task {
        suffix.push_str(&format!(" on {task}"));
    }
    if let Some(comment) = completed.stop_comment() {
        suffix.push_str(&format!(" ({comment})"));
    }
    format!(
        "{STOP_CODE} {} stopped working{} after {} [{}]",
        session.author,
        suffix,
        pretty_time_delta(completed.duration().num_seconds(), false),
        format_exact_duration(completed.duration()),
    )
}

/// The who-is-working report. Lines are sorted by username so the report
/// is stable across calls.
pub fn working_report(now: chrono::DateTime<chrono::Utc>, workers: &[&Session]) -> String {
    let mut lines: Vec<String> = workers
        .iter()
        .map(|session| {
            let elapsed = pretty_time_delta((now - session.start).num_seconds(), false);
            match &session.start_comment {
                Some(comment) => format!("{} since {elapsed} on {comment}", session.author),
                None => format!("{} since {elapsed}", session.author),
            }
        })
        .collect();
    lines.sort();
    format!("Currently working:\n{}", lines.join("\n"))
}

/// The per-user time summary report.
pub fn summary_report(totals: &[UserTotal]) -> String {
    let lines: Vec<String> = totals
        .iter()
        .map(|t| {
            format!(
                "{}: {}",
                t.username,
                pretty_time_delta(t.total_seconds as i64, false)
            )
        })
        .collect();
    format!("Summary of time spent:\n{}", lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn session(task: Option<&str>, comment: Option<&str>) -> Session {
        Session::new(
            Username("@alice".into()),
            ts(0),
            comment.map(str::to_string),
            task.map(str::to_string),
        )
    }

    #[test]
    fn pretty_seconds_only() {
        assert_eq!(pretty_time_delta(45, false), "45s");
        assert_eq!(pretty_time_delta(0, false), "0s");
    }

    #[test]
    fn pretty_minutes_and_seconds() {
        assert_eq!(pretty_time_delta(125, false), "2m 5s");
    }

    #[test]
    fn pretty_hours_skip_zero_minutes() {
        assert_eq!(pretty_time_delta(3605, false), "1h 5s");
    }

    #[test]
    fn pretty_jeh_unit_kicks_in_at_eight_hours() {
        assert_eq!(pretty_time_delta(28_800, false), "1JEH 0s");
        assert_eq!(pretty_time_delta(28_800 + 3660, false), "1JEH 1h 1m 0s");
    }

    #[test]
    fn pretty_compact_drops_spaces() {
        assert_eq!(pretty_time_delta(28_800 + 3660, true), "1JEH1h1m0s");
    }

    #[test]
    fn exact_duration_formats_like_a_clock() {
        assert_eq!(format_exact_duration(TimeDelta::seconds(3600)), "1:00:00");
        assert_eq!(format_exact_duration(TimeDelta::seconds(65)), "0:01:05");
    }

    #[test]
    fn exact_duration_with_day_prefix() {
        assert_eq!(
            format_exact_duration(TimeDelta::seconds(86_400 + 3661)),
            "1 day, 1:01:01"
        );
        assert_eq!(
            format_exact_duration(TimeDelta::seconds(2 * 86_400)),
            "2 days, 0:00:00"
        );
    }

    #[test]
    fn start_message_bare() {
        assert_eq!(
            start_message(&session(None, None)),
            "#START @alice started working"
        );
    }

    #[test]
    fn start_message_with_task_only() {
        assert_eq!(
            start_message(&session(Some("poulet"), None)),
            "#START @alice started working on poulet"
        );
    }

    #[test]
    fn start_message_with_comment_only() {
        assert_eq!(
            start_message(&session(None, Some("refactoring"))),
            "#START @alice started working on refactoring"
        );
    }

    #[test]
    fn start_message_with_task_and_comment() {
        assert_eq!(
            start_message(&session(Some("poulet"), Some("the good part"))),
            "#START @alice started working on poulet (the good part)"
        );
    }

    #[test]
    fn stop_message_with_everything() {
        let completed = CompletedSession::new(
            session(Some("poulet"), Some("start")),
            ts(3600),
            Some("done".into()),
        );
        assert_eq!(
            stop_message(&completed),
            "#STOP @alice stopped working on poulet (done) after 1h 0s [1:00:00]"
        );
    }

    #[test]
    fn stop_message_bare() {
        let completed = CompletedSession::new(session(None, None), ts(90), None);
        assert_eq!(
            stop_message(&completed),
            "#STOP @alice stopped working after 1m 30s [0:01:30]"
        );
    }

    #[test]
    fn working_report_lists_workers_sorted() {
        let alice = Session::new(
            Username("@alice".into()),
            ts(0),
            Some("parsing".into()),
            None,
        );
        let bob = Session::new(Username("@bob".into()), ts(60), None, None);
        let report = working_report(ts(120), &[&bob, &alice]);
        assert_eq!(
            report,
            "Currently working:\n@alice since 2m 0s on parsing\n@bob since 1m 0s"
        );
    }

    #[test]
    fn summary_report_formats_totals() {
        let totals = vec![
            UserTotal {
                username: "@alice".into(),
                total_seconds: 3600.0,
            },
            UserTotal {
                username: "@bob".into(),
                total_seconds: 45.0,
            },
        ];
        assert_eq!(
            summary_report(&totals),
            "Summary of time spent:\n@alice: 1h 0s\n@bob: 45s"
        );
    }
}
