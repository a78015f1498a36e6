use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::PlannerError;

// Human-facing date patterns. The whole suffix is lowercased when rendered
// inside a task line; the agenda header and event span keep their case.
const DISPLAY_FORMAT: &str = "%A, %b %d %Y, %-I:%M%P";
const DATE_DISPLAY_FORMAT: &str = "%A, %b %d %Y";
const TIME_DISPLAY_FORMAT: &str = "%-I:%M%P";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    ToDo,
    Deadline {
        due_at: NaiveDateTime,
    },
    Event {
        start_at: NaiveDateTime,
        end_at: NaiveDateTime,
    },
}

impl TaskKind {
    pub fn tag(&self) -> char {
        match self {
            TaskKind::ToDo => 'T',
            TaskKind::Deadline { .. } => 'D',
            TaskKind::Event { .. } => 'E',
        }
    }
}

/// One trackable item. The description and kind are fixed at construction;
/// only the done flag mutates.
#[derive(Debug, Clone)]
pub struct Task {
    description: String,
    done: bool,
    kind: TaskKind,
}

impl Task {
    pub fn todo(description: impl Into<String>) -> Task {
        Task {
            description: description.into(),
            done: false,
            kind: TaskKind::ToDo,
        }
    }

    pub fn deadline(description: impl Into<String>, due_at: NaiveDateTime) -> Task {
        Task {
            description: description.into(),
            done: false,
            kind: TaskKind::Deadline { due_at },
        }
    }

    /// Constructs an event. Fails unless `start_at < end_at`, so every call
    /// path (user command or file load) is covered by the invariant.
    pub fn event(
        description: impl Into<String>,
        start_at: NaiveDateTime,
        end_at: NaiveDateTime,
    ) -> Result<Task, PlannerError> {
        if start_at >= end_at {
            return Err(PlannerError::Validation(
                "Event start time must be before end time.".to_string(),
            ));
        }
        Ok(Task {
            description: description.into(),
            done: false,
            kind: TaskKind::Event { start_at, end_at },
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn mark(&mut self) {
        self.done = true;
    }

    pub fn unmark(&mut self) {
        self.done = false;
    }

    pub fn status_char(&self) -> char {
        if self.done {
            'X'
        } else {
            ' '
        }
    }

    /// Whether the task lands on the given calendar date: a deadline due
    /// that day, or an event whose date range includes it (both ends
    /// inclusive). Always false for plain to-dos.
    pub fn includes_date(&self, date: NaiveDate) -> bool {
        match &self.kind {
            TaskKind::ToDo => false,
            TaskKind::Deadline { due_at } => due_at.date() == date,
            TaskKind::Event { start_at, end_at } => {
                start_at.date() <= date && date <= end_at.date()
            }
        }
    }

    /// Due time of a deadline as `h:mmam`/`h:mmpm`, used by the agenda view.
    pub fn due_time(&self) -> Option<String> {
        match &self.kind {
            TaskKind::Deadline { due_at } => {
                Some(due_at.format(TIME_DISPLAY_FORMAT).to_string())
            }
            _ => None,
        }
    }

    /// Date span of an event (`from: <date>, to: <date>`), used by the
    /// agenda view.
    pub fn date_span(&self) -> Option<String> {
        match &self.kind {
            TaskKind::Event { start_at, end_at } => Some(format!(
                "from: {}, to: {}",
                start_at.format(DATE_DISPLAY_FORMAT),
                end_at.format(DATE_DISPLAY_FORMAT)
            )),
            _ => None,
        }
    }
}

// Equality ignores the done flag: it backs duplicate detection, not
// collection identity.
impl PartialEq for Task {
    fn eq(&self, other: &Task) -> bool {
        self.description == other.description && self.kind == other.kind
    }
}

impl Eq for Task {}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}][{}] {}",
            self.kind.tag(),
            self.status_char(),
            self.description
        )?;
        match &self.kind {
            TaskKind::ToDo => Ok(()),
            TaskKind::Deadline { due_at } => write!(
                f,
                " (by: {})",
                due_at.format(DISPLAY_FORMAT).to_string().to_lowercase()
            ),
            TaskKind::Event { start_at, end_at } => write!(
                f,
                " (from: {} to: {})",
                start_at.format(DISPLAY_FORMAT).to_string().to_lowercase(),
                end_at.format(DISPLAY_FORMAT).to_string().to_lowercase()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .expect("date")
            .and_hms_opt(h, min, 0)
            .expect("time")
    }

    #[test]
    fn todo_renders_kind_and_status() {
        let mut task = Task::todo("Buy milk");
        assert_eq!(task.to_string(), "[T][ ] Buy milk");
        task.mark();
        assert_eq!(task.to_string(), "[T][X] Buy milk");
    }

    #[test]
    fn deadline_renders_lowercased_human_time() {
        let task = Task::deadline("Submit report", dt(2019, 12, 2, 18, 0));
        assert_eq!(
            task.to_string(),
            "[D][ ] Submit report (by: monday, dec 02 2019, 6:00pm)"
        );
    }

    #[test]
    fn event_renders_both_ends() {
        let task = Task::event("Conference", dt(2019, 12, 2, 9, 0), dt(2019, 12, 2, 17, 0))
            .expect("event");
        assert_eq!(
            task.to_string(),
            "[E][ ] Conference (from: monday, dec 02 2019, 9:00am to: monday, dec 02 2019, 5:00pm)"
        );
    }

    #[test]
    fn event_rejects_start_not_before_end() {
        let err = Task::event("Bad", dt(2019, 12, 2, 17, 0), dt(2019, 12, 2, 9, 0));
        assert!(matches!(err, Err(PlannerError::Validation(_))));
        let err = Task::event("Bad", dt(2019, 12, 2, 9, 0), dt(2019, 12, 2, 9, 0));
        assert!(matches!(err, Err(PlannerError::Validation(_))));
    }

    #[test]
    fn equality_ignores_done_flag() {
        let mut done = Task::todo("Buy milk");
        done.mark();
        assert_eq!(done, Task::todo("Buy milk"));
    }

    #[test]
    fn equality_includes_time_fields() {
        let first = Task::deadline("Report", dt(2025, 2, 10, 23, 59));
        let second = Task::deadline("Report", dt(2025, 2, 11, 23, 59));
        assert_ne!(first, second);
        assert_ne!(first, Task::todo("Report"));
    }

    #[test]
    fn includes_date_is_inclusive_on_both_ends() {
        let task = Task::event("Camp", dt(2025, 2, 10, 9, 0), dt(2025, 2, 12, 17, 0))
            .expect("event");
        let feb = |d| NaiveDate::from_ymd_opt(2025, 2, d).expect("date");
        assert!(task.includes_date(feb(10)));
        assert!(task.includes_date(feb(11)));
        assert!(task.includes_date(feb(12)));
        assert!(!task.includes_date(feb(9)));
        assert!(!task.includes_date(feb(13)));
    }

    #[test]
    fn due_time_only_for_deadlines() {
        let task = Task::deadline("Report", dt(2025, 2, 10, 23, 59));
        assert_eq!(task.due_time().as_deref(), Some("11:59pm"));
        assert_eq!(Task::todo("Report").due_time(), None);
    }
}
