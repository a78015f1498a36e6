//! Turns a raw input line into a validated command, with descriptive errors
//! for every malformed shape. Range checks against the store happen later,
//! in the dispatcher.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::PlannerError;
use crate::storage::STORE_PARSE_FORMAT;

const AGENDA_DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Mark(i64),
    Unmark(i64),
    Delete(i64),
    AddTodo(String),
    AddDeadline {
        description: String,
        due_at: NaiveDateTime,
    },
    AddEvent {
        description: String,
        start_at: NaiveDateTime,
        end_at: NaiveDateTime,
    },
    Find(Vec<String>),
    Agenda(NaiveDate),
    Help,
    Bye,
}

pub fn parse(line: &str) -> Result<Command, PlannerError> {
    let trimmed = line.trim();
    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (trimmed, ""),
    };

    match word.to_lowercase().as_str() {
        "list" => no_arguments("list", rest).map(|_| Command::List),
        "bye" => no_arguments("bye", rest).map(|_| Command::Bye),
        "help" => no_arguments("help", rest).map(|_| Command::Help),
        "mark" => index_argument("mark", rest).map(Command::Mark),
        "unmark" => index_argument("unmark", rest).map(Command::Unmark),
        "delete" => index_argument("delete", rest).map(Command::Delete),
        "todo" => parse_todo(rest),
        "deadline" => parse_deadline(rest),
        "event" => parse_event(rest),
        "find" => parse_find(rest),
        "agenda" => parse_agenda(rest),
        _ => Err(PlannerError::Parse(
            "Unfortunately, I don't know what that means. Please try again.".to_string(),
        )),
    }
}

fn no_arguments(name: &str, rest: &str) -> Result<(), PlannerError> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(PlannerError::Parse(format!(
            "The '{name}' command does not take any arguments."
        )))
    }
}

fn index_argument(name: &str, rest: &str) -> Result<i64, PlannerError> {
    let tokens: Vec<&str> = rest.split_whitespace().collect();
    if tokens.len() != 1 {
        return Err(PlannerError::Parse(format!(
            "The '{name}' command requires exactly one task number."
        )));
    }
    tokens[0].parse::<i64>().map_err(|_| {
        let hint = match name {
            "delete" => {
                "You need to pick a single index number to delete from the list. \
You can try again."
                    .to_string()
            }
            _ => format!("You need to pick an index number to {name} in the list. You can try again."),
        };
        PlannerError::Parse(hint)
    })
}

fn parse_todo(rest: &str) -> Result<Command, PlannerError> {
    if rest.is_empty() {
        return Err(PlannerError::Parse(
            "The 'todo' command requires a task description.".to_string(),
        ));
    }
    Ok(Command::AddTodo(rest.to_string()))
}

fn parse_deadline(rest: &str) -> Result<Command, PlannerError> {
    let (description, due_raw) = rest.split_once("/by").ok_or_else(|| {
        PlannerError::Parse(
            "The 'deadline' command requires a task description and a due date. \
Format: deadline <task> /by <d/M/yyyy HHmm>"
                .to_string(),
        )
    })?;
    let description = non_empty(description, "You forgot to mention what the task is.")?;
    let due_raw = non_empty(due_raw, "You forgot to mention when the deadline is.")?;
    let due_at = parse_datetime(due_raw)?;
    Ok(Command::AddDeadline {
        description: description.to_string(),
        due_at,
    })
}

fn parse_event(rest: &str) -> Result<Command, PlannerError> {
    let shape_error = || {
        PlannerError::Parse(
            "The 'event' command requires a task description, start date, and end date. \
Format: event <task> /from <d/M/yyyy HHmm> /to <d/M/yyyy HHmm>"
                .to_string(),
        )
    };
    let (description, after_from) = rest.split_once("/from").ok_or_else(shape_error)?;
    let (start_raw, end_raw) = after_from.split_once("/to").ok_or_else(shape_error)?;

    let description = non_empty(description, "You forgot to mention what the event is.")?;
    let start_raw = non_empty(start_raw, "You forgot to mention when the event starts.")?;
    let end_raw = non_empty(end_raw, "You forgot to mention when the event ends.")?;
    let start_at = parse_datetime(start_raw)?;
    let end_at = parse_datetime(end_raw)?;
    Ok(Command::AddEvent {
        description: description.to_string(),
        start_at,
        end_at,
    })
}

fn parse_find(rest: &str) -> Result<Command, PlannerError> {
    let keywords: Vec<String> = rest.split_whitespace().map(str::to_string).collect();
    if keywords.is_empty() {
        return Err(PlannerError::Parse(
            "You forgot to tell me what keyword(s) to look for. Try again!".to_string(),
        ));
    }
    Ok(Command::Find(keywords))
}

fn parse_agenda(rest: &str) -> Result<Command, PlannerError> {
    let (marker, date_raw) = match rest.split_once(char::is_whitespace) {
        Some((marker, date_raw)) => (marker, date_raw.trim()),
        None => (rest, ""),
    };
    if marker != "for" {
        return Err(PlannerError::Parse(
            "I don't exactly understand what you are asking. Try this format:\n \
agenda for d/M/yyyy (e.g., agenda for 2/12/2023)"
                .to_string(),
        ));
    }
    if date_raw.is_empty() {
        return Err(PlannerError::Parse(
            "Missing date! Please provide a valid date in the format d/M/yyyy \
(e.g., 2/12/2023)."
                .to_string(),
        ));
    }
    let date = NaiveDate::parse_from_str(date_raw, AGENDA_DATE_FORMAT).map_err(|_| {
        PlannerError::Parse(
            "Invalid date! Please check the day, month, and format (d/M/yyyy, \
e.g., 2/12/2023)."
                .to_string(),
        )
    })?;
    Ok(Command::Agenda(date))
}

fn non_empty<'a>(raw: &'a str, message: &str) -> Result<&'a str, PlannerError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PlannerError::Parse(message.to_string()));
    }
    Ok(trimmed)
}

fn parse_datetime(raw: &str) -> Result<NaiveDateTime, PlannerError> {
    NaiveDateTime::parse_from_str(raw, STORE_PARSE_FORMAT).map_err(|_| {
        PlannerError::Parse(
            "Invalid date format! Try again and use: d/M/yyyy HHmm (e.g., 2/12/2019 1800)."
                .to_string(),
        )
    })
}
