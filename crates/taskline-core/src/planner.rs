//! Command dispatcher: executes one validated command against the task
//! store, persists every mutation, and produces the user-facing response.

use chrono::NaiveDate;

use crate::error::PlannerError;
use crate::parser::{self, Command};
use crate::storage::Storage;
use crate::store::TaskStore;
use crate::task::{Task, TaskKind};

const AGENDA_HEADER_FORMAT: &str = "%A, %b %d %Y";

/// Response returned to the presentation shell. `exit` is set only by the
/// `bye` command and tells the caller to stop reading input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub text: String,
    pub exit: bool,
}

pub struct Planner {
    store: TaskStore,
    storage: Storage,
}

impl Planner {
    /// Builds a planner by loading the stored task list. I/O failure here is
    /// fatal to the session; corrupt lines come back as warnings instead.
    pub fn load(storage: Storage) -> Result<(Planner, Vec<String>), PlannerError> {
        let (store, warnings) = storage.load()?;
        Ok((Planner { store, storage }, warnings))
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// The single entry point for presentation shells: parse, execute,
    /// persist, and fold any domain error into the response text.
    pub fn submit(&mut self, raw: &str) -> Response {
        match parser::parse(raw) {
            Ok(command) => {
                let exit = matches!(command, Command::Bye);
                match self.execute(command) {
                    Ok(text) => Response { text, exit },
                    Err(err) => Response {
                        text: err.message().to_string(),
                        exit: false,
                    },
                }
            }
            Err(err) => Response {
                text: err.message().to_string(),
                exit: false,
            },
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<String, PlannerError> {
        match command {
            Command::List => Ok(self.render_list()),
            Command::Mark(index) => self.mark(index),
            Command::Unmark(index) => self.unmark(index),
            Command::Delete(index) => self.delete(index),
            Command::AddTodo(description) => self.add(Task::todo(description)),
            Command::AddDeadline {
                description,
                due_at,
            } => self.add(Task::deadline(description, due_at)),
            Command::AddEvent {
                description,
                start_at,
                end_at,
            } => {
                let task = Task::event(description, start_at, end_at)?;
                self.add(task)
            }
            Command::Find(keywords) => Ok(self.find(&keywords)),
            Command::Agenda(date) => Ok(self.agenda(date)),
            Command::Help => Ok(help_text()),
            Command::Bye => Ok("Goodbye! See you soon!".to_string()),
        }
    }

    fn add(&mut self, task: Task) -> Result<String, PlannerError> {
        if self.store.contains_equal(&task) {
            let noun = match task.kind() {
                TaskKind::ToDo => "task",
                TaskKind::Deadline { .. } => "deadline",
                TaskKind::Event { .. } => "event",
            };
            return Err(PlannerError::Validation(format!(
                "This {noun} already exists in your list!"
            )));
        }
        let rendered = task.to_string();
        self.store.add(task);
        self.storage.save(&self.store)?;

        let count = self.store.len();
        let counter = if count == 1 {
            "Now we have 1 task in the list.".to_string()
        } else {
            format!("Now we have {count} tasks in the list.")
        };
        Ok(format!(
            "New task incoming! I've added it to our list :)\n {rendered}\n{counter}"
        ))
    }

    fn mark(&mut self, index: i64) -> Result<String, PlannerError> {
        let idx = self.resolve_index(
            index,
            "You need to mark something actually in the list, silly",
        )?;
        {
            let task = self.store.get_mut(idx).expect("index checked");
            if task.is_done() {
                return Ok("The task is already marked.".to_string());
            }
            task.mark();
        }
        self.storage.save(&self.store)?;
        let rendered = self.store.get(idx).expect("index checked");
        Ok(format!(
            "Good work! Let's keep going.\nI've marked this task as done:\n  {rendered}"
        ))
    }

    fn unmark(&mut self, index: i64) -> Result<String, PlannerError> {
        let idx = self.resolve_index(
            index,
            "You need to unmark something actually in the list, silly",
        )?;
        {
            let task = self.store.get_mut(idx).expect("index checked");
            if !task.is_done() {
                return Ok("The task is already unmarked.".to_string());
            }
            task.unmark();
        }
        self.storage.save(&self.store)?;
        let rendered = self.store.get(idx).expect("index checked");
        Ok(format!(
            "Oops, no problem.\nI've unmarked the task:\n  {rendered}"
        ))
    }

    fn delete(&mut self, index: i64) -> Result<String, PlannerError> {
        let idx = self.resolve_index(
            index,
            "You need to pick a task to delete that is actually in the list, silly.",
        )?;
        let removed = self.store.remove(idx);
        self.storage.save(&self.store)?;
        let tail = match self.store.len() {
            0 => "Now you have no tasks to worry about.".to_string(),
            1 => "Now you only have 1 task to worry about.".to_string(),
            remaining => format!("Now you have {remaining} tasks to worry about."),
        };
        Ok(format!("Phew! We got rid of {removed}\n{tail}"))
    }

    fn find(&self, keywords: &[String]) -> String {
        let lowered: Vec<String> = keywords.iter().map(|kw| kw.to_lowercase()).collect();
        // Store order keeps the listing stable; each task appears once no
        // matter how many keywords it matches.
        let matches: Vec<&Task> = self
            .store
            .iter()
            .filter(|task| {
                let haystack = task.description().to_lowercase();
                lowered.iter().any(|kw| haystack.contains(kw))
            })
            .collect();

        if matches.is_empty() {
            return format!(
                "I couldn't find any tasks related to the keywords: \"{}\".\nTry different ones!",
                keywords.join("\", \"")
            );
        }
        let mut out = format!(
            "Here are the tasks I found related to the keywords: {}:\n",
            keywords.join(", ")
        );
        for (position, task) in matches.iter().enumerate() {
            out.push_str(&format!("{}. {task}\n", position + 1));
        }
        out.trim_end().to_string()
    }

    fn agenda(&self, date: NaiveDate) -> String {
        if self.store.is_empty() {
            return "You have no tasks at the moment. Free all day!".to_string();
        }

        let mut out = format!(
            "Here's what's happening on {}:\n\nDEADLINES:\n",
            date.format(AGENDA_HEADER_FORMAT)
        );
        let mut deadline_count = 0usize;
        for task in self.store.iter() {
            if matches!(task.kind(), TaskKind::Deadline { .. }) && task.includes_date(date) {
                let due_time = task.due_time().expect("deadline has a due time");
                out.push_str(&format!("{} due at: {due_time}\n", task.description()));
                deadline_count += 1;
            }
        }
        out.push_str(&count_line(deadline_count, "deadline"));

        out.push_str("\nEVENTS:\n");
        let mut event_count = 0usize;
        for task in self.store.iter() {
            if matches!(task.kind(), TaskKind::Event { .. }) && task.includes_date(date) {
                let span = task.date_span().expect("event has a date span");
                out.push_str(&format!("{} {span}\n", task.description()));
                event_count += 1;
            }
        }
        out.push_str(&count_line(event_count, "event"));
        out.trim_end().to_string()
    }

    fn render_list(&self) -> String {
        if self.store.is_empty() {
            return "You have no tasks at the moment. Yay!".to_string();
        }
        let mut out = String::from("Here is our to-do list:\n");
        for (position, task) in self.store.iter().enumerate() {
            out.push_str(&format!("{}. {task}\n", position + 1));
        }
        out.trim_end().to_string()
    }

    fn resolve_index(&self, index: i64, out_of_range: &str) -> Result<usize, PlannerError> {
        if index < 1 || index as usize > self.store.len() {
            return Err(PlannerError::Validation(out_of_range.to_string()));
        }
        Ok(index as usize - 1)
    }
}

fn count_line(count: usize, noun: &str) -> String {
    match count {
        0 => format!("You have no {noun}s on this day.\n"),
        1 => format!("You have 1 {noun} on this day.\n"),
        many => format!("You have {many} {noun}s on this day.\n"),
    }
}

fn help_text() -> String {
    "Here are the commands you can use:\n\n\
1. list - view all tasks\n\
2. mark [task number] - mark a task as done\n\
3. unmark [task number] - mark a task as not done\n\
4. todo [task description] - add a ToDo task\n\
5. deadline [task description] /by [d/M/yyyy HHmm] - add a Deadline task\n\
6. event [task description] /from [d/M/yyyy HHmm] /to [d/M/yyyy HHmm] - add an Event task\n\
7. delete [task number] - delete a task\n\
8. agenda for [d/M/yyyy] - view tasks on a specific date\n\
9. find [keywords] - search tasks by keywords\n\
10. help - show this help message\n\
11. bye - exit"
        .to_string()
}
