//! File-backed persistence for the task store: one task per line,
//! `<status> | <kind>: <description> | <time-field>`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::error::PlannerError;
use crate::store::TaskStore;
use crate::task::{Task, TaskKind};

/// Machine date-time pattern (`d/M/yyyy HHmm`, 24-hour). Parsing tolerates
/// unpadded day/month; writing never pads them.
pub const STORE_PARSE_FORMAT: &str = "%d/%m/%Y %H%M";
pub const STORE_WRITE_FORMAT: &str = "%-d/%-m/%Y %H%M";

pub struct Storage {
    file_path: PathBuf,
}

impl Storage {
    pub fn new(file_path: impl Into<PathBuf>) -> Storage {
        Storage {
            file_path: file_path.into(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn backup_path(&self) -> PathBuf {
        let mut name = self.file_path.as_os_str().to_os_string();
        name.push(".bak");
        PathBuf::from(name)
    }

    /// First run is not an error: create the containing directory and an
    /// empty storage file if either is missing.
    fn ensure_exists(&self) -> io::Result<()> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        if !self.file_path.exists() {
            fs::write(&self.file_path, "")?;
        }
        Ok(())
    }

    /// Reads the whole store back from disk. A line that fails to decode is
    /// skipped and reported as a warning; only I/O failure is fatal.
    pub fn load(&self) -> Result<(TaskStore, Vec<String>), PlannerError> {
        self.ensure_exists().map_err(|err| {
            PlannerError::Storage(format!("An error occurred while loading tasks: {err}"))
        })?;
        let text = fs::read_to_string(&self.file_path).map_err(|err| {
            PlannerError::Storage(format!("An error occurred while loading tasks: {err}"))
        })?;

        let mut store = TaskStore::new();
        let mut warnings = Vec::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match decode_line(line) {
                Ok(task) => store.add(task),
                Err(reason) => {
                    warnings.push(format!("Skipping corrupted entry ({reason}): {line}"));
                }
            }
        }
        Ok((store, warnings))
    }

    /// Serializes the full store. The previous file is renamed to a `.bak`
    /// sibling first and restored if the write fails, so the primary path
    /// always holds a complete file.
    pub fn save(&self, store: &TaskStore) -> Result<(), PlannerError> {
        self.save_with(store, |path, contents| fs::write(path, contents))
    }

    fn save_with<F>(&self, store: &TaskStore, write_fn: F) -> Result<(), PlannerError>
    where
        F: FnOnce(&Path, &str) -> io::Result<()>,
    {
        self.ensure_exists().map_err(|err| {
            PlannerError::Storage(format!("An error occurred while updating the task list: {err}"))
        })?;
        let backup = self.backup_path();
        if self.file_path.exists() {
            fs::rename(&self.file_path, &backup).map_err(|err| {
                PlannerError::Storage(format!(
                    "An error occurred while updating the task list: {err}"
                ))
            })?;
        }

        match write_fn(&self.file_path, &encode_store(store)) {
            Ok(()) => {
                if backup.exists() {
                    let _ = fs::remove_file(&backup);
                }
                Ok(())
            }
            Err(err) => {
                if backup.exists() {
                    let _ = fs::remove_file(&self.file_path);
                    let _ = fs::rename(&backup, &self.file_path);
                }
                Err(PlannerError::Storage(format!(
                    "An error occurred while updating the task list: {err}"
                )))
            }
        }
    }
}

pub fn encode_store(store: &TaskStore) -> String {
    let mut out = String::new();
    for task in store.iter() {
        out.push_str(&encode_task(task));
        out.push('\n');
    }
    out
}

pub fn encode_task(task: &Task) -> String {
    let time_field = match task.kind() {
        TaskKind::ToDo => "--".to_string(),
        TaskKind::Deadline { due_at } => {
            format!("by: {}", due_at.format(STORE_WRITE_FORMAT))
        }
        TaskKind::Event { start_at, end_at } => format!(
            "from: {}, to: {}",
            start_at.format(STORE_WRITE_FORMAT),
            end_at.format(STORE_WRITE_FORMAT)
        ),
    };
    format!(
        "{} | {}: {} | {}",
        task.status_char(),
        task.kind().tag(),
        task.description(),
        time_field
    )
}

fn decode_line(line: &str) -> Result<Task, String> {
    let fields: Vec<&str> = line.split(" | ").collect();
    if fields.len() < 3 {
        return Err("expected 3 pipe-delimited fields".to_string());
    }

    let done = fields[0].trim() == "X";
    let (kind, description) = fields[1]
        .split_once(':')
        .ok_or_else(|| "missing kind separator".to_string())?;
    let description = description.trim();
    let time_field = fields[2].trim();

    let mut task = match kind.trim() {
        "T" => Task::todo(description),
        "D" => {
            let raw = time_field
                .strip_prefix("by: ")
                .ok_or_else(|| "invalid time format for deadline".to_string())?;
            let due_at = parse_store_datetime(raw)?;
            Task::deadline(description, due_at)
        }
        "E" => {
            let raw = time_field
                .strip_prefix("from: ")
                .ok_or_else(|| "invalid time format for event".to_string())?;
            let (start_raw, end_raw) = raw
                .split_once(", to: ")
                .ok_or_else(|| "invalid time format for event".to_string())?;
            let start_at = parse_store_datetime(start_raw)?;
            let end_at = parse_store_datetime(end_raw)?;
            Task::event(description, start_at, end_at).map_err(|err| err.message().to_string())?
        }
        other => return Err(format!("unknown task kind '{other}'")),
    };
    if done {
        task.mark();
    }
    Ok(task)
}

fn parse_store_datetime(raw: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(raw.trim(), STORE_PARSE_FORMAT)
        .map_err(|_| format!("unparseable date-time '{}'", raw.trim()))
}
