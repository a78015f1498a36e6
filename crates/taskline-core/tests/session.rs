//! End-to-end command scenarios through `Planner::submit`.

use std::fs;

use tempfile::TempDir;

use taskline_core::planner::Planner;
use taskline_core::storage::Storage;
use taskline_core::task::TaskKind;

fn session(temp: &TempDir) -> Planner {
    let storage = Storage::new(temp.path().join("tasks.txt"));
    let (planner, warnings) = Planner::load(storage).expect("load");
    assert!(warnings.is_empty());
    planner
}

#[test]
fn todo_buy_milk_on_empty_store() {
    let temp = TempDir::new().expect("tempdir");
    let mut planner = session(&temp);

    let response = planner.submit("todo Buy milk");
    assert!(response.text.contains("Now we have 1 task in the list."));
    assert_eq!(planner.store().len(), 1);
    let task = planner.store().get(0).expect("task");
    assert_eq!(task.description(), "Buy milk");
    assert!(!task.is_done());
    assert!(matches!(task.kind(), TaskKind::ToDo));
}

#[test]
fn agenda_reports_one_deadline_and_one_event() {
    let temp = TempDir::new().expect("tempdir");
    let mut planner = session(&temp);
    planner.submit("deadline Submit report /by 10/2/2025 2359");
    planner.submit("event Workshop /from 10/2/2025 0900 /to 10/2/2025 1700");

    let response = planner.submit("agenda for 10/2/2025");
    assert!(response.text.contains("You have 1 deadline on this day."));
    assert!(response.text.contains("You have 1 event on this day."));
    assert!(response.text.contains("Submit report due at: 11:59pm"));
    assert!(response
        .text
        .contains("Workshop from: Monday, Feb 10 2025, to: Monday, Feb 10 2025"));
}

#[test]
fn agenda_includes_events_spanning_the_date() {
    let temp = TempDir::new().expect("tempdir");
    let mut planner = session(&temp);
    planner.submit("event Camp /from 9/2/2025 0800 /to 12/2/2025 1700");
    planner.submit("deadline Report /by 11/2/2025 1200");

    let mid_span = planner.submit("agenda for 10/2/2025");
    assert!(mid_span.text.contains("You have no deadlines on this day."));
    assert!(mid_span.text.contains("You have 1 event on this day."));

    let outside = planner.submit("agenda for 13/2/2025");
    assert!(outside.text.contains("You have no deadlines on this day."));
    assert!(outside.text.contains("You have no events on this day."));
}

#[test]
fn delete_only_task_leaves_empty_store() {
    let temp = TempDir::new().expect("tempdir");
    let mut planner = session(&temp);
    planner.submit("todo Buy milk");

    let response = planner.submit("delete 1");
    assert!(response.text.contains("Now you have no tasks to worry about."));
    assert!(planner.store().is_empty());
}

#[test]
fn mark_out_of_range_leaves_store_unchanged() {
    let temp = TempDir::new().expect("tempdir");
    let mut planner = session(&temp);
    planner.submit("todo one");
    planner.submit("todo two");

    let response = planner.submit("mark 5");
    assert_eq!(
        response.text,
        "You need to mark something actually in the list, silly"
    );
    assert_eq!(planner.store().len(), 2);
    assert!(planner.store().iter().all(|task| !task.is_done()));
}

#[test]
fn zero_index_is_out_of_range() {
    let temp = TempDir::new().expect("tempdir");
    let mut planner = session(&temp);
    planner.submit("todo one");
    let response = planner.submit("mark 0");
    assert!(response.text.contains("actually in the list"));
    assert!(!planner.store().get(0).expect("task").is_done());
}

#[test]
fn duplicate_rejection_for_every_kind() {
    let temp = TempDir::new().expect("tempdir");
    let mut planner = session(&temp);
    planner.submit("todo Buy milk");
    planner.submit("deadline Report /by 10/2/2025 2359");
    planner.submit("event Camp /from 10/2/2025 0900 /to 12/2/2025 1700");
    assert_eq!(planner.store().len(), 3);

    assert_eq!(
        planner.submit("todo Buy milk").text,
        "This task already exists in your list!"
    );
    assert_eq!(
        planner.submit("deadline Report /by 10/2/2025 2359").text,
        "This deadline already exists in your list!"
    );
    assert_eq!(
        planner
            .submit("event Camp /from 10/2/2025 0900 /to 12/2/2025 1700")
            .text,
        "This event already exists in your list!"
    );
    assert_eq!(planner.store().len(), 3);
}

#[test]
fn re_marking_changes_neither_store_nor_file() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("tasks.txt");
    let mut planner = session(&temp);
    planner.submit("todo Buy milk");
    planner.submit("mark 1");

    let before = fs::read_to_string(&path).expect("read");
    let response = planner.submit("mark 1");
    assert_eq!(response.text, "The task is already marked.");
    let after = fs::read_to_string(&path).expect("read");
    assert_eq!(before, after);
    assert!(planner.store().get(0).expect("task").is_done());
}

#[test]
fn mutations_survive_a_reload() {
    let temp = TempDir::new().expect("tempdir");
    {
        let mut planner = session(&temp);
        planner.submit("todo Buy milk");
        planner.submit("deadline Report /by 10/2/2025 2359");
        planner.submit("mark 2");
    }

    let storage = Storage::new(temp.path().join("tasks.txt"));
    let (planner, warnings) = Planner::load(storage).expect("reload");
    assert!(warnings.is_empty());
    assert_eq!(planner.store().len(), 2);
    assert!(!planner.store().get(0).expect("task").is_done());
    assert!(planner.store().get(1).expect("task").is_done());
}

#[test]
fn list_numbers_tasks_from_one() {
    let temp = TempDir::new().expect("tempdir");
    let mut planner = session(&temp);
    planner.submit("todo Buy milk");
    planner.submit("todo Walk dog");

    let response = planner.submit("list");
    assert_eq!(
        response.text,
        "Here is our to-do list:\n1. [T][ ] Buy milk\n2. [T][ ] Walk dog"
    );
}

#[test]
fn parse_errors_do_not_mutate_the_store() {
    let temp = TempDir::new().expect("tempdir");
    let mut planner = session(&temp);
    planner.submit("todo Buy milk");

    planner.submit("deadline Report tomorrow");
    planner.submit("event Camp /from soon");
    planner.submit("todo");
    planner.submit("mark two");
    assert_eq!(planner.store().len(), 1);
}
