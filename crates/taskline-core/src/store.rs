use crate::task::Task;

/// Ordered, passive container for the session's tasks. Insertion order is
/// display order is on-disk order. Duplicate policy lives in the dispatcher.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> TaskStore {
        TaskStore::default()
    }

    pub fn from_tasks(tasks: Vec<Task>) -> TaskStore {
        TaskStore { tasks }
    }

    pub fn add(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Removes and returns the task at a zero-based index. The caller is
    /// responsible for range checking.
    pub fn remove(&mut self, index: usize) -> Task {
        self.tasks.remove(index)
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Task> {
        self.tasks.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn contains_equal(&self, candidate: &Task) -> bool {
        self.tasks.iter().any(|task| task == candidate)
    }
}
