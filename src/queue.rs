/// Delimiter between tasks in the queue's text form. Import splits on
/// exactly this string, so export/import round-trips.
pub const TASK_DELIMITER: &str = "\n\n";

/// Ordered queue of finished prompt strings awaiting export.
///
/// Tasks are appended in order and never deduplicated or mutated; the
/// only removals are an explicit [`TaskQueue::clear`] or replacing the
/// whole queue from edited text via [`TaskQueue::import_text`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TaskQueue {
    tasks: Vec<String>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue<I, S>(&mut self, tasks: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.tasks.len();
        self.tasks.extend(tasks.into_iter().map(Into::into));
        tracing::debug!(added = self.tasks.len() - before, total = self.tasks.len(), "Enqueued tasks");
    }

    pub fn tasks(&self) -> &[String] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn clear(&mut self) {
        tracing::debug!(dropped = self.tasks.len(), "Clearing task queue");
        self.tasks.clear();
    }

    /// Join all tasks with the fixed delimiter for round-trip editing in
    /// a text box.
    pub fn export_text(&self) -> String {
        self.tasks.join(TASK_DELIMITER)
    }

    /// Rebuild a queue from edited text: split on the exact delimiter,
    /// trim each segment, drop the empty ones.
    pub fn import_text(text: &str) -> Self {
        let tasks = text
            .split(TASK_DELIMITER)
            .map(str::trim)
            .filter(|seg| !seg.is_empty())
            .map(str::to_string)
            .collect();
        Self { tasks }
    }
}
