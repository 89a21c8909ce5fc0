use tracing::{info, warn};

use crate::error::Result;
use crate::store::TaskRepository;
use crate::task::{validate_text, Task, TaskId, TaskStatus};

/// A user action that mutates the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add(String),
    Complete(TaskId),
    /// Delete one task; `from` is the bucket the task was displayed in.
    Delete { id: TaskId, from: TaskStatus },
    Clear(TaskStatus),
}

impl Action {
    /// Buckets whose contents can change when this action succeeds.
    pub fn refreshed_buckets(&self) -> &'static [TaskStatus] {
        match self {
            Action::Add(_) => &[TaskStatus::Ongoing],
            Action::Complete(_) => &[TaskStatus::Ongoing, TaskStatus::Done],
            Action::Delete { from, .. } | Action::Clear(from) => match from {
                TaskStatus::Ongoing => &[TaskStatus::Ongoing],
                TaskStatus::Done => &[TaskStatus::Done],
            },
        }
    }
}

/// The lists currently on screen plus the cursor over them.
///
/// Owned by whoever drives the interaction; the store is passed in per call.
#[derive(Debug, Default)]
pub struct KanbanBoard {
    pub ongoing: Vec<Task>,
    pub done: Vec<Task>,
    pub selected_status: TaskStatus,
    pub selected_task: usize,
}

impl KanbanBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills both lists from the store.
    pub fn load<R: TaskRepository>(repo: &R) -> Result<Self> {
        let mut board = Self::new();
        board.refresh(repo, &TaskStatus::ALL)?;
        Ok(board)
    }

    /// Runs `action` against the store, then re-reads the affected buckets.
    ///
    /// On any error the cached lists are left exactly as they were.
    pub fn apply<R: TaskRepository>(&mut self, repo: &R, action: Action) -> Result<()> {
        match &action {
            Action::Add(text) => {
                let text = validate_text(text)?;
                let id = repo.add_task(text, TaskStatus::Ongoing)?;
                info!(id, "task added");
            }
            Action::Complete(id) => {
                if repo.complete_task(*id)? == 0 {
                    warn!(id, "complete: no such task");
                }
            }
            Action::Delete { id, .. } => {
                if repo.delete_task(*id)? == 0 {
                    warn!(id, "delete: no such task");
                }
            }
            Action::Clear(status) => {
                let removed = repo.delete_all_by_status(*status)?;
                info!(%status, removed, "bucket cleared");
            }
        }
        self.refresh(repo, action.refreshed_buckets())
    }

    /// Replaces each listed bucket wholesale. Nothing is swapped in unless every read succeeds.
    pub fn refresh<R: TaskRepository>(&mut self, repo: &R, buckets: &[TaskStatus]) -> Result<()> {
        let mut fetched = Vec::with_capacity(buckets.len());
        for &status in buckets {
            fetched.push((status, repo.get_tasks(status)?));
        }
        for (status, tasks) in fetched {
            *self.bucket_mut(status) = tasks;
        }
        self.clamp_selection();
        Ok(())
    }

    pub fn get_tasks_by_status(&self, status: TaskStatus) -> &[Task] {
        match status {
            TaskStatus::Ongoing => &self.ongoing,
            TaskStatus::Done => &self.done,
        }
    }

    fn bucket_mut(&mut self, status: TaskStatus) -> &mut Vec<Task> {
        match status {
            TaskStatus::Ongoing => &mut self.ongoing,
            TaskStatus::Done => &mut self.done,
        }
    }

    pub fn selected(&self) -> Option<&Task> {
        self.get_tasks_by_status(self.selected_status)
            .get(self.selected_task)
    }

    pub fn select_status(&mut self, status: TaskStatus) {
        if self.selected_status != status {
            self.selected_status = status;
            self.selected_task = 0;
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.get_tasks_by_status(self.selected_status).len();
        if len == 0 {
            self.selected_task = 0;
            return;
        }
        self.selected_task =
            (self.selected_task as isize + delta).clamp(0, len as isize - 1) as usize;
    }

    fn clamp_selection(&mut self) {
        let len = self.get_tasks_by_status(self.selected_status).len();
        self.selected_task = self.selected_task.min(len.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskersError;
    use crate::store::SqliteStore;
    use std::cell::RefCell;
    use tempfile::TempDir;

    fn setup() -> (TempDir, SqliteStore, KanbanBoard) {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::new(dir.path().join("tasks.db"));
        store.initialize().unwrap();
        let board = KanbanBoard::load(&store).unwrap();
        (dir, store, board)
    }

    fn pairs(tasks: &[Task]) -> Vec<(TaskId, &str)> {
        tasks.iter().map(|t| (t.id, t.text.as_str())).collect()
    }

    /// Wraps a store and records which buckets were read.
    struct Recording<'a> {
        inner: &'a SqliteStore,
        reads: RefCell<Vec<TaskStatus>>,
        fail_reads: bool,
    }

    impl<'a> Recording<'a> {
        fn new(inner: &'a SqliteStore) -> Self {
            Self {
                inner,
                reads: RefCell::new(Vec::new()),
                fail_reads: false,
            }
        }
    }

    impl TaskRepository for Recording<'_> {
        fn initialize(&self) -> Result<()> {
            self.inner.initialize()
        }
        fn add_task(&self, text: &str, status: TaskStatus) -> Result<TaskId> {
            self.inner.add_task(text, status)
        }
        fn get_tasks(&self, status: TaskStatus) -> Result<Vec<Task>> {
            self.reads.borrow_mut().push(status);
            if self.fail_reads {
                return Err(rusqlite::Error::InvalidQuery.into());
            }
            self.inner.get_tasks(status)
        }
        fn complete_task(&self, id: TaskId) -> Result<usize> {
            self.inner.complete_task(id)
        }
        fn delete_task(&self, id: TaskId) -> Result<usize> {
            self.inner.delete_task(id)
        }
        fn delete_all_by_status(&self, status: TaskStatus) -> Result<usize> {
            self.inner.delete_all_by_status(status)
        }
    }

    #[test]
    fn test_buy_milk_scenario() {
        let (_dir, store, mut board) = setup();

        board.apply(&store, Action::Add("Buy milk".into())).unwrap();
        assert_eq!(pairs(&board.ongoing), vec![(1, "Buy milk")]);

        board.apply(&store, Action::Complete(1)).unwrap();
        assert!(board.ongoing.is_empty());
        assert_eq!(pairs(&board.done), vec![(1, "Buy milk")]);

        board
            .apply(&store, Action::Delete { id: 1, from: TaskStatus::Done })
            .unwrap();
        assert!(board.done.is_empty());
    }

    #[test]
    fn test_blank_text_never_reaches_store() {
        let (_dir, store, mut board) = setup();
        for text in ["", "   ", "\t\n"] {
            let err = board.apply(&store, Action::Add(text.into())).unwrap_err();
            assert!(matches!(err, TaskersError::Validation(_)));
        }
        assert!(store.get_tasks(TaskStatus::Ongoing).unwrap().is_empty());
        assert!(board.ongoing.is_empty());
    }

    #[test]
    fn test_refresh_policy_per_action() {
        let (_dir, store, mut board) = setup();
        store.add_task("a", TaskStatus::Ongoing).unwrap();
        store.add_task("b", TaskStatus::Ongoing).unwrap();

        let cases = [
            (Action::Add("c".into()), vec![TaskStatus::Ongoing]),
            (Action::Complete(1), vec![TaskStatus::Ongoing, TaskStatus::Done]),
            (
                Action::Delete { id: 2, from: TaskStatus::Ongoing },
                vec![TaskStatus::Ongoing],
            ),
            (
                Action::Delete { id: 1, from: TaskStatus::Done },
                vec![TaskStatus::Done],
            ),
            (Action::Clear(TaskStatus::Ongoing), vec![TaskStatus::Ongoing]),
            (Action::Clear(TaskStatus::Done), vec![TaskStatus::Done]),
        ];

        for (action, expected) in cases {
            let repo = Recording::new(&store);
            board.apply(&repo, action.clone()).unwrap();
            assert_eq!(*repo.reads.borrow(), expected, "{action:?}");
        }
    }

    #[test]
    fn test_buckets_stay_disjoint() {
        let (_dir, store, mut board) = setup();
        for text in ["one", "two", "three"] {
            board.apply(&store, Action::Add(text.into())).unwrap();
        }
        board.apply(&store, Action::Complete(2)).unwrap();

        let ongoing: Vec<_> = board.ongoing.iter().map(|t| t.id).collect();
        let done: Vec<_> = board.done.iter().map(|t| t.id).collect();
        assert_eq!(ongoing, vec![1, 3]);
        assert_eq!(done, vec![2]);
    }

    #[test]
    fn test_clear_leaves_other_bucket_cached() {
        let (_dir, store, mut board) = setup();
        board.apply(&store, Action::Add("keep".into())).unwrap();
        board.apply(&store, Action::Add("drop".into())).unwrap();
        board.apply(&store, Action::Complete(1)).unwrap();

        board.apply(&store, Action::Clear(TaskStatus::Ongoing)).unwrap();
        assert!(board.ongoing.is_empty());
        assert_eq!(pairs(&board.done), vec![(1, "keep")]);
    }

    #[test]
    fn test_failed_refresh_keeps_cached_lists() {
        let (_dir, store, mut board) = setup();
        board.apply(&store, Action::Add("cached".into())).unwrap();

        let mut repo = Recording::new(&store);
        repo.fail_reads = true;
        assert!(board.apply(&repo, Action::Complete(1)).is_err());
        assert_eq!(pairs(&board.ongoing), vec![(1, "cached")]);
        assert!(board.done.is_empty());
    }

    #[test]
    fn test_missing_id_is_noop() {
        let (_dir, store, mut board) = setup();
        board.apply(&store, Action::Add("x".into())).unwrap();
        board.apply(&store, Action::Complete(99)).unwrap();
        board
            .apply(&store, Action::Delete { id: 99, from: TaskStatus::Ongoing })
            .unwrap();
        assert_eq!(pairs(&board.ongoing), vec![(1, "x")]);
    }

    #[test]
    fn test_selection_clamped_after_refresh() {
        let (_dir, store, mut board) = setup();
        for text in ["a", "b", "c"] {
            board.apply(&store, Action::Add(text.into())).unwrap();
        }
        board.move_selection(5);
        assert_eq!(board.selected_task, 2);
        assert_eq!(board.selected().map(|t| t.id), Some(3));

        board
            .apply(&store, Action::Delete { id: 3, from: TaskStatus::Ongoing })
            .unwrap();
        assert_eq!(board.selected_task, 1);

        board.apply(&store, Action::Clear(TaskStatus::Ongoing)).unwrap();
        assert_eq!(board.selected_task, 0);
        assert!(board.selected().is_none());
    }

    #[test]
    fn test_select_status_resets_cursor() {
        let mut board = KanbanBoard::new();
        board.selected_task = 4;
        board.select_status(TaskStatus::Done);
        assert_eq!(board.selected_status, TaskStatus::Done);
        assert_eq!(board.selected_task, 0);
    }
}
