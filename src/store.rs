use crate::error::BoardError;
use crate::ids::{IdGenerator, UuidGenerator};
use crate::list::List;
use crate::task::Task;
use std::fmt;
use tracing::{debug, warn};

const MAX_ID_ATTEMPTS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&[List])>;

/// Single owner of the board's lists.
///
/// Every successful mutation notifies all subscribers exactly once, before
/// the mutating call returns. Lookup misses change nothing and notify no one.
pub struct BoardStore {
    lists: Vec<List>,
    ids: Box<dyn IdGenerator>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new(UuidGenerator)
    }
}

impl fmt::Debug for BoardStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardStore")
            .field("lists", &self.lists)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl BoardStore {
    pub fn new(ids: impl IdGenerator + 'static) -> Self {
        Self {
            lists: Vec::new(),
            ids: Box::new(ids),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn lists(&self) -> &[List] {
        &self.lists
    }

    pub fn list(&self, id: &str) -> Option<&List> {
        self.lists.iter().find(|l| l.id == id)
    }

    pub fn total_tasks(&self) -> usize {
        self.lists.iter().map(|l| l.tasks.len()).sum()
    }

    /// Registers `listener` and immediately hands it the current lists.
    pub fn subscribe(&mut self, mut listener: impl FnMut(&[List]) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        listener(&self.lists);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    /// Replaces the whole board. Tasks that arrive without an id get a
    /// fresh one, so only unsaved drafts ever carry the empty id.
    pub fn set_lists(&mut self, lists: Vec<List>) {
        self.lists = lists;
        let mut stamped = 0;
        for l in 0..self.lists.len() {
            let list_id = self.lists[l].id.clone();
            for t in 0..self.lists[l].tasks.len() {
                if self.lists[l].tasks[t].id.is_empty() {
                    let id = self.fresh_id();
                    self.lists[l].tasks[t].id = id;
                    stamped += 1;
                }
                self.lists[l].tasks[t].list_id = Some(list_id.clone());
            }
        }
        if stamped > 0 {
            warn!(stamped, "loaded tasks without an id were given new ids");
        }
        debug!(lists = self.lists.len(), "board replaced");
        self.emit();
    }

    /// Appends `task` to the list `list_id` under a freshly generated id,
    /// which is returned.
    pub fn add_task(&mut self, list_id: &str, mut task: Task) -> Result<String, BoardError> {
        let Some(index) = self.list_index(list_id) else {
            warn!(list_id, "add_task: list not found");
            return Err(BoardError::ListNotFound {
                id: list_id.to_string(),
            });
        };

        let id = self.fresh_id();
        task.id = id.clone();
        task.list_id = Some(list_id.to_string());
        self.lists[index].tasks.push(task);
        debug!(list_id, task_id = %id, "task added");
        self.emit();
        Ok(id)
    }

    /// Overwrites date, description and priority of the task with `task.id`
    /// in place. Position and id are untouched.
    pub fn update_task(&mut self, task: &Task, list_id: &str) -> Result<(), BoardError> {
        let Some(index) = self.list_index(list_id) else {
            warn!(list_id, task_id = %task.id, "update_task: list not found");
            return Err(BoardError::ListNotFound {
                id: list_id.to_string(),
            });
        };

        let Some(existing) = self.lists[index].tasks.iter_mut().find(|t| t.id == task.id) else {
            warn!(list_id, task_id = %task.id, "update_task: task not found");
            return Err(BoardError::TaskNotFound {
                list_id: list_id.to_string(),
                task_id: task.id.clone(),
            });
        };

        existing.date = task.date;
        existing.description = task.description.clone();
        existing.priority = task.priority;
        debug!(list_id, task_id = %task.id, "task updated");
        self.emit();
        Ok(())
    }

    /// Removes `task_id` from the stored list whose id matches `list.id`.
    pub fn remove_task(&mut self, task_id: &str, list: &List) -> Result<Task, BoardError> {
        let Some(index) = self.list_index(&list.id) else {
            warn!(list_id = %list.id, task_id, "remove_task: list not found");
            return Err(BoardError::ListNotFound {
                id: list.id.clone(),
            });
        };

        let Some(position) = self.lists[index].position_of(task_id) else {
            warn!(list_id = %list.id, task_id, "remove_task: task not found");
            return Err(BoardError::TaskNotFound {
                list_id: list.id.clone(),
                task_id: task_id.to_string(),
            });
        };

        let removed = self.lists[index].tasks.remove(position);
        debug!(list_id = %list.id, task_id, "task removed");
        self.emit();
        Ok(removed)
    }

    /// The task at `index` of `list_id`, tagged with its owning list so an
    /// edit can be written back.
    pub fn task_for_edit(&self, list_id: &str, index: usize) -> Option<Task> {
        let list = self.list(list_id)?;
        let mut task = list.tasks.get(index)?.clone();
        task.list_id = Some(list.id.clone());
        Some(task)
    }

    /// Runs `change` against the lists and notifies subscribers if it
    /// succeeds. `change` must not modify anything when it returns an error.
    pub(crate) fn mutate<T>(
        &mut self,
        change: impl FnOnce(&mut Vec<List>) -> Result<T, BoardError>,
    ) -> Result<T, BoardError> {
        let out = change(&mut self.lists)?;
        self.emit();
        Ok(out)
    }

    fn list_index(&self, id: &str) -> Option<usize> {
        self.lists.iter().position(|l| l.id == id)
    }

    /// Asks the configured generator a bounded number of times, then falls
    /// back to a random UUID.
    fn fresh_id(&self) -> String {
        let is_free = |id: &str| {
            !id.is_empty()
                && !self
                    .lists
                    .iter()
                    .any(|l| l.tasks.iter().any(|t| t.id == id))
        };
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.generate_id();
            if is_free(&id) {
                return id;
            }
        }
        warn!(attempts = MAX_ID_ATTEMPTS, "id generator kept colliding, using a uuid");
        loop {
            let id = UuidGenerator.generate_id();
            if is_free(&id) {
                return id;
            }
        }
    }

    fn emit(&mut self) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.lists);
        }
    }
}
