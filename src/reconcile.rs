//! Applies drag-and-drop gestures to the board.

use crate::error::BoardError;
use crate::list::List;
use crate::store::BoardStore;
use tracing::{debug, warn};

/// A finished drag: where the task was picked up and where it was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragDrop {
    pub source_list: String,
    pub dest_list: String,
    pub source_index: usize,
    pub dest_index: usize,
}

impl DragDrop {
    pub fn new(
        source_list: impl Into<String>,
        dest_list: impl Into<String>,
        source_index: usize,
        dest_index: usize,
    ) -> Self {
        Self {
            source_list: source_list.into(),
            dest_list: dest_list.into(),
            source_index,
            dest_index,
        }
    }

    pub fn within(list: impl Into<String>, source_index: usize, dest_index: usize) -> Self {
        let list = list.into();
        Self::new(list.clone(), list, source_index, dest_index)
    }

    pub fn is_reorder(&self) -> bool {
        self.source_list == self.dest_list
    }
}

/// Where the task ended up after a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Moved {
    pub task_id: String,
    pub list_id: String,
    pub index: usize,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DragDropReconciler;

impl DragDropReconciler {
    pub fn new() -> Self {
        Self
    }

    /// Reorders within one list or transfers across two, as a single store
    /// mutation. The destination index is clamped; the source index must
    /// point at an existing task.
    pub fn apply(&self, store: &mut BoardStore, drop: &DragDrop) -> Result<Moved, BoardError> {
        let result = store.mutate(|lists| {
            let source = index_of(lists, &drop.source_list)?;
            let dest = index_of(lists, &drop.dest_list)?;
            let len = lists[source].tasks.len();
            if drop.source_index >= len {
                return Err(BoardError::IndexOutOfRange {
                    list_id: drop.source_list.clone(),
                    index: drop.source_index,
                    len,
                });
            }

            let index = if source == dest {
                move_item_in_vec(&mut lists[source].tasks, drop.source_index, drop.dest_index)
            } else {
                let (from, to) = pair_mut(lists, source, dest);
                let index = transfer_item(&mut from.tasks, &mut to.tasks, drop.source_index, drop.dest_index);
                to.tasks[index].list_id = Some(to.id.clone());
                index
            };

            Ok(Moved {
                task_id: lists[dest].tasks[index].id.clone(),
                list_id: lists[dest].id.clone(),
                index,
            })
        });

        match &result {
            Ok(moved) => debug!(
                task_id = %moved.task_id,
                from = %drop.source_list,
                to = %moved.list_id,
                index = moved.index,
                reorder = drop.is_reorder(),
                "task moved"
            ),
            Err(err) => warn!(%err, "drop ignored"),
        }
        result
    }
}

/// Moves the item at `from` to `to`, shifting everything in between by one.
/// Returns the index the item landed on. `to` is clamped to the last slot.
pub fn move_item_in_vec<T>(items: &mut Vec<T>, from: usize, to: usize) -> usize {
    if from >= items.len() {
        return from;
    }
    let to = to.min(items.len() - 1);
    let item = items.remove(from);
    items.insert(to, item);
    to
}

/// Moves the item at `from` in `source` into `dest` at `to`. Returns the
/// index the item landed on. `to` is clamped to `dest.len()`.
pub fn transfer_item<T>(source: &mut Vec<T>, dest: &mut Vec<T>, from: usize, to: usize) -> usize {
    if from >= source.len() {
        return from;
    }
    let to = to.min(dest.len());
    let item = source.remove(from);
    dest.insert(to, item);
    to
}

fn index_of(lists: &[List], id: &str) -> Result<usize, BoardError> {
    lists
        .iter()
        .position(|l| l.id == id)
        .ok_or_else(|| BoardError::ListNotFound { id: id.to_string() })
}

fn pair_mut(lists: &mut [List], a: usize, b: usize) -> (&mut List, &mut List) {
    if a < b {
        let (left, right) = lists.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = lists.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}
