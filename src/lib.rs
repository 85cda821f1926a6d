//! In-memory kanban board: a store of task lists with change notifications,
//! drag-and-drop reconciliation and a create/edit overlay controller.

pub mod config;
pub mod editor;
pub mod error;
pub mod ids;
pub mod list;
pub mod loader;
pub mod reconcile;
pub mod store;
pub mod task;
pub mod ui;

pub use editor::{EditMode, FormValues, Submission, TaskEditController};
pub use error::{BoardError, LoadError};
pub use list::List;
pub use reconcile::{DragDrop, DragDropReconciler, Moved};
pub use store::BoardStore;
pub use task::{Priority, Task};
