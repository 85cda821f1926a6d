//! Create/edit overlay state.
//!
//! The overlay is either closed or open on a draft. An open draft with an
//! empty `id` is a new task; anything else is an edit of an existing one.

use crate::error::BoardError;
use crate::store::BoardStore;
use crate::task::{parse_date, Priority, Task};
use chrono::{Local, NaiveDate};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Create,
    Edit,
}

#[derive(Debug, Clone, PartialEq)]
enum Overlay {
    Closed,
    Open {
        draft: Task,
        list_id: Option<String>,
    },
}

/// Raw values as typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub description: String,
    pub date: String,
    pub priority: String,
}

impl FormValues {
    pub fn from_task(task: &Task) -> Self {
        Self {
            description: task.description.clone(),
            date: task.date.format("%Y-%m-%d").to_string(),
            priority: task.priority.to_string(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("description is required")]
    EmptyDescription,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// An edit was submitted for a task that carried no list id.
    #[error("the edited task has no list")]
    MissingListId,
    #[error("{0}")]
    Board(BoardError),
}

/// Outcome of [`TaskEditController::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Created { id: String, list_id: String },
    Updated { id: String, list_id: String },
    /// The form was valid but nothing was written. The overlay is closed.
    Dropped(DropReason),
    /// The overlay stays open so the form can be corrected.
    Invalid(FormError),
    NotOpen,
}

impl Submission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Submission::Created { .. } | Submission::Updated { .. })
    }
}

pub struct TaskEditController {
    overlay: Overlay,
    default_list_id: String,
    today: Box<dyn Fn() -> NaiveDate>,
}

impl std::fmt::Debug for TaskEditController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskEditController")
            .field("overlay", &self.overlay)
            .field("default_list_id", &self.default_list_id)
            .finish()
    }
}

impl TaskEditController {
    /// New tasks are appended to `default_list_id`.
    pub fn new(default_list_id: impl Into<String>) -> Self {
        Self::with_clock(default_list_id, || Local::now().date_naive())
    }

    pub fn with_clock(
        default_list_id: impl Into<String>,
        today: impl Fn() -> NaiveDate + 'static,
    ) -> Self {
        Self {
            overlay: Overlay::Closed,
            default_list_id: default_list_id.into(),
            today: Box::new(today),
        }
    }

    pub fn is_overlay_open(&self) -> bool {
        matches!(self.overlay, Overlay::Open { .. })
    }

    pub fn draft(&self) -> Option<&Task> {
        match &self.overlay {
            Overlay::Open { draft, .. } => Some(draft),
            Overlay::Closed => None,
        }
    }

    pub fn current_list_id(&self) -> Option<&str> {
        match &self.overlay {
            Overlay::Open { list_id, .. } => list_id.as_deref(),
            Overlay::Closed => None,
        }
    }

    pub fn mode(&self) -> Option<EditMode> {
        self.draft().map(|draft| {
            if draft.is_draft() {
                EditMode::Create
            } else {
                EditMode::Edit
            }
        })
    }

    /// Heading for the form.
    pub fn title(&self) -> &'static str {
        match self.mode() {
            Some(EditMode::Edit) => "Editar",
            _ => "Crear",
        }
    }

    pub fn open_for_create(&mut self) {
        self.overlay = Overlay::Open {
            draft: Task::draft((self.today)()),
            list_id: None,
        };
    }

    /// Opens on a copy of `task`. A task with an empty id opens a fresh
    /// create form instead.
    pub fn open_for_edit(&mut self, task: &Task) {
        if task.id.is_empty() {
            self.open_for_create();
            return;
        }
        let draft = Task::new(task.id.clone(), task.description.clone(), task.date, task.priority);
        self.overlay = Overlay::Open {
            draft,
            list_id: task.list_id.clone(),
        };
    }

    pub fn open(&mut self, task: Option<&Task>) {
        match task {
            Some(task) => self.open_for_edit(task),
            None => self.open_for_create(),
        }
    }

    pub fn close(&mut self) {
        self.overlay = Overlay::Closed;
    }

    /// Merges `values` into the draft and writes it to `store`.
    ///
    /// An unknown priority or unreadable date keeps the draft's value.
    pub fn submit(&mut self, store: &mut BoardStore, values: FormValues) -> Submission {
        let Overlay::Open { draft, list_id } = &self.overlay else {
            return Submission::NotOpen;
        };

        let description = values.description.trim();
        if description.is_empty() {
            return Submission::Invalid(FormError::EmptyDescription);
        }

        let mut task = draft.clone();
        task.description = description.to_string();
        task.priority = values.priority.parse().unwrap_or_else(|_| {
            debug!(priority = %values.priority, fallback = %draft.priority, "unrecognized priority");
            draft.priority
        });
        task.date = parse_date(&values.date).unwrap_or(draft.date);

        let outcome = if task.is_draft() {
            let target = self.default_list_id.clone();
            match store.add_task(&target, task) {
                Ok(id) => Submission::Created {
                    id,
                    list_id: target,
                },
                Err(err) => Submission::Dropped(DropReason::Board(err)),
            }
        } else {
            match list_id.clone() {
                Some(target) => match store.update_task(&task, &target) {
                    Ok(()) => Submission::Updated {
                        id: task.id,
                        list_id: target,
                    },
                    Err(err) => Submission::Dropped(DropReason::Board(err)),
                },
                None => Submission::Dropped(DropReason::MissingListId),
            }
        };

        if let Submission::Dropped(reason) = &outcome {
            warn!(%reason, "submission dropped");
        }
        self.close();
        outcome
    }
}
