use crate::editor::{FormValues, Submission, TaskEditController};
use crate::reconcile::{DragDrop, DragDropReconciler};
use crate::store::BoardStore;
use crate::task::{Priority, Task};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame, Terminal,
};
use std::{cell::Cell, io, rc::Rc};

const FIELDS: [&str; 3] = ["Descripción", "Fecha", "Prioridad"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Grab {
    list: usize,
    index: usize,
}

#[derive(Debug, Default)]
struct Form {
    values: [String; 3],
    focus: usize,
}

impl Form {
    fn load(&mut self, draft: &Task) {
        let values = FormValues::from_task(draft);
        self.values = [values.description, values.date, values.priority];
        self.focus = 0;
    }

    fn values(&self) -> FormValues {
        FormValues {
            description: self.values[0].clone(),
            date: self.values[1].clone(),
            priority: self.values[2].clone(),
        }
    }
}

/// Board screen state: selection, an in-flight drag, the overlay form and
/// the delete confirmation.
pub struct App {
    pub store: BoardStore,
    pub editor: TaskEditController,
    reconciler: DragDropReconciler,
    selected_list: usize,
    selected_task: usize,
    grabbed: Option<Grab>,
    confirm_remove: bool,
    form: Form,
    status: String,
    task_count: Rc<Cell<usize>>,
}

impl App {
    pub fn new(mut store: BoardStore, editor: TaskEditController) -> Self {
        let task_count = Rc::new(Cell::new(0));
        let sink = Rc::clone(&task_count);
        store.subscribe(move |lists| sink.set(lists.iter().map(|l| l.tasks.len()).sum()));
        Self {
            store,
            editor,
            reconciler: DragDropReconciler::new(),
            selected_list: 0,
            selected_task: 0,
            grabbed: None,
            confirm_remove: false,
            form: Form::default(),
            status: String::new(),
            task_count,
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    fn list_len(&self, list: usize) -> usize {
        self.store.lists().get(list).map_or(0, |l| l.tasks.len())
    }

    fn list_id(&self, list: usize) -> Option<String> {
        self.store.lists().get(list).map(|l| l.id.clone())
    }

    /// Highest index the cursor may sit on in `list`. While dragging into
    /// another list the slot after the last task is allowed.
    fn max_index(&self, list: usize) -> usize {
        let len = self.list_len(list);
        match self.grabbed {
            Some(grab) if grab.list != list => len,
            _ => len.saturating_sub(1),
        }
    }

    fn clamp_cursor(&mut self) {
        let lists = self.store.lists().len();
        self.selected_list = self.selected_list.min(lists.saturating_sub(1));
        self.selected_task = self.selected_task.min(self.max_index(self.selected_list));
    }

    /// Applies one key press. Returns `false` when the user quits.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editor.is_overlay_open() {
            self.handle_form_key(code);
            return true;
        }
        if self.confirm_remove {
            self.confirm_remove = false;
            if code == KeyCode::Char('y') {
                self.remove_selected();
            } else {
                self.status = "Eliminación cancelada".to_string();
            }
            return true;
        }

        match code {
            KeyCode::Char('q') => return false,
            KeyCode::Left => {
                self.selected_list = self.selected_list.saturating_sub(1);
                self.clamp_cursor();
            }
            KeyCode::Right => {
                self.selected_list += 1;
                self.clamp_cursor();
            }
            KeyCode::Up => self.selected_task = self.selected_task.saturating_sub(1),
            KeyCode::Down => {
                self.selected_task += 1;
                self.clamp_cursor();
            }
            KeyCode::Char(' ') => self.toggle_grab(),
            KeyCode::Esc => {
                if let Some(grab) = self.grabbed.take() {
                    self.selected_list = grab.list;
                    self.selected_task = grab.index;
                }
            }
            _ if self.grabbed.is_some() => {}
            KeyCode::Char('a') => {
                self.editor.open_for_create();
                self.load_form();
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                let task = self
                    .list_id(self.selected_list)
                    .and_then(|id| self.store.task_for_edit(&id, self.selected_task));
                if let Some(task) = task {
                    self.editor.open_for_edit(&task);
                    self.load_form();
                }
            }
            KeyCode::Char('d') => {
                if self.selected_task < self.list_len(self.selected_list) {
                    self.confirm_remove = true;
                }
            }
            _ => {}
        }
        true
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.editor.close(),
            KeyCode::Tab | KeyCode::Down => self.form.focus = (self.form.focus + 1) % FIELDS.len(),
            KeyCode::BackTab | KeyCode::Up => {
                self.form.focus = (self.form.focus + FIELDS.len() - 1) % FIELDS.len()
            }
            KeyCode::Backspace => {
                self.form.values[self.form.focus].pop();
            }
            KeyCode::Char(c) => self.form.values[self.form.focus].push(c),
            KeyCode::Enter => {
                let outcome = self.editor.submit(&mut self.store, self.form.values());
                self.status = match outcome {
                    Submission::Created { .. } => "Tarea creada".to_string(),
                    Submission::Updated { .. } => "Tarea editada".to_string(),
                    Submission::Invalid(err) => err.to_string(),
                    Submission::Dropped(reason) => format!("No se guardó: {reason}"),
                    Submission::NotOpen => String::new(),
                };
                self.clamp_cursor();
            }
            _ => {}
        }
    }

    fn load_form(&mut self) {
        if let Some(draft) = self.editor.draft() {
            self.form.load(draft);
        }
    }

    fn toggle_grab(&mut self) {
        match self.grabbed.take() {
            None => {
                if self.selected_task < self.list_len(self.selected_list) {
                    self.grabbed = Some(Grab {
                        list: self.selected_list,
                        index: self.selected_task,
                    });
                }
            }
            Some(grab) => {
                let (Some(source), Some(dest)) = (self.list_id(grab.list), self.list_id(self.selected_list))
                else {
                    return;
                };
                let drop = DragDrop::new(source, dest, grab.index, self.selected_task);
                match self.reconciler.apply(&mut self.store, &drop) {
                    Ok(moved) => self.selected_task = moved.index,
                    Err(err) => self.status = err.to_string(),
                }
                self.clamp_cursor();
            }
        }
    }

    fn remove_selected(&mut self) {
        let Some(list) = self.store.lists().get(self.selected_list).cloned() else {
            return;
        };
        let Some(task) = list.tasks.get(self.selected_task) else {
            return;
        };
        match self.store.remove_task(&task.id, &list) {
            Ok(removed) => self.status = format!("Eliminada: {}", removed.description),
            Err(err) => self.status = err.to_string(),
        }
        self.clamp_cursor();
    }

    pub fn draw(&self, f: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Min(3), Constraint::Length(1)])
            .split(f.area());

        let lists = self.store.lists();
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, lists.len().max(1) as u32); lists.len()])
            .split(rows[0]);

        for (i, list) in lists.iter().enumerate() {
            let items: Vec<ListItem> = list
                .tasks
                .iter()
                .enumerate()
                .map(|(j, t)| {
                    let selected = self.selected_list == i && self.selected_task == j;
                    let grabbed = self.grabbed == Some(Grab { list: i, index: j });
                    let mut style = Style::default().fg(Color::White);
                    if selected {
                        style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
                    }
                    ListItem::new(Line::from(vec![
                        Span::raw(if grabbed { "» " } else { "  " }),
                        Span::styled(format!("[{}] ", t.priority.label()), priority_style(t.priority)),
                        Span::styled(t.description.clone(), style),
                        Span::raw(format!(" ({})", t.date.format("%Y-%m-%d"))),
                    ]))
                })
                .collect();

            let widget = List::new(items).block(
                Block::default()
                    .title(format!("Lista {}", list.id))
                    .borders(Borders::ALL)
                    .border_style(if self.selected_list == i {
                        Style::default().fg(Color::Cyan)
                    } else {
                        Style::default()
                    }),
            );
            f.render_widget(widget, columns[i]);
        }

        let footer = format!(
            "{} tareas | a crear  e editar  d eliminar  espacio mover  q salir | {}",
            self.task_count.get(),
            self.status
        );
        f.render_widget(Paragraph::new(footer), rows[1]);

        if self.editor.is_overlay_open() {
            self.draw_form(f);
        } else if self.confirm_remove {
            let area = centered(f.area(), 40, 3);
            f.render_widget(Clear, area);
            f.render_widget(
                Paragraph::new("¿Eliminar la tarea? (y/n)")
                    .block(Block::default().borders(Borders::ALL)),
                area,
            );
        }
    }

    fn draw_form(&self, f: &mut Frame) {
        let area = centered(f.area(), 60, 7);
        let lines: Vec<Line> = FIELDS
            .iter()
            .zip(self.form.values.iter())
            .enumerate()
            .map(|(i, (label, value))| {
                let style = if i == self.form.focus {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                Line::from(vec![
                    Span::styled(format!("{label}: "), style),
                    Span::raw(value.clone()),
                ])
            })
            .chain(std::iter::once(Line::from(
                Priority::ALL
                    .iter()
                    .map(|p| format!("{}={} ", p.as_str(), p.label()))
                    .collect::<String>(),
            )))
            .collect();

        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .title(self.editor.title())
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            ),
            area,
        );
    }
}

fn priority_style(priority: Priority) -> Style {
    match priority {
        Priority::Urgent => Style::default().fg(Color::Red),
        Priority::Moderate => Style::default().fg(Color::Yellow),
        Priority::Low => Style::default().fg(Color::Green),
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| app.draw(f))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if !app.handle_key(key.code) {
                return Ok(());
            }
        }
    }
}
