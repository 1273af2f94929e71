use crate::model::{Category, Match};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Initial,
    Loading,
    Success,
    Failed,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Success | Status::Failed)
    }
}

/// The one check every asynchronous result passes before it may touch panel
/// state. In-flight requests are never aborted; their answers are simply
/// ignored once the panel has moved on to another subject.
pub fn is_fresh(current_subject: &str, incoming_subject: &str) -> bool {
    current_subject == incoming_subject
}

#[derive(Debug, Clone)]
pub struct PanelState<T> {
    status: Status,
    subject_id: String,
    // Kept across a same-subject failure so list navigation survives a failed
    // poll; only exposed through `payload()` while Success.
    payload: Option<T>,
    error: Option<String>,
}

impl<T> Default for PanelState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PanelState<T> {
    pub fn new() -> Self {
        Self {
            status: Status::Initial,
            subject_id: String::new(),
            payload: None,
            error: None,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn payload(&self) -> Option<&T> {
        match self.status {
            Status::Success => self.payload.as_ref(),
            _ => None,
        }
    }

    pub fn last_payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        match self.status {
            Status::Failed => self.error.as_deref(),
            _ => None,
        }
    }

    pub fn start_loading(&mut self, subject_id: impl Into<String>) {
        self.status = Status::Loading;
        self.subject_id = subject_id.into();
        self.payload = None;
        self.error = None;
    }

    pub fn accepts(&self, subject_id: &str) -> bool {
        self.status != Status::Initial && is_fresh(&self.subject_id, subject_id)
    }

    /// Returns `false` when the result was stale and nothing changed.
    pub fn apply_success(&mut self, subject_id: &str, payload: T) -> bool {
        if !self.accepts(subject_id) {
            return false;
        }
        self.status = Status::Success;
        self.payload = Some(payload);
        self.error = None;
        true
    }

    pub fn apply_failure(&mut self, subject_id: &str, error: impl Into<String>) -> bool {
        if !self.accepts(subject_id) {
            return false;
        }
        self.status = Status::Failed;
        self.error = Some(error.into());
        true
    }

    pub fn reset(&mut self) {
        self.status = Status::Initial;
        self.subject_id.clear();
        self.payload = None;
        self.error = None;
    }
}

#[derive(Debug, Clone)]
pub struct FocusRing<P> {
    panels: Vec<P>,
    index: usize,
}

impl<P: Copy + PartialEq> FocusRing<P> {
    /// # Panics
    /// Panics if `panels` is empty.
    pub fn new(panels: Vec<P>) -> Self {
        assert!(!panels.is_empty(), "focus ring needs at least one panel");
        Self { panels, index: 0 }
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> P {
        self.panels[self.index]
    }

    pub fn is_focused(&self, panel: P) -> bool {
        self.current() == panel
    }

    pub fn next(&mut self) -> P {
        self.index = (self.index + 1) % self.panels.len();
        self.current()
    }

    pub fn prev(&mut self) -> P {
        let len = self.panels.len();
        self.index = (self.index + len - 1) % len;
        self.current()
    }
}

pub trait Selectable: Clone {
    fn key(&self) -> &str;
}

impl Selectable for Category {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Selectable for Match {
    fn key(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange<T> {
    Selected(T),
    Cleared,
}

#[derive(Debug, Clone)]
pub struct ListSelection<T> {
    state: PanelState<Vec<T>>,
    selected: usize,
    page_size: usize,
    last_key: Option<String>,
}

impl<T: Selectable> Default for ListSelection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Selectable> ListSelection<T> {
    pub fn new() -> Self {
        Self {
            state: PanelState::new(),
            selected: 0,
            page_size: 1,
            last_key: None,
        }
    }

    pub fn state(&self) -> &PanelState<Vec<T>> {
        &self.state
    }

    pub fn status(&self) -> Status {
        self.state.status()
    }

    pub fn subject_id(&self) -> &str {
        self.state.subject_id()
    }

    pub fn items(&self) -> &[T] {
        self.state.last_payload().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.items().get(self.selected)
    }

    pub fn set_page_size(&mut self, rows: usize) {
        self.page_size = rows.max(1);
    }

    pub fn start_loading(&mut self, subject_id: impl Into<String>) {
        self.state.start_loading(subject_id);
        self.selected = 0;
        self.last_key = None;
    }

    pub fn reset(&mut self) {
        self.state.reset();
        self.selected = 0;
        self.last_key = None;
    }

    /// `None` for a stale result. Otherwise the inner option is the selection
    /// change (if any) caused by the new items.
    pub fn apply_success(
        &mut self,
        subject_id: &str,
        items: Vec<T>,
    ) -> Option<Option<SelectionChange<T>>> {
        let keep = self.last_key.clone();
        if !self.state.apply_success(subject_id, items) {
            return None;
        }
        let selected = keep
            .and_then(|key| self.items().iter().position(|item| item.key() == key))
            .unwrap_or(0);
        self.selected = selected;
        Some(self.settle())
    }

    pub fn apply_failure(&mut self, subject_id: &str, error: impl Into<String>) -> bool {
        self.state.apply_failure(subject_id, error)
    }

    pub fn navigate(&mut self, nav: Nav) -> Option<SelectionChange<T>> {
        let total = self.items().len();
        if total == 0 {
            self.selected = 0;
            return self.settle();
        }
        let last = total - 1;
        self.selected = match nav {
            Nav::Up => self.selected.saturating_sub(1),
            Nav::Down => (self.selected + 1).min(last),
            Nav::PageUp => self.selected.saturating_sub(self.page_size),
            Nav::PageDown => (self.selected + self.page_size).min(last),
            Nav::Home => 0,
            Nav::End => last,
        };
        self.settle()
    }

    fn settle(&mut self) -> Option<SelectionChange<T>> {
        let after = self.selected_item().cloned();
        match after {
            Some(item) => {
                if self.last_key.as_deref() == Some(item.key()) {
                    return None;
                }
                self.last_key = Some(item.key().to_string());
                Some(SelectionChange::Selected(item))
            }
            None => {
                self.selected = 0;
                self.last_key.take().map(|_| SelectionChange::Cleared)
            }
        }
    }
}
