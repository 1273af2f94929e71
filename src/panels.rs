use chrono::NaiveDate;

use crate::cascade;
use crate::config::Config;
use crate::model::{Category, LiveText, Match, MatchStats, Period};
use crate::msg::{Command, FetchRequest, Msg, PanelId, PollHandle};
use crate::poll::{Outcome, PollScheduler, StopRule};
use crate::state::{ListSelection, Nav, PanelState, SelectionChange, Status};

/// The category list has a single, fixed subject.
pub const CATEGORIES_SUBJECT: &str = "categories";

pub const CATEGORY_ROW_HEIGHT: usize = 1;
pub const SCHEDULE_ROW_HEIGHT: usize = 4;

/// Result of feeding a fetch outcome into a panel.
#[derive(Debug, Default)]
pub struct Applied {
    pub stale: bool,
    pub commands: Vec<Command>,
}

impl Applied {
    fn stale() -> Self {
        Self {
            stale: true,
            commands: Vec::new(),
        }
    }

    fn with(commands: Vec<Command>) -> Self {
        Self {
            stale: false,
            commands,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CategoryPanel {
    list: ListSelection<Category>,
}

impl CategoryPanel {
    pub fn new() -> Self {
        Self {
            list: ListSelection::new(),
        }
    }

    pub fn list(&self) -> &ListSelection<Category> {
        &self.list
    }

    pub fn load(&mut self) -> Vec<Command> {
        self.list.start_loading(CATEGORIES_SUBJECT);
        vec![Command::Fetch(FetchRequest::Categories)]
    }

    /// A successful list is left alone; only a failed one is fetched again.
    pub fn reload(&mut self) -> Vec<Command> {
        match self.list.status() {
            Status::Failed | Status::Initial => self.load(),
            Status::Loading | Status::Success => Vec::new(),
        }
    }

    pub fn on_loaded(&mut self, subject_id: &str, categories: Vec<Category>) -> Applied {
        match self.list.apply_success(subject_id, categories) {
            None => Applied::stale(),
            Some(change) => Applied::with(category_selection(change)),
        }
    }

    pub fn on_failed(&mut self, subject_id: &str, error: &str) -> Applied {
        if self.list.apply_failure(subject_id, error) {
            Applied::default()
        } else {
            Applied::stale()
        }
    }

    pub fn navigate(&mut self, nav: Nav) -> Vec<Command> {
        category_selection(self.list.navigate(nav))
    }

    pub fn set_height(&mut self, rows: usize) {
        self.list.set_page_size(rows / CATEGORY_ROW_HEIGHT);
    }
}

fn category_selection(change: Option<SelectionChange<Category>>) -> Vec<Command> {
    match change {
        Some(SelectionChange::Selected(category)) => {
            vec![Command::Emit(Msg::CategorySelected(category))]
        }
        Some(SelectionChange::Cleared) | None => Vec::new(),
    }
}

#[derive(Debug, Clone)]
pub struct SchedulePanel {
    list: ListSelection<Match>,
    category: Option<Category>,
    poll: PollScheduler,
}

impl SchedulePanel {
    pub fn new(config: &Config) -> Self {
        Self {
            list: ListSelection::new(),
            category: None,
            poll: PollScheduler::new(PanelId::Schedule, config.schedule_refresh, StopRule::Never),
        }
    }

    pub fn list(&self) -> &ListSelection<Match> {
        &self.list
    }

    pub fn category(&self) -> Option<&Category> {
        self.category.as_ref()
    }

    pub fn poll(&self) -> &PollScheduler {
        &self.poll
    }

    pub fn select_category(
        &mut self,
        category: Category,
        today: NaiveDate,
        days: i64,
    ) -> Vec<Command> {
        self.poll.cancel();
        self.list.start_loading(category.id.clone());
        let request = cascade::schedule_request_for(category.kind, &category.id, today, days);
        self.category = Some(category);
        vec![Command::Fetch(FetchRequest::Schedule(request))]
    }

    pub fn on_loaded(&mut self, subject_id: &str, matches: Vec<Match>) -> Applied {
        let Some(change) = self.list.apply_success(subject_id, matches) else {
            return Applied::stale();
        };
        let mut cmds: Vec<Command> = change.map(cascade::schedule_selection).into_iter().collect();
        cmds.extend(self.poll.after_outcome(subject_id, Outcome::ScheduleLoaded));
        Applied::with(cmds)
    }

    pub fn on_failed(&mut self, subject_id: &str, error: &str) -> Applied {
        if !self.list.apply_failure(subject_id, error) {
            return Applied::stale();
        }
        Applied::with(self.poll.after_outcome(subject_id, Outcome::Failed).into_iter().collect())
    }

    /// `None` when the fire was stale.
    pub fn on_timer(&mut self, handle: &PollHandle, today: NaiveDate, days: i64) -> Option<Command> {
        if !self.poll.take_fire(handle, self.list.subject_id()) {
            return None;
        }
        self.refetch(today, days)
    }

    pub fn reload(&mut self, today: NaiveDate, days: i64) -> Vec<Command> {
        if self.list.status() == Status::Loading {
            return Vec::new();
        }
        self.poll.cancel();
        self.refetch(today, days).into_iter().collect()
    }

    fn refetch(&self, today: NaiveDate, days: i64) -> Option<Command> {
        let category = self.category.as_ref()?;
        let request = cascade::schedule_request_for(category.kind, &category.id, today, days);
        Some(Command::Fetch(FetchRequest::Schedule(request)))
    }

    pub fn navigate(&mut self, nav: Nav) -> Vec<Command> {
        self.list
            .navigate(nav)
            .map(cascade::schedule_selection)
            .into_iter()
            .collect()
    }

    pub fn set_height(&mut self, rows: usize) {
        self.list.set_page_size(rows / SCHEDULE_ROW_HEIGHT);
    }
}

#[derive(Debug, Clone)]
pub struct TextLivePanel {
    state: PanelState<LiveText>,
    has_data: Option<bool>,
    max_count: usize,
    poll: PollScheduler,
}

impl TextLivePanel {
    pub fn new(config: &Config) -> Self {
        Self {
            state: PanelState::new(),
            has_data: None,
            max_count: config.text_live_count,
            poll: PollScheduler::new(
                PanelId::TextLive,
                config.text_live_refresh,
                StopRule::WhileHasLiveText,
            ),
        }
    }

    pub fn state(&self) -> &PanelState<LiveText> {
        &self.state
    }

    pub fn poll(&self) -> &PollScheduler {
        &self.poll
    }

    pub fn select_match(&mut self, match_id: &str) -> Vec<Command> {
        self.poll.cancel();
        self.has_data = None;
        if match_id.is_empty() {
            self.state.reset();
            return Vec::new();
        }
        self.state.start_loading(match_id);
        vec![self.fetch()]
    }

    pub fn on_loaded(&mut self, subject_id: &str, live: LiveText) -> Applied {
        let has_data = live.has_data;
        if !self.state.apply_success(subject_id, live) {
            return Applied::stale();
        }
        // "No live text" sticks for the rest of the match.
        if self.has_data != Some(false) {
            self.has_data = Some(has_data);
        }
        self.rearm(subject_id, Outcome::TextLiveLoaded { has_data })
    }

    pub fn on_failed(&mut self, subject_id: &str, error: &str) -> Applied {
        if !self.state.apply_failure(subject_id, error) {
            return Applied::stale();
        }
        self.rearm(subject_id, Outcome::Failed)
    }

    pub fn on_timer(&mut self, handle: &PollHandle) -> Option<Command> {
        if !self.poll.take_fire(handle, self.state.subject_id()) {
            return None;
        }
        Some(self.fetch())
    }

    fn rearm(&mut self, subject_id: &str, outcome: Outcome) -> Applied {
        if self.has_data == Some(false) {
            self.poll.cancel();
            return Applied::default();
        }
        Applied::with(self.poll.after_outcome(subject_id, outcome).into_iter().collect())
    }

    pub fn reload(&mut self) -> Vec<Command> {
        if matches!(self.state.status(), Status::Initial | Status::Loading) {
            return Vec::new();
        }
        self.poll.cancel();
        vec![self.fetch()]
    }

    // Until the live-text check has come back positive, every fetch repeats it.
    fn fetch(&self) -> Command {
        Command::Fetch(FetchRequest::TextLive {
            match_id: self.state.subject_id().to_string(),
            max_count: self.max_count,
            check_has_data: self.has_data != Some(true),
        })
    }
}

#[derive(Debug, Clone)]
pub struct StatsPanel {
    state: PanelState<MatchStats>,
    poll: PollScheduler,
    ended: bool,
    scroll: u16,
    page: u16,
}

impl StatsPanel {
    pub fn new(config: &Config) -> Self {
        Self {
            state: PanelState::new(),
            poll: PollScheduler::new(PanelId::Stats, config.stats_refresh, StopRule::UntilEnded),
            ended: false,
            scroll: 0,
            page: 1,
        }
    }

    pub fn state(&self) -> &PanelState<MatchStats> {
        &self.state
    }

    pub fn poll(&self) -> &PollScheduler {
        &self.poll
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn select_match(&mut self, match_id: &str) -> Vec<Command> {
        self.poll.cancel();
        self.ended = false;
        self.scroll = 0;
        if match_id.is_empty() {
            self.state.reset();
            return Vec::new();
        }
        self.state.start_loading(match_id);
        vec![self.fetch()]
    }

    pub fn on_loaded(&mut self, subject_id: &str, stats: MatchStats) -> Applied {
        let period = stats.period;
        if !self.state.apply_success(subject_id, stats) {
            return Applied::stale();
        }
        // A late in-progress snapshot must not revive polling for an ended match.
        self.ended |= period == Period::Ended;
        self.rearm(subject_id, Outcome::StatsLoaded { period })
    }

    pub fn on_failed(&mut self, subject_id: &str, error: &str) -> Applied {
        if !self.state.apply_failure(subject_id, error) {
            return Applied::stale();
        }
        self.rearm(subject_id, Outcome::Failed)
    }

    pub fn has_ended(&self) -> bool {
        self.ended
    }

    fn rearm(&mut self, subject_id: &str, outcome: Outcome) -> Applied {
        if self.ended {
            self.poll.cancel();
            return Applied::default();
        }
        Applied::with(self.poll.after_outcome(subject_id, outcome).into_iter().collect())
    }

    pub fn on_timer(&mut self, handle: &PollHandle) -> Option<Command> {
        if !self.poll.take_fire(handle, self.state.subject_id()) {
            return None;
        }
        Some(self.fetch())
    }

    pub fn reload(&mut self) -> Vec<Command> {
        if matches!(self.state.status(), Status::Initial | Status::Loading) {
            return Vec::new();
        }
        self.poll.cancel();
        vec![self.fetch()]
    }

    pub fn navigate(&mut self, nav: Nav) {
        self.scroll = match nav {
            Nav::Up => self.scroll.saturating_sub(1),
            Nav::Down => self.scroll.saturating_add(1),
            Nav::PageUp => self.scroll.saturating_sub(self.page),
            Nav::PageDown => self.scroll.saturating_add(self.page),
            Nav::Home => 0,
            Nav::End => u16::MAX,
        };
    }

    /// Keeps the scroll offset inside the rendered content.
    pub fn clamp_scroll(&mut self, content_rows: usize, visible_rows: usize) {
        let max = content_rows.saturating_sub(visible_rows);
        self.scroll = self.scroll.min(u16::try_from(max).unwrap_or(u16::MAX));
    }

    pub fn set_height(&mut self, rows: usize) {
        self.page = u16::try_from(rows.max(1)).unwrap_or(u16::MAX);
    }

    fn fetch(&self) -> Command {
        Command::Fetch(FetchRequest::Stats {
            match_id: self.state.subject_id().to_string(),
        })
    }
}
