use std::collections::VecDeque;

use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::cascade;
use crate::config::Config;
use crate::msg::{Command, Input, Msg, PanelId, Payload, PollHandle};
use crate::panels::{Applied, CategoryPanel, SchedulePanel, StatsPanel, TextLivePanel};
use crate::state::{FocusRing, Nav, Status};
use crate::ui;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Categories,
    Schedule,
    Stats,
}

pub struct App {
    config: Config,
    clock: fn() -> NaiveDate,
    pub categories: CategoryPanel,
    pub schedule: SchedulePanel,
    pub text_live: TextLivePanel,
    pub stats: StatsPanel,
    focus: FocusRing<Focus>,
    logs: VecDeque<String>,
    size: (u16, u16),
    spinner: usize,
    should_quit: bool,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            categories: CategoryPanel::new(),
            schedule: SchedulePanel::new(&config),
            text_live: TextLivePanel::new(&config),
            stats: StatsPanel::new(&config),
            focus: FocusRing::new(vec![Focus::Categories, Focus::Schedule, Focus::Stats]),
            logs: VecDeque::new(),
            size: (0, 0),
            spinner: 0,
            should_quit: false,
            clock: local_today,
            config,
        }
    }

    /// Replaces the source of "today" used for schedule windows.
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn focus(&self) -> Focus {
        self.focus.current()
    }

    pub fn is_focused(&self, focus: Focus) -> bool {
        self.focus.is_focused(focus)
    }

    pub fn logs(&self) -> &VecDeque<String> {
        &self.logs
    }

    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    pub fn spinner(&self) -> usize {
        self.spinner
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn init(&mut self) -> Vec<Command> {
        self.categories.load()
    }

    /// Applies `msg` and every message it derives, in order, and returns the
    /// side effects the runtime has to carry out.
    pub fn dispatch(&mut self, msg: Msg) -> Vec<Command> {
        let mut queue = VecDeque::from([msg]);
        let mut effects = Vec::new();
        while let Some(msg) = queue.pop_front() {
            for cmd in self.update(msg) {
                match cmd {
                    Command::Emit(derived) => queue.push_back(derived),
                    other => effects.push(other),
                }
            }
        }
        effects
    }

    /// Applies exactly one message.
    pub fn update(&mut self, msg: Msg) -> Vec<Command> {
        match msg {
            Msg::Input(input) => self.on_input(input),
            Msg::Resize { width, height } => {
                self.on_resize(width, height);
                Vec::new()
            }
            Msg::Tick => {
                if self.any_loading() {
                    self.spinner = self.spinner.wrapping_add(1);
                }
                Vec::new()
            }
            Msg::CategorySelected(category) => {
                let today = (self.clock)();
                cascade::category_selected(
                    &mut self.schedule,
                    category,
                    today,
                    self.config.schedule_days,
                )
            }
            Msg::MatchSelected(match_id) => {
                cascade::match_selected(&mut self.text_live, &mut self.stats, &match_id)
            }
            Msg::FetchSucceeded {
                subject_id,
                payload,
            } => {
                let panel = payload.panel();
                let applied = match payload {
                    Payload::Categories(items) => self.categories.on_loaded(&subject_id, items),
                    Payload::Schedule(items) => self.schedule.on_loaded(&subject_id, items),
                    Payload::TextLive(live) => self.text_live.on_loaded(&subject_id, live),
                    Payload::Stats(stats) => self.stats.on_loaded(&subject_id, stats),
                };
                self.finish(panel, &subject_id, applied)
            }
            Msg::FetchFailed {
                panel,
                subject_id,
                error,
            } => {
                let applied = match panel {
                    PanelId::Categories => self.categories.on_failed(&subject_id, &error),
                    PanelId::Schedule => self.schedule.on_failed(&subject_id, &error),
                    PanelId::TextLive => self.text_live.on_failed(&subject_id, &error),
                    PanelId::Stats => self.stats.on_failed(&subject_id, &error),
                };
                if !applied.stale {
                    self.push_log(format!(
                        "[WARN] {} fetch failed ({subject_id}): {error}",
                        panel.label()
                    ));
                }
                self.finish(panel, &subject_id, applied)
            }
            Msg::TimerFired(handle) => self.on_timer(&handle).into_iter().collect(),
            Msg::Log(line) => {
                self.push_log(line);
                Vec::new()
            }
        }
    }

    fn finish(&mut self, panel: PanelId, subject_id: &str, applied: Applied) -> Vec<Command> {
        if applied.stale {
            self.push_log(format!(
                "[INFO] Dropped stale {} result for {subject_id}",
                panel.label()
            ));
        }
        applied.commands
    }

    fn on_timer(&mut self, handle: &PollHandle) -> Option<Command> {
        let today = (self.clock)();
        let cmd = match handle.panel {
            PanelId::Categories => None,
            PanelId::Schedule => self
                .schedule
                .on_timer(handle, today, self.config.schedule_days),
            PanelId::TextLive => self.text_live.on_timer(handle),
            PanelId::Stats => self.stats.on_timer(handle),
        };
        if cmd.is_none() {
            self.push_log(format!(
                "[INFO] Discarded {} refresh for {}",
                handle.panel.label(),
                handle.subject_id
            ));
        }
        cmd
    }

    fn on_input(&mut self, input: Input) -> Vec<Command> {
        match input {
            Input::FocusNext => {
                self.focus.next();
                Vec::new()
            }
            Input::FocusPrev => {
                self.focus.prev();
                Vec::new()
            }
            Input::Quit => {
                self.should_quit = true;
                vec![Command::Quit]
            }
            Input::Navigate(nav) => self.on_navigate(nav),
            Input::Reload => self.on_reload(),
        }
    }

    fn on_navigate(&mut self, nav: Nav) -> Vec<Command> {
        match self.focus.current() {
            Focus::Categories => self.categories.navigate(nav),
            Focus::Schedule => self.schedule.navigate(nav),
            Focus::Stats => {
                self.stats.navigate(nav);
                let (width, height) = ui::stats_viewport(self.size);
                let rows = ui::stats_lines(&self.stats, width).len();
                self.stats.clamp_scroll(rows, height);
                Vec::new()
            }
        }
    }

    fn on_reload(&mut self) -> Vec<Command> {
        match self.focus.current() {
            Focus::Categories => {
                let cmds = self.categories.reload();
                if !cmds.is_empty() {
                    self.push_log("[INFO] Reloading categories");
                }
                cmds
            }
            Focus::Schedule => {
                let today = (self.clock)();
                self.schedule.reload(today, self.config.schedule_days)
            }
            Focus::Stats => {
                let mut cmds = self.stats.reload();
                cmds.extend(self.text_live.reload());
                cmds
            }
        }
    }

    fn on_resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
        let rows = usize::from(ui::panel_inner_height(height));
        self.categories.set_height(rows);
        self.schedule.set_height(rows);
        self.stats.set_height(rows);
    }

    fn any_loading(&self) -> bool {
        [
            self.categories.list().status(),
            self.schedule.list().status(),
            self.text_live.state().status(),
            self.stats.state().status(),
        ]
        .contains(&Status::Loading)
    }
}

/// Keyboard mapping. Unmapped keys produce nothing.
pub fn input_for_key(key: KeyEvent) -> Option<Input> {
    let input = match key.code {
        KeyCode::Tab => Input::FocusNext,
        KeyCode::BackTab => Input::FocusPrev,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Input::Quit,
        KeyCode::Char('q') => Input::Quit,
        KeyCode::Char('r') | KeyCode::Char('R') => Input::Reload,
        KeyCode::Up | KeyCode::Char('k') => Input::Navigate(Nav::Up),
        KeyCode::Down | KeyCode::Char('j') => Input::Navigate(Nav::Down),
        KeyCode::PageUp => Input::Navigate(Nav::PageUp),
        KeyCode::PageDown => Input::Navigate(Nav::PageDown),
        KeyCode::Home | KeyCode::Char('g') => Input::Navigate(Nav::Home),
        KeyCode::End | KeyCode::Char('G') => Input::Navigate(Nav::End),
        _ => return None,
    };
    Some(input)
}
