use std::time::Duration;

use chrono::NaiveDate;

use crate::model::{Category, LiveText, Match, MatchStats};
use crate::state::Nav;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelId {
    Categories,
    Schedule,
    TextLive,
    Stats,
}

impl PanelId {
    pub fn label(self) -> &'static str {
        match self {
            PanelId::Categories => "Categories",
            PanelId::Schedule => "Schedule",
            PanelId::TextLive => "Live text",
            PanelId::Stats => "Stats",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollHandle {
    pub panel: PanelId,
    pub subject_id: String,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    FocusNext,
    FocusPrev,
    Quit,
    Navigate(Nav),
    Reload,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Categories(Vec<Category>),
    Schedule(Vec<Match>),
    TextLive(LiveText),
    Stats(MatchStats),
}

impl Payload {
    pub fn panel(&self) -> PanelId {
        match self {
            Payload::Categories(_) => PanelId::Categories,
            Payload::Schedule(_) => PanelId::Schedule,
            Payload::TextLive(_) => PanelId::TextLive,
            Payload::Stats(_) => PanelId::Stats,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Input(Input),
    Resize { width: u16, height: u16 },
    Tick,
    CategorySelected(Category),
    /// Empty id means "nothing selected".
    MatchSelected(String),
    FetchSucceeded {
        subject_id: String,
        payload: Payload,
    },
    FetchFailed {
        panel: PanelId,
        subject_id: String,
        error: String,
    },
    TimerFired(PollHandle),
    Log(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRequest {
    pub category_id: String,
    pub column_id: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Categories,
    Schedule(ScheduleRequest),
    /// With `check_has_data` the worker asks whether the match has live text
    /// at all before pulling entries.
    TextLive {
        match_id: String,
        max_count: usize,
        check_has_data: bool,
    },
    Stats {
        match_id: String,
    },
}

impl FetchRequest {
    pub fn panel(&self) -> PanelId {
        match self {
            FetchRequest::Categories => PanelId::Categories,
            FetchRequest::Schedule(_) => PanelId::Schedule,
            FetchRequest::TextLive { .. } => PanelId::TextLive,
            FetchRequest::Stats { .. } => PanelId::Stats,
        }
    }

    pub fn subject_id(&self) -> &str {
        match self {
            FetchRequest::Categories => crate::panels::CATEGORIES_SUBJECT,
            FetchRequest::Schedule(req) => &req.category_id,
            FetchRequest::TextLive { match_id, .. } | FetchRequest::Stats { match_id } => match_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Fetch(FetchRequest),
    ArmTimer { handle: PollHandle, after: Duration },
    Emit(Msg),
    Quit,
}
