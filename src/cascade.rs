//! The fixed chain category → schedule → match → {live text, stats}.

use chrono::{Duration as ChronoDuration, NaiveDate};

use crate::model::{Category, CategoryKind, HOT_CATEGORY_ID, Match};
use crate::msg::{Command, Msg, ScheduleRequest};
use crate::panels::{SchedulePanel, StatsPanel, TextLivePanel};
use crate::state::SelectionChange;

/// Request for a category's schedule over `[today, today + days)`.
pub fn schedule_request_for(
    kind: CategoryKind,
    category_id: &str,
    today: NaiveDate,
    days: i64,
) -> ScheduleRequest {
    let column_id = match kind {
        CategoryKind::Hot => HOT_CATEGORY_ID,
        CategoryKind::Standard => category_id,
    };
    ScheduleRequest {
        category_id: category_id.to_string(),
        column_id: column_id.to_string(),
        from: today,
        to: today + ChronoDuration::days(days),
    }
}

/// Link 1: a category pick rebinds the schedule and blanks the detail panels
/// straight away rather than leaving the old category's match on screen.
pub fn category_selected(
    schedule: &mut SchedulePanel,
    category: Category,
    today: NaiveDate,
    days: i64,
) -> Vec<Command> {
    let mut cmds = schedule.select_category(category, today, days);
    cmds.push(Command::Emit(Msg::MatchSelected(String::new())));
    cmds
}

/// Link 2: schedule highlight to match selection.
pub fn schedule_selection(change: SelectionChange<Match>) -> Command {
    let id = match change {
        SelectionChange::Selected(m) => m.id,
        SelectionChange::Cleared => String::new(),
    };
    Command::Emit(Msg::MatchSelected(id))
}

/// Link 3: both detail panels follow the match independently.
pub fn match_selected(
    text_live: &mut TextLivePanel,
    stats: &mut StatsPanel,
    match_id: &str,
) -> Vec<Command> {
    let mut cmds = text_live.select_match(match_id);
    cmds.extend(stats.select_match(match_id));
    cmds
}
