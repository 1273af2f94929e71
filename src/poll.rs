use std::time::Duration;

use crate::model::Period;
use crate::msg::{Command, PanelId, PollHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Failed,
    ScheduleLoaded,
    TextLiveLoaded { has_data: bool },
    StatsLoaded { period: Period },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopRule {
    Never,
    WhileHasLiveText,
    UntilEnded,
}

impl StopRule {
    pub fn should_rearm(self, outcome: Outcome) -> bool {
        // Failures are treated as transient for every panel.
        if outcome == Outcome::Failed {
            return true;
        }
        match (self, outcome) {
            (StopRule::Never, _) => true,
            (StopRule::WhileHasLiveText, Outcome::TextLiveLoaded { has_data }) => has_data,
            (StopRule::UntilEnded, Outcome::StatsLoaded { period }) => period != Period::Ended,
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PollScheduler {
    panel: PanelId,
    interval: Duration,
    rule: StopRule,
    generation: u64,
    armed: Option<PollHandle>,
}

impl PollScheduler {
    pub fn new(panel: PanelId, interval: Duration, rule: StopRule) -> Self {
        Self {
            panel,
            interval,
            rule,
            generation: 0,
            armed: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn armed(&self) -> Option<&PollHandle> {
        self.armed.as_ref()
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn after_outcome(&mut self, subject_id: &str, outcome: Outcome) -> Option<Command> {
        if !self.rule.should_rearm(outcome) {
            self.cancel();
            return None;
        }
        Some(self.arm(subject_id))
    }

    pub fn arm(&mut self, subject_id: &str) -> Command {
        self.generation += 1;
        let handle = PollHandle {
            panel: self.panel,
            subject_id: subject_id.to_string(),
            generation: self.generation,
        };
        self.armed = Some(handle.clone());
        Command::ArmTimer {
            handle,
            after: self.interval,
        }
    }

    pub fn cancel(&mut self) {
        self.generation += 1;
        self.armed = None;
    }

    /// Consumes the armed handle if `fired` is it and the panel is still on
    /// the same subject. Anything else is a stale fire.
    pub fn take_fire(&mut self, fired: &PollHandle, current_subject: &str) -> bool {
        let live = self.armed.as_ref().is_some_and(|armed| {
            armed == fired && crate::state::is_fresh(current_subject, &fired.subject_id)
        });
        if live {
            self.armed = None;
        }
        live
    }
}
