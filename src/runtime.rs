//! Carries out the commands `App::dispatch` returns. Fetches run on a
//! worker pool and timers on one background thread; both report back as
//! `Msg` values over the event channel, so all state changes stay on the
//! event loop thread.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Instant;

use anyhow::Result;

use crate::api::SportsApi;
use crate::model::LiveText;
use crate::msg::{Command, FetchRequest, Msg, Payload, PollHandle};

pub struct Runtime {
    api: Arc<dyn SportsApi>,
    pool: Option<rayon::ThreadPool>,
    events: Sender<Msg>,
    timers: Sender<(Instant, PollHandle)>,
}

impl Runtime {
    pub fn new(api: Arc<dyn SportsApi>, parallelism: usize, events: Sender<Msg>) -> Self {
        let pool = build_fetch_pool(parallelism);
        if pool.is_none() {
            let _ = events.send(Msg::Log(
                "[WARN] Fetch pool unavailable, using plain threads".to_string(),
            ));
        }
        let (timer_tx, timer_rx) = mpsc::channel();
        let timer_events = events.clone();
        thread::spawn(move || run_timers(timer_rx, timer_events));
        Self {
            api,
            pool,
            events,
            timers: timer_tx,
        }
    }

    /// Returns `false` once the loop should stop.
    pub fn execute(&self, command: Command) -> bool {
        match command {
            Command::Fetch(request) => {
                self.spawn_fetch(request);
                true
            }
            Command::ArmTimer { handle, after } => {
                let _ = self.timers.send((Instant::now() + after, handle));
                true
            }
            Command::Emit(msg) => {
                let _ = self.events.send(msg);
                true
            }
            Command::Quit => false,
        }
    }

    pub fn execute_all(&self, commands: Vec<Command>) -> bool {
        let mut running = true;
        for command in commands {
            running &= self.execute(command);
        }
        running
    }

    fn spawn_fetch(&self, request: FetchRequest) {
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        let job = move || {
            let _ = events.send(run_fetch(api.as_ref(), &request));
        };
        match self.pool.as_ref() {
            Some(pool) => pool.spawn(job),
            None => {
                thread::spawn(job);
            }
        }
    }
}

fn build_fetch_pool(threads: usize) -> Option<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .thread_name(|i| format!("fetch-{i}"))
        .build()
        .ok()
}

/// Performs one request and turns the outcome into the message that reports
/// it. Errors keep their full context chain.
pub fn run_fetch(api: &dyn SportsApi, request: &FetchRequest) -> Msg {
    let subject_id = request.subject_id().to_string();
    match fetch_payload(api, request) {
        Ok(payload) => Msg::FetchSucceeded {
            subject_id,
            payload,
        },
        Err(err) => Msg::FetchFailed {
            panel: request.panel(),
            subject_id,
            error: format!("{err:#}"),
        },
    }
}

fn fetch_payload(api: &dyn SportsApi, request: &FetchRequest) -> Result<Payload> {
    Ok(match request {
        FetchRequest::Categories => Payload::Categories(api.fetch_categories()?),
        FetchRequest::Schedule(schedule) => Payload::Schedule(api.fetch_schedule(schedule)?),
        FetchRequest::TextLive {
            match_id,
            max_count,
            check_has_data,
        } => {
            if *check_has_data && !api.fetch_has_live_text(match_id)? {
                Payload::TextLive(LiveText::none())
            } else {
                Payload::TextLive(LiveText {
                    has_data: true,
                    entries: api.fetch_live_text(match_id, *max_count)?,
                })
            }
        }
        FetchRequest::Stats { match_id } => Payload::Stats(api.fetch_match_stats(match_id)?),
    })
}

struct Pending {
    deadline: Instant,
    seq: u64,
    handle: PollHandle,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Reversed so the max-heap pops the earliest deadline.
impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

fn run_timers(requests: Receiver<(Instant, PollHandle)>, events: Sender<Msg>) {
    let mut pending: BinaryHeap<Pending> = BinaryHeap::new();
    let mut seq = 0u64;
    loop {
        let received = match pending.peek() {
            Some(next) => {
                requests.recv_timeout(next.deadline.saturating_duration_since(Instant::now()))
            }
            None => requests.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match received {
            Ok((deadline, handle)) => {
                seq += 1;
                pending.push(Pending {
                    deadline,
                    seq,
                    handle,
                });
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return,
        }

        let now = Instant::now();
        while pending.peek().is_some_and(|next| next.deadline <= now) {
            if let Some(due) = pending.pop() {
                if events.send(Msg::TimerFired(due.handle)).is_err() {
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::fake_feed::DemoApi;
    use crate::msg::PanelId;
    use chrono::NaiveDate;

    fn api() -> DemoApi {
        DemoApi::new(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
    }

    #[test]
    fn text_live_without_data_skips_entries() {
        let msg = run_fetch(
            &api(),
            &FetchRequest::TextLive {
                match_id: "8:2024092".to_string(),
                max_count: 10,
                check_has_data: true,
            },
        );
        match msg {
            Msg::FetchSucceeded {
                payload: Payload::TextLive(live),
                ..
            } => assert!(!live.has_data && live.entries.is_empty()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn failures_carry_panel_and_subject() {
        let msg = run_fetch(
            &api(),
            &FetchRequest::Stats {
                match_id: "broken".to_string(),
            },
        );
        match msg {
            Msg::FetchFailed {
                panel,
                subject_id,
                error,
            } => {
                assert_eq!(panel, PanelId::Stats);
                assert_eq!(subject_id, "broken");
                assert!(error.contains("invalid match id"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn timers_fire_in_deadline_order() {
        let (tx, rx) = mpsc::channel();
        let runtime = Runtime::new(Arc::new(api()), 1, tx);
        let handle = |generation| PollHandle {
            panel: PanelId::Schedule,
            subject_id: "hot".to_string(),
            generation,
        };
        runtime.execute(Command::ArmTimer {
            handle: handle(2),
            after: Duration::from_millis(60),
        });
        runtime.execute(Command::ArmTimer {
            handle: handle(1),
            after: Duration::from_millis(10),
        });

        let mut fired = Vec::new();
        while fired.len() < 2 {
            if let Msg::TimerFired(h) = rx.recv_timeout(Duration::from_secs(2)).unwrap() {
                fired.push(h.generation);
            }
        }
        assert_eq!(fired, vec![1, 2]);
    }

    #[test]
    fn quit_stops_the_loop() {
        let (tx, _rx) = mpsc::channel();
        let runtime = Runtime::new(Arc::new(api()), 1, tx);
        assert!(!runtime.execute(Command::Quit));
    }
}
