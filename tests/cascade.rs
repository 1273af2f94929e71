use chrono::NaiveDate;

use sportx_terminal::app::{App, Focus};
use sportx_terminal::config::Config;
use sportx_terminal::model::{Category, LiveText, Match, MatchStats, MatchType, Period};
use sportx_terminal::msg::{Command, FetchRequest, Input, Msg, Payload};
use sportx_terminal::panels::CATEGORIES_SUBJECT;
use sportx_terminal::state::{Nav, Status};

fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 30).unwrap()
}

fn app() -> App {
    App::new(Config::default()).with_clock(fixed_today)
}

fn game(id: &str, day: &str) -> Match {
    Match {
        id: id.to_string(),
        description: "Premier League".to_string(),
        start_time: format!("{day} 20:00:00"),
        left_team: "Home".to_string(),
        right_team: "Away".to_string(),
        left_score: "0".to_string(),
        right_score: "0".to_string(),
        period: Period::InProgress,
        quarter_label: String::new(),
        quarter_time: String::new(),
        match_type: MatchType::Football,
    }
}

fn categories() -> Vec<Category> {
    vec![Category::hot(), Category::standard("football", "Football")]
}

fn schedule_loaded(subject: &str, matches: Vec<Match>) -> Msg {
    Msg::FetchSucceeded {
        subject_id: subject.to_string(),
        payload: Payload::Schedule(matches),
    }
}

fn fetches(cmds: &[Command]) -> Vec<FetchRequest> {
    cmds.iter()
        .filter_map(|cmd| match cmd {
            Command::Fetch(req) => Some(req.clone()),
            _ => None,
        })
        .collect()
}

/// Loads the category list; Hot ends up highlighted and its schedule requested.
fn booted() -> (App, Vec<Command>) {
    let mut app = app();
    let init = app.init();
    assert_eq!(fetches(&init), vec![FetchRequest::Categories]);
    let cmds = app.dispatch(Msg::FetchSucceeded {
        subject_id: CATEGORIES_SUBJECT.to_string(),
        payload: Payload::Categories(categories()),
    });
    (app, cmds)
}

#[test]
fn selecting_hot_loads_its_schedule() {
    let (mut app, cmds) = booted();

    let requests = fetches(&cmds);
    assert_eq!(requests.len(), 1);
    match &requests[0] {
        FetchRequest::Schedule(req) => {
            assert_eq!(req.category_id, "hot");
            assert_eq!(req.column_id, "hot");
            assert_eq!(req.from, fixed_today());
            assert_eq!(req.to, NaiveDate::from_ymd_opt(2025, 6, 4).unwrap());
        }
        other => panic!("unexpected request {other:?}"),
    }
    assert_eq!(app.schedule.list().status(), Status::Loading);
    assert_eq!(app.schedule.list().subject_id(), "hot");

    let cmds = app.dispatch(schedule_loaded(
        "hot",
        vec![game("8:1", "2025-05-30"), game("8:2", "2025-06-01")],
    ));
    assert_eq!(app.schedule.list().status(), Status::Success);
    assert_eq!(app.schedule.list().items().len(), 2);

    // First match is highlighted and both detail panels follow it.
    let requests = fetches(&cmds);
    assert!(requests.contains(&FetchRequest::Stats {
        match_id: "8:1".to_string()
    }));
    assert!(requests.iter().any(|r| matches!(
        r,
        FetchRequest::TextLive { match_id, check_has_data: true, .. } if match_id == "8:1"
    )));
    assert!(cmds.iter().any(|c| matches!(c, Command::ArmTimer { .. })));
    assert_eq!(app.text_live.state().status(), Status::Loading);
    assert_eq!(app.stats.state().subject_id(), "8:1");
}

#[test]
fn late_schedule_for_previous_category_is_dropped() {
    let (mut app, _) = booted();

    // Move to Football while Hot is still loading.
    let cmds = app.dispatch(Msg::Input(Input::Navigate(Nav::Down)));
    assert!(fetches(&cmds).iter().any(|r| matches!(
        r,
        FetchRequest::Schedule(req) if req.category_id == "football"
    )));
    assert_eq!(app.schedule.list().subject_id(), "football");

    let cmds = app.dispatch(schedule_loaded("hot", vec![game("8:1", "2025-05-30")]));
    assert!(cmds.is_empty());
    assert_eq!(app.schedule.list().status(), Status::Loading);
    assert!(
        app.logs()
            .iter()
            .any(|line| line.contains("Dropped stale") && line.contains("hot"))
    );

    app.dispatch(schedule_loaded("football", vec![game("8:9", "2025-05-31")]));
    assert_eq!(app.schedule.list().status(), Status::Success);
    assert_eq!(app.schedule.list().items()[0].id, "8:9");
}

#[test]
fn match_without_live_text_settles_without_polling() {
    let mut app = app();
    let match_id = "100000:10042400225";
    let cmds = app.dispatch(Msg::MatchSelected(match_id.to_string()));
    assert!(fetches(&cmds).contains(&FetchRequest::TextLive {
        match_id: match_id.to_string(),
        max_count: Config::default().text_live_count,
        check_has_data: true,
    }));

    let cmds = app.dispatch(Msg::FetchSucceeded {
        subject_id: match_id.to_string(),
        payload: Payload::TextLive(LiveText::none()),
    });
    assert!(cmds.is_empty());
    assert_eq!(app.text_live.state().status(), Status::Success);
    assert!(
        app.text_live
            .state()
            .payload()
            .is_some_and(|live| live.entries.is_empty())
    );
    assert!(!app.text_live.poll().is_armed());
}

#[test]
fn stats_poll_until_the_match_ends() {
    let mut app = app();
    let match_id = "8:2024871";
    app.dispatch(Msg::MatchSelected(match_id.to_string()));

    let cmds = app.dispatch(Msg::FetchSucceeded {
        subject_id: match_id.to_string(),
        payload: Payload::Stats(MatchStats::empty(Period::InProgress)),
    });
    let handle = match cmds.as_slice() {
        [Command::ArmTimer { handle, after }] => {
            assert_eq!(*after, Config::default().stats_refresh);
            handle.clone()
        }
        other => panic!("expected one timer, got {other:?}"),
    };

    let cmds = app.dispatch(Msg::TimerFired(handle));
    assert_eq!(
        fetches(&cmds),
        vec![FetchRequest::Stats {
            match_id: match_id.to_string()
        }]
    );

    let cmds = app.dispatch(Msg::FetchSucceeded {
        subject_id: match_id.to_string(),
        payload: Payload::Stats(MatchStats::empty(Period::Ended)),
    });
    assert!(cmds.is_empty());
    assert!(!app.stats.poll().is_armed());
}

#[test]
fn emptied_schedule_resets_detail_panels() {
    let (mut app, cmds) = booted();
    assert!(!fetches(&cmds).is_empty());

    let cmds = app.dispatch(schedule_loaded("hot", vec![game("8:1", "2025-05-30")]));
    let timer = cmds
        .iter()
        .find_map(|c| match c {
            Command::ArmTimer { handle, .. } => Some(handle.clone()),
            _ => None,
        })
        .expect("schedule timer");
    app.dispatch(Msg::FetchSucceeded {
        subject_id: "8:1".to_string(),
        payload: Payload::Stats(MatchStats::empty(Period::InProgress)),
    });
    assert!(app.stats.poll().is_armed());

    // The next refresh comes back empty.
    let cmds = app.dispatch(Msg::TimerFired(timer));
    assert_eq!(fetches(&cmds).len(), 1);
    app.dispatch(schedule_loaded("hot", Vec::new()));

    assert_eq!(app.schedule.list().status(), Status::Success);
    assert_eq!(app.text_live.state().status(), Status::Initial);
    assert_eq!(app.stats.state().status(), Status::Initial);
    assert!(!app.stats.poll().is_armed());
    assert!(!app.text_live.poll().is_armed());
}

#[test]
fn category_change_blanks_details_immediately() {
    let (mut app, _) = booted();
    app.dispatch(schedule_loaded("hot", vec![game("8:1", "2025-05-30")]));
    assert_eq!(app.stats.state().status(), Status::Loading);

    app.dispatch(Msg::Input(Input::Navigate(Nav::Down)));
    assert_eq!(app.stats.state().status(), Status::Initial);
    assert_eq!(app.text_live.state().status(), Status::Initial);
}

#[test]
fn reload_refetches_only_failed_categories() {
    let mut app = app();
    app.init();
    assert_eq!(app.focus(), Focus::Categories);

    app.dispatch(Msg::FetchFailed {
        panel: sportx_terminal::msg::PanelId::Categories,
        subject_id: CATEGORIES_SUBJECT.to_string(),
        error: "timeout".to_string(),
    });
    assert_eq!(app.categories.list().status(), Status::Failed);
    assert!(app.logs().iter().any(|line| line.starts_with("[WARN]")));

    let cmds = app.dispatch(Msg::Input(Input::Reload));
    assert_eq!(fetches(&cmds), vec![FetchRequest::Categories]);
    assert_eq!(app.categories.list().status(), Status::Loading);
}
