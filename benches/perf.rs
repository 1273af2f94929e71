use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use sportx_terminal::api::{parse_schedule_json, parse_stats_json};
use sportx_terminal::app::App;
use sportx_terminal::config::Config;
use sportx_terminal::model::{Category, Match, MatchType, Period};
use sportx_terminal::msg::{Msg, Payload};
use sportx_terminal::ui::match_stats_lines;

const SCHEDULE_JSON: &str = include_str!("../tests/fixtures/schedule.json");
const STATS_JSON: &str = include_str!("../tests/fixtures/stats.json");

fn sample_matches(n: usize) -> Vec<Match> {
    (0..n)
        .map(|i| Match {
            id: format!("8:{i}"),
            description: "Premier League".to_string(),
            start_time: "2025-05-30 20:00:00".to_string(),
            left_team: format!("Home {i}"),
            right_team: format!("Away {i}"),
            left_score: "1".to_string(),
            right_score: "0".to_string(),
            period: Period::InProgress,
            quarter_label: "2nd half".to_string(),
            quarter_time: "70'".to_string(),
            match_type: MatchType::Football,
        })
        .collect()
}

fn bench_schedule_parse(c: &mut Criterion) {
    c.bench_function("schedule_parse", |b| {
        b.iter(|| {
            let matches = parse_schedule_json(black_box(SCHEDULE_JSON)).unwrap();
            black_box(matches.len());
        })
    });
}

fn bench_stats_parse_and_render(c: &mut Criterion) {
    c.bench_function("stats_parse_render", |b| {
        b.iter(|| {
            let stats = parse_stats_json(black_box(STATS_JSON)).unwrap();
            black_box(match_stats_lines(&stats, 80).len());
        })
    });
}

fn bench_schedule_refresh_dispatch(c: &mut Criterion) {
    let matches = sample_matches(200);
    c.bench_function("schedule_refresh_dispatch", |b| {
        b.iter(|| {
            let mut app = App::new(Config::default());
            app.dispatch(Msg::CategorySelected(Category::hot()));
            let cmds = app.dispatch(Msg::FetchSucceeded {
                subject_id: "hot".to_string(),
                payload: Payload::Schedule(black_box(matches.clone())),
            });
            black_box(cmds.len());
        })
    });
}

criterion_group!(
    perf,
    bench_schedule_parse,
    bench_stats_parse_and_render,
    bench_schedule_refresh_dispatch
);
criterion_main!(perf);
