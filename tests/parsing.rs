use std::fs;
use std::path::PathBuf;

use sportx_terminal::api::{
    parse_categories_json, parse_has_live_text_json, parse_live_text_detail_json,
    parse_live_text_index_json, parse_schedule_json, parse_stats_json,
};
use sportx_terminal::model::{CategoryKind, MatchType, Period};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture read")
}

#[test]
fn categories_start_with_hot_and_skip_blank_columns() {
    let raw = read_fixture("categories.json");
    let categories = parse_categories_json(&raw).expect("parse categories");

    let ids: Vec<&str> = categories.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["hot", "100000", "100008", "8"]);
    assert_eq!(categories[0].kind, CategoryKind::Hot);
    assert!(categories[1..].iter().all(|c| c.kind == CategoryKind::Standard));
}

#[test]
fn schedule_sorts_days_and_drops_non_matches() {
    let raw = read_fixture("schedule.json");
    let matches = parse_schedule_json(&raw).expect("parse schedule");

    let ids: Vec<&str> = matches.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["8:2024871", "100000:10042400225"]);

    let first = &matches[0];
    assert_eq!(first.match_type, MatchType::Football);
    assert_eq!(first.period, Period::InProgress);
    assert_eq!(first.left_score, "2");
    assert_eq!(first.quarter_time, "61'");
    assert_eq!(matches[1].period, Period::Ended);
}

#[test]
fn schedule_error_code_is_reported() {
    let raw = r#"{"code": -1, "msg": "column not found", "data": null}"#;
    let err = parse_schedule_json(raw).unwrap_err();
    let text = format!("{err:#}");
    assert!(text.contains("fetch schedule failed"));
    assert!(text.contains("column not found"));
}

#[test]
fn has_live_text_reads_flag() {
    let raw = read_fixture("match_detail.json");
    assert!(!parse_has_live_text_json(&raw).expect("parse detail"));
}

#[test]
fn text_live_index_uses_first_tab() {
    let raw = read_fixture("text_live_index.json");
    let index = parse_live_text_index_json(&raw).expect("parse index");
    assert_eq!(index, vec!["2002", "2001", "2000", "1999", "1998"]);
}

#[test]
fn text_live_detail_orders_entries_and_skips_missing_ids() {
    let raw = read_fixture("text_live_detail.json");
    let ids: Vec<String> = ["2002", "2001", "2000", "1999"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let entries = parse_live_text_detail_json(&raw, &ids).expect("parse detail");

    let indexes: Vec<&str> = entries.iter().map(|e| e.index.as_str()).collect();
    assert_eq!(indexes, vec!["2000_1", "2001_1", "2002_1"]);
    assert_eq!(entries[2].plus, "+3");
    assert_eq!(entries[2].quarter, "Q1");
    assert_eq!(entries[2].time, "11:02");
}

#[test]
fn text_live_detail_rejects_wrong_shape() {
    let ids = vec!["1".to_string()];
    assert!(parse_live_text_detail_json("[0, {}]", &ids).is_err());
    assert!(parse_live_text_detail_json("null", &ids).unwrap().is_empty());
}

#[test]
fn stats_sections_are_picked_by_type() {
    let raw = read_fixture("stats.json");
    let stats = parse_stats_json(&raw).expect("parse stats");

    assert_eq!(stats.period, Period::Ended);
    let teams = stats.teams.as_ref().expect("team info");
    assert_eq!(teams.left_name, "Thunder");

    let goals = stats.goals.as_ref().expect("goal table");
    assert_eq!(goals.head.len(), 6);
    assert_eq!(goals.rows[1], vec!["Pacers", "26", "24", "30", "24", "104"]);

    assert_eq!(stats.team_stats.len(), 2);
    assert_eq!(stats.team_stats[1].left, "22");

    assert_eq!(stats.player_stats.len(), 2);
    assert_eq!(stats.player_stats[0].len(), 3);
    assert_eq!(stats.player_stats[1][1].row[0], "Haliburton");
}
