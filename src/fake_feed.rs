//! Offline data source used with `SPORTX_SOURCE=demo`. Live matches drift a
//! little on every fetch so polling is visible without the network.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use chrono::{Duration as ChronoDuration, Local, NaiveDate};
use rand::Rng;

use crate::api::{SportsApi, split_match_id};
use crate::model::{
    Category, GoalTable, HOT_CATEGORY_ID, LiveTextEntry, Match, MatchStats, MatchType, Period,
    PlayerStatRow, TeamInfo, TeamStat, order_live_text, sort_schedule, split_player_stats,
};
use crate::msg::ScheduleRequest;

const BASKETBALL_COLUMN: &str = "100000";
const FOOTBALL_COLUMN: &str = "8";

struct Fixture {
    id: &'static str,
    column: &'static str,
    description: &'static str,
    day_offset: i64,
    kickoff: &'static str,
    left: &'static str,
    right: &'static str,
    period: Period,
    match_type: MatchType,
}

fn fixtures() -> Vec<Fixture> {
    vec![
        Fixture {
            id: "100000:54431",
            column: BASKETBALL_COLUMN,
            description: "NBA Regular Season",
            day_offset: 0,
            kickoff: "08:00:00",
            left: "Lakers",
            right: "Celtics",
            period: Period::Ended,
            match_type: MatchType::Basketball,
        },
        Fixture {
            id: "100000:54432",
            column: BASKETBALL_COLUMN,
            description: "NBA Regular Season",
            day_offset: 0,
            kickoff: "10:30:00",
            left: "Warriors",
            right: "Nuggets",
            period: Period::InProgress,
            match_type: MatchType::Basketball,
        },
        Fixture {
            id: "100000:54433",
            column: BASKETBALL_COLUMN,
            description: "NBA All-Star Draft",
            day_offset: 1,
            kickoff: "09:00:00",
            left: "Team A",
            right: "Team B",
            period: Period::Coming,
            match_type: MatchType::Other,
        },
        Fixture {
            id: "100000:54434",
            column: BASKETBALL_COLUMN,
            description: "NBA Regular Season",
            day_offset: 1,
            kickoff: "11:00:00",
            left: "Bucks",
            right: "Heat",
            period: Period::Coming,
            match_type: MatchType::Basketball,
        },
        Fixture {
            id: "8:2024091",
            column: FOOTBALL_COLUMN,
            description: "Premier League",
            day_offset: 0,
            kickoff: "19:30:00",
            left: "Arsenal",
            right: "Chelsea",
            period: Period::InProgress,
            match_type: MatchType::Football,
        },
        Fixture {
            id: "8:2024092",
            column: FOOTBALL_COLUMN,
            description: "Premier League",
            day_offset: 2,
            kickoff: "22:00:00",
            left: "Liverpool",
            right: "Everton",
            period: Period::Coming,
            match_type: MatchType::Football,
        },
    ]
}

pub struct DemoApi {
    today: NaiveDate,
    scores: Mutex<HashMap<String, (u32, u32)>>,
}

impl Default for DemoApi {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}

impl DemoApi {
    pub fn new(today: NaiveDate) -> Self {
        let scores = fixtures()
            .into_iter()
            .filter(|f| f.period != Period::Coming)
            .map(|f| {
                let seed = match f.match_type {
                    MatchType::Basketball => (88, 84),
                    _ => (1, 0),
                };
                (f.id.to_string(), seed)
            })
            .collect();
        Self {
            today,
            scores: Mutex::new(scores),
        }
    }

    fn fixture(&self, match_id: &str) -> Result<Fixture> {
        split_match_id(match_id)?;
        fixtures()
            .into_iter()
            .find(|f| f.id == match_id)
            .ok_or_else(|| anyhow!("unknown demo match {match_id}"))
    }

    fn score(&self, fixture: &Fixture) -> (u32, u32) {
        let mut scores = match self.scores.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let Some(score) = scores.get_mut(fixture.id) else {
            return (0, 0);
        };
        if fixture.period == Period::InProgress {
            let mut rng = rand::thread_rng();
            match fixture.match_type {
                MatchType::Basketball => {
                    score.0 += rng.gen_range(0..3);
                    score.1 += rng.gen_range(0..3);
                }
                _ if rng.gen_bool(0.1) => {
                    if rng.gen_bool(0.5) {
                        score.0 += 1;
                    } else {
                        score.1 += 1;
                    }
                }
                _ => {}
            }
        }
        *score
    }

    fn to_match(&self, fixture: &Fixture) -> Match {
        let date = self.today + ChronoDuration::days(fixture.day_offset);
        let (left, right) = if fixture.period == Period::Coming {
            (String::new(), String::new())
        } else {
            let (l, r) = self.score(fixture);
            (l.to_string(), r.to_string())
        };
        let (quarter_label, quarter_time) = match (fixture.period, &fixture.match_type) {
            (Period::InProgress, MatchType::Basketball) => ("Q3".to_string(), "05:12".to_string()),
            (Period::InProgress, _) => ("2nd half".to_string(), "67'".to_string()),
            _ => (String::new(), String::new()),
        };
        Match {
            id: fixture.id.to_string(),
            description: fixture.description.to_string(),
            start_time: format!("{} {}", date.format("%Y-%m-%d"), fixture.kickoff),
            left_team: fixture.left.to_string(),
            right_team: fixture.right.to_string(),
            left_score: left,
            right_score: right,
            period: fixture.period,
            quarter_label,
            quarter_time,
            match_type: fixture.match_type.clone(),
        }
    }
}

impl SportsApi for DemoApi {
    fn fetch_categories(&self) -> Result<Vec<Category>> {
        Ok(vec![
            Category::hot(),
            Category::standard(BASKETBALL_COLUMN, "NBA"),
            Category::standard(FOOTBALL_COLUMN, "Premier League"),
        ])
    }

    fn fetch_schedule(&self, request: &ScheduleRequest) -> Result<Vec<Match>> {
        let hot = request.column_id == HOT_CATEGORY_ID;
        let matches = fixtures()
            .iter()
            .filter(|f| hot || f.column == request.column_id)
            .filter(|f| {
                let date = self.today + ChronoDuration::days(f.day_offset);
                date >= request.from && date < request.to
            })
            .map(|f| self.to_match(f))
            .collect::<Vec<_>>();
        let mut by_day: Vec<(String, Vec<Match>)> = Vec::new();
        for m in matches {
            let day = m.start_time.get(..10).unwrap_or_default().to_string();
            match by_day.iter_mut().find(|(d, _)| *d == day) {
                Some((_, list)) => list.push(m),
                None => by_day.push((day, vec![m])),
            }
        }
        Ok(sort_schedule(by_day))
    }

    fn fetch_has_live_text(&self, match_id: &str) -> Result<bool> {
        Ok(self.fixture(match_id)?.period != Period::Coming)
    }

    fn fetch_live_text(&self, match_id: &str, max_count: usize) -> Result<Vec<LiveTextEntry>> {
        let fixture = self.fixture(match_id)?;
        if fixture.period == Period::Coming {
            return Ok(Vec::new());
        }
        let (left, right) = self.score(&fixture);
        let lines = [
            "Tip-off, possession to the home side",
            "Quick ball movement, open look from the corner",
            "Timeout called",
            "Defensive rebound, fast break",
            "Foul on the drive, two free throws",
            "Substitution",
            "Shot blocked at the rim",
        ];
        let total = 24usize;
        let mut entries = (0..total)
            .rev()
            .take(max_count)
            .map(|i| LiveTextEntry {
                content: lines[i % lines.len()].to_string(),
                left_goal: left.to_string(),
                right_goal: right.to_string(),
                index: format!("{}_1", 1000 + i),
                plus: String::new(),
                quarter: if i < 12 { "Q1" } else { "Q2" }.to_string(),
                time: format!("{:02}:{:02}", 11 - (i % 12), (i * 7) % 60),
            })
            .collect::<Vec<_>>();
        order_live_text(&mut entries);
        Ok(entries)
    }

    fn fetch_match_stats(&self, match_id: &str) -> Result<MatchStats> {
        let fixture = self.fixture(match_id)?;
        let mut stats = MatchStats::empty(fixture.period);
        if fixture.period == Period::Coming {
            return Ok(stats);
        }
        let (left, right) = self.score(&fixture);
        stats.teams = Some(TeamInfo {
            left_name: fixture.left.to_string(),
            right_name: fixture.right.to_string(),
        });
        stats.goals = Some(GoalTable {
            head: vec![
                String::new(),
                "Q1".to_string(),
                "Q2".to_string(),
                "Total".to_string(),
            ],
            rows: vec![
                vec![
                    fixture.left.to_string(),
                    (left / 2).to_string(),
                    (left - left / 2).to_string(),
                    left.to_string(),
                ],
                vec![
                    fixture.right.to_string(),
                    (right / 2).to_string(),
                    (right - right / 2).to_string(),
                    right.to_string(),
                ],
            ],
        });
        let mut rng = rand::thread_rng();
        stats.team_stats = ["Rebounds", "Assists", "Steals"]
            .iter()
            .map(|text| TeamStat {
                left: rng.gen_range(5..40).to_string(),
                right: rng.gen_range(5..40).to_string(),
                text: text.to_string(),
            })
            .collect();
        let head = |name: &str| PlayerStatRow {
            head: vec![name.to_string(), "PTS".to_string(), "REB".to_string()],
            row: Vec::new(),
        };
        let player = |name: &str, pts: u32| PlayerStatRow {
            head: Vec::new(),
            row: vec![name.to_string(), pts.to_string(), (pts / 3).to_string()],
        };
        stats.player_stats = split_player_stats(vec![
            head(fixture.left),
            player("Guard", left / 3),
            player("Forward", left / 4),
            head(fixture.right),
            player("Center", right / 3),
            player("Wing", right / 4),
        ]);
        Ok(stats)
    }
}
