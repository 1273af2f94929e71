use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::errors::ApiError;
use crate::http_client::http_client;
use crate::model::{
    Category, GoalTable, LiveTextEntry, Match, MatchStats, MatchType, Period, PlayerStatRow,
    TeamInfo, TeamStat, order_live_text, sort_schedule, split_player_stats,
};
use crate::msg::ScheduleRequest;

const CATEGORIES_URL: &str = "https://matchweb.sports.qq.com/matchUnion/cateColumns";
const SCHEDULE_URL: &str = "https://matchweb.sports.qq.com/matchUnion/list";
const MATCH_DETAIL_URL: &str = "https://matchweb.sports.qq.com/kbs/matchDetail";
const TEXT_LIVE_INDEX_URL: &str = "https://app.sports.qq.com/textLive/index";
const TEXT_LIVE_DETAIL_URL: &str = "https://matchweb.sports.qq.com/textLive/detail";
const STATS_URL: &str = "https://app.sports.qq.com/match/statDetail";

/// Remote data the dashboard needs. Implementations are called from worker
/// threads and must not touch UI state.
pub trait SportsApi: Send + Sync {
    /// Category list with the synthetic Hot category first.
    fn fetch_categories(&self) -> Result<Vec<Category>>;

    /// Competitive matches, days ascending, source order within a day.
    fn fetch_schedule(&self, request: &ScheduleRequest) -> Result<Vec<Match>>;

    fn fetch_has_live_text(&self, match_id: &str) -> Result<bool>;

    /// At most `max_count` entries, ordered by index.
    fn fetch_live_text(&self, match_id: &str, max_count: usize) -> Result<Vec<LiveTextEntry>>;

    fn fetch_match_stats(&self, match_id: &str) -> Result<MatchStats>;
}

pub struct QqSportsApi {
    timeout: Duration,
}

impl QqSportsApi {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn get(&self, url: &str, params: &[(&str, &str)]) -> Result<String> {
        let client = http_client(self.timeout)?;
        let resp = client
            .get(url)
            .query(params)
            .send()
            .with_context(|| format!("request {url} failed"))?;
        let status = resp.status();
        let body = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(ApiError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }
        Ok(body)
    }
}

impl SportsApi for QqSportsApi {
    fn fetch_categories(&self) -> Result<Vec<Category>> {
        let body = self.get(CATEGORIES_URL, &[])?;
        parse_categories_json(&body)
    }

    fn fetch_schedule(&self, request: &ScheduleRequest) -> Result<Vec<Match>> {
        let from = request.from.format("%Y-%m-%d").to_string();
        let to = request.to.format("%Y-%m-%d").to_string();
        let body = self.get(
            SCHEDULE_URL,
            &[
                ("columnId", request.column_id.as_str()),
                ("startTime", from.as_str()),
                ("endTime", to.as_str()),
            ],
        )?;
        parse_schedule_json(&body)
    }

    fn fetch_has_live_text(&self, match_id: &str) -> Result<bool> {
        let body = self.get(MATCH_DETAIL_URL, &[("mid", match_id)])?;
        parse_has_live_text_json(&body)
    }

    fn fetch_live_text(&self, match_id: &str, max_count: usize) -> Result<Vec<LiveTextEntry>> {
        let (competition_id, inner_id) = split_match_id(match_id)?;
        let body = self.get(TEXT_LIVE_INDEX_URL, &[("mid", match_id)])?;
        let mut indexes = parse_live_text_index_json(&body)?;
        if indexes.is_empty() {
            return Ok(Vec::new());
        }
        indexes.truncate(max_count);

        let ids = indexes.join(",");
        let body = self.get(
            TEXT_LIVE_DETAIL_URL,
            &[
                ("competitionId", competition_id),
                ("matchId", inner_id),
                ("ids", ids.as_str()),
            ],
        )?;
        parse_live_text_detail_json(&body, &indexes)
    }

    fn fetch_match_stats(&self, match_id: &str) -> Result<MatchStats> {
        let body = self.get(STATS_URL, &[("mid", match_id)])?;
        parse_stats_json(&body)
    }
}

/// Splits `competitionId:matchId`.
pub fn split_match_id(match_id: &str) -> Result<(&str, &str), ApiError> {
    match match_id.split_once(':') {
        Some((competition, inner))
            if !competition.is_empty() && !inner.is_empty() && !inner.contains(':') =>
        {
            Ok((competition, inner))
        }
        _ => Err(ApiError::InvalidMatchId(match_id.to_string())),
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    msg: String,
    data: Option<T>,
}

fn open_envelope<T>(raw: &str, endpoint: &'static str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let envelope: Envelope<T> = serde_json::from_str(raw.trim())
        .with_context(|| format!("invalid {endpoint} json"))?;
    if envelope.code != 0 {
        return Err(ApiError::Status {
            endpoint,
            code: envelope.code,
            msg: envelope.msg,
        }
        .into());
    }
    Ok(envelope.data.unwrap_or_default())
}

// The service is loose about numbers vs strings in the same field.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(value
        .unwrap_or_default()
        .into_iter()
        .map(|v| match v {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct RawColumnGroup {
    #[serde(default)]
    columns: Vec<RawCategory>,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    #[serde(rename = "columnId", deserialize_with = "lenient_string", default)]
    column_id: String,
    #[serde(default)]
    name: String,
}

pub fn parse_categories_json(raw: &str) -> Result<Vec<Category>> {
    let groups: Vec<RawColumnGroup> = open_envelope(raw, "fetch categories")?;
    let mut categories = vec![Category::hot()];
    categories.extend(
        groups
            .into_iter()
            .flat_map(|group| group.columns)
            .filter(|c| !c.column_id.is_empty())
            .map(|c| Category::standard(c.column_id, c.name)),
    );
    Ok(categories)
}

#[derive(Debug, Deserialize)]
struct RawMatch {
    #[serde(default, deserialize_with = "lenient_string")]
    mid: String,
    #[serde(rename = "matchType", default, deserialize_with = "lenient_string")]
    match_type: String,
    #[serde(rename = "matchDesc", default, deserialize_with = "lenient_string")]
    match_desc: String,
    #[serde(rename = "startTime", default, deserialize_with = "lenient_string")]
    start_time: String,
    #[serde(rename = "leftName", default, deserialize_with = "lenient_string")]
    left_name: String,
    #[serde(rename = "leftGoal", default, deserialize_with = "lenient_string")]
    left_goal: String,
    #[serde(rename = "rightName", default, deserialize_with = "lenient_string")]
    right_name: String,
    #[serde(rename = "rightGoal", default, deserialize_with = "lenient_string")]
    right_goal: String,
    #[serde(rename = "matchPeriod", default, deserialize_with = "lenient_string")]
    match_period: String,
    #[serde(default, deserialize_with = "lenient_string")]
    quarter: String,
    #[serde(rename = "quarterTime", default, deserialize_with = "lenient_string")]
    quarter_time: String,
}

impl From<RawMatch> for Match {
    fn from(raw: RawMatch) -> Self {
        Match {
            id: raw.mid,
            description: raw.match_desc,
            start_time: raw.start_time,
            left_team: raw.left_name,
            right_team: raw.right_name,
            left_score: raw.left_goal,
            right_score: raw.right_goal,
            period: Period::from_code(&raw.match_period),
            quarter_label: raw.quarter,
            quarter_time: raw.quarter_time,
            match_type: MatchType::from_code(&raw.match_type),
        }
    }
}

pub fn parse_schedule_json(raw: &str) -> Result<Vec<Match>> {
    let data: Value = open_envelope(raw, "fetch schedule")?;
    // An empty window comes back as `[]` rather than `{}`.
    let Value::Object(_) = data else {
        return Ok(Vec::new());
    };
    let days: BTreeMap<String, Vec<RawMatch>> =
        serde_json::from_value(data).context("invalid schedule data")?;
    let days = days
        .into_iter()
        .map(|(date, matches)| (date, matches.into_iter().map(Match::from).collect()))
        .collect();
    Ok(sort_schedule(days))
}

#[derive(Debug, Default, Deserialize)]
struct RawMatchDetail {
    #[serde(rename = "isHasTextLive", default)]
    has_text_live: bool,
}

pub fn parse_has_live_text_json(raw: &str) -> Result<bool> {
    let detail: RawMatchDetail = open_envelope(raw, "fetch match has live text")?;
    Ok(detail.has_text_live)
}

#[derive(Debug, Default, Deserialize)]
struct RawTextLiveIndex {
    #[serde(default)]
    tabs: Vec<RawTextLiveTab>,
}

#[derive(Debug, Deserialize)]
struct RawTextLiveTab {
    #[serde(default, deserialize_with = "lenient_strings")]
    index: Vec<String>,
}

pub fn parse_live_text_index_json(raw: &str) -> Result<Vec<String>> {
    let index: RawTextLiveIndex = open_envelope(raw, "fetch text live index")?;
    Ok(index
        .tabs
        .into_iter()
        .next()
        .map(|tab| tab.index)
        .unwrap_or_default())
}

#[derive(Debug, Default, Deserialize)]
struct RawTextLive {
    #[serde(default, deserialize_with = "lenient_string")]
    content: String,
    #[serde(rename = "leftGoal", default, deserialize_with = "lenient_string")]
    left_goal: String,
    #[serde(rename = "rightGoal", default, deserialize_with = "lenient_string")]
    right_goal: String,
    #[serde(rename = "indexValue", default, deserialize_with = "lenient_string")]
    index_value: String,
    #[serde(default, deserialize_with = "lenient_string")]
    plus: String,
    #[serde(rename = "kbsInfo", default)]
    kbs_info: Option<RawKbsInfo>,
}

#[derive(Debug, Default, Deserialize)]
struct RawKbsInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    quarter: String,
    #[serde(default, deserialize_with = "lenient_string")]
    time: String,
}

/// The detail endpoint answers with a three element array whose middle
/// element maps index ids to entries. Ids missing from the map are skipped.
pub fn parse_live_text_detail_json(raw: &str, indexes: &[String]) -> Result<Vec<LiveTextEntry>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let parts: Vec<Value> = serde_json::from_str(trimmed).context("invalid text live json")?;
    if parts.len() != 3 {
        return Err(ApiError::Malformed {
            endpoint: "text live detail",
            detail: format!("expected 3 elements, got {}", parts.len()),
        }
        .into());
    }
    let mut by_id: BTreeMap<String, RawTextLive> = match parts.into_iter().nth(1) {
        Some(Value::Object(map)) => serde_json::from_value(Value::Object(map))
            .context("invalid text live entries")?,
        _ => BTreeMap::new(),
    };

    let mut entries: Vec<LiveTextEntry> = indexes
        .iter()
        .filter_map(|id| by_id.remove(id))
        .map(|raw| {
            let kbs = raw.kbs_info.unwrap_or_default();
            LiveTextEntry {
                content: raw.content,
                left_goal: raw.left_goal,
                right_goal: raw.right_goal,
                index: raw.index_value,
                plus: raw.plus,
                quarter: kbs.quarter,
                time: kbs.time,
            }
        })
        .collect();
    order_live_text(&mut entries);
    Ok(entries)
}

#[derive(Debug, Default, Deserialize)]
struct RawStatsData {
    #[serde(rename = "teamInfo", default)]
    team_info: Option<RawTeamInfo>,
    #[serde(rename = "livePeriod", default, deserialize_with = "lenient_string")]
    live_period: String,
    #[serde(default)]
    stats: Vec<RawStatSection>,
}

#[derive(Debug, Deserialize)]
struct RawTeamInfo {
    #[serde(rename = "leftName", default, deserialize_with = "lenient_string")]
    left_name: String,
    #[serde(rename = "rightName", default, deserialize_with = "lenient_string")]
    right_name: String,
}

#[derive(Debug, Deserialize)]
struct RawStatSection {
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    kind: String,
    #[serde(default)]
    goals: Vec<RawGoalTable>,
    #[serde(rename = "teamStats", default)]
    team_stats: Vec<RawTeamStat>,
    #[serde(rename = "playerStats", default)]
    player_stats: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawGoalTable {
    #[serde(default, deserialize_with = "lenient_strings")]
    head: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct RawTeamStat {
    #[serde(rename = "leftVal", default, deserialize_with = "lenient_string")]
    left_val: String,
    #[serde(rename = "rightVal", default, deserialize_with = "lenient_string")]
    right_val: String,
    #[serde(default, deserialize_with = "lenient_string")]
    text: String,
}

#[derive(Debug, Deserialize)]
struct RawPlayerStat {
    #[serde(default, deserialize_with = "lenient_strings")]
    head: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    row: Vec<String>,
}

// Section type codes used by the stats endpoint.
const SECTION_GOALS: &str = "12";
const SECTION_TEAM_BASKETBALL: &str = "14";
const SECTION_TEAM_FOOTBALL: &str = "102";
const SECTION_PLAYERS: &str = "15";

fn value_to_cell(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub fn parse_stats_json(raw: &str) -> Result<MatchStats> {
    let data: RawStatsData = open_envelope(raw, "fetch stats")?;
    let mut stats = MatchStats::empty(Period::from_code(&data.live_period));
    stats.teams = data.team_info.map(|t| TeamInfo {
        left_name: t.left_name,
        right_name: t.right_name,
    });

    for section in data.stats {
        match section.kind.as_str() {
            SECTION_GOALS => {
                stats.goals = section.goals.into_iter().next().map(|g| GoalTable {
                    head: g.head,
                    rows: g
                        .rows
                        .into_iter()
                        .map(|row| row.into_iter().map(value_to_cell).collect())
                        .collect(),
                });
            }
            SECTION_TEAM_BASKETBALL | SECTION_TEAM_FOOTBALL => {
                stats.team_stats = section
                    .team_stats
                    .into_iter()
                    .map(|t| TeamStat {
                        left: t.left_val,
                        right: t.right_val,
                        text: t.text,
                    })
                    .collect();
            }
            SECTION_PLAYERS => {
                let rows: Vec<RawPlayerStat> = match section.player_stats {
                    Some(value @ Value::Array(_)) => {
                        serde_json::from_value(value).context("invalid player stats")?
                    }
                    _ => Vec::new(),
                };
                stats.player_stats = split_player_stats(
                    rows.into_iter()
                        .map(|r| PlayerStatRow {
                            head: r.head,
                            row: r.row,
                        })
                        .collect(),
                );
            }
            _ => {}
        }
    }

    Ok(stats)
}
