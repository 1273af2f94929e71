use chrono::NaiveDate;

pub const HOT_CATEGORY_ID: &str = "hot";
pub const HOT_CATEGORY_NAME: &str = "Hot";

// Schedule entries the remote service files under real categories although they
// are programmes rather than matches.
const NON_MATCH_DESCRIPTIONS: [&str; 3] = ["NBA经典赛", "篮球直播节目", "发布会"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    Standard,
    Hot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub kind: CategoryKind,
}

impl Category {
    pub fn hot() -> Self {
        Self {
            id: HOT_CATEGORY_ID.to_string(),
            name: HOT_CATEGORY_NAME.to_string(),
            kind: CategoryKind::Hot,
        }
    }

    pub fn standard(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: CategoryKind::Standard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Coming,
    InProgress,
    Ended,
}

impl Period {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "1" => Period::InProgress,
            "2" => Period::Ended,
            _ => Period::Coming,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchType {
    Football,
    Basketball,
    Snooker,
    Other,
    Unknown(String),
}

impl MatchType {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "1" => MatchType::Football,
            "2" => MatchType::Basketball,
            "3" => MatchType::Snooker,
            "4" => MatchType::Other,
            other => MatchType::Unknown(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Composite `competitionId:matchId`.
    pub id: String,
    pub description: String,
    pub start_time: String,
    pub left_team: String,
    pub right_team: String,
    pub left_score: String,
    pub right_score: String,
    pub period: Period,
    pub quarter_label: String,
    pub quarter_time: String,
    pub match_type: MatchType,
}

impl Match {
    pub fn is_competitive(&self) -> bool {
        self.match_type != MatchType::Other
            && !NON_MATCH_DESCRIPTIONS.contains(&self.description.as_str())
    }
}

/// Flattens a date-keyed schedule into one list: days ascending, source order
/// within a day, non-competitive entries dropped. Keys that are not
/// `YYYY-MM-DD` dates are skipped.
pub fn sort_schedule(days: Vec<(String, Vec<Match>)>) -> Vec<Match> {
    let mut dated: Vec<(NaiveDate, Vec<Match>)> = days
        .into_iter()
        .filter_map(|(key, matches)| {
            NaiveDate::parse_from_str(key.trim(), "%Y-%m-%d")
                .ok()
                .map(|date| (date, matches))
        })
        .collect();
    dated.sort_by_key(|(date, _)| *date);

    dated
        .into_iter()
        .flat_map(|(_, matches)| matches)
        .filter(Match::is_competitive)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveTextEntry {
    pub content: String,
    pub left_goal: String,
    pub right_goal: String,
    /// Two-part key `"<n>_<m>"`.
    pub index: String,
    pub plus: String,
    pub quarter: String,
    pub time: String,
}

impl LiveTextEntry {
    pub fn index_number(&self) -> Option<i64> {
        let mut parts = self.index.split('_');
        let first = parts.next()?;
        parts.next()?;
        if parts.next().is_some() {
            return None;
        }
        first.trim().parse::<i64>().ok()
    }
}

/// Stable ascending sort on the numeric head of each entry's index. An entry
/// whose index does not parse inherits the key of the entry before it, so it
/// stays next to its neighbour instead of jumping to one end.
pub fn order_live_text(entries: &mut Vec<LiveTextEntry>) {
    let mut last = i64::MIN;
    let mut keyed: Vec<(i64, LiveTextEntry)> = entries
        .drain(..)
        .map(|entry| {
            if let Some(n) = entry.index_number() {
                last = n;
            }
            (last, entry)
        })
        .collect();
    keyed.sort_by_key(|(key, _)| *key);
    entries.extend(keyed.into_iter().map(|(_, entry)| entry));
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveText {
    pub has_data: bool,
    pub entries: Vec<LiveTextEntry>,
}

impl LiveText {
    pub fn none() -> Self {
        Self {
            has_data: false,
            entries: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamInfo {
    pub left_name: String,
    pub right_name: String,
}

impl TeamInfo {
    pub fn name_width(&self) -> usize {
        self.left_name
            .chars()
            .count()
            .max(self.right_name.chars().count())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalTable {
    pub head: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamStat {
    pub left: String,
    pub right: String,
    pub text: String,
}

impl TeamStat {
    /// Left/right shares in `0.0..=1.0`; zeros when either side is not numeric.
    pub fn shares(&self) -> (f64, f64) {
        let parse = |raw: &str| raw.trim().trim_end_matches('%').parse::<f64>().ok();
        match (parse(&self.left), parse(&self.right)) {
            (Some(l), Some(r)) if l + r != 0.0 => (l / (l + r), r / (l + r)),
            _ => (0.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerStatRow {
    pub head: Vec<String>,
    pub row: Vec<String>,
}

impl PlayerStatRow {
    pub fn is_blank(&self) -> bool {
        self.head.is_empty() && self.row.is_empty()
    }

    /// Players listed with no time on court/pitch.
    pub fn is_unused_player(&self) -> bool {
        self.row.get(2).is_some_and(|cell| cell == "0'0\"")
    }
}

/// Groups a flat player-stat list into one block per team; a header row
/// starts a new block.
pub fn split_player_stats(rows: Vec<PlayerStatRow>) -> Vec<Vec<PlayerStatRow>> {
    let mut teams = Vec::new();
    let mut current: Vec<PlayerStatRow> = Vec::new();
    for row in rows {
        if row.is_blank() {
            continue;
        }
        if !row.head.is_empty() && !current.is_empty() {
            teams.push(std::mem::take(&mut current));
        }
        current.push(row);
    }
    if !current.is_empty() {
        teams.push(current);
    }
    teams
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchStats {
    pub teams: Option<TeamInfo>,
    pub goals: Option<GoalTable>,
    pub team_stats: Vec<TeamStat>,
    pub player_stats: Vec<Vec<PlayerStatRow>>,
    pub period: Period,
}

impl MatchStats {
    pub fn empty(period: Period) -> Self {
        Self {
            teams: None,
            goals: None,
            team_stats: Vec::new(),
            player_stats: Vec::new(),
            period,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_none() && self.team_stats.is_empty() && self.player_stats.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(index: &str) -> LiveTextEntry {
        LiveTextEntry {
            index: index.to_string(),
            content: index.to_string(),
            ..LiveTextEntry::default()
        }
    }

    #[test]
    fn live_text_sorted_by_numeric_head() {
        let mut entries = vec![entry("12_1"), entry("3_9"), entry("7_0")];
        order_live_text(&mut entries);
        let order: Vec<_> = entries.iter().map(|e| e.index.as_str()).collect();
        assert_eq!(order, vec!["3_9", "7_0", "12_1"]);
    }

    #[test]
    fn live_text_ties_keep_source_order() {
        let mut entries = vec![entry("5_2"), entry("5_1"), entry("4_0")];
        order_live_text(&mut entries);
        let order: Vec<_> = entries.iter().map(|e| e.index.as_str()).collect();
        assert_eq!(order, vec!["4_0", "5_2", "5_1"]);
    }

    #[test]
    fn unparseable_index_stays_with_its_neighbour() {
        let mut entries = vec![entry("9_0"), entry("oops"), entry("2_0")];
        order_live_text(&mut entries);
        let order: Vec<_> = entries.iter().map(|e| e.index.as_str()).collect();
        assert_eq!(order, vec!["2_0", "9_0", "oops"]);
    }

    #[test]
    fn player_stats_split_on_header_rows() {
        let header = |name: &str| PlayerStatRow {
            head: vec![name.to_string()],
            row: Vec::new(),
        };
        let player = |name: &str| PlayerStatRow {
            head: Vec::new(),
            row: vec![name.to_string()],
        };
        let teams = split_player_stats(vec![
            header("home"),
            player("a"),
            PlayerStatRow::default(),
            header("away"),
            player("b"),
        ]);
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].len(), 2);
        assert_eq!(teams[1][1].row, vec!["b".to_string()]);
    }

    #[test]
    fn team_stat_shares_handle_percentages() {
        let stat = TeamStat {
            left: "60%".to_string(),
            right: "40%".to_string(),
            text: "Possession".to_string(),
        };
        let (l, r) = stat.shares();
        assert!((l - 0.6).abs() < 1e-9);
        assert!((r - 0.4).abs() < 1e-9);

        let bad = TeamStat {
            left: "-".to_string(),
            right: "3".to_string(),
            text: "Fouls".to_string(),
        };
        assert_eq!(bad.shares(), (0.0, 0.0));
    }
}
