use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Prefix of the canonical display form of an episode number (`#48`).
pub const EPISODE_ID_PREFIX: &str = "#";

/// Title shown for rows that have no title yet.
pub const UNTITLED_LABEL: &str = "（タイトル未定）";

// ============================================================================
// Status
// ============================================================================

/// Production pipeline stage. Ordered by stage, but transitions are free:
/// any status may be set from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EpisodeStatus {
    #[serde(rename = "未")]
    Unstarted,
    #[serde(rename = "台本完")]
    ScriptDone,
    #[serde(rename = "撮影済")]
    Filmed,
    #[serde(rename = "編集済")]
    Edited,
    #[serde(rename = "UP済")]
    Published,
}

impl EpisodeStatus {
    pub const ALL: [EpisodeStatus; 5] = [
        Self::Unstarted,
        Self::ScriptDone,
        Self::Filmed,
        Self::Edited,
        Self::Published,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Unstarted => "未",
            Self::ScriptDone => "台本完",
            Self::Filmed => "撮影済",
            Self::Edited => "編集済",
            Self::Published => "UP済",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Unstarted => "⏳",
            Self::ScriptDone => "📝",
            Self::Filmed => "🎬",
            Self::Edited => "✂️",
            Self::Published => "✅",
        }
    }

    /// Strict lookup by sheet label.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|s| s.label() == label)
    }
}

impl Default for EpisodeStatus {
    fn default() -> Self {
        Self::Unstarted
    }
}

impl std::fmt::Display for EpisodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Lenient conversion used at the sheet boundary: unknown labels fall back
/// to `Unstarted`.
impl From<String> for EpisodeStatus {
    fn from(s: String) -> Self {
        match Self::from_label(&s) {
            Some(status) => status,
            None => {
                if !s.trim().is_empty() {
                    log::warn!("Unknown status label {:?}, treating as {}", s, Self::Unstarted);
                }
                Self::Unstarted
            }
        }
    }
}

// ============================================================================
// Episode ids
// ============================================================================

/// Episode number as found in the sheet.
///
/// The canonical form is `Canonical(n)`, rendered `#n`. `Bare(n)` is a plain
/// integer that has not been re-based yet, and `Malformed` keeps whatever
/// text could not be read as either.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EpisodeId {
    Canonical(u32),
    Bare(u32),
    Malformed(String),
}

impl EpisodeId {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Some(n) = parse_digits(trimmed) {
            return Self::Bare(n);
        }
        if let Some(n) = trimmed
            .strip_prefix(EPISODE_ID_PREFIX)
            .and_then(|rest| parse_digits(rest.trim()))
        {
            return Self::Canonical(n);
        }
        Self::Malformed(raw.to_string())
    }

    /// Numeric portion used for max-id computations. Every non-digit
    /// character is ignored; text without digits counts as 0.
    pub fn value(&self) -> u32 {
        match self {
            Self::Canonical(n) | Self::Bare(n) => *n,
            Self::Malformed(text) => text
                .chars()
                .filter(char::is_ascii_digit)
                .collect::<String>()
                .parse()
                .unwrap_or(0),
        }
    }

    pub fn number(&self) -> Option<u32> {
        match self {
            Self::Canonical(n) | Self::Bare(n) => Some(*n),
            Self::Malformed(_) => None,
        }
    }

    /// Whether two ids name the same episode regardless of formatting,
    /// so `#48` matches a bare `48`.
    pub fn same_episode(&self, other: &EpisodeId) -> bool {
        match (self.number(), other.number()) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }
}

impl std::fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Canonical(n) => write!(f, "{}{}", EPISODE_ID_PREFIX, n),
            Self::Bare(n) => write!(f, "{}", n),
            Self::Malformed(text) => f.write_str(text),
        }
    }
}

fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

// ============================================================================
// Calendar months
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn succ(self) -> Self {
        self.offset(1)
    }

    pub fn pred(self) -> Self {
        self.offset(-1)
    }

    pub fn offset(self, months: i32) -> Self {
        let index = self.index() + months;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    fn index(self) -> i32 {
        self.year * 12 + self.month as i32 - 1
    }
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> Self {
        Self::of(date)
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}年{}月", self.year, self.month)
    }
}

/// Year for a month read without one: whichever of last, this or next year
/// puts `month` closest to `today`. Ties go to the later year.
pub fn infer_year(month: u32, today: NaiveDate) -> i32 {
    let anchor = YearMonth::of(today).index();
    let mut best = today.year();
    let mut best_distance = i32::MAX;
    for year in today.year() - 1..=today.year() + 1 {
        let distance = (YearMonth { year, month }.index() - anchor).abs();
        if distance <= best_distance {
            best = year;
            best_distance = distance;
        }
    }
    best
}

/// Date for a sheet `M/D`. Among last, this and next year the one whose
/// weekday matches the stored label wins, nearest to `today` first. With no
/// match the year comes from [`infer_year`].
pub fn resolve_month_day(
    month: u32,
    day: u32,
    stored_weekday: &str,
    today: NaiveDate,
) -> Option<NaiveDate> {
    let stored = stored_weekday.trim();
    let anchor = YearMonth::of(today).index();
    let matching = (today.year() - 1..=today.year() + 1)
        .filter_map(|year| NaiveDate::from_ymd_opt(year, month, day))
        .filter(|date| weekday_label(date.weekday()) == stored)
        .min_by_key(|date| ((YearMonth::of(*date).index() - anchor).abs(), -date.year()));
    matching.or_else(|| NaiveDate::from_ymd_opt(infer_year(month, today), month, day))
}

pub fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "月",
        Weekday::Tue => "火",
        Weekday::Wed => "水",
        Weekday::Thu => "木",
        Weekday::Fri => "金",
        Weekday::Sat => "土",
        Weekday::Sun => "日",
    }
}

// ============================================================================
// Publish dates
// ============================================================================

/// Scheduled publish date. The sheet stores `M/D` without a year, so the
/// year is resolved when the row is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishDate {
    Day(NaiveDate),
    /// Text that is not a date; kept verbatim together with the weekday
    /// label stored next to it.
    Unparsed { text: String, weekday: String },
}

impl PublishDate {
    /// Reads `M/D` (year resolved from the stored weekday and `today`) or
    /// `YYYY/M/D`.
    pub fn parse(text: &str, stored_weekday: &str, today: NaiveDate) -> Self {
        let parts: Vec<&str> = text.trim().split('/').map(str::trim).collect();
        let parsed = match parts.as_slice() {
            [m, d] => match (m.parse::<u32>(), d.parse::<u32>()) {
                (Ok(m), Ok(d)) => resolve_month_day(m, d, stored_weekday, today),
                _ => None,
            },
            [y, m, d] => match (y.parse::<i32>(), m.parse::<u32>(), d.parse::<u32>()) {
                (Ok(y), Ok(m), Ok(d)) => NaiveDate::from_ymd_opt(y, m, d),
                _ => None,
            },
            _ => None,
        };
        match parsed {
            Some(date) => Self::Day(date),
            None => Self::Unparsed {
                text: text.to_string(),
                weekday: stored_weekday.to_string(),
            },
        }
    }

    pub fn day(&self) -> Option<NaiveDate> {
        match self {
            Self::Day(date) => Some(*date),
            Self::Unparsed { .. } => None,
        }
    }

    /// `M/D` with no leading zeros.
    pub fn to_sheet_text(&self) -> String {
        match self {
            Self::Day(date) => format!("{}/{}", date.month(), date.day()),
            Self::Unparsed { text, .. } => text.clone(),
        }
    }

    pub fn weekday_label(&self) -> &str {
        match self {
            Self::Day(date) => weekday_label(date.weekday()),
            Self::Unparsed { weekday, .. } => weekday.as_str(),
        }
    }
}

// ============================================================================
// Episodes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: EpisodeId,
    pub date: PublishDate,
    pub title: String,
    pub status: EpisodeStatus,
    pub script: String,
}

impl Episode {
    /// Fresh row for a generated weekday.
    pub fn scheduled(number: u32, date: NaiveDate) -> Self {
        Self {
            id: EpisodeId::Canonical(number),
            date: PublishDate::Day(date),
            title: String::new(),
            status: EpisodeStatus::Unstarted,
            script: String::new(),
        }
    }

    pub fn weekday_label(&self) -> &str {
        self.date.weekday_label()
    }

    pub fn year_month(&self) -> Option<YearMonth> {
        self.date.day().map(YearMonth::of)
    }

    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            UNTITLED_LABEL
        } else {
            self.title.as_str()
        }
    }
}
