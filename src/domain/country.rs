/// Pseudo-rows the aggregator mixes into its country table. They stay in the
/// snapshot for consumers that want them but never enter the leaderboard.
const AGGREGATE_ROWS: [&str; 10] = [
    "World", "Total:", "Europe", "North America", "South America",
    "Asia", "Africa", "Oceania", "Diamond Princess", "MS Zaandam",
];

/// Converts a textual counter into an integer.
///
/// The aggregator formats numbers with thousands separators and sometimes
/// leaves cells empty or filled with placeholders ("N/A"). The rule is the
/// same as `parseInt` with commas stripped: take the leading signed digit
/// run, anything else yields zero.
pub fn normalize(value: &str) -> i64 {
    let cleaned: String = value.trim()
        .chars()
        .filter(|c| *c != ',')
        .collect();
    let mut chars = cleaned.chars();
    let mut number = String::new();
    match chars.next() {
        Some(c) if c == '+' || c == '-' || c.is_ascii_digit() => number.push(c),
        _ => return 0,
    }
    number.extend(chars.take_while(char::is_ascii_digit));
    number.parse().unwrap_or(0)
}

/// Renders a positive delta as "+N"; zero and negative deltas render as
/// nothing, matching how the aggregator displays its "new" columns.
pub fn signed(value: i64) -> String {
    if value > 0 {
        format!("+{value}")
    } else {
        String::new()
    }
}

/// One country's slice of a snapshot. All counters are normalized at the
/// parse boundary, so comparisons and arithmetic never see raw strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryRow {
    pub country: String,
    pub cases: i64,
    pub new_cases: i64,
    pub deaths: i64,
    pub new_deaths: i64,
    pub recovered: i64,
    pub active_cases: i64,
    pub critical_cases: i64,
    pub cases_per_million: i64,
    pub deaths_per_million: i64,
}

impl CountryRow {
    pub fn is_aggregate(&self) -> bool {
        AGGREGATE_ROWS.iter().any(|name| name.eq_ignore_ascii_case(&self.country))
    }

    pub fn new_cases_display(&self) -> String {
        signed(self.new_cases)
    }

    pub fn new_deaths_display(&self) -> String {
        signed(self.new_deaths)
    }

    /// Country name shortened for narrow screens: spaces stripped, at most
    /// seven characters.
    pub fn short_name(&self) -> String {
        self.country.replace(' ', "").chars().take(7).collect()
    }
}

/// The higher-trust figure for the home country, reported by a dedicated
/// source that updates sooner than the aggregator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, derive_more::Constructor)]
pub struct AuthoritativeFigure {
    pub cases: i64,
    pub deaths: i64,
}

/// Worldwide counters from the aggregator's headline block.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct GlobalStats {
    pub cases: i64,
    pub deaths: i64,
    pub recovered: i64,
}
