use std::collections::HashSet;
use crate::domain::CountryRow;

/// A frontend request against the latest snapshot.
#[derive(Debug, Clone, Default)]
pub struct RankQuery {
    pub country_names: Option<Vec<String>>,
    pub top: usize,
    pub by_death_count: bool,
}

impl RankQuery {
    pub fn top(top: usize) -> Self {
        Self { top, ..Default::default() }
    }

    pub fn by_names(names: Vec<String>, top: usize) -> Self {
        Self { country_names: Some(names), top, ..Default::default() }
    }
}

/// Filters, sorts and truncates the country table.
///
/// `None` means no data has been loaded yet; `Some(empty)` means the query
/// matched nothing. Callers render distinct messages for the two.
pub fn rank(rows: &[CountryRow], query: &RankQuery) -> Option<Vec<CountryRow>> {
    if rows.is_empty() {
        return None
    }

    let mut selected = match &query.country_names {
        Some(names) => select_by_names(rows, names),
        // aggregate pseudo-rows never enter the general leaderboard
        None => rows.iter()
            .filter(|row| !row.is_aggregate())
            .cloned()
            .collect(),
    };

    selected.sort_by(|a, b| {
        let (a_key, b_key) = if query.by_death_count {
            ((a.deaths, a.cases), (b.deaths, b.cases))
        } else {
            ((a.cases, a.deaths), (b.cases, b.deaths))
        };
        b_key.cmp(&a_key)
    });
    selected.truncate(query.top);
    Some(selected)
}

/// Per requested name: exact case-insensitive match first, substring match
/// as the fallback. Results are concatenated across names and de-duplicated
/// by country name, first-seen order preserved.
fn select_by_names(rows: &[CountryRow], names: &[String]) -> Vec<CountryRow> {
    let mut seen = HashSet::new();
    let mut selected = Vec::new();
    for name in names {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            continue
        }
        let exact: Vec<&CountryRow> = rows.iter()
            .filter(|row| row.country.to_lowercase() == needle)
            .collect();
        let matches = if exact.is_empty() {
            rows.iter()
                .filter(|row| row.country.to_lowercase().contains(&needle))
                .collect()
        } else {
            exact
        };
        for row in matches {
            if seen.insert(row.country.to_lowercase()) {
                selected.push(row.clone());
            }
        }
    }
    selected
}

#[cfg(test)]
mod test {
    use crate::domain::CountryRow;
    use super::{rank, RankQuery};

    fn row(country: &str, cases: i64, deaths: i64) -> CountryRow {
        CountryRow { country: country.to_string(), cases, deaths, ..Default::default() }
    }

    fn table() -> Vec<CountryRow> {
        vec![
            row("World", 500_000, 20_000),
            row("China", 81_000, 3_200),
            row("Italy", 80_000, 8_000),
            row("USA", 85_000, 1_300),
            row("Vietnam", 1_200, 35),
            row("S. Korea", 9_000, 120),
        ]
    }

    #[test]
    fn leaderboard_sorts_by_cases_and_excludes_aggregates() {
        let ranked = rank(&table(), &RankQuery::top(3)).unwrap();
        let countries: Vec<&str> = ranked.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(countries, ["USA", "China", "Italy"]);
    }

    #[test]
    fn death_ranking_swaps_the_primary_key() {
        let query = RankQuery { top: 2, by_death_count: true, ..Default::default() };
        let ranked = rank(&table(), &query).unwrap();
        let countries: Vec<&str> = ranked.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(countries, ["Italy", "China"]);
    }

    #[test]
    fn ties_break_on_the_secondary_key() {
        let rows = vec![row("A", 100, 5), row("B", 100, 9), row("C", 50, 50)];
        let ranked = rank(&rows, &RankQuery::top(3)).unwrap();
        let countries: Vec<&str> = ranked.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(countries, ["B", "A", "C"]);
    }

    #[test]
    fn truncation_never_exceeds_top() {
        for top in 0..8 {
            let ranked = rank(&table(), &RankQuery::top(top)).unwrap();
            assert!(ranked.len() <= top);
        }
    }

    #[test]
    fn exact_match_beats_substring() {
        // "S. Korea" contains no exact "korea" row, so substring kicks in
        let ranked = rank(&table(), &RankQuery::by_names(vec!["korea".to_string()], 10)).unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].country, "S. Korea");

        let ranked = rank(&table(), &RankQuery::by_names(vec!["USA".to_string()], 10)).unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].country, "USA");
    }

    #[test]
    fn multi_name_queries_deduplicate() {
        let names = vec!["vietnam".to_string(), "viet".to_string()];
        let ranked = rank(&table(), &RankQuery::by_names(names, 10)).unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].country, "Vietnam");
    }

    #[test]
    fn name_queries_may_return_aggregates() {
        let ranked = rank(&table(), &RankQuery::by_names(vec!["world".to_string()], 10)).unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].country, "World");
    }

    #[test]
    fn no_data_differs_from_no_match() {
        assert!(rank(&[], &RankQuery::top(10)).is_none());

        let ranked = rank(&table(), &RankQuery::by_names(vec!["atlantis".to_string()], 10)).unwrap();
        assert!(ranked.is_empty());
    }
}
