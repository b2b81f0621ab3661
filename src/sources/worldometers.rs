use scraper::{ElementRef, Html, Selector};
use crate::domain::{normalize, CountryRow, GlobalStats};

/// Everything parseable from one aggregator page load.
#[derive(Debug, Clone, Default)]
pub struct AggregatorPage {
    pub global: Option<GlobalStats>,
    pub today: Vec<CountryRow>,
    pub yesterday: Option<Vec<CountryRow>>,
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("hardcoded selector must be valid")
}

pub fn parse_page(html: &str) -> AggregatorPage {
    let document = Html::parse_document(html);
    let today = parse_table(&document, "#main_table_countries_today tbody tr");
    let yesterday = parse_table(&document, "#main_table_countries_yesterday tbody tr");
    AggregatorPage {
        global: parse_global(&document),
        today,
        yesterday: (!yesterday.is_empty()).then_some(yesterday),
    }
}

fn parse_global(document: &Html) -> Option<GlobalStats> {
    let counters: Vec<i64> = document.select(&selector(".maincounter-number span"))
        .map(|span| normalize(&cell_text(span)))
        .collect();
    match counters[..] {
        [cases, deaths, recovered, ..] => Some(GlobalStats { cases, deaths, recovered }),
        _ => None,
    }
}

fn parse_table(document: &Html, row_css: &str) -> Vec<CountryRow> {
    let cell_selector = selector("td");
    document.select(&selector(row_css))
        .filter_map(|row| {
            let cells: Vec<String> = row.select(&cell_selector)
                .map(cell_text)
                .collect();
            parse_row(&cells)
        })
        .collect()
}

/// One table row into a normalized [`CountryRow`]. Newer page revisions
/// prepend a numeric rank column; it is detected and skipped.
fn parse_row(cells: &[String]) -> Option<CountryRow> {
    let offset = usize::from(cells.first().map(|c| is_rank_cell(c)).unwrap_or(false));
    let country = cells.get(offset)?.trim().to_owned();
    if country.is_empty() || country.chars().all(|c| c.is_ascii_digit()) {
        return None
    }
    let counter = |index: usize| cells.get(offset + index).map(|c| normalize(c)).unwrap_or(0);
    Some(CountryRow {
        country,
        cases: counter(1),
        new_cases: counter(2),
        deaths: counter(3),
        new_deaths: counter(4),
        recovered: counter(5),
        active_cases: counter(6),
        critical_cases: counter(7),
        cases_per_million: counter(8),
        deaths_per_million: counter(9),
    })
}

fn is_rank_cell(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty() || cell.chars().all(|c| c.is_ascii_digit())
}

fn cell_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_owned()
}
