use rust_i18n::t;
use crate::domain::{CountryRow, LanguageCode};
use crate::stats::rank::{rank, RankQuery};
use crate::stats::Snapshot;

/// Thousands separators for display; counters are kept as bare integers
/// everywhere else.
pub fn group_digits(value: i64) -> String {
    let negative = value < 0;
    let digits: Vec<char> = value.abs().to_string().chars().rev().collect();
    let mut grouped = String::new();
    for (index, digit) in digits.iter().enumerate() {
        if index > 0 && index % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit);
    }
    let body: String = grouped.chars().rev().collect();
    if negative { format!("-{body}") } else { body }
}

/// Fixed-width table for a `<pre>` block: country name left-aligned and
/// shortened, counters right-aligned.
pub fn render_table(rows: &[CountryRow]) -> String {
    let header = ["Country", "Cases", "New", "Death"];
    let table: Vec<[String; 4]> = rows.iter()
        .map(|row| [
            row.short_name(),
            group_digits(row.cases),
            row.new_cases_display(),
            group_digits(row.deaths),
        ])
        .collect();

    let mut widths = header.map(str::len);
    for row in &table {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = vec![format_line(&header.map(str::to_owned), &widths)];
    for row in &table {
        lines.push(format_line(row, &widths));
    }
    lines.join("\n")
}

fn format_line(cells: &[String; 4], widths: &[usize; 4]) -> String {
    let pad = |cell: &String, width: usize| {
        let fill = " ".repeat(width - cell.chars().count());
        format!("{fill}{cell}")
    };
    let country = format!("{}{}", cells[0], " ".repeat(widths[0] - cells[0].chars().count()));
    format!("{country}|{}|{}|{}", pad(&cells[1], widths[1]), pad(&cells[2], widths[2]), pad(&cells[3], widths[3]))
}

/// The `/status` answer: global counters, the home country headline from
/// the patched row, and the leaderboard.
pub fn render_status(snapshot: &Snapshot, home_country: &str, top: usize, lang_code: &LanguageCode) -> String {
    if !snapshot.has_data() {
        return t!("commands.status.no_data", locale = lang_code).into()
    }

    let mut sections = Vec::new();
    if let Some(global) = &snapshot.global {
        sections.push(t!("commands.status.global", locale = lang_code,
            cases = group_digits(global.cases), deaths = group_digits(global.deaths)).into());
    }
    if let Some(home) = snapshot.home_row(home_country) {
        let delta = home.new_cases_display();
        let new_cases = if delta.is_empty() { String::new() } else { format!(" ({delta})") };
        sections.push(t!("commands.status.home", locale = lang_code,
            country = home.country, cases = group_digits(home.cases), new_cases = new_cases).into());
    }
    if let Some(ranked) = rank(&snapshot.rows, &RankQuery::top(top)) {
        sections.push(format!("<pre>{}</pre>", render_table(&ranked)));
    }
    sections.push(t!("commands.status.footer", locale = lang_code).into());
    sections.join("\n")
}

#[cfg(test)]
mod test {
    use crate::domain::CountryRow;
    use crate::stats::Snapshot;
    use super::{group_digits, render_table};

    #[test]
    fn digit_grouping() {
        assert_eq!(group_digits(0), "0");
        assert_eq!(group_digits(999), "999");
        assert_eq!(group_digits(1_000), "1,000");
        assert_eq!(group_digits(1_234_567), "1,234,567");
        assert_eq!(group_digits(-4_200), "-4,200");
    }

    #[test]
    fn table_is_aligned() {
        let rows = vec![
            CountryRow { country: "South Korea".to_string(), cases: 9_000, new_cases: 100, deaths: 120, ..Default::default() },
            CountryRow { country: "Vietnam".to_string(), cases: 153, ..Default::default() },
        ];
        let table = render_table(&rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        // every line has equal width
        assert_eq!(lines[0].chars().count(), lines[1].chars().count());
        assert_eq!(lines[1].chars().count(), lines[2].chars().count());
        assert!(lines[1].starts_with("SouthKo"));
        assert!(lines[1].contains("9,000"));
        assert!(lines[1].contains("+100"));
        assert!(lines[2].starts_with("Vietnam"));
    }

    #[test]
    fn no_data_state_has_its_own_message() {
        let snapshot = Snapshot::default();
        let rendered = super::render_status(&snapshot, "Vietnam", 10, &crate::domain::LanguageCode::new("en".to_string()));
        assert!(!rendered.is_empty());
        assert!(!rendered.contains("<pre>"));
    }
}
