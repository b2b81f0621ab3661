use anyhow::anyhow;
use regex::Regex;
use crate::domain::AuthoritativeFigure;

/// Pulls the home country's figures out of the news ticker widget: the page
/// embeds a JSON blob with one `{"title", "cases", "deaths"}` entry per
/// country, and the home entry updates sooner than the aggregator table.
pub fn parse_ticker(body: &str, ticker_title: &str) -> anyhow::Result<AuthoritativeFigure> {
    let pattern = format!(
        r#""title":\s*"{}",\s*"cases":\s*(\d+),\s*"deaths":\s*(\d+)"#,
        regex::escape(ticker_title),
    );
    let re = Regex::new(&pattern)?;
    let caps = re.captures(body)
        .ok_or_else(|| anyhow!("no ticker entry for {ticker_title} in the page"))?;
    Ok(AuthoritativeFigure::new(caps[1].parse()?, caps[2].parse()?))
}

#[cfg(test)]
mod test {
    use super::parse_ticker;

    const SAMPLE: &str = r#"
        <script>
        var ticker = {"items": [
            {"title": "Thế giới", "cases": 471518, "deaths": 21293},
            {"title": "Việt Nam", "cases": 148, "deaths": 0},
            {"title": "Trung Quốc", "cases": 81285, "deaths": 3287}
        ]};
        </script>"#;

    #[test]
    fn finds_the_home_entry() {
        let figure = parse_ticker(SAMPLE, "Việt Nam").unwrap();
        assert_eq!(figure.cases, 148);
        assert_eq!(figure.deaths, 0);
    }

    #[test]
    fn other_entries_do_not_leak_in() {
        let figure = parse_ticker(SAMPLE, "Trung Quốc").unwrap();
        assert_eq!(figure.cases, 81285);
    }

    #[test]
    fn missing_entry_is_an_error() {
        assert!(parse_ticker(SAMPLE, "Atlantis").is_err());
        assert!(parse_ticker("<html></html>", "Việt Nam").is_err());
    }

    #[test]
    fn regex_metacharacters_in_the_title_are_escaped() {
        let body = r#""title": "A (B)", "cases": 5, "deaths": 1"#;
        let figure = parse_ticker(body, "A (B)").unwrap();
        assert_eq!(figure.cases, 5);
    }
}
