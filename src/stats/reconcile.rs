//! Merges the authoritative home-country figure into the aggregator's row.
//!
//! The home country's own source reports sooner than the aggregator, so the
//! patched totals must never drop below either source, and the shortfall is
//! surfaced as additional new/active cases so the counts don't get lost once
//! the aggregator catches up.

use crate::domain::{AuthoritativeFigure, CountryRow};

/// Full-list form: the home row is replaced in place, relative order of all
/// rows preserved. A missing home row or absent figure is a no-op, not an
/// error.
pub fn reconcile(
    rows: &[CountryRow],
    authoritative: Option<&AuthoritativeFigure>,
    home_country: &str,
) -> Vec<CountryRow> {
    let mut rows = rows.to_vec();
    if let Some(figure) = authoritative {
        if let Some(row) = rows.iter_mut().find(|row| row.country.eq_ignore_ascii_case(home_country)) {
            *row = patch_row(row, figure);
        }
    }
    rows
}

/// Single-row form, used for the headline display.
pub fn reconcile_single(
    rows: &[CountryRow],
    authoritative: Option<&AuthoritativeFigure>,
    home_country: &str,
) -> Option<CountryRow> {
    let row = rows.iter().find(|row| row.country.eq_ignore_ascii_case(home_country))?;
    match authoritative {
        Some(figure) => Some(patch_row(row, figure)),
        None => Some(row.clone()),
    }
}

fn patch_row(row: &CountryRow, figure: &AuthoritativeFigure) -> CountryRow {
    let mut patched = row.clone();
    let case_shortfall = figure.cases - row.cases;
    if case_shortfall > 0 {
        patched.new_cases += case_shortfall;
        patched.active_cases += case_shortfall;
    }
    let death_shortfall = figure.deaths - row.deaths;
    if death_shortfall > 0 {
        patched.new_deaths += death_shortfall;
    }
    patched.cases = row.cases.max(figure.cases);
    patched.deaths = row.deaths.max(figure.deaths);
    patched
}
