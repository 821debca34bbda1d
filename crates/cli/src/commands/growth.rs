//! Growth rate CLI commands

use anyhow::{bail, Result};
use sizer_lib::engine::GROWTH_ENTRY_SPAN_YEARS;
use sizer_lib::{GrowthRatePoint, SizingSource, SizingStore};
use tabled::Tabled;

use super::Session;
use crate::output::{
    format_rate, print_info, print_json, print_list, print_success, print_warning, OutputFormat,
};

/// Row for growth table
#[derive(Tabled)]
struct GrowthRow {
    #[tabled(rename = "Year")]
    year: i32,
    #[tabled(rename = "Growth Rate")]
    rate: String,
}

impl From<&GrowthRatePoint> for GrowthRow {
    fn from(p: &GrowthRatePoint) -> Self {
        Self {
            year: p.year,
            rate: format_rate(p.rate),
        }
    }
}

/// List the growth table
pub fn list_growth(session: &Session) -> Result<()> {
    let table = session.store.growth_table();

    print_list(
        table.points(),
        |items| items.iter().map(GrowthRow::from).collect(),
        "No growth rates registered",
        session.format,
    )?;

    if matches!(session.format, OutputFormat::Table) {
        let open = table.open_years(session.current_year, GROWTH_ENTRY_SPAN_YEARS);
        if open.is_empty() {
            print_info("Every upcoming year already has a growth rate");
        }
    }
    Ok(())
}

/// Register a rate for a year that has none yet
///
/// Without an explicit year, the first open year is used.
pub fn add_growth(session: &mut Session, year: Option<i32>, rate: f64) -> Result<()> {
    let open = session
        .store
        .growth_table()
        .open_years(session.current_year, GROWTH_ENTRY_SPAN_YEARS);

    let Some(&first_open) = open.first() else {
        bail!(
            "No years left to add: every year up to {} already has a growth rate",
            session.current_year + GROWTH_ENTRY_SPAN_YEARS as i32
        );
    };

    let year = year.unwrap_or(first_open);
    if !open.contains(&year) {
        bail!(
            "Year {} is not available; choose one of: {}",
            year,
            open.iter()
                .map(|y| y.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    session.store.upsert_growth_rate(year, rate)?;
    session.logger.log_growth_rate_changed(year, Some(rate));
    report_rate(session.format, year, rate, "added")
}

/// Insert or overwrite the rate for a year
pub fn set_growth(session: &mut Session, year: i32, rate: f64) -> Result<()> {
    session.store.upsert_growth_rate(year, rate)?;
    session.logger.log_growth_rate_changed(year, Some(rate));
    report_rate(session.format, year, rate, "set")
}

/// Remove the rate for a year after confirmation
pub fn remove_growth(session: &mut Session, year: i32) -> Result<()> {
    if !session.store.growth_table().contains(year) {
        print_warning(&format!("No growth rate registered for {}", year));
        return Ok(());
    }

    if !session.confirm(&format!(
        "Do you want to delete the growth rate for {}? This action cannot be undone!",
        year
    ))? {
        print_info("Cancelled");
        return Ok(());
    }

    if session.store.remove_growth_rate(year)? {
        session.logger.log_growth_rate_changed(year, None);
    }

    match session.format {
        OutputFormat::Json => print_json(session.store.growth_table().points())?,
        OutputFormat::Table => print_success(&format!("Growth rate for {} deleted", year)),
    }
    Ok(())
}

fn report_rate(format: OutputFormat, year: i32, rate: f64, action: &str) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&GrowthRatePoint { year, rate })?,
        OutputFormat::Table => {
            print_success(&format!("Growth rate {} {} for {}", format_rate(rate), action, year))
        }
    }
    Ok(())
}
