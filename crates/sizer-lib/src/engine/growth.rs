//! Growth rate table and multi-year projection
//!
//! The table maps calendar years to annual growth percentages. A projection
//! for offset `i` looks up the rate registered for exactly `current_year + i`
//! and compounds that single rate over `i` years. Years without an entry
//! project with a 0% rate; rates are never carried across years.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use super::totals::SupplyTotals;
use crate::error::Result;
use crate::models::GrowthRatePoint;

/// Number of years projected past the current one
pub const DEFAULT_HORIZON_YEARS: u32 = 5;

/// How far ahead new growth rates may be registered
pub const GROWTH_ENTRY_SPAN_YEARS: u32 = 10;

/// Longest projection horizon accepted from configuration
pub const MAX_HORIZON_YEARS: u32 = 50;

/// Calendar year on the local clock
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Sorted, year-unique growth rate table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<GrowthRatePoint>", into = "Vec<GrowthRatePoint>")]
pub struct GrowthTable {
    points: Vec<GrowthRatePoint>,
}

impl GrowthTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rates of 20%, 40%, ... for each of the five years after `current_year`
    pub fn default_for(current_year: i32) -> Self {
        let points = (1..=DEFAULT_HORIZON_YEARS as i32)
            .map(|i| GrowthRatePoint {
                year: current_year + i,
                rate: f64::from(i * 20),
            })
            .collect();
        Self { points }
    }

    /// Registered rate for `year`, 0 when absent
    pub fn rate_for(&self, year: i32) -> f64 {
        self.get(year).map(|p| p.rate).unwrap_or(0.0)
    }

    fn get(&self, year: i32) -> Option<&GrowthRatePoint> {
        self.points
            .binary_search_by_key(&year, |p| p.year)
            .ok()
            .map(|idx| &self.points[idx])
    }

    pub fn contains(&self, year: i32) -> bool {
        self.get(year).is_some()
    }

    /// Insert or replace the rate for `year`, keeping years sorted
    pub fn upsert(&mut self, year: i32, rate: f64) -> Result<()> {
        let point = GrowthRatePoint::new(year, rate)?;
        match self.points.binary_search_by_key(&year, |p| p.year) {
            Ok(idx) => self.points[idx] = point,
            Err(idx) => self.points.insert(idx, point),
        }
        Ok(())
    }

    /// Remove the entry for `year`; absent years are ignored
    pub fn remove(&mut self, year: i32) -> Option<GrowthRatePoint> {
        self.points
            .binary_search_by_key(&year, |p| p.year)
            .ok()
            .map(|idx| self.points.remove(idx))
    }

    /// Upcoming years within `span` that have no registered rate yet
    pub fn open_years(&self, current_year: i32, span: u32) -> Vec<i32> {
        (1..=span as i32)
            .map(|i| current_year + i)
            .filter(|year| !self.contains(*year))
            .collect()
    }

    pub fn points(&self) -> &[GrowthRatePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl From<Vec<GrowthRatePoint>> for GrowthTable {
    fn from(mut points: Vec<GrowthRatePoint>) -> Self {
        points.sort_by_key(|p| p.year);
        // Later entries win for duplicated years
        points.reverse();
        points.dedup_by_key(|p| p.year);
        points.reverse();
        Self { points }
    }
}

impl From<GrowthTable> for Vec<GrowthRatePoint> {
    fn from(table: GrowthTable) -> Self {
        table.points
    }
}

/// Insert or update a rate, returning the new table
pub fn upsert_growth_rate(table: &GrowthTable, year: i32, rate: f64) -> Result<GrowthTable> {
    let mut next = table.clone();
    next.upsert(year, rate)?;
    Ok(next)
}

/// Remove a rate, returning the new table
pub fn remove_growth_rate(table: &GrowthTable, year: i32) -> GrowthTable {
    let mut next = table.clone();
    next.remove(year);
    next
}

/// Projected supply for one year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthProjection {
    pub year: i32,
    #[serde(rename = "vCPU")]
    pub vcpu: u64,
    #[serde(rename = "Memory")]
    pub memory: u64,
    #[serde(rename = "Disk")]
    pub disk: u64,
}

/// Project supply totals over `horizon` years after `current_year`
pub fn project_growth(
    current: &SupplyTotals,
    table: &GrowthTable,
    current_year: i32,
    horizon: u32,
) -> Vec<GrowthProjection> {
    (0..=horizon)
        .map(|offset| {
            let year = current_year + offset as i32;
            let multiplier = (1.0 + table.rate_for(year) / 100.0).powi(offset as i32);
            GrowthProjection {
                year,
                vcpu: scale(current.vcpus, multiplier),
                memory: scale(current.memory, multiplier),
                disk: scale(current.disk, multiplier),
            }
        })
        .collect()
}

fn scale(value: u64, multiplier: f64) -> u64 {
    (value as f64 * multiplier).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    const YEAR: i32 = 2025;

    fn totals(vcpus: u64) -> SupplyTotals {
        SupplyTotals {
            vcpus,
            memory: vcpus * 4,
            disk: vcpus * 100,
        }
    }

    #[test]
    fn test_offset_zero_is_identity() {
        let current = SupplyTotals {
            vcpus: 57,
            memory: 191,
            disk: 643,
        };
        let mut table = GrowthTable::new();
        table.upsert(YEAR, 50.0).unwrap();

        let projections = project_growth(&current, &table, YEAR, DEFAULT_HORIZON_YEARS);
        assert_eq!(projections.len(), 6);
        assert_eq!(projections[0].year, YEAR);
        assert_eq!(projections[0].vcpu, 57);
        assert_eq!(projections[0].memory, 191);
        assert_eq!(projections[0].disk, 643);
    }

    #[test]
    fn test_single_year_lookup_compounding() {
        let mut table = GrowthTable::new();
        table.upsert(YEAR + 2, 20.0).unwrap();

        let projections = project_growth(&totals(10), &table, YEAR, DEFAULT_HORIZON_YEARS);
        let vcpus: Vec<u64> = projections.iter().map(|p| p.vcpu).collect();
        let years: Vec<i32> = projections.iter().map(|p| p.year).collect();

        // 10 * 1.2^2 = 14.4
        assert_eq!(vcpus, vec![10, 10, 14, 10, 10, 10]);
        assert_eq!(years, (YEAR..=YEAR + 5).collect::<Vec<_>>());
    }

    #[test]
    fn test_rate_not_carried_forward() {
        let mut table = GrowthTable::new();
        table.upsert(YEAR + 3, 10.0).unwrap();

        let projections = project_growth(&totals(1000), &table, YEAR, DEFAULT_HORIZON_YEARS);
        assert_eq!(projections[1].vcpu, 1000);
        assert_eq!(projections[2].vcpu, 1000);
        // 1000 * 1.1^3
        assert_eq!(projections[3].vcpu, 1331);
        assert_eq!(projections[4].vcpu, 1000);
        assert_eq!(projections[5].vcpu, 1000);
    }

    #[test]
    fn test_default_table_projection() {
        let table = GrowthTable::default_for(YEAR);
        let projections = project_growth(&totals(100), &table, YEAR, DEFAULT_HORIZON_YEARS);

        // Year +1 at 20%, year +2 at 40% compounded twice
        assert_eq!(projections[1].vcpu, 120);
        assert_eq!(projections[2].vcpu, 196);
        assert_eq!(projections[2].memory, 784);
    }

    #[test]
    fn test_default_table_contents() {
        let table = GrowthTable::default_for(YEAR);
        let rates: Vec<(i32, f64)> = table.points().iter().map(|p| (p.year, p.rate)).collect();
        assert_eq!(
            rates,
            vec![
                (2026, 20.0),
                (2027, 40.0),
                (2028, 60.0),
                (2029, 80.0),
                (2030, 100.0)
            ]
        );
    }

    #[test]
    fn test_upsert_keeps_years_sorted() {
        let mut table = GrowthTable::new();
        for year in [2030, 2027, 2033, 2025] {
            table = upsert_growth_rate(&table, year, 5.0).unwrap();
        }
        table = upsert_growth_rate(&table, 2029, 7.5).unwrap();

        let years: Vec<i32> = table.points().iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2025, 2027, 2029, 2030, 2033]);
    }

    #[test]
    fn test_upsert_replaces_existing_year() {
        let table = GrowthTable::default_for(YEAR);
        let updated = upsert_growth_rate(&table, YEAR + 1, 12.5).unwrap();

        assert_eq!(updated.len(), table.len());
        assert_eq!(updated.rate_for(YEAR + 1), 12.5);
        // Input table is untouched
        assert_eq!(table.rate_for(YEAR + 1), 20.0);
    }

    #[test]
    fn test_upsert_rejects_invalid_rate() {
        let table = GrowthTable::new();
        assert!(upsert_growth_rate(&table, YEAR, -1.0).is_err());
        assert!(upsert_growth_rate(&table, YEAR, f64::NAN).is_err());
    }

    #[test]
    fn test_remove_growth_rate() {
        let table = GrowthTable::default_for(YEAR);
        let removed = remove_growth_rate(&table, YEAR + 3);
        assert_eq!(removed.len(), 4);
        assert!(!removed.contains(YEAR + 3));

        let unchanged = remove_growth_rate(&removed, 1999);
        assert_eq!(unchanged, removed);
    }

    #[test]
    fn test_open_years() {
        let table = GrowthTable::default_for(YEAR);
        assert_eq!(
            table.open_years(YEAR, GROWTH_ENTRY_SPAN_YEARS),
            vec![2031, 2032, 2033, 2034, 2035]
        );

        let mut full = table.clone();
        for year in full.open_years(YEAR, GROWTH_ENTRY_SPAN_YEARS) {
            full.upsert(year, 1.0).unwrap();
        }
        assert!(full.open_years(YEAR, GROWTH_ENTRY_SPAN_YEARS).is_empty());
    }

    #[test]
    fn test_deserialize_sorts_and_dedups() {
        let table: GrowthTable = serde_json::from_str(
            r#"[{"year":2030,"rate":5.0},{"year":2026,"rate":1.0},{"year":2030,"rate":9.0}]"#,
        )
        .unwrap();

        let years: Vec<i32> = table.points().iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2026, 2030]);
        assert_eq!(table.rate_for(2030), 9.0);
    }

    #[test]
    fn test_projection_serialized_keys() {
        let projection = GrowthProjection {
            year: YEAR,
            vcpu: 1,
            memory: 2,
            disk: 3,
        };
        let value = serde_json::to_value(projection).unwrap();
        assert_eq!(value["vCPU"], 1);
        assert_eq!(value["Memory"], 2);
        assert_eq!(value["Disk"], 3);
    }
}
