use anyhow::Result;
use serde::Deserialize;

use std::collections::BTreeMap;

use crate::{
    error::Error,
    groups::Groups,
    output::{Output, Value},
    rating::{self, Rating},
    records::Record,
    registry::Registry,
};

pub const AVERAGE_RATING: &str = "average-rating";
pub const BRAND_RATING: &str = "brand-rating";
pub const ROW_COUNT: &str = "row-count";

/// The columns the rating reports read.
#[derive(Debug, Deserialize)]
struct RatingRow {
    rating: Rating,
}

#[derive(Debug, Deserialize)]
struct BrandRow {
    brand: String,
    rating: Rating,
}

impl Registry {
    /// Creates a registry holding every built-in report.
    ///
    /// `groups` configures how [`brand_rating`] folds brand names together;
    /// pass [`Groups::default`] to report every brand under its own name.
    ///
    /// # Errors
    ///
    /// Returns an error only if two built-in reports share a name.
    pub fn builtin(groups: Groups) -> Result<Self> {
        let mut registry = Self::new();
        registry.register(AVERAGE_RATING, average_rating)?;
        registry.register(BRAND_RATING, move |records: &[Record]| {
            brand_rating(records, &groups)
        })?;
        registry.register(ROW_COUNT, row_count)?;
        Ok(registry)
    }
}

/// Returns the mean of the `rating` column over all `records`.
///
/// With no records, the value is [`Value::NoData`].
///
/// # Examples
///
/// ```
/// # use ratings::{reports::average_rating, Record, Value};
/// let records = [
///     Record::from_iter([("rating", "4")]),
///     Record::from_iter([("rating", "2")]),
/// ];
/// let output = average_rating(&records).unwrap();
/// assert_eq!(output.get("average rating"), Some(&Value::Number(3.0)));
/// ```
///
/// # Errors
///
/// Returns [`Error::Value`] if a record has no `rating` column, or its value
/// is not a valid [`Rating`].
pub fn average_rating(records: &[Record]) -> Result<Output> {
    let ratings = records
        .iter()
        .map(|r| r.parse::<RatingRow>().map(|row| row.rating))
        .collect::<Result<Vec<_>>>()?;
    let value = rating::mean(&ratings).map_or(Value::NoData, Value::Number);
    Ok(Output::new("Report", "Value").with("average rating", value))
}

/// Returns the mean rating of each brand, best first.
///
/// Brands with identical means are listed alphabetically, ignoring case.
/// Brands matching a group in `groups` are counted under the group's name.
///
/// # Errors
///
/// Returns [`Error::Value`] if a record has no `brand` or `rating` column,
/// the brand is empty, or the rating is not a valid [`Rating`].
pub fn brand_rating(records: &[Record], groups: &Groups) -> Result<Output> {
    let mut brands: BTreeMap<String, Vec<Rating>> = BTreeMap::new();
    for record in records {
        let row: BrandRow = record.parse()?;
        if row.brand.trim().is_empty() {
            return Err(Error::Value {
                location: record.location(),
                reason: "missing brand".to_string(),
            }
            .into());
        }
        brands
            .entry(groups.display_name(&row.brand).to_string())
            .or_default()
            .push(row.rating);
    }
    let mut means: Vec<(String, f64)> = brands
        .into_iter()
        .filter_map(|(brand, ratings)| rating::mean(&ratings).map(|m| (brand, m)))
        .collect();
    means.sort_by(|a, b| {
        b.1.total_cmp(&a.1)
            .then_with(|| a.0.to_lowercase().cmp(&b.0.to_lowercase()))
    });
    let mut output = Output::new("Brand", "Average rating");
    for (brand, mean) in means {
        output.push(brand, Value::Number(mean));
    }
    Ok(output)
}

/// Returns the number of records.
#[allow(clippy::unnecessary_wraps)]
pub fn row_count(records: &[Record]) -> Result<Output> {
    Ok(Output::new("Report", "Value").with("rows", Value::Count(records.len())))
}
