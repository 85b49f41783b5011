use anyhow::bail;
use serde_with::DeserializeFromStr;

use std::{
    fmt::{Debug, Display},
    ops::RangeInclusive,
    str::FromStr,
};

/// The range every rating must fall in.
pub const RANGE: RangeInclusive<f64> = 0.0..=5.0;

/// Represents a product rating.
///
/// Any finite decimal number from 0 to 5 inclusive is a valid rating, so `4`,
/// `4.0` and `4.50` all parse. The [`Display`] implementation rounds to 2
/// decimal places.
#[derive(Clone, Copy, Default, DeserializeFromStr, PartialEq, PartialOrd)]
pub struct Rating(f64);

impl Rating {
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Debug for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Rating {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            bail!("missing rating");
        }
        let Ok(value) = s.parse::<f64>() else {
            bail!("rating {s:?} is not a number");
        };
        if !value.is_finite() || !RANGE.contains(&value) {
            bail!(
                "rating {s:?} is out of range ({}-{})",
                RANGE.start(),
                RANGE.end()
            );
        }
        Ok(Self(value))
    }
}

/// Returns the arithmetic mean of `ratings`, or `None` if there are none.
#[must_use]
pub fn mean(ratings: &[Rating]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let total: f64 = ratings.iter().map(|r| r.0).sum();
    #[allow(clippy::cast_precision_loss)]
    let count = ratings.len() as f64;
    Some(total / count)
}
