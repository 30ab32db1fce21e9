//! Date filter sets and wire-token run compression
//!
//! Filters are specified to the month. A bare [`Year`] stands for all twelve
//! of its months; when a date set is written to the wire, any year that is
//! fully covered collapses back into a single year token.

use cdc_wonder_diagnostics::{ReasonCode, Result, WonderError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Months per calendar year
pub const NUM_MONTHS: u8 = 12;

/// A Gregorian calendar year, such as 1999.
///
/// Comparisons against a [`YearMonth`] consider the year component only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Year(i32);

impl Year {
    pub const fn new(year: i32) -> Self {
        Self(year)
    }

    pub const fn year(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A Gregorian calendar year and month, such as July 1998.
///
/// Ordered chronologically: by year, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    year: i32,
    month: u8,
}

impl YearMonth {
    /// Create a year/month pair; the month counts from 1 (January)
    pub fn new(year: i32, month: u8) -> Result<Self> {
        if month == 0 || month > NUM_MONTHS {
            return Err(WonderError::validation(
                ReasonCode::MonthOutOfRange,
                format!("month {month} not in 1-{NUM_MONTHS}"),
            ));
        }
        Ok(Self { year, month })
    }

    pub const fn year(&self) -> i32 {
        self.year
    }

    pub const fn month(&self) -> u8 {
        self.month
    }

    fn succ(&self) -> Self {
        if self.month == NUM_MONTHS {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:02}", self.year, self.month)
    }
}

/// Either endpoint of a date selection: a whole year or a single month.
///
/// Range endpoints must both be the same variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    Year(Year),
    Month(YearMonth),
}

impl Period {
    pub const fn year(&self) -> i32 {
        match self {
            Self::Year(y) => y.year(),
            Self::Month(ym) => ym.year(),
        }
    }

    /// Strictly-before comparison.
    ///
    /// A whole year on either side compares by year component only, so a
    /// year neither precedes nor follows any of its own months.
    pub fn is_before(&self, other: &Period) -> bool {
        match (self, other) {
            (Self::Month(a), Self::Month(b)) => a < b,
            _ => self.year() < other.year(),
        }
    }

    /// Strictly-after comparison, with the same year-only rule
    pub fn is_after(&self, other: &Period) -> bool {
        other.is_before(self)
    }
}

impl From<Year> for Period {
    fn from(year: Year) -> Self {
        Self::Year(year)
    }
}

impl From<YearMonth> for Period {
    fn from(month: YearMonth) -> Self {
        Self::Month(month)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year(y) => y.fmt(f),
            Self::Month(ym) => ym.fmt(f),
        }
    }
}

/// Immutable set of months a request can filter on
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dates {
    months: BTreeSet<YearMonth>,
}

impl Dates {
    /// Create a set from a single period; a whole year contributes all
    /// twelve of its months
    pub fn single(period: impl Into<Period>) -> Self {
        let mut months = BTreeSet::new();
        match period.into() {
            Period::Year(year) => {
                for month in 1..=NUM_MONTHS {
                    months.insert(YearMonth {
                        year: year.year(),
                        month,
                    });
                }
            }
            Period::Month(ym) => {
                months.insert(ym);
            }
        }
        Self { months }
    }

    /// Create a set covering every month from `begin` through `end`
    /// inclusive.
    ///
    /// Both endpoints must be the same [`Period`] variant; year endpoints
    /// cover each year in full.
    pub fn range(begin: impl Into<Period>, end: impl Into<Period>) -> Result<Self> {
        let (begin, end) = (begin.into(), end.into());
        if begin.is_after(&end) {
            return Err(WonderError::validation(
                ReasonCode::EmptyRange,
                format!("begin period {begin} is after end period {end}"),
            ));
        }
        let mut months = BTreeSet::new();
        match (begin, end) {
            (Period::Year(by), Period::Year(ey)) => {
                for year in by.year()..=ey.year() {
                    for month in 1..=NUM_MONTHS {
                        months.insert(YearMonth { year, month });
                    }
                }
            }
            (Period::Month(bm), Period::Month(em)) => {
                let mut current = bm;
                while current <= em {
                    months.insert(current);
                    current = current.succ();
                }
            }
            _ => {
                return Err(WonderError::type_mismatch(
                    "range endpoints must both be years or both be year/months",
                ));
            }
        }
        Ok(Self { months })
    }

    /// Create a new set containing the months of both sets
    pub fn union(&self, other: &Dates) -> Dates {
        Dates {
            months: self.months.union(&other.months).copied().collect(),
        }
    }

    /// Canonical ascending sequence of months
    pub fn as_sorted(&self) -> Vec<YearMonth> {
        self.months.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Compress into the mixed wire representation: one token per fully
    /// covered calendar year, individual month tokens for the rest.
    ///
    /// Tokens come out in chronological order; the wire format tolerates
    /// any order.
    pub fn to_wire_tokens(&self) -> Vec<DateToken> {
        let mut tokens = Vec::new();
        let mut current_year: Option<i32> = None;
        let mut pending: Vec<YearMonth> = Vec::new();

        for &month in &self.months {
            if current_year != Some(month.year()) {
                tokens.extend(pending.drain(..).map(DateToken::Month));
                current_year = Some(month.year());
            }
            pending.push(month);
            if pending.len() == NUM_MONTHS as usize {
                tokens.push(DateToken::Year(Year::new(month.year())));
                pending.clear();
            }
        }
        tokens.extend(pending.into_iter().map(DateToken::Month));
        tokens
    }
}

/// One wire token of a compressed date set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateToken {
    Year(Year),
    Month(YearMonth),
}

impl DateToken {
    /// Expand back into the months the token covers
    pub fn months(&self) -> Vec<YearMonth> {
        match self {
            Self::Year(year) => (1..=NUM_MONTHS)
                .map(|month| YearMonth {
                    year: year.year(),
                    month,
                })
                .collect(),
            Self::Month(ym) => vec![*ym],
        }
    }
}

impl fmt::Display for DateToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year(y) => y.fmt(f),
            Self::Month(ym) => ym.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u8) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(
            YearMonth::new(2001, 13).unwrap_err().reason(),
            Some(ReasonCode::MonthOutOfRange)
        );
        assert_eq!(
            YearMonth::new(2001, 0).unwrap_err().reason(),
            Some(ReasonCode::MonthOutOfRange)
        );
    }

    #[test]
    fn test_year_expands_to_twelve_months() {
        let dates = Dates::single(Year::new(2004));
        assert_eq!(dates.len(), 12);
        assert_eq!(dates.as_sorted()[0], ym(2004, 1));
        assert_eq!(dates.as_sorted()[11], ym(2004, 12));
    }

    #[test]
    fn test_month_range_crosses_year_boundary() {
        let dates = Dates::range(ym(2003, 11), ym(2004, 2)).unwrap();
        assert_eq!(
            dates.as_sorted(),
            vec![ym(2003, 11), ym(2003, 12), ym(2004, 1), ym(2004, 2)]
        );
    }

    #[test]
    fn test_range_rejects_mixed_endpoints() {
        let err = Dates::range(Year::new(2003), ym(2004, 2)).unwrap_err();
        assert!(matches!(err, WonderError::TypeMismatch { .. }));
    }

    #[test]
    fn test_range_rejects_backwards_endpoints() {
        let err = Dates::range(ym(2004, 2), ym(2003, 11)).unwrap_err();
        assert_eq!(err.reason(), Some(ReasonCode::EmptyRange));
    }

    #[test]
    fn test_year_only_comparison() {
        let year: Period = Year::new(2001).into();
        let july: Period = ym(2001, 7).into();
        assert!(!year.is_before(&july));
        assert!(!year.is_after(&july));
        assert!(year.is_before(&ym(2002, 1).into()));
    }

    #[test]
    fn test_compression_mixes_year_and_month_tokens() {
        let dates = Dates::single(Year::new(2001)).union(&Dates::single(ym(2002, 7)));
        let tokens = dates.to_wire_tokens();
        assert_eq!(
            tokens,
            vec![
                DateToken::Year(Year::new(2001)),
                DateToken::Month(ym(2002, 7)),
            ]
        );
    }

    #[test]
    fn test_partial_year_stays_as_months() {
        let dates = Dates::range(ym(2005, 1), ym(2005, 11)).unwrap();
        let tokens = dates.to_wire_tokens();
        assert_eq!(tokens.len(), 11);
        assert!(tokens.iter().all(|t| matches!(t, DateToken::Month(_))));
    }
}
