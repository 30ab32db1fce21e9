//! Wire-token compression of date sets
//!
//! A fully covered calendar year collapses into one year token; anything
//! less stays as individual year/month tokens. Expanding the tokens must
//! reconstruct the original set exactly.

use cdc_wonder_types::{DateToken, Dates, Year, YearMonth};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn ym(year: i32, month: u8) -> YearMonth {
    YearMonth::new(year, month).unwrap()
}

fn from_months(months: impl IntoIterator<Item = YearMonth>) -> Dates {
    months
        .into_iter()
        .fold(Dates::default(), |dates, month| {
            dates.union(&Dates::single(month))
        })
}

#[test]
fn full_year_plus_stray_month_yields_two_tokens() {
    let dates = Dates::single(Year::new(2001)).union(&Dates::single(ym(2002, 7)));
    assert_eq!(
        dates.to_wire_tokens(),
        vec![
            DateToken::Year(Year::new(2001)),
            DateToken::Month(ym(2002, 7)),
        ]
    );
}

#[test]
fn token_output_ignores_insertion_order() {
    let forward = from_months((1..=12).map(|m| ym(2001, m)).chain([ym(2002, 7)]));
    let backward = from_months([ym(2002, 7)].into_iter().chain((1..=12).rev().map(|m| ym(2001, m))));
    assert_eq!(forward.to_wire_tokens(), backward.to_wire_tokens());
}

#[test]
fn eleven_months_do_not_collapse() {
    let dates = from_months((1..=11).map(|m| ym(2005, m)));
    let tokens = dates.to_wire_tokens();
    assert_eq!(tokens.len(), 11);
    assert!(tokens.iter().all(|t| matches!(t, DateToken::Month(_))));
}

proptest! {
    #[test]
    fn round_trip_reconstructs_the_set(
        picks in proptest::collection::btree_set((1999i32..=2018, 1u8..=12), 1..80)
    ) {
        let original: BTreeSet<YearMonth> =
            picks.iter().map(|&(year, month)| ym(year, month)).collect();
        let dates = from_months(original.iter().copied());

        let expanded: BTreeSet<YearMonth> = dates
            .to_wire_tokens()
            .iter()
            .flat_map(DateToken::months)
            .collect();

        prop_assert_eq!(expanded, original);
    }
}
