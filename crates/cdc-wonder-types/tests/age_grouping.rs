//! Age-set grouping validation across the three granularities
//!
//! Ten-year groups cover 5-14 through 75-84, five-year groups 5-9 through
//! 95-99 (plus the 1-4 block), single-year groups any subset of 1-99.

use cdc_wonder_types::{AgeGrouping, Ages};
use rstest::rstest;

fn range(start: u8, end: u8) -> Ages {
    Ages::range(start, end).unwrap()
}

#[rstest]
#[case(15, 44, AgeGrouping::TenYear, true)]
#[case(15, 39, AgeGrouping::TenYear, false)]
#[case(15, 39, AgeGrouping::FiveYear, true)]
#[case(15, 38, AgeGrouping::FiveYear, false)]
#[case(15, 38, AgeGrouping::SingleYear, true)]
fn grouping_validity(
    #[case] start: u8,
    #[case] end: u8,
    #[case] grouping: AgeGrouping,
    #[case] expected: bool,
) {
    assert_eq!(range(start, end).is_valid_grouping(grouping), expected);
}

#[test]
fn ten_year_blocks_must_start_mid_decade() {
    // 10-19 has the right size but the wrong boundary; blocks run 15-24 etc.
    assert!(!range(10, 19).is_valid_grouping(AgeGrouping::TenYear));
    assert!(range(15, 24).is_valid_grouping(AgeGrouping::TenYear));
}

#[test]
fn five_year_blocks_start_on_half_decades() {
    assert!(range(10, 14).is_valid_grouping(AgeGrouping::FiveYear));
    assert!(range(15, 19).is_valid_grouping(AgeGrouping::FiveYear));
    assert!(!range(12, 16).is_valid_grouping(AgeGrouping::FiveYear));
}

#[test]
fn disjoint_aligned_blocks_are_valid() {
    let ages = range(15, 24).union(&range(45, 54));
    assert!(ages.is_valid_grouping(AgeGrouping::TenYear));
    assert_eq!(
        ages.wire_blocks(AgeGrouping::TenYear).unwrap(),
        vec!["15-24", "45-54"]
    );
}

#[test]
fn gap_inside_a_block_is_invalid() {
    // Five members, but 19 is missing so the block is not contiguous.
    let ages = range(15, 18).union(&Ages::single(20).unwrap());
    assert!(!ages.is_valid_grouping(AgeGrouping::FiveYear));
    // The same set is still a legal single-year grouping.
    assert!(ages.is_valid_grouping(AgeGrouping::SingleYear));
}

#[test]
fn range_sequence_is_explicit_ascending_run() {
    let ages = range(5, 14);
    assert_eq!(ages.as_sorted(), (5..=14).collect::<Vec<_>>());
}
