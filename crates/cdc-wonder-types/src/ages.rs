//! Age filter sets and age-group partitioning
//!
//! The service accepts single ages from 1 through 99 and groups them into
//! ten-year, five-year or single-year blocks. Block boundaries are fixed by
//! the dataset: ten-year blocks run 5-14, 15-24, ..., five-year blocks run
//! 1-4 aside, 5-9, 10-14, ...; only aligned, gap-free selections are
//! accepted when grouping by age.

use cdc_wonder_diagnostics::{ReasonCode, Result, WonderError};
use std::collections::BTreeSet;
use std::fmt;

/// Lowest filterable age
pub const MIN_AGE: u8 = 1;
/// Highest filterable age
pub const MAX_AGE: u8 = 99;

/// Age-group granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgeGrouping {
    TenYear,
    FiveYear,
    SingleYear,
}

impl AgeGrouping {
    /// Number of consecutive ages per block
    pub const fn block_size(&self) -> usize {
        match self {
            Self::TenYear => 10,
            Self::FiveYear => 5,
            Self::SingleYear => 1,
        }
    }

    /// Wire code of the matching grouping dimension
    pub const fn wire_code(&self) -> &'static str {
        match self {
            Self::TenYear => "D76.V5",
            Self::FiveYear => "D76.V51",
            Self::SingleYear => "D76.V52",
        }
    }

    // Ten-year blocks start at 5, 15, 25, ...; five-year blocks at 0 or 5
    // mod 10; single years anywhere.
    fn is_aligned(&self, first: u8) -> bool {
        match self {
            Self::TenYear => first % 10 == 5,
            Self::FiveYear => first % 10 == 0 || first % 10 == 5,
            Self::SingleYear => true,
        }
    }
}

impl fmt::Display for AgeGrouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TenYear => write!(f, "ten-year age groups"),
            Self::FiveYear => write!(f, "five-year age groups"),
            Self::SingleYear => write!(f, "single-year age groups"),
        }
    }
}

/// Immutable set of ages a request can filter on.
///
/// Built from a single age or an inclusive range; `union` combines sets
/// without mutating either operand.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ages {
    ages: BTreeSet<u8>,
}

impl Ages {
    /// Create a set containing exactly one age
    pub fn single(age: u8) -> Result<Self> {
        check_age(age)?;
        Ok(Self {
            ages: BTreeSet::from([age]),
        })
    }

    /// Create a set containing every age from `start` through `end`
    pub fn range(start: u8, end: u8) -> Result<Self> {
        check_age(start)?;
        check_age(end)?;
        if end < start {
            return Err(WonderError::validation(
                ReasonCode::EmptyRange,
                format!("start age {start} is after end age {end}"),
            ));
        }
        Ok(Self {
            ages: (start..=end).collect(),
        })
    }

    /// Create a new set containing the members of both sets
    pub fn union(&self, other: &Ages) -> Ages {
        Ages {
            ages: self.ages.union(&other.ages).copied().collect(),
        }
    }

    /// Canonical ascending sequence of members
    pub fn as_sorted(&self) -> Vec<u8> {
        self.ages.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.ages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ages.is_empty()
    }

    /// Partition the sorted ages into consecutive blocks of the granularity's
    /// fixed size.
    ///
    /// Fails if the member count does not divide into whole blocks.
    pub fn partition(&self, grouping: AgeGrouping) -> Result<Vec<Vec<u8>>> {
        let sorted = self.as_sorted();
        let size = grouping.block_size();
        if sorted.len() % size != 0 {
            return Err(WonderError::validation(
                ReasonCode::PartialAgeBlock,
                format!(
                    "{} ages do not divide into blocks of {size}",
                    sorted.len()
                ),
            ));
        }
        Ok(sorted.chunks(size).map(<[u8]>::to_vec).collect())
    }

    /// Check whether this set can be grouped at the given granularity:
    /// whole blocks only, each a contiguous run starting on a block
    /// boundary. Partition failure yields `false`, never an error.
    pub fn is_valid_grouping(&self, grouping: AgeGrouping) -> bool {
        let Ok(blocks) = self.partition(grouping) else {
            return false;
        };
        blocks.iter().all(|block| {
            let contiguous = block.windows(2).all(|pair| pair[1] == pair[0] + 1);
            contiguous && grouping.is_aligned(block[0])
        })
    }

    /// Wire tokens for the partitioned blocks: a bare age for single-year
    /// blocks, `first-last` for five- and ten-year blocks.
    pub fn wire_blocks(&self, grouping: AgeGrouping) -> Result<Vec<String>> {
        let blocks = self.partition(grouping)?;
        Ok(blocks
            .iter()
            .map(|block| match grouping {
                AgeGrouping::SingleYear => block[0].to_string(),
                _ => format!("{}-{}", block[0], block[block.len() - 1]),
            })
            .collect())
    }
}

impl fmt::Display for Ages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for age in &self.ages {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{age}")?;
            first = false;
        }
        Ok(())
    }
}

fn check_age(age: u8) -> Result<()> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(WonderError::validation(
            ReasonCode::AgeOutOfRange,
            format!("age {age} not in {MIN_AGE}-{MAX_AGE}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_is_sorted_inclusive() {
        let ages = Ages::range(15, 18).unwrap();
        assert_eq!(ages.as_sorted(), vec![15, 16, 17, 18]);
    }

    #[test]
    fn test_union_deduplicates() {
        let a = Ages::range(10, 14).unwrap();
        let b = Ages::range(12, 16).unwrap();
        assert_eq!(a.union(&b).as_sorted(), (10..=16).collect::<Vec<_>>());
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert_eq!(
            Ages::single(0).unwrap_err().reason(),
            Some(ReasonCode::AgeOutOfRange)
        );
        assert_eq!(
            Ages::range(90, 100).unwrap_err().reason(),
            Some(ReasonCode::AgeOutOfRange)
        );
        assert_eq!(
            Ages::range(44, 15).unwrap_err().reason(),
            Some(ReasonCode::EmptyRange)
        );
    }

    #[test]
    fn test_partition_rejects_partial_block() {
        let ages = Ages::range(15, 39).unwrap();
        assert_eq!(
            ages.partition(AgeGrouping::TenYear).unwrap_err().reason(),
            Some(ReasonCode::PartialAgeBlock)
        );
        assert_eq!(ages.partition(AgeGrouping::FiveYear).unwrap().len(), 5);
    }

    #[test]
    fn test_wire_blocks() {
        let ages = Ages::range(15, 24).unwrap();
        assert_eq!(ages.wire_blocks(AgeGrouping::TenYear).unwrap(), vec!["15-24"]);
        assert_eq!(
            ages.wire_blocks(AgeGrouping::FiveYear).unwrap(),
            vec!["15-19", "20-24"]
        );
        let singles = Ages::range(3, 4).unwrap();
        assert_eq!(
            singles.wire_blocks(AgeGrouping::SingleYear).unwrap(),
            vec!["3", "4"]
        );
    }
}
