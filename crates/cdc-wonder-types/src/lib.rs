//! Domain values for the CDC WONDER Detailed Mortality (D76) dataset
//!
//! This crate defines the typed values a query is configured with:
//! - grouping dimensions and filter categories, each carrying its fixed
//!   wire code ([`Grouping`], [`Gender`], [`Race`], ...)
//! - age and date interval sets with the partitioning and run-compression
//!   rules the wire protocol requires ([`Ages`], [`Dates`])
//! - ICD-10 cause-of-death codes with range containment ([`Icd10Code`])
//!
//! Values validate on construction and are immutable afterwards; set
//! operations return new values.

mod ages;
mod dates;
mod enums;
mod icd10;

pub use ages::*;
pub use dates::*;
pub use enums::*;
pub use icd10::*;
