//! Typed query layer for the CDC WONDER Detailed Mortality (D76) dataset
//!
//! This crate wraps WONDER's verbose positional HTTP+XML protocol in typed
//! filters and groupings:
//! - validated domain values (ages, dates, demographic categories, ICD-10
//!   cause codes)
//! - a chaining request builder that assembles the exact wire parameter set
//! - decoding of the rowspan-compressed reply into a labeled table
//!
//! By querying the service, users implicitly agree to abide by CDC's data
//! use restrictions: <https://wonder.cdc.gov/datause.html>
//!
//! Sub-national figures (region, state, county, urbanization) cannot be
//! filtered or grouped: WONDER withholds them from API queries. Counts of
//! nine or fewer persons arrive as the text "Suppressed", rates over fewer
//! than twenty deaths as "Unreliable", and rates without a population
//! denominator as "Not Applicable".
//!
//! # Example
//!
//! ```no_run
//! use cdc_wonder::{Grouping, Weekday, WonderRequest};
//!
//! # fn main() -> cdc_wonder::Result<()> {
//! let mut request = WonderRequest::new();
//! request
//!     .group_by(&[Grouping::Gender, Grouping::Year])?
//!     .weekday(&[Weekday::Saturday, Weekday::Sunday])?;
//!
//! let response = request.send()?;
//! for row in response.to_table()?.rows() {
//!     println!("{row:?}");
//! }
//! # Ok(())
//! # }
//! ```

// Re-export all public APIs from internal crates
pub use cdc_wonder_client as client;
pub use cdc_wonder_diagnostics as diagnostics;
pub use cdc_wonder_types as types;

// Convenience re-exports
pub use cdc_wonder_client::{
    Cell, HttpTransport, Table, Transport, WonderRequest, WonderResponse,
};
pub use cdc_wonder_diagnostics::{ReasonCode, Result, WonderError};
pub use cdc_wonder_types::{
    AgeGrouping, Ages, Autopsy, Category, DateToken, Dates, Gender, Grouping, HispanicOrigin,
    Icd10Code, Period, PlaceOfDeath, Race, Weekday, Year, YearMonth,
};
