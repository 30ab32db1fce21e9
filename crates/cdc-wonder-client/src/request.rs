//! Query builder for the Detailed Mortality (D76) dataset
//!
//! A [`WonderRequest`] starts from the same defaults as the WONDER web form
//! (grouped by year; all ages, genders, races, origins, dates, weekdays,
//! autopsy states, places and causes of death) and accumulates validated
//! filter and grouping settings through chained setters. `send` serializes
//! the parameter set and hands it to the transport.
//!
//! A builder instance is not safe for concurrent use from multiple threads;
//! callers must serialize access to it. Independent instances share no
//! state.
//!
//! Queries can neither filter nor group by any location or urbanization
//! field: WONDER's public API withholds sub-national mortality data, so the
//! corresponding slots stay at their fixed defaults.

use crate::params::WireParams;
use crate::response::WonderResponse;
use crate::transport::{HttpTransport, Transport};
use cdc_wonder_diagnostics::{ReasonCode, Result, WonderError};
use cdc_wonder_types::{Ages, Autopsy, Category, Dates, Gender, Grouping, HispanicOrigin,
    Icd10Code, PlaceOfDeath, Race, Weekday};

/// First year covered by the dataset
pub const MIN_DATA_YEAR: i32 = 1999;
/// Last year covered by the dataset
pub const MAX_DATA_YEAR: i32 = 2018;

/// Maximum number of grouping dimensions per query
pub const MAX_GROUPINGS: usize = 5;

const NONE_SLOT: &str = "*None*";
const ALL_SLOT: &str = "*All*";

/// Mutable query builder over the D76 dataset.
///
/// Setters validate immediately and return `&mut Self` for chaining;
/// nothing touches the network until [`send`](Self::send).
#[derive(Debug, Clone)]
pub struct WonderRequest {
    params: WireParams,
    column_labels: Vec<String>,
    ages: Option<Ages>,
}

impl Default for WonderRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl WonderRequest {
    /// Create a builder holding the web form's default parameter set
    pub fn new() -> Self {
        Self {
            params: default_params(),
            column_labels: vec![Grouping::Year.display_name().to_string()],
            ages: None,
        }
    }

    /// Group results by one to five dimensions.
    ///
    /// Clears the previous grouping entirely, then assigns the distinct
    /// dimensions (duplicates collapse silently) to successive slots.
    /// Age-grouping dimensions require a prior [`ages`](Self::ages) call
    /// whose set divides into aligned blocks of the requested granularity.
    pub fn group_by(&mut self, dimensions: &[Grouping]) -> Result<&mut Self> {
        if dimensions.is_empty() || dimensions.len() > MAX_GROUPINGS {
            return Err(WonderError::validation(
                ReasonCode::GroupingCountOutOfRange,
                format!(
                    "expected between 1 and {MAX_GROUPINGS} grouping dimensions, got {}",
                    dimensions.len()
                ),
            ));
        }

        let mut distinct: Vec<Grouping> = Vec::new();
        for &dimension in dimensions {
            if !distinct.iter().any(|d| d.wire_code() == dimension.wire_code()) {
                distinct.push(dimension);
            }
        }

        // Validate age groupings before touching any slot, so a rejected
        // call leaves the builder unchanged.
        let mut age_filters: Vec<(String, Vec<String>)> = Vec::new();
        let mut age_slot_code: Option<&'static str> = None;
        for dimension in &distinct {
            let Some(granularity) = dimension.age_grouping() else {
                continue;
            };
            let ages = self.ages.as_ref().ok_or_else(|| {
                WonderError::validation(
                    ReasonCode::AgesFilterRequired,
                    format!("grouping by {granularity} requires an ages filter"),
                )
            })?;
            if !ages.is_valid_grouping(granularity) {
                return Err(WonderError::validation(
                    ReasonCode::InvalidAgeGrouping,
                    format!("cannot group ages {ages} by {granularity}"),
                ));
            }
            age_filters.push((
                format!("V_{}", dimension.wire_code()),
                ages.wire_blocks(granularity)?,
            ));
            age_slot_code = Some(granularity.wire_code());
        }

        self.column_labels.clear();
        self.params
            .set("O_age", Grouping::SingleYearAgeGroups.wire_code());
        for slot in 1..=MAX_GROUPINGS {
            self.params.set(format!("B_{slot}"), NONE_SLOT);
        }
        for (index, dimension) in distinct.iter().enumerate() {
            self.params
                .set(format!("B_{}", index + 1), dimension.wire_code());
            self.column_labels
                .push(dimension.display_name().to_string());
        }
        if let Some(code) = age_slot_code {
            self.params.set("O_age", code);
        }
        for (slot, blocks) in age_filters {
            self.params.set_list(slot, blocks);
        }
        Ok(self)
    }

    /// Filter by one or more age sets; the sets are unioned
    pub fn ages(&mut self, sets: &[Ages]) -> Result<&mut Self> {
        let total = union_all(sets, "Ages", Ages::union)?;
        self.params.set_list(
            format!("V_{}", Grouping::SingleYearAgeGroups.wire_code()),
            total.as_sorted().iter().map(u8::to_string).collect(),
        );
        self.ages = Some(total);
        Ok(self)
    }

    /// Filter by one or more date sets; the sets are unioned.
    ///
    /// Every month must fall within the dataset's 1999-2018 range.
    pub fn dates(&mut self, sets: &[Dates]) -> Result<&mut Self> {
        let total = union_all(sets, "Dates", Dates::union)?;
        if let Some(month) = total
            .as_sorted()
            .iter()
            .find(|m| m.year() < MIN_DATA_YEAR || m.year() > MAX_DATA_YEAR)
        {
            return Err(WonderError::validation(
                ReasonCode::DateOutOfRange,
                format!("{month} outside the {MIN_DATA_YEAR}-{MAX_DATA_YEAR} data range"),
            ));
        }
        let mut tokens: Vec<String> = total
            .to_wire_tokens()
            .iter()
            .map(ToString::to_string)
            .collect();
        tokens.sort();
        self.params.set_list("F_D76.V1", tokens);
        Ok(self)
    }

    /// Filter by gender
    pub fn gender(&mut self, values: &[Gender]) -> Result<&mut Self> {
        self.filter(values)
    }

    /// Filter by race
    pub fn race(&mut self, values: &[Race]) -> Result<&mut Self> {
        self.filter(values)
    }

    /// Filter by Hispanic origin
    pub fn hispanic_origin(&mut self, values: &[HispanicOrigin]) -> Result<&mut Self> {
        self.filter(values)
    }

    /// Filter by weekday of death
    pub fn weekday(&mut self, values: &[Weekday]) -> Result<&mut Self> {
        self.filter(values)
    }

    /// Filter by autopsy status
    pub fn autopsy(&mut self, values: &[Autopsy]) -> Result<&mut Self> {
        self.filter(values)
    }

    /// Filter by place of death
    pub fn place_of_death(&mut self, values: &[PlaceOfDeath]) -> Result<&mut Self> {
        self.filter(values)
    }

    /// Filter by underlying cause of death.
    ///
    /// Overlapping codes reduce to an antichain: a code subsumed by one
    /// already accepted is dropped, and a code subsuming earlier ones
    /// replaces them.
    pub fn cause_of_death<I>(&mut self, codes: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = Icd10Code>,
    {
        let mut accepted: Vec<Icd10Code> = Vec::new();
        for code in codes {
            if accepted.iter().any(|kept| kept.contains(&code)) {
                continue;
            }
            accepted.retain(|kept| !code.contains(kept));
            accepted.push(code);
        }
        if accepted.is_empty() {
            return Err(WonderError::validation(
                ReasonCode::EmptySelection,
                "at least one ICD-10 code is required",
            ));
        }
        self.params.set_list(
            "F_D76.V2",
            accepted.iter().map(|c| c.wire_code().to_string()).collect(),
        );
        Ok(self)
    }

    /// Column labels of the decoded table, in grouping-slot order
    pub fn column_labels(&self) -> &[String] {
        &self.column_labels
    }

    /// Render the full request document
    pub fn to_request_xml(&self) -> String {
        self.params.to_request_xml()
    }

    /// Current value of a wire slot
    pub fn param(&self, name: &str) -> Option<&crate::params::ParamValue> {
        self.params.get(name)
    }

    /// Send this request to the WONDER endpoint
    pub fn send(&self) -> Result<WonderResponse> {
        self.send_with(&HttpTransport::new())
    }

    /// Send this request through a caller-supplied transport
    pub fn send_with(&self, transport: &dyn Transport) -> Result<WonderResponse> {
        let reply = transport.post(&self.to_request_xml())?;
        Ok(WonderResponse::new(reply, self.column_labels.clone()))
    }

    fn filter<C: Category>(&mut self, values: &[C]) -> Result<&mut Self> {
        self.params.set_list(C::SLOT, selection_codes(values)?);
        Ok(self)
    }
}

/// Validate one filter call: non-empty, deduplicated, and free of
/// exclusive-option conflicts. Returns the selected wire codes in
/// first-occurrence order.
fn selection_codes<C: Category>(values: &[C]) -> Result<Vec<String>> {
    if values.is_empty() {
        return Err(WonderError::validation(
            ReasonCode::EmptySelection,
            format!("at least one {} value is required", C::DIMENSION),
        ));
    }
    let mut selected: Vec<C> = Vec::new();
    for &value in values {
        if !selected.contains(&value) {
            selected.push(value);
        }
    }
    if selected.len() > 1 {
        if let Some(exclusive) = selected.iter().find(|v| v.is_exclusive()) {
            return Err(WonderError::validation(
                ReasonCode::ExclusiveOptionConflict,
                format!(
                    "{} has both {exclusive:?} and other options selected; \
                     select either {exclusive:?} or specific options",
                    C::DIMENSION,
                ),
            ));
        }
    }
    Ok(selected
        .iter()
        .map(|v| v.wire_code().to_string())
        .collect())
}

fn union_all<T: Default>(
    sets: &[T],
    dimension: &str,
    union: impl Fn(&T, &T) -> T,
) -> Result<T> {
    if sets.is_empty() {
        return Err(WonderError::validation(
            ReasonCode::EmptySelection,
            format!("at least one {dimension} value is required"),
        ));
    }
    Ok(sets.iter().fold(T::default(), |total, set| union(&total, set)))
}

/// Default parameter set of the D76 request form.
///
/// Built fresh per builder instance. Slot order mirrors the form so the
/// rendered document matches what the endpoint expects positionally.
fn default_params() -> WireParams {
    let mut p = WireParams::new();

    p.set("accept_datause_restrictions", "true");

    // Group-by slots; only B_1 is populated by default (group by year).
    p.set("B_1", Grouping::Year.wire_code());
    for slot in 2..=MAX_GROUPINGS {
        p.set(format!("B_{slot}"), NONE_SLOT);
    }

    // Measures. Deaths, population and crude rate are fixed and must all be
    // requested.
    p.set("M_1", "D76.M1");
    p.set("M_2", "D76.M2");
    p.set("M_3", "D76.M3");

    // Finder slots. The region/state slots may not be narrowed (no
    // sub-national data over the API).
    p.set_list("F_D76.V1", vec![ALL_SLOT.into()]);
    p.set_list("F_D76.V10", vec![ALL_SLOT.into()]);
    p.set_list("F_D76.V2", vec![ALL_SLOT.into()]);
    p.set_list("F_D76.V27", vec![ALL_SLOT.into()]);
    p.set_list("F_D76.V9", vec![ALL_SLOT.into()]);

    // "Currently selected" annotations shown beside the finder controls.
    p.set("I_D76.V1", "*All* (All Dates)");
    p.set("I_D76.V10", "*All* (The United States)");
    p.set("I_D76.V2", "*All* (All Causes of Death)");
    p.set("I_D76.V27", "*All* (The United States)");
    p.set("I_D76.V9", "*All* (The United States)");
    p.set("I_D76.V25", "All Causes of Death");

    // Selection list slots.
    p.set("V_D76.V1", "");
    p.set("V_D76.V2", "");
    p.set("V_D76.V4", ALL_SLOT);
    p.set("V_D76.V5", ALL_SLOT);
    p.set("V_D76.V6", "00");
    p.set("V_D76.V7", ALL_SLOT);
    p.set("V_D76.V8", ALL_SLOT);
    p.set("V_D76.V9", "");
    p.set("V_D76.V10", "");
    p.set("V_D76.V11", ALL_SLOT);
    p.set("V_D76.V12", ALL_SLOT);
    p.set("V_D76.V17", ALL_SLOT);
    p.set("V_D76.V19", ALL_SLOT);
    p.set("V_D76.V20", ALL_SLOT);
    p.set("V_D76.V21", ALL_SLOT);
    p.set("V_D76.V22", ALL_SLOT);
    p.set("V_D76.V23", ALL_SLOT);
    p.set("V_D76.V24", ALL_SLOT);
    p.set("V_D76.V25", "");
    p.set("V_D76.V27", "");
    p.set("V_D76.V51", ALL_SLOT);
    p.set("V_D76.V52", ALL_SLOT);

    // Form controls: finder modes, age-adjustment, precision, totals.
    p.set("O_V1_fmode", "freg");
    p.set("O_V2_fmode", "freg");
    p.set("O_V9_fmode", "freg");
    p.set("O_V10_fmode", "freg");
    p.set("O_V27_fmode", "freg");
    p.set("O_aar", "aar_none");
    p.set("O_aar_pop", "0000");
    p.set("O_age", Grouping::SingleYearAgeGroups.wire_code());
    p.set("O_javascript", "on");
    p.set("O_location", "D76.V9");
    p.set("O_precision", "9");
    p.set("O_rate_per", "100000");
    p.set("O_show_totals", "false");
    p.set("O_show_zeros", "true");
    p.set("O_timeout", "600");
    p.set("O_title", "cdc-wonder-rs request");
    p.set("O_ucd", "D76.V2");
    p.set("O_urban", "D76.V19");

    // Non-standard age-adjusted rate slots, unused while O_aar is off.
    p.set("VM_D76.M6_D76.V1_S", ALL_SLOT);
    p.set("VM_D76.M6_D76.V7", ALL_SLOT);
    p.set("VM_D76.M6_D76.V8", ALL_SLOT);
    p.set("VM_D76.M6_D76.V10", "");
    p.set("VM_D76.M6_D76.V17", ALL_SLOT);

    // Hidden form inputs the controller requires verbatim.
    p.set("action-Send", "Send");
    p.set("finder-stage-D76.V1", "codeset");
    p.set("finder-stage-D76.V2", "codeset");
    p.set("finder-stage-D76.V27", "codeset");
    p.set("finder-stage-D76.V9", "codeset");
    p.set("stage", "request");

    p
}
