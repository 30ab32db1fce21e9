//! Grouping dimensions and filter categories with their D76 wire codes
//!
//! Every axis the remote service understands is a closed enum whose members
//! carry the opaque wire code the positional protocol expects. The query
//! layer never handles bare code strings.

use crate::AgeGrouping;
use cdc_wonder_diagnostics::WonderError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Axis a query's results can be aggregated by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grouping {
    // Demographics
    TenYearAgeGroups,
    FiveYearAgeGroups,
    SingleYearAgeGroups,
    Gender,
    HispanicOrigin,
    Race,

    // Year and month
    Year,
    Month,

    // Weekday, autopsy, place of death
    Weekday,
    Autopsy,
    PlaceOfDeath,

    // Cause of death
    LeadingCausesOfDeath,
    IcdChapter,
    IcdSubChapter,
    CauseOfDeath,
    IcdCauseList113,
    InjuryIntent,
    InjuryMechanism,
    DrugOrAlcoholInducedCauses,
}

impl Grouping {
    /// Get the wire code for this dimension
    pub const fn wire_code(&self) -> &'static str {
        match self {
            Self::TenYearAgeGroups => "D76.V5",
            Self::FiveYearAgeGroups => "D76.V51",
            Self::SingleYearAgeGroups => "D76.V52",
            Self::Gender => "D76.V7",
            Self::HispanicOrigin => "D76.V17",
            Self::Race => "D76.V8",
            Self::Year => "D76.V1-level1",
            Self::Month => "D76.V1-level2",
            Self::Weekday => "D76.V24",
            Self::Autopsy => "D76.V20",
            Self::PlaceOfDeath => "D76.V21",
            Self::LeadingCausesOfDeath => "D76.V28",
            Self::IcdChapter => "D76.V2-level1",
            Self::IcdSubChapter => "D76.V2-level2",
            Self::CauseOfDeath => "D76.V2-level3",
            Self::IcdCauseList113 => "D76.V4",
            Self::InjuryIntent => "D76.V22",
            Self::InjuryMechanism => "D76.V23",
            Self::DrugOrAlcoholInducedCauses => "D76.V25",
        }
    }

    /// Column label this dimension contributes to the decoded table
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::TenYearAgeGroups | Self::FiveYearAgeGroups | Self::SingleYearAgeGroups => "Age",
            Self::Gender => "Gender",
            Self::HispanicOrigin => "Hispanic Origin",
            Self::Race => "Race",
            Self::Year => "Year",
            Self::Month => "Month",
            Self::Weekday => "Weekday",
            Self::Autopsy => "Autopsy",
            Self::PlaceOfDeath => "Place of Death",
            Self::LeadingCausesOfDeath => "Leading Causes of Death",
            Self::IcdChapter => "ICD Chapter",
            Self::IcdSubChapter => "ICD Sub-Chapter",
            Self::CauseOfDeath => "Cause of Death",
            Self::IcdCauseList113 => "ICD-10 113 Cause List",
            Self::InjuryIntent => "Injury Intent",
            Self::InjuryMechanism => "Injury Mechanism & All Other Leading Causes",
            Self::DrugOrAlcoholInducedCauses => "Drug/Alcohol Induced Causes",
        }
    }

    /// Get the age-group granularity, if this is one of the three
    /// age-grouping dimensions
    pub const fn age_grouping(&self) -> Option<AgeGrouping> {
        match self {
            Self::TenYearAgeGroups => Some(AgeGrouping::TenYear),
            Self::FiveYearAgeGroups => Some(AgeGrouping::FiveYear),
            Self::SingleYearAgeGroups => Some(AgeGrouping::SingleYear),
            _ => None,
        }
    }
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl TryFrom<Grouping> for AgeGrouping {
    type Error = WonderError;

    fn try_from(grouping: Grouping) -> Result<Self, Self::Error> {
        grouping.age_grouping().ok_or_else(|| {
            WonderError::type_mismatch(format!(
                "{grouping:?} is not an age-grouping dimension"
            ))
        })
    }
}

/// Capability set shared by every filter category enum.
///
/// A filter dimension's setter takes values of exactly one implementing
/// type, so wrong-dimension arguments are rejected by the compiler rather
/// than at runtime.
pub trait Category: Copy + Eq + Hash + fmt::Debug {
    /// Dimension name used in error messages
    const DIMENSION: &'static str;

    /// Wire slot the dimension's selections are written to
    const SLOT: &'static str;

    /// Get the wire code for this category value
    fn wire_code(&self) -> &'static str;

    /// Check if this is the catch-all sentinel
    fn is_all(&self) -> bool;

    /// Check if this value excludes every other value in the same call.
    ///
    /// The catch-all sentinel always does; dimensions may add further
    /// exclusive members (Hispanic origin's "Not Stated").
    fn is_exclusive(&self) -> bool {
        self.is_all()
    }
}

/// Gender filter categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    All,
    Male,
    Female,
}

impl Category for Gender {
    const DIMENSION: &'static str = "Gender";
    const SLOT: &'static str = "V_D76.V7";

    fn wire_code(&self) -> &'static str {
        match self {
            Self::All => "*All*",
            Self::Male => "M",
            Self::Female => "F",
        }
    }

    fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

/// Race filter categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Race {
    All,
    AmericanIndianOrAlaskaNative,
    AsianOrPacificIslander,
    BlackOrAfricanAmerican,
    White,
}

impl Category for Race {
    const DIMENSION: &'static str = "Race";
    const SLOT: &'static str = "V_D76.V8";

    fn wire_code(&self) -> &'static str {
        match self {
            Self::All => "*All*",
            Self::AmericanIndianOrAlaskaNative => "1002-5",
            Self::AsianOrPacificIslander => "A-PI",
            Self::BlackOrAfricanAmerican => "2054-5",
            Self::White => "2106-3",
        }
    }

    fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

/// Hispanic origin filter categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HispanicOrigin {
    All,
    HispanicOrLatino,
    NotHispanicOrLatino,
    NotStated,
}

impl Category for HispanicOrigin {
    const DIMENSION: &'static str = "Hispanic Origin";
    const SLOT: &'static str = "V_D76.V17";

    fn wire_code(&self) -> &'static str {
        match self {
            Self::All => "*All*",
            Self::HispanicOrLatino => "2135-2",
            Self::NotHispanicOrLatino => "2186-2",
            Self::NotStated => "NS",
        }
    }

    fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    // "Not Stated" has no population denominator, so the service rejects it
    // alongside specific origins.
    fn is_exclusive(&self) -> bool {
        matches!(self, Self::All | Self::NotStated)
    }
}

/// Weekday filter categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    All,
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Unknown,
}

impl Category for Weekday {
    const DIMENSION: &'static str = "Weekday";
    const SLOT: &'static str = "V_D76.V24";

    fn wire_code(&self) -> &'static str {
        match self {
            Self::All => "*All*",
            Self::Sunday => "1",
            Self::Monday => "2",
            Self::Tuesday => "3",
            Self::Wednesday => "4",
            Self::Thursday => "5",
            Self::Friday => "6",
            Self::Saturday => "7",
            Self::Unknown => "9",
        }
    }

    fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

/// Autopsy filter categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Autopsy {
    All,
    No,
    Yes,
    Unknown,
}

impl Category for Autopsy {
    const DIMENSION: &'static str = "Autopsy";
    const SLOT: &'static str = "V_D76.V20";

    fn wire_code(&self) -> &'static str {
        match self {
            Self::All => "*All*",
            Self::No => "N",
            Self::Yes => "Y",
            Self::Unknown => "U",
        }
    }

    fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

/// Place-of-death filter categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaceOfDeath {
    All,
    MedicalFacilityInpatient,
    MedicalFacilityOutpatient,
    MedicalFacilityDeadOnArrival,
    MedicalFacilityUnknownStatus,
    DecedentHome,
    HospiceFacility,
    NursingHome,
    Other,
    Unknown,
}

impl Category for PlaceOfDeath {
    const DIMENSION: &'static str = "Place of Death";
    const SLOT: &'static str = "V_D76.V21";

    fn wire_code(&self) -> &'static str {
        match self {
            Self::All => "*All*",
            Self::MedicalFacilityInpatient => "1",
            Self::MedicalFacilityOutpatient => "2",
            Self::MedicalFacilityDeadOnArrival => "3",
            Self::MedicalFacilityUnknownStatus => "10",
            Self::DecedentHome => "4",
            Self::HospiceFacility => "5",
            Self::NursingHome => "6",
            Self::Other => "7",
            Self::Unknown => "9",
        }
    }

    fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}
