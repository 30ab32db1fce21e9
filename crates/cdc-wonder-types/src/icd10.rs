//! ICD-10 cause-of-death codes
//!
//! A code is either a single entry (`A16`, `B08.2`) or a chapter-style range
//! (`K00-K92`). Containment between codes drives the request layer's
//! reduction of overlapping cause filters; the full catalogue and
//! description lookup are external to this crate.

use cdc_wonder_diagnostics::{ReasonCode, Result, WonderError};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static ENTRY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z])([0-9]{2})(?:\.([0-9]))?$").expect("valid pattern"));

/// A validated ICD-10 code or code range with containment queries.
///
/// Codes project onto a numeric axis (the letter selects a block of one
/// hundred, a trailing sub-code digit adds tenths: `B08.2` sits at 108.2, a
/// bare `A16` spans 16.0 through 16.9), and one code contains another when
/// its span covers the other's span.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Icd10Code {
    text: String,
    // span endpoints in tenths on the numeric axis, both inclusive
    lo: u32,
    hi: u32,
}

impl Icd10Code {
    /// Parse a single code (`A16`, `B08.2`) or a range (`K00-K92`)
    pub fn new(code: &str) -> Result<Self> {
        let text = code.trim().to_ascii_uppercase();
        let (lo, hi) = match text.split_once('-') {
            Some((start, end)) => {
                let (lo, _) = parse_entry(&text, start)?;
                let (_, hi) = parse_entry(&text, end)?;
                if hi < lo {
                    return Err(WonderError::validation(
                        ReasonCode::InvalidCauseCode,
                        format!("ICD-10 range '{text}' runs backwards"),
                    ));
                }
                (lo, hi)
            }
            None => parse_entry(&text, &text)?,
        };
        Ok(Self { text, lo, hi })
    }

    /// The code text as the wire protocol expects it
    pub fn wire_code(&self) -> &str {
        &self.text
    }

    /// Check whether this code's span covers `other` entirely
    pub fn contains(&self, other: &Icd10Code) -> bool {
        self.lo <= other.lo && other.hi <= self.hi
    }
}

impl fmt::Display for Icd10Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for Icd10Code {
    type Err = WonderError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

// Projects one code entry onto the tenths axis and returns its inclusive
// span: a sub-coded entry covers one tenth, a bare entry covers ten.
fn parse_entry(full: &str, entry: &str) -> Result<(u32, u32)> {
    let captures = ENTRY_PATTERN.captures(entry).ok_or_else(|| {
        WonderError::validation(
            ReasonCode::InvalidCauseCode,
            format!("'{full}' is not a valid ICD-10 code"),
        )
    })?;
    let letter = captures[1].bytes().next().expect("matched letter") - b'A';
    let number: u32 = captures[2].parse().expect("matched digits");
    let base = (u32::from(letter) * 100 + number) * 10;
    match captures.get(3) {
        Some(decimal) => {
            let tenth: u32 = decimal.as_str().parse().expect("matched digit");
            Ok((base + tenth, base + tenth))
        }
        None => Ok((base, base + 9)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn code(s: &str) -> Icd10Code {
        Icd10Code::new(s).unwrap()
    }

    #[rstest]
    #[case("A00", 0, 9)]
    #[case("A16", 160, 169)]
    #[case("A16.2", 162, 162)]
    #[case("B08.2", 1082, 1082)]
    fn test_numeric_projection(#[case] text: &str, #[case] lo: u32, #[case] hi: u32) {
        let parsed = code(text);
        assert_eq!((parsed.lo, parsed.hi), (lo, hi));
    }

    #[test]
    fn test_range_containment() {
        assert!(code("L80-L98").contains(&code("L98.9")));
        assert!(code("Y70-Y82").contains(&code("Y73")));
        assert!(code("Y89").contains(&code("Y89")));
        assert!(!code("Y84.0").contains(&code("Y83-Y84")));
    }

    #[test]
    fn test_rejects_malformed_codes() {
        for text in ["", "16", "AA16", "A16.25", "K92-K00"] {
            let err = Icd10Code::new(text).unwrap_err();
            assert_eq!(err.reason(), Some(ReasonCode::InvalidCauseCode), "{text}");
        }
    }

    #[test]
    fn test_normalizes_case_and_whitespace() {
        assert_eq!(code(" b08.2 ").wire_code(), "B08.2");
    }
}
