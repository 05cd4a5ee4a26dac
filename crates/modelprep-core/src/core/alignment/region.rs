use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Weight used when an entry omits it.
pub const DEFAULT_REGION_WEIGHT: f64 = 2.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RegionParseError {
    #[error("Malformed region entry '{0}': expected 'start-end:template[:weight]'")]
    MalformedEntry(String),
    #[error("Invalid residue bound '{value}' in region entry '{entry}'")]
    InvalidBound { entry: String, value: String },
    #[error("Region {start}-{end} starts after it ends")]
    InvertedRange { start: isize, end: isize },
    #[error("Region entry '{0}' names no template")]
    EmptyTemplate(String),
    #[error("Invalid weight '{value}' in region entry '{entry}': must be a positive number")]
    InvalidWeight { entry: String, value: String },
}

/// A hint that residues `start..=end` (global numbering) should follow
/// `preferred_template`. The core only carries the hint; it never enforces it.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionPreference {
    pub start_residue: isize,
    pub end_residue: isize,
    pub preferred_template: String,
    pub weight: f64,
}

impl RegionPreference {
    pub fn contains(&self, residue: isize) -> bool {
        (self.start_residue..=self.end_residue).contains(&residue)
    }

    /// Number of residues covered, bounds included; zero for an inverted range.
    pub fn span(&self) -> usize {
        if self.end_residue < self.start_residue {
            return 0;
        }
        self.end_residue
            .abs_diff(self.start_residue)
            .saturating_add(1)
    }

    /// Both bounds translated to model numbering.
    pub fn model_range(&self, offset: isize) -> (isize, isize) {
        (
            map_to_model_numbering(self.start_residue, offset),
            map_to_model_numbering(self.end_residue, offset),
        )
    }
}

impl FromStr for RegionPreference {
    type Err = RegionParseError;

    /// Parses one `start-end:template[:weight]` entry.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let entry = s.trim();
        let malformed = || RegionParseError::MalformedEntry(entry.to_string());

        let parts: Vec<&str> = entry.split(':').map(str::trim).collect();
        let (range, template, weight) = match parts.as_slice() {
            [range, template] => (*range, *template, None),
            [range, template, weight] => (*range, *template, Some(*weight)),
            _ => return Err(malformed()),
        };

        let (start, end) = split_range(range).ok_or_else(malformed)?;
        let bound = |value: &str| {
            value
                .trim()
                .parse::<isize>()
                .map_err(|_| RegionParseError::InvalidBound {
                    entry: entry.to_string(),
                    value: value.trim().to_string(),
                })
        };
        let start_residue = bound(start)?;
        let end_residue = bound(end)?;
        if start_residue > end_residue {
            return Err(RegionParseError::InvertedRange {
                start: start_residue,
                end: end_residue,
            });
        }

        if template.is_empty() {
            return Err(RegionParseError::EmptyTemplate(entry.to_string()));
        }

        let weight = match weight {
            None => DEFAULT_REGION_WEIGHT,
            Some(value) => value
                .parse::<f64>()
                .ok()
                .filter(|w| w.is_finite() && *w > 0.0)
                .ok_or_else(|| RegionParseError::InvalidWeight {
                    entry: entry.to_string(),
                    value: value.to_string(),
                })?,
        };

        Ok(Self {
            start_residue,
            end_residue,
            preferred_template: template.to_string(),
            weight,
        })
    }
}

impl fmt::Display for RegionPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}:{}:{}",
            self.start_residue, self.end_residue, self.preferred_template, self.weight
        )
    }
}

/// Splits `start-end` where either bound may itself be negative (`-5--1`).
/// Prefers the first separator that leaves two numbers; otherwise falls back
/// to the first separator so the bound error names the bad value.
fn split_range(range: &str) -> Option<(&str, &str)> {
    let is_number = |text: &str| text.trim().parse::<isize>().is_ok();
    let mut separators = range
        .match_indices('-')
        .map(|(index, _)| index)
        .filter(|&index| index > 0);
    let first = separators.next()?;
    std::iter::once(first)
        .chain(separators)
        .map(|index| (&range[..index], &range[index + 1..]))
        .find(|(start, end)| is_number(start) && is_number(end))
        .or(Some((&range[..first], &range[first + 1..])))
}

/// Parses a comma-separated list of region entries. Blank input yields no entries.
pub fn parse_spec(text: &str) -> Result<Vec<RegionPreference>, RegionParseError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    text.split(',').map(str::parse).collect()
}

/// Translates a global residue number to model numbering.
pub fn map_to_model_numbering(global_residue: isize, offset: isize) -> isize {
    global_residue - offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_entries_with_default_weight() {
        let prefs = parse_spec("519-536:6MEJ_0001:2.0,600-650:8RJJ_0001").unwrap();
        assert_eq!(prefs.len(), 2);
        assert_eq!(
            prefs[0],
            RegionPreference {
                start_residue: 519,
                end_residue: 536,
                preferred_template: "6MEJ_0001".into(),
                weight: 2.0,
            }
        );
        assert_eq!(prefs[1].preferred_template, "8RJJ_0001");
        assert_eq!(prefs[1].weight, DEFAULT_REGION_WEIGHT);
    }

    #[test]
    fn blank_input_yields_no_entries() {
        assert_eq!(parse_spec("").unwrap(), vec![]);
        assert_eq!(parse_spec("   ").unwrap(), vec![]);
    }

    #[test]
    fn whitespace_around_fields_is_ignored() {
        let prefs = parse_spec(" 10 - 20 : tmpl : 1.5 ").unwrap();
        assert_eq!(prefs[0].start_residue, 10);
        assert_eq!(prefs[0].end_residue, 20);
        assert_eq!(prefs[0].weight, 1.5);
    }

    #[test]
    fn single_residue_region_is_allowed() {
        let pref: RegionPreference = "42-42:tmpl".parse().unwrap();
        assert_eq!(pref.span(), 1);
        assert!(pref.contains(42));
        assert!(!pref.contains(43));
    }

    #[test]
    fn rejects_non_numeric_bounds() {
        assert!(matches!(
            parse_spec("a-10:tmpl"),
            Err(RegionParseError::InvalidBound { value, .. }) if value == "a"
        ));
        assert!(matches!(
            parse_spec("1-2-3:tmpl"),
            Err(RegionParseError::InvalidBound { .. })
        ));
    }

    #[test]
    fn negative_bounds_are_accepted() {
        let pref: RegionPreference = "-5--1:tmpl".parse().unwrap();
        assert_eq!((pref.start_residue, pref.end_residue), (-5, -1));
        assert_eq!(pref.span(), 5);

        let across_zero: RegionPreference = "-3-4:tmpl:1.0".parse().unwrap();
        assert_eq!((across_zero.start_residue, across_zero.end_residue), (-3, 4));
        assert_eq!(across_zero.span(), 8);
        assert!(matches!(
            parse_spec("-5:tmpl"),
            Err(RegionParseError::MalformedEntry(_))
        ));
    }

    #[test]
    fn span_is_zero_for_an_inverted_preference_and_never_wraps() {
        let mut pref: RegionPreference = "1-2:tmpl".parse().unwrap();
        pref.start_residue = 10;
        assert_eq!(pref.span(), 0);

        pref.start_residue = isize::MIN;
        pref.end_residue = isize::MAX;
        assert_eq!(pref.span(), usize::MAX);
    }

    #[test]
    fn rejects_inverted_ranges() {
        assert_eq!(
            parse_spec("50-10:tmpl"),
            Err(RegionParseError::InvertedRange { start: 50, end: 10 })
        );
    }

    #[test]
    fn rejects_malformed_entries() {
        for spec in ["519-536", "519:tmpl", "1-2:a:1.0:extra", "1-2:tmpl,"] {
            assert!(parse_spec(spec).is_err(), "{spec}");
        }
        assert!(matches!(
            parse_spec("1-2:"),
            Err(RegionParseError::EmptyTemplate(_))
        ));
    }

    #[test]
    fn rejects_non_positive_or_non_numeric_weights() {
        for spec in ["1-2:t:0", "1-2:t:-1.0", "1-2:t:heavy", "1-2:t:inf"] {
            assert!(
                matches!(parse_spec(spec), Err(RegionParseError::InvalidWeight { .. })),
                "{spec}"
            );
        }
    }

    #[test]
    fn maps_to_model_numbering_with_offset() {
        assert_eq!(map_to_model_numbering(519, 383), 136);
        let pref: RegionPreference = "519-536:tmpl".parse().unwrap();
        assert_eq!(pref.model_range(383), (136, 153));
    }

    #[test]
    fn display_round_trips_through_the_parser() {
        let pref: RegionPreference = "519-536:6MEJ_0001:2.5".parse().unwrap();
        assert_eq!(pref.to_string(), "519-536:6MEJ_0001:2.5");
        assert_eq!(pref.to_string().parse::<RegionPreference>().unwrap(), pref);
    }
}
