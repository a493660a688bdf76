//! The academic term cycle.
//!
//! Term names, their six-digit code suffixes, their neighbours in the cycle and
//! their sort position are data, not code. The default calendar is the
//! Spring → Summer → Fall → Winter cycle; institutions without a Winter term can
//! drop it from their configuration.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A neighbouring term, relative to the year of the term that points at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjacentTerm {
    pub term: String,
    #[serde(default)]
    pub year_offset: i32,
}

impl AdjacentTerm {
    fn new(term: &str, year_offset: i32) -> Self {
        AdjacentTerm {
            term: term.to_string(),
            year_offset,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermDef {
    pub name: String,
    /// Last two digits of a term code (`2021` + `31` = Fall 2021).
    #[serde(default)]
    pub code_suffix: Option<String>,
    /// Term inferred for a block sitting just before this term.
    pub previous: AdjacentTerm,
    /// Term inferred for a block sitting just after this term.
    pub next: AdjacentTerm,
}

/// Ordered list of terms; list order is the within-year sort position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCalendar {
    pub terms: Vec<TermDef>,
}

impl Default for TermCalendar {
    fn default() -> Self {
        let term = |name: &str, suffix: &str, previous: AdjacentTerm, next: AdjacentTerm| TermDef {
            name: name.to_string(),
            code_suffix: Some(suffix.to_string()),
            previous,
            next,
        };
        TermCalendar {
            terms: vec![
                term(
                    "Spring",
                    "11",
                    AdjacentTerm::new("Fall", -1),
                    AdjacentTerm::new("Fall", 0),
                ),
                term(
                    "Summer",
                    "21",
                    AdjacentTerm::new("Spring", 0),
                    AdjacentTerm::new("Fall", 0),
                ),
                term(
                    "Fall",
                    "31",
                    AdjacentTerm::new("Summer", 0),
                    AdjacentTerm::new("Spring", 1),
                ),
                term(
                    "Winter",
                    "41",
                    AdjacentTerm::new("Fall", 0),
                    AdjacentTerm::new("Spring", 1),
                ),
            ],
        }
    }
}

/// Split a `"Term Year"` label into its parts.
///
/// Exactly two space-separated parts are required and the year must be all
/// digits; anything else is not a parsable label.
pub fn split_label(label: &str) -> Option<(&str, i32)> {
    let mut parts = label.split(' ');
    let (term, year, rest) = (parts.next()?, parts.next()?, parts.next());
    if rest.is_some() || year.is_empty() || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((term, year.parse().ok()?))
}

fn format_label(term: &str, year: i32) -> String {
    format!("{} {}", term, year)
}

impl TermCalendar {
    /// Check that the calendar is internally consistent.
    pub fn validate(&self) -> Result<()> {
        if self.terms.is_empty() {
            return Err(CoreError::config("calendar must define at least one term"));
        }

        let mut names = HashSet::new();
        let mut suffixes = HashSet::new();
        for def in &self.terms {
            if def.name.is_empty() || def.name.contains(char::is_whitespace) {
                return Err(CoreError::config(format!(
                    "invalid term name {:?}: must be a single non-empty word",
                    def.name
                )));
            }
            if !names.insert(def.name.as_str()) {
                return Err(CoreError::config(format!("duplicate term {:?}", def.name)));
            }
            if let Some(suffix) = &def.code_suffix {
                if suffix.len() != 2 || !suffix.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(CoreError::config(format!(
                        "term {:?} has code suffix {:?}, expected two digits",
                        def.name, suffix
                    )));
                }
                if !suffixes.insert(suffix.as_str()) {
                    return Err(CoreError::config(format!(
                        "code suffix {:?} is used by more than one term",
                        suffix
                    )));
                }
            }
        }

        for def in &self.terms {
            for adjacent in [&def.previous, &def.next] {
                if !names.contains(adjacent.term.as_str()) {
                    return Err(CoreError::config(format!(
                        "term {:?} refers to unknown term {:?}",
                        def.name, adjacent.term
                    )));
                }
            }
        }

        Ok(())
    }

    fn find(&self, name: &str) -> Option<&TermDef> {
        self.terms.iter().find(|def| def.name == name)
    }

    /// Within-year sort position of a term name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.terms.iter().position(|def| def.name == name)
    }

    /// Decode a six-digit term code such as `202131` into `"Fall 2021"`.
    pub fn decode_code(&self, code: &str) -> Option<String> {
        if code.len() != 6 || !code.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let (year, suffix) = code.split_at(4);
        let year: i32 = year.parse().ok()?;
        let def = self
            .terms
            .iter()
            .find(|def| def.code_suffix.as_deref() == Some(suffix))?;
        Some(format_label(&def.name, year))
    }

    /// Label of the term expected right before `label`.
    pub fn predecessor(&self, label: &str) -> Option<String> {
        let (term, year) = split_label(label)?;
        let prev = &self.find(term)?.previous;
        Some(format_label(&prev.term, year + prev.year_offset))
    }

    /// Label of the term expected right after `label`.
    pub fn successor(&self, label: &str) -> Option<String> {
        let (term, year) = split_label(label)?;
        let next = &self.find(term)?.next;
        Some(format_label(&next.term, year + next.year_offset))
    }

    /// Chronological sort key. Unparsable labels and unknown term names sort
    /// after every real term.
    pub fn sort_key(&self, label: &str) -> (i32, usize) {
        match split_label(label) {
            Some((term, year)) => (year, self.position(term).unwrap_or(usize::MAX)),
            None => (i32::MAX, usize::MAX),
        }
    }

    /// Pattern for a printed term heading, e.g. `Fall 2022` or `Spring - 2023`.
    ///
    /// Capture 1 is the term name, capture 2 the year.
    pub fn heading_regex(&self) -> Result<Regex> {
        let names: Vec<String> = self.terms.iter().map(|d| regex::escape(&d.name)).collect();
        Regex::new(&format!(r"\b({})\s*-?\s*(20\d{{2}})\b", names.join("|")))
            .map_err(|e| CoreError::config(format!("cannot build term pattern: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_calendar_is_valid() {
        TermCalendar::default().validate().unwrap();
    }

    #[test]
    fn test_decode_code() {
        let cal = TermCalendar::default();
        assert_eq!(cal.decode_code("202131").as_deref(), Some("Fall 2021"));
        assert_eq!(cal.decode_code("202311").as_deref(), Some("Spring 2023"));
        assert_eq!(cal.decode_code("202221").as_deref(), Some("Summer 2022"));
        assert_eq!(cal.decode_code("202041").as_deref(), Some("Winter 2020"));
        assert_eq!(cal.decode_code("202199"), None);
        assert_eq!(cal.decode_code("20213"), None);
        assert_eq!(cal.decode_code("2021ab"), None);
    }

    #[test]
    fn test_predecessor_cycle() {
        let cal = TermCalendar::default();
        assert_eq!(cal.predecessor("Fall 2021").as_deref(), Some("Summer 2021"));
        assert_eq!(cal.predecessor("Summer 2021").as_deref(), Some("Spring 2021"));
        assert_eq!(cal.predecessor("Spring 2022").as_deref(), Some("Fall 2021"));
        assert_eq!(cal.predecessor("Winter 2021").as_deref(), Some("Fall 2021"));
    }

    #[test]
    fn test_successor_cycle() {
        let cal = TermCalendar::default();
        assert_eq!(cal.successor("Fall 2021").as_deref(), Some("Spring 2022"));
        assert_eq!(cal.successor("Spring 2021").as_deref(), Some("Fall 2021"));
        assert_eq!(cal.successor("Summer 2021").as_deref(), Some("Fall 2021"));
        assert_eq!(cal.successor("Winter 2021").as_deref(), Some("Spring 2022"));
    }

    #[test]
    fn test_adjacency_of_unparsable_label() {
        let cal = TermCalendar::default();
        assert_eq!(cal.predecessor("Unknown Term"), None);
        assert_eq!(cal.successor("Fall"), None);
        assert_eq!(cal.successor("Autumn 2021"), None);
    }

    #[test]
    fn test_split_label() {
        assert_eq!(split_label("Fall 2021"), Some(("Fall", 2021)));
        assert_eq!(split_label("Fall  2021"), None);
        assert_eq!(split_label("Unknown Term"), None);
        assert_eq!(split_label("Fall 2021 extra"), None);
    }

    #[test]
    fn test_sort_key_orders_terms_within_year() {
        let cal = TermCalendar::default();
        assert!(cal.sort_key("Spring 2021") < cal.sort_key("Summer 2021"));
        assert!(cal.sort_key("Summer 2021") < cal.sort_key("Fall 2021"));
        assert!(cal.sort_key("Fall 2021") < cal.sort_key("Winter 2021"));
        assert!(cal.sort_key("Winter 2021") < cal.sort_key("Spring 2022"));
        assert!(cal.sort_key("Spring 2099") < cal.sort_key("Unknown Term"));
    }

    #[test]
    fn test_heading_regex() {
        let re = TermCalendar::default().heading_regex().unwrap();
        let caps = re.captures("Fall 2022 Semester").unwrap();
        assert_eq!(&caps[1], "Fall");
        assert_eq!(&caps[2], "2022");
        let caps = re.captures("Spring - 2023").unwrap();
        assert_eq!(&caps[1], "Spring");
        assert!(re.captures("fall 2022").is_none());
        assert!(re.captures("Fall 1999").is_none());
    }

    #[test]
    fn test_validate_rejects_dangling_reference() {
        let mut cal = TermCalendar::default();
        cal.terms.retain(|d| d.name != "Winter");
        // Fall and Spring never point at Winter, so dropping it is fine.
        cal.validate().unwrap();

        cal.terms.retain(|d| d.name != "Summer");
        let err = cal.validate().unwrap_err();
        assert!(err.to_string().contains("Summer"));
    }

    #[test]
    fn test_validate_rejects_duplicates_and_bad_suffix() {
        let mut cal = TermCalendar::default();
        cal.terms[1].code_suffix = Some("11".into());
        assert!(cal.validate().is_err());

        let mut cal = TermCalendar::default();
        cal.terms[0].code_suffix = Some("1".into());
        assert!(cal.validate().is_err());

        let mut cal = TermCalendar::default();
        cal.terms.push(cal.terms[0].clone());
        assert!(cal.validate().is_err());

        assert!(TermCalendar { terms: vec![] }.validate().is_err());
    }
}
