use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::Result;

/// Label assigned to blocks that resist every inference strategy.
pub const UNKNOWN_TERM: &str = "Unknown Term";

// ---------------------------------------------------------------------------
// Input: positioned tokens
// ---------------------------------------------------------------------------

/// A run of text at a position on the page.
///
/// `y` is measured from the top of the page and grows downward, so sorting by
/// `y` ascending reads the page top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

impl Token {
    pub fn new(text: impl Into<String>, x: f32, y: f32) -> Self {
        Token {
            text: text.into(),
            x,
            y,
        }
    }
}

/// One page of tokens plus the page width used for the column midpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub width: f32,
    #[serde(default)]
    pub tokens: Vec<Token>,
}

impl Page {
    pub fn new(width: f32, tokens: Vec<Token>) -> Self {
        Page { width, tokens }
    }
}

/// A whole document as handed over by the decoding collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub pages: Vec<Page>,
}

impl Document {
    /// Parse a token dump (`{"pages": [{"width": .., "tokens": [..]}]}`).
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

// ---------------------------------------------------------------------------
// Credits
// ---------------------------------------------------------------------------

/// Credit hours stored as thousandths, so `4.000` round-trips exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Credits(u64);

impl Credits {
    pub fn from_thousandths(value: u64) -> Self {
        Credits(value)
    }

    /// Parse the strict `<digits>.<3 digits>` form printed on transcripts.
    pub fn parse(s: &str) -> Option<Self> {
        let (whole, frac) = s.split_once('.')?;
        if whole.is_empty()
            || frac.len() != 3
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        let whole: u64 = whole.parse().ok()?;
        let frac: u64 = frac.parse().ok()?;
        whole.checked_mul(1000)?.checked_add(frac).map(Credits)
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 1000.0
    }
}

impl fmt::Display for Credits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}", self.0 / 1000, self.0 % 1000)
    }
}

impl Serialize for Credits {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

// ---------------------------------------------------------------------------
// Courses and term blocks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Course {
    /// `"DEPT NUM"`, e.g. `"MATH 151"`.
    pub code: String,
    pub title: String,
    pub credits: Credits,
    /// Vocabulary grade, `"IP"` for in-progress, or empty.
    pub grade: String,
    pub transfer: bool,
}

/// Evaluation status of a term. Ordered by precedence so that `max` picks the
/// dominant one: `InProgress > Transfer > Evaluated`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum TermStatus {
    #[default]
    Evaluated,
    Transfer,
    #[serde(rename = "In Progress")]
    InProgress,
}

impl TermStatus {
    /// Raise to `other` if it has higher precedence. Never downgrades.
    pub fn escalate(&mut self, other: TermStatus) {
        if other > *self {
            *self = other;
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TermStatus::Evaluated => "Evaluated",
            TermStatus::Transfer => "Transfer",
            TermStatus::InProgress => "In Progress",
        }
    }
}

impl fmt::Display for TermStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contiguous run of course rows belonging to one term within one column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermBlock {
    pub label: Option<String>,
    pub courses: Vec<Course>,
    pub status: TermStatus,
    /// Six-digit code such as `202131`, when one was printed near the header.
    pub term_code: Option<String>,
    /// Whether the column was already in the in-progress section when the
    /// block was opened.
    pub in_progress_mode: bool,
}

impl TermBlock {
    pub fn new(label: Option<String>, term_code: Option<String>, in_progress_mode: bool) -> Self {
        TermBlock {
            label,
            courses: Vec::new(),
            status: TermStatus::Evaluated,
            term_code,
            in_progress_mode,
        }
    }

    pub fn has_courses(&self) -> bool {
        !self.courses.is_empty()
    }

    /// True when the block carries a real label (not missing, not the
    /// unknown-term fallback).
    pub fn is_resolved(&self) -> bool {
        self.label
            .as_deref()
            .is_some_and(|label| !label.is_empty() && label != UNKNOWN_TERM)
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// All courses of one term, merged across columns and pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Term {
    pub label: String,
    pub status: TermStatus,
    pub courses: Vec<Course>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Transcript {
    pub terms: Vec<Term>,
}

impl Transcript {
    pub fn course_count(&self) -> usize {
        self.terms.iter().map(|t| t.courses.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credits_parse_strict_three_digits() {
        assert_eq!(Credits::parse("4.000"), Some(Credits::from_thousandths(4000)));
        assert_eq!(Credits::parse("12.500"), Some(Credits::from_thousandths(12500)));
        assert_eq!(Credits::parse("4.00"), None);
        assert_eq!(Credits::parse("4.0000"), None);
        assert_eq!(Credits::parse(".000"), None);
        assert_eq!(Credits::parse("4"), None);
        assert_eq!(Credits::parse("a.000"), None);
    }

    #[test]
    fn test_credits_display_and_json() {
        let credits = Credits::from_thousandths(3000);
        assert_eq!(credits.to_string(), "3.000");
        assert_eq!(serde_json::to_string(&credits).unwrap(), "3.0");
    }

    #[test]
    fn test_status_escalation_never_downgrades() {
        let mut status = TermStatus::Evaluated;
        status.escalate(TermStatus::Transfer);
        assert_eq!(status, TermStatus::Transfer);
        status.escalate(TermStatus::InProgress);
        status.escalate(TermStatus::Transfer);
        status.escalate(TermStatus::Evaluated);
        assert_eq!(status, TermStatus::InProgress);
    }

    #[test]
    fn test_status_serializes_with_space() {
        assert_eq!(
            serde_json::to_string(&TermStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
        assert_eq!(TermStatus::Transfer.to_string(), "Transfer");
    }

    #[test]
    fn test_block_is_resolved() {
        assert!(!TermBlock::new(None, None, false).is_resolved());
        assert!(!TermBlock::new(Some(UNKNOWN_TERM.into()), None, false).is_resolved());
        assert!(TermBlock::new(Some("Fall 2021".into()), None, false).is_resolved());
    }

    #[test]
    fn test_document_from_json() {
        let doc = Document::from_json(
            r#"{"pages":[{"width":612.0,"tokens":[{"text":"MATH","x":36.0,"y":120.5}]},{"width":612.0}]}"#,
        )
        .unwrap();
        assert_eq!(doc.pages.len(), 2);
        assert_eq!(doc.pages[0].tokens[0], Token::new("MATH", 36.0, 120.5));
        assert!(doc.pages[1].tokens.is_empty());
    }

    #[test]
    fn test_document_from_json_rejects_garbage() {
        assert!(Document::from_json("not json").is_err());
    }
}
