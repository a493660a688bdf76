//! Closed vocabularies and marker patterns.
//!
//! Every phrase the row classifier reacts to lives here so that the tables can
//! change in one place.

use std::sync::OnceLock;

use regex::Regex;

/// Grade tokens recognised on course rows and on standalone grade rows.
pub const GRADES: &[&str] = &[
    "A", "A-", "B+", "B", "B-", "C+", "C", "C-", "D+", "D", "D-", "F", "S", "U", "P", "W", "IP",
    "TA",
];

/// Grade printed for courses currently being taken.
pub const IN_PROGRESS_GRADE: &str = "IP";

/// Grade marking credit transferred from another institution.
pub const TRANSFER_GRADE: &str = "TA";

/// Single-letter course flags that may sit on a row of their own.
pub const FLAG_TOKENS: &[&str] = &["R", "N", "L", "I"];

/// Repeat-course marker stripped from the end of titles.
pub const REPEAT_MARKER: &str = "R";

/// Department prefixes that look like codes but start summary rows.
pub const NON_COURSE_PREFIXES: &[&str] = &["TOTAL", "TRANSCRIPT"];

/// Row prefixes that never continue a course title.
pub const NON_CONTINUATION_PREFIXES: &[&str] = &["Ehrs", "GPA"];

pub fn is_grade(token: &str) -> bool {
    GRADES.contains(&token)
}

pub fn is_flag(token: &str) -> bool {
    FLAG_TOKENS.contains(&token)
}

/// `(202131)` style term code. Capture 1 is the six digits.
pub fn term_code_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\((\d{6})\)").unwrap())
}

/// Column header of a course table.
pub fn header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Subj\s+No\.?\s+Course\s*Title").unwrap())
}

/// End-of-block totals line.
pub fn totals_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(Term|Transcript)\s*Totals").unwrap())
}

/// Start of the in-progress section.
pub fn in_progress_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)COURSES\s*IN\s*PROGRESS").unwrap())
}

/// College, department and curriculum banner lines.
pub fn noise_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(College:|Department:|Engineering\s*-|Curriculum|Semester$)").unwrap()
    })
}

/// Earned-hours, GPA, overall and page-of-page summary lines.
pub fn summary_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)(Term|Transcript)\s*Totals|UndergraduateTotals|EarnedHrs|GPA[-\s]*Hrs|Qpts|TOTALINSTITUTION|TOTALTRANSFER|OVERALL|Page\s*\d+\s*of\s*\d+",
        )
        .unwrap()
    })
}

/// Keywords that end the useful part of a row when printed after a course.
pub fn trailing_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(EHRS|GPA|Qpts|INSTITUTION|TOTAL|TOTALS|OVERALL|UndergraduateTotals)\b")
            .unwrap()
    })
}

/// Byte offset of the earliest totals, summary or trailing marker in `line`.
pub fn first_marker_position(line: &str) -> Option<usize> {
    [totals_re(), summary_re(), trailing_marker_re()]
        .iter()
        .filter_map(|re| re.find(line).map(|m| m.start()))
        .min()
}

/// Whether `line` carries any totals, summary or trailing marker.
pub fn has_marker(line: &str) -> bool {
    first_marker_position(line).is_some()
}
