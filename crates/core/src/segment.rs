//! Row → term block segmentation.
//!
//! A [`Segmenter`] consumes one column's rows top to bottom. Each row is
//! classified by walking [`CLASSIFIERS`] in order (first match wins) and the
//! resulting [`RowKind`] is applied to the segmenter state:
//!
//! ```text
//! Blank → InProgressMarker → TermHeading → Noise → ColumnHeader → Totals
//!       → Summary → Flag → StandaloneGrade → Course → Continuation
//! ```
//!
//! Anything that falls off the end is [`RowKind::Unrecognized`] and ignored.
//! Term codes such as `(202131)` are recorded from any row that is not blank or
//! the in-progress marker, before the row's own kind is applied.

use log::{debug, trace};
use regex::Regex;

use crate::course::parse_course;
use crate::rows::normalize_whitespace;
use crate::types::{Course, TermBlock, TermStatus};
use crate::vocab;

/// What a single row means to the segmenter.
#[derive(Debug, Clone, PartialEq)]
pub enum RowKind {
    Blank,
    /// Start of the in-progress courses section.
    InProgressMarker,
    /// A `"Term Year"` heading.
    TermHeading(String),
    /// College, department or curriculum banners.
    Noise,
    /// `Subj No. Course Title` table header.
    ColumnHeader,
    /// Term or transcript totals line; ends the block.
    Totals,
    /// Earned hours, GPA, overall or page-of-page lines.
    Summary,
    /// A lone course flag such as `R`.
    Flag,
    /// A grade printed on its own line under its course.
    StandaloneGrade(String),
    Course(Course),
    /// Wrapped remainder of the previous course's title.
    Continuation,
    Unrecognized,
}

impl RowKind {
    pub fn name(&self) -> &'static str {
        match self {
            RowKind::Blank => "blank",
            RowKind::InProgressMarker => "in-progress",
            RowKind::TermHeading(_) => "term",
            RowKind::Noise => "noise",
            RowKind::ColumnHeader => "header",
            RowKind::Totals => "totals",
            RowKind::Summary => "summary",
            RowKind::Flag => "flag",
            RowKind::StandaloneGrade(_) => "grade",
            RowKind::Course(_) => "course",
            RowKind::Continuation => "continuation",
            RowKind::Unrecognized => "-",
        }
    }
}

pub type Classifier = fn(&Segmenter<'_>, &str) -> Option<RowKind>;

/// Classification precedence. Order matters: earlier entries shadow later ones.
pub const CLASSIFIERS: &[Classifier] = &[
    classify_blank,
    classify_in_progress,
    classify_term_heading,
    classify_noise,
    classify_header,
    classify_totals,
    classify_summary,
    classify_flag,
    classify_standalone_grade,
    classify_course,
    classify_continuation,
];

fn classify_blank(_: &Segmenter<'_>, line: &str) -> Option<RowKind> {
    line.is_empty().then_some(RowKind::Blank)
}

fn classify_in_progress(_: &Segmenter<'_>, line: &str) -> Option<RowKind> {
    vocab::in_progress_re()
        .is_match(line)
        .then_some(RowKind::InProgressMarker)
}

fn classify_term_heading(seg: &Segmenter<'_>, line: &str) -> Option<RowKind> {
    let caps = seg.term_re.captures(line)?;
    Some(RowKind::TermHeading(format!("{} {}", &caps[1], &caps[2])))
}

fn classify_noise(_: &Segmenter<'_>, line: &str) -> Option<RowKind> {
    vocab::noise_re().is_match(line).then_some(RowKind::Noise)
}

fn classify_header(_: &Segmenter<'_>, line: &str) -> Option<RowKind> {
    vocab::header_re()
        .is_match(line)
        .then_some(RowKind::ColumnHeader)
}

fn classify_totals(_: &Segmenter<'_>, line: &str) -> Option<RowKind> {
    vocab::totals_re().is_match(line).then_some(RowKind::Totals)
}

fn classify_summary(_: &Segmenter<'_>, line: &str) -> Option<RowKind> {
    vocab::summary_re().is_match(line).then_some(RowKind::Summary)
}

fn single_token(line: &str) -> Option<&str> {
    let mut tokens = line.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(token), None) => Some(token),
        _ => None,
    }
}

fn classify_flag(_: &Segmenter<'_>, line: &str) -> Option<RowKind> {
    single_token(line)
        .filter(|t| vocab::is_flag(t))
        .map(|_| RowKind::Flag)
}

fn classify_standalone_grade(_: &Segmenter<'_>, line: &str) -> Option<RowKind> {
    single_token(line)
        .filter(|t| vocab::is_grade(t))
        .map(|t| RowKind::StandaloneGrade(t.to_string()))
}

fn classify_course(seg: &Segmenter<'_>, line: &str) -> Option<RowKind> {
    parse_course(line, seg.in_progress_mode).map(RowKind::Course)
}

fn classify_continuation(seg: &Segmenter<'_>, line: &str) -> Option<RowKind> {
    let open_with_courses = seg.current.as_ref().is_some_and(TermBlock::has_courses);
    let excluded = vocab::has_marker(line)
        || vocab::NON_CONTINUATION_PREFIXES
            .iter()
            .any(|prefix| line.starts_with(prefix));
    (open_with_courses && !excluded).then_some(RowKind::Continuation)
}

/// Segmentation state for a single column.
pub struct Segmenter<'a> {
    term_re: &'a Regex,
    blocks: Vec<TermBlock>,
    current: Option<TermBlock>,
    /// Term code seen before the block it belongs to was opened.
    pending_code: Option<String>,
    /// Sticky once the in-progress section starts.
    in_progress_mode: bool,
    /// Whether the previous non-blank row was a course appended to `current`.
    last_was_course: bool,
}

impl<'a> Segmenter<'a> {
    /// `term_re` must capture the term name in group 1 and the year in group 2
    /// (see [`crate::TermCalendar::heading_regex`]).
    pub fn new(term_re: &'a Regex) -> Self {
        Segmenter {
            term_re,
            blocks: Vec::new(),
            current: None,
            pending_code: None,
            in_progress_mode: false,
            last_was_course: false,
        }
    }

    /// Classify a cleaned row against the current state without applying it.
    pub fn classify(&self, line: &str) -> RowKind {
        CLASSIFIERS
            .iter()
            .find_map(|classifier| classifier(self, line))
            .unwrap_or(RowKind::Unrecognized)
    }

    /// Consume one raw row and report how it was classified.
    pub fn feed(&mut self, raw: &str) -> RowKind {
        let line = normalize_whitespace(raw);
        let kind = self.classify(&line);
        trace!("row {:?} -> {:?}", line, kind);

        if !matches!(kind, RowKind::Blank | RowKind::InProgressMarker) {
            if let Some(caps) = vocab::term_code_re().captures(&line) {
                self.pending_code = Some(caps[1].to_string());
            }
        }

        self.apply(kind.clone(), &line);
        kind
    }

    /// Close the column and return its blocks in discovery order.
    pub fn finish(mut self) -> Vec<TermBlock> {
        self.close_if_courses();
        self.blocks
    }

    fn apply(&mut self, kind: RowKind, line: &str) {
        match kind {
            RowKind::Blank => return,
            RowKind::InProgressMarker => {
                self.in_progress_mode = true;
                return;
            }
            RowKind::TermHeading(label) => self.open_term(label),
            RowKind::ColumnHeader => {
                self.close_if_courses();
                self.ensure_block();
            }
            RowKind::Totals => {
                self.close_if_courses();
                self.current = None;
            }
            RowKind::StandaloneGrade(grade) => self.backfill_grade(grade),
            RowKind::Course(course) => {
                self.push_course(course);
                self.last_was_course = true;
                return;
            }
            RowKind::Continuation => self.append_continuation(line),
            RowKind::Noise | RowKind::Summary | RowKind::Flag | RowKind::Unrecognized => {}
        }
        self.last_was_course = false;
    }

    fn open_term(&mut self, label: String) {
        match self.current.as_mut() {
            Some(block) if !block.has_courses() => block.label = Some(label),
            _ => {
                self.close_if_courses();
                self.current = Some(TermBlock::new(
                    Some(label),
                    self.pending_code.take(),
                    self.in_progress_mode,
                ));
            }
        }
        self.pending_code = None;
    }

    fn ensure_block(&mut self) -> &mut TermBlock {
        let (pending, mode) = (&mut self.pending_code, self.in_progress_mode);
        self.current
            .get_or_insert_with(|| TermBlock::new(None, pending.take(), mode))
    }

    fn close_if_courses(&mut self) {
        if self.current.as_ref().is_some_and(TermBlock::has_courses) {
            if let Some(block) = self.current.take() {
                debug!(
                    "closing block {:?} with {} course(s)",
                    block.label,
                    block.courses.len()
                );
                self.blocks.push(block);
            }
        }
    }

    fn push_course(&mut self, course: Course) {
        let in_progress_mode = self.in_progress_mode;
        let block = self.ensure_block();
        if course.grade == vocab::IN_PROGRESS_GRADE || in_progress_mode {
            block.status.escalate(TermStatus::InProgress);
        } else if course.transfer {
            block.status.escalate(TermStatus::Transfer);
        }
        block.courses.push(course);
    }

    fn backfill_grade(&mut self, grade: String) {
        if !self.last_was_course {
            return;
        }
        let Some(block) = self.current.as_mut() else {
            return;
        };
        let Some(course) = block.courses.last_mut() else {
            return;
        };
        if course.grade.is_empty() || course.grade == vocab::IN_PROGRESS_GRADE {
            course.transfer = grade == vocab::TRANSFER_GRADE;
            course.grade = grade;
            if course.grade == vocab::IN_PROGRESS_GRADE {
                block.status.escalate(TermStatus::InProgress);
            } else if course.transfer {
                block.status.escalate(TermStatus::Transfer);
            }
        }
    }

    fn append_continuation(&mut self, line: &str) {
        if let Some(course) = self
            .current
            .as_mut()
            .and_then(|block| block.courses.last_mut())
        {
            course.title = format!("{} {}", course.title, line).trim().to_string();
        }
    }
}

/// Segment one column's rows into term blocks.
pub fn segment_rows<'r, I>(rows: I, term_re: &Regex) -> Vec<TermBlock>
where
    I: IntoIterator<Item = &'r str>,
{
    let mut segmenter = Segmenter::new(term_re);
    for row in rows {
        segmenter.feed(row);
    }
    segmenter.finish()
}
