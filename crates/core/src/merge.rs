//! Merge same-label blocks and order terms chronologically.

use std::collections::HashMap;

use crate::calendar::TermCalendar;
use crate::types::{Term, TermBlock, Transcript, UNKNOWN_TERM};

/// Merge blocks into one [`Term`] per label.
///
/// Blocks without courses are skipped. Courses are appended in block order
/// and the status only ever escalates (In Progress > Transfer > Evaluated).
pub fn merge_blocks(blocks: Vec<TermBlock>, calendar: &TermCalendar) -> Transcript {
    let mut terms: Vec<Term> = Vec::new();
    let mut by_label: HashMap<String, usize> = HashMap::new();

    for block in blocks.into_iter().filter(TermBlock::has_courses) {
        let label = block
            .label
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| UNKNOWN_TERM.to_string());

        match by_label.get(&label) {
            Some(&i) => {
                let term = &mut terms[i];
                term.status.escalate(block.status);
                term.courses.extend(block.courses);
            }
            None => {
                by_label.insert(label.clone(), terms.len());
                terms.push(Term {
                    label,
                    status: block.status,
                    courses: block.courses,
                });
            }
        }
    }

    sort_terms(&mut terms, calendar);
    Transcript { terms }
}

/// Stable chronological sort; unparsable labels keep their relative order at
/// the end.
pub fn sort_terms(terms: &mut [Term], calendar: &TermCalendar) {
    terms.sort_by_key(|term| calendar.sort_key(&term.label));
}
