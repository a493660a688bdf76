//! Course row recognition.
//!
//! A course row is `DEPT NUM <title...> <credits> <grade>` where the credit
//! column is the only token with exactly three decimal digits. Grade placement
//! varies across printers, so the grade is resolved around that anchor instead
//! of by column index.

use crate::types::{Course, Credits};
use crate::vocab;

/// Longest department code accepted.
const MAX_DEPT_LEN: usize = 6;

/// Parse a cleaned row into a [`Course`], or `None` when the row is not one.
///
/// `in_progress_mode` supplies the `"IP"` grade for rows that print none.
pub fn parse_course(line: &str, in_progress_mode: bool) -> Option<Course> {
    let line = strip_trailing_noise(line);
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 3 {
        return None;
    }

    let (dept, number) = (tokens[0], tokens[1]);
    if !is_department(dept) || !number.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let rest = &tokens[2..];
    let credit_idx = rest.iter().position(|t| Credits::parse(t).is_some())?;
    let credits = Credits::parse(rest[credit_idx])?;

    let grade_idx = resolve_grade(rest, credit_idx);
    let grade = match grade_idx {
        Some(i) => rest[i].to_string(),
        None if in_progress_mode => vocab::IN_PROGRESS_GRADE.to_string(),
        None => String::new(),
    };

    let title_end = match grade_idx {
        Some(i) if i < credit_idx => i,
        _ => credit_idx,
    };
    let mut title_tokens = &rest[..title_end];
    while let Some((last, head)) = title_tokens.split_last() {
        if *last != vocab::REPEAT_MARKER {
            break;
        }
        title_tokens = head;
    }

    let transfer = grade == vocab::TRANSFER_GRADE;
    Some(Course {
        code: format!("{} {}", dept, number),
        title: title_tokens.join(" "),
        credits,
        grade,
        transfer,
    })
}

/// Cut the row at the earliest totals or summary marker.
pub fn strip_trailing_noise(line: &str) -> &str {
    match vocab::first_marker_position(line) {
        Some(pos) => line[..pos].trim(),
        None => line,
    }
}

fn is_department(token: &str) -> bool {
    if token.is_empty()
        || token.chars().count() > MAX_DEPT_LEN
        || !token.chars().all(char::is_alphabetic)
    {
        return false;
    }
    let upper = token.to_uppercase();
    !vocab::NON_COURSE_PREFIXES
        .iter()
        .any(|prefix| upper.starts_with(prefix))
}

/// Index (into `rest`) of the grade token, in priority order:
/// right after the credits, else the last grade before the credits, else the
/// first grade anywhere.
fn resolve_grade(rest: &[&str], credit_idx: usize) -> Option<usize> {
    if rest.get(credit_idx + 1).is_some_and(|t| vocab::is_grade(t)) {
        return Some(credit_idx + 1);
    }
    let candidates: Vec<usize> = rest
        .iter()
        .enumerate()
        .filter(|(_, t)| vocab::is_grade(t))
        .map(|(i, _)| i)
        .collect();
    candidates
        .iter()
        .rev()
        .find(|&&i| i < credit_idx)
        .or_else(|| candidates.first())
        .copied()
}
