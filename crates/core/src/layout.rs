//! Column splitting and layout arbitration.
//!
//! Transcripts come printed in one or two columns and nothing on the page says
//! which. Both interpretations are run over the whole document and the one
//! that yields more labeled blocks and courses wins:
//!
//! ```text
//! score = 10 × resolved blocks + courses
//! ```
//!
//! The unsplit result is only preferred when it scores strictly higher.

use log::debug;
use regex::Regex;

use crate::config::{LayoutMode, ParserConfig};
use crate::rows::{group_rows, Row};
use crate::segment::segment_rows;
use crate::types::{Page, TermBlock, Token};

/// Weight of a labeled block relative to a single course.
const LABELED_BLOCK_WEIGHT: usize = 10;

/// One column interpretation of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Left and right halves split at the page's horizontal midpoint.
    TwoColumn,
    /// The whole page as one column.
    SingleColumn,
}

/// Blocks produced for the whole document under one layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    pub layout: Layout,
    pub blocks: Vec<TermBlock>,
    pub score: usize,
}

impl LayoutResult {
    fn new(layout: Layout, blocks: Vec<TermBlock>) -> Self {
        let score = score_blocks(&blocks);
        LayoutResult {
            layout,
            blocks,
            score,
        }
    }
}

/// Partition a page's tokens into columns, left column first.
///
/// A token whose `x` is left of `width / 2` belongs to the left column.
pub fn split_columns(page: &Page, layout: Layout) -> Vec<Vec<&Token>> {
    match layout {
        Layout::SingleColumn => vec![page.tokens.iter().collect()],
        Layout::TwoColumn => {
            let mid = page.width / 2.0;
            let (left, right): (Vec<&Token>, Vec<&Token>) =
                page.tokens.iter().partition(|t| t.x < mid);
            vec![left, right]
        }
    }
}

/// Grouped rows of each column of a page.
pub fn page_rows(page: &Page, layout: Layout, row_bucket: f32) -> Vec<Vec<Row>> {
    split_columns(page, layout)
        .into_iter()
        .map(|column| group_rows(column, row_bucket))
        .collect()
}

/// Segment every column of a page, concatenating blocks column by column.
pub fn segment_page(page: &Page, layout: Layout, row_bucket: f32, term_re: &Regex) -> Vec<TermBlock> {
    page_rows(page, layout, row_bucket)
        .iter()
        .flat_map(|rows| segment_rows(rows.iter().map(|r| r.text.as_str()), term_re))
        .collect()
}

/// Segment the whole document under one layout, pages in order.
pub fn segment_document(pages: &[Page], layout: Layout, row_bucket: f32, term_re: &Regex) -> LayoutResult {
    let blocks = pages
        .iter()
        .flat_map(|page| segment_page(page, layout, row_bucket, term_re))
        .collect();
    LayoutResult::new(layout, blocks)
}

/// `10 × blocks with a real label + total courses`.
pub fn score_blocks(blocks: &[TermBlock]) -> usize {
    let labeled = blocks.iter().filter(|b| b.is_resolved()).count();
    let courses: usize = blocks.iter().map(|b| b.courses.len()).sum();
    labeled * LABELED_BLOCK_WEIGHT + courses
}

/// Pick between two whole-document results. Ties go to `split`.
pub fn choose(split: LayoutResult, single: LayoutResult) -> LayoutResult {
    if single.score > split.score {
        single
    } else {
        split
    }
}

/// Run the layout(s) requested by `config` and return the winning blocks.
pub fn select_layout(pages: &[Page], config: &ParserConfig, term_re: &Regex) -> LayoutResult {
    let run = |layout| segment_document(pages, layout, config.row_bucket, term_re);
    match config.layout {
        LayoutMode::Split => run(Layout::TwoColumn),
        LayoutMode::Single => run(Layout::SingleColumn),
        LayoutMode::Auto => {
            let split = run(Layout::TwoColumn);
            let single = run(Layout::SingleColumn);
            debug!(
                "layout scores: two-column {} ({} blocks), single-column {} ({} blocks)",
                split.score,
                split.blocks.len(),
                single.score,
                single.blocks.len()
            );
            choose(split, single)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::TermCalendar;
    use crate::types::{Course, Credits};

    fn term_re() -> Regex {
        TermCalendar::default().heading_regex().unwrap()
    }

    /// Lay out `text` word by word starting at `x`, 30 units per word.
    fn words(text: &str, x: f32, y: f32) -> Vec<Token> {
        text.split_whitespace()
            .enumerate()
            .map(|(i, w)| Token::new(w, x + i as f32 * 30.0, y))
            .collect()
    }

    fn block(label: Option<&str>, courses: usize) -> TermBlock {
        let mut b = TermBlock::new(label.map(str::to_string), None, false);
        for i in 0..courses {
            b.courses.push(Course {
                code: format!("MATH {}", 100 + i),
                title: String::new(),
                credits: Credits::from_thousandths(3000),
                grade: "A".into(),
                transfer: false,
            });
        }
        b
    }

    /// Two terms printed side by side on the same rows.
    fn side_by_side_page() -> Page {
        let mut tokens = Vec::new();
        tokens.extend(words("Fall 2021", 20.0, 100.0));
        tokens.extend(words("Spring 2022", 320.0, 100.0));
        tokens.extend(words("MATH 151 Calc 4.000 A", 20.0, 120.0));
        tokens.extend(words("MATH 152 Calc 4.000 B", 320.0, 120.0));
        tokens.extend(words("ENGL 104 Comp 3.000 A", 20.0, 140.0));
        tokens.extend(words("PHYS 206 Mech 4.000 B", 320.0, 140.0));
        Page::new(600.0, tokens)
    }

    #[test]
    fn test_split_columns_at_midpoint() {
        let page = Page::new(
            600.0,
            vec![Token::new("L", 299.9, 0.0), Token::new("R", 300.0, 0.0)],
        );
        let columns = split_columns(&page, Layout::TwoColumn);
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0][0].text, "L");
        assert_eq!(columns[1][0].text, "R");

        let single = split_columns(&page, Layout::SingleColumn);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].len(), 2);
    }

    #[test]
    fn test_score_blocks() {
        let blocks = vec![
            block(Some("Fall 2021"), 3),
            block(None, 2),
            block(Some("Unknown Term"), 1),
        ];
        assert_eq!(score_blocks(&blocks), 10 + 6);
        assert_eq!(score_blocks(&[]), 0);
    }

    #[test]
    fn test_choose_prefers_higher_score_and_split_on_tie() {
        let split = LayoutResult::new(Layout::TwoColumn, vec![block(Some("Fall 2021"), 2)]);
        let single = LayoutResult::new(Layout::SingleColumn, vec![block(None, 5)]);
        assert_eq!(choose(split.clone(), single).layout, Layout::TwoColumn);

        let tie = LayoutResult::new(Layout::SingleColumn, vec![block(Some("Fall 2021"), 2)]);
        assert_eq!(choose(split.clone(), tie).layout, Layout::TwoColumn);

        let better = LayoutResult::new(Layout::SingleColumn, vec![block(Some("Fall 2021"), 3)]);
        assert_eq!(choose(split, better).layout, Layout::SingleColumn);
    }

    #[test]
    fn test_two_column_page_prefers_split() {
        let pages = vec![side_by_side_page()];
        let re = term_re();
        let result = select_layout(&pages, &ParserConfig::default(), &re);
        assert_eq!(result.layout, Layout::TwoColumn);
        assert_eq!(result.blocks.len(), 2);
        assert_eq!(result.blocks[0].label.as_deref(), Some("Fall 2021"));
        assert_eq!(result.blocks[0].courses.len(), 2);
        assert_eq!(result.blocks[1].label.as_deref(), Some("Spring 2022"));
    }

    #[test]
    fn test_forced_single_layout() {
        let pages = vec![side_by_side_page()];
        let re = term_re();
        let config = ParserConfig {
            layout: LayoutMode::Single,
            ..ParserConfig::default()
        };
        let result = select_layout(&pages, &config, &re);
        assert_eq!(result.layout, Layout::SingleColumn);
        // Merged rows read "Fall 2021 Spring 2022": one heading, courses glued.
        assert_eq!(result.blocks.len(), 1);
    }

    #[test]
    fn test_wide_single_column_prefers_unsplit() {
        // Rows spanning the midpoint get torn apart by the split.
        let mut tokens = Vec::new();
        tokens.extend(words("Fall 2021", 20.0, 100.0));
        tokens.extend(words("MATH 151 Engineering Calc 4.000 A", 200.0, 120.0));
        tokens.extend(words("ENGL 104 Composition Rhetoric 3.000 B", 200.0, 140.0));
        let pages = vec![Page::new(600.0, tokens)];
        let re = term_re();
        let result = select_layout(&pages, &ParserConfig::default(), &re);
        assert_eq!(result.layout, Layout::SingleColumn);
        assert_eq!(result.blocks[0].courses.len(), 2);
    }

    #[test]
    fn test_pages_are_concatenated_in_order() {
        let first = Page::new(600.0, {
            let mut t = words("Fall 2021", 20.0, 100.0);
            t.extend(words("MATH 151 Calc 4.000 A", 20.0, 120.0));
            t
        });
        let second = Page::new(600.0, {
            let mut t = words("Spring 2022", 20.0, 100.0);
            t.extend(words("MATH 152 Calc 4.000 A", 20.0, 120.0));
            t
        });
        let re = term_re();
        let result = segment_document(&[first, second], Layout::TwoColumn, 2.0, &re);
        let labels: Vec<_> = result.blocks.iter().map(|b| b.label.clone()).collect();
        assert_eq!(
            labels,
            [Some("Fall 2021".to_string()), Some("Spring 2022".to_string())]
        );
    }
}
