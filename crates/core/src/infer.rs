//! Label inference for blocks printed without a term heading.
//!
//! In order of preference: the block's own term code, the term before the
//! nearest labeled block after it, the term after the nearest labeled block
//! before it, and finally [`UNKNOWN_TERM`]. Blocks are visited in document
//! order and inferred labels are visible to the blocks that follow.

use log::debug;

use crate::calendar::TermCalendar;
use crate::types::{TermBlock, UNKNOWN_TERM};

fn label_of(block: &TermBlock) -> Option<&str> {
    block.label.as_deref().filter(|l| !l.is_empty())
}

/// Fill every missing label in place.
pub fn infer_labels(blocks: &mut [TermBlock], calendar: &TermCalendar) {
    for idx in 0..blocks.len() {
        if label_of(&blocks[idx]).is_some() {
            continue;
        }
        let label = infer_label(blocks, idx, calendar);
        debug!("block {} labeled {:?}", idx, label);
        blocks[idx].label = Some(label);
    }
}

fn infer_label(blocks: &[TermBlock], idx: usize, calendar: &TermCalendar) -> String {
    if let Some(label) = blocks[idx]
        .term_code
        .as_deref()
        .and_then(|code| calendar.decode_code(code))
    {
        return label;
    }

    let next = blocks[idx + 1..].iter().find_map(label_of);
    let prev = blocks[..idx].iter().rev().find_map(label_of);

    next.and_then(|label| calendar.predecessor(label))
        .or_else(|| prev.and_then(|label| calendar.successor(label)))
        .unwrap_or_else(|| UNKNOWN_TERM.to_string())
}
