//! Core library for transcript
//!
//! This crate implements the **Functional Core** of the transcript tool: it
//! turns positioned word tokens from an academic transcript into an ordered
//! list of terms with their courses. It does no I/O of its own beyond reading
//! an optional configuration file; PDF decoding and output live in the `pdf`
//! and `transcript` crates.
//!
//! # Pipeline
//!
//! ```text
//! Document ─▶ layout::select_layout ─▶ infer::infer_labels ─▶ merge::merge_blocks ─▶ Transcript
//!               │
//!               ├─ layout::split_columns   (two-column vs single-column)
//!               ├─ rows::group_rows        (tokens → text rows)
//!               └─ segment::segment_rows   (rows → term blocks, uses course::parse_course)
//! ```
//!
//! Every stage is a pure function of its input and the [`ParserConfig`], so the
//! same document always yields the same transcript.
//!
//! # Module Organization
//!
//! - [`types`]: Input tokens, courses, term blocks and the final transcript
//! - [`config`]: Parser configuration (row bucket, layout mode, term calendar)
//! - [`calendar`]: Term cycle, term-code decoding and chronological ordering
//! - [`vocab`]: Grade vocabulary and the row-classification patterns
//! - [`rows`]: Row grouping
//! - [`course`]: Course row parsing
//! - [`segment`]: Block segmentation state machine
//! - [`layout`]: Column splitting and layout arbitration
//! - [`infer`]: Label inference for unlabeled blocks
//! - [`merge`]: Block merging and ordering
//!
//! # Example Usage
//!
//! ```rust
//! use transcript_core::{Document, Page, ParserConfig, Token, TranscriptParser};
//!
//! let tokens = vec![
//!     Token::new("Fall", 20.0, 100.0),
//!     Token::new("2021", 50.0, 100.0),
//!     Token::new("MATH", 20.0, 120.0),
//!     Token::new("151", 50.0, 120.0),
//!     Token::new("Calculus", 80.0, 120.0),
//!     Token::new("4.000", 200.0, 120.0),
//!     Token::new("A", 240.0, 120.0),
//! ];
//! let doc = Document { pages: vec![Page::new(612.0, tokens)] };
//!
//! let parser = TranscriptParser::new(ParserConfig::default()).unwrap();
//! let transcript = parser.parse(&doc);
//! assert_eq!(transcript.terms[0].label, "Fall 2021");
//! assert_eq!(transcript.terms[0].courses[0].code, "MATH 151");
//! ```

pub mod calendar;
pub mod config;
pub mod course;
pub mod error;
pub mod infer;
pub mod layout;
pub mod merge;
pub mod rows;
pub mod segment;
pub mod types;
pub mod vocab;

use log::info;
use regex::Regex;

pub use calendar::TermCalendar;
pub use config::{LayoutMode, ParserConfig};
pub use error::{CoreError, Result};
pub use types::{
    Course, Credits, Document, Page, Term, TermBlock, TermStatus, Token, Transcript, UNKNOWN_TERM,
};

/// A validated configuration together with its compiled term-heading pattern.
#[derive(Debug, Clone)]
pub struct TranscriptParser {
    config: ParserConfig,
    term_re: Regex,
}

impl TranscriptParser {
    /// Validate `config` and compile the heading pattern for its calendar.
    pub fn new(config: ParserConfig) -> Result<Self> {
        config.validate()?;
        let term_re = config.calendar.heading_regex()?;
        Ok(TranscriptParser { config, term_re })
    }

    /// Run the whole pipeline over `doc`.
    pub fn parse(&self, doc: &Document) -> Transcript {
        let mut result = layout::select_layout(&doc.pages, &self.config, &self.term_re);
        info!(
            "selected {:?} layout: {} blocks, score {}",
            result.layout,
            result.blocks.len(),
            result.score
        );
        infer::infer_labels(&mut result.blocks, &self.config.calendar);
        merge::merge_blocks(result.blocks, &self.config.calendar)
    }
}

/// One-shot helper: build a parser from `config` and run it over `doc`.
pub fn parse(doc: &Document, config: ParserConfig) -> Result<Transcript> {
    Ok(TranscriptParser::new(config)?.parse(doc))
}
