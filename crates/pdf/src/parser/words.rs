//! Content stream → positioned words.
//!
//! A simplified PDF text-rendering state machine. Shown strings are broken
//! into words at whitespace, at large `TJ` kerning gaps and whenever the text
//! position is moved explicitly. Each word keeps the position of its first
//! glyph, converted to top-down page coordinates.
//!
//! | Operator | Action |
//! |----------|--------|
//! | `q` / `Q` | Save / restore the graphics state (CTM) |
//! | `cm`     | Concatenate the CTM |
//! | `BT`     | Begin text object -- reset matrices |
//! | `Tf`     | Set font and size |
//! | `Tm`     | Set text matrix directly |
//! | `Td` `TD` `T*` | Move to a new line |
//! | `TL` `Tc` `Tw` `Tz` `Ts` | Leading, spacing, scaling, rise |
//! | `Tj` `TJ` `'` `"` | Show text |

use log::{debug, warn};

use super::backend::{ContentOp, PageBox, PageId, PdfBackend, PdfValue};
use crate::{PageWords, PdfError, Word};

/// Glyph width as a fraction of the font size; no font metrics are read.
const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;

/// A `TJ` displacement wider than this fraction of the font size splits words.
const WORD_GAP_RATIO: f32 = 0.15;

/// `[a, b, c, d, e, f]`
type Matrix = [f32; 6];

const IDENTITY_MATRIX: Matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// `m × n` in PDF's row-vector convention.
fn multiply(m: &Matrix, n: &Matrix) -> Matrix {
    [
        m[0] * n[0] + m[1] * n[2],
        m[0] * n[1] + m[1] * n[3],
        m[2] * n[0] + m[3] * n[2],
        m[2] * n[1] + m[3] * n[3],
        m[4] * n[0] + m[5] * n[2] + n[4],
        m[4] * n[1] + m[5] * n[3] + n[5],
    ]
}

fn matrix_operands(op: &ContentOp) -> Option<Matrix> {
    let mut m = [0.0; 6];
    for (i, slot) in m.iter_mut().enumerate() {
        *slot = op.number(i)?;
    }
    Some(m)
}

#[derive(Debug, Clone)]
struct TextState {
    ctm: Matrix,
    saved_ctm: Vec<Matrix>,
    font_key: Vec<u8>,
    font_size: f32,
    text_matrix: Matrix,
    line_matrix: Matrix,
    horiz_scale: f32,
    char_spacing: f32,
    word_spacing: f32,
    text_rise: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            ctm: IDENTITY_MATRIX,
            saved_ctm: Vec::new(),
            font_key: Vec::new(),
            font_size: 0.0,
            text_matrix: IDENTITY_MATRIX,
            line_matrix: IDENTITY_MATRIX,
            horiz_scale: 1.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            text_rise: 0.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    /// Current glyph origin in default user space (y grows upward).
    fn origin(&self) -> (f32, f32) {
        let (x, y) = (self.text_matrix[4], self.text_matrix[5] + self.text_rise);
        let c = &self.ctm;
        (c[0] * x + c[2] * y + c[4], c[1] * x + c[3] * y + c[5])
    }

    fn advance_x(&mut self, dx: f32) {
        self.text_matrix[4] += dx * self.text_matrix[0];
        self.text_matrix[5] += dx * self.text_matrix[1];
    }

    fn char_advance(&self, ch: char) -> f32 {
        let glyph = self.font_size * APPROX_CHAR_WIDTH_RATIO * self.horiz_scale;
        let space = if ch == ' ' { self.word_spacing } else { 0.0 };
        glyph + self.char_spacing + space
    }

    /// Used by `Td`, `TD`, `T*`, `'` and `"`.
    fn translate_line(&mut self, tx: f32, ty: f32) {
        let lm = &self.line_matrix;
        let e = lm[0] * tx + lm[2] * ty + lm[4];
        let f = lm[1] * tx + lm[3] * ty + lm[5];
        self.line_matrix[4] = e;
        self.line_matrix[5] = f;
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        self.translate_line(0.0, -self.leading);
    }
}

/// Accumulates glyphs into words.
struct WordBuilder {
    bbox: PageBox,
    words: Vec<Word>,
    buf: String,
    start: (f32, f32),
}

impl WordBuilder {
    fn new(bbox: PageBox) -> Self {
        WordBuilder {
            bbox,
            words: Vec::new(),
            buf: String::new(),
            start: (0.0, 0.0),
        }
    }

    fn push(&mut self, ch: char, state: &TextState) {
        if ch.is_whitespace() {
            self.flush();
            return;
        }
        if self.buf.is_empty() {
            self.start = state.origin();
        }
        self.buf.push(ch);
    }

    fn flush(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let (x, y) = self.start;
        self.words.push(Word {
            text: std::mem::take(&mut self.buf),
            x: self.bbox.x_offset(x),
            top: self.bbox.top_offset(y),
        });
    }

    fn finish(mut self) -> Vec<Word> {
        self.flush();
        self.words
    }
}

struct PageWalker<'b> {
    backend: &'b dyn PdfBackend,
    page: PageId,
    state: TextState,
    out: WordBuilder,
}

impl PageWalker<'_> {
    fn show(&mut self, operand: &PdfValue) {
        let PdfValue::Str(bytes) = operand else {
            return;
        };
        let text = self
            .backend
            .decode_text(self.page, &self.state.font_key, bytes);
        for ch in text.chars() {
            self.out.push(ch, &self.state);
            let dx = self.state.char_advance(ch);
            self.state.advance_x(dx);
        }
    }

    fn show_array(&mut self, items: &[PdfValue]) {
        for item in items {
            match item {
                PdfValue::Number(adj) => {
                    let dx = -adj / 1000.0 * self.state.font_size * self.state.horiz_scale;
                    if dx > self.state.font_size * WORD_GAP_RATIO {
                        self.out.flush();
                    }
                    self.state.advance_x(dx);
                }
                other => self.show(other),
            }
        }
    }

    fn apply(&mut self, op: &ContentOp) {
        let state = &mut self.state;
        match op.operator.as_str() {
            "q" => state.saved_ctm.push(state.ctm),
            "Q" => {
                if let Some(ctm) = state.saved_ctm.pop() {
                    state.ctm = ctm;
                }
            }
            "cm" => {
                if let Some(m) = matrix_operands(op) {
                    state.ctm = multiply(&m, &state.ctm);
                }
            }
            "BT" => {
                self.out.flush();
                state.text_matrix = IDENTITY_MATRIX;
                state.line_matrix = IDENTITY_MATRIX;
            }
            "ET" => self.out.flush(),
            "Tf" => {
                if let Some(PdfValue::Name(key)) = op.operands.first() {
                    state.font_key = key.clone();
                }
                if let Some(size) = op.number(1) {
                    state.font_size = size;
                }
            }
            "Tm" => {
                if let Some(m) = matrix_operands(op) {
                    self.out.flush();
                    state.text_matrix = m;
                    state.line_matrix = m;
                }
            }
            "Td" | "TD" => {
                if let (Some(tx), Some(ty)) = (op.number(0), op.number(1)) {
                    self.out.flush();
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.translate_line(tx, ty);
                }
            }
            "T*" => {
                self.out.flush();
                state.next_line();
            }
            "TL" => state.leading = op.number(0).unwrap_or(state.leading),
            "Tc" => state.char_spacing = op.number(0).unwrap_or(state.char_spacing),
            "Tw" => state.word_spacing = op.number(0).unwrap_or(state.word_spacing),
            "Tz" => {
                if let Some(scale) = op.number(0) {
                    state.horiz_scale = scale / 100.0;
                }
            }
            "Ts" => state.text_rise = op.number(0).unwrap_or(state.text_rise),
            "Tj" => {
                if let Some(text) = op.operands.first() {
                    self.show(text);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(items)) = op.operands.first() {
                    self.show_array(items);
                }
            }
            "'" => {
                self.out.flush();
                state.next_line();
                if let Some(text) = op.operands.first() {
                    self.show(text);
                }
            }
            "\"" => {
                if let (Some(aw), Some(ac), Some(text)) =
                    (op.number(0), op.number(1), op.operands.get(2))
                {
                    self.out.flush();
                    state.word_spacing = aw;
                    state.char_spacing = ac;
                    state.next_line();
                    self.show(text);
                }
            }
            _ => {}
        }
    }
}

/// Words on one page, in content-stream order.
///
/// Positions are measured from the top-left corner of `bbox`.
pub fn extract_page_words(
    backend: &dyn PdfBackend,
    page: PageId,
    bbox: PageBox,
) -> Result<Vec<Word>, PdfError> {
    let ops = backend.page_ops(page)?;
    let mut walker = PageWalker {
        backend,
        page,
        state: TextState::default(),
        out: WordBuilder::new(bbox),
    };
    for op in &ops {
        walker.apply(op);
    }
    Ok(walker.out.finish())
}

/// Words of every page, in page order.
///
/// A page whose size or content cannot be read is kept, with no words, so
/// page numbering stays intact.
pub fn extract_all_pages(backend: &dyn PdfBackend) -> Vec<PageWords> {
    backend
        .pages()
        .into_iter()
        .map(|(number, page)| {
            let bbox = backend.page_box(page).unwrap_or_else(|e| {
                warn!("page {}: {}; assuming US Letter", number, e);
                PageBox::LETTER
            });
            let PageBox { width, height, .. } = bbox;
            let words = extract_page_words(backend, page, bbox).unwrap_or_else(|e| {
                warn!("page {}: skipping content: {}", number, e);
                Vec::new()
            });
            debug!("page {}: {} words ({}x{})", number, words.len(), width, height);
            PageWords {
                number,
                width,
                height,
                words,
            }
        })
        .collect()
}
