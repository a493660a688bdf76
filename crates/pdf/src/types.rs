/// A word and the position of its first glyph.
///
/// `top` is measured from the top edge of the page and grows downward.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub text: String,
    pub x: f32,
    pub top: f32,
}

/// Every word on one page plus the page's MediaBox size.
#[derive(Debug, Clone, PartialEq)]
pub struct PageWords {
    /// 1-based page number.
    pub number: u32,
    pub width: f32,
    pub height: f32,
    pub words: Vec<Word>,
}
