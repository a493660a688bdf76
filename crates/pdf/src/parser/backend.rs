use std::collections::BTreeMap;

use lopdf::content::Content;
use lopdf::Object;

use crate::PdfError;

/// A page identifier mirroring `lopdf::ObjectId`: (object number, generation number).
pub type PageId = (u32, u16);

/// The subset of PDF operand values the word extractor looks at.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfValue {
    Number(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<PdfValue>),
    /// Booleans, dictionaries, references and null; never inspected.
    Other,
}

impl PdfValue {
    pub fn as_number(&self) -> Option<f32> {
        match self {
            PdfValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<&Object> for PdfValue {
    fn from(obj: &Object) -> Self {
        match obj {
            Object::Integer(i) => PdfValue::Number(*i as f32),
            Object::Real(f) => PdfValue::Number(*f),
            Object::Name(n) => PdfValue::Name(n.clone()),
            Object::String(s, _) => PdfValue::Str(s.clone()),
            Object::Array(items) => PdfValue::Array(items.iter().map(PdfValue::from).collect()),
            _ => PdfValue::Other,
        }
    }
}

/// The visible page area in user space. `left`/`bottom` is the lower-left
/// corner, which need not be the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub left: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
}

impl PageBox {
    /// US Letter at the origin.
    pub const LETTER: PageBox = PageBox {
        left: 0.0,
        bottom: 0.0,
        width: 612.0,
        height: 792.0,
    };

    /// From a `[llx lly urx ury]` rectangle; corners may come in any order.
    pub fn from_corners([x0, y0, x1, y1]: [f32; 4]) -> Self {
        PageBox {
            left: x0.min(x1),
            bottom: y0.min(y1),
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
        }
    }

    /// Distance of user-space `x` from the left edge.
    pub fn x_offset(&self, x: f32) -> f32 {
        x - self.left
    }

    /// Distance of user-space `y` from the top edge.
    pub fn top_offset(&self, y: f32) -> f32 {
        self.bottom + self.height - y
    }
}

/// A single content-stream operation (operator + operands).
#[derive(Debug, Clone)]
pub struct ContentOp {
    pub operator: String,
    pub operands: Vec<PdfValue>,
}

impl ContentOp {
    pub fn new(operator: &str, operands: Vec<PdfValue>) -> Self {
        ContentOp {
            operator: operator.to_string(),
            operands,
        }
    }

    /// Numeric operand at `idx`, if present and numeric.
    pub fn number(&self, idx: usize) -> Option<f32> {
        self.operands.get(idx).and_then(PdfValue::as_number)
    }
}

/// Best-effort decoding of string operand bytes.
///
/// UTF-16BE with a byte-order mark, then UTF-8, then Latin-1 byte by byte.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if let Some(payload) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = payload
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// What the word extractor needs from a PDF parser.
///
/// Kept narrow so extraction can be tested against canned operations.
pub trait PdfBackend {
    /// 1-based page number to [`PageId`], in page order.
    fn pages(&self) -> BTreeMap<u32, PageId>;

    /// `(width, height)` of the page's MediaBox, inherited from ancestors
    /// when the page does not set one.
    fn page_box(&self, page: PageId) -> Result<PageBox, PdfError>;

    /// The page's content stream decoded into operations.
    fn page_ops(&self, page: PageId) -> Result<Vec<ContentOp>, PdfError>;

    /// Decode string bytes shown with font resource `font` on `page`.
    fn decode_text(&self, page: PageId, font: &[u8], bytes: &[u8]) -> String;
}

/// [`PdfBackend`] over an in-memory [`lopdf::Document`].
pub struct LopdfBackend {
    doc: lopdf::Document,
}

impl LopdfBackend {
    pub fn load_bytes(data: &[u8]) -> Result<Self, PdfError> {
        let doc = lopdf::Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;
        if doc.is_encrypted() {
            return Err(PdfError::Encrypted);
        }
        Ok(Self { doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    fn resolve<'a>(&'a self, obj: &'a Object) -> Option<&'a Object> {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).ok(),
            other => Some(other),
        }
    }

    /// Walk up the page tree until a MediaBox turns up.
    fn media_box(&self, dict: &lopdf::Dictionary) -> Option<[f32; 4]> {
        if let Some(Object::Array(items)) = dict.get(b"MediaBox").ok().and_then(|o| self.resolve(o)) {
            let nums: Vec<f32> = items
                .iter()
                .filter_map(|item| self.resolve(item))
                .filter_map(|item| PdfValue::from(item).as_number())
                .collect();
            if let [llx, lly, urx, ury] = nums.as_slice() {
                return Some([*llx, *lly, *urx, *ury]);
            }
        }
        let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
        let parent = self.doc.get_object(parent).ok()?.as_dict().ok()?;
        self.media_box(parent)
    }

    fn font_encoding(&self, page: PageId, font: &[u8]) -> Option<Vec<u8>> {
        let fonts = self.doc.get_page_fonts(page).ok()?;
        match fonts.get(font)?.get(b"Encoding").ok()? {
            Object::Name(name) => Some(name.clone()),
            _ => None,
        }
    }
}

impl PdfBackend for LopdfBackend {
    fn pages(&self) -> BTreeMap<u32, PageId> {
        self.doc.get_pages()
    }

    fn page_box(&self, page: PageId) -> Result<PageBox, PdfError> {
        let dict = self
            .doc
            .get_object(page)
            .and_then(Object::as_dict)
            .map_err(|e| PdfError::Parse(format!("page {:?} is not a dictionary: {}", page, e)))?;
        let corners = self
            .media_box(dict)
            .ok_or_else(|| PdfError::Parse(format!("no MediaBox for page {:?}", page)))?;
        Ok(PageBox::from_corners(corners))
    }

    fn page_ops(&self, page: PageId) -> Result<Vec<ContentOp>, PdfError> {
        let raw = self
            .doc
            .get_page_content(page)
            .map_err(|e| PdfError::Parse(format!("cannot get page content: {}", e)))?;
        let content = Content::decode(&raw)
            .map_err(|e| PdfError::Parse(format!("content stream decode error: {}", e)))?;
        Ok(content
            .operations
            .iter()
            .map(|op| ContentOp {
                operator: op.operator.clone(),
                operands: op.operands.iter().map(PdfValue::from).collect(),
            })
            .collect())
    }

    fn decode_text(&self, page: PageId, font: &[u8], bytes: &[u8]) -> String {
        let identity = self
            .font_encoding(page, font)
            .is_some_and(|enc| enc.starts_with(b"Identity"));
        if identity && !bytes.is_empty() && bytes.len().is_multiple_of(2) {
            let units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            let decoded = String::from_utf16_lossy(&units);
            if decoded.chars().any(|c| c != '\u{FFFD}' && c != '\0') {
                return decoded;
            }
        }
        decode_text_simple(bytes)
    }
}
