//! Content-stream walking that yields positioned glyph records.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::lexer::{Glyph, GlyphSource};

/// Kerning adjustment (1/1000 text space units) that reads as a word
/// space inside a TJ array.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Glyph source over a loaded PDF document.
#[derive(Debug)]
pub struct PdfGlyphs {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
}

impl PdfGlyphs {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::Config("input path is required".to_string()));
        }
        if !path.exists() {
            return Err(Error::Config(format!(
                "input file not found: {}",
                path.display()
            )));
        }
        let doc = LopdfDocument::load(path)?;
        Ok(Self::from_document(doc))
    }

    /// Read a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self::from_document(doc))
    }

    fn from_document(doc: LopdfDocument) -> Self {
        let pages = doc.get_pages();
        Self { doc, pages }
    }

    /// Concatenated content stream bytes of a page, or `None` when the
    /// page carries no content.
    fn page_content(&self, page_id: ObjectId) -> Result<Option<Vec<u8>>> {
        let page_dict = self.doc.get_dictionary(page_id)?;
        let contents = match page_dict.get(b"Contents") {
            Ok(obj) => obj,
            Err(_) => return Ok(None),
        };

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r) {
                Ok(Object::Stream(s)) => Ok(Some(s.decompressed_content()?)),
                _ => Err(Error::Input("invalid content stream".to_string())),
            },
            Object::Stream(s) => Ok(Some(s.decompressed_content()?)),
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            if let Ok(data) = s.decompressed_content() {
                                content.extend_from_slice(&data);
                                content.push(b' ');
                            }
                        }
                    }
                }
                Ok(Some(content))
            }
            _ => Err(Error::Input("invalid content stream".to_string())),
        }
    }
}

impl GlyphSource for PdfGlyphs {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn glyphs(&self, page: u32) -> Result<Vec<Glyph>> {
        let page_id = self
            .pages
            .get(&page)
            .copied()
            .ok_or_else(|| Error::Input(format!("page {} not in page tree", page)))?;

        let content = match self.page_content(page_id)? {
            Some(content) => content,
            None => return Ok(vec![]),
        };

        let fonts = self.doc.get_page_fonts(page_id)?;
        let walker = TextWalker::new(&self.doc, &fonts);
        walker.walk(&content)
    }
}

/// Walks one page's operations, tracking the text state.
struct TextWalker<'a> {
    doc: &'a LopdfDocument,
    fonts: &'a BTreeMap<Vec<u8>, &'a lopdf::Dictionary>,
}

impl<'a> TextWalker<'a> {
    fn new(doc: &'a LopdfDocument, fonts: &'a BTreeMap<Vec<u8>, &'a lopdf::Dictionary>) -> Self {
        Self { doc, fonts }
    }

    fn walk(&self, content: &[u8]) -> Result<Vec<Glyph>> {
        let content = lopdf::content::Content::decode(content)
            .map_err(|e| Error::Input(e.to_string()))?;

        let mut glyphs = Vec::new();
        let mut state = TextState::default();

        for op in content.operations {
            match op.operator.as_str() {
                "BT" => {
                    state.in_text = true;
                    state.matrix = TextMatrix::default();
                }
                "ET" => state.in_text = false,
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(name) = &op.operands[0] {
                            state.font_key = name.clone();
                            state.font = self.base_font_name(name);
                        }
                        state.font_size = number(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "TL" => {
                    if let Some(leading) = op.operands.first().and_then(number) {
                        state.leading = leading;
                    }
                }
                "Td" => {
                    if op.operands.len() >= 2 {
                        let tx = number(&op.operands[0]).unwrap_or(0.0);
                        let ty = number(&op.operands[1]).unwrap_or(0.0);
                        state.matrix.translate(tx, ty);
                    }
                }
                "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = number(&op.operands[0]).unwrap_or(0.0);
                        let ty = number(&op.operands[1]).unwrap_or(0.0);
                        state.leading = -ty;
                        state.matrix.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        state.matrix.set(
                            number(&op.operands[0]).unwrap_or(1.0),
                            number(&op.operands[1]).unwrap_or(0.0),
                            number(&op.operands[2]).unwrap_or(0.0),
                            number(&op.operands[3]).unwrap_or(1.0),
                            number(&op.operands[4]).unwrap_or(0.0),
                            number(&op.operands[5]).unwrap_or(0.0),
                        );
                    }
                }
                "T*" => state.matrix.next_line(state.leading),
                "Tj" => {
                    if state.in_text {
                        if let Some(Object::String(bytes, _)) = op.operands.first() {
                            self.emit(&mut glyphs, &state, &self.decode(&state.font_key, bytes));
                        }
                    }
                }
                "TJ" => {
                    if state.in_text {
                        if let Some(Object::Array(arr)) = op.operands.first() {
                            let text = self.decode_tj(&state.font_key, arr);
                            self.emit(&mut glyphs, &state, &text);
                        }
                    }
                }
                "'" | "\"" => {
                    state.matrix.next_line(state.leading);
                    if state.in_text {
                        let text_idx = if op.operator == "\"" { 2 } else { 0 };
                        if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                            self.emit(&mut glyphs, &state, &self.decode(&state.font_key, bytes));
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(glyphs)
    }

    fn emit(&self, glyphs: &mut Vec<Glyph>, state: &TextState, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        let (x, y) = state.matrix.position();
        glyphs.push(Glyph {
            text: text.to_string(),
            x,
            y,
            width: 0.0, // no font metrics; the lexer estimates advances
            font: state.font.clone(),
            font_size: state.font_size * state.matrix.scale(),
        });
    }

    fn base_font_name(&self, resource_key: &[u8]) -> String {
        self.fonts
            .get(resource_key)
            .and_then(|font| font.get(b"BaseFont").ok())
            .and_then(|obj| obj.as_name().ok())
            .map(|name| String::from_utf8_lossy(name).to_string())
            .unwrap_or_else(|| String::from_utf8_lossy(resource_key).to_string())
    }

    fn decode(&self, font_key: &[u8], bytes: &[u8]) -> String {
        let encoding = self
            .fonts
            .get(font_key)
            .and_then(|font| font.get_font_encoding(self.doc).ok());

        match encoding {
            Some(enc) => LopdfDocument::decode_text(&enc, bytes)
                .unwrap_or_else(|_| decode_text_simple(bytes)),
            None => decode_text_simple(bytes),
        }
    }

    /// Decode a TJ array, turning large kerning adjustments into word
    /// spaces.
    fn decode_tj(&self, font_key: &[u8], items: &[Object]) -> String {
        let mut combined = String::new();

        for item in items {
            match item {
                Object::String(bytes, _) => combined.push_str(&self.decode(font_key, bytes)),
                Object::Integer(n) => {
                    if -(*n as f32) > TJ_SPACE_THRESHOLD {
                        push_word_space(&mut combined);
                    }
                }
                Object::Real(n) => {
                    if -n > TJ_SPACE_THRESHOLD {
                        push_word_space(&mut combined);
                    }
                }
                _ => {}
            }
        }

        combined
    }
}

fn push_word_space(text: &mut String) {
    if !text.is_empty() && !text.ends_with(' ') && !text.ends_with('\u{00A0}') {
        text.push(' ');
    }
}

/// Text-positioning state between operators.
struct TextState {
    in_text: bool,
    font: String,
    font_key: Vec<u8>,
    font_size: f32,
    leading: f32,
    matrix: TextMatrix,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            in_text: false,
            font: String::new(),
            font_key: Vec::new(),
            font_size: 12.0,
            leading: 12.0,
            matrix: TextMatrix::default(),
        }
    }
}

/// Text matrix tracking the pen position in user space.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self, leading: f32) {
        self.f -= leading * self.d;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Extract a number from a PDF object.
fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Decoding fallback when the font carries no usable encoding.
fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}
