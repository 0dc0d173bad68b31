//! Label font selection and metrics.
//!
//! A custom TrueType font is preferred when one is available; otherwise the
//! standard Helvetica-Bold Type 1 font is used, which every PDF viewer
//! provides without embedding.

use crate::error::{PaperToolsError, Result};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::path::Path;
use tracing::{info, warn};

pub const FALLBACK_FONT_NAME: &str = "Helvetica-Bold";

const FIRST_CHAR: u8 = 32;
const LAST_CHAR: u8 = 126;

/// Helvetica-Bold advance widths for codes 32..=126, in 1/1000 em.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    333, 333, 584, 584, 584, 611, 975, // ':'..'@'
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    333, 278, 333, 584, 556, 333, // '['..'`'
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // 'a'..'m'
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // 'n'..'z'
    389, 280, 389, 584, // '{'..'~'
];

/// The font the label is drawn with.
#[derive(Debug, Clone)]
pub enum LabelFont {
    Builtin,
    TrueType(TrueTypeFont),
}

#[derive(Debug, Clone)]
pub struct TrueTypeFont {
    pub name: String,
    data: Vec<u8>,
    /// Advance widths for codes 32..=126, in 1/1000 em.
    widths: Vec<f32>,
    missing_width: f32,
    ascent: f32,
    descent: f32,
    cap_height: f32,
    bbox: [f32; 4],
}

impl LabelFont {
    pub fn name(&self) -> &str {
        match self {
            LabelFont::Builtin => FALLBACK_FONT_NAME,
            LabelFont::TrueType(font) => &font.name,
        }
    }

    /// Width of `text` in points when set at `size`.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: f32 = encode_text(text)
            .iter()
            .map(|&code| self.char_width(code))
            .sum();
        units * size / 1000.0
    }

    fn char_width(&self, code: u8) -> f32 {
        let idx = code.checked_sub(FIRST_CHAR).map(usize::from);
        match self {
            LabelFont::Builtin => idx
                .and_then(|i| HELVETICA_BOLD_WIDTHS.get(i))
                .map(|&w| f32::from(w))
                .unwrap_or(0.0),
            LabelFont::TrueType(font) => idx
                .and_then(|i| font.widths.get(i))
                .copied()
                .unwrap_or(font.missing_width),
        }
    }

    /// Adds the font dictionary (and, for TrueType, the embedded font program)
    /// to `doc` and returns the id of the font dictionary.
    pub fn add_to_document(&self, doc: &mut Document) -> ObjectId {
        match self {
            LabelFont::Builtin => doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => FALLBACK_FONT_NAME,
                "Encoding" => "WinAnsiEncoding",
            }),
            LabelFont::TrueType(font) => font.add_to_document(doc),
        }
    }
}

impl TrueTypeFont {
    fn add_to_document(&self, doc: &mut Document) -> ObjectId {
        let program = Stream::new(
            dictionary! { "Length1" => Object::Integer(self.data.len() as i64) },
            self.data.clone(),
        );
        let program_id = doc.add_object(program);

        let base_font = Object::Name(self.name.as_bytes().to_vec());
        let descriptor_id = doc.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => base_font.clone(),
            // Nonsymbolic
            "Flags" => Object::Integer(32),
            "FontBBox" => Object::Array(self.bbox.iter().map(|&v| Object::Real(v)).collect()),
            "ItalicAngle" => Object::Integer(0),
            "Ascent" => Object::Real(self.ascent),
            "Descent" => Object::Real(self.descent),
            "CapHeight" => Object::Real(self.cap_height),
            "StemV" => Object::Integer(80),
            "MissingWidth" => Object::Real(self.missing_width),
            "FontFile2" => Object::Reference(program_id),
        });

        doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "TrueType",
            "BaseFont" => base_font,
            "FirstChar" => Object::Integer(i64::from(FIRST_CHAR)),
            "LastChar" => Object::Integer(i64::from(LAST_CHAR)),
            "Widths" => Object::Array(self.widths.iter().map(|&w| Object::Real(w)).collect()),
            "FontDescriptor" => Object::Reference(descriptor_id),
            "Encoding" => "WinAnsiEncoding",
        })
    }
}

/// Maps `text` to single-byte codes. Anything outside printable ASCII becomes `?`.
pub fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| {
            if c.is_ascii() && (FIRST_CHAR..=LAST_CHAR).contains(&(c as u8)) {
                c as u8
            } else {
                b'?'
            }
        })
        .collect()
}

pub struct FontResolver;

impl FontResolver {
    /// Probes `path` for a usable TrueType font and falls back to the builtin
    /// font when it cannot be used. Never fails.
    pub fn resolve(path: &Path) -> LabelFont {
        match Self::load_truetype(path) {
            Ok(font) => {
                info!("Using custom font '{}' from {}", font.name, path.display());
                LabelFont::TrueType(font)
            }
            Err(e) => {
                warn!("{}. Falling back to {}.", e, FALLBACK_FONT_NAME);
                LabelFont::Builtin
            }
        }
    }

    pub fn load_truetype(path: &Path) -> Result<TrueTypeFont> {
        let font_error = |reason: String| PaperToolsError::FontLoad {
            path: path.to_path_buf(),
            reason,
        };

        let data = std::fs::read(path).map_err(|e| font_error(e.to_string()))?;
        let face = ttf_parser::Face::parse(&data, 0).map_err(|e| font_error(e.to_string()))?;

        if face.tables().glyf.is_none() {
            return Err(font_error("font has no TrueType outlines".to_string()));
        }

        let scale = 1000.0 / f32::from(face.units_per_em());
        let advance = |c: char| {
            face.glyph_index(c)
                .and_then(|g| face.glyph_hor_advance(g))
                .map(|w| f32::from(w) * scale)
        };

        let missing_width = advance('?').unwrap_or(0.0);
        let widths = (FIRST_CHAR..=LAST_CHAR)
            .map(|code| advance(code as char).unwrap_or(missing_width))
            .collect();

        let bbox = face.global_bounding_box();
        let ascent = f32::from(face.ascender()) * scale;

        let name = face
            .names()
            .into_iter()
            .filter(|n| n.name_id == ttf_parser::name_id::POST_SCRIPT_NAME)
            .find_map(|n| n.to_string())
            .map(|n| sanitize_font_name(&n))
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "CustomFont".to_string());

        let descent = f32::from(face.descender()) * scale;
        let cap_height = face
            .capital_height()
            .map(|h| f32::from(h) * scale)
            .unwrap_or(ascent);
        let bbox = [
            f32::from(bbox.x_min) * scale,
            f32::from(bbox.y_min) * scale,
            f32::from(bbox.x_max) * scale,
            f32::from(bbox.y_max) * scale,
        ];

        Ok(TrueTypeFont {
            name,
            data,
            widths,
            missing_width,
            ascent,
            descent,
            cap_height,
            bbox,
        })
    }
}

fn sanitize_font_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}
