use crate::error::Result;
use crate::services::fonts::{encode_text, LabelFont};
use crate::types::{LabelConfig, Overlay, PageGeometry, Segment};
use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};

/// Label for the page at 0-based `index`: two pages per physical sheet,
/// front then back.
pub fn label_text(index: usize) -> String {
    let side = if index % 2 == 0 { "FRONT" } else { "BACK" };
    format!("PAPER {} - {}", index / 2 + 1, side)
}

/// Lays out and encodes the label and cut guide for individual pages.
pub struct OverlayBuilder<'a> {
    font: &'a LabelFont,
    config: &'a LabelConfig,
}

impl<'a> OverlayBuilder<'a> {
    pub fn new(font: &'a LabelFont, config: &'a LabelConfig) -> Self {
        Self { font, config }
    }

    pub fn layout(&self, index: usize, geometry: &PageGeometry) -> Overlay {
        let label = label_text(index);
        let text_width = self.font.text_width(&label, self.config.font_size);

        let line_x = geometry.width / 2.0;
        let y_center = geometry.height / 2.0;
        let half_gap = text_width / 2.0 + self.config.gap_margin;
        let gap = (y_center - half_gap, y_center + half_gap);

        // A label longer than the page swallows the whole line.
        let segments = [(0.0, gap.0), (gap.1, geometry.height)]
            .into_iter()
            .filter(|(start, end)| end > start)
            .map(|(y_start, y_end)| Segment {
                x: line_x,
                y_start,
                y_end,
            })
            .collect();

        // Rotating the baseline by 90° shifts the glyphs left of the pivot;
        // a quarter of the font size pulls them back over the line.
        let pivot = (line_x + self.config.font_size / 4.0, y_center);

        Overlay {
            label,
            text_width,
            gap,
            segments,
            pivot,
        }
    }

    /// Content stream drawing `overlay` on a page, referencing the label font
    /// under the resource name `font_resource`.
    pub fn content(
        &self,
        overlay: &Overlay,
        geometry: &PageGeometry,
        font_resource: &str,
    ) -> Result<Vec<u8>> {
        let real = Object::Real;
        let mut operations = vec![
            Operation::new("q", vec![]),
            Operation::new("w", vec![real(self.config.line_width)]),
            Operation::new("G", vec![real(0.0)]),
        ];

        for segment in &overlay.segments {
            let x = real(geometry.x + segment.x);
            operations.extend([
                Operation::new("m", vec![x.clone(), real(geometry.y + segment.y_start)]),
                Operation::new("l", vec![x, real(geometry.y + segment.y_end)]),
                Operation::new("S", vec![]),
            ]);
        }
        operations.push(Operation::new("Q", vec![]));

        let (pivot_x, pivot_y) = overlay.pivot;
        operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    real(1.0),
                    real(0.0),
                    real(0.0),
                    real(1.0),
                    real(geometry.x + pivot_x),
                    real(geometry.y + pivot_y),
                ],
            ),
            // 90° counter-clockwise
            Operation::new(
                "cm",
                vec![real(0.0), real(1.0), real(-1.0), real(0.0), real(0.0), real(0.0)],
            ),
            Operation::new("w", vec![real(self.config.line_width)]),
            Operation::new("g", vec![real(0.0)]),
            Operation::new("G", vec![real(0.0)]),
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(font_resource.as_bytes().to_vec()),
                    real(self.config.font_size),
                ],
            ),
            // Fill then stroke
            Operation::new("Tr", vec![Object::Integer(2)]),
            Operation::new("Td", vec![real(-overlay.text_width / 2.0), real(0.0)]),
            Operation::new(
                "Tj",
                vec![Object::String(encode_text(&overlay.label), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
            Operation::new("Q", vec![]),
        ]);

        Ok(Content { operations }.encode()?)
    }
}
