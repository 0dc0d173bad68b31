use crate::error::{PaperToolsError, Result};
use crate::services::discovery::{display_name, FileDiscovery};
use crate::services::fonts::{FontResolver, LabelFont};
use crate::services::overlay::OverlayBuilder;
use crate::types::{LabelConfig, LabelReport, Overlay, PageGeometry};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::path::Path;
use tracing::{debug, info, warn};

const FONT_RESOURCE_BASE: &str = "PTLabel";

pub struct PageLabeler;

impl PageLabeler {
    /// Finds the single PDF in the configured directory and writes its
    /// labeled copy next to it.
    pub async fn run(config: &LabelConfig) -> Result<LabelReport> {
        let input = FileDiscovery::find_single_pdf(&config.dir)?;
        let output = config.output_path_for(&input);
        info!("Processing '{}'...", display_name(&input));

        let config = config.clone();

        tokio::task::spawn_blocking(move || {
            let font = FontResolver::resolve(&config.font_path);
            Self::label_file(&input, &output, &font, &config)
        })
        .await?
    }

    /// Layout for every page of the single PDF in the configured directory,
    /// without writing anything.
    pub async fn plan(config: &LabelConfig) -> Result<Vec<(PageGeometry, Overlay)>> {
        let input = FileDiscovery::find_single_pdf(&config.dir)?;
        let config = config.clone();

        tokio::task::spawn_blocking(move || -> Result<Vec<(PageGeometry, Overlay)>> {
            let font = FontResolver::resolve(&config.font_path);
            let doc = Document::load(&input)?;
            let builder = OverlayBuilder::new(&font, &config);

            doc.get_pages()
                .into_values()
                .enumerate()
                .map(|(index, page_id)| -> Result<(PageGeometry, Overlay)> {
                    let geometry = Self::page_geometry(&doc, page_id, index)?;
                    Ok((geometry, builder.layout(index, &geometry)))
                })
                .collect()
        })
        .await?
    }

    pub fn label_file(
        input: &Path,
        output: &Path,
        font: &LabelFont,
        config: &LabelConfig,
    ) -> Result<LabelReport> {
        let mut doc = Document::load(input)?;
        let pages = Self::label_document(&mut doc, font, config)?;

        // Write beside the target and rename so a failed save leaves no
        // half-written output behind.
        let partial = output.with_extension("pdf.part");
        if let Err(e) = doc.save(&partial) {
            let _ = std::fs::remove_file(&partial);
            return Err(e.into());
        }
        std::fs::rename(&partial, output)?;

        info!("Success! Output saved as '{}'", display_name(output));

        Ok(LabelReport {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            pages,
            font: font.name().to_string(),
        })
    }

    /// Overlays label and cut guide on every page of `doc`, in place.
    /// Returns the number of pages labeled.
    pub fn label_document(
        doc: &mut Document,
        font: &LabelFont,
        config: &LabelConfig,
    ) -> Result<usize> {
        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        if page_ids.is_empty() {
            warn!("Document has no pages");
            return Ok(0);
        }

        let font_id = font.add_to_document(doc);
        let save_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        let restore_id = doc.add_object(Stream::new(Dictionary::new(), b"Q\n".to_vec()));
        let builder = OverlayBuilder::new(font, config);

        for (index, page_id) in page_ids.iter().copied().enumerate() {
            let geometry = Self::page_geometry(doc, page_id, index)?;
            let overlay = builder.layout(index, &geometry);

            let resource = Self::attach_font(doc, page_id, font_id)?;
            let content = builder.content(&overlay, &geometry, &resource)?;
            let overlay_id = doc.add_object(Stream::new(Dictionary::new(), content));

            Self::append_contents(doc, page_id, save_id, restore_id, overlay_id)?;

            debug!(
                "Page {}: '{}' ({:.1} x {:.1})",
                index + 1,
                overlay.label,
                geometry.width,
                geometry.height
            );
        }

        Ok(page_ids.len())
    }

    pub fn page_geometry(doc: &Document, page_id: ObjectId, index: usize) -> Result<PageGeometry> {
        let invalid = |reason: &str| PaperToolsError::PageGeometry {
            page: index + 1,
            reason: reason.to_string(),
        };

        let media_box = inherited_attribute(doc, page_id, b"MediaBox")?
            .ok_or_else(|| invalid("no MediaBox"))?;

        let coords = match resolve(doc, &media_box)? {
            Object::Array(items) => items
                .iter()
                .map(|item| resolve(doc, item).map(number))
                .collect::<Result<Vec<_>>>()?,
            _ => return Err(invalid("MediaBox is not an array")),
        };

        let [x0, y0, x1, y1] = match coords.as_slice() {
            [Some(a), Some(b), Some(c), Some(d)] => [*a, *b, *c, *d],
            _ => return Err(invalid("MediaBox must hold four numbers")),
        };

        let geometry = PageGeometry {
            x: x0.min(x1),
            y: y0.min(y1),
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
        };

        if geometry.width <= 0.0 || geometry.height <= 0.0 {
            return Err(invalid("MediaBox has zero area"));
        }

        Ok(geometry)
    }

    /// Makes the label font available in the page's resources, copying
    /// inherited resources onto the page. Returns the resource name used.
    fn attach_font(doc: &mut Document, page_id: ObjectId, font_id: ObjectId) -> Result<String> {
        let mut resources = match inherited_attribute(doc, page_id, b"Resources")? {
            Some(obj) => resolve(doc, &obj)?.as_dict()?.clone(),
            None => Dictionary::new(),
        };

        let mut fonts = match resources.get(b"Font") {
            Ok(obj) => resolve(doc, obj)?.as_dict()?.clone(),
            Err(_) => Dictionary::new(),
        };

        let mut name = FONT_RESOURCE_BASE.to_string();
        let mut n = 1;
        while fonts.has(name.as_bytes()) {
            n += 1;
            name = format!("{}{}", FONT_RESOURCE_BASE, n);
        }

        fonts.set(name.clone(), Object::Reference(font_id));
        resources.set("Font", Object::Dictionary(fonts));

        doc.get_object_mut(page_id)?
            .as_dict_mut()?
            .set("Resources", Object::Dictionary(resources));

        Ok(name)
    }

    /// Wraps the existing page content in q/Q and appends the overlay after it.
    fn append_contents(
        doc: &mut Document,
        page_id: ObjectId,
        save_id: ObjectId,
        restore_id: ObjectId,
        overlay_id: ObjectId,
    ) -> Result<()> {
        let existing = match doc.get_dictionary(page_id)?.get(b"Contents") {
            Ok(obj) => obj.clone(),
            Err(_) => Object::Array(Vec::new()),
        };

        let original: Vec<Object> = match resolve(doc, &existing)? {
            Object::Array(items) => items.clone(),
            Object::Stream(_) => vec![existing.clone()],
            _ => Vec::new(),
        };

        let mut contents = Vec::with_capacity(original.len() + 3);
        contents.push(Object::Reference(save_id));
        contents.extend(original);
        contents.push(Object::Reference(restore_id));
        contents.push(Object::Reference(overlay_id));

        doc.get_object_mut(page_id)?
            .as_dict_mut()?
            .set("Contents", Object::Array(contents));

        Ok(())
    }
}

/// Follows references until a direct object is reached.
fn resolve<'a>(doc: &'a Document, mut obj: &'a Object) -> Result<&'a Object> {
    while let Object::Reference(id) = obj {
        obj = doc.get_object(*id)?;
    }
    Ok(obj)
}

/// Looks up `key` on the page, then on its ancestors in the page tree.
fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Result<Option<Object>> {
    let mut node = doc.get_dictionary(page_id)?;

    // Bounded walk guards against a cyclic Parent chain.
    for _ in 0..64 {
        if let Ok(value) = node.get(key) {
            return Ok(Some(value.clone()));
        }
        match node.get(b"Parent") {
            Ok(parent) => node = resolve(doc, parent)?.as_dict()?,
            Err(_) => return Ok(None),
        }
    }

    Ok(None)
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
