//! Page annotation: highlight matched regions, black out everything else.
//!
//! Every text block on a matched page ends up in exactly one of three
//! states, decided with strict precedence:
//!
//! 1. **Protected**: the block contains a protected header/label field and
//!    is left untouched, even when it overlaps a highlight.
//! 2. **Highlighted**: the block's rectangle intersects a highlight region
//!    (any overlap counts); the reveal path.
//! 3. **Redacted**: everything else; the block's full area is covered by an
//!    opaque black fill before the page reaches any output document.
//!
//! Marks are drawn as a content stream appended after the existing page
//! content of the per-record working copy: a translucent yellow fill for
//! highlights (the underlying text stays legible) and an opaque black fill
//! for redactions. The shared source document is never touched.

use crate::domain::ProtectedFieldSet;
use crate::index::{PageBlock, Region};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Graphics state name registered for translucent highlight fills.
const HIGHLIGHT_GS: &str = "GSvhl";

/// Fill alpha for highlight marks.
const HIGHLIGHT_ALPHA: f32 = 0.4;

/// Terminal annotation state of one text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockState {
    /// Contains a protected label; never marked
    Protected,
    /// Intersects a highlight region; marked with the translucent fill
    Highlighted,
    /// Covered by the opaque redaction fill
    Redacted,
}

/// Assigns each block exactly one terminal state.
///
/// Precedence is protected > highlighted > redacted; the protected check is
/// evaluated first so a label-bearing block is never redacted even when it
/// fails the highlight-intersection test.
pub fn classify(
    blocks: &[PageBlock],
    highlights: &[Region],
    fields: &ProtectedFieldSet,
) -> Vec<BlockState> {
    blocks
        .iter()
        .map(|block| {
            if fields.is_protected(&block.text) {
                BlockState::Protected
            } else if highlights.iter().any(|h| block.region.intersects(h)) {
                BlockState::Highlighted
            } else {
                BlockState::Redacted
            }
        })
        .collect()
}

/// Draws the marks for one page onto the working copy.
///
/// `page_number` is lopdf's 1-based page number. Regions arrive in MuPDF
/// page coordinates (origin at the top-left corner of the visible box, y
/// growing downwards) and are flipped into PDF user space through the
/// page's MediaBox, so marks land correctly on pages whose box does not
/// start at the origin. Highlight fills are drawn for every highlight
/// region (search hits and matched block bounds), then opaque fills for
/// every redacted block.
pub fn apply_marks(
    doc: &mut Document,
    page_number: u32,
    highlights: &[Region],
    redactions: &[Region],
) -> lopdf::Result<()> {
    if highlights.is_empty() && redactions.is_empty() {
        return Ok(());
    }

    let page_id = doc
        .get_pages()
        .get(&page_number)
        .copied()
        .ok_or(lopdf::Error::PageNumberNotFound(page_number))?;

    let media = media_box(doc, page_id)?;

    if !highlights.is_empty() {
        ensure_highlight_gstate(doc, page_id)?;
    }

    let mut operations = Vec::new();
    for region in highlights {
        push_fill(&mut operations, region, &media, (1.0, 1.0, 0.0), true);
    }
    for region in redactions {
        push_fill(&mut operations, region, &media, (0.0, 0.0, 0.0), false);
    }

    append_content(doc, page_id, Content { operations })
}

/// Emits a `q ... re f Q` fill for one region, flipped into PDF user space.
fn push_fill(
    operations: &mut Vec<Operation>,
    region: &Region,
    media: &Region,
    rgb: (f32, f32, f32),
    translucent: bool,
) {
    let x = media.x0 + region.x0;
    let y = media.y1 - region.y1;

    operations.push(Operation::new("q", vec![]));
    if translucent {
        operations.push(Operation::new(
            "gs",
            vec![Object::Name(HIGHLIGHT_GS.as_bytes().to_vec())],
        ));
    }
    operations.push(Operation::new(
        "rg",
        vec![
            Object::Real(rgb.0),
            Object::Real(rgb.1),
            Object::Real(rgb.2),
        ],
    ));
    operations.push(Operation::new(
        "re",
        vec![
            Object::Real(x),
            Object::Real(y),
            Object::Real(region.width()),
            Object::Real(region.height()),
        ],
    ));
    operations.push(Operation::new("f", vec![]));
    operations.push(Operation::new("Q", vec![]));
}

/// Registers the translucent graphics state in the page resources.
fn ensure_highlight_gstate(doc: &mut Document, page_id: ObjectId) -> lopdf::Result<()> {
    let mut gstate = Dictionary::new();
    gstate.set("Type", Object::Name(b"ExtGState".to_vec()));
    gstate.set("ca", Object::Real(HIGHLIGHT_ALPHA));
    gstate.set("CA", Object::Real(HIGHLIGHT_ALPHA));

    enum ResourcesSlot {
        Direct,
        Referenced(ObjectId),
        Missing,
    }

    let slot = {
        let page_dict = doc.get_object(page_id)?.as_dict()?;
        match page_dict.get(b"Resources") {
            Ok(Object::Reference(id)) => ResourcesSlot::Referenced(*id),
            Ok(_) => ResourcesSlot::Direct,
            Err(_) => ResourcesSlot::Missing,
        }
    };

    match slot {
        ResourcesSlot::Referenced(id) => {
            let resources = doc.get_object_mut(id)?.as_dict_mut()?;
            set_gstate(resources, gstate);
        }
        ResourcesSlot::Direct => {
            let page_dict = doc.get_object_mut(page_id)?.as_dict_mut()?;
            let resources = page_dict.get_mut(b"Resources")?.as_dict_mut()?;
            set_gstate(resources, gstate);
        }
        ResourcesSlot::Missing => {
            // The page inherits Resources from the page tree. A fresh
            // page-level dictionary would shadow the inherited one and break
            // font lookups, so seed it with the inherited entries first.
            let mut resources = match inherited_entry(doc, page_id, b"Resources")? {
                Some(Object::Reference(id)) => doc.get_object(id)?.as_dict()?.clone(),
                Some(Object::Dictionary(dict)) => dict,
                _ => Dictionary::new(),
            };
            set_gstate(&mut resources, gstate);
            let page_dict = doc.get_object_mut(page_id)?.as_dict_mut()?;
            page_dict.set("Resources", Object::Dictionary(resources));
        }
    }

    Ok(())
}

/// The page's MediaBox, normalized to `x0 <= x1, y0 <= y1`. The entry may
/// live on the page itself or anywhere up the page tree.
fn media_box(doc: &Document, page_id: ObjectId) -> lopdf::Result<Region> {
    let array = match inherited_entry(doc, page_id, b"MediaBox")? {
        Some(Object::Reference(id)) => doc.get_object(id)?.as_array()?.clone(),
        Some(Object::Array(array)) => array,
        _ => return Err(lopdf::Error::DictKey),
    };
    if array.len() != 4 {
        return Err(lopdf::Error::Type);
    }

    let mut values = [0.0f32; 4];
    for (slot, object) in values.iter_mut().zip(&array) {
        *slot = match object {
            Object::Integer(v) => *v as f32,
            Object::Real(v) => *v,
            _ => return Err(lopdf::Error::Type),
        };
    }

    Ok(Region::new(
        values[0].min(values[2]),
        values[1].min(values[3]),
        values[0].max(values[2]),
        values[1].max(values[3]),
    ))
}

/// Looks up an inheritable page attribute on the page itself or any
/// ancestor in the page tree.
fn inherited_entry(
    doc: &Document,
    page_id: ObjectId,
    key: &[u8],
) -> lopdf::Result<Option<Object>> {
    let mut current_id = page_id;
    // Bounded walk in case of a malformed, cyclic Parent chain
    for _ in 0..32 {
        let dict = doc.get_object(current_id)?.as_dict()?;
        if let Ok(object) = dict.get(key) {
            return Ok(Some(object.clone()));
        }
        match dict.get(b"Parent") {
            Ok(Object::Reference(id)) => current_id = *id,
            _ => return Ok(None),
        }
    }
    Ok(None)
}

fn set_gstate(resources: &mut Dictionary, gstate: Dictionary) {
    match resources.get_mut(b"ExtGState").and_then(Object::as_dict_mut) {
        Ok(ext_gstates) => {
            ext_gstates.set(HIGHLIGHT_GS, Object::Dictionary(gstate));
        }
        Err(_) => {
            let mut ext_gstates = Dictionary::new();
            ext_gstates.set(HIGHLIGHT_GS, Object::Dictionary(gstate));
            resources.set("ExtGState", Object::Dictionary(ext_gstates));
        }
    }
}

/// Appends an extra content stream after the page's existing content.
fn append_content(doc: &mut Document, page_id: ObjectId, content: Content) -> lopdf::Result<()> {
    let encoded = content.encode()?;
    let stream_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

    let page_dict = doc.get_object_mut(page_id)?.as_dict_mut()?;
    let contents = page_dict.get(b"Contents").ok().cloned();
    match contents {
        Some(Object::Reference(existing)) => {
            page_dict.set(
                "Contents",
                Object::Array(vec![
                    Object::Reference(existing),
                    Object::Reference(stream_id),
                ]),
            );
        }
        Some(Object::Array(mut streams)) => {
            streams.push(Object::Reference(stream_id));
            page_dict.set("Contents", Object::Array(streams));
        }
        _ => {
            page_dict.set("Contents", Object::Reference(stream_id));
        }
    }

    Ok(())
}
