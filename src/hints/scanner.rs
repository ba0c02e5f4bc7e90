use crate::dom::dom_model::{Document, HOVER_ATTR, NodeId, SHADOW_ROOT_TAG, FRAME_ROOT_TAG};
use crate::hints::hint_model::{Candidate, Payload, ScanConfig};
use crate::hints::mode::Predicate;
use crate::hints::overlay::HOST_ATTR;

const POINTER_EVENTS: [&str; 4] = ["mouseover", "mouseenter", "mouseout", "mouseleave"];

/// Collect every node matching `predicate`, in document order.
///
/// The walk enters shadow roots (before the host's light children) and
/// same-origin frames. Cross-origin frames and the hint overlay itself are
/// skipped. Nothing is mutated.
pub fn scan(doc: &Document, predicate: Predicate, config: &ScanConfig) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    let mut stack = vec![doc.root()];

    while let Some(id) = stack.pop() {
        if doc.has_attr(id, HOST_ATTR) {
            continue;
        }

        let tag = doc.node(id).tag.as_str();
        if tag != SHADOW_ROOT_TAG && tag != FRAME_ROOT_TAG {
            if let Some(payload) = matches(doc, id, predicate, config) {
                let rect = doc.abs_rect(id);
                candidates.push(Candidate {
                    node: id,
                    rect,
                    anchor: rect.top_left(),
                    payload,
                });
            }
        }

        // Push in reverse so the pop order is: shadow tree, frame document,
        // then light children.
        for child in doc.children(id).iter().rev() {
            stack.push(*child);
        }
        if let Some(frame) = doc.frame(id) {
            if doc.is_same_origin_frame(id) {
                stack.push(frame.root);
            }
        }
        if let Some(shadow) = doc.shadow_root(id) {
            stack.push(shadow);
        }
    }

    candidates
}

/// Evaluate one predicate against one node.
pub fn matches(
    doc: &Document,
    id: NodeId,
    predicate: Predicate,
    config: &ScanConfig,
) -> Option<Payload> {
    match predicate {
        Predicate::Hyperlink => link_destination(doc, id).map(|url| Payload::Link { url }),
        Predicate::Clickable => is_clickable(doc, id).then_some(Payload::None),
        Predicate::PointerAffordance => has_pointer_affordance(doc, id).then_some(Payload::Pointer),
        Predicate::ScrollableOverflow => {
            scroll_overflow(doc, id, config).map(|overflow| Payload::Scroll { overflow })
        }
        Predicate::LargeBlock => region_area(doc, id, config).map(|area| Payload::Region { area }),
    }
}

/// Absolute destination of a link element, if it has one worth following.
pub fn link_destination(doc: &Document, id: NodeId) -> Option<String> {
    let node = doc.node(id);
    if node.tag != "a" && node.tag != "area" {
        return None;
    }
    let href = doc.attr(id, "href")?.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    if href.to_ascii_lowercase().starts_with("javascript:") {
        return None;
    }

    let base = match doc.enclosing_frame(id).and_then(|frame_el| doc.frame(frame_el)) {
        Some(frame) => frame.url.as_str(),
        None => doc.url(),
    };
    let base = reqwest::Url::parse(base).ok()?;
    base.join(href).ok().map(|url| url.to_string())
}

fn is_clickable(doc: &Document, id: NodeId) -> bool {
    let node = doc.node(id);
    if doc.has_attr(id, "disabled") {
        return false;
    }

    let by_tag = match node.tag.as_str() {
        "a" | "area" => doc.has_attr(id, "href"),
        "button" | "select" | "textarea" | "summary" => true,
        "input" => doc.attr(id, "type") != Some("hidden"),
        _ => false,
    };

    by_tag
        || doc.has_attr(id, "onclick")
        || matches!(doc.attr(id, "role"), Some("button") | Some("link"))
        || node.has_listener("click")
}

fn has_pointer_affordance(doc: &Document, id: NodeId) -> bool {
    let node = doc.node(id);
    POINTER_EVENTS.iter().any(|event| node.has_listener(event)) || doc.has_attr(id, HOVER_ATTR)
}

fn scroll_overflow(doc: &Document, id: NodeId, config: &ScanConfig) -> Option<f64> {
    let node = doc.node(id);
    let overflow = node.scroll_height - node.client_height;
    if overflow < config.min_scroll_overflow {
        return None;
    }

    // The page scroller scrolls with `overflow: visible`.
    let is_page_scroller = matches!(node.tag.as_str(), "html" | "body");
    (is_page_scroller || node.style.overflow_y.allows_scrolling()).then_some(overflow)
}

fn region_area(doc: &Document, id: NodeId, config: &ScanConfig) -> Option<f64> {
    let node = doc.node(id);
    if matches!(node.tag.as_str(), "html" | "body") || !doc.display(id).is_block_level() {
        return None;
    }
    let rect = node.rect;
    let area = rect.area();
    (rect.width >= config.region_min_width && area >= config.region_min_area).then_some(area)
}
