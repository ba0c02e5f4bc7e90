use crate::dom::dom_model::{Document, NodeId, Point, Rect};
use crate::hints::hint_model::Hint;

/// Marks the overlay host element on the page.
pub const HOST_ATTR: &str = "data-hint-host";
pub const LABEL_ATTR: &str = "data-hint-label";
pub const MENU_KEY_ATTR: &str = "data-hint-key";

const HOST_STYLE: &str = "all: initial; position: fixed; left: 0; top: 0; z-index: 2147483647; pointer-events: none";

const OVERLAY_CSS: &str = "\
.hint-marker { position: fixed; padding: 0 3px; font: bold 12px/16px monospace; \
color: #302505; background: #ffd76e; border: 1px solid #c38a22; border-radius: 3px; }
.hint-typed { color: #a0a0a0; }
.hint-region { position: fixed; background: rgba(40, 120, 220, 0.18); border: 2px solid #2878dc; }
.hint-menu { position: fixed; font: 13px/18px sans-serif; color: #eee; background: #222; \
border-radius: 4px; padding: 4px 8px; }
.hint-menu-item { white-space: nowrap; }";

// Rough marker box used to keep markers inside the viewport.
const CHAR_WIDTH: f64 = 8.0;
const MARKER_PADDING: f64 = 8.0;
const MARKER_HEIGHT: f64 = 18.0;

/// Handle to the isolated overlay layer on a page.
///
/// Markers live inside the host's shadow root, so light-tree queries from
/// the page never see them. Every render replaces the full content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlay {
    host: NodeId,
    root: NodeId,
}

impl Overlay {
    /// Attach the overlay host, reusing one that is already on the page.
    pub fn attach(doc: &mut Document) -> Overlay {
        if let Some(host) = doc.query_by_attr(HOST_ATTR).into_iter().next() {
            let root = doc.attach_shadow(host);
            return Overlay { host, root };
        }

        let host = doc.create_element("div");
        doc.set_attr(host, HOST_ATTR, "");
        doc.set_attr(host, "style", HOST_STYLE);
        let page_root = doc.root();
        doc.append_child(page_root, host);
        let root = doc.attach_shadow(host);
        Overlay { host, root }
    }

    pub fn host(&self) -> NodeId {
        self.host
    }

    /// Render one marker per hint. `typed` is the prefix entered so far and
    /// is shown dimmed inside each marker.
    pub fn render_hints(&self, doc: &mut Document, hints: &[&Hint], typed: &str, draw_regions: bool) {
        self.reset(doc);
        let viewport = doc.viewport();

        for hint in hints {
            if draw_regions {
                self.add_region(doc, hint.candidate.rect);
            }

            let label = hint.label.as_str();
            let marker = doc.create_element("div");
            doc.set_attr(marker, "class", "hint-marker");
            doc.set_attr(marker, LABEL_ATTR, label);
            let at = clamp_marker(hint.candidate.anchor, label.len(), &viewport);
            doc.set_attr(marker, "style", &format!("left: {}px; top: {}px", at.x, at.y));

            let typed_len = if label.starts_with(typed) { typed.len() } else { 0 };
            if typed_len > 0 {
                let span = doc.create_element("span");
                doc.set_attr(span, "class", "hint-typed");
                doc.set_text(span, &label[..typed_len]);
                doc.append_child(marker, span);
                let rest = doc.create_element("span");
                doc.set_text(rest, &label[typed_len..]);
                doc.append_child(marker, rest);
            } else {
                doc.set_text(marker, label);
            }
            doc.append_child(self.root, marker);
        }
    }

    /// Replace the hints with the follow-up menu for a resolved region.
    pub fn render_menu(&self, doc: &mut Document, target: &Hint, items: &[(char, &str)]) {
        self.reset(doc);
        let viewport = doc.viewport();
        self.add_region(doc, target.candidate.rect);

        let menu = doc.create_element("div");
        doc.set_attr(menu, "class", "hint-menu");
        let at = clamp_marker(target.candidate.anchor, 0, &viewport);
        doc.set_attr(menu, "style", &format!("left: {}px; top: {}px", at.x, at.y));
        for (key, title) in items {
            let item = doc.create_element("div");
            doc.set_attr(item, "class", "hint-menu-item");
            doc.set_attr(item, MENU_KEY_ATTR, &key.to_string());
            doc.set_text(item, &format!("{}  {}", key, title));
            doc.append_child(menu, item);
        }
        doc.append_child(self.root, menu);
    }

    /// Remove the host and everything under it.
    pub fn teardown(self, doc: &mut Document) {
        doc.clear_children(self.root);
        doc.remove(self.host);
    }

    fn reset(&self, doc: &mut Document) {
        doc.clear_children(self.root);
        let style = doc.create_element("style");
        doc.set_text(style, OVERLAY_CSS);
        doc.append_child(self.root, style);
    }

    fn add_region(&self, doc: &mut Document, rect: Rect) {
        let region = doc.create_element("div");
        doc.set_attr(region, "class", "hint-region");
        doc.set_attr(
            region,
            "style",
            &format!(
                "left: {}px; top: {}px; width: {}px; height: {}px",
                rect.x, rect.y, rect.width, rect.height
            ),
        );
        doc.append_child(self.root, region);
    }
}

fn clamp_marker(anchor: Point, label_len: usize, viewport: &Rect) -> Point {
    let width = label_len as f64 * CHAR_WIDTH + MARKER_PADDING;
    Point {
        x: anchor.x.clamp(viewport.x, (viewport.right() - width).max(viewport.x)),
        y: anchor.y.clamp(viewport.y, (viewport.bottom() - MARKER_HEIGHT).max(viewport.y)),
    }
}

/// Every overlay node on the page, hosts and shadow content included.
pub fn overlay_node_count(doc: &Document) -> usize {
    doc.query_by_attr(HOST_ATTR)
        .into_iter()
        .map(|host| doc.composed_descendants(host).len())
        .sum()
}

/// Labels currently painted, in render order.
pub fn rendered_labels(doc: &Document) -> Vec<String> {
    overlay_nodes_with(doc, LABEL_ATTR)
}

/// Menu keys currently painted, in render order.
pub fn rendered_menu_keys(doc: &Document) -> Vec<String> {
    overlay_nodes_with(doc, MENU_KEY_ATTR)
}

/// Number of region backdrops currently painted.
pub fn rendered_region_count(doc: &Document) -> usize {
    overlay_nodes(doc)
        .into_iter()
        .filter(|id| doc.attr(*id, "class") == Some("hint-region"))
        .count()
}

fn overlay_nodes(doc: &Document) -> Vec<NodeId> {
    doc.query_by_attr(HOST_ATTR)
        .into_iter()
        .flat_map(|host| doc.composed_descendants(host))
        .collect()
}

fn overlay_nodes_with(doc: &Document, attr: &str) -> Vec<String> {
    overlay_nodes(doc)
        .into_iter()
        .filter_map(|id| doc.attr(id, attr).map(str::to_string))
        .collect()
}
