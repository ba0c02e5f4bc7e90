use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dom::dom_model::{Display, Document, NodeId, Overflow, Rect, Style, Visibility};
use crate::engine::error::HintError;

/// Serialized page as produced by a DOM extraction step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub url: String,
    #[serde(default)]
    pub viewport: Viewport,
    pub root: DomNode,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub url: String,
    #[serde(default)]
    pub children: Vec<DomNode>,
}

/// One element of a page snapshot. Also used as a fluent builder:
///
/// ```
/// use hint_engine::dom::snapshot::DomNode;
///
/// let link = DomNode::new("a").attr("href", "/docs").text("Docs").rect(10.0, 10.0, 60.0, 18.0);
/// assert_eq!(link.tag, "a");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DomNode {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub text: Option<String>,
    pub rect: Rect,
    pub style: Style,
    pub listeners: Vec<String>,
    pub scroll_height: f64,
    pub client_height: f64,
    pub children: Vec<DomNode>,
    pub shadow: Option<Vec<DomNode>>,
    pub frame: Option<FrameSnapshot>,
}

impl DomNode {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn rect(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.rect = Rect::new(x, y, width, height);
        self
    }

    pub fn display(mut self, display: Display) -> Self {
        self.style.display = Some(display);
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.style.visibility = Some(visibility);
        self
    }

    pub fn overflow_y(mut self, overflow: Overflow) -> Self {
        self.style.overflow_y = overflow;
        self
    }

    pub fn z_index(mut self, z: i32) -> Self {
        self.style.z_index = z;
        self
    }

    pub fn scroll(mut self, scroll_height: f64, client_height: f64) -> Self {
        self.scroll_height = scroll_height;
        self.client_height = client_height;
        self
    }

    pub fn listener(mut self, name: &str) -> Self {
        self.listeners.push(name.to_string());
        self
    }

    pub fn child(mut self, child: DomNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = DomNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn shadow_child(mut self, child: DomNode) -> Self {
        self.shadow.get_or_insert_with(Vec::new).push(child);
        self
    }

    pub fn frame(mut self, url: &str, children: Vec<DomNode>) -> Self {
        self.frame = Some(FrameSnapshot {
            url: url.to_string(),
            children,
        });
        self
    }
}

impl PageSnapshot {
    pub fn new(url: &str, width: f64, height: f64, root: DomNode) -> Self {
        Self {
            url: url.to_string(),
            viewport: Viewport { width, height },
            root,
        }
    }

    /// Build the live document. The snapshot root's tag and attributes are
    /// applied to the document root; a zero root rect becomes the viewport.
    pub fn into_document(self) -> Document {
        let mut doc = Document::new(&self.url, self.viewport.width, self.viewport.height);
        let root = doc.root();
        apply_node(&mut doc, root, &self.root);
        if self.root.rect.is_empty() {
            doc.node_mut(root).rect = doc.viewport();
        }
        doc
    }
}

fn apply_node(doc: &mut Document, id: NodeId, snapshot: &DomNode) {
    {
        let node = doc.node_mut(id);
        node.tag = snapshot.tag.clone();
        node.attrs = snapshot.attrs.clone();
        node.text = snapshot.text.clone();
        node.rect = snapshot.rect;
        node.style = snapshot.style;
        node.listeners = snapshot.listeners.clone();
        node.scroll_height = snapshot.scroll_height;
        node.client_height = snapshot.client_height;
    }

    for child in &snapshot.children {
        let child_id = doc.create_element(&child.tag);
        doc.append_child(id, child_id);
        apply_node(doc, child_id, child);
    }

    if let Some(shadow_children) = &snapshot.shadow {
        let shadow = doc.attach_shadow(id);
        for child in shadow_children {
            let child_id = doc.create_element(&child.tag);
            doc.append_child(shadow, child_id);
            apply_node(doc, child_id, child);
        }
    }

    if let Some(frame) = &snapshot.frame {
        let frame_root = doc.attach_frame(id, &frame.url);
        for child in &frame.children {
            let child_id = doc.create_element(&child.tag);
            doc.append_child(frame_root, child_id);
            apply_node(doc, child_id, child);
        }
    }
}

/// Parse a page snapshot from JSON text.
pub fn parse_page(json: &str) -> Result<Document, HintError> {
    let snapshot: PageSnapshot =
        serde_json::from_str(json).map_err(|e| HintError::JsonParse {
            context: "page snapshot".into(),
            source: e,
        })?;
    Ok(snapshot.into_document())
}

/// Load a page snapshot file.
pub fn load_page(path: &str) -> Result<Document, HintError> {
    let content = std::fs::read_to_string(path).map_err(|e| HintError::SnapshotIo {
        path: path.to_string(),
        source: e,
    })?;
    parse_page(&content)
}
