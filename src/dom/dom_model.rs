use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Attribute mirroring the synthetic hover state of an element.
pub const HOVER_ATTR: &str = "data-hint-hovered";

pub const SHADOW_ROOT_TAG: &str = "#shadow-root";
pub const FRAME_ROOT_TAG: &str = "#document";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Axis-aligned box in viewport coordinates (same as `getBoundingClientRect`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Overlapping part of two rects, `None` when they do not overlap.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        Some(Rect::new(
            x,
            y,
            self.right().min(other.right()) - x,
            self.bottom().min(other.bottom()) - y,
        ))
    }

    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    pub fn top_left(&self) -> Point {
        Point { x: self.x, y: self.y }
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Display {
    Block,
    Inline,
    InlineBlock,
    Flex,
    Grid,
    None,
}

impl Display {
    pub fn is_block_level(&self) -> bool {
        matches!(self, Display::Block | Display::Flex | Display::Grid)
    }

    /// User-agent default for a tag when the snapshot does not say.
    pub fn default_for(tag: &str) -> Display {
        match tag {
            "a" | "span" | "b" | "i" | "em" | "strong" | "label" | "code" | "abbr" | "small" => {
                Display::Inline
            }
            "button" | "input" | "select" | "textarea" | "img" | "iframe" | "frame" => {
                Display::InlineBlock
            }
            "head" | "script" | "style" | "meta" | "link" | "title" | "template" => Display::None,
            _ => Display::Block,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Visible,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    Auto,
    Scroll,
}

impl Overflow {
    pub fn allows_scrolling(&self) -> bool {
        matches!(self, Overflow::Auto | Overflow::Scroll)
    }
}

/// Computed style subset the engine cares about.
///
/// `display` and `visibility` are optional: a missing display falls back to
/// the tag default, a missing visibility inherits from the parent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub display: Option<Display>,
    pub visibility: Option<Visibility>,
    pub overflow_y: Overflow,
    pub z_index: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    Click,
    MouseOver,
    MouseOut,
    Focus,
    ScrollIntoView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchedEvent {
    pub target: NodeId,
    pub kind: EventKind,
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub url: String,
    pub root: NodeId,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub text: Option<String>,
    pub rect: Rect,
    pub style: Style,
    pub listeners: Vec<String>,
    pub scroll_height: f64,
    pub client_height: f64,

    parent: Option<NodeId>,
    children: Vec<NodeId>,
    shadow_root: Option<NodeId>,
    frame: Option<Frame>,
    // Element owning this shadow root / frame document.
    host: Option<NodeId>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
            text: None,
            rect: Rect::default(),
            style: Style::default(),
            listeners: vec![],
            scroll_height: 0.0,
            client_height: 0.0,
            parent: None,
            children: vec![],
            shadow_root: None,
            frame: None,
            host: None,
        }
    }

    pub fn has_listener(&self, name: &str) -> bool {
        self.listeners.iter().any(|l| l == name)
    }
}

/// An owned, arena-backed page.
///
/// Nodes are never freed; removing a node only detaches it, so a `NodeId`
/// held by a hint stays valid and `contains` tells whether it is still on
/// the page.
#[derive(Debug, Clone)]
pub struct Document {
    url: String,
    viewport: Rect,
    nodes: Vec<Node>,
    root: NodeId,
    focused: Option<NodeId>,
    events: Vec<DispatchedEvent>,
}

impl Document {
    pub fn new(url: &str, width: f64, height: f64) -> Self {
        let mut root = Node::new("html");
        root.rect = Rect::new(0.0, 0.0, width, height);
        Self {
            url: url.to_string(),
            viewport: Rect::new(0.0, 0.0, width, height),
            nodes: vec![root],
            root: NodeId(0),
            focused: None,
            events: vec![],
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Node::new(tag));
        NodeId(self.nodes.len() - 1)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Attach (or return the existing) shadow root of `host`.
    pub fn attach_shadow(&mut self, host: NodeId) -> NodeId {
        if let Some(existing) = self.nodes[host.0].shadow_root {
            return existing;
        }
        let shadow = self.create_element(SHADOW_ROOT_TAG);
        self.nodes[shadow.0].host = Some(host);
        self.nodes[host.0].shadow_root = Some(shadow);
        shadow
    }

    /// Give a frame element its own nested document.
    pub fn attach_frame(&mut self, element: NodeId, url: &str) -> NodeId {
        let root = self.create_element(FRAME_ROOT_TAG);
        let rect = self.nodes[element.0].rect;
        self.nodes[root.0].rect = Rect::new(0.0, 0.0, rect.width, rect.height);
        self.nodes[root.0].host = Some(element);
        self.nodes[element.0].frame = Some(Frame {
            url: url.to_string(),
            root,
        });
        root
    }

    /// Detach a node (and its subtree) from the page. Returns false if the
    /// node was not attached.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if id == self.root || !self.contains(id) {
            return false;
        }
        self.detach(id);
        if self.focused.is_some_and(|f| !self.contains(f)) {
            self.focused = None;
        }
        true
    }

    /// Remove every child of `parent`, light tree only.
    pub fn clear_children(&mut self, parent: NodeId) {
        let children = std::mem::take(&mut self.nodes[parent.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != id);
        }
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        self.nodes[id.0]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> bool {
        self.nodes[id.0].attrs.remove(name).is_some()
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) {
        self.nodes[id.0].text = Some(text.to_string());
    }

    pub fn focus(&mut self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.focused = Some(id);
        self.events.push(DispatchedEvent {
            target: id,
            kind: EventKind::Focus,
        });
        true
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Record a synthetic event. The hover marker follows mouseover/mouseout.
    pub fn dispatch_event(&mut self, target: NodeId, kind: EventKind) -> bool {
        if !self.contains(target) {
            return false;
        }
        match kind {
            EventKind::MouseOver => self.set_attr(target, HOVER_ATTR, "true"),
            EventKind::MouseOut => {
                self.remove_attr(target, HOVER_ATTR);
            }
            _ => {}
        }
        self.events.push(DispatchedEvent { target, kind });
        true
    }

    pub fn events(&self) -> &[DispatchedEvent] {
        &self.events
    }

    // ------------------------------------------------------------------
    // Tree queries
    // ------------------------------------------------------------------

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn shadow_root(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].shadow_root
    }

    pub fn frame(&self, id: NodeId) -> Option<&Frame> {
        self.nodes[id.0].frame.as_ref()
    }

    pub fn host(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].host
    }

    /// Parent in the composed tree: light parent, else the shadow host or
    /// frame element owning this subtree.
    pub fn composed_parent(&self, id: NodeId) -> Option<NodeId> {
        let node = &self.nodes[id.0];
        node.parent.or(node.host)
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes[id.0].attrs.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.nodes[id.0].attrs.contains_key(name)
    }

    /// True while the node is reachable from the document root.
    pub fn contains(&self, id: NodeId) -> bool {
        if id.0 >= self.nodes.len() {
            return false;
        }
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.composed_parent(current) {
                Some(next) => current = next,
                None => return false,
            }
        }
    }

    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.composed_parent(node);
        }
        false
    }

    pub fn display(&self, id: NodeId) -> Display {
        let node = &self.nodes[id.0];
        node.style
            .display
            .unwrap_or_else(|| Display::default_for(&node.tag))
    }

    /// Attached and without a `display: none` anywhere up the composed tree.
    pub fn is_laid_out(&self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        let mut current = Some(id);
        while let Some(node) = current {
            let tag = self.nodes[node.0].tag.as_str();
            if tag != SHADOW_ROOT_TAG && tag != FRAME_ROOT_TAG && self.display(node) == Display::None {
                return false;
            }
            current = self.composed_parent(node);
        }
        true
    }

    /// Inherited `visibility`: the nearest explicit value wins.
    pub fn is_visibility_hidden(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if let Some(visibility) = self.nodes[node.0].style.visibility {
                return visibility == Visibility::Hidden;
            }
            current = self.composed_parent(node);
        }
        false
    }

    /// Rect in top-level viewport coordinates, translated through any
    /// enclosing frames.
    pub fn abs_rect(&self, id: NodeId) -> Rect {
        let rect = self.nodes[id.0].rect;
        match self.enclosing_frame(id) {
            Some(frame_el) => {
                let origin = self.abs_rect(frame_el);
                rect.translate(origin.x, origin.y)
            }
            None => rect,
        }
    }

    /// The frame element whose nested document holds `id`, if any.
    pub fn enclosing_frame(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            let node = &self.nodes[current.0];
            if let Some(parent) = node.parent {
                current = parent;
                continue;
            }
            let host = node.host?;
            if node.tag == FRAME_ROOT_TAG {
                return Some(host);
            }
            current = host;
        }
    }

    /// Frames are traversable only when they share the top document's origin.
    pub fn is_same_origin_frame(&self, frame_el: NodeId) -> bool {
        let Some(frame) = self.frame(frame_el) else {
            return false;
        };
        match (origin_of(&self.url), origin_of(&frame.url)) {
            (Some(top), Some(inner)) => top == inner,
            _ => false,
        }
    }

    /// Whitespace-normalized text of the node and its light descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut pieces = Vec::new();
        self.collect_text(id, &mut pieces);
        pieces.join(" ")
    }

    fn collect_text(&self, id: NodeId, pieces: &mut Vec<String>) {
        let node = &self.nodes[id.0];
        if let Some(text) = &node.text {
            let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if !normalized.is_empty() {
                pieces.push(normalized);
            }
        }
        for child in &node.children {
            self.collect_text(*child, pieces);
        }
    }

    /// Serialize the light subtree as HTML markup.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id.0];
        out.push('<');
        out.push_str(&node.tag);
        for (name, value) in &node.attrs {
            out.push_str(&format!(" {}=\"{}\"", name, escape_html(value)));
        }
        out.push('>');
        if is_void_element(&node.tag) {
            return;
        }
        if let Some(text) = &node.text {
            out.push_str(&escape_html(text));
        }
        for child in &node.children {
            self.write_html(*child, out);
        }
        out.push_str(&format!("</{}>", node.tag));
    }

    /// Light-tree query the host page would see: does not enter shadow
    /// roots or frames.
    pub fn query_by_attr(&self, name: &str) -> Vec<NodeId> {
        self.light_descendants(self.root)
            .into_iter()
            .filter(|id| self.has_attr(*id, name))
            .collect()
    }

    pub fn query_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.light_descendants(self.root)
            .into_iter()
            .filter(|id| self.nodes[id.0].tag == tag)
            .collect()
    }

    /// `id` followed by its light descendants in document order.
    pub fn light_descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = vec![];
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            for child in self.nodes[node.0].children.iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    /// `id` and everything under it including shadow content and
    /// same-origin frames, in document order.
    pub fn composed_descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = vec![];
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            let n = &self.nodes[node.0];
            for child in n.children.iter().rev() {
                stack.push(*child);
            }
            if let Some(frame) = &n.frame {
                if self.is_same_origin_frame(node) {
                    stack.push(frame.root);
                }
            }
            if let Some(shadow) = n.shadow_root {
                stack.push(shadow);
            }
        }
        out
    }

    /// Topmost laid-out, visible node under `p`: stacking order, then
    /// document order. A node paints inside the stacking contexts of its
    /// z-indexed ancestors, so descendants stay above their container.
    /// Only the part of a node its clipping ancestors let through is hit.
    pub fn element_from_point(&self, p: Point) -> Option<NodeId> {
        self.composed_descendants(self.root)
            .into_iter()
            .enumerate()
            .filter(|(_, id)| {
                let tag = self.nodes[id.0].tag.as_str();
                tag != SHADOW_ROOT_TAG && tag != FRAME_ROOT_TAG
            })
            .filter(|(_, id)| self.clipped_rect(*id).is_some_and(|r| r.contains_point(p)))
            .filter(|(_, id)| self.is_laid_out(*id) && !self.is_visibility_hidden(*id))
            .max_by_key(|(order, id)| (self.stacking_key(*id), *order))
            .map(|(_, id)| id)
    }

    /// Non-zero z-indices from the outermost stacking context down to `id`,
    /// closed by the layer the node itself paints on: `i32::MIN` when it
    /// opens its own context (its background sits under everything inside
    /// it), 0 otherwise.
    ///
    /// Compared lexicographically: a link inside a z-10 header (`[10, 0]`)
    /// beats both the header (`[10, MIN]`) and page content (`[0]`).
    pub fn stacking_key(&self, id: NodeId) -> Vec<i32> {
        let own_layer = if self.nodes[id.0].style.z_index != 0 { i32::MIN } else { 0 };
        let mut key = vec![own_layer];
        let mut current = Some(id);
        while let Some(node) = current {
            let z = self.nodes[node.0].style.z_index;
            if z != 0 {
                key.push(z);
            }
            current = self.composed_parent(node);
        }
        key.reverse();
        key
    }

    /// Absolute rect of `id` cut down to what its clipping ancestors let
    /// through: scroll containers (`overflow-y` other than visible) and
    /// frame elements. `html` and `body` scroll the page and do not clip.
    /// `None` when nothing is left.
    pub fn clipped_rect(&self, id: NodeId) -> Option<Rect> {
        let mut rect = self.abs_rect(id);
        if rect.is_empty() {
            return None;
        }
        let mut current = self.composed_parent(id);
        while let Some(node) = current {
            let n = &self.nodes[node.0];
            let page_scroller = matches!(n.tag.as_str(), "html" | "body");
            if !page_scroller && (n.style.overflow_y != Overflow::Visible || n.frame.is_some()) {
                rect = rect.intersection(&self.abs_rect(node))?;
            }
            current = self.composed_parent(node);
        }
        Some(rect)
    }

    /// Stable structural path from the root, e.g. `html>body:0>a:3`.
    pub fn node_path(&self, id: NodeId) -> String {
        let mut segments = vec![];
        let mut current = id;
        loop {
            let node = &self.nodes[current.0];
            if let Some(parent) = node.parent {
                let index = self.nodes[parent.0]
                    .children
                    .iter()
                    .position(|c| *c == current)
                    .unwrap_or(0);
                segments.push(format!("{}:{}", node.tag, index));
                current = parent;
            } else if let Some(host) = node.host {
                segments.push(node.tag.clone());
                current = host;
            } else {
                segments.push(node.tag.clone());
                break;
            }
        }
        segments.reverse();
        segments.join(">")
    }
}

/// ASCII origin of a URL; opaque origins (file:, data:) are never equal.
pub fn origin_of(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let origin = parsed.origin();
    if origin.is_tuple() {
        Some(origin.ascii_serialization())
    } else {
        None
    }
}

fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "input" | "img" | "br" | "hr" | "meta" | "link" | "area" | "source" | "wbr"
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
