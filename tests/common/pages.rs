use hint_engine::dom::{
    dom_model::{Document, NodeId},
    snapshot::{DomNode, PageSnapshot},
};

pub const PAGE_URL: &str = "https://example.com/index.html";

/// Wrap `body` in an `<html>` root and build the document (1280x800 viewport).
pub fn page(body: DomNode) -> Document {
    PageSnapshot::new(PAGE_URL, 1280.0, 800.0, DomNode::new("html").child(body)).into_document()
}

/// `count` links in rows of five, all on screen.
pub fn link_page(count: usize) -> Document {
    let links = (0..count).map(|i| {
        DomNode::new("a")
            .attr("href", &format!("/articles/{}", i))
            .text(&format!("Article {}", i))
            .rect(10.0 + (i % 5) as f64 * 200.0, 10.0 + (i / 5) as f64 * 30.0, 120.0, 18.0)
    });
    page(DomNode::new("body").children(links))
}

/// `count` large sections in rows of four, each with a paragraph.
pub fn regions_page(count: usize) -> Document {
    let sections = (0..count).map(|i| {
        let x = (i % 4) as f64 * 310.0;
        let y = (i / 4) as f64 * 160.0;
        DomNode::new("section")
            .attr("class", "region")
            .rect(x, y, 300.0, 150.0)
            .child(
                DomNode::new("p")
                    .text(&format!("Region {}", i))
                    .rect(x + 10.0, y + 10.0, 280.0, 20.0),
            )
    });
    page(DomNode::new("body").children(sections))
}

/// Three menu items reacting to hover.
pub fn hover_page() -> Document {
    let items = (0..3).map(|i| {
        DomNode::new("li")
            .attr("id", &format!("item-{}", i))
            .text(&format!("Menu {}", i))
            .rect(10.0, 10.0 + i as f64 * 40.0, 150.0, 30.0)
            .listener("mouseover")
            .listener("mouseout")
    });
    page(DomNode::new("body").child(DomNode::new("ul").children(items)))
}

/// First node carrying `id="<id>"`, searched through shadow roots and frames.
pub fn by_id(doc: &Document, id: &str) -> NodeId {
    doc.composed_descendants(doc.root())
        .into_iter()
        .find(|n| doc.attr(*n, "id") == Some(id))
        .unwrap_or_else(|| panic!("no element with id {}", id))
}

/// Path of a JSON fixture under tests/fixtures.
pub fn fixture(name: &str) -> String {
    let base = std::env::current_dir().unwrap();
    base.join("tests")
        .join("fixtures")
        .join(name)
        .display()
        .to_string()
}
