//! Keyboard hints for web pages.
//!
//! A hint session scans a [`dom::dom_model::Document`] for elements matching a
//! mode, labels them with short prefix-free codes, paints the labels into an
//! isolated overlay and resolves typed characters to one element, which then
//! gets clicked, followed, hovered, scrolled to, or (in regional mode) handed
//! to a follow-up menu.
//!
//! ```
//! use hint_engine::browser::tabs::TabStrip;
//! use hint_engine::dom::snapshot::{DomNode, PageSnapshot};
//! use hint_engine::engine::engine::{HintEngine, KeyOutcome};
//! use hint_engine::engine::keys::Key;
//! use hint_engine::hints::hint_model::HintConfig;
//! use hint_engine::hints::mode::{HintMode, Placement};
//!
//! let body = DomNode::new("body").child(
//!     DomNode::new("a").attr("href", "/next").text("Next").rect(10.0, 10.0, 40.0, 16.0),
//! );
//! let mut doc = PageSnapshot::new("https://example.com/", 800.0, 600.0, DomNode::new("html").child(body))
//!     .into_document();
//! let mut tabs = TabStrip::new(doc.url());
//! let mut engine = HintEngine::new(HintConfig::default()).unwrap();
//!
//! engine.invoke(&mut doc, HintMode::OpenLink(Placement::ForegroundTab));
//! let outcome = engine.handle_key(&mut doc, &Key::Char('a'), &mut tabs);
//! assert!(matches!(outcome, KeyOutcome::Dispatched { .. }));
//! assert_eq!(tabs.active_tab().url, "https://example.com/next");
//! ```

pub mod assistant;
pub mod browser;
pub mod cli;
pub mod dom;
pub mod engine;
pub mod hints;
pub mod trace;
