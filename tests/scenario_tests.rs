use hint_engine::{
    browser::tabs::TabStrip,
    dom::{
        dom_model::{EventKind, HOVER_ATTR},
        snapshot::DomNode,
    },
    engine::{
        engine::{EngineState, HintEngine, KeyOutcome},
        keys::Key,
    },
    hints::{
        dispatch::{Action, ActionOutcome},
        hint_model::{HintConfig, RegionalKeys},
        mode::{HintMode, Placement},
        overlay::{overlay_node_count, rendered_labels, rendered_menu_keys, rendered_region_count},
    },
};

use crate::common::pages::{PAGE_URL, by_id, hover_page, link_page, page, regions_page};

mod common;

fn engine() -> HintEngine {
    HintEngine::new(HintConfig::default()).unwrap()
}

fn type_keys(engine: &mut HintEngine, doc: &mut hint_engine::dom::dom_model::Document, tabs: &mut TabStrip, keys: &str) -> KeyOutcome {
    let mut last = KeyOutcome::PassThrough;
    for c in keys.chars() {
        last = engine.handle_key(doc, &Key::Char(c), tabs);
    }
    last
}

// =========================================================================
// Following links
// =========================================================================

#[test]
fn forty_five_links_open_in_a_new_foreground_tab() {
    let mut doc = link_page(45);
    let mut engine = engine();
    let mut tabs = TabStrip::new(PAGE_URL);

    engine.invoke(&mut doc, HintMode::OpenLink(Placement::ForegroundTab));
    let labels: Vec<String> = engine.hints().iter().map(|h| h.label.to_string()).collect();
    assert_eq!(labels.len(), 45);
    assert_eq!(labels.first().map(String::as_str), Some("B"));
    assert_eq!(labels[24], "Z");
    assert_eq!(labels[25], "AA");
    assert_eq!(labels.last().map(String::as_str), Some("AT"));

    let outcome = type_keys(&mut engine, &mut doc, &mut tabs, "b");
    assert!(matches!(
        outcome,
        KeyOutcome::Dispatched {
            action: Action::OpenUrl(Placement::ForegroundTab),
            ..
        }
    ));
    assert_eq!(tabs.tabs().len(), 2);
    assert_eq!(tabs.active_tab().url, "https://example.com/articles/0");
    assert_ne!(tabs.active_tab().url, PAGE_URL);
    assert_eq!(overlay_node_count(&doc), 0);
}

#[test]
fn background_tab_keeps_the_current_tab_active() {
    let mut doc = link_page(45);
    let mut engine = engine();
    let mut tabs = TabStrip::new(PAGE_URL);

    engine.invoke(&mut doc, HintMode::OpenLink(Placement::BackgroundTab));
    type_keys(&mut engine, &mut doc, &mut tabs, "AC");

    assert_eq!(tabs.tabs().len(), 2);
    assert_eq!(tabs.active_tab().url, PAGE_URL);
    assert_eq!(tabs.tabs()[1].url, "https://example.com/articles/27");
}

#[test]
fn links_inside_shadow_roots_and_same_origin_frames_are_followable() {
    let mut doc = page(
        DomNode::new("body")
            .child(
                DomNode::new("nav-bar")
                    .rect(0.0, 0.0, 800.0, 40.0)
                    .shadow_child(DomNode::new("a").attr("href", "/from-shadow").rect(10.0, 10.0, 80.0, 18.0)),
            )
            .child(
                DomNode::new("iframe").rect(0.0, 100.0, 600.0, 300.0).frame(
                    "https://example.com/widgets/panel.html",
                    vec![DomNode::new("a").attr("href", "details").rect(10.0, 10.0, 80.0, 18.0)],
                ),
            ),
    );
    let mut engine = engine();
    let mut tabs = TabStrip::new(PAGE_URL);

    let report = engine.invoke(&mut doc, HintMode::OpenLink(Placement::CurrentTab));
    assert_eq!(report.hints, 2);

    type_keys(&mut engine, &mut doc, &mut tabs, "B");
    assert_eq!(tabs.active_tab().url, "https://example.com/widgets/details");
}

// =========================================================================
// Hover
// =========================================================================

#[test]
fn mouseout_clears_a_previous_mouseover() {
    let mut doc = hover_page();
    let mut engine = engine();
    let mut tabs = TabStrip::new(PAGE_URL);
    let item = by_id(&doc, "item-1");

    engine.invoke(&mut doc, HintMode::Mouseover);
    assert_eq!(engine.hints().len(), 3);
    let outcome = type_keys(&mut engine, &mut doc, &mut tabs, "B");
    assert_eq!(
        outcome,
        KeyOutcome::Dispatched {
            action: Action::MouseOver,
            result: ActionOutcome::MouseOver { node: item },
        }
    );
    assert!(doc.has_attr(item, HOVER_ATTR));

    engine.invoke(&mut doc, HintMode::Mouseout);
    type_keys(&mut engine, &mut doc, &mut tabs, "B");
    assert!(!doc.has_attr(item, HOVER_ATTR));

    let kinds: Vec<_> = doc.events().iter().map(|e| (e.target, e.kind)).collect();
    assert_eq!(kinds, vec![(item, EventKind::MouseOver), (item, EventKind::MouseOut)]);
}

#[test]
fn mouseout_is_sent_even_without_a_prior_hover() {
    let mut doc = hover_page();
    let mut engine = engine();
    let mut tabs = TabStrip::new(PAGE_URL);

    engine.invoke(&mut doc, HintMode::Mouseout);
    let outcome = type_keys(&mut engine, &mut doc, &mut tabs, "C");
    assert!(matches!(
        outcome,
        KeyOutcome::Dispatched {
            result: ActionOutcome::MouseOut { .. },
            ..
        }
    ));
    assert_eq!(doc.events().len(), 1);
}

// =========================================================================
// Regional hints
// =========================================================================

#[test]
fn regional_hints_open_a_menu_and_escape_leaves_the_page_alone() {
    let mut doc = regions_page(12);
    let mut engine = engine();
    let mut tabs = TabStrip::new(PAGE_URL);

    let report = engine.invoke(&mut doc, HintMode::Regional);
    assert!(report.hints > 0 && report.hints <= 30);
    assert_eq!(report.hints, 12);
    assert_eq!(rendered_region_count(&doc), 12);

    let target = engine.hints()[0].candidate.node;
    let outcome = type_keys(&mut engine, &mut doc, &mut tabs, "a");
    assert_eq!(outcome, KeyOutcome::MenuOpened { label: "A".into() });
    assert_eq!(engine.state(), EngineState::Menu { label: "A".into() });
    assert_eq!(rendered_menu_keys(&doc), vec!["t", "h", "d", "l"]);
    assert!(rendered_labels(&doc).is_empty());

    assert_eq!(engine.handle_key(&mut doc, &Key::Char('x'), &mut tabs), KeyOutcome::Rejected);
    assert_eq!(engine.handle_key(&mut doc, &Key::Backspace, &mut tabs), KeyOutcome::Rejected);
    assert_eq!(engine.state(), EngineState::Menu { label: "A".into() });

    assert_eq!(engine.handle_key(&mut doc, &Key::Escape, &mut tabs), KeyOutcome::Cancelled);
    assert!(doc.contains(target), "region must survive cancellation");
    assert_eq!(overlay_node_count(&doc), 0);
    assert!(tabs.clipboard().is_none());
}

#[test]
fn regional_copy_text_and_html() {
    let mut doc = regions_page(12);
    let mut engine = engine();
    let mut tabs = TabStrip::new(PAGE_URL);

    engine.invoke(&mut doc, HintMode::Regional);
    let outcome = type_keys(&mut engine, &mut doc, &mut tabs, "At");
    assert_eq!(
        outcome,
        KeyOutcome::Dispatched {
            action: Action::CopyText,
            result: ActionOutcome::Copied {
                content: "Region 0".into()
            },
        }
    );
    assert_eq!(tabs.clipboard(), Some("Region 0"));
    assert_eq!(overlay_node_count(&doc), 0);

    engine.invoke(&mut doc, HintMode::Regional);
    type_keys(&mut engine, &mut doc, &mut tabs, "BH");
    assert_eq!(
        tabs.clipboard(),
        Some("<section class=\"region\"><p>Region 1</p></section>"),
        "menu keys are case-insensitive"
    );
}

#[test]
fn regional_delete_removes_the_region() {
    let mut doc = regions_page(12);
    let mut engine = engine();
    let mut tabs = TabStrip::new(PAGE_URL);

    engine.invoke(&mut doc, HintMode::Regional);
    let target = engine.hints()[2].candidate.node;
    let outcome = type_keys(&mut engine, &mut doc, &mut tabs, "Cd");
    assert_eq!(
        outcome,
        KeyOutcome::Dispatched {
            action: Action::Delete,
            result: ActionOutcome::Deleted { node: target },
        }
    );
    assert!(!doc.contains(target));

    let report = engine.invoke(&mut doc, HintMode::Regional);
    assert_eq!(report.hints, 11);
}

#[test]
fn regional_discuss_queues_the_region_text() {
    let mut doc = regions_page(12);
    let mut engine = engine();
    let mut tabs = TabStrip::new(PAGE_URL);

    engine.invoke(&mut doc, HintMode::Regional);
    type_keys(&mut engine, &mut doc, &mut tabs, "El");
    assert_eq!(tabs.discussions(), ["Region 4".to_string()]);
}

#[test]
fn regional_keys_can_be_remapped() {
    let config = HintConfig {
        regional: RegionalKeys {
            copy_text: 'y',
            copy_html: 'Y',
            delete: 'x',
            discuss: '?',
        },
        ..HintConfig::default()
    };
    assert!(HintEngine::new(config).is_err(), "y and Y collide case-insensitively");

    let config = HintConfig {
        regional: RegionalKeys {
            copy_text: 'y',
            copy_html: 'm',
            delete: 'x',
            discuss: '?',
        },
        ..HintConfig::default()
    };
    let mut doc = regions_page(2);
    let mut engine = HintEngine::new(config).unwrap();
    let mut tabs = TabStrip::new(PAGE_URL);

    engine.invoke(&mut doc, HintMode::Regional);
    type_keys(&mut engine, &mut doc, &mut tabs, "A");
    assert_eq!(rendered_menu_keys(&doc), vec!["y", "m", "x", "?"]);
    type_keys(&mut engine, &mut doc, &mut tabs, "y");
    assert_eq!(tabs.clipboard(), Some("Region 0"));
}
