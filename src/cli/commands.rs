use crate::assistant::ollama::{AssistantBackend, MockAssistant, OllamaAssistant};
use crate::browser::tabs::TabStrip;
use crate::cli::config::AppConfig;
use crate::dom::dom_model::Document;
use crate::dom::snapshot::load_page;
use crate::engine::engine::{HintEngine, InvokeReport, KeyOutcome};
use crate::engine::keys::{InputEvent, parse_key_script};
use crate::hints::dispatch::BrowserSurface;
use crate::hints::hint_model::{Hint, Payload};
use crate::hints::mode::HintMode;
use crate::hints::overlay::overlay_node_count;
use crate::trace::logger::TraceLogger;

// ============================================================================
// scan subcommand
// ============================================================================

pub fn cmd_scan(
    page: &str,
    mode_name: &str,
    config: &AppConfig,
    tracer: TraceLogger,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let mode: HintMode = mode_name.parse()?;
    let mut doc = load_page(page)?;
    let mut engine = HintEngine::new(config.hints.clone())?.with_tracer(tracer);

    if verbose > 0 {
        eprintln!("Scanning {} ({}) in mode {}...", page, doc.url(), mode);
    }

    let report = engine.invoke(&mut doc, mode);
    print!("{}", format_invoke_report(&report));
    print!("{}", format_hint_table(engine.hints(), &doc));

    engine.cancel(&mut doc);
    Ok(())
}

// ============================================================================
// run subcommand
// ============================================================================

pub fn cmd_run(
    page: &str,
    mode_name: &str,
    keys: &str,
    assistant_name: &str,
    config: &AppConfig,
    tracer: TraceLogger,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let mode: HintMode = mode_name.parse()?;
    let events = parse_key_script(keys)?;
    let assistant = build_assistant(
        assistant_name,
        config.assistant.endpoint.as_deref(),
        config.assistant.model.as_deref(),
    )?;
    let mut doc = load_page(page)?;
    let mut engine = HintEngine::new(config.hints.clone())?.with_tracer(tracer);
    let mut tabs = TabStrip::new(doc.url());

    let report = engine.invoke(&mut doc, mode);
    print!("{}", format_invoke_report(&report));
    if verbose > 1 {
        print!("{}", format_hint_table(engine.hints(), &doc));
    }

    for (event, outcome) in replay(&mut engine, &mut doc, &mut tabs, &events) {
        println!("{:<10} -> {}", format_event(&event), format_outcome(&outcome));
    }

    println!("Tabs:");
    for tab in tabs.tabs() {
        let marker = if tab.id == tabs.active_tab().id { "*" } else { " " };
        println!("  {} [{}] {}", marker, tab.id, tab.url);
    }
    if let Some(text) = tabs.clipboard() {
        println!("Clipboard: {}", text);
    }
    for content in tabs.discussions() {
        match assistant.discuss(content) {
            Ok(reply) => println!("Assistant: {}", reply),
            Err(e) => eprintln!("Warning: {}", e),
        }
    }
    println!("Overlay nodes left: {}", overlay_node_count(&doc));

    Ok(())
}

/// Feed a parsed key script to the engine, pairing each input with its outcome.
pub fn replay(
    engine: &mut HintEngine,
    doc: &mut Document,
    surface: &mut dyn BrowserSurface,
    events: &[InputEvent],
) -> Vec<(InputEvent, KeyOutcome)> {
    events
        .iter()
        .map(|event| {
            let outcome = match event {
                InputEvent::Key(key) => engine.handle_key(doc, key, surface),
                InputEvent::Blur => {
                    if engine.blur(doc) {
                        KeyOutcome::Cancelled
                    } else {
                        KeyOutcome::PassThrough
                    }
                }
            };
            (event.clone(), outcome)
        })
        .collect()
}

// ============================================================================
// modes subcommand
// ============================================================================

pub fn cmd_modes() {
    for mode in HintMode::ALL {
        println!("{:<22} {:?}", mode.name(), mode.action());
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Build the assistant backend for the discuss action.
pub fn build_assistant(
    name: &str,
    endpoint: Option<&str>,
    model: Option<&str>,
) -> Result<Box<dyn AssistantBackend>, Box<dyn std::error::Error>> {
    match name {
        "mock" => Ok(Box::new(MockAssistant)),
        "ollama" => {
            let defaults = OllamaAssistant::default();
            Ok(Box::new(OllamaAssistant::new(
                endpoint.unwrap_or(&defaults.endpoint),
                model.unwrap_or(&defaults.model),
            )))
        }
        other => Err(format!("Unknown assistant '{}' (expected mock or ollama)", other).into()),
    }
}

pub fn format_invoke_report(report: &InvokeReport) -> String {
    let mut out = format!(
        "Session {} [{}]: {} hints ({} scanned",
        report.session, report.mode, report.hints, report.scanned
    );
    if report.truncated > 0 {
        out.push_str(&format!(", {} truncated", report.truncated));
    }
    out.push_str(&format!(")\nFingerprint: {}\n", report.fingerprint));
    out
}

/// One row per hint: label, tag, anchor and payload.
pub fn format_hint_table(hints: &[Hint], doc: &Document) -> String {
    let mut out = String::new();
    for hint in hints {
        let candidate = &hint.candidate;
        let payload = match &candidate.payload {
            Payload::None => String::new(),
            Payload::Link { url } => url.clone(),
            Payload::Scroll { overflow } => format!("overflow {}px", overflow),
            Payload::Pointer => "pointer".to_string(),
            Payload::Region { area } => format!("area {}px²", area),
        };
        out.push_str(&format!(
            "  {:<4} {:<10} ({:>6.0},{:>6.0})  {}\n",
            hint.label.as_str(),
            doc.node(candidate.node).tag,
            candidate.anchor.x,
            candidate.anchor.y,
            payload
        ));
    }
    out
}

fn format_event(event: &InputEvent) -> String {
    match event {
        InputEvent::Key(key) => format!("{:?}", key),
        InputEvent::Blur => "Blur".to_string(),
    }
}

pub fn format_outcome(outcome: &KeyOutcome) -> String {
    match outcome {
        KeyOutcome::PassThrough => "pass through".to_string(),
        KeyOutcome::Narrowed { remaining } => format!("{} hints left", remaining),
        KeyOutcome::Rejected => "rejected".to_string(),
        KeyOutcome::MenuOpened { label } => format!("menu for {}", label),
        KeyOutcome::Dispatched { action, result } => format!("{:?}: {:?}", action, result),
        KeyOutcome::Cancelled => "cancelled".to_string(),
    }
}
