use clap::Parser;
use hint_engine::assistant::ollama::OllamaAssistant;
use hint_engine::{
    browser::tabs::TabStrip,
    cli::{
        commands::{build_assistant, format_invoke_report, format_outcome, replay},
        config::{AppConfig, Cli, Commands, load_config, try_load_config},
    },
    dom::snapshot::{load_page, parse_page},
    engine::{
        engine::{HintEngine, KeyOutcome},
        error::HintError,
        keys::{InputEvent, parse_key_script},
    },
    hints::{
        hint_model::{OverflowPolicy, ViewportPolicy},
        mode::{HintMode, Placement},
        overlay::overlay_node_count,
    },
};

use crate::common::pages::fixture;

mod common;

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_scan_defaults() {
    let cli = Cli::parse_from(["hint-engine", "scan", "--page", "page.json"]);
    match cli.command {
        Commands::Scan { page, mode } => {
            assert_eq!(page, "page.json");
            assert_eq!(mode, "open-link");
        }
        _ => panic!("Expected Scan command"),
    }
    assert_eq!(cli.verbose, 0);
    assert!(cli.config.is_none());
}

#[test]
fn cli_parse_run_all_args() {
    let cli = Cli::parse_from([
        "hint-engine",
        "-vv",
        "run",
        "--page",
        "p.json",
        "--mode",
        "regional",
        "--keys",
        "a<Esc>",
        "--assistant",
        "ollama",
        "--trace",
        "trace.jsonl",
        "--assistant-model",
        "llama3",
    ]);
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.trace.as_deref(), Some("trace.jsonl"));
    assert_eq!(cli.assistant_model.as_deref(), Some("llama3"));
    match cli.command {
        Commands::Run {
            page,
            mode,
            keys,
            assistant,
        } => {
            assert_eq!(page, "p.json");
            assert_eq!(mode, "regional");
            assert_eq!(keys, "a<Esc>");
            assert_eq!(assistant, "ollama");
        }
        _ => panic!("Expected Run command"),
    }
}

#[test]
fn cli_parse_modes() {
    let cli = Cli::parse_from(["hint-engine", "modes"]);
    assert!(matches!(cli.command, Commands::Modes));
}

#[test]
fn cli_rejects_run_without_keys() {
    let result = Cli::try_parse_from(["hint-engine", "run", "--page", "p.json"]);
    assert!(result.is_err());
}

// ============================================================================
// Mode names
// ============================================================================

#[test]
fn every_mode_name_round_trips() {
    for mode in HintMode::ALL {
        let parsed: HintMode = mode.name().parse().unwrap();
        assert_eq!(parsed, mode);
    }
    assert_eq!(
        " Open-Link-Background ".parse::<HintMode>().unwrap(),
        HintMode::OpenLink(Placement::BackgroundTab)
    );
    assert!(matches!(
        "teleport".parse::<HintMode>(),
        Err(HintError::UnknownMode(m)) if m == "teleport"
    ));
}

// ============================================================================
// Config File Tests
// ============================================================================

#[test]
fn config_defaults_when_file_missing() {
    let config = load_config(Some("/nonexistent/hint-engine.yaml"));
    assert_eq!(config.hints.labels.alphabet, "ABCDEFGHIJKLMNOPQRSTUVWXYZ");
    assert_eq!(config.hints.labels.max_length, 3);
    assert!(config.trace.path.is_none());
    assert!(matches!(try_load_config("/nonexistent/hint-engine.yaml"), Ok(None)));
}

#[test]
fn config_loads_partial_yaml() {
    let dir = std::env::temp_dir().join("hint_engine_cli_config_test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("hint-engine.yaml");
    std::fs::write(
        &path,
        "hints:\n  labels:\n    alphabet: ASDFJKL\n    overflow: extend\n  visibility:\n    links:\n      viewport: anywhere\n  regional:\n    delete: x\ntrace:\n  path: /tmp/hints.jsonl\nassistant:\n  model: llama3\n",
    )
    .unwrap();

    let config = load_config(Some(path.to_str().unwrap()));
    assert_eq!(config.hints.labels.alphabet, "ASDFJKL");
    assert_eq!(config.hints.labels.max_length, 3, "unset fields keep defaults");
    assert_eq!(config.hints.labels.overflow, OverflowPolicy::Extend);
    assert_eq!(config.hints.visibility.links.viewport, ViewportPolicy::Anywhere);
    assert!(!config.hints.visibility.links.check_occlusion);
    assert_eq!(config.hints.regional.delete, 'x');
    assert_eq!(config.hints.regional.copy_text, 't');
    assert_eq!(config.trace.path.as_deref(), Some("/tmp/hints.jsonl"));
    assert_eq!(config.assistant.model.as_deref(), Some("llama3"));
    assert!(config.assistant.endpoint.is_none());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn malformed_yaml_is_an_error_but_load_falls_back() {
    let dir = std::env::temp_dir().join("hint_engine_cli_bad_config_test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("hint-engine.yaml");
    std::fs::write(&path, "hints: [not, a, map\n").unwrap();
    let path_str = path.to_str().unwrap();

    assert!(matches!(try_load_config(path_str), Err(HintError::YamlParse { .. })));
    let config = load_config(Some(path_str));
    assert_eq!(config.hints, AppConfig::default().hints);

    std::fs::remove_dir_all(&dir).ok();
}

// ============================================================================
// Snapshot loading
// ============================================================================

#[test]
fn fixture_page_loads() {
    let doc = load_page(&fixture("links_page.json")).unwrap();
    assert_eq!(doc.url(), "https://news.example.com/front");
    assert_eq!(doc.viewport().width, 1024.0);
    assert_eq!(doc.query_by_tag("a").len(), 3, "shadow content is not in the light tree");
}

#[test]
fn snapshot_errors_carry_context() {
    assert!(matches!(
        load_page("/nonexistent/page.json"),
        Err(HintError::SnapshotIo { .. })
    ));
    let err = parse_page("{ not json").unwrap_err();
    assert!(matches!(err, HintError::JsonParse { .. }));
    assert!(err.to_string().contains("page snapshot"));
}

// ============================================================================
// Replay
// ============================================================================

#[test]
fn replay_follows_a_link_from_the_fixture() {
    let mut doc = load_page(&fixture("links_page.json")).unwrap();
    let mut engine = HintEngine::new(AppConfig::default().hints).unwrap();
    let mut tabs = TabStrip::new(doc.url());

    let report = engine.invoke(&mut doc, HintMode::OpenLink(Placement::CurrentTab));
    assert_eq!(report.hints, 3, "two headlines plus the footer link");
    assert!(format_invoke_report(&report).contains("3 hints"));

    let events = parse_key_script("x<BS>b").unwrap();
    let steps = replay(&mut engine, &mut doc, &mut tabs, &events);
    let outcomes: Vec<_> = steps.iter().map(|(_, o)| format_outcome(o)).collect();
    assert_eq!(outcomes[0], "rejected");
    assert_eq!(outcomes[1], "rejected");
    assert!(outcomes[2].starts_with("OpenUrl"));
    assert_eq!(tabs.active_tab().url, "https://news.example.com/story/2");
    assert_eq!(overlay_node_count(&doc), 0);
}

#[test]
fn replay_blur_cancels_then_passes_through() {
    let mut doc = load_page(&fixture("links_page.json")).unwrap();
    let mut engine = HintEngine::new(AppConfig::default().hints).unwrap();
    let mut tabs = TabStrip::new(doc.url());

    engine.invoke(&mut doc, HintMode::Scrollable);
    let events = parse_key_script("<Blur>a").unwrap();
    let steps = replay(&mut engine, &mut doc, &mut tabs, &events);
    assert_eq!(steps[0], (InputEvent::Blur, KeyOutcome::Cancelled));
    assert_eq!(steps[1].1, KeyOutcome::PassThrough);
}

#[test]
fn assistant_backends_by_name() {
    let mock = build_assistant("mock", None, None).unwrap();
    assert!(mock.discuss("Region 0").unwrap().contains("Region 0"));
    assert!(build_assistant("ollama", Some("http://localhost:1/api/generate"), None).is_ok());
    assert!(build_assistant("gpt", None, None).is_err());
}

#[test]
fn ollama_prompt_truncates_long_regions() {
    let assistant = OllamaAssistant::default();
    let long = "x".repeat(10_000);
    let prompt = assistant.build_prompt(&long);
    assert!(prompt.contains(&"x".repeat(4000)));
    assert!(!prompt.contains(&"x".repeat(4001)));
    assert_eq!(assistant.model, "qwen2.5:1.5b");
}
