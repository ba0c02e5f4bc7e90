use serde::Serialize;

use crate::{
    dom::dom_model::Document,
    engine::{error::HintError, keys::Key},
    hints::{
        dispatch::{Action, ActionOutcome, BrowserSurface, dispatch},
        fingerprint::hint_fingerprint,
        hint_model::{Hint, HintConfig},
        labels::allocate,
        mode::HintMode,
        overlay::Overlay,
        regional::RegionalMenu,
        resolver::{Session, Stage, Step},
        scanner::scan,
        visibility::filter_visible,
    },
    trace::{logger::TraceLogger, trace::TraceEvent},
};

/// Coarse engine state, for callers and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Active { prefix: String },
    Menu { label: String },
}

/// Summary of a mode invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvokeReport {
    pub session: u64,
    pub mode: HintMode,
    /// Matches before the visibility filter.
    pub scanned: usize,
    pub hints: usize,
    /// Visible candidates left without a label by the overflow policy.
    pub truncated: usize,
    /// A previous session was torn down to make room.
    pub replaced_previous: bool,
    pub fingerprint: String,
}

/// What a key did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum KeyOutcome {
    /// No session: the key belongs to the page.
    PassThrough,
    Narrowed { remaining: usize },
    /// The key matched nothing; the session is unchanged.
    Rejected,
    MenuOpened { label: String },
    Dispatched { action: Action, result: ActionOutcome },
    Cancelled,
}

/// Owns the (at most one) live hint session for a page.
///
/// Every call runs to completion synchronously; no work is left pending
/// between key events, so cancelling never has anything to clean up except
/// the overlay.
pub struct HintEngine {
    config: HintConfig,
    menu: RegionalMenu,
    session: Option<Session>,
    next_session: u64,
    tracer: TraceLogger,
}

impl HintEngine {
    pub fn new(config: HintConfig) -> Result<Self, HintError> {
        config.validate()?;
        Ok(Self {
            menu: RegionalMenu::new(config.regional.clone()),
            config,
            session: None,
            next_session: 1,
            tracer: TraceLogger::disabled(),
        })
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn config(&self) -> &HintConfig {
        &self.config
    }

    pub fn menu(&self) -> &RegionalMenu {
        &self.menu
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn state(&self) -> EngineState {
        match &self.session {
            None => EngineState::Idle,
            Some(session) => match session.stage() {
                Stage::Selecting => EngineState::Active {
                    prefix: session.prefix().to_string(),
                },
                Stage::Menu { target } => EngineState::Menu {
                    label: session
                        .hint(target)
                        .map(|h| h.label.to_string())
                        .unwrap_or_default(),
                },
            },
        }
    }

    /// Full hint set of the live session (empty when idle).
    pub fn hints(&self) -> &[Hint] {
        self.session.as_ref().map(Session::hints).unwrap_or(&[])
    }

    /// Hints still matching the typed prefix.
    pub fn visible_hints(&self) -> Vec<&Hint> {
        match &self.session {
            Some(session) if session.stage() == Stage::Selecting => session.matching(),
            _ => vec![],
        }
    }

    /// Start a session for `mode`, replacing any live one.
    ///
    /// A page without candidates still gets a session; it only reacts to
    /// cancellation.
    pub fn invoke(&mut self, doc: &mut Document, mode: HintMode) -> InvokeReport {
        let replaced_previous = self.teardown(doc, "superseded");

        let scanned = scan(doc, mode.predicate(), &self.config.scan);
        let scanned_count = scanned.len();
        let visible = filter_visible(doc, scanned, mode.visibility(&self.config.visibility));

        let allocation = allocate(visible.len(), &self.config.labels);
        let hints: Vec<Hint> = allocation
            .labels
            .into_iter()
            .zip(visible)
            .map(|(label, candidate)| Hint { label, candidate })
            .collect();

        let fingerprint = hint_fingerprint(&hints, doc);
        let id = self.next_session;
        self.next_session += 1;

        let overlay = Overlay::attach(doc);
        let session = Session::new(id, mode, hints, overlay);
        overlay.render_hints(doc, &session.matching(), "", mode.draws_regions());

        let report = InvokeReport {
            session: id,
            mode,
            scanned: scanned_count,
            hints: session.hints().len(),
            truncated: allocation.dropped,
            replaced_previous,
            fingerprint,
        };
        self.tracer.log(
            &TraceEvent::now(id, "invoke")
                .with_mode(mode)
                .with_remaining(report.hints)
                .with_detail(format!(
                    "scanned={} truncated={} fingerprint={}",
                    report.scanned, report.truncated, report.fingerprint
                )),
        );
        self.session = Some(session);
        report
    }

    /// Feed one key to the live session.
    pub fn handle_key(
        &mut self,
        doc: &mut Document,
        key: &Key,
        surface: &mut dyn BrowserSurface,
    ) -> KeyOutcome {
        let Some(session) = self.session.as_ref() else {
            return KeyOutcome::PassThrough;
        };

        if *key == Key::Escape {
            self.teardown(doc, "cancel");
            return KeyOutcome::Cancelled;
        }

        match session.stage() {
            Stage::Selecting => self.select(doc, key, surface),
            Stage::Menu { target } => self.choose(doc, key, target, surface),
        }
    }

    /// The document lost focus: drop the session.
    pub fn blur(&mut self, doc: &mut Document) -> bool {
        self.teardown(doc, "blur")
    }

    /// Cancel from outside the key stream (e.g. navigation away).
    pub fn cancel(&mut self, doc: &mut Document) -> bool {
        self.teardown(doc, "cancel")
    }

    fn select(&mut self, doc: &mut Document, key: &Key, surface: &mut dyn BrowserSurface) -> KeyOutcome {
        let Some(session) = self.session.as_mut() else {
            return KeyOutcome::PassThrough;
        };

        let c = match key {
            Key::Char(c) => c.to_ascii_uppercase(),
            Key::Backspace => {
                let Some(remaining) = session.backspace() else {
                    return KeyOutcome::Rejected;
                };
                session
                    .overlay()
                    .render_hints(doc, &session.matching(), session.prefix(), session.mode.draws_regions());
                self.tracer.log(
                    &TraceEvent::now(session.id, "backspace")
                        .with_prefix(session.prefix())
                        .with_remaining(remaining),
                );
                return KeyOutcome::Narrowed { remaining };
            }
            _ => return KeyOutcome::Rejected,
        };

        if !self.config.labels.alphabet.contains(c) {
            self.tracer.log(&TraceEvent::now(session.id, "reject").with_detail(c));
            return KeyOutcome::Rejected;
        }

        match session.type_char(c) {
            Step::Rejected => {
                self.tracer.log(
                    &TraceEvent::now(session.id, "reject")
                        .with_prefix(session.prefix())
                        .with_detail(c),
                );
                KeyOutcome::Rejected
            }
            Step::Narrowed { remaining } => {
                session
                    .overlay()
                    .render_hints(doc, &session.matching(), session.prefix(), session.mode.draws_regions());
                self.tracer.log(
                    &TraceEvent::now(session.id, "narrow")
                        .with_prefix(session.prefix())
                        .with_remaining(remaining),
                );
                KeyOutcome::Narrowed { remaining }
            }
            Step::Resolved(index) => self.resolve(doc, index, surface),
        }
    }

    fn resolve(&mut self, doc: &mut Document, index: usize, surface: &mut dyn BrowserSurface) -> KeyOutcome {
        let Some(session) = self.session.as_mut() else {
            return KeyOutcome::PassThrough;
        };
        let Some(hint) = session.hint(index).cloned() else {
            return KeyOutcome::Rejected;
        };
        self.tracer
            .log(&TraceEvent::now(session.id, "resolve").with_label(&hint.label));

        match Action::from_descriptor(session.mode.action()) {
            Some(action) => self.finish(doc, &hint, action, surface),
            None => {
                session.open_menu(index);
                session.overlay().render_menu(doc, &hint, &self.menu.items());
                self.tracer
                    .log(&TraceEvent::now(session.id, "menu").with_label(&hint.label));
                KeyOutcome::MenuOpened {
                    label: hint.label.to_string(),
                }
            }
        }
    }

    fn choose(
        &mut self,
        doc: &mut Document,
        key: &Key,
        target: usize,
        surface: &mut dyn BrowserSurface,
    ) -> KeyOutcome {
        let Some(session) = self.session.as_ref() else {
            return KeyOutcome::PassThrough;
        };
        let Some(hint) = session.hint(target).cloned() else {
            return KeyOutcome::Rejected;
        };

        let choice = match key {
            Key::Char(c) => self.menu.choice_for(*c),
            _ => None,
        };
        match choice {
            Some(choice) => {
                self.tracer.log(
                    &TraceEvent::now(session.id, "menu_choice")
                        .with_label(&hint.label)
                        .with_detail(choice.title()),
                );
                self.finish(doc, &hint, choice.action(), surface)
            }
            None => KeyOutcome::Rejected,
        }
    }

    /// Run the terminal action, then tear the session down whatever happened.
    fn finish(
        &mut self,
        doc: &mut Document,
        hint: &Hint,
        action: Action,
        surface: &mut dyn BrowserSurface,
    ) -> KeyOutcome {
        let result = dispatch(doc, &hint.candidate, action, surface);
        if let Some(session) = &self.session {
            let event = if result.succeeded() { "dispatch" } else { "dispatch_failed" };
            self.tracer.log(
                &TraceEvent::now(session.id, event)
                    .with_label(&hint.label)
                    .with_detail(format!("{:?}", result)),
            );
        }
        self.teardown(doc, "done");
        KeyOutcome::Dispatched { action, result }
    }

    /// Remove the overlay and forget the session. Returns whether one existed.
    fn teardown(&mut self, doc: &mut Document, reason: &str) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        self.tracer
            .log(&TraceEvent::now(session.id, "teardown").with_detail(reason));
        session.into_overlay().teardown(doc);
        true
    }
}
