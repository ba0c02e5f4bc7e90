use crate::hints::hint_model::Hint;
use crate::hints::mode::HintMode;
use crate::hints::overlay::Overlay;

/// Where a live session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Narrowing hints by typed prefix.
    Selecting,
    /// A region is resolved and the follow-up menu is showing.
    Menu { target: usize },
}

/// Result of feeding one character to a selecting session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Prefix accepted; this many hints still match.
    Narrowed { remaining: usize },
    /// No hint starts with the extended prefix. Nothing changed.
    Rejected,
    /// The prefix equals exactly one label (index into `hints`).
    Resolved(usize),
}

/// The live state of one hint-mode invocation.
///
/// The hint set is fixed at creation; narrowing always filters the full set
/// by the current prefix, so backspace needs no history.
#[derive(Debug)]
pub struct Session {
    pub id: u64,
    pub mode: HintMode,
    hints: Vec<Hint>,
    prefix: String,
    stage: Stage,
    overlay: Overlay,
}

impl Session {
    pub fn new(id: u64, mode: HintMode, hints: Vec<Hint>, overlay: Overlay) -> Self {
        Self {
            id,
            mode,
            hints,
            prefix: String::new(),
            stage: Stage::Selecting,
            overlay,
        }
    }

    pub fn hints(&self) -> &[Hint] {
        &self.hints
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn overlay(&self) -> Overlay {
        self.overlay
    }

    pub fn into_overlay(self) -> Overlay {
        self.overlay
    }

    /// Hints whose label starts with the current prefix, in label order.
    pub fn matching(&self) -> Vec<&Hint> {
        self.matching_prefix(&self.prefix)
    }

    fn matching_prefix(&self, prefix: &str) -> Vec<&Hint> {
        self.hints
            .iter()
            .filter(|h| h.label.starts_with(prefix))
            .collect()
    }

    /// Extend the prefix by `c` if any hint still matches.
    pub fn type_char(&mut self, c: char) -> Step {
        let mut candidate = self.prefix.clone();
        candidate.push(c);

        let matching = self.matching_prefix(&candidate);
        let step = match matching.as_slice() {
            [] => return Step::Rejected,
            [only] if only.label.as_str() == candidate => {
                let index = self
                    .hints
                    .iter()
                    .position(|h| h.label == only.label)
                    .unwrap_or_default();
                Step::Resolved(index)
            }
            rest => Step::Narrowed {
                remaining: rest.len(),
            },
        };

        self.prefix = candidate;
        step
    }

    /// Drop the last typed character. Returns the number of matching hints,
    /// or `None` when there was nothing to delete.
    pub fn backspace(&mut self) -> Option<usize> {
        self.prefix.pop()?;
        Some(self.matching().len())
    }

    pub fn open_menu(&mut self, target: usize) {
        self.stage = Stage::Menu { target };
    }

    pub fn hint(&self, index: usize) -> Option<&Hint> {
        self.hints.get(index)
    }
}
