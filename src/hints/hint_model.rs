use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dom::dom_model::{NodeId, Point, Rect};
use crate::engine::error::HintError;

pub const DEFAULT_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const DEFAULT_MAX_LABEL_LENGTH: usize = 3;

// ============================================================================
// Session data
// ============================================================================

/// Mode-specific data captured while scanning.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    None,
    Link { url: String },
    Scroll { overflow: f64 },
    Pointer,
    Region { area: f64 },
}

/// An element offered for selection during one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub node: NodeId,
    pub rect: Rect,
    pub anchor: Point,
    pub payload: Payload,
}

/// Sequence of alphabet characters a user types to pick a hint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Label(String);

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Label(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hint {
    pub label: Label,
    pub candidate: Candidate,
}

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HintConfig {
    #[serde(default)]
    pub labels: LabelConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub visibility: VisibilityConfig,
    #[serde(default)]
    pub regional: RegionalKeys,
}

impl HintConfig {
    /// Reject configurations that could produce ambiguous labels or menus.
    pub fn validate(&self) -> Result<(), HintError> {
        self.labels.validate()?;
        self.regional.validate()
    }
}

/// What to do when there are more candidates than labels of `max_length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Drop candidates past the label capacity (last in document order first).
    Truncate,
    /// Let labels grow past `max_length`.
    Extend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelConfig {
    #[serde(default = "default_alphabet")]
    pub alphabet: String,

    #[serde(default = "default_max_length")]
    pub max_length: usize,

    #[serde(default = "default_overflow")]
    pub overflow: OverflowPolicy,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            alphabet: default_alphabet(),
            max_length: DEFAULT_MAX_LABEL_LENGTH,
            overflow: OverflowPolicy::Truncate,
        }
    }
}

impl LabelConfig {
    pub fn symbols(&self) -> Vec<char> {
        self.alphabet.chars().collect()
    }

    pub fn validate(&self) -> Result<(), HintError> {
        let symbols = self.symbols();
        if symbols.len() < 2 {
            return Err(HintError::InvalidAlphabet(format!(
                "need at least 2 symbols, got {}",
                symbols.len()
            )));
        }
        if let Some(bad) = symbols.iter().find(|c| !c.is_ascii_uppercase()) {
            return Err(HintError::InvalidAlphabet(format!(
                "'{}' is not an uppercase ASCII letter",
                bad
            )));
        }
        for (i, c) in symbols.iter().enumerate() {
            if symbols[..i].contains(c) {
                return Err(HintError::InvalidAlphabet(format!("duplicate symbol '{}'", c)));
            }
        }
        if self.max_length == 0 {
            return Err(HintError::InvalidLabelLength(self.max_length));
        }
        Ok(())
    }

    /// Number of labels available without exceeding `max_length`.
    pub fn capacity(&self) -> usize {
        let base = self.alphabet.chars().count();
        (0..self.max_length).fold(1usize, |acc, _| acc.saturating_mul(base))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Minimum hidden content height (px) for an element to count as scrollable.
    #[serde(default = "default_min_scroll_overflow")]
    pub min_scroll_overflow: f64,

    /// Minimum rendered area (px²) for a regional candidate.
    #[serde(default = "default_region_min_area")]
    pub region_min_area: f64,

    #[serde(default = "default_region_min_width")]
    pub region_min_width: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_scroll_overflow: default_min_scroll_overflow(),
            region_min_area: default_region_min_area(),
            region_min_width: default_region_min_width(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewportPolicy {
    /// Only elements intersecting the current viewport.
    OnScreen,
    /// Laid-out elements anywhere on the page, reachable after scrolling.
    Anywhere,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityPolicy {
    pub viewport: ViewportPolicy,
    #[serde(default)]
    pub check_occlusion: bool,
}

impl VisibilityPolicy {
    pub const fn on_screen(check_occlusion: bool) -> Self {
        Self {
            viewport: ViewportPolicy::OnScreen,
            check_occlusion,
        }
    }

    pub const fn anywhere() -> Self {
        Self {
            viewport: ViewportPolicy::Anywhere,
            check_occlusion: false,
        }
    }
}

/// One policy per mode family. Off-screen handling is always explicit here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilityConfig {
    #[serde(default = "default_interactive_visibility")]
    pub click: VisibilityPolicy,
    #[serde(default = "default_interactive_visibility")]
    pub links: VisibilityPolicy,
    #[serde(default = "default_interactive_visibility")]
    pub pointer: VisibilityPolicy,
    #[serde(default = "default_scrollable_visibility")]
    pub scrollable: VisibilityPolicy,
    #[serde(default = "default_regional_visibility")]
    pub regional: VisibilityPolicy,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            click: default_interactive_visibility(),
            links: default_interactive_visibility(),
            pointer: default_interactive_visibility(),
            scrollable: default_scrollable_visibility(),
            regional: default_regional_visibility(),
        }
    }
}

/// Keys of the regional follow-up menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalKeys {
    #[serde(default = "default_copy_text_key")]
    pub copy_text: char,
    #[serde(default = "default_copy_html_key")]
    pub copy_html: char,
    #[serde(default = "default_delete_key")]
    pub delete: char,
    #[serde(default = "default_discuss_key")]
    pub discuss: char,
}

impl Default for RegionalKeys {
    fn default() -> Self {
        Self {
            copy_text: default_copy_text_key(),
            copy_html: default_copy_html_key(),
            delete: default_delete_key(),
            discuss: default_discuss_key(),
        }
    }
}

impl RegionalKeys {
    pub fn validate(&self) -> Result<(), HintError> {
        let keys = [self.copy_text, self.copy_html, self.delete, self.discuss];
        for (i, key) in keys.iter().enumerate() {
            let lower = key.to_ascii_lowercase();
            if keys[..i].iter().any(|k| k.to_ascii_lowercase() == lower) {
                return Err(HintError::InvalidMenuKeys(format!("'{}' bound twice", key)));
            }
        }
        Ok(())
    }
}

// Serde default helpers
fn default_alphabet() -> String { DEFAULT_ALPHABET.to_string() }
fn default_max_length() -> usize { DEFAULT_MAX_LABEL_LENGTH }
fn default_overflow() -> OverflowPolicy { OverflowPolicy::Truncate }
fn default_min_scroll_overflow() -> f64 { 1.0 }
fn default_region_min_area() -> f64 { 20_000.0 }
fn default_region_min_width() -> f64 { 100.0 }
fn default_interactive_visibility() -> VisibilityPolicy { VisibilityPolicy::on_screen(true) }
fn default_scrollable_visibility() -> VisibilityPolicy { VisibilityPolicy::anywhere() }
fn default_regional_visibility() -> VisibilityPolicy { VisibilityPolicy::on_screen(false) }
fn default_copy_text_key() -> char { 't' }
fn default_copy_html_key() -> char { 'h' }
fn default_delete_key() -> char { 'd' }
fn default_discuss_key() -> char { 'l' }
