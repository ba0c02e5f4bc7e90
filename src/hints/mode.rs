use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::engine::error::HintError;
use crate::hints::hint_model::{VisibilityConfig, VisibilityPolicy};

/// Where a followed link should open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    CurrentTab,
    BackgroundTab,
    ForegroundTab,
}

/// Which elements a mode offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    Clickable,
    Hyperlink,
    PointerAffordance,
    ScrollableOverflow,
    LargeBlock,
}

/// What happens to the resolved element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "placement", rename_all = "snake_case")]
pub enum ActionDescriptor {
    Click,
    OpenUrl(Placement),
    MouseOver,
    MouseOut,
    ScrollAndFocus,
    RegionalMenu,
}

/// The closed set of hint modes. Each variant is plain data: a predicate, a
/// visibility policy family and an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HintMode {
    Click,
    OpenLink(Placement),
    Mouseover,
    Mouseout,
    Scrollable,
    Regional,
}

impl HintMode {
    pub const ALL: [HintMode; 8] = [
        HintMode::Click,
        HintMode::OpenLink(Placement::CurrentTab),
        HintMode::OpenLink(Placement::BackgroundTab),
        HintMode::OpenLink(Placement::ForegroundTab),
        HintMode::Mouseover,
        HintMode::Mouseout,
        HintMode::Scrollable,
        HintMode::Regional,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            HintMode::Click => "click",
            HintMode::OpenLink(Placement::CurrentTab) => "open-link",
            HintMode::OpenLink(Placement::BackgroundTab) => "open-link-background",
            HintMode::OpenLink(Placement::ForegroundTab) => "open-link-foreground",
            HintMode::Mouseover => "mouseover",
            HintMode::Mouseout => "mouseout",
            HintMode::Scrollable => "scrollable",
            HintMode::Regional => "regional",
        }
    }

    pub fn predicate(&self) -> Predicate {
        match self {
            HintMode::Click => Predicate::Clickable,
            HintMode::OpenLink(_) => Predicate::Hyperlink,
            HintMode::Mouseover | HintMode::Mouseout => Predicate::PointerAffordance,
            HintMode::Scrollable => Predicate::ScrollableOverflow,
            HintMode::Regional => Predicate::LargeBlock,
        }
    }

    pub fn action(&self) -> ActionDescriptor {
        match self {
            HintMode::Click => ActionDescriptor::Click,
            HintMode::OpenLink(placement) => ActionDescriptor::OpenUrl(*placement),
            HintMode::Mouseover => ActionDescriptor::MouseOver,
            HintMode::Mouseout => ActionDescriptor::MouseOut,
            HintMode::Scrollable => ActionDescriptor::ScrollAndFocus,
            HintMode::Regional => ActionDescriptor::RegionalMenu,
        }
    }

    pub fn visibility(&self, config: &VisibilityConfig) -> VisibilityPolicy {
        match self {
            HintMode::Click => config.click,
            HintMode::OpenLink(_) => config.links,
            HintMode::Mouseover | HintMode::Mouseout => config.pointer,
            HintMode::Scrollable => config.scrollable,
            HintMode::Regional => config.regional,
        }
    }

    /// Regional hints paint a backdrop over each candidate's box.
    pub fn draws_regions(&self) -> bool {
        matches!(self, HintMode::Regional)
    }
}

impl fmt::Display for HintMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HintMode {
    type Err = HintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        HintMode::ALL
            .into_iter()
            .find(|mode| mode.name() == wanted)
            .ok_or_else(|| HintError::UnknownMode(s.to_string()))
    }
}
