use serde::Serialize;

use crate::dom::dom_model::{Document, EventKind, NodeId};
use crate::hints::hint_model::{Candidate, Payload};
use crate::hints::mode::{ActionDescriptor, Placement};
use crate::hints::scanner::link_destination;

/// Request sent to the browser's tab/window/clipboard layer. The engine
/// never waits for an answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "request", rename_all = "snake_case")]
pub enum SurfaceRequest {
    OpenUrl { url: String, placement: Placement },
    WriteClipboard { text: String },
    Discuss { content: String },
}

/// Outbound side of the engine: everything that leaves the page.
pub trait BrowserSurface {
    fn request(&mut self, request: SurfaceRequest);
}

/// Keeps every request in order. Used by the CLI and tests.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub requests: Vec<SurfaceRequest>,
}

impl BrowserSurface for RecordingSurface {
    fn request(&mut self, request: SurfaceRequest) {
        self.requests.push(request);
    }
}

/// A terminal side effect on a resolved element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Click,
    OpenUrl(Placement),
    MouseOver,
    MouseOut,
    ScrollAndFocus,
    Delete,
    CopyText,
    CopyHtml,
    Discuss,
}

impl Action {
    /// The terminal action behind a mode's descriptor. Regional modes have
    /// none: their action comes from the follow-up menu.
    pub fn from_descriptor(descriptor: ActionDescriptor) -> Option<Action> {
        match descriptor {
            ActionDescriptor::Click => Some(Action::Click),
            ActionDescriptor::OpenUrl(placement) => Some(Action::OpenUrl(placement)),
            ActionDescriptor::MouseOver => Some(Action::MouseOver),
            ActionDescriptor::MouseOut => Some(Action::MouseOut),
            ActionDescriptor::ScrollAndFocus => Some(Action::ScrollAndFocus),
            ActionDescriptor::RegionalMenu => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
    Clicked { node: NodeId },
    NavigationRequested { url: String, placement: Placement },
    MouseOver { node: NodeId },
    MouseOut { node: NodeId },
    ScrolledAndFocused { node: NodeId },
    Deleted { node: NodeId },
    Copied { content: String },
    DiscussionRequested { content: String },
    /// The element left the page between labelling and resolution.
    Stale { node: NodeId },
    /// A link without a followable destination.
    NoDestination { node: NodeId },
}

impl ActionOutcome {
    pub fn succeeded(&self) -> bool {
        !matches!(
            self,
            ActionOutcome::Stale { .. } | ActionOutcome::NoDestination { .. }
        )
    }
}

/// Perform `action` on the candidate's element.
pub fn dispatch(
    doc: &mut Document,
    candidate: &Candidate,
    action: Action,
    surface: &mut dyn BrowserSurface,
) -> ActionOutcome {
    let node = candidate.node;
    if !doc.contains(node) {
        return ActionOutcome::Stale { node };
    }

    match action {
        Action::Click => {
            doc.dispatch_event(node, EventKind::Click);
            ActionOutcome::Clicked { node }
        }
        Action::OpenUrl(placement) => {
            let url = match &candidate.payload {
                Payload::Link { url } => Some(url.clone()),
                _ => link_destination(doc, node),
            };
            match url {
                Some(url) => {
                    surface.request(SurfaceRequest::OpenUrl {
                        url: url.clone(),
                        placement,
                    });
                    ActionOutcome::NavigationRequested { url, placement }
                }
                None => ActionOutcome::NoDestination { node },
            }
        }
        // Mouseout goes out whether or not the element was ever hovered.
        Action::MouseOver => {
            doc.dispatch_event(node, EventKind::MouseOver);
            ActionOutcome::MouseOver { node }
        }
        Action::MouseOut => {
            doc.dispatch_event(node, EventKind::MouseOut);
            ActionOutcome::MouseOut { node }
        }
        Action::ScrollAndFocus => {
            doc.dispatch_event(node, EventKind::ScrollIntoView);
            doc.focus(node);
            ActionOutcome::ScrolledAndFocused { node }
        }
        Action::Delete => {
            doc.remove(node);
            ActionOutcome::Deleted { node }
        }
        Action::CopyText => {
            let content = doc.text_content(node);
            surface.request(SurfaceRequest::WriteClipboard {
                text: content.clone(),
            });
            ActionOutcome::Copied { content }
        }
        Action::CopyHtml => {
            let content = doc.outer_html(node);
            surface.request(SurfaceRequest::WriteClipboard {
                text: content.clone(),
            });
            ActionOutcome::Copied { content }
        }
        Action::Discuss => {
            let content = doc.text_content(node);
            surface.request(SurfaceRequest::Discuss {
                content: content.clone(),
            });
            ActionOutcome::DiscussionRequested { content }
        }
    }
}
