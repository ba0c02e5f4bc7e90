use crate::hints::dispatch::{BrowserSurface, SurfaceRequest};
use crate::hints::mode::Placement;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub id: u32,
    pub url: String,
}

/// In-memory stand-in for the browser's tab strip, clipboard and
/// assistant queue.
#[derive(Debug, Clone)]
pub struct TabStrip {
    tabs: Vec<Tab>,
    active: usize,
    next_id: u32,
    clipboard: Option<String>,
    discussions: Vec<String>,
}

impl TabStrip {
    /// A window with one tab showing `url`.
    pub fn new(url: &str) -> Self {
        Self {
            tabs: vec![Tab {
                id: 1,
                url: url.to_string(),
            }],
            active: 0,
            next_id: 2,
            clipboard: None,
            discussions: vec![],
        }
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn active_tab(&self) -> &Tab {
        &self.tabs[self.active]
    }

    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    /// Content queued for the external assistant, oldest first.
    pub fn discussions(&self) -> &[String] {
        &self.discussions
    }

    fn open(&mut self, url: String, placement: Placement) {
        match placement {
            Placement::CurrentTab => self.tabs[self.active].url = url,
            Placement::BackgroundTab | Placement::ForegroundTab => {
                let tab = Tab {
                    id: self.next_id,
                    url,
                };
                self.next_id += 1;
                // New tabs open right after the active one.
                let index = self.active + 1;
                self.tabs.insert(index, tab);
                if placement == Placement::ForegroundTab {
                    self.active = index;
                }
            }
        }
    }
}

impl BrowserSurface for TabStrip {
    fn request(&mut self, request: SurfaceRequest) {
        match request {
            SurfaceRequest::OpenUrl { url, placement } => self.open(url, placement),
            SurfaceRequest::WriteClipboard { text } => self.clipboard = Some(text),
            SurfaceRequest::Discuss { content } => self.discussions.push(content),
        }
    }
}
