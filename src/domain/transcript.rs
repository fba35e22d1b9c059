//! Append-only chat transcript with a scroll position.
//!
//! Scroll values are measured in entries: `scroll_top` is the index of the
//! first visible entry and `viewport` is how many entries fit on screen.

use super::message::MessageAuthor;

/// One rendered line of conversation, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub author: MessageAuthor,
    /// Clock time, already formatted for the viewer.
    pub time: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    viewport: usize,
    scroll_top: usize,
}

impl Transcript {
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn append(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    pub fn scroll_height(&self) -> usize {
        self.entries.len()
    }

    pub fn max_scroll_top(&self) -> usize {
        self.scroll_height().saturating_sub(self.viewport)
    }

    pub fn is_at_newest(&self) -> bool {
        self.scroll_top == self.max_scroll_top()
    }

    pub fn scroll_to_newest(&mut self) {
        self.scroll_top = self.max_scroll_top();
    }

    pub fn scroll_up(&mut self, by: usize) {
        self.scroll_top = self.scroll_top.saturating_sub(by);
    }

    pub fn scroll_down(&mut self, by: usize) {
        self.scroll_top = std::cmp::min(self.scroll_top.saturating_add(by), self.max_scroll_top());
    }

    pub fn viewport(&self) -> usize {
        self.viewport
    }

    /// Resizes the viewport, keeping the newest entry pinned when it was visible.
    pub fn set_viewport(&mut self, viewport: usize) {
        let follow = self.is_at_newest();
        self.viewport = viewport;
        if follow {
            self.scroll_to_newest();
        } else {
            self.scroll_top = std::cmp::min(self.scroll_top, self.max_scroll_top());
        }
    }

    /// Entries currently inside the viewport. An unsized viewport shows everything.
    pub fn visible(&self) -> &[TranscriptEntry] {
        if self.viewport == 0 {
            return &self.entries;
        }

        let start = std::cmp::min(self.scroll_top, self.entries.len());
        let end = std::cmp::min(start.saturating_add(self.viewport), self.entries.len());
        &self.entries[start..end]
    }
}
