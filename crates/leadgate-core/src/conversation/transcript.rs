//! Bounded, role-tagged conversation transcript.
//!
//! The transcript is serialized wholesale into the lead's `mensagem` field
//! after every turn ("latest full context" snapshot). Serialization is
//! role-prefixed lines; re-splitting by role prefix recovers the same
//! ordered list of (role, content) pairs.

use leadgate_types::chat::{MessageRole, TranscriptEntry};

/// Ordered transcript with a drop-oldest cap.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
    /// Maximum entries kept; 0 means unbounded.
    cap: usize,
}

impl Transcript {
    /// Create an empty transcript with the given cap.
    pub fn with_cap(cap: usize) -> Self {
        Self {
            entries: Vec::new(),
            cap,
        }
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry, dropping the oldest entries past the cap.
    pub fn push(&mut self, role: MessageRole, content: impl Into<String>) {
        self.entries.push(TranscriptEntry::new(role, content));
        if self.cap > 0 && self.entries.len() > self.cap {
            let excess = self.entries.len() - self.cap;
            self.entries.drain(..excess);
        }
    }

    /// Serialize as role-prefixed lines: `role: content`, one entry per
    /// line (multi-line contents continue on unprefixed lines).
    pub fn serialize(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{}: {}", e.role, e.content))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Re-split a serialized transcript back into (role, content) pairs.
    ///
    /// Lines that do not start with a role prefix are treated as
    /// continuations of the previous entry.
    ///
    /// The format has no escaping: a content line that itself begins with
    /// `user: ` or `assistant: ` is indistinguishable from an entry start
    /// and parses as a new entry. Model replies never quote the prefix in
    /// practice, so the snapshot stays human-readable instead of escaped.
    pub fn parse(text: &str) -> Vec<TranscriptEntry> {
        let mut entries: Vec<TranscriptEntry> = Vec::new();
        for line in text.lines() {
            let prefixed = line
                .split_once(": ")
                .and_then(|(head, rest)| head.parse::<MessageRole>().ok().map(|r| (r, rest)));
            match prefixed {
                Some((role, rest)) => entries.push(TranscriptEntry::new(role, rest)),
                None => {
                    if let Some(last) = entries.last_mut() {
                        last.content.push('\n');
                        last.content.push_str(line);
                    }
                }
            }
        }
        entries
    }
}
