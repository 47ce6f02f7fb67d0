//! The extracted announcement: labels plus content.
//!
//! A message keeps its label part (the region's aria label, when distinct
//! from the content) separate from the content part until it is spoken, so
//! the two are never announced twice when they coincide.

/// An announcement extracted from a live-region event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Label utterances (region name or description).
    pub labels: Vec<String>,

    /// Content utterances (what actually changed).
    pub content: Vec<String>,
}

impl Message {
    /// A message with content only.
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            labels: Vec::new(),
            content: vec![content.into()],
        }
    }

    /// A message with a label prefix.
    pub fn labelled(label: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            labels: vec![label.into()],
            content: vec![content.into()],
        }
    }

    /// The utterances to speak: content alone when labels repeat it,
    /// otherwise labels followed by content.
    pub fn utterances(&self) -> Vec<String> {
        if self.labels == self.content {
            return self.content.clone();
        }
        let mut utterances = self.labels.clone();
        utterances.extend(self.content.iter().cloned());
        utterances
    }
}
