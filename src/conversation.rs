//! Conversation identity and the lookup contract with the chat data store.
//!
//! The dock only ever holds a [`ConversationId`]. Titles (and anything else a
//! renderer wants to show) come from a [`ConversationDirectory`] owned by the
//! host application.

use std::collections::BTreeMap;
use std::fmt;

/// Opaque identifier of a chat thread owned by the external chat state.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ConversationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One row of the chat list window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub title: String,
    /// `true` for group ("crowd") conversations.
    pub group: bool,
}

/// Read-only view of the chat data store used for rendering.
pub trait ConversationDirectory {
    fn title(&self, id: &ConversationId) -> Option<String>;

    /// Conversations in the order the list window should show them.
    fn conversations(&self) -> Vec<ConversationSummary>;

    fn title_or_id(&self, id: &ConversationId) -> String {
        self.title(id).unwrap_or_else(|| id.to_string())
    }

    /// Conversation at `index` in list order.
    fn nth(&self, index: usize) -> Option<ConversationId> {
        self.conversations().into_iter().nth(index).map(|summary| summary.id)
    }
}

/// In-memory directory keyed by conversation id, preserving insertion order.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    order: Vec<ConversationId>,
    entries: BTreeMap<ConversationId, ConversationSummary>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<ConversationId>, title: impl Into<String>, group: bool) {
        let id = id.into();
        if !self.entries.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.entries.insert(
            id.clone(),
            ConversationSummary {
                id,
                title: title.into(),
                group,
            },
        );
    }

    pub fn with(mut self, id: impl Into<ConversationId>, title: impl Into<String>) -> Self {
        self.insert(id, title, false);
        self
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl ConversationDirectory for StaticDirectory {
    fn title(&self, id: &ConversationId) -> Option<String> {
        self.entries.get(id).map(|entry| entry.title.clone())
    }

    fn conversations(&self) -> Vec<ConversationSummary> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id).cloned())
            .collect()
    }

    fn nth(&self, index: usize) -> Option<ConversationId> {
        self.order.get(index).cloned()
    }
}
