//! Immutable window collection snapshots.
//!
//! A [`DockSnapshot`] is the whole state of the dock: the ordered windows plus
//! the two one-shot limit flags. Snapshots are only produced by
//! [`reduce`](super::reduce); everything else reads them.

use std::collections::BTreeSet;

use thiserror::Error;

use super::{ChatWindow, WindowId, WindowKind};
use crate::constants::{MAX_CONVERSATION_WINDOWS, MAX_VISIBLE_WINDOWS};
use crate::conversation::ConversationId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("more than one chat list window")]
    DuplicateList,
    #[error("conversation {0} has more than one window")]
    DuplicateConversation(ConversationId),
    #[error("visible slots {slots:?} are not contiguous from 0")]
    SlotsNotContiguous { slots: Vec<usize> },
    #[error("visible chat list sits in slot {slot}, expected 0")]
    ListNotAnchored { slot: usize },
    #[error("{count} windows visible, limit is {}", MAX_VISIBLE_WINDOWS)]
    TooManyVisible { count: usize },
    #[error("{count} conversation windows open, limit is {}", MAX_CONVERSATION_WINDOWS)]
    TooManyConversations { count: usize },
    #[error("both limit flags are raised")]
    ConflictingFlags,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DockSnapshot {
    pub(crate) windows: Vec<ChatWindow>,
    pub(crate) visible_limit_reached: bool,
    pub(crate) total_limit_reached: bool,
    /// Source of [`ChatWindow::appearance`] stamps. Survives `CloseAll`.
    pub(crate) appearances: u64,
}

impl DockSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// All windows in creation order.
    pub fn windows(&self) -> &[ChatWindow] {
        &self.windows
    }

    pub fn window(&self, id: &WindowId) -> Option<&ChatWindow> {
        self.windows.iter().find(|window| window.id() == id)
    }

    pub fn conversation(&self, id: &ConversationId) -> Option<&ChatWindow> {
        self.windows
            .iter()
            .find(|window| window.conversation_id() == Some(id))
    }

    /// Visible windows ordered by slot, edge-anchored first.
    pub fn visible(&self) -> Vec<&ChatWindow> {
        let mut visible: Vec<&ChatWindow> = self.windows.iter().filter(|w| w.visible()).collect();
        visible.sort_by_key(|w| w.slot());
        visible
    }

    /// Minimized windows in creation order, which is also tray order.
    pub fn minimized(&self) -> Vec<&ChatWindow> {
        self.windows.iter().filter(|w| w.minimized()).collect()
    }

    pub fn visible_count(&self) -> usize {
        self.windows.iter().filter(|w| w.visible()).count()
    }

    pub fn conversation_count(&self) -> usize {
        self.windows
            .iter()
            .filter(|w| w.kind() == WindowKind::Conversation)
            .count()
    }

    pub fn has_list(&self) -> bool {
        self.windows.iter().any(|w| w.kind() == WindowKind::List)
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn visible_limit_reached(&self) -> bool {
        self.visible_limit_reached
    }

    pub fn total_limit_reached(&self) -> bool {
        self.total_limit_reached
    }

    /// Verify every structural invariant of the dock.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let lists = self
            .windows
            .iter()
            .filter(|w| w.kind() == WindowKind::List)
            .count();
        if lists > 1 {
            return Err(InvariantViolation::DuplicateList);
        }

        let mut seen = BTreeSet::new();
        for id in self.windows.iter().filter_map(|w| w.conversation_id()) {
            if !seen.insert(id) {
                return Err(InvariantViolation::DuplicateConversation(id.clone()));
            }
        }

        let conversations = self.conversation_count();
        if conversations > MAX_CONVERSATION_WINDOWS {
            return Err(InvariantViolation::TooManyConversations {
                count: conversations,
            });
        }

        let visible = self.visible();
        if visible.len() > MAX_VISIBLE_WINDOWS {
            return Err(InvariantViolation::TooManyVisible {
                count: visible.len(),
            });
        }

        let slots: Vec<usize> = visible.iter().map(|w| w.slot()).collect();
        if slots.iter().enumerate().any(|(idx, slot)| idx != *slot) {
            return Err(InvariantViolation::SlotsNotContiguous { slots });
        }

        if let Some(list) = visible.iter().find(|w| w.kind() == WindowKind::List)
            && list.slot() != 0
        {
            return Err(InvariantViolation::ListNotAnchored { slot: list.slot() });
        }

        if self.visible_limit_reached && self.total_limit_reached {
            return Err(InvariantViolation::ConflictingFlags);
        }

        Ok(())
    }

    /// Stamp the window at `idx` as freshly shown.
    pub(crate) fn mark_shown(&mut self, idx: usize) {
        self.appearances = self.appearances.wrapping_add(1);
        let stamp = self.appearances;
        if let Some(window) = self.windows.get_mut(idx) {
            window.set_appearance(stamp);
        }
    }

    pub(crate) fn position(&self, id: &WindowId) -> Option<usize> {
        self.windows.iter().position(|w| w.id() == id)
    }

    /// Lowest slot not held by a visible window, scanning upwards from `start`.
    pub(crate) fn lowest_free_slot(&self, start: usize) -> usize {
        let taken: BTreeSet<usize> = self
            .windows
            .iter()
            .filter(|w| w.visible())
            .map(|w| w.slot())
            .collect();
        (start..)
            .find(|slot| !taken.contains(slot))
            .unwrap_or(start)
    }

    /// Slide every visible window above `freed` one slot towards the edge.
    pub(crate) fn close_gap(&mut self, freed: usize) {
        for window in self.windows.iter_mut().filter(|w| w.visible()) {
            if window.slot() > freed {
                window.set_slot(window.slot() - 1);
            }
        }
    }

    /// Push every visible window one slot away from the edge.
    pub(crate) fn shift_visible_up(&mut self) {
        for window in self.windows.iter_mut().filter(|w| w.visible()) {
            window.set_slot(window.slot() + 1);
        }
    }

    /// Visible conversation furthest from the anchored edge.
    pub(crate) fn furthest_visible_conversation(&self) -> Option<usize> {
        self.windows
            .iter()
            .enumerate()
            .filter(|(_, w)| w.visible() && w.kind() == WindowKind::Conversation)
            .max_by_key(|(_, w)| w.slot())
            .map(|(idx, _)| idx)
    }

    pub(crate) fn list_visible(&self) -> bool {
        self.windows
            .iter()
            .any(|w| w.kind() == WindowKind::List && w.visible())
    }
}
