//! Transition table for the dock and the object that owns the live snapshot.
//!
//! [`reduce`] is a pure, total function: every intent applied to any
//! well-formed snapshot yields another well-formed snapshot. Ids that do not
//! name an open window turn close/minimize/restore into no-ops.
//!
//! [`Dispatcher`] is the only writer. It swaps in the reduced snapshot and
//! notifies subscribers synchronously, so two transitions never interleave.

use std::fmt;
use std::sync::Arc;

use super::{ChatWindow, DockSnapshot, WindowId};
use crate::constants::{MAX_CONVERSATION_WINDOWS, MAX_VISIBLE_WINDOWS};
use crate::conversation::ConversationId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Intent {
    OpenList,
    CloseList,
    OpenConversation(ConversationId),
    CloseConversation(ConversationId),
    MinimizeConversation(ConversationId),
    RestoreConversation(ConversationId),
    CloseAll,
    ResetVisibleLimitWarning,
    ResetTotalLimitWarning,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::OpenList => write!(f, "Open chat list"),
            Intent::CloseList => write!(f, "Close chat list"),
            Intent::OpenConversation(id) => write!(f, "Open conversation {id}"),
            Intent::CloseConversation(id) => write!(f, "Close conversation {id}"),
            Intent::MinimizeConversation(id) => write!(f, "Minimize conversation {id}"),
            Intent::RestoreConversation(id) => write!(f, "Restore conversation {id}"),
            Intent::CloseAll => write!(f, "Close all windows"),
            Intent::ResetVisibleLimitWarning => write!(f, "Dismiss visible limit notice"),
            Intent::ResetTotalLimitWarning => write!(f, "Dismiss total limit notice"),
        }
    }
}

/// Apply `intent` to `state`, returning the next snapshot.
pub fn reduce(state: &DockSnapshot, intent: &Intent) -> DockSnapshot {
    let mut next = state.clone();
    match intent {
        Intent::OpenList => open_list(&mut next),
        Intent::CloseList => close_window(&mut next, &WindowId::List),
        Intent::OpenConversation(id) => open_conversation(&mut next, id),
        Intent::CloseConversation(id) => {
            close_window(&mut next, &WindowId::Conversation(id.clone()))
        }
        Intent::MinimizeConversation(id) => minimize_conversation(&mut next, id),
        Intent::RestoreConversation(id) => restore_conversation(&mut next, id),
        Intent::CloseAll => {
            next = DockSnapshot {
                appearances: state.appearances,
                ..DockSnapshot::default()
            }
        }
        Intent::ResetVisibleLimitWarning => next.visible_limit_reached = false,
        Intent::ResetTotalLimitWarning => next.total_limit_reached = false,
    }
    next
}

/// First slot a conversation may take. Slot 0 belongs to the chat list while
/// it is on screen.
fn first_conversation_slot(state: &DockSnapshot) -> usize {
    if state.list_visible() { 1 } else { 0 }
}

fn raise_visible_limit(state: &mut DockSnapshot) {
    state.visible_limit_reached = true;
    state.total_limit_reached = false;
}

fn raise_total_limit(state: &mut DockSnapshot) {
    state.total_limit_reached = true;
    state.visible_limit_reached = false;
}

fn minimize_at(state: &mut DockSnapshot, idx: usize) {
    let freed = state.windows[idx].slot();
    state.windows[idx].set_minimized(true);
    state.close_gap(freed);
}

fn open_list(state: &mut DockSnapshot) {
    if state.has_list() {
        return;
    }
    // Only reachable when conversations were restored while the list was
    // closed; the list always wins slot 0.
    if state.visible_count() >= MAX_VISIBLE_WINDOWS
        && let Some(victim) = state.furthest_visible_conversation()
    {
        minimize_at(state, victim);
    }
    state.shift_visible_up();
    state.windows.push(ChatWindow::list());
    state.mark_shown(state.windows.len() - 1);
}

fn close_window(state: &mut DockSnapshot, id: &WindowId) {
    let Some(idx) = state.position(id) else {
        return;
    };
    let removed = state.windows.remove(idx);
    if removed.visible() {
        state.close_gap(removed.slot());
    }
}

fn open_conversation(state: &mut DockSnapshot, id: &ConversationId) {
    let window_id = WindowId::Conversation(id.clone());
    if let Some(idx) = state.position(&window_id) {
        if state.windows[idx].visible() {
            return;
        }
        if state.visible_count() < MAX_VISIBLE_WINDOWS {
            let slot = state.lowest_free_slot(first_conversation_slot(state));
            let window = &mut state.windows[idx];
            window.set_minimized(false);
            window.set_slot(slot);
            state.mark_shown(idx);
            state.visible_limit_reached = false;
        } else {
            raise_visible_limit(state);
        }
        return;
    }

    if state.conversation_count() >= MAX_CONVERSATION_WINDOWS {
        raise_total_limit(state);
        return;
    }
    // The chat list is created alongside the conversation when it is absent,
    // so it counts towards the visible budget too.
    let needed = if state.has_list() { 1 } else { 2 };
    if state.visible_count() + needed > MAX_VISIBLE_WINDOWS {
        raise_visible_limit(state);
        return;
    }
    open_list(state);
    let slot = state.lowest_free_slot(1);
    state
        .windows
        .push(ChatWindow::conversation(id.clone(), slot));
    state.mark_shown(state.windows.len() - 1);
    state.visible_limit_reached = false;
}

fn minimize_conversation(state: &mut DockSnapshot, id: &ConversationId) {
    let Some(idx) = state.position(&WindowId::Conversation(id.clone())) else {
        return;
    };
    if state.windows[idx].minimized() {
        return;
    }
    minimize_at(state, idx);
}

fn restore_conversation(state: &mut DockSnapshot, id: &ConversationId) {
    let Some(idx) = state.position(&WindowId::Conversation(id.clone())) else {
        return;
    };
    if state.windows[idx].visible() {
        return;
    }
    if state.visible_count() >= MAX_VISIBLE_WINDOWS {
        match state.furthest_visible_conversation() {
            Some(victim) => minimize_at(state, victim),
            None => {
                raise_visible_limit(state);
                return;
            }
        }
    }
    let slot = state.lowest_free_slot(first_conversation_slot(state));
    let window = &mut state.windows[idx];
    window.set_minimized(false);
    window.set_slot(slot);
    state.mark_shown(idx);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&Arc<DockSnapshot>)>;

/// Owner of the live dock snapshot.
///
/// Construct one per signed-in session and hand it to whatever needs to
/// change the dock; readers take cheap `Arc` clones of the snapshot.
pub struct Dispatcher {
    snapshot: Arc<DockSnapshot>,
    revision: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("snapshot", &self.snapshot)
            .field("revision", &self.revision)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            snapshot: Arc::new(DockSnapshot::default()),
            revision: 0,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn snapshot(&self) -> Arc<DockSnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Bumped every time a dispatch changes the snapshot.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Register a callback invoked with every new snapshot.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Arc<DockSnapshot>) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription = self.next_subscription.saturating_add(1);
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Apply `intent`. Returns `true` when the snapshot changed.
    pub fn dispatch(&mut self, intent: Intent) -> bool {
        let next = reduce(&self.snapshot, &intent);
        if next == *self.snapshot {
            tracing::trace!(%intent, "intent left dock unchanged");
            return false;
        }
        if next.visible_limit_reached && !self.snapshot.visible_limit_reached {
            tracing::info!(%intent, "visible window limit reached");
        }
        if next.total_limit_reached && !self.snapshot.total_limit_reached {
            tracing::info!(%intent, "conversation window limit reached");
        }
        tracing::debug!(
            %intent,
            visible = next.visible_count(),
            conversations = next.conversation_count(),
            minimized = next.minimized().len(),
            "dock updated"
        );
        self.snapshot = Arc::new(next);
        self.revision = self.revision.wrapping_add(1);
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&self.snapshot);
        }
        true
    }

    pub fn open_list(&mut self) -> bool {
        self.dispatch(Intent::OpenList)
    }

    pub fn close_list(&mut self) -> bool {
        self.dispatch(Intent::CloseList)
    }

    pub fn open_conversation(&mut self, id: impl Into<ConversationId>) -> bool {
        self.dispatch(Intent::OpenConversation(id.into()))
    }

    pub fn close_conversation(&mut self, id: impl Into<ConversationId>) -> bool {
        self.dispatch(Intent::CloseConversation(id.into()))
    }

    pub fn minimize_conversation(&mut self, id: impl Into<ConversationId>) -> bool {
        self.dispatch(Intent::MinimizeConversation(id.into()))
    }

    pub fn restore_conversation(&mut self, id: impl Into<ConversationId>) -> bool {
        self.dispatch(Intent::RestoreConversation(id.into()))
    }

    pub fn close_all(&mut self) -> bool {
        self.dispatch(Intent::CloseAll)
    }

    pub fn reset_visible_limit_warning(&mut self) -> bool {
        self.dispatch(Intent::ResetVisibleLimitWarning)
    }

    pub fn reset_total_limit_warning(&mut self) -> bool {
        self.dispatch(Intent::ResetTotalLimitWarning)
    }
}
