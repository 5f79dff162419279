//! Per-frame view over the dock snapshot.
//!
//! The store decides which windows exist and which slot each one holds.
//! [`Dock`] adds what only matters on screen: dragged positions, stacking
//! order and keyboard focus. It pulls the snapshot from the [`Dispatcher`]
//! and resynchronises whenever the revision moves.

use std::collections::BTreeMap;
use std::sync::Arc;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::prelude::Rect;

use crate::config::DockConfig;
use crate::conversation::ConversationDirectory;
use crate::layout::{DragController, PlacementConfig, clamp_to_viewport, rect_contains};
use crate::window::decorator::{DefaultDecorator, HeaderAction, WindowDecorator};
use crate::window::{Dispatcher, DockSnapshot, FloatRect, Intent, WindowId, WindowKind};

pub const LIST_TITLE: &str = "Chats";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusRing<T: Clone + Eq> {
    order: Vec<T>,
    current: Option<T>,
}

impl<T: Clone + Eq> Default for FocusRing<T> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            current: None,
        }
    }
}

impl<T: Clone + Eq> FocusRing<T> {
    pub fn set_order(&mut self, order: Vec<T>) {
        self.order = order;
        if let Some(current) = &self.current
            && !self.order.contains(current)
        {
            self.current = None;
        }
    }

    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    pub fn set_current(&mut self, current: T) {
        if self.order.contains(&current) {
            self.current = Some(current);
        }
    }

    pub fn advance(&mut self, forward: bool) {
        if self.order.is_empty() {
            self.current = None;
            return;
        }
        let Some(idx) = self
            .current
            .as_ref()
            .and_then(|current| self.order.iter().position(|item| item == current))
        else {
            self.current = self.order.first().cloned();
            return;
        };
        let step = if forward { 1isize } else { -1isize };
        let next = (idx as isize + step).rem_euclid(self.order.len() as isize) as usize;
        self.current = Some(self.order[next].clone());
    }
}

/// One window as it should be drawn this frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowDraw {
    pub id: WindowId,
    pub rect: FloatRect,
    /// Visible part of the window body.
    pub body: Rect,
    pub title: String,
    pub focused: bool,
    pub minimizable: bool,
}

/// What a pointer event did to the dock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MouseOutcome {
    Ignored,
    Handled,
    /// The press landed inside a window body; route it to that window.
    Body(WindowId),
}

#[derive(Debug)]
pub struct Dock {
    placement: PlacementConfig,
    drag_margin: u16,
    decorator: DefaultDecorator,
    snapshot: Arc<DockSnapshot>,
    revision: Option<u64>,
    drags: BTreeMap<WindowId, DragController>,
    /// Appearance stamp each drag controller was created for.
    shown: BTreeMap<WindowId, u64>,
    z_order: Vec<WindowId>,
    focus: FocusRing<WindowId>,
    active_drag: Option<WindowId>,
    viewport: Rect,
}

impl Dock {
    pub fn new(placement: PlacementConfig, drag_margin: u16) -> Self {
        Self {
            placement,
            drag_margin,
            decorator: DefaultDecorator,
            snapshot: Arc::new(DockSnapshot::default()),
            revision: None,
            drags: BTreeMap::new(),
            shown: BTreeMap::new(),
            z_order: Vec::new(),
            focus: FocusRing::default(),
            active_drag: None,
            viewport: Rect::default(),
        }
    }

    pub fn from_config(config: &DockConfig) -> Self {
        Self::new(config.placement, config.drag_margin)
    }

    pub fn snapshot(&self) -> &DockSnapshot {
        &self.snapshot
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Pull the latest snapshot. Cheap when nothing changed.
    pub fn sync(&mut self, dispatcher: &Dispatcher) {
        if self.revision == Some(dispatcher.revision()) {
            return;
        }
        self.revision = Some(dispatcher.revision());
        self.snapshot = dispatcher.snapshot();

        let shown: BTreeMap<WindowId, u64> = self
            .snapshot
            .visible()
            .into_iter()
            .map(|w| (w.id().clone(), w.appearance()))
            .collect();
        let visible: Vec<WindowId> = self
            .snapshot
            .visible()
            .into_iter()
            .map(|w| w.id().clone())
            .collect();

        // Windows hidden since the last sync carry a new appearance stamp even
        // when they are back on screen. They lose their dragged position and
        // return to their slot.
        self.shown.retain(|id, stamp| shown.get(id) == Some(&*stamp));
        let kept = &self.shown;
        self.drags.retain(|id, _| kept.contains_key(id));
        self.z_order.retain(|id| kept.contains_key(id));
        if let Some(active) = &self.active_drag
            && !self.shown.contains_key(active)
        {
            self.active_drag = None;
        }

        let mut newest = None;
        for id in &visible {
            if !self.shown.contains_key(id) {
                if let Some(stamp) = shown.get(id) {
                    self.shown.insert(id.clone(), *stamp);
                }
                self.drags
                    .insert(id.clone(), DragController::new(self.drag_margin));
                self.z_order.push(id.clone());
                newest = Some(id.clone());
            }
        }

        self.focus.set_order(visible);
        match newest {
            Some(id) => self.focus.set_current(id),
            None if self.focus.current().is_none() => {
                if let Some(top) = self.z_order.last().cloned() {
                    self.focus.set_current(top);
                }
            }
            None => {}
        }
    }

    /// Idle tick: follow viewport changes so dragged windows stay reachable.
    pub fn tick(&mut self, viewport: Rect) {
        if viewport == self.viewport {
            return;
        }
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            "viewport changed, re-clamping dragged windows"
        );
        self.viewport = viewport;
        for drag in self.drags.values_mut() {
            drag.reclamp(viewport);
        }
    }

    pub fn z_order(&self) -> &[WindowId] {
        &self.z_order
    }

    pub fn focused(&self) -> Option<&WindowId> {
        self.focus.current()
    }

    pub fn focus_next(&mut self) {
        self.focus.advance(true);
        self.raise_focused();
    }

    pub fn focus_prev(&mut self) {
        self.focus.advance(false);
        self.raise_focused();
    }

    fn raise_focused(&mut self) {
        if let Some(id) = self.focus.current().cloned() {
            self.bring_to_front(&id);
        }
    }

    pub fn bring_to_front(&mut self, id: &WindowId) {
        if let Some(pos) = self.z_order.iter().position(|x| x == id) {
            let item = self.z_order.remove(pos);
            self.z_order.push(item);
        }
    }

    fn focus_window(&mut self, id: &WindowId) {
        self.focus.set_current(id.clone());
        self.bring_to_front(id);
    }

    /// Current on-screen rect of a visible window. Slots past the left edge
    /// of a narrow viewport are pulled in until `drag_margin` cells show, so
    /// their header buttons stay under the pointer.
    pub fn window_rect(&self, id: &WindowId) -> Option<FloatRect> {
        let window = self.snapshot.window(id).filter(|w| w.visible())?;
        let slot_rect = clamp_to_viewport(
            self.placement.slot_rect(window.slot(), self.viewport),
            self.viewport,
            self.drag_margin,
        );
        Some(
            self.drags
                .get(id)
                .map_or(slot_rect, |drag| drag.resolve(slot_rect)),
        )
    }

    /// Draw plan for the current viewport, bottom window first.
    pub fn layout(&self, directory: &dyn ConversationDirectory) -> Vec<WindowDraw> {
        let focused = self.focus.current();
        self.z_order
            .iter()
            .filter_map(|id| {
                let rect = self.window_rect(id)?;
                let title = match id {
                    WindowId::List => LIST_TITLE.to_string(),
                    WindowId::Conversation(cid) => directory.title_or_id(cid),
                };
                Some(WindowDraw {
                    id: id.clone(),
                    rect,
                    body: self.decorator.content_rect(rect).visible_in(self.viewport),
                    title,
                    focused: focused == Some(id),
                    minimizable: id.kind() == WindowKind::Conversation,
                })
            })
            .collect()
    }

    pub fn decorator(&self) -> &dyn WindowDecorator {
        &self.decorator
    }

    fn topmost_at(&self, column: u16, row: u16) -> Option<WindowId> {
        self.z_order
            .iter()
            .rev()
            .find(|id| {
                self.window_rect(id)
                    .is_some_and(|rect| rect_contains(rect.visible_in(self.viewport), column, row))
            })
            .cloned()
    }

    pub fn handle_mouse(&mut self, mouse: &MouseEvent, dispatcher: &mut Dispatcher) -> MouseOutcome {
        self.sync(dispatcher);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(id) = self.topmost_at(mouse.column, mouse.row) else {
                    return MouseOutcome::Ignored;
                };
                self.focus_window(&id);
                let Some(rect) = self.window_rect(&id) else {
                    return MouseOutcome::Ignored;
                };
                let minimizable = id.kind() == WindowKind::Conversation;
                match self
                    .decorator
                    .hit_test(rect, minimizable, mouse.column, mouse.row)
                {
                    HeaderAction::Close => {
                        dispatcher.dispatch(close_intent(&id));
                        self.sync(dispatcher);
                        MouseOutcome::Handled
                    }
                    HeaderAction::Minimize => {
                        if let Some(cid) = id.conversation() {
                            dispatcher.dispatch(Intent::MinimizeConversation(cid.clone()));
                            self.sync(dispatcher);
                        }
                        MouseOutcome::Handled
                    }
                    HeaderAction::Drag => {
                        if let Some(drag) = self.drags.get_mut(&id) {
                            drag.begin(mouse.column, mouse.row, rect);
                            self.active_drag = Some(id);
                        }
                        MouseOutcome::Handled
                    }
                    HeaderAction::None => MouseOutcome::Body(id),
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let Some(id) = self.active_drag.clone() else {
                    return MouseOutcome::Ignored;
                };
                let viewport = self.viewport;
                if let Some(drag) = self.drags.get_mut(&id) {
                    drag.drag_to(mouse.column, mouse.row, viewport);
                }
                MouseOutcome::Handled
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let Some(id) = self.active_drag.take() else {
                    return MouseOutcome::Ignored;
                };
                if let Some(drag) = self.drags.get_mut(&id)
                    && drag.end()
                    && let Some(position) = drag.position()
                {
                    tracing::debug!(window = %id, x = position.x, y = position.y, "window dropped");
                }
                MouseOutcome::Handled
            }
            _ => MouseOutcome::Ignored,
        }
    }

    /// Close the focused window. Returns whether the dock changed.
    pub fn close_focused(&mut self, dispatcher: &mut Dispatcher) -> bool {
        self.sync(dispatcher);
        let Some(id) = self.focus.current().cloned() else {
            return false;
        };
        let changed = dispatcher.dispatch(close_intent(&id));
        self.sync(dispatcher);
        changed
    }

    /// Minimize the focused conversation. The chat list cannot be minimized.
    pub fn minimize_focused(&mut self, dispatcher: &mut Dispatcher) -> bool {
        self.sync(dispatcher);
        let Some(cid) = self.focus.current().and_then(|id| id.conversation()).cloned() else {
            return false;
        };
        let changed = dispatcher.dispatch(Intent::MinimizeConversation(cid));
        self.sync(dispatcher);
        changed
    }
}

fn close_intent(id: &WindowId) -> Intent {
    match id {
        WindowId::List => Intent::CloseList,
        WindowId::Conversation(cid) => Intent::CloseConversation(cid.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{ConversationId, StaticDirectory};
    use crossterm::event::KeyModifiers;

    fn viewport() -> Rect {
        Rect::new(0, 0, 100, 40)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn setup(ids: &[&str]) -> (Dispatcher, Dock) {
        let mut dispatcher = Dispatcher::new();
        for id in ids {
            dispatcher.open_conversation(*id);
        }
        let mut dock = Dock::new(PlacementConfig::default(), 4);
        dock.tick(viewport());
        dock.sync(&dispatcher);
        (dispatcher, dock)
    }

    fn conv(id: &str) -> WindowId {
        WindowId::Conversation(ConversationId::from(id))
    }

    #[test]
    fn focus_ring_cycles_and_wraps() {
        let mut ring = FocusRing::default();
        ring.set_order(vec![1, 2, 3]);
        ring.advance(true);
        assert_eq!(ring.current(), Some(&1));
        ring.set_current(3);
        ring.advance(true);
        assert_eq!(ring.current(), Some(&1));
        ring.advance(false);
        assert_eq!(ring.current(), Some(&3));
        ring.set_order(vec![1]);
        assert_eq!(ring.current(), None);
    }

    #[test]
    fn layout_places_windows_by_slot() {
        let (_, dock) = setup(&["a", "b"]);
        let dir = StaticDirectory::new().with("a", "Alice");
        let plan = dock.layout(&dir);
        assert_eq!(plan.len(), 3);
        let list = plan.iter().find(|w| w.id == WindowId::List).expect("list");
        assert_eq!((list.rect.x, list.rect.y), (69, 25));
        assert_eq!(list.title, LIST_TITLE);
        assert!(!list.minimizable);
        let a = plan.iter().find(|w| w.id == conv("a")).expect("a");
        assert_eq!(a.rect.x, 38);
        assert_eq!(a.title, "Alice");
        let b = plan.iter().find(|w| w.id == conv("b")).expect("b");
        assert_eq!(b.title, "b");
        assert!(b.focused);
    }

    #[test]
    fn header_drag_moves_window_without_changing_slot() {
        let (mut dispatcher, mut dock) = setup(&["a"]);
        let down = mouse(MouseEventKind::Down(MouseButton::Left), 40, 25);
        assert_eq!(dock.handle_mouse(&down, &mut dispatcher), MouseOutcome::Handled);
        let drag = mouse(MouseEventKind::Drag(MouseButton::Left), 30, 10);
        assert_eq!(dock.handle_mouse(&drag, &mut dispatcher), MouseOutcome::Handled);
        let up = mouse(MouseEventKind::Up(MouseButton::Left), 30, 10);
        assert_eq!(dock.handle_mouse(&up, &mut dispatcher), MouseOutcome::Handled);

        let rect = dock.window_rect(&conv("a")).expect("visible");
        assert_eq!((rect.x, rect.y), (28, 10));
        assert_eq!(
            dispatcher
                .snapshot()
                .conversation(&ConversationId::from("a"))
                .map(|w| w.slot()),
            Some(1)
        );
    }

    #[test]
    fn drag_is_clamped_to_viewport() {
        let (mut dispatcher, mut dock) = setup(&["a"]);
        dock.handle_mouse(
            &mouse(MouseEventKind::Down(MouseButton::Left), 40, 25),
            &mut dispatcher,
        );
        dock.handle_mouse(
            &mouse(MouseEventKind::Drag(MouseButton::Left), 0, 0),
            &mut dispatcher,
        );
        let rect = dock.window_rect(&conv("a")).expect("visible");
        assert_eq!(rect.y, 0);
        assert!(rect.right() >= 4);
    }

    #[test]
    fn header_buttons_dispatch_intents() {
        let (mut dispatcher, mut dock) = setup(&["a", "b"]);
        // b sits in slot 2 at x = 7, so its buttons are at 33 (_) and 35 (x).
        let minimize = mouse(MouseEventKind::Down(MouseButton::Left), 33, 25);
        assert_eq!(
            dock.handle_mouse(&minimize, &mut dispatcher),
            MouseOutcome::Handled
        );
        let snapshot = dispatcher.snapshot();
        assert!(
            snapshot
                .conversation(&ConversationId::from("b"))
                .is_some_and(|w| w.minimized())
        );
        assert!(dock.window_rect(&conv("b")).is_none());

        // a is in slot 1 at x = 38; close button at 66.
        let close = mouse(MouseEventKind::Down(MouseButton::Left), 66, 25);
        dock.handle_mouse(&close, &mut dispatcher);
        assert!(
            dispatcher
                .snapshot()
                .conversation(&ConversationId::from("a"))
                .is_none()
        );
    }

    #[test]
    fn body_click_is_routed_and_raises() {
        let (mut dispatcher, mut dock) = setup(&["a"]);
        let click = mouse(MouseEventKind::Down(MouseButton::Left), 75, 30);
        assert_eq!(
            dock.handle_mouse(&click, &mut dispatcher),
            MouseOutcome::Body(WindowId::List)
        );
        assert_eq!(dock.focused(), Some(&WindowId::List));
        assert_eq!(dock.z_order().last(), Some(&WindowId::List));
        let miss = mouse(MouseEventKind::Down(MouseButton::Left), 1, 1);
        assert_eq!(dock.handle_mouse(&miss, &mut dispatcher), MouseOutcome::Ignored);
    }

    #[test]
    fn minimized_window_returns_to_slot() {
        let (mut dispatcher, mut dock) = setup(&["a"]);
        dock.handle_mouse(
            &mouse(MouseEventKind::Down(MouseButton::Left), 40, 25),
            &mut dispatcher,
        );
        dock.handle_mouse(
            &mouse(MouseEventKind::Drag(MouseButton::Left), 20, 5),
            &mut dispatcher,
        );
        dock.handle_mouse(
            &mouse(MouseEventKind::Up(MouseButton::Left), 20, 5),
            &mut dispatcher,
        );
        dispatcher.minimize_conversation("a");
        dock.sync(&dispatcher);
        dispatcher.restore_conversation("a");
        dock.sync(&dispatcher);
        let rect = dock.window_rect(&conv("a")).expect("visible");
        assert_eq!((rect.x, rect.y), (38, 25));
    }

    fn drag_a_to(dock: &mut Dock, dispatcher: &mut Dispatcher, column: u16, row: u16) {
        for kind in [
            MouseEventKind::Down(MouseButton::Left),
            MouseEventKind::Drag(MouseButton::Left),
            MouseEventKind::Up(MouseButton::Left),
        ] {
            let (col, r) = match kind {
                MouseEventKind::Down(_) => (40, 25),
                _ => (column, row),
            };
            dock.handle_mouse(&mouse(kind, col, r), dispatcher);
        }
    }

    #[test]
    fn hide_and_show_between_syncs_still_snaps_back() {
        let (mut dispatcher, mut dock) = setup(&["a"]);
        drag_a_to(&mut dock, &mut dispatcher, 20, 5);
        assert_eq!(dock.window_rect(&conv("a")).map(|r| (r.x, r.y)), Some((18, 5)));

        dispatcher.minimize_conversation("a");
        dispatcher.restore_conversation("a");
        dock.sync(&dispatcher);
        assert_eq!(dock.window_rect(&conv("a")).map(|r| (r.x, r.y)), Some((38, 25)));
        assert_eq!(dock.focused(), Some(&conv("a")));

        drag_a_to(&mut dock, &mut dispatcher, 20, 5);
        dispatcher.close_conversation("a");
        dispatcher.open_conversation("a");
        dock.sync(&dispatcher);
        assert_eq!(dock.window_rect(&conv("a")).map(|r| (r.x, r.y)), Some((38, 25)));
    }

    #[test]
    fn far_slot_on_narrow_viewport_stays_reachable() {
        let (mut dispatcher, mut dock) = setup(&["a", "b", "c"]);
        dock.tick(Rect::new(0, 0, 80, 40));

        let rect = dock.window_rect(&conv("c")).expect("visible");
        assert_eq!(rect.right(), 4);
        assert_eq!(rect.y, 25);
        // The slot itself is not touched, only where it is drawn.
        assert!(PlacementConfig::default().slot_rect(3, dock.viewport()).right() < 0);

        // minimize glyph sits at right - 4
        let press = mouse(MouseEventKind::Down(MouseButton::Left), 0, 25);
        assert_eq!(dock.handle_mouse(&press, &mut dispatcher), MouseOutcome::Handled);
        assert!(
            dispatcher
                .snapshot()
                .conversation(&ConversationId::from("c"))
                .is_some_and(|w| w.minimized())
        );
    }

    #[test]
    fn unrelated_changes_keep_dragged_position() {
        let (mut dispatcher, mut dock) = setup(&["a"]);
        drag_a_to(&mut dock, &mut dispatcher, 20, 5);

        dispatcher.open_conversation("b");
        dispatcher.minimize_conversation("b");
        dock.sync(&dispatcher);

        assert_eq!(dock.window_rect(&conv("a")).map(|r| (r.x, r.y)), Some((18, 5)));
    }

    #[test]
    fn shrinking_viewport_reclamps_dragged_windows() {
        let (mut dispatcher, mut dock) = setup(&["a"]);
        dock.handle_mouse(
            &mouse(MouseEventKind::Down(MouseButton::Left), 40, 25),
            &mut dispatcher,
        );
        dock.handle_mouse(
            &mouse(MouseEventKind::Drag(MouseButton::Left), 95, 35),
            &mut dispatcher,
        );
        dock.tick(Rect::new(0, 0, 50, 20));
        let rect = dock.window_rect(&conv("a")).expect("visible");
        assert!(rect.x <= 46);
        assert!(rect.y <= 16);
    }

    #[test]
    fn keyboard_close_and_minimize_follow_focus() {
        let (mut dispatcher, mut dock) = setup(&["a", "b"]);
        assert_eq!(dock.focused(), Some(&conv("b")));
        assert!(dock.minimize_focused(&mut dispatcher));
        assert!(dock.focused().is_some());

        dock.focus_window(&WindowId::List);
        assert!(!dock.minimize_focused(&mut dispatcher));
        assert!(dock.close_focused(&mut dispatcher));
        assert!(!dispatcher.snapshot().has_list());
        dock.focus_next();
        assert_eq!(dock.focused(), Some(&conv("a")));
    }
}
