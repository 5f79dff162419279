//! Terminal front end: routes input to the dock, draws it, and runs the loop.

use std::io;
use std::time::Instant;

use crossterm::event::{Event, KeyEvent, KeyEventKind, MouseEvent};
use ratatui::style::Style;

use crate::components::{
    Component, ConversationListComponent, ConversationPaneComponent, HelpOverlayComponent,
};
use crate::conversation::{ConversationDirectory, ConversationId};
use crate::dock::{Dock, MouseOutcome};
use crate::drivers::{InputDriver, OutputDriver};
use crate::event_loop::{ControlFlow, EventLoop, LoopEvent};
use crate::keybindings::{Action, KeyBindings};
use crate::log_buffer::{LogHandle, global_log};
use crate::notice::NoticeBoard;
use crate::session::ChatSession;
use crate::tray::{Tray, TrayAction};
use crate::ui::UiFrame;
use crate::window::{Intent, WindowId};

/// Everything the demo front end needs for one signed-in session.
pub struct DockApp<Dir: ConversationDirectory> {
    session: ChatSession,
    directory: Dir,
    dock: Dock,
    tray: Tray,
    notices: NoticeBoard,
    list: ConversationListComponent,
    help: HelpOverlayComponent,
    bindings: KeyBindings,
    log: Option<LogHandle>,
}

impl<Dir: ConversationDirectory> DockApp<Dir> {
    pub fn new(session: ChatSession, directory: Dir) -> Self {
        let bindings = KeyBindings::default();
        let dock = Dock::from_config(session.config());
        let notices = NoticeBoard::new(session.config().notice_duration);
        Self {
            help: HelpOverlayComponent::new(&bindings),
            session,
            directory,
            dock,
            tray: Tray::new(),
            notices,
            list: ConversationListComponent::new(),
            bindings,
            log: global_log(),
        }
    }

    /// Show the last line of `log` in the tray instead of the global log.
    pub fn with_log(mut self, log: LogHandle) -> Self {
        self.log = Some(log);
        self
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ChatSession {
        &mut self.session
    }

    pub fn dock(&self) -> &Dock {
        &self.dock
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn help_visible(&self) -> bool {
        self.help.visible()
    }

    pub fn into_session(self) -> ChatSession {
        self.session
    }

    fn dispatch(&mut self, intent: Intent) -> bool {
        self.session.dispatcher_mut().dispatch(intent)
    }

    /// Pull the latest snapshot into the view state.
    fn settle(&mut self, now: Instant) {
        let dispatcher = self.session.dispatcher();
        self.dock.sync(dispatcher);
        self.notices.observe(&dispatcher.snapshot(), now);
    }

    fn open_conversation(&mut self, id: ConversationId) {
        tracing::debug!(conversation = %id, "open requested");
        self.dispatch(Intent::OpenConversation(id));
    }

    pub fn tick(&mut self, now: Instant) {
        self.settle(now);
        self.notices.tick(now, self.session.dispatcher_mut());
        self.settle(now);
    }

    pub fn handle_event(&mut self, event: &Event) -> ControlFlow {
        let flow = match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(event, key),
            Event::Mouse(mouse) => {
                self.handle_mouse(event, mouse);
                ControlFlow::Continue
            }
            _ => ControlFlow::Continue,
        };
        self.settle(Instant::now());
        flow
    }

    fn handle_key(&mut self, event: &Event, key: &KeyEvent) -> ControlFlow {
        if self.help.visible() {
            self.help.handle_event(event);
            return ControlFlow::Continue;
        }
        let Some(action) = self.bindings.action_for_key(key) else {
            return ControlFlow::Continue;
        };
        tracing::trace!(%action, "key action");
        match action {
            Action::Quit => return ControlFlow::Quit,
            Action::OpenList => {
                self.dispatch(Intent::OpenList);
            }
            Action::CloseList => {
                self.dispatch(Intent::CloseList);
            }
            Action::OpenConversation(index) => {
                if let Some(id) = self.directory.nth(index) {
                    self.open_conversation(id);
                }
            }
            Action::MinimizeFocused => {
                self.dock.minimize_focused(self.session.dispatcher_mut());
            }
            Action::RestoreFirstMinimized => {
                let first = self
                    .session
                    .dispatcher()
                    .snapshot()
                    .minimized()
                    .first()
                    .and_then(|w| w.conversation_id().cloned());
                if let Some(id) = first {
                    self.dispatch(Intent::RestoreConversation(id));
                }
            }
            Action::CloseFocused => {
                self.dock.close_focused(self.session.dispatcher_mut());
            }
            Action::CloseAll => {
                self.dispatch(Intent::CloseAll);
            }
            Action::FocusNext => self.dock.focus_next(),
            Action::FocusPrev => self.dock.focus_prev(),
            Action::ListUp | Action::ListDown | Action::ListOpen => {
                if self.dock.focused() == Some(&WindowId::List) {
                    self.list.handle_event(event);
                    if let Some(id) = self.list.take_activated() {
                        self.open_conversation(id);
                    }
                }
            }
            Action::DismissNotice => {
                self.notices.dismiss(self.session.dispatcher_mut());
            }
            Action::ToggleHelp => self.help.toggle(),
        }
        ControlFlow::Continue
    }

    fn handle_mouse(&mut self, event: &Event, mouse: &MouseEvent) {
        if self.help.visible() {
            self.help.handle_event(event);
            return;
        }
        if let Some(action) = self.tray.hit_test(mouse) {
            match action {
                TrayAction::Restore(id) => {
                    self.dispatch(Intent::RestoreConversation(id));
                }
                TrayAction::Close(id) => {
                    self.dispatch(Intent::CloseConversation(id));
                }
                TrayAction::DismissNotice => {
                    self.notices.dismiss(self.session.dispatcher_mut());
                }
            }
            return;
        }
        if let MouseOutcome::Body(WindowId::List) =
            self.dock.handle_mouse(mouse, self.session.dispatcher_mut())
        {
            self.list.handle_event(event);
            if let Some(id) = self.list.take_activated() {
                self.open_conversation(id);
            }
        }
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>) {
        let area = frame.area();
        self.dock.tick(area);
        self.dock.sync(self.session.dispatcher());
        self.list.set_items(self.directory.conversations());

        for draw in self.dock.layout(&self.directory) {
            frame.fill(draw.rect.visible_in(area), Style::default());
            self.dock.decorator().render_window(
                frame,
                draw.rect,
                &draw.title,
                draw.focused,
                draw.minimizable,
            );
            match &draw.id {
                WindowId::List => self.list.render(frame, draw.body, draw.focused),
                WindowId::Conversation(id) => {
                    ConversationPaneComponent::new(id.clone(), draw.title.clone()).render(
                        frame,
                        draw.body,
                        draw.focused,
                    );
                }
            }
        }

        let snapshot = self.session.dispatcher().snapshot();
        let status = self.log.as_ref().and_then(LogHandle::last);
        self.tray.render(
            frame,
            Tray::area_for(area),
            &snapshot.minimized(),
            &self.directory,
            self.notices.current(),
            status.as_deref(),
        );
        self.help.render(frame, area, true);
    }
}

/// Run the dock until the user quits. Terminal modes are restored even when
/// the loop fails.
pub fn run_dock_app<D, O, Dir>(output: &mut O, driver: D, app: &mut DockApp<Dir>) -> io::Result<()>
where
    D: InputDriver,
    O: OutputDriver,
    Dir: ConversationDirectory,
{
    output.enter()?;
    let tick_interval = app.session().config().tick_interval;
    let mut event_loop = EventLoop::new(driver, tick_interval);
    let result = match event_loop.driver().set_mouse_capture(true) {
        Ok(()) => event_loop.run(|_, event| match event {
            LoopEvent::Tick(now) => {
                app.tick(now);
                output.draw(|mut frame| app.render(&mut frame))?;
                Ok(ControlFlow::Continue)
            }
            LoopEvent::Input(event) => Ok(app.handle_event(&event)),
        }),
        Err(err) => Err(err),
    };
    let restored = output.exit();
    result.and(restored)
}
