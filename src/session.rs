use crate::config::DockConfig;
use crate::window::Dispatcher;

/// Owns the dock for one signed-in user.
///
/// Signing in creates a fresh dispatcher; signing out closes every window
/// and drops it, so nothing leaks into the next session.
#[derive(Debug)]
pub struct ChatSession {
    user: String,
    config: DockConfig,
    dispatcher: Dispatcher,
}

impl ChatSession {
    pub fn sign_in(user: impl Into<String>, config: DockConfig) -> Self {
        let user = user.into();
        tracing::info!(%user, "chat session started");
        Self {
            user,
            config,
            dispatcher: Dispatcher::new(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn config(&self) -> &DockConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher {
        &mut self.dispatcher
    }

    /// Close everything and end the session. Returns how many windows were
    /// still open.
    pub fn sign_out(mut self) -> usize {
        let open = self.dispatcher.snapshot().windows().len();
        self.dispatcher.close_all();
        tracing::info!(user = %self.user, closed = open, "chat session ended");
        open
    }
}
