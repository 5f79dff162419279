//! Transient messages for the two limit flags.
//!
//! The store only raises the flags; something has to show them to the user
//! and lower them again. [`NoticeBoard`] watches snapshots, keeps the notice
//! up for a fixed time and then dispatches the matching reset intent.

use std::fmt;
use std::time::{Duration, Instant};

use crate::constants::{MAX_CONVERSATION_WINDOWS, MAX_VISIBLE_WINDOWS};
use crate::window::{Dispatcher, DockSnapshot, Intent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitNotice {
    VisibleLimit,
    TotalLimit,
}

impl LimitNotice {
    /// Notice implied by the snapshot flags. At most one flag is ever set.
    pub fn from_snapshot(snapshot: &DockSnapshot) -> Option<Self> {
        if snapshot.total_limit_reached() {
            Some(LimitNotice::TotalLimit)
        } else if snapshot.visible_limit_reached() {
            Some(LimitNotice::VisibleLimit)
        } else {
            None
        }
    }

    pub fn reset_intent(self) -> Intent {
        match self {
            LimitNotice::VisibleLimit => Intent::ResetVisibleLimitWarning,
            LimitNotice::TotalLimit => Intent::ResetTotalLimitWarning,
        }
    }
}

impl fmt::Display for LimitNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitNotice::VisibleLimit => write!(
                f,
                "Only {MAX_VISIBLE_WINDOWS} chat windows fit on screen. Minimize or close one first."
            ),
            LimitNotice::TotalLimit => write!(
                f,
                "You can keep {MAX_CONVERSATION_WINDOWS} conversations open. Close one to open another."
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActiveNotice {
    notice: LimitNotice,
    shown_at: Instant,
}

#[derive(Debug, Clone)]
pub struct NoticeBoard {
    duration: Duration,
    active: Option<ActiveNotice>,
}

impl NoticeBoard {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            active: None,
        }
    }

    pub fn current(&self) -> Option<LimitNotice> {
        self.active.map(|active| active.notice)
    }

    /// Sync with the latest snapshot. A newly raised flag starts the timer.
    pub fn observe(&mut self, snapshot: &DockSnapshot, now: Instant) {
        match LimitNotice::from_snapshot(snapshot) {
            Some(notice) if self.current() != Some(notice) => {
                self.active = Some(ActiveNotice {
                    notice,
                    shown_at: now,
                });
            }
            Some(_) => {}
            None => self.active = None,
        }
    }

    /// Reset intent for a notice whose time is up.
    pub fn expired(&self, now: Instant) -> Option<Intent> {
        let active = self.active?;
        (now.saturating_duration_since(active.shown_at) >= self.duration)
            .then(|| active.notice.reset_intent())
    }

    /// Lower the flag once the notice has been shown long enough.
    pub fn tick(&mut self, now: Instant, dispatcher: &mut Dispatcher) -> bool {
        let Some(intent) = self.expired(now) else {
            return false;
        };
        self.active = None;
        dispatcher.dispatch(intent)
    }

    /// Dismiss the current notice right away.
    pub fn dismiss(&mut self, dispatcher: &mut Dispatcher) -> bool {
        let Some(active) = self.active.take() else {
            return false;
        };
        dispatcher.dispatch(active.notice.reset_intent())
    }
}
