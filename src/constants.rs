//! Shared crate-wide constants.

use std::time::Duration;

/// Most windows that may be on screen at once: the chat list plus three
/// conversations.
pub const MAX_VISIBLE_WINDOWS: usize = 4;

/// Most conversation windows that may exist at once, counting both the
/// visible ones and the ones parked in the tray.
pub const MAX_CONVERSATION_WINDOWS: usize = 9;

/// Minimum number of cells a dragged window must keep inside each viewport
/// edge so the user can grab its header again.
pub const MIN_FLOATING_VISIBLE_MARGIN: u16 = 4;

/// Distance (in columns) between the right viewport edge and the window in
/// slot 0.
pub const DEFAULT_BASE_OFFSET: u16 = 1;

/// Gap (in columns) between two neighbouring slots.
pub const DEFAULT_WINDOW_SPACING: u16 = 1;

/// Default chat window width in columns.
pub const DEFAULT_WINDOW_WIDTH: u16 = 30;

/// Default chat window height in rows.
pub const DEFAULT_WINDOW_HEIGHT: u16 = 14;

/// Rows kept free below the stacked windows; the tray lives there.
pub const DEFAULT_BOTTOM_OFFSET: u16 = 1;

/// How long a limit notice stays in the tray before it is reset.
pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_millis(3000);

/// Input poll interval for the event loop. Idle ticks redraw, re-clamp
/// dragged windows and expire notices.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(16);
