//! Floating chat windows docked along the bottom-right edge of a terminal.
//!
//! The heart of the crate is [`window::reduce`], a pure transition function
//! over [`window::DockSnapshot`], and the [`window::Dispatcher`] that owns the
//! live snapshot. Everything else is presentation: slot placement, dragging,
//! the tray and the crossterm/ratatui front end.

pub mod components;
pub mod config;
pub mod constants;
pub mod conversation;
pub mod dock;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod keybindings;
pub mod layout;
pub mod log_buffer;
pub mod notice;
pub mod runner;
pub mod session;
pub mod theme;
pub mod tracing_sub;
pub mod tray;
pub mod ui;
pub mod window;

pub use config::{DockCli, DockConfig};
pub use conversation::{ConversationDirectory, ConversationId, StaticDirectory};
pub use error::{DockError, Result};
pub use session::ChatSession;
pub use window::{Dispatcher, DockSnapshot, Intent, WindowId};
