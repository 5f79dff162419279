//! Runtime configuration for the dock and its command-line surface.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use indoc::indoc;
use thiserror::Error;

use crate::constants::{
    DEFAULT_BASE_OFFSET, DEFAULT_BOTTOM_OFFSET, DEFAULT_NOTICE_DURATION, DEFAULT_TICK_INTERVAL,
    DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_SPACING, DEFAULT_WINDOW_WIDTH,
    MIN_FLOATING_VISIBLE_MARGIN,
};
use crate::layout::PlacementConfig;

const MIN_WINDOW_WIDTH: u16 = 12;
const MIN_WINDOW_HEIGHT: u16 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("window width must be at least {min} columns, got {got}")]
    WindowTooNarrow { got: u16, min: u16 },
    #[error("window height must be at least {min} rows, got {got}")]
    WindowTooShort { got: u16, min: u16 },
    #[error("tick interval must be between 1 and 1000 milliseconds")]
    TickOutOfRange,
    #[error("notice duration must be between 100 milliseconds and 60 seconds")]
    NoticeOutOfRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockConfig {
    pub placement: PlacementConfig,
    /// Cells a dragged window keeps inside each viewport edge.
    pub drag_margin: u16,
    pub notice_duration: Duration,
    pub tick_interval: Duration,
    pub log_file: Option<PathBuf>,
}

impl Default for DockConfig {
    fn default() -> Self {
        Self {
            placement: PlacementConfig::default(),
            drag_margin: MIN_FLOATING_VISIBLE_MARGIN,
            notice_duration: DEFAULT_NOTICE_DURATION,
            tick_interval: DEFAULT_TICK_INTERVAL,
            log_file: None,
        }
    }
}

impl DockConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.placement.window_width < MIN_WINDOW_WIDTH {
            return Err(ConfigError::WindowTooNarrow {
                got: self.placement.window_width,
                min: MIN_WINDOW_WIDTH,
            });
        }
        if self.placement.window_height < MIN_WINDOW_HEIGHT {
            return Err(ConfigError::WindowTooShort {
                got: self.placement.window_height,
                min: MIN_WINDOW_HEIGHT,
            });
        }
        if !(Duration::from_millis(1)..=Duration::from_millis(1000)).contains(&self.tick_interval)
        {
            return Err(ConfigError::TickOutOfRange);
        }
        if !(Duration::from_millis(100)..=Duration::from_secs(60)).contains(&self.notice_duration)
        {
            return Err(ConfigError::NoticeOutOfRange);
        }
        Ok(())
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "chat-dock",
    version = env!("CARGO_PKG_VERSION"),
    about = "Floating chat windows stacked along the terminal edge",
    long_about = indoc! {"
        Floating chat windows stacked along the right edge of the terminal.

        Open the chat list with `l`, open conversations with the number keys,
        drag windows by their header and park them in the tray with `_`.
        At most four windows are on screen and nine conversations open.
    "}
)]
pub struct DockCli {
    /// Width of every chat window, in columns.
    #[arg(long, value_name = "COLUMNS", default_value_t = DEFAULT_WINDOW_WIDTH)]
    pub window_width: u16,

    /// Height of every chat window, in rows.
    #[arg(long, value_name = "ROWS", default_value_t = DEFAULT_WINDOW_HEIGHT)]
    pub window_height: u16,

    /// Gap between the right terminal edge and the first window.
    #[arg(long, value_name = "COLUMNS", default_value_t = DEFAULT_BASE_OFFSET)]
    pub base_offset: u16,

    /// Gap between neighbouring windows.
    #[arg(long, value_name = "COLUMNS", default_value_t = DEFAULT_WINDOW_SPACING)]
    pub spacing: u16,

    /// Cells a dragged window must keep on screen.
    #[arg(long, value_name = "CELLS", default_value_t = MIN_FLOATING_VISIBLE_MARGIN)]
    pub drag_margin: u16,

    /// How long limit notices stay in the tray.
    #[arg(long, value_name = "MILLIS", default_value_t = DEFAULT_NOTICE_DURATION.as_millis() as u64)]
    pub notice_ms: u64,

    /// Input poll interval.
    #[arg(long, value_name = "MILLIS", default_value_t = DEFAULT_TICK_INTERVAL.as_millis() as u64)]
    pub tick_ms: u64,

    /// Write logs to this file instead of the in-app log line.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl TryFrom<&DockCli> for DockConfig {
    type Error = ConfigError;

    fn try_from(cli: &DockCli) -> Result<Self, Self::Error> {
        let config = DockConfig {
            placement: PlacementConfig {
                base_offset: cli.base_offset,
                window_width: cli.window_width,
                window_height: cli.window_height,
                spacing: cli.spacing,
                bottom_offset: DEFAULT_BOTTOM_OFFSET,
            },
            drag_margin: cli.drag_margin,
            notice_duration: Duration::from_millis(cli.notice_ms),
            tick_interval: Duration::from_millis(cli.tick_ms),
            log_file: cli.log_file.clone(),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(DockConfig::default().validate(), Ok(()));
    }

    #[test]
    fn cli_defaults_match_config_defaults() {
        let cli = DockCli::parse_from(["chat-dock"]);
        let config = DockConfig::try_from(&cli).expect("valid defaults");
        assert_eq!(config, DockConfig::default());
    }

    #[test]
    fn narrow_window_is_rejected() {
        let cli = DockCli::parse_from(["chat-dock", "--window-width", "3"]);
        assert_eq!(
            DockConfig::try_from(&cli),
            Err(ConfigError::WindowTooNarrow { got: 3, min: 12 })
        );
    }

    #[test]
    fn zero_tick_is_rejected() {
        let cli = DockCli::parse_from(["chat-dock", "--tick-ms", "0"]);
        assert_eq!(DockConfig::try_from(&cli), Err(ConfigError::TickOutOfRange));
    }

    #[test]
    fn log_file_is_carried_through() {
        let cli = DockCli::parse_from(["chat-dock", "--log-file", "/tmp/dock.log"]);
        let config = DockConfig::try_from(&cli).expect("valid");
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/dock.log")));
    }
}
