use ratatui::style::Color;

// Centralized theme colors, kept as small helpers so renderers never
// hard-code a palette.

pub const ACCENT_RGB: (u8, u8, u8) = (200, 100, 0);

pub fn accent() -> Color {
    Color::Rgb(ACCENT_RGB.0, ACCENT_RGB.1, ACCENT_RGB.2)
}

// Tray
pub fn tray_bg() -> Color {
    Color::DarkGray
}
pub fn tray_fg() -> Color {
    Color::White
}
pub fn tray_chip_bg() -> Color {
    Color::Gray
}
pub fn tray_chip_fg() -> Color {
    Color::Black
}
pub fn tray_status_fg() -> Color {
    Color::Gray
}

// Notice
pub fn notice_bg() -> Color {
    accent()
}
pub fn notice_fg() -> Color {
    Color::Black
}

// Dialog / help
pub fn dialog_bg() -> Color {
    Color::Black
}
pub fn dialog_fg() -> Color {
    Color::White
}

// Decorator
pub fn decorator_header_bg() -> Color {
    Color::Blue
}
pub fn decorator_header_fg() -> Color {
    Color::White
}
pub fn decorator_inactive_header_bg() -> Color {
    Color::DarkGray
}
pub fn decorator_border() -> Color {
    Color::DarkGray
}

// Conversation list
pub fn list_selected_bg() -> Color {
    Color::Gray
}
pub fn list_selected_fg() -> Color {
    Color::Black
}
pub fn list_group_fg() -> Color {
    Color::DarkGray
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_uses_accent() {
        assert_eq!(notice_bg(), Color::Rgb(200, 100, 0));
    }
}
