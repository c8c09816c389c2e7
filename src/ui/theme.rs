use crate::playground::state::ThemeMode;
use ratatui::style::Color;

pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub panel_bg: Color,        // Problem and editor panes
    pub primary: Color,         // Header bar and buttons
    pub primary_fg: Color,      // Text on primary
    pub comment: Color,         // Grey
    pub success: Color,         // Green
    pub error: Color,           // Red
    pub disabled: Color,        // Disabled button background
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
    pub line_number: Color,
}

pub const LIGHT_THEME: Theme = Theme {
    bg: Color::Rgb(255, 255, 255),
    fg: Color::Rgb(0, 0, 0),
    panel_bg: Color::Rgb(245, 245, 245),
    primary: Color::Rgb(0, 112, 243), // #0070f3
    primary_fg: Color::Rgb(255, 255, 255),
    comment: Color::Rgb(110, 110, 110),
    success: Color::Rgb(46, 125, 50),
    error: Color::Rgb(198, 40, 40),
    disabled: Color::Rgb(204, 204, 204),
    border_focused: Color::Rgb(0, 91, 181), // #005bb5
    border_normal: Color::Rgb(204, 204, 204),
    current_line_bg: Color::Rgb(232, 240, 254),
    line_number: Color::Rgb(150, 150, 150),
};

pub const DARK_THEME: Theme = Theme {
    bg: Color::Rgb(30, 30, 46),
    fg: Color::Rgb(205, 214, 244),
    panel_bg: Color::Rgb(36, 36, 54),
    primary: Color::Rgb(137, 180, 250),
    primary_fg: Color::Rgb(17, 17, 27),
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    disabled: Color::Rgb(69, 71, 90),
    border_focused: Color::Rgb(249, 226, 175),
    border_normal: Color::Rgb(108, 112, 134),
    current_line_bg: Color::Rgb(50, 50, 70),
    line_number: Color::Rgb(108, 112, 134),
};

/// Palette for a theme mode
pub fn theme_for(mode: ThemeMode) -> &'static Theme {
    match mode {
        ThemeMode::Light => &LIGHT_THEME,
        ThemeMode::Dark => &DARK_THEME,
    }
}
