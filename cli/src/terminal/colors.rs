use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const SECONDARY: Color = Color::Cyan;
pub const ACCENT: Color = Color::Yellow;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

pub const CONNECTED: Color = Color::Green;
pub const FAILED: Color = Color::Red;
pub const URL: Color = Color::BrightBlue;
