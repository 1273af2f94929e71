use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

pub const FOCUSED: Color = Color::Rgb(0xEE, 0x6F, 0xF8);
pub const BORDER: Color = Color::Rgb(0xDD, 0xDD, 0xDD);
pub const MUTED: Color = Color::DarkGray;
pub const BANNER_BG: Color = Color::Indexed(62);
pub const BANNER_FG: Color = Color::Indexed(230);

const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

pub fn spinner_frame(tick: usize) -> &'static str {
    SPINNER[tick % SPINNER.len()]
}

pub fn border(focused: bool) -> (BorderType, Style) {
    if focused {
        (BorderType::Thick, Style::default().fg(FOCUSED))
    } else {
        (BorderType::Rounded, Style::default().fg(BORDER))
    }
}

pub fn highlight() -> Style {
    Style::default().fg(FOCUSED).add_modifier(Modifier::BOLD)
}

pub fn banner() -> Style {
    Style::default()
        .bg(BANNER_BG)
        .fg(BANNER_FG)
        .add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}
