use ratatui::style::Color;

// Centralized theme colors. RGB values are mapped down to xterm-256 indices
// when the terminal does not advertise truecolor support.

pub const ACCENT_RGB: (u8, u8, u8) = (80, 160, 255);
pub const ACCENT_ALT_RGB: (u8, u8, u8) = (255, 165, 0);

pub fn rgb_to_color(rgb: (u8, u8, u8)) -> Color {
    let (r, g, b) = rgb;
    if let Ok(var) = std::env::var("COLORTERM") {
        let lv = var.to_lowercase();
        if lv.contains("truecolor") || lv.contains("24bit") {
            return Color::Rgb(r, g, b);
        }
    }
    Color::Indexed(rgb_to_xterm_index(r, g, b))
}

/// Nearest xterm-256 index for an RGB triple, considering both the 6x6x6
/// color cube (16..=231) and the grayscale ramp (232..=255).
fn rgb_to_xterm_index(r: u8, g: u8, b: u8) -> u8 {
    let scale = |v: u8| ((v as u16 * 5 + 127) / 255) as i32;
    let expand = |c: i32| [0u8, 95, 135, 175, 215, 255][c as usize];
    let (r6, g6, b6) = (scale(r), scale(g), scale(b));
    let cube_index = (16 + 36 * r6 + 6 * g6 + b6) as u8;
    let (cr, cg, cb) = (expand(r6), expand(g6), expand(b6));

    let gray_step = ((r as u16 + g as u16 + b as u16) / 3).min(255) as i32;
    let gray_level = ((gray_step - 8).clamp(0, 230) / 10) as u8;
    let gray_value = 8 + gray_level * 10;

    let dist = |x: u8, y: u8, z: u8| {
        let dr = r as i32 - x as i32;
        let dg = g as i32 - y as i32;
        let db = b as i32 - z as i32;
        dr * dr + dg * dg + db * db
    };
    if dist(gray_value, gray_value, gray_value) < dist(cr, cg, cb) {
        232 + gray_level
    } else {
        cube_index
    }
}

pub fn accent() -> Color {
    rgb_to_color(ACCENT_RGB)
}

pub fn accent_alt() -> Color {
    rgb_to_color(ACCENT_ALT_RGB)
}

// Desktop surface
pub fn desktop_bg() -> Color {
    Color::Reset
}
pub fn icon_fg() -> Color {
    Color::White
}
pub fn icon_label_fg() -> Color {
    Color::Gray
}

// System bar / dock
pub fn bar_bg() -> Color {
    Color::DarkGray
}
pub fn bar_fg() -> Color {
    Color::White
}
pub fn dock_inactive_fg() -> Color {
    Color::Gray
}
pub fn dock_open_fg() -> Color {
    Color::White
}
pub fn dock_focused_bg() -> Color {
    Color::Gray
}
pub fn dock_focused_fg() -> Color {
    Color::Black
}

// Window chrome
pub fn header_bg() -> Color {
    Color::Blue
}
pub fn header_fg() -> Color {
    Color::White
}
pub fn header_inactive_bg() -> Color {
    Color::DarkGray
}
pub fn header_inactive_fg() -> Color {
    Color::White
}
pub fn window_border() -> Color {
    Color::DarkGray
}
pub fn window_bg() -> Color {
    Color::Black
}

// Notifications
pub fn toast_bg() -> Color {
    Color::DarkGray
}
pub fn toast_fg() -> Color {
    Color::White
}

// Success / indicator
pub fn success_fg() -> Color {
    Color::Green
}

// Dialog / help overlay
pub fn dialog_bg() -> Color {
    Color::Black
}
pub fn dialog_fg() -> Color {
    Color::White
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_maps_to_rgb_or_indexed() {
        match rgb_to_color(ACCENT_RGB) {
            Color::Rgb(_, _, _) | Color::Indexed(_) => {}
            other => panic!("unexpected color variant: {other:?}"),
        }
    }

    #[test]
    fn pure_gray_prefers_gray_ramp() {
        let idx = rgb_to_xterm_index(128, 128, 128);
        assert!((232..=255).contains(&idx));
    }

    #[test]
    fn saturated_color_prefers_cube() {
        let idx = rgb_to_xterm_index(255, 0, 0);
        assert!((16..=231).contains(&idx));
    }
}
