use chrono::{Local, Timelike};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::theme;
use crate::ui::{UiFrame, safe_set_string, truncate_to_width};

/// Top bar: product label and a day/night glyph on the left, clock and
/// hostname on the right. Pure rendering, no hit targets.
#[derive(Debug, Default)]
pub struct SystemBar {
    hostname: Option<String>,
}

impl SystemBar {
    pub fn new() -> Self {
        Self { hostname: None }
    }

    fn hostname(&mut self) -> String {
        // Cache the hostname to avoid a system call every frame.
        if let Some(host) = &self.hostname {
            return host.clone();
        }
        let host = hostname::get()
            .ok()
            .and_then(|s| s.into_string().ok())
            .unwrap_or_else(|| "unknown-host".to_string());
        self.hostname = Some(host.clone());
        host
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let buffer = frame.buffer_mut();
        let bounds = area.intersection(buffer.area);
        if bounds.width == 0 || bounds.height == 0 {
            return;
        }
        for y in bounds.y..bounds.y.saturating_add(bounds.height) {
            for x in bounds.x..bounds.x.saturating_add(bounds.width) {
                if let Some(cell) = buffer.cell_mut((x, y)) {
                    cell.set_symbol(" ");
                    cell.set_style(Style::default().bg(theme::bar_bg()).fg(theme::bar_fg()));
                }
            }
        }

        let now = Local::now();
        let daytime = (6..18).contains(&now.hour());
        let glyph = if daytime { "☀" } else { "☾" };
        const PKG_NAME: &str = env!("CARGO_PKG_NAME");
        let left = format!(" {PKG_NAME} {glyph}");
        safe_set_string(
            buffer,
            bounds,
            area.x,
            area.y,
            &left,
            Style::default()
                .bg(theme::bar_bg())
                .fg(theme::bar_fg())
                .add_modifier(Modifier::BOLD),
        );

        let host = self.hostname();
        let right = format!(
            "{} · {} · {host} ",
            now.format("%H:%M:%S"),
            now.format("%a %d %b %Y"),
        );
        let text = truncate_to_width(&right, bounds.width as usize);
        let text_width = text.chars().count() as u16;
        let start_x = if text_width >= bounds.width {
            bounds.x
        } else {
            bounds
                .x
                .saturating_add(bounds.width)
                .saturating_sub(text_width)
        };
        safe_set_string(
            buffer,
            bounds,
            start_x,
            area.y,
            &text,
            Style::default().bg(theme::bar_bg()).fg(theme::bar_fg()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;

    #[test]
    fn renders_brand_and_caches_hostname() {
        let area = Rect {
            x: 0,
            y: 0,
            width: 60,
            height: 1,
        };
        let mut buf = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buf);
        let mut bar = SystemBar::new();
        assert!(bar.hostname.is_none());
        bar.render(&mut frame, area);
        assert!(bar.hostname.is_some());
        let first = bar.hostname.clone();

        let mut frame = UiFrame::from_parts(area, &mut buf);
        bar.render(&mut frame, area);
        assert_eq!(bar.hostname, first);

        let mut row = String::new();
        for x in 0..area.width {
            row.push_str(buf.cell((x, 0)).unwrap().symbol());
        }
        assert!(row.contains(env!("CARGO_PKG_NAME")));
    }
}
