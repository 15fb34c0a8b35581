use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::theme;
use crate::ui::UiFrame;

use super::{Point, Size};

/// What a pointer-down on the window frame means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    /// Grab on the title row: start a move gesture.
    Drag,
    Minimize,
    Close,
    /// Not on the chrome; the content area owns the event.
    None,
}

/// Renders window chrome and resolves clicks on it.
///
/// Frame layout, in rows: top border, title row (with the minimize/close
/// buttons at the right edge), content, bottom border. All drawing is done
/// in signed coordinates so a partially off-screen window renders its
/// visible slice correctly.
pub trait WindowDecorator: std::fmt::Debug {
    fn render_window(
        &self,
        frame: &mut UiFrame<'_>,
        origin: Point,
        size: Size,
        bounds: Rect,
        title: &str,
        focused: bool,
    );

    fn hit_test(&self, origin: Point, size: Size, column: u16, row: u16) -> HeaderAction;
}

const MINIMIZE_BUTTON: &str = "[-]";
const CLOSE_BUTTON: &str = "[x]";
const BUTTON_WIDTH: i32 = 3;

#[derive(Debug)]
pub struct DefaultDecorator;

impl DefaultDecorator {
    /// Inclusive column ranges of the two header buttons, right-aligned
    /// inside the border.
    fn button_columns(origin: Point, size: Size) -> Option<(i32, i32, i32)> {
        if size.width < crate::constants::MIN_WINDOW_WIDTH {
            return None;
        }
        let inner_right = origin.x + size.width as i32 - 2;
        let close_start = inner_right - BUTTON_WIDTH + 1;
        let minimize_start = close_start - BUTTON_WIDTH;
        Some((minimize_start, close_start, inner_right))
    }
}

impl WindowDecorator for DefaultDecorator {
    fn render_window(
        &self,
        frame: &mut UiFrame<'_>,
        origin: Point,
        size: Size,
        bounds: Rect,
        title: &str,
        focused: bool,
    ) {
        if size.width < 2 || size.height < 2 {
            return;
        }
        let buffer = frame.buffer_mut();
        let clip = bounds.intersection(buffer.area);
        if clip.width == 0 || clip.height == 0 {
            return;
        }
        let in_clip = |x: i32, y: i32| {
            x >= clip.x as i32
                && x < (clip.x + clip.width) as i32
                && y >= clip.y as i32
                && y < (clip.y + clip.height) as i32
        };
        let mut put = |x: i32, y: i32, symbol: &str, style: Style| {
            if in_clip(x, y)
                && let Some(cell) = buffer.cell_mut((x as u16, y as u16))
            {
                cell.set_symbol(symbol);
                cell.set_style(style);
            }
        };

        let left = origin.x;
        let top = origin.y;
        let right = origin.x + size.width as i32 - 1;
        let bottom = origin.y + size.height as i32 - 1;
        let border_style = Style::default().fg(theme::window_border());
        let header_style = if focused {
            Style::default()
                .bg(theme::header_bg())
                .fg(theme::header_fg())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .bg(theme::header_inactive_bg())
                .fg(theme::header_inactive_fg())
        };

        for x in left..=right {
            let (top_sym, bottom_sym) = if x == left {
                ("┌", "└")
            } else if x == right {
                ("┐", "┘")
            } else {
                ("─", "─")
            };
            put(x, top, top_sym, border_style);
            put(x, bottom, bottom_sym, border_style);
        }
        for y in (top + 1)..bottom {
            put(left, y, "│", border_style);
            put(right, y, "│", border_style);
        }

        // Title row with right-aligned buttons.
        let header_y = top + 1;
        if header_y < bottom {
            for x in (left + 1)..right {
                put(x, header_y, " ", header_style);
            }
            let buttons = Self::button_columns(origin, size);
            let title_end = buttons.map(|(min_start, _, _)| min_start - 1).unwrap_or(right);
            let title_width = (title_end - (left + 2)).max(0) as usize;
            let title_text = crate::ui::truncate_to_width(title, title_width);
            for (idx, ch) in title_text.chars().enumerate() {
                put(left + 2 + idx as i32, header_y, &ch.to_string(), header_style);
            }
            if let Some((minimize_start, close_start, _)) = buttons {
                for (idx, ch) in MINIMIZE_BUTTON.chars().enumerate() {
                    put(minimize_start + idx as i32, header_y, &ch.to_string(), header_style);
                }
                for (idx, ch) in CLOSE_BUTTON.chars().enumerate() {
                    put(close_start + idx as i32, header_y, &ch.to_string(), header_style);
                }
            }
        }

        // Content backdrop.
        for y in (top + 2)..bottom {
            for x in (left + 1)..right {
                put(x, y, " ", Style::default().bg(theme::window_bg()));
            }
        }
    }

    fn hit_test(&self, origin: Point, size: Size, column: u16, row: u16) -> HeaderAction {
        let col = column as i32;
        let row = row as i32;
        let left = origin.x;
        let top = origin.y;
        let right = origin.x + size.width as i32 - 1;
        let bottom = origin.y + size.height as i32 - 1;
        if col < left || col > right || row < top || row > bottom {
            return HeaderAction::None;
        }
        let header_y = top + 1;
        if row == header_y {
            if let Some((minimize_start, close_start, inner_right)) =
                Self::button_columns(origin, size)
            {
                if col >= close_start && col <= inner_right {
                    return HeaderAction::Close;
                }
                if col >= minimize_start && col < close_start {
                    return HeaderAction::Minimize;
                }
            }
            return HeaderAction::Drag;
        }
        if row == top || row == bottom || col == left || col == right {
            // Border clicks only raise the window.
            return HeaderAction::Drag;
        }
        HeaderAction::None
    }
}
