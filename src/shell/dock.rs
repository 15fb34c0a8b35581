use crossterm::event::{Event, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::theme;
use crate::ui::{UiFrame, rect_contains, safe_set_string};
use crate::window::{AppId, Phase, WindowRegistry};

#[derive(Debug, Clone, Copy)]
struct DockHit {
    id: AppId,
    rect: Rect,
}

/// Bottom launcher bar. One entry per applet; clicking launches a closed
/// window, restores a minimized one, or focuses an open one. Hit rects are
/// rebuilt every frame, so `begin_frame` must run before `render`.
#[derive(Debug, Default)]
pub struct Dock {
    area: Rect,
    hits: Vec<DockHit>,
}

impl Dock {
    pub fn new() -> Self {
        Self {
            area: Rect::default(),
            hits: Vec::new(),
        }
    }

    pub fn begin_frame(&mut self) {
        self.hits.clear();
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    pub fn render(
        &mut self,
        frame: &mut UiFrame<'_>,
        registry: &WindowRegistry,
        focused: Option<AppId>,
    ) {
        let area = self.area;
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
                    cell.set_style(Style::default().bg(theme::bar_bg()));
                }
            }
        }

        // Center the entries as a block.
        let order = registry.launch_order();
        let chunks: Vec<(AppId, String)> = order
            .iter()
            .map(|&id| {
                let marker = match registry.phase(id) {
                    Phase::Open => "•",
                    Phase::Minimized => "▾",
                    Phase::Closed => " ",
                };
                (id, format!(" {} {}{marker}", id.glyph(), id.label()))
            })
            .collect();
        let total: u16 = chunks
            .iter()
            .map(|(_, chunk)| chunk.chars().count() as u16)
            .sum();
        let mut x = if total >= area.width {
            area.x
        } else {
            area.x + (area.width - total) / 2
        };
        let y = area.y;
        let max_x = area.x.saturating_add(area.width);
        for (id, chunk) in chunks {
            let chunk_width = chunk.chars().count() as u16;
            if x.saturating_add(chunk_width) > max_x {
                break;
            }
            let phase = registry.phase(id);
            let style = if focused == Some(id) && phase == Phase::Open {
                Style::default()
                    .bg(theme::dock_focused_bg())
                    .fg(theme::dock_focused_fg())
                    .add_modifier(Modifier::BOLD)
            } else if phase == Phase::Closed {
                Style::default()
                    .bg(theme::bar_bg())
                    .fg(theme::dock_inactive_fg())
            } else {
                Style::default()
                    .bg(theme::bar_bg())
                    .fg(theme::dock_open_fg())
            };
            safe_set_string(buffer, bounds, x, y, &chunk, style);
            self.hits.push(DockHit {
                id,
                rect: Rect {
                    x,
                    y,
                    width: chunk_width,
                    height: 1,
                },
            });
            x = x.saturating_add(chunk_width);
        }
    }

    /// Applet under a pointer-down event, if any.
    pub fn hit_test(&self, event: &Event) -> Option<AppId> {
        let Event::Mouse(mouse) = event else {
            return None;
        };
        if !matches!(mouse.kind, MouseEventKind::Down(_)) {
            return None;
        }
        self.hits
            .iter()
            .find(|hit| rect_contains(hit.rect, mouse.column, mouse.row))
            .map(|hit| hit.id)
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        rect_contains(self.area, column, row)
    }
}
