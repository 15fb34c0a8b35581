use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::theme;
use crate::ui::{UiFrame, rect_contains, safe_set_string};
use crate::window::{AppId, Point};

/// Icons are data-described records, not widgets: a glyph, a label, the
/// window they launch, and a coordinate pair independent of the registry.
#[derive(Debug, Clone)]
pub struct DesktopIcon {
    pub id: AppId,
    pub glyph: &'static str,
    pub label: &'static str,
    pub position: Point,
}

impl DesktopIcon {
    /// Icons render as two rows: glyph, then label.
    fn size(&self) -> (u16, u16) {
        let width = self.label.chars().count().max(2) as u16;
        (width, 2)
    }
}

#[derive(Debug, Default)]
pub struct Desktop {
    icons: Vec<DesktopIcon>,
}

impl Desktop {
    /// Default column layout down the left edge of the desktop area.
    pub fn new(area: Rect) -> Self {
        let mut icons = Vec::new();
        let step = 3i32;
        let per_column = ((area.height.max(3) as i32 - 1) / step).max(1);
        for (idx, id) in AppId::ALL.into_iter().enumerate() {
            let column = idx as i32 / per_column;
            let row = idx as i32 % per_column;
            icons.push(DesktopIcon {
                id,
                glyph: id.glyph(),
                label: id.label(),
                position: Point::new(
                    area.x as i32 + 2 + column * 14,
                    area.y as i32 + 1 + row * step,
                ),
            });
        }
        Self { icons }
    }

    pub fn icons(&self) -> &[DesktopIcon] {
        &self.icons
    }

    pub fn icon(&self, index: usize) -> Option<&DesktopIcon> {
        self.icons.get(index)
    }

    pub fn set_icon_position(&mut self, index: usize, position: Point) {
        if let Some(icon) = self.icons.get_mut(index) {
            icon.position = position;
        }
    }

    fn icon_rect(&self, icon: &DesktopIcon, bounds: Rect) -> Rect {
        let (width, height) = icon.size();
        let left = icon.position.x.max(bounds.x as i32);
        let top = icon.position.y.max(bounds.y as i32);
        let right = (icon.position.x + width as i32).min((bounds.x + bounds.width) as i32);
        let bottom = (icon.position.y + height as i32).min((bounds.y + bounds.height) as i32);
        if right <= left || bottom <= top {
            return Rect::default();
        }
        Rect {
            x: left as u16,
            y: top as u16,
            width: (right - left) as u16,
            height: (bottom - top) as u16,
        }
    }

    /// Icon index under the pointer, topmost (last) first.
    pub fn hit_test(&self, column: u16, row: u16, bounds: Rect) -> Option<usize> {
        self.icons.iter().enumerate().rev().find_map(|(idx, icon)| {
            let rect = self.icon_rect(icon, bounds);
            (rect.width > 0 && rect_contains(rect, column, row)).then_some(idx)
        })
    }

    pub fn render(&self, frame: &mut UiFrame<'_>, bounds: Rect) {
        let buffer = frame.buffer_mut();
        let clip = bounds.intersection(buffer.area);
        if clip.width == 0 || clip.height == 0 {
            return;
        }
        for icon in &self.icons {
            let x = icon.position.x;
            let glyph_y = icon.position.y;
            let label_y = icon.position.y + 1;
            let in_clip = |px: i32, py: i32| {
                px >= clip.x as i32
                    && px < (clip.x + clip.width) as i32
                    && py >= clip.y as i32
                    && py < (clip.y + clip.height) as i32
            };
            if in_clip(x, glyph_y) {
                safe_set_string(
                    buffer,
                    clip,
                    x as u16,
                    glyph_y as u16,
                    icon.glyph,
                    Style::default().fg(theme::icon_fg()),
                );
            }
            if in_clip(x, label_y) {
                safe_set_string(
                    buffer,
                    clip,
                    x as u16,
                    label_y as u16,
                    icon.label,
                    Style::default().fg(theme::icon_label_fg()),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Rect {
        Rect {
            x: 0,
            y: 1,
            width: 100,
            height: 28,
        }
    }

    #[test]
    fn every_applet_gets_an_icon() {
        let desktop = Desktop::new(bounds());
        assert_eq!(desktop.icons().len(), AppId::ALL.len());
    }

    #[test]
    fn hit_test_finds_the_icon_under_the_pointer() {
        let desktop = Desktop::new(bounds());
        let icon = &desktop.icons()[0];
        let hit = desktop.hit_test(icon.position.x as u16, icon.position.y as u16, bounds());
        assert_eq!(hit, Some(0));
        assert_eq!(desktop.hit_test(99, 27, bounds()), None);
    }

    #[test]
    fn moved_icons_hit_test_at_their_new_position() {
        let mut desktop = Desktop::new(bounds());
        desktop.set_icon_position(2, Point::new(50, 10));
        assert_eq!(desktop.hit_test(50, 10, bounds()), Some(2));
        assert_eq!(desktop.hit_test(50, 11, bounds()), Some(2));
    }

    #[test]
    fn offscreen_icons_have_no_hit_rect() {
        let mut desktop = Desktop::new(bounds());
        desktop.set_icon_position(0, Point::new(-40, -40));
        let icon = desktop.icon(0).unwrap();
        assert_eq!(desktop.icon_rect(icon, bounds()), Rect::default());
    }
}
