use indoc::indoc;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::theme;
use crate::ui::{UiFrame, safe_set_string};

const HELP_TEXT: &str = indoc! {"
    Keys
      F1          toggle this help
      Tab         focus next window
      Shift+Tab   focus previous window
      Ctrl+W      close focused window
      Ctrl+B      minimize focused window
      Ctrl+Q      quit

    Mouse
      click icon or dock entry   open / restore
      drag title bar             move window
      drag desktop icon          move icon
      [-] / [x]                  minimize / close
"};

/// F1 overlay with the keybinding reference. Any key or click dismisses it.
#[derive(Debug, Default)]
pub struct HelpOverlay {
    visible: bool,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self { visible: false }
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn render(&self, frame: &mut UiFrame<'_>, bounds: Rect) {
        if !self.visible {
            return;
        }
        let lines: Vec<&str> = HELP_TEXT.lines().collect();
        let inner_width = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0) as u16;
        let width = (inner_width + 4).min(bounds.width);
        let height = (lines.len() as u16 + 2).min(bounds.height);
        if width == 0 || height == 0 {
            return;
        }
        let x = bounds.x + (bounds.width.saturating_sub(width)) / 2;
        let y = bounds.y + (bounds.height.saturating_sub(height)) / 2;
        let area = Rect {
            x,
            y,
            width,
            height,
        };
        let buffer = frame.buffer_mut();
        let clip = area.intersection(buffer.area);
        if clip.width == 0 || clip.height == 0 {
            return;
        }
        for yy in clip.y..clip.y + clip.height {
            for xx in clip.x..clip.x + clip.width {
                if let Some(cell) = buffer.cell_mut((xx, yy)) {
                    cell.set_symbol(" ");
                    cell.set_style(
                        Style::default().bg(theme::dialog_bg()).fg(theme::dialog_fg()),
                    );
                }
            }
        }
        safe_set_string(
            buffer,
            clip,
            x + 2,
            y,
            "Help",
            Style::default()
                .bg(theme::dialog_bg())
                .fg(theme::dialog_fg())
                .add_modifier(Modifier::BOLD),
        );
        for (idx, line) in lines.iter().enumerate() {
            safe_set_string(
                buffer,
                clip,
                x + 2,
                y + 1 + idx as u16,
                line,
                Style::default().bg(theme::dialog_bg()).fg(theme::dialog_fg()),
            );
        }
    }
}
