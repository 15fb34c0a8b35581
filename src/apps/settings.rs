use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::config::SettingsData;
use crate::procs::format_memory;
use crate::theme;
use crate::ui::{UiFrame, safe_set_string, truncate_to_width};

use super::{Applet, AppletContext, ShellCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    ApiKey,
    MouseCapture,
}

/// Settings applet: the API key for the assistant, the mouse-capture
/// toggle, and the cosmetic system stats.
///
/// Edits are local until Enter pushes a `SaveSettings` command; the shell
/// persists it and calls [`SettingsApplet::sync`] back with the applied
/// value.
pub struct SettingsApplet {
    api_key: String,
    mouse_capture: bool,
    field: Field,
}

impl SettingsApplet {
    pub fn new(data: &SettingsData) -> Self {
        Self {
            api_key: data.api_key.clone(),
            mouse_capture: data.mouse_capture,
            field: Field::ApiKey,
        }
    }

    pub fn sync(&mut self, data: &SettingsData) {
        self.api_key = data.api_key.clone();
        self.mouse_capture = data.mouse_capture;
    }

    fn save(&self, ctx: &mut AppletContext<'_>) {
        ctx.queue.push(ShellCommand::SaveSettings(SettingsData {
            api_key: self.api_key.trim().to_string(),
            mouse_capture: self.mouse_capture,
        }));
        ctx.queue.notify("Success", "API key saved successfully");
    }
}

impl Applet for SettingsApplet {
    fn handle_key(&mut self, key: &KeyEvent, ctx: &mut AppletContext<'_>) -> bool {
        if key.kind != KeyEventKind::Press
            || key
                .modifiers
                .contains(crossterm::event::KeyModifiers::CONTROL)
        {
            return false;
        }
        match key.code {
            KeyCode::Tab | KeyCode::Up | KeyCode::Down => {
                self.field = match self.field {
                    Field::ApiKey => Field::MouseCapture,
                    Field::MouseCapture => Field::ApiKey,
                };
                true
            }
            KeyCode::Enter => {
                self.save(ctx);
                true
            }
            KeyCode::Char(' ') if self.field == Field::MouseCapture => {
                self.mouse_capture = !self.mouse_capture;
                true
            }
            KeyCode::Backspace if self.field == Field::ApiKey => {
                self.api_key.pop();
                true
            }
            KeyCode::Char(ch) if self.field == Field::ApiKey => {
                self.api_key.push(ch);
                true
            }
            _ => false,
        }
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &AppletContext<'_>) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let buffer = frame.buffer_mut();
        let bounds = area.intersection(buffer.area);
        if bounds.width == 0 || bounds.height == 0 {
            return;
        }
        let width = area.width as usize;
        let selected = |field: Field| {
            if self.field == field {
                Style::default()
                    .bg(theme::dock_focused_bg())
                    .fg(theme::dock_focused_fg())
            } else {
                Style::default()
            }
        };

        safe_set_string(
            buffer,
            bounds,
            area.x,
            area.y,
            "API Configuration",
            Style::default().add_modifier(Modifier::BOLD),
        );
        let masked: String = "•".repeat(self.api_key.chars().count());
        let key_line = format!("Gemini API key: {masked}_");
        safe_set_string(
            buffer,
            bounds,
            area.x,
            area.y + 1,
            &truncate_to_width(&key_line, width),
            selected(Field::ApiKey),
        );
        let capture_line = format!(
            "Mouse capture: {}",
            if self.mouse_capture { "on" } else { "off" }
        );
        safe_set_string(
            buffer,
            bounds,
            area.x,
            area.y + 2,
            &truncate_to_width(&capture_line, width),
            selected(Field::MouseCapture),
        );

        safe_set_string(
            buffer,
            bounds,
            area.x,
            area.y + 4,
            "System",
            Style::default().add_modifier(Modifier::BOLD),
        );
        let usage = format!(
            "Memory: {:.1}%  ({} / {})",
            ctx.stats.usage_percent(),
            format_memory(ctx.stats.used_mb),
            format_memory(ctx.stats.total_mb),
        );
        safe_set_string(
            buffer,
            bounds,
            area.x,
            area.y + 5,
            &truncate_to_width(&usage, width),
            Style::default(),
        );
        let procs = format!("Running processes: {}", ctx.stats.process_count);
        safe_set_string(
            buffer,
            bounds,
            area.x,
            area.y + 6,
            &truncate_to_width(&procs, width),
            Style::default(),
        );

        let hint = "Tab switch field  Space toggle  Enter save";
        safe_set_string(
            buffer,
            bounds,
            area.x,
            area.y + area.height.saturating_sub(1),
            &truncate_to_width(hint, width),
            Style::default().fg(theme::icon_label_fg()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::super::CommandQueue;
    use super::super::test_support::ctx;
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, crossterm::event::KeyModifiers::NONE)
    }

    #[test]
    fn typing_and_enter_pushes_save_settings() {
        let mut settings = SettingsApplet::new(&SettingsData::default());
        let mut queue = CommandQueue::default();
        for ch in "abc123".chars() {
            settings.handle_key(&press(KeyCode::Char(ch)), &mut ctx(&mut queue));
        }
        settings.handle_key(&press(KeyCode::Enter), &mut ctx(&mut queue));
        let commands = queue.take_commands();
        assert_eq!(commands.len(), 1);
        let ShellCommand::SaveSettings(saved) = &commands[0] else {
            panic!("expected SaveSettings");
        };
        assert_eq!(saved.api_key, "abc123");
        assert!(saved.mouse_capture);
        assert_eq!(queue.take_notifications().len(), 1);
    }

    #[test]
    fn space_toggles_mouse_capture_on_its_field() {
        let mut settings = SettingsApplet::new(&SettingsData::default());
        let mut queue = CommandQueue::default();
        // space on the key field is just a character
        settings.handle_key(&press(KeyCode::Char(' ')), &mut ctx(&mut queue));
        settings.handle_key(&press(KeyCode::Tab), &mut ctx(&mut queue));
        settings.handle_key(&press(KeyCode::Char(' ')), &mut ctx(&mut queue));
        settings.handle_key(&press(KeyCode::Enter), &mut ctx(&mut queue));
        let commands = queue.take_commands();
        let ShellCommand::SaveSettings(saved) = &commands[0] else {
            panic!("expected SaveSettings");
        };
        assert!(!saved.mouse_capture);
        assert_eq!(saved.api_key, " ");
    }

    #[test]
    fn sync_overwrites_local_edits() {
        let mut settings = SettingsApplet::new(&SettingsData::default());
        let mut queue = CommandQueue::default();
        settings.handle_key(&press(KeyCode::Char('x')), &mut ctx(&mut queue));
        settings.sync(&SettingsData {
            api_key: "remote".into(),
            mouse_capture: false,
        });
        assert_eq!(settings.api_key, "remote");
        assert!(!settings.mouse_capture);
    }
}
