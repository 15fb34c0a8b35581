use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::config::ProfileData;
use crate::theme;
use crate::ui::{UiFrame, safe_set_string, truncate_to_width};

use super::{Applet, AppletContext, ShellCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    NewInterest,
}

/// Profile applet: display name and an interests list, persisted through
/// the config store via `SaveProfile`.
pub struct ProfileApplet {
    name: String,
    interests: Vec<String>,
    new_interest: String,
    selected_interest: usize,
    field: Field,
}

impl ProfileApplet {
    pub fn new(data: &ProfileData) -> Self {
        Self {
            name: data.name.clone(),
            interests: data.interests.clone(),
            new_interest: String::new(),
            selected_interest: 0,
            field: Field::Name,
        }
    }

    pub fn data(&self) -> ProfileData {
        ProfileData {
            name: self.name.trim().to_string(),
            interests: self.interests.clone(),
        }
    }

    fn add_interest(&mut self, ctx: &mut AppletContext<'_>) {
        let interest = self.new_interest.trim().to_string();
        if interest.is_empty() {
            return;
        }
        if self.interests.contains(&interest) {
            ctx.queue.notify("Profile", "That interest is already listed");
            return;
        }
        ctx.queue.notify(
            "Interest added",
            format!("{interest} has been added to your interests"),
        );
        self.interests.push(interest);
        self.new_interest.clear();
    }

    fn remove_selected(&mut self) {
        if self.selected_interest < self.interests.len() {
            self.interests.remove(self.selected_interest);
            if self.selected_interest >= self.interests.len() && self.selected_interest > 0 {
                self.selected_interest -= 1;
            }
        }
    }

    fn save(&self, ctx: &mut AppletContext<'_>) {
        ctx.queue.push(ShellCommand::SaveProfile(self.data()));
        ctx.queue.notify("Profile", "Profile saved");
    }
}

impl Applet for ProfileApplet {
    fn handle_key(&mut self, key: &KeyEvent, ctx: &mut AppletContext<'_>) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.save(ctx);
            return true;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
        match key.code {
            KeyCode::Tab => {
                self.field = match self.field {
                    Field::Name => Field::NewInterest,
                    Field::NewInterest => Field::Name,
                };
                true
            }
            KeyCode::Enter if self.field == Field::NewInterest => {
                self.add_interest(ctx);
                true
            }
            KeyCode::Up => {
                self.selected_interest = self.selected_interest.saturating_sub(1);
                true
            }
            KeyCode::Down => {
                if !self.interests.is_empty() {
                    self.selected_interest =
                        (self.selected_interest + 1).min(self.interests.len() - 1);
                }
                true
            }
            KeyCode::Delete => {
                self.remove_selected();
                true
            }
            KeyCode::Backspace => {
                match self.field {
                    Field::Name => self.name.pop(),
                    Field::NewInterest => self.new_interest.pop(),
                };
                true
            }
            KeyCode::Char(ch) => {
                match self.field {
                    Field::Name => self.name.push(ch),
                    Field::NewInterest => self.new_interest.push(ch),
                }
                true
            }
            _ => false,
        }
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &AppletContext<'_>) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let buffer = frame.buffer_mut();
        let bounds = area.intersection(buffer.area);
        if bounds.width == 0 || bounds.height == 0 {
            return;
        }
        let width = area.width as usize;
        let field_style = |field: Field| {
            if self.field == field {
                Style::default()
                    .bg(theme::dock_focused_bg())
                    .fg(theme::dock_focused_fg())
            } else {
                Style::default()
            }
        };

        let name_line = format!("Name: {}_", self.name);
        safe_set_string(
            buffer,
            bounds,
            area.x,
            area.y,
            &truncate_to_width(&name_line, width),
            field_style(Field::Name),
        );

        safe_set_string(
            buffer,
            bounds,
            area.x,
            area.y + 2,
            "Interests",
            Style::default().add_modifier(Modifier::BOLD),
        );
        for (idx, interest) in self.interests.iter().enumerate() {
            let marker = if idx == self.selected_interest {
                ">"
            } else {
                " "
            };
            safe_set_string(
                buffer,
                bounds,
                area.x,
                area.y + 3 + idx as u16,
                &truncate_to_width(&format!("{marker} {interest}"), width),
                Style::default(),
            );
        }
        let add_y = area.y + 3 + self.interests.len() as u16;
        let add_line = format!("add: {}_", self.new_interest);
        safe_set_string(
            buffer,
            bounds,
            area.x,
            add_y,
            &truncate_to_width(&add_line, width),
            field_style(Field::NewInterest),
        );

        let hint = "Tab switch  Enter add  Del remove  Ctrl+S save";
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
