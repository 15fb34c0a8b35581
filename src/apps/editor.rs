use std::fs;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::theme;
use crate::ui::{UiFrame, safe_set_string, truncate_to_width};

use super::{Applet, AppletContext};

/// Plain-text editor applet. Saves and loads files in the working
/// directory; everything else is an in-memory line buffer.
pub struct EditorApplet {
    file_name: String,
    lines: Vec<String>,
    cursor_row: usize,
    cursor_col: usize,
    scroll: usize,
    dirty: bool,
    renaming: Option<String>,
}

impl EditorApplet {
    pub fn new() -> Self {
        Self {
            file_name: "untitled.txt".to_string(),
            lines: vec![String::new()],
            cursor_row: 0,
            cursor_col: 0,
            scroll: 0,
            dirty: false,
            renaming: None,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn contents(&self) -> String {
        self.lines.join("\n")
    }

    fn current_line(&mut self) -> &mut String {
        &mut self.lines[self.cursor_row]
    }

    fn clamp_cursor(&mut self) {
        self.cursor_row = self.cursor_row.min(self.lines.len().saturating_sub(1));
        let len = self.lines[self.cursor_row].chars().count();
        self.cursor_col = self.cursor_col.min(len);
    }

    fn insert_char(&mut self, ch: char) {
        let col = self.cursor_col;
        let line = self.current_line();
        let byte_idx = char_to_byte(line, col);
        line.insert(byte_idx, ch);
        self.cursor_col += 1;
        self.dirty = true;
    }

    fn insert_newline(&mut self) {
        let col = self.cursor_col;
        let line = self.current_line();
        let byte_idx = char_to_byte(line, col);
        let rest = line.split_off(byte_idx);
        self.lines.insert(self.cursor_row + 1, rest);
        self.cursor_row += 1;
        self.cursor_col = 0;
        self.dirty = true;
    }

    fn backspace(&mut self) {
        if self.cursor_col > 0 {
            let col = self.cursor_col;
            let line = self.current_line();
            let byte_idx = char_to_byte(line, col - 1);
            line.remove(byte_idx);
            self.cursor_col -= 1;
            self.dirty = true;
        } else if self.cursor_row > 0 {
            let removed = self.lines.remove(self.cursor_row);
            self.cursor_row -= 1;
            self.cursor_col = self.lines[self.cursor_row].chars().count();
            self.lines[self.cursor_row].push_str(&removed);
            self.dirty = true;
        }
    }

    fn save(&mut self, ctx: &mut AppletContext<'_>) {
        match fs::write(&self.file_name, self.contents()) {
            Ok(()) => {
                self.dirty = false;
                ctx.queue
                    .notify("File Saved", format!("Saved as {}", self.file_name));
            }
            Err(err) => {
                tracing::warn!(file = %self.file_name, %err, "editor save failed");
                ctx.queue
                    .notify("Save Failed", format!("{}: {err}", self.file_name));
            }
        }
    }

    fn load(&mut self, ctx: &mut AppletContext<'_>) {
        match fs::read_to_string(&self.file_name) {
            Ok(text) => {
                self.lines = if text.is_empty() {
                    vec![String::new()]
                } else {
                    text.lines().map(str::to_string).collect()
                };
                self.cursor_row = 0;
                self.cursor_col = 0;
                self.scroll = 0;
                self.dirty = false;
                ctx.queue
                    .notify("File Opened", format!("Loaded {}", self.file_name));
            }
            Err(err) => {
                tracing::warn!(file = %self.file_name, %err, "editor open failed");
                ctx.queue
                    .notify("Open Failed", format!("{}: {err}", self.file_name));
            }
        }
    }
}

impl Default for EditorApplet {
    fn default() -> Self {
        Self::new()
    }
}

fn char_to_byte(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(idx, _)| idx)
        .unwrap_or(line.len())
}

impl Applet for EditorApplet {
    fn handle_key(&mut self, key: &KeyEvent, ctx: &mut AppletContext<'_>) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        // File-name entry mode.
        if self.renaming.is_some() {
            match key.code {
                KeyCode::Enter => {
                    if let Some(pending) = self.renaming.take()
                        && !pending.trim().is_empty()
                    {
                        self.file_name = pending.trim().to_string();
                    }
                }
                KeyCode::Esc => {
                    self.renaming = None;
                }
                KeyCode::Backspace => {
                    if let Some(pending) = self.renaming.as_mut() {
                        pending.pop();
                    }
                }
                KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    if let Some(pending) = self.renaming.as_mut() {
                        pending.push(ch);
                    }
                }
                _ => {}
            }
            return true;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('s') if ctrl => {
                self.save(ctx);
                true
            }
            KeyCode::Char('o') if ctrl => {
                self.load(ctx);
                true
            }
            KeyCode::Char('r') if ctrl => {
                self.renaming = Some(self.file_name.clone());
                true
            }
            KeyCode::Char(ch) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                self.insert_char(ch);
                true
            }
            KeyCode::Enter => {
                self.insert_newline();
                true
            }
            KeyCode::Backspace => {
                self.backspace();
                true
            }
            KeyCode::Left => {
                self.cursor_col = self.cursor_col.saturating_sub(1);
                true
            }
            KeyCode::Right => {
                self.cursor_col += 1;
                self.clamp_cursor();
                true
            }
            KeyCode::Up => {
                self.cursor_row = self.cursor_row.saturating_sub(1);
                self.clamp_cursor();
                true
            }
            KeyCode::Down => {
                self.cursor_row += 1;
                self.clamp_cursor();
                true
            }
            KeyCode::Home => {
                self.cursor_col = 0;
                true
            }
            KeyCode::End => {
                self.cursor_col = self.lines[self.cursor_row].chars().count();
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

        // Header: file name (or rename prompt) and dirty marker.
        let header = if let Some(pending) = &self.renaming {
            format!("name: {pending}_")
        } else {
            let marker = if self.dirty { " *" } else { "" };
            format!("{}{marker}", self.file_name)
        };
        safe_set_string(
            buffer,
            bounds,
            area.x,
            area.y,
            &header,
            Style::default().add_modifier(Modifier::BOLD),
        );

        // Text viewport below the header, above the hint line.
        let text_top = area.y.saturating_add(1);
        let text_height = area.height.saturating_sub(2) as usize;
        if self.cursor_row < self.scroll {
            self.scroll = self.cursor_row;
        } else if text_height > 0 && self.cursor_row >= self.scroll + text_height {
            self.scroll = self.cursor_row + 1 - text_height;
        }
        for (offset, line) in self
            .lines
            .iter()
            .skip(self.scroll)
            .take(text_height)
            .enumerate()
        {
            safe_set_string(
                buffer,
                bounds,
                area.x,
                text_top + offset as u16,
                line,
                Style::default(),
            );
        }

        // Cursor cell.
        if self.renaming.is_none()
            && self.cursor_row >= self.scroll
            && (self.cursor_row - self.scroll) < text_height
        {
            let cy = text_top + (self.cursor_row - self.scroll) as u16;
            let cx = area.x.saturating_add(self.cursor_col as u16);
            if crate::ui::rect_contains(bounds, cx, cy)
                && let Some(cell) = buffer.cell_mut((cx, cy))
            {
                cell.set_style(cell.style().add_modifier(Modifier::REVERSED));
            }
        }

        let hint = "Ctrl+S save  Ctrl+O open  Ctrl+R rename";
        let hint_y = area.y + area.height - 1;
        safe_set_string(
            buffer,
            bounds,
            area.x,
            hint_y,
            &truncate_to_width(hint, area.width as usize),
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
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_builds_the_buffer() {
        let mut editor = EditorApplet::new();
        let mut queue = CommandQueue::default();
        for ch in "hi".chars() {
            editor.handle_key(&press(KeyCode::Char(ch)), &mut ctx(&mut queue));
        }
        editor.handle_key(&press(KeyCode::Enter), &mut ctx(&mut queue));
        editor.handle_key(&press(KeyCode::Char('!')), &mut ctx(&mut queue));
        assert_eq!(editor.contents(), "hi\n!");
    }

    #[test]
    fn backspace_joins_lines() {
        let mut editor = EditorApplet::new();
        let mut queue = CommandQueue::default();
        editor.handle_key(&press(KeyCode::Char('a')), &mut ctx(&mut queue));
        editor.handle_key(&press(KeyCode::Enter), &mut ctx(&mut queue));
        editor.handle_key(&press(KeyCode::Char('b')), &mut ctx(&mut queue));
        editor.handle_key(&press(KeyCode::Backspace), &mut ctx(&mut queue));
        editor.handle_key(&press(KeyCode::Backspace), &mut ctx(&mut queue));
        assert_eq!(editor.contents(), "a");
    }

    #[test]
    fn save_and_load_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("note.txt");
        let mut editor = EditorApplet::new();
        editor.file_name = path.to_string_lossy().into_owned();
        let mut queue = CommandQueue::default();
        for ch in "hello".chars() {
            editor.handle_key(&press(KeyCode::Char(ch)), &mut ctx(&mut queue));
        }
        editor.handle_key(
            &KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL),
            &mut ctx(&mut queue),
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");

        let mut fresh = EditorApplet::new();
        fresh.file_name = path.to_string_lossy().into_owned();
        fresh.handle_key(
            &KeyEvent::new(KeyCode::Char('o'), KeyModifiers::CONTROL),
            &mut ctx(&mut queue),
        );
        assert_eq!(fresh.contents(), "hello");
        let toasts = queue.take_notifications();
        assert_eq!(toasts.len(), 2);
    }

    #[test]
    fn rename_mode_replaces_file_name() {
        let mut editor = EditorApplet::new();
        let mut queue = CommandQueue::default();
        editor.handle_key(
            &KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL),
            &mut ctx(&mut queue),
        );
        for _ in 0.."untitled.txt".len() {
            editor.handle_key(&press(KeyCode::Backspace), &mut ctx(&mut queue));
        }
        for ch in "todo.md".chars() {
            editor.handle_key(&press(KeyCode::Char(ch)), &mut ctx(&mut queue));
        }
        editor.handle_key(&press(KeyCode::Enter), &mut ctx(&mut queue));
        assert_eq!(editor.file_name(), "todo.md");
    }
}
