use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::theme;
use crate::ui::{UiFrame, safe_set_string, truncate_to_width};

use crate::window::AppId;

use super::{Applet, AppletContext, ShellCommand};

#[derive(Debug, Clone, Copy)]
pub struct Song {
    pub title: &'static str,
    pub artist: &'static str,
    pub duration_secs: u32,
}

pub const SAMPLE_SONGS: [Song; 5] = [
    Song {
        title: "Digital Dreams",
        artist: "Electronic Minds",
        duration_secs: 3 * 60 + 45,
    },
    Song {
        title: "Neon Nights",
        artist: "Synthwave Collective",
        duration_secs: 4 * 60 + 20,
    },
    Song {
        title: "Cyber Soul",
        artist: "Digital Pulse",
        duration_secs: 3 * 60 + 55,
    },
    Song {
        title: "Future Funk",
        artist: "Retro Wave",
        duration_secs: 4 * 60 + 10,
    },
    Song {
        title: "Binary Sunset",
        artist: "Code Breakers",
        duration_secs: 3 * 60 + 30,
    },
];

/// Music player applet. Playback is display-only: a clock advances while a
/// song is "playing", nothing touches an audio device.
pub struct MusicApplet {
    selected: usize,
    current: Option<usize>,
    paused: bool,
    volume: u8,
    elapsed_base: Duration,
    playing_since: Option<Instant>,
}

impl MusicApplet {
    pub fn new() -> Self {
        Self {
            selected: 0,
            current: None,
            paused: false,
            volume: 75,
            elapsed_base: Duration::ZERO,
            playing_since: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.current.is_some() && !self.paused
    }

    pub fn current_song(&self) -> Option<Song> {
        self.current.map(|idx| SAMPLE_SONGS[idx])
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    fn elapsed(&self) -> Duration {
        let live = self
            .playing_since
            .map(|since| since.elapsed())
            .unwrap_or(Duration::ZERO);
        self.elapsed_base + live
    }

    fn play(&mut self, index: usize) {
        self.current = Some(index.min(SAMPLE_SONGS.len() - 1));
        self.paused = false;
        self.elapsed_base = Duration::ZERO;
        self.playing_since = Some(Instant::now());
    }

    fn toggle_pause(&mut self) {
        if self.current.is_none() {
            self.play(self.selected);
            return;
        }
        if self.paused {
            self.paused = false;
            self.playing_since = Some(Instant::now());
        } else {
            self.elapsed_base = self.elapsed();
            self.playing_since = None;
            self.paused = true;
        }
    }

    fn skip(&mut self, forward: bool) {
        let Some(current) = self.current else {
            return;
        };
        let len = SAMPLE_SONGS.len();
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.play(next);
    }

    fn adjust_volume(&mut self, delta: i16) {
        self.volume = (self.volume as i16 + delta).clamp(0, 100) as u8;
    }
}

impl Default for MusicApplet {
    fn default() -> Self {
        Self::new()
    }
}

fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

impl Applet for MusicApplet {
    fn handle_key(&mut self, key: &KeyEvent, ctx: &mut AppletContext<'_>) -> bool {
        if key.kind != KeyEventKind::Press
            || key
                .modifiers
                .contains(crossterm::event::KeyModifiers::CONTROL)
        {
            return false;
        }
        match key.code {
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                true
            }
            KeyCode::Down => {
                self.selected = (self.selected + 1).min(SAMPLE_SONGS.len() - 1);
                true
            }
            KeyCode::Enter => {
                self.play(self.selected);
                true
            }
            KeyCode::Char(' ') => {
                self.toggle_pause();
                true
            }
            KeyCode::Right => {
                self.skip(true);
                true
            }
            KeyCode::Left => {
                self.skip(false);
                true
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.adjust_volume(5);
                true
            }
            KeyCode::Char('-') => {
                self.adjust_volume(-5);
                true
            }
            KeyCode::Esc => {
                // keep playing in the background; just hide the window
                ctx.queue.push(ShellCommand::MinimizeWindow(AppId::Music));
                true
            }
            _ => false,
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent, _ctx: &mut AppletContext<'_>) -> bool {
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            let row = mouse.row as usize;
            if row < SAMPLE_SONGS.len() {
                self.selected = row;
                self.play(row);
                return true;
            }
        }
        false
    }

    fn tick(&mut self, _ctx: &mut AppletContext<'_>) {
        let Some(current) = self.current else {
            return;
        };
        if self.paused {
            return;
        }
        let duration = Duration::from_secs(SAMPLE_SONGS[current].duration_secs as u64);
        if self.elapsed() >= duration {
            self.skip(true);
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
        for (idx, song) in SAMPLE_SONGS.iter().enumerate() {
            let y = area.y + idx as u16;
            let marker = if Some(idx) == self.current {
                if self.paused { "⏸" } else { "▶" }
            } else {
                " "
            };
            let line = format!(
                "{marker} {} - {}  {}",
                song.title,
                song.artist,
                format_clock(song.duration_secs)
            );
            let style = if idx == self.selected {
                Style::default()
                    .bg(theme::dock_focused_bg())
                    .fg(theme::dock_focused_fg())
            } else if Some(idx) == self.current {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            safe_set_string(
                buffer,
                bounds,
                area.x,
                y,
                &truncate_to_width(&line, area.width as usize),
                style,
            );
        }

        // Now-playing footer.
        if let Some(song) = self.current_song() {
            let footer_y = area.y + area.height.saturating_sub(2);
            let state = if self.paused { "paused" } else { "playing" };
            let footer = format!(
                "{state}: {} - {}  {}/{}",
                song.title,
                song.artist,
                format_clock(self.elapsed().as_secs() as u32),
                format_clock(song.duration_secs)
            );
            safe_set_string(
                buffer,
                bounds,
                area.x,
                footer_y,
                &truncate_to_width(&footer, area.width as usize),
                Style::default().fg(theme::accent()),
            );
        }
        let volume_y = area.y + area.height.saturating_sub(1);
        let volume = format!("vol {:3}%  Enter play  Space pause  ←/→ skip", self.volume);
        safe_set_string(
            buffer,
            bounds,
            area.x,
            volume_y,
            &truncate_to_width(&volume, area.width as usize),
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
    fn enter_plays_the_selected_song() {
        let mut music = MusicApplet::new();
        let mut queue = CommandQueue::default();
        music.handle_key(&press(KeyCode::Down), &mut ctx(&mut queue));
        music.handle_key(&press(KeyCode::Enter), &mut ctx(&mut queue));
        assert!(music.is_playing());
        assert_eq!(music.current_song().unwrap().title, "Neon Nights");
    }

    #[test]
    fn space_toggles_pause_and_resume() {
        let mut music = MusicApplet::new();
        let mut queue = CommandQueue::default();
        music.handle_key(&press(KeyCode::Char(' ')), &mut ctx(&mut queue));
        assert!(music.is_playing());
        music.handle_key(&press(KeyCode::Char(' ')), &mut ctx(&mut queue));
        assert!(!music.is_playing());
        music.handle_key(&press(KeyCode::Char(' ')), &mut ctx(&mut queue));
        assert!(music.is_playing());
    }

    #[test]
    fn skip_wraps_around_the_playlist() {
        let mut music = MusicApplet::new();
        let mut queue = CommandQueue::default();
        music.handle_key(&press(KeyCode::Enter), &mut ctx(&mut queue));
        music.handle_key(&press(KeyCode::Left), &mut ctx(&mut queue));
        assert_eq!(music.current_song().unwrap().title, "Binary Sunset");
        music.handle_key(&press(KeyCode::Right), &mut ctx(&mut queue));
        assert_eq!(music.current_song().unwrap().title, "Digital Dreams");
    }

    #[test]
    fn volume_clamps_to_bounds() {
        let mut music = MusicApplet::new();
        let mut queue = CommandQueue::default();
        for _ in 0..30 {
            music.handle_key(&press(KeyCode::Char('+')), &mut ctx(&mut queue));
        }
        assert_eq!(music.volume(), 100);
        for _ in 0..30 {
            music.handle_key(&press(KeyCode::Char('-')), &mut ctx(&mut queue));
        }
        assert_eq!(music.volume(), 0);
    }

    #[test]
    fn escape_minimizes_through_the_facade() {
        let mut music = MusicApplet::new();
        let mut queue = CommandQueue::default();
        music.handle_key(&press(KeyCode::Enter), &mut ctx(&mut queue));
        music.handle_key(&press(KeyCode::Esc), &mut ctx(&mut queue));
        assert!(music.is_playing());
        assert_eq!(
            queue.take_commands(),
            vec![ShellCommand::MinimizeWindow(AppId::Music)]
        );
    }

    #[test]
    fn click_on_a_row_plays_it() {
        let mut music = MusicApplet::new();
        let mut queue = CommandQueue::default();
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row: 2,
            modifiers: crossterm::event::KeyModifiers::NONE,
        };
        assert!(music.handle_mouse(&click, &mut ctx(&mut queue)));
        assert_eq!(music.current_song().unwrap().title, "Cyber Soul");
    }
}
