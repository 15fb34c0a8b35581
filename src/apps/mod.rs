//! Applet hosting contract.
//!
//! An applet is mounted purely by its window being open; it receives no
//! arguments from the window manager. To dismiss itself or talk to the rest
//! of the shell it pushes commands into the [`CommandQueue`] carried by the
//! [`AppletContext`], which the shell drains after every dispatch. Applets
//! never touch the registry directly.

pub mod assistant;
pub mod calendar;
pub mod editor;
pub mod games;
pub mod music;
pub mod profile;
pub mod settings;

pub use assistant::AssistantApplet;
pub use calendar::CalendarApplet;
pub use editor::EditorApplet;
pub use games::GamesApplet;
pub use music::MusicApplet;
pub use profile::ProfileApplet;
pub use settings::SettingsApplet;

use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::layout::Rect;

use crate::config::{ProfileData, SettingsData};
use crate::procs::LedgerStats;
use crate::ui::UiFrame;
use crate::window::AppId;

/// Commands applets hand back to the shell.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    OpenWindow(AppId),
    CloseWindow(AppId),
    MinimizeWindow(AppId),
    SaveSettings(SettingsData),
    SaveProfile(ProfileData),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Default)]
pub struct CommandQueue {
    commands: Vec<ShellCommand>,
    notifications: Vec<Notification>,
}

impl CommandQueue {
    pub fn push(&mut self, command: ShellCommand) {
        self.commands.push(command);
    }

    pub fn notify(&mut self, title: impl Into<String>, body: impl Into<String>) {
        self.notifications.push(Notification {
            title: title.into(),
            body: body.into(),
        });
    }

    pub fn take_commands(&mut self) -> Vec<ShellCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.notifications.is_empty()
    }
}

/// Per-dispatch context handed to applet methods.
///
/// Carries the few pieces of shared shell state applets are allowed to see,
/// plus the command queue they mutate the world through.
pub struct AppletContext<'a> {
    pub focused: bool,
    pub api_key: &'a str,
    pub mouse_capture: bool,
    pub stats: LedgerStats,
    pub queue: &'a mut CommandQueue,
}

pub trait Applet {
    /// Keyboard input while this applet's window is focused. Returns true
    /// when the event was consumed.
    fn handle_key(&mut self, _key: &KeyEvent, _ctx: &mut AppletContext<'_>) -> bool {
        false
    }

    /// Mouse input localized to content-area coordinates.
    fn handle_mouse(&mut self, _mouse: &MouseEvent, _ctx: &mut AppletContext<'_>) -> bool {
        false
    }

    /// Idle-frame tick: drain worker results, advance timers.
    fn tick(&mut self, _ctx: &mut AppletContext<'_>) {}

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &AppletContext<'_>);
}
