//! term-desk: a desktop shell simulation for terminal emulators.
//!
//! A windowing shell (system bar, dock, desktop icons, floating draggable
//! windows) hosting small applets: text editor, music player, calendar,
//! chat assistant, games, settings, profile. "Processes" and "memory" are
//! cosmetic numbers; the real substance is the window-management core under
//! [`window`].

pub mod apps;
pub mod config;
pub mod constants;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod keybindings;
pub mod procs;
pub mod runner;
pub mod shell;
pub mod state;
pub mod theme;
pub mod tracing_sub;
pub mod ui;
pub mod window;

pub use error::{Result, ShellError};
