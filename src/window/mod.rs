pub mod decorator;
pub mod drag;
mod manager;
mod registry;

pub use drag::{DragController, DragRelease, DragTarget};
pub use manager::{DragUpdate, MouseOutcome, WindowDraw, WindowManager, WindowSurface};
pub use registry::WindowRegistry;

/// Top-left screen coordinate in terminal cells. Signed so a window or icon
/// can rest partially off-screen after a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// The applets this shell knows about. The set is closed at compile time,
/// which is what makes "unknown window id" a non-event: there is no way to
/// spell one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AppId {
    Editor,
    Music,
    Calendar,
    Assistant,
    Games,
    Settings,
    Profile,
}

impl AppId {
    pub const ALL: [AppId; 7] = [
        AppId::Editor,
        AppId::Music,
        AppId::Calendar,
        AppId::Assistant,
        AppId::Games,
        AppId::Settings,
        AppId::Profile,
    ];

    pub fn title(self) -> &'static str {
        match self {
            AppId::Editor => "Text Editor",
            AppId::Music => "Music",
            AppId::Calendar => "Calendar",
            AppId::Assistant => "Assistant",
            AppId::Games => "Games",
            AppId::Settings => "Settings",
            AppId::Profile => "Profile",
        }
    }

    /// Short label for dock entries and desktop icons.
    pub fn label(self) -> &'static str {
        match self {
            AppId::Editor => "Editor",
            AppId::Music => "Music",
            AppId::Calendar => "Calendar",
            AppId::Assistant => "Assistant",
            AppId::Games => "Games",
            AppId::Settings => "Settings",
            AppId::Profile => "Profile",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            AppId::Editor => "✎",
            AppId::Music => "♪",
            AppId::Calendar => "▦",
            AppId::Assistant => "✦",
            AppId::Games => "♟",
            AppId::Settings => "⚙",
            AppId::Profile => "☻",
        }
    }

    pub fn default_size(self) -> Size {
        match self {
            AppId::Editor => Size::new(52, 16),
            AppId::Music => Size::new(46, 16),
            AppId::Calendar => Size::new(56, 18),
            AppId::Assistant => Size::new(50, 18),
            AppId::Games => Size::new(48, 20),
            AppId::Settings => Size::new(46, 15),
            AppId::Profile => Size::new(42, 14),
        }
    }

    /// Pretend memory cost booked in the process ledger while the window is
    /// open.
    pub fn memory_cost_mb(self) -> u32 {
        match self {
            AppId::Editor => 96,
            AppId::Music => 160,
            AppId::Calendar => 84,
            AppId::Assistant => 256,
            AppId::Games => 192,
            AppId::Settings => 64,
            AppId::Profile => 128,
        }
    }
}

/// Per-window lifecycle.
///
/// `Minimized` is deliberately distinct from `Closed`: a minimized window
/// keeps its spot in the dock and restores to its previous position, while a
/// closed one only keeps the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    Open,
    Minimized,
}

impl Phase {
    pub fn is_visible(self) -> bool {
        matches!(self, Phase::Open)
    }
}

#[derive(Debug, Clone)]
pub struct Window {
    pub(crate) title: Option<String>,
    pub(crate) phase: Phase,
    pub(crate) position: Option<Point>,
    pub(crate) size: Size,
    pub(crate) opened_seq: Option<usize>,
}

impl Window {
    pub(crate) fn new(size: Size) -> Self {
        Self {
            title: None,
            phase: Phase::Closed,
            position: None,
            size,
            opened_seq: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn position(&self) -> Option<Point> {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn title_or_default(&self, id: AppId) -> String {
        self.title.clone().unwrap_or_else(|| id.title().to_string())
    }
}
