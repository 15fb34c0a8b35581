//! Shared crate-wide constants.

use std::time::Duration;

/// Cumulative pointer travel (in cells) beyond which a press/release gesture
/// on an icon is classified as a drag and its click action is suppressed.
pub const DRAG_CLICK_THRESHOLD: u16 = 2;

/// Minimum number of visible cells a window must keep within the desktop
/// area after a resize so the user can grab its chrome again.
///
/// Drags themselves are never clamped; this only governs the recovery pass
/// that runs when the desktop area changes size.
pub const MIN_WINDOW_VISIBLE_MARGIN: u16 = 4;

/// Rows consumed by window chrome: top border, title row, bottom border.
pub const WINDOW_CHROME_ROWS: u16 = 3;

/// Columns consumed by window chrome: left and right borders.
pub const WINDOW_CHROME_COLS: u16 = 2;

/// Smallest window the decorator will draw chrome for.
pub const MIN_WINDOW_WIDTH: u16 = 12;
pub const MIN_WINDOW_HEIGHT: u16 = 4;

/// Height of the top system bar, in rows.
pub const SYSTEM_BAR_HEIGHT: u16 = 1;

/// Height of the dock, in rows.
pub const DOCK_HEIGHT: u16 = 1;

/// How long a notification toast stays on screen.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// Widest a notification toast will render.
pub const NOTIFICATION_WIDTH: u16 = 34;
