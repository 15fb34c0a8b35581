use crate::constants::DRAG_CLICK_THRESHOLD;

use super::{AppId, Point};

/// What a drag session is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    WindowHeader(AppId),
    DesktopIcon(usize),
}

/// Ephemeral state for one in-progress pointer gesture. Exactly one session
/// exists at a time; the terminal delivers a single pointer stream.
#[derive(Debug, Clone, Copy)]
struct DragSession {
    target: DragTarget,
    /// Pointer-to-top-left offset captured at grab time. Preserving this
    /// exactly is what keeps the element from jumping under the pointer.
    offset_x: i32,
    offset_y: i32,
    last_col: u16,
    last_row: u16,
    travelled: u16,
}

impl DragSession {
    fn position_for(&self, column: u16, row: u16) -> Point {
        Point::new(column as i32 - self.offset_x, row as i32 - self.offset_y)
    }

    fn track(&mut self, column: u16, row: u16) {
        self.travelled = self
            .travelled
            .saturating_add(column.abs_diff(self.last_col))
            .saturating_add(row.abs_diff(self.last_row));
        self.last_col = column;
        self.last_row = row;
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DragRelease {
    pub target: DragTarget,
    pub position: Point,
    /// True when cumulative travel exceeded the click threshold; the click
    /// action for the target must then be suppressed.
    pub was_drag: bool,
}

#[derive(Debug, Default)]
pub struct DragController {
    session: Option<DragSession>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a gesture. Any prior session is discarded.
    pub fn begin(&mut self, target: DragTarget, column: u16, row: u16, top_left: Point) {
        self.session = Some(DragSession {
            target,
            offset_x: column as i32 - top_left.x,
            offset_y: row as i32 - top_left.y,
            last_col: column,
            last_row: row,
            travelled: 0,
        });
    }

    /// Feed a pointer-move. Returns the target and its new top-left; no
    /// smoothing, no clamping.
    pub fn update(&mut self, column: u16, row: u16) -> Option<(DragTarget, Point)> {
        let session = self.session.as_mut()?;
        session.track(column, row);
        Some((session.target, session.position_for(column, row)))
    }

    /// End the gesture on pointer-up, yielding the resting position and the
    /// click-vs-drag classification.
    pub fn finish(&mut self, column: u16, row: u16) -> Option<DragRelease> {
        let mut session = self.session.take()?;
        session.track(column, row);
        Some(DragRelease {
            target: session.target,
            position: session.position_for(column, row),
            was_drag: session.travelled > DRAG_CLICK_THRESHOLD,
        })
    }

    /// Drop the session without a release, e.g. when the tracked window was
    /// closed mid-drag.
    pub fn cancel(&mut self) {
        self.session = None;
    }

    pub fn active(&self) -> bool {
        self.session.is_some()
    }

    pub fn target(&self) -> Option<DragTarget> {
        self.session.map(|session| session.target)
    }
}
