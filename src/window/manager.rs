use std::sync::Arc;

use crossterm::event::{MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::constants::MIN_WINDOW_VISIBLE_MARGIN;
use crate::ui::{UiFrame, rect_contains};

use super::decorator::{DefaultDecorator, HeaderAction, WindowDecorator};
use super::{AppId, DragController, DragRelease, DragTarget, Phase, Point, Size, WindowRegistry};

/// Visible (clipped) rectangles for one window this frame.
#[derive(Debug, Clone, Copy)]
pub struct WindowSurface {
    /// Window frame including chrome.
    pub full: Rect,
    /// Content area handed to the applet.
    pub inner: Rect,
}

#[derive(Debug, Clone, Copy)]
pub struct WindowDraw {
    pub id: AppId,
    pub surface: WindowSurface,
    pub focused: bool,
}

/// How a pointer-down over the shell resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseOutcome {
    /// No window under the pointer.
    Missed,
    /// Chrome consumed the event (drag started, button pressed).
    Consumed,
    /// The event landed in a window's content area.
    Content(AppId),
}

/// Result of feeding a pointer move/up into an active drag session.
#[derive(Debug, Clone, Copy)]
pub enum DragUpdate {
    WindowMoved(AppId),
    WindowReleased(AppId),
    IconMoved(usize, Point),
    IconReleased(DragRelease),
}

/// Cycle order for Tab focus traversal.
#[derive(Debug, Clone, Default)]
struct FocusRing {
    order: Vec<AppId>,
    current: Option<AppId>,
}

impl FocusRing {
    fn set_order(&mut self, order: Vec<AppId>) {
        self.order = order;
        if let Some(current) = self.current
            && !self.order.contains(&current)
        {
            self.current = None;
        }
    }

    fn current(&self) -> Option<AppId> {
        self.current
    }

    fn set_current(&mut self, current: Option<AppId>) {
        self.current = current;
    }

    fn advance(&mut self, forward: bool) {
        if self.order.is_empty() {
            return;
        }
        let idx = self
            .current
            .and_then(|current| self.order.iter().position(|id| *id == current))
            .unwrap_or(0);
        let step = if forward { 1isize } else { -1isize };
        let next = ((idx as isize + step).rem_euclid(self.order.len() as isize)) as usize;
        self.current = Some(self.order[next]);
    }
}

/// Owns the registry and everything stateful around it: stacking order,
/// focus, the single drag session, and hit-testing. All window mutations go
/// through the facade operations here; nothing else writes registry state.
pub struct WindowManager {
    registry: WindowRegistry,
    drag: DragController,
    focus: FocusRing,
    z_order: Vec<AppId>,
    desktop_area: Rect,
    decorator: Arc<dyn WindowDecorator>,
    // queues drained by the shell to keep the process ledger in sync
    opened: Vec<AppId>,
    closed: Vec<AppId>,
}

impl WindowManager {
    pub fn new() -> Self {
        Self {
            registry: WindowRegistry::new(),
            drag: DragController::new(),
            focus: FocusRing::default(),
            z_order: Vec::new(),
            desktop_area: Rect::default(),
            decorator: Arc::new(DefaultDecorator),
            opened: Vec::new(),
            closed: Vec::new(),
        }
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    pub fn decorator(&self) -> Arc<dyn WindowDecorator> {
        Arc::clone(&self.decorator)
    }

    pub fn desktop_area(&self) -> Rect {
        self.desktop_area
    }

    /// Record the area between system bar and dock. Fully off-screen windows
    /// are pulled back far enough to be grabbable again; drags themselves
    /// are never clamped.
    pub fn set_desktop_area(&mut self, area: Rect) {
        if area == self.desktop_area {
            return;
        }
        self.desktop_area = area;
        self.recover_offscreen();
    }

    fn recover_offscreen(&mut self) {
        let bounds = self.desktop_area;
        if bounds.width == 0 || bounds.height == 0 {
            return;
        }
        let ids: Vec<AppId> = self
            .registry
            .ids()
            .filter(|&id| self.registry.phase(id) != Phase::Closed)
            .collect();
        for id in ids {
            let Some(pos) = self.registry.position(id) else {
                continue;
            };
            let size = self.registry.size(id);
            let margin = MIN_WINDOW_VISIBLE_MARGIN.min(size.width) as i32;
            let x_min = bounds.x as i32 - (size.width as i32 - margin);
            let x_max = (bounds.x + bounds.width) as i32 - margin;
            let y_min = bounds.y as i32;
            let y_max = (bounds.y + bounds.height) as i32 - 1;
            let recovered = Point::new(
                pos.x.clamp(x_min.min(x_max), x_max),
                pos.y.clamp(y_min.min(y_max), y_max),
            );
            if recovered != pos {
                self.registry.set_position(id, recovered);
            }
        }
    }

    fn centered_position(&self, size: Size) -> Point {
        let area = self.desktop_area;
        Point::new(
            area.x as i32 + (area.width.saturating_sub(size.width) / 2) as i32,
            area.y as i32 + (area.height.saturating_sub(size.height) / 2) as i32,
        )
    }

    // ---- facade operations -------------------------------------------------

    pub fn open_window(&mut self, id: AppId) {
        let was_closed = self.registry.phase(id) == Phase::Closed;
        if self.registry.open(id) {
            // opening a minimized window is a restore, not a fresh launch
            if was_closed {
                self.opened.push(id);
            }
            if self.registry.position(id).is_none() {
                let centered = self.centered_position(self.registry.size(id));
                self.registry.set_position(id, centered);
            }
        }
        if !self.z_order.contains(&id) {
            self.z_order.push(id);
        }
        self.rebuild_focus_ring();
        self.focus_window(id);
    }

    pub fn close_window(&mut self, id: AppId) {
        if self.drag.target() == Some(DragTarget::WindowHeader(id)) {
            self.drag.cancel();
        }
        if self.registry.close(id) {
            self.closed.push(id);
        }
        self.z_order.retain(|other| *other != id);
        self.rebuild_focus_ring();
        if self.focus.current().is_none() {
            self.fallback_focus();
        }
    }

    pub fn minimize_window(&mut self, id: AppId) {
        if self.drag.target() == Some(DragTarget::WindowHeader(id)) {
            self.drag.cancel();
        }
        if !self.registry.minimize(id) {
            return;
        }
        self.z_order.retain(|other| *other != id);
        self.rebuild_focus_ring();
        if self.focus.current().is_none() {
            self.fallback_focus();
        }
    }

    pub fn restore_window(&mut self, id: AppId) {
        if !self.registry.restore(id) {
            return;
        }
        if !self.z_order.contains(&id) {
            self.z_order.push(id);
        }
        self.rebuild_focus_ring();
        self.focus_window(id);
    }

    /// Dock click: open when closed, restore when minimized, focus when
    /// already open.
    pub fn activate(&mut self, id: AppId) {
        match self.registry.phase(id) {
            Phase::Closed => self.open_window(id),
            Phase::Minimized => self.restore_window(id),
            Phase::Open => self.focus_window(id),
        }
    }

    pub fn set_window_title(&mut self, id: AppId, title: impl Into<String>) {
        self.registry.set_title(id, title);
    }

    // ---- focus and stacking ------------------------------------------------

    pub fn focused(&self) -> Option<AppId> {
        self.focus.current()
    }

    pub fn focus_window(&mut self, id: AppId) {
        if !self.registry.is_open(id) {
            return;
        }
        self.focus.set_current(Some(id));
        self.bring_to_front(id);
    }

    pub fn cycle_focus(&mut self, forward: bool) {
        self.focus.advance(forward);
        if let Some(id) = self.focus.current() {
            self.bring_to_front(id);
        }
    }

    fn bring_to_front(&mut self, id: AppId) {
        if let Some(pos) = self.z_order.iter().position(|other| *other == id) {
            let id = self.z_order.remove(pos);
            self.z_order.push(id);
        }
    }

    fn fallback_focus(&mut self) {
        self.focus.set_current(self.z_order.last().copied());
    }

    fn rebuild_focus_ring(&mut self) {
        let mut order = self.registry.open_ids();
        order.sort_by_key(|id| self.registry.window(*id).opened_seq);
        self.focus.set_order(order);
    }

    /// Bottom-to-top stacking order of open windows.
    pub fn z_order(&self) -> &[AppId] {
        &self.z_order
    }

    // ---- geometry ----------------------------------------------------------

    fn frame_origin(&self, id: AppId) -> Point {
        self.registry
            .position(id)
            .unwrap_or_else(|| self.centered_position(self.registry.size(id)))
    }

    /// Visible part of the window frame, clipped to the desktop area.
    pub fn visible_frame(&self, id: AppId) -> Rect {
        let origin = self.frame_origin(id);
        let size = self.registry.size(id);
        clip_signed(origin, size, self.desktop_area)
    }

    /// Visible part of the content area.
    pub fn visible_content(&self, id: AppId) -> Rect {
        let origin = self.frame_origin(id);
        let size = self.registry.size(id);
        if size.width < crate::constants::WINDOW_CHROME_COLS + 1
            || size.height < crate::constants::WINDOW_CHROME_ROWS + 1
        {
            return Rect::default();
        }
        let inner_origin = Point::new(origin.x + 1, origin.y + 2);
        let inner_size = Size::new(
            size.width - crate::constants::WINDOW_CHROME_COLS,
            size.height - crate::constants::WINDOW_CHROME_ROWS,
        );
        clip_signed(inner_origin, inner_size, self.desktop_area)
    }

    /// Topmost open window under the pointer.
    pub fn hit_test_topmost(&self, column: u16, row: u16) -> Option<AppId> {
        self.z_order
            .iter()
            .rev()
            .copied()
            .find(|&id| {
                let rect = self.visible_frame(id);
                rect.width > 0 && rect.height > 0 && rect_contains(rect, column, row)
            })
    }

    /// Translate a mouse event into content-area coordinates for an applet.
    pub fn localize_to_content(&self, id: AppId, mouse: &MouseEvent) -> MouseEvent {
        let inner = self.visible_content(id);
        MouseEvent {
            column: mouse.column.saturating_sub(inner.x),
            row: mouse.row.saturating_sub(inner.y),
            kind: mouse.kind,
            modifiers: mouse.modifiers,
        }
    }

    // ---- pointer routing ---------------------------------------------------

    pub fn drag_active(&self) -> bool {
        self.drag.active()
    }

    /// Desktop icons share the single drag session with window headers.
    pub fn begin_icon_drag(&mut self, index: usize, column: u16, row: u16, origin: Point) {
        self.drag
            .begin(DragTarget::DesktopIcon(index), column, row, origin);
    }

    /// Route a pointer-down that is not part of an active drag. Chrome
    /// interactions are resolved here; content hits are handed back to the
    /// caller for applet dispatch.
    pub fn on_mouse_down(&mut self, mouse: &MouseEvent) -> MouseOutcome {
        let Some(id) = self.hit_test_topmost(mouse.column, mouse.row) else {
            return MouseOutcome::Missed;
        };
        self.focus_window(id);
        let origin = self.frame_origin(id);
        let size = self.registry.size(id);
        match self.decorator.hit_test(origin, size, mouse.column, mouse.row) {
            HeaderAction::Close => {
                self.close_window(id);
                MouseOutcome::Consumed
            }
            HeaderAction::Minimize => {
                self.minimize_window(id);
                MouseOutcome::Consumed
            }
            HeaderAction::Drag => {
                self.drag
                    .begin(DragTarget::WindowHeader(id), mouse.column, mouse.row, origin);
                MouseOutcome::Consumed
            }
            HeaderAction::None => MouseOutcome::Content(id),
        }
    }

    /// Feed a pointer move/up into the active drag session. Window moves are
    /// applied directly; icon moves bubble back to the desktop layer.
    pub fn pump_drag(&mut self, mouse: &MouseEvent) -> Option<DragUpdate> {
        match mouse.kind {
            MouseEventKind::Drag(_) => {
                let (target, position) = self.drag.update(mouse.column, mouse.row)?;
                match target {
                    DragTarget::WindowHeader(id) => {
                        self.registry.set_position(id, position);
                        Some(DragUpdate::WindowMoved(id))
                    }
                    DragTarget::DesktopIcon(index) => Some(DragUpdate::IconMoved(index, position)),
                }
            }
            MouseEventKind::Up(_) => {
                let release = self.drag.finish(mouse.column, mouse.row)?;
                match release.target {
                    DragTarget::WindowHeader(id) => {
                        self.registry.set_position(id, release.position);
                        Some(DragUpdate::WindowReleased(id))
                    }
                    DragTarget::DesktopIcon(_) => Some(DragUpdate::IconReleased(release)),
                }
            }
            _ => None,
        }
    }

    // ---- rendering ---------------------------------------------------------

    /// Draw tasks in painter order (bottom of the stack first).
    pub fn draw_plan(&self) -> Vec<WindowDraw> {
        let focused = self.focused();
        self.z_order
            .iter()
            .copied()
            .filter(|&id| self.registry.is_open(id))
            .map(|id| WindowDraw {
                id,
                surface: WindowSurface {
                    full: self.visible_frame(id),
                    inner: self.visible_content(id),
                },
                focused: focused == Some(id),
            })
            .filter(|draw| draw.surface.full.width > 0 && draw.surface.full.height > 0)
            .collect()
    }

    /// Draw one window's chrome.
    pub fn render_chrome(&self, frame: &mut UiFrame<'_>, draw: &WindowDraw) {
        let origin = self.frame_origin(draw.id);
        let size = self.registry.size(draw.id);
        let title = self.registry.title(draw.id);
        self.decorator.render_window(
            frame,
            origin,
            size,
            self.desktop_area,
            &title,
            draw.focused,
        );
    }

    // ---- ledger sync -------------------------------------------------------

    /// Drain ids whose windows opened since the last call.
    pub fn take_opened(&mut self) -> Vec<AppId> {
        std::mem::take(&mut self.opened)
    }

    /// Drain ids whose windows closed since the last call.
    pub fn take_closed(&mut self) -> Vec<AppId> {
        std::mem::take(&mut self.closed)
    }
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Intersection of a signed rectangle with screen bounds.
fn clip_signed(origin: Point, size: Size, bounds: Rect) -> Rect {
    let left = origin.x.max(bounds.x as i32);
    let top = origin.y.max(bounds.y as i32);
    let right = (origin.x + size.width as i32).min((bounds.x + bounds.width) as i32);
    let bottom = (origin.y + size.height as i32).min((bounds.y + bounds.height) as i32);
    if right <= left || bottom <= top {
        return Rect::default();
    }
    Rect {
        x: left as u16,
        y: top as u16,
        width: (right - left) as u16,
        height: (bottom - top) as u16,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyModifiers, MouseButton};

    fn desktop() -> Rect {
        Rect {
            x: 0,
            y: 1,
            width: 100,
            height: 30,
        }
    }

    fn manager() -> WindowManager {
        let mut wm = WindowManager::new();
        wm.set_desktop_area(desktop());
        wm
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn first_open_centers_in_the_desktop_area() {
        let mut wm = manager();
        wm.open_window(AppId::Editor);
        let size = wm.registry().size(AppId::Editor);
        let pos = wm.registry().position(AppId::Editor).unwrap();
        let area = desktop();
        assert_eq!(pos.x, ((area.width - size.width) / 2) as i32);
        assert_eq!(pos.y, area.y as i32 + ((area.height - size.height) / 2) as i32);
    }

    #[test]
    fn reopen_keeps_the_dragged_position() {
        let mut wm = manager();
        wm.open_window(AppId::Editor);
        let origin = wm.registry().position(AppId::Editor).unwrap();
        let frame = wm.visible_frame(AppId::Editor);
        let grab = mouse(
            MouseEventKind::Down(MouseButton::Left),
            frame.x + 4,
            frame.y + 1,
        );
        assert_eq!(wm.on_mouse_down(&grab), MouseOutcome::Consumed);
        wm.pump_drag(&mouse(
            MouseEventKind::Drag(MouseButton::Left),
            frame.x + 14,
            frame.y + 6,
        ));
        wm.pump_drag(&mouse(
            MouseEventKind::Up(MouseButton::Left),
            frame.x + 14,
            frame.y + 6,
        ));
        let moved = wm.registry().position(AppId::Editor).unwrap();
        assert_eq!(moved, Point::new(origin.x + 10, origin.y + 5));
        wm.close_window(AppId::Editor);
        wm.open_window(AppId::Editor);
        assert_eq!(wm.registry().position(AppId::Editor), Some(moved));
    }

    #[test]
    fn click_raises_and_focuses() {
        let mut wm = manager();
        wm.open_window(AppId::Editor);
        wm.open_window(AppId::Music);
        assert_eq!(wm.focused(), Some(AppId::Music));
        assert_eq!(wm.z_order().last(), Some(&AppId::Music));
        // Editor sits below; click inside a corner Music does not cover.
        let editor_frame = wm.visible_frame(AppId::Editor);
        let music_frame = wm.visible_frame(AppId::Music);
        let mut probe = None;
        'outer: for y in editor_frame.y..editor_frame.y + editor_frame.height {
            for x in editor_frame.x..editor_frame.x + editor_frame.width {
                if !rect_contains(music_frame, x, y) {
                    probe = Some((x, y));
                    break 'outer;
                }
            }
        }
        let (x, y) = probe.expect("editor should peek out somewhere");
        wm.on_mouse_down(&mouse(MouseEventKind::Down(MouseButton::Left), x, y));
        assert_eq!(wm.focused(), Some(AppId::Editor));
        assert_eq!(wm.z_order().last(), Some(&AppId::Editor));
    }

    #[test]
    fn close_button_closes_via_facade() {
        let mut wm = manager();
        wm.open_window(AppId::Settings);
        let frame = wm.visible_frame(AppId::Settings);
        let close_col = frame.x + frame.width - 2;
        let outcome = wm.on_mouse_down(&mouse(
            MouseEventKind::Down(MouseButton::Left),
            close_col,
            frame.y + 1,
        ));
        assert_eq!(outcome, MouseOutcome::Consumed);
        assert!(!wm.registry().is_open(AppId::Settings));
        assert_eq!(wm.take_closed(), vec![AppId::Settings]);
    }

    #[test]
    fn minimize_keeps_window_out_of_draw_plan_but_restorable() {
        let mut wm = manager();
        wm.open_window(AppId::Games);
        wm.minimize_window(AppId::Games);
        assert!(wm.registry().is_minimized(AppId::Games));
        assert!(wm.draw_plan().is_empty());
        // minimize is not close: the ledger drain must stay empty
        assert!(wm.take_closed().is_empty());
        wm.restore_window(AppId::Games);
        assert_eq!(wm.draw_plan().len(), 1);
        assert_eq!(wm.focused(), Some(AppId::Games));
    }

    #[test]
    fn focus_falls_back_when_focused_window_closes() {
        let mut wm = manager();
        wm.open_window(AppId::Editor);
        wm.open_window(AppId::Music);
        wm.close_window(AppId::Music);
        assert_eq!(wm.focused(), Some(AppId::Editor));
    }

    #[test]
    fn cycle_focus_walks_open_windows() {
        let mut wm = manager();
        wm.open_window(AppId::Editor);
        wm.open_window(AppId::Music);
        wm.open_window(AppId::Calendar);
        assert_eq!(wm.focused(), Some(AppId::Calendar));
        wm.cycle_focus(true);
        assert_eq!(wm.focused(), Some(AppId::Editor));
        wm.cycle_focus(false);
        assert_eq!(wm.focused(), Some(AppId::Calendar));
    }

    #[test]
    fn resize_recovers_fully_offscreen_windows() {
        let mut wm = manager();
        wm.open_window(AppId::Profile);
        let size = wm.registry().size(AppId::Profile);
        // Drag far off the right edge, then shrink the desktop.
        let frame = wm.visible_frame(AppId::Profile);
        wm.on_mouse_down(&mouse(
            MouseEventKind::Down(MouseButton::Left),
            frame.x + 4,
            frame.y + 1,
        ));
        wm.pump_drag(&mouse(MouseEventKind::Drag(MouseButton::Left), 500, 200));
        wm.pump_drag(&mouse(MouseEventKind::Up(MouseButton::Left), 500, 200));
        let smaller = Rect {
            x: 0,
            y: 1,
            width: 60,
            height: 20,
        };
        wm.set_desktop_area(smaller);
        let recovered = wm.registry().position(AppId::Profile).unwrap();
        let margin = MIN_WINDOW_VISIBLE_MARGIN.min(size.width) as i32;
        assert!(recovered.x <= (smaller.x + smaller.width) as i32 - margin);
        assert!(recovered.y < (smaller.y + smaller.height) as i32);
        assert!(wm.visible_frame(AppId::Profile).width > 0);
    }

    #[test]
    fn draw_plan_matches_open_windows() {
        let mut wm = manager();
        assert!(wm.draw_plan().is_empty());
        wm.open_window(AppId::Music);
        wm.open_window(AppId::Settings);
        let plan = wm.draw_plan();
        assert_eq!(plan.len(), 2);
        // painter order: focused window last
        assert_eq!(plan.last().unwrap().id, AppId::Settings);
        assert!(plan.last().unwrap().focused);
    }

    #[test]
    fn content_clicks_are_handed_to_the_applet() {
        let mut wm = manager();
        wm.open_window(AppId::Editor);
        let inner = wm.visible_content(AppId::Editor);
        let outcome = wm.on_mouse_down(&mouse(
            MouseEventKind::Down(MouseButton::Left),
            inner.x + 2,
            inner.y + 1,
        ));
        assert_eq!(outcome, MouseOutcome::Content(AppId::Editor));
        let localized = wm.localize_to_content(
            AppId::Editor,
            &mouse(MouseEventKind::Down(MouseButton::Left), inner.x + 2, inner.y + 1),
        );
        assert_eq!(localized.column, 2);
        assert_eq!(localized.row, 1);
    }
}
