use std::collections::BTreeMap;

use super::{AppId, Phase, Point, Size, Window};

/// Single source of truth for "what is visible right now".
///
/// One entry per known applet, created at construction and never removed.
/// All mutation flows through the facade operations below; every operation
/// is idempotent and touches exactly one window.
#[derive(Debug, Clone)]
pub struct WindowRegistry {
    windows: BTreeMap<AppId, Window>,
    next_seq: usize,
}

impl WindowRegistry {
    /// All windows start `Closed`.
    pub fn new() -> Self {
        let windows = AppId::ALL
            .into_iter()
            .map(|id| (id, Window::new(id.default_size())))
            .collect();
        Self {
            windows,
            next_seq: 0,
        }
    }

    fn window_mut(&mut self, id: AppId) -> &mut Window {
        self.windows
            .entry(id)
            .or_insert_with(|| Window::new(id.default_size()))
    }

    pub fn window(&self, id: AppId) -> &Window {
        &self.windows[&id]
    }

    /// `Closed | Minimized -> Open`. Returns true when the phase changed.
    pub fn open(&mut self, id: AppId) -> bool {
        let seq = self.next_seq;
        let window = self.window_mut(id);
        if window.phase == Phase::Open {
            return false;
        }
        window.phase = Phase::Open;
        if window.opened_seq.is_none() {
            window.opened_seq = Some(seq);
            self.next_seq = seq.saturating_add(1);
        }
        tracing::debug!(window = ?id, "opened window");
        true
    }

    /// `Open | Minimized -> Closed`. The resting position is kept so a
    /// reopen lands where the user left the window.
    pub fn close(&mut self, id: AppId) -> bool {
        let window = self.window_mut(id);
        if window.phase == Phase::Closed {
            return false;
        }
        window.phase = Phase::Closed;
        tracing::debug!(window = ?id, "closed window");
        true
    }

    /// `Open -> Minimized`. Minimizing a closed window is a no-op rather
    /// than a resurrection.
    pub fn minimize(&mut self, id: AppId) -> bool {
        let window = self.window_mut(id);
        if window.phase != Phase::Open {
            return false;
        }
        window.phase = Phase::Minimized;
        tracing::debug!(window = ?id, "minimized window");
        true
    }

    /// `Minimized -> Open`.
    pub fn restore(&mut self, id: AppId) -> bool {
        let window = self.window_mut(id);
        if window.phase != Phase::Minimized {
            return false;
        }
        window.phase = Phase::Open;
        tracing::debug!(window = ?id, "restored window");
        true
    }

    pub fn phase(&self, id: AppId) -> Phase {
        self.window(id).phase
    }

    pub fn is_open(&self, id: AppId) -> bool {
        self.phase(id) == Phase::Open
    }

    pub fn is_minimized(&self, id: AppId) -> bool {
        self.phase(id) == Phase::Minimized
    }

    pub fn position(&self, id: AppId) -> Option<Point> {
        self.window(id).position
    }

    pub fn set_position(&mut self, id: AppId, position: Point) {
        self.window_mut(id).position = Some(position);
    }

    pub fn size(&self, id: AppId) -> Size {
        self.window(id).size
    }

    pub fn title(&self, id: AppId) -> String {
        self.window(id).title_or_default(id)
    }

    /// Override the default title derived from the applet id.
    pub fn set_title(&mut self, id: AppId, title: impl Into<String>) {
        self.window_mut(id).title = Some(title.into());
    }

    pub fn ids(&self) -> impl Iterator<Item = AppId> + '_ {
        self.windows.keys().copied()
    }

    pub fn open_ids(&self) -> Vec<AppId> {
        self.ids().filter(|&id| self.is_open(id)).collect()
    }

    pub fn minimized_ids(&self) -> Vec<AppId> {
        self.ids().filter(|&id| self.is_minimized(id)).collect()
    }

    pub fn open_count(&self) -> usize {
        self.ids().filter(|&id| self.is_open(id)).count()
    }

    /// Dock display order: first-open order for windows that have ever been
    /// opened, enum order for the rest.
    pub fn launch_order(&self) -> Vec<AppId> {
        let mut ids: Vec<AppId> = self.ids().collect();
        ids.sort_by_key(|id| self.window(*id).opened_seq.unwrap_or(usize::MAX));
        ids
    }
}

impl Default for WindowRegistry {
    fn default() -> Self {
        Self::new()
    }
}
