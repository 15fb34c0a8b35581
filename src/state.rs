/// Shell-level flags that sit outside the window registry.
///
/// Mouse capture uses a dirty-flag handshake: the runner drains
/// `take_mouse_capture_change` once per loop iteration and forwards the new
/// value to the input driver, which owns the actual terminal mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellState {
    mouse_capture_enabled: bool,
    mouse_capture_dirty: bool,
    quit_requested: bool,
}

impl ShellState {
    pub fn new() -> Self {
        Self {
            mouse_capture_enabled: true,
            mouse_capture_dirty: false,
            quit_requested: false,
        }
    }

    pub fn mouse_capture_enabled(&self) -> bool {
        self.mouse_capture_enabled
    }

    pub fn set_mouse_capture_enabled(&mut self, enabled: bool) {
        if self.mouse_capture_enabled == enabled {
            return;
        }
        self.mouse_capture_enabled = enabled;
        self.mouse_capture_dirty = true;
    }

    pub fn take_mouse_capture_change(&mut self) -> Option<bool> {
        if self.mouse_capture_dirty {
            self.mouse_capture_dirty = false;
            Some(self.mouse_capture_enabled)
        } else {
            None
        }
    }

    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_capture_change_is_consumed_once() {
        let mut s = ShellState::new();
        assert!(s.mouse_capture_enabled());
        s.set_mouse_capture_enabled(true);
        assert!(s.take_mouse_capture_change().is_none());
        s.set_mouse_capture_enabled(false);
        assert_eq!(s.take_mouse_capture_change(), Some(false));
        assert!(s.take_mouse_capture_change().is_none());
    }

    #[test]
    fn quit_latch() {
        let mut s = ShellState::new();
        assert!(!s.quit_requested());
        s.request_quit();
        assert!(s.quit_requested());
    }
}
