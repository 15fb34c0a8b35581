use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::execute;

/// Source of input events for the event loop.
///
/// The console implementation reads from crossterm; tests use
/// [`ReplayDriver`] to feed a scripted event sequence through the same code
/// path the real shell runs.
pub trait InputDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;
    fn read(&mut self) -> io::Result<Event>;
    fn set_mouse_capture(&mut self, _enabled: bool) -> io::Result<()> {
        Ok(())
    }
}

impl<T: InputDriver + ?Sized> InputDriver for &mut T {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        (**self).poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        (**self).read()
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        (**self).set_mouse_capture(enabled)
    }
}

/// Crossterm-backed driver for a real terminal.
#[derive(Debug, Default)]
pub struct ConsoleDriver {
    mouse_captured: bool,
}

impl ConsoleDriver {
    pub fn new() -> Self {
        Self {
            mouse_captured: false,
        }
    }
}

impl InputDriver for ConsoleDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        crossterm::event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        crossterm::event::read()
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        if self.mouse_captured == enabled {
            return Ok(());
        }
        let mut stdout = io::stdout();
        if enabled {
            execute!(stdout, EnableMouseCapture)?;
        } else {
            execute!(stdout, DisableMouseCapture)?;
        }
        self.mouse_captured = enabled;
        Ok(())
    }
}

/// Scripted driver: pops a queued event per `read`, reports exhaustion via
/// `poll`. Mouse-capture requests are recorded for assertions.
#[derive(Debug, Default)]
pub struct ReplayDriver {
    events: VecDeque<Event>,
    pub capture_calls: Vec<bool>,
}

impl ReplayDriver {
    pub fn new<I: IntoIterator<Item = Event>>(events: I) -> Self {
        Self {
            events: events.into_iter().collect(),
            capture_calls: Vec::new(),
        }
    }

    pub fn push(&mut self, event: Event) {
        self.events.push_back(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl InputDriver for ReplayDriver {
    fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
        Ok(!self.events.is_empty())
    }

    fn read(&mut self) -> io::Result<Event> {
        self.events
            .pop_front()
            .ok_or_else(|| io::Error::other("replay queue exhausted"))
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        self.capture_calls.push(enabled);
        Ok(())
    }
}
