use std::io;
use std::time::Duration;

use ratatui::Terminal;
use ratatui::backend::Backend;

use crate::drivers::InputDriver;
use crate::event_loop::{ControlFlow, EventLoop};
use crate::shell::Shell;

/// Drive the shell until it requests quit or the driver fails.
///
/// Owns the loop glue: input events go to the shell, idle ticks advance
/// applet timers and redraw, and mouse-capture changes are flushed to the
/// driver after every iteration.
pub fn run_shell<B, D>(
    terminal: &mut Terminal<B>,
    driver: &mut D,
    shell: &mut Shell,
    poll_interval: Duration,
) -> io::Result<()>
where
    B: Backend,
    D: InputDriver,
{
    let mut event_loop = EventLoop::new(driver, poll_interval);
    event_loop
        .driver()
        .set_mouse_capture(shell.mouse_capture_enabled())?;

    event_loop.run(|driver, event| {
        if let Some(event) = event {
            shell.handle_event(&event);
        } else {
            shell.on_tick();
            terminal
                .draw(|frame| shell.render(frame))
                .map_err(|err| io::Error::other(err.to_string()))?;
        }
        if let Some(enabled) = shell.take_mouse_capture_change() {
            driver.set_mouse_capture(enabled)?;
        }
        Ok(if shell.should_quit() {
            ControlFlow::Quit
        } else {
            ControlFlow::Continue
        })
    })
}
