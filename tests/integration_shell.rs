use std::time::Duration;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Terminal;
use ratatui::backend::TestBackend;

use term_desk::config::ConfigStore;
use term_desk::drivers::ReplayDriver;
use term_desk::runner::run_shell;
use term_desk::shell::Shell;
use term_desk::window::AppId;

fn shell() -> (Shell, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    (Shell::new(ConfigStore::at(tmp.path().join("cfg"))), tmp)
}

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn ctrl(ch: char) -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL))
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

fn down(column: u16, row: u16) -> Event {
    mouse(MouseEventKind::Down(MouseButton::Left), column, row)
}

fn drag(column: u16, row: u16) -> Event {
    mouse(MouseEventKind::Drag(MouseButton::Left), column, row)
}

fn up(column: u16, row: u16) -> Event {
    mouse(MouseEventKind::Up(MouseButton::Left), column, row)
}

#[test]
fn desktop_icon_click_opens_its_window() {
    let (mut shell, _tmp) = shell();
    let icon = shell.desktop().icons()[0].clone();
    assert_eq!(icon.id, AppId::Editor);
    let (x, y) = (icon.position.x as u16, icon.position.y as u16);
    shell.handle_event(&down(x, y));
    shell.handle_event(&up(x, y));
    assert!(shell.registry().is_open(AppId::Editor));
    // the ledger booked a process for it
    assert_eq!(shell.procs().len(), 1);
    assert_eq!(shell.procs().entries()[0].name, "Text Editor");
}

#[test]
fn dragged_icon_does_not_launch_and_keeps_its_new_spot() {
    let (mut shell, _tmp) = shell();
    let icon = shell.desktop().icons()[0].clone();
    let (x, y) = (icon.position.x as u16, icon.position.y as u16);
    shell.handle_event(&down(x, y));
    shell.handle_event(&drag(x + 12, y + 4));
    shell.handle_event(&up(x + 12, y + 4));
    assert!(!shell.registry().is_open(AppId::Editor));
    let moved = shell.desktop().icons()[0].position;
    assert_eq!(moved.x, icon.position.x + 12);
    assert_eq!(moved.y, icon.position.y + 4);
}

#[test]
fn header_drag_moves_the_window_by_the_pointer_delta() {
    let (mut shell, _tmp) = shell();
    shell.windows().open_window(AppId::Music);
    let before = shell.registry().position(AppId::Music).unwrap();
    let header = (before.x as u16 + 5, before.y as u16 + 1);
    shell.handle_event(&down(header.0, header.1));
    shell.handle_event(&drag(header.0 + 7, header.1 + 3));
    shell.handle_event(&up(header.0 + 7, header.1 + 3));
    let after = shell.registry().position(AppId::Music).unwrap();
    assert_eq!(after.x, before.x + 7);
    assert_eq!(after.y, before.y + 3);
}

#[test]
fn tab_cycles_focus_and_ctrl_w_closes() {
    let (mut shell, _tmp) = shell();
    shell.windows().open_window(AppId::Editor);
    shell.windows().open_window(AppId::Games);
    assert_eq!(shell.windows().focused(), Some(AppId::Games));

    // Games is focused; the picker does not use Tab, so focus cycles.
    shell.handle_event(&key(KeyCode::Tab));
    assert_eq!(shell.windows().focused(), Some(AppId::Editor));

    shell.handle_event(&ctrl('w'));
    assert!(!shell.registry().is_open(AppId::Editor));
    assert_eq!(shell.windows().focused(), Some(AppId::Games));
}

#[test]
fn minimize_shortcut_hides_but_does_not_close() {
    let (mut shell, _tmp) = shell();
    shell.windows().open_window(AppId::Calendar);
    shell.handle_event(&ctrl('b'));
    assert!(shell.registry().is_minimized(AppId::Calendar));
    // process still booked while minimized
    assert_eq!(shell.procs().len(), 1);
}

#[test]
fn assistant_without_api_key_raises_a_notification() {
    let (mut shell, _tmp) = shell();
    shell.windows().open_window(AppId::Assistant);
    for ch in "hello".chars() {
        shell.handle_event(&key(KeyCode::Char(ch)));
    }
    shell.handle_event(&key(KeyCode::Enter));
    assert_eq!(shell.notifications().len(), 1);
    // the shell applied the applet's command and opened Settings for the fix
    assert!(shell.registry().is_open(AppId::Settings));
}

#[test]
fn close_button_click_closes_and_releases_the_process() {
    let (mut shell, _tmp) = shell();
    shell.windows().open_window(AppId::Settings);
    assert_eq!(shell.procs().len(), 1);
    let pos = shell.registry().position(AppId::Settings).unwrap();
    let size = shell.registry().size(AppId::Settings);
    let close_col = (pos.x + size.width as i32 - 2) as u16;
    let header_row = (pos.y + 1) as u16;
    shell.handle_event(&down(close_col, header_row));
    assert!(!shell.registry().is_open(AppId::Settings));
    assert_eq!(shell.procs().len(), 0);
}

#[test]
fn settings_save_flows_back_into_shared_state() {
    let (mut shell, _tmp) = shell();
    shell.windows().open_window(AppId::Settings);
    for ch in "my-key".chars() {
        shell.handle_event(&key(KeyCode::Char(ch)));
    }
    shell.handle_event(&key(KeyCode::Enter));
    assert_eq!(shell.settings().api_key, "my-key");
    assert_eq!(shell.notifications().len(), 1);
}

#[test]
fn resize_event_relayouts_without_losing_windows() {
    let (mut shell, _tmp) = shell();
    shell.windows().open_window(AppId::Editor);
    shell.handle_event(&Event::Resize(60, 18));
    assert!(shell.registry().is_open(AppId::Editor));
    assert!(shell.windows().visible_frame(AppId::Editor).width > 0);
}

#[test]
fn replayed_session_renders_and_quits() {
    let (mut shell, _tmp) = shell();
    let mut driver = ReplayDriver::new([key(KeyCode::F(1)), key(KeyCode::Esc), ctrl('q')]);
    let backend = TestBackend::new(80, 24);
    let mut terminal = Terminal::new(backend).unwrap();
    run_shell(
        &mut terminal,
        &mut driver,
        &mut shell,
        Duration::from_millis(1),
    )
    .unwrap();
    assert!(shell.should_quit());
    // the runner pushed the initial capture state to the driver
    assert_eq!(driver.capture_calls.first(), Some(&true));
    assert!(driver.is_empty());
}
