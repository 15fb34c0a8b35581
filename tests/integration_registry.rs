use ratatui::layout::Rect;

use term_desk::window::{AppId, Phase, Point, WindowManager};

fn manager() -> WindowManager {
    let mut wm = WindowManager::new();
    wm.set_desktop_area(Rect {
        x: 0,
        y: 1,
        width: 120,
        height: 34,
    });
    wm
}

#[test]
fn fresh_shell_has_every_window_closed() {
    let wm = WindowManager::new();
    for id in AppId::ALL {
        assert_eq!(wm.registry().phase(id), Phase::Closed);
    }
    assert!(wm.draw_plan().is_empty());
    assert_eq!(wm.focused(), None);
}

#[test]
fn open_editor_shows_exactly_one_window_titled_text_editor() {
    let mut wm = manager();
    wm.open_window(AppId::Editor);
    let plan = wm.draw_plan();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].id, AppId::Editor);
    assert_eq!(wm.registry().title(AppId::Editor), "Text Editor");

    wm.close_window(AppId::Editor);
    assert!(wm.draw_plan().is_empty());
}

#[test]
fn music_and_settings_are_independent() {
    let mut wm = manager();
    wm.open_window(AppId::Music);
    wm.open_window(AppId::Settings);
    assert!(wm.registry().is_open(AppId::Music));
    assert!(wm.registry().is_open(AppId::Settings));

    wm.close_window(AppId::Music);
    assert!(!wm.registry().is_open(AppId::Music));
    assert!(wm.registry().is_open(AppId::Settings));
}

#[test]
fn opening_twice_is_observably_the_same_as_once() {
    let mut wm = manager();
    wm.open_window(AppId::Calendar);
    let position = wm.registry().position(AppId::Calendar);
    let phase = wm.registry().phase(AppId::Calendar);
    wm.open_window(AppId::Calendar);
    assert_eq!(wm.registry().phase(AppId::Calendar), phase);
    assert_eq!(wm.registry().position(AppId::Calendar), position);
    assert_eq!(wm.draw_plan().len(), 1);
    // only one ledger entry despite the second call
    assert_eq!(wm.take_opened(), vec![AppId::Calendar]);
}

#[test]
fn default_position_centers_then_sticks() {
    let mut wm = manager();
    wm.open_window(AppId::Assistant);
    let size = wm.registry().size(AppId::Assistant);
    let area = wm.desktop_area();
    let expected = Point::new(
        area.x as i32 + ((area.width - size.width) / 2) as i32,
        area.y as i32 + ((area.height - size.height) / 2) as i32,
    );
    assert_eq!(wm.registry().position(AppId::Assistant), Some(expected));

    wm.close_window(AppId::Assistant);
    wm.open_window(AppId::Assistant);
    assert_eq!(wm.registry().position(AppId::Assistant), Some(expected));
}

#[test]
fn minimize_is_distinct_from_close_and_restores() {
    let mut wm = manager();
    wm.open_window(AppId::Games);
    let position = wm.registry().position(AppId::Games);
    wm.minimize_window(AppId::Games);

    assert_eq!(wm.registry().phase(AppId::Games), Phase::Minimized);
    assert!(wm.draw_plan().is_empty());
    // a minimized window has not been closed as far as the ledger goes
    wm.take_opened();
    assert!(wm.take_closed().is_empty());

    wm.restore_window(AppId::Games);
    assert_eq!(wm.registry().phase(AppId::Games), Phase::Open);
    assert_eq!(wm.registry().position(AppId::Games), position);
}

#[test]
fn activate_covers_all_three_phases() {
    let mut wm = manager();
    wm.activate(AppId::Profile);
    assert!(wm.registry().is_open(AppId::Profile));

    wm.minimize_window(AppId::Profile);
    wm.activate(AppId::Profile);
    assert!(wm.registry().is_open(AppId::Profile));

    wm.open_window(AppId::Editor);
    wm.activate(AppId::Profile);
    assert_eq!(wm.focused(), Some(AppId::Profile));
}

#[test]
fn ledger_drains_balance_open_and_close() {
    let mut wm = manager();
    wm.open_window(AppId::Editor);
    wm.open_window(AppId::Music);
    wm.close_window(AppId::Editor);
    assert_eq!(wm.take_opened(), vec![AppId::Editor, AppId::Music]);
    assert_eq!(wm.take_closed(), vec![AppId::Editor]);
    // drains are consumed
    assert!(wm.take_opened().is_empty());
    assert!(wm.take_closed().is_empty());
}
