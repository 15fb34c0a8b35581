pub mod desktop;
pub mod dock;
pub mod help;
pub mod notifications;
pub mod system_bar;

pub use desktop::{Desktop, DesktopIcon};
pub use dock::Dock;
pub use help::HelpOverlay;
pub use notifications::NotificationCenter;
pub use system_bar::SystemBar;

use crossterm::event::{Event, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::apps::{
    Applet, AppletContext, AssistantApplet, CalendarApplet, CommandQueue, EditorApplet,
    GamesApplet, MusicApplet, ProfileApplet, SettingsApplet, ShellCommand,
};
use crate::config::{ConfigStore, PROCESSES_DOC, PROFILE_DOC, SETTINGS_DOC, SettingsData};
use crate::constants::{DOCK_HEIGHT, SYSTEM_BAR_HEIGHT};
use crate::keybindings::{Action, KeyBindings};
use crate::procs::ProcessTable;
use crate::state::ShellState;
use crate::theme;
use crate::ui::UiFrame;
use crate::window::{AppId, DragTarget, DragUpdate, MouseOutcome, Point, WindowManager};

/// Composition root: owns the window manager, the applets, the chrome and
/// the persistence glue, and routes every event between them.
///
/// Applet-originated mutations travel through the [`CommandQueue`] and are
/// applied here after each dispatch; nothing else writes window state.
pub struct Shell {
    windows: WindowManager,
    editor: EditorApplet,
    music: MusicApplet,
    calendar: CalendarApplet,
    assistant: AssistantApplet,
    games: GamesApplet,
    settings_app: SettingsApplet,
    profile_app: ProfileApplet,
    desktop: Desktop,
    dock: Dock,
    bar: SystemBar,
    notifications: NotificationCenter,
    help: HelpOverlay,
    procs: ProcessTable,
    store: ConfigStore,
    settings: SettingsData,
    state: ShellState,
    queue: CommandQueue,
    keys: KeyBindings,
    bar_area: Rect,
    screen: Rect,
}

const DEFAULT_SCREEN: Rect = Rect {
    x: 0,
    y: 0,
    width: 80,
    height: 24,
};

fn desktop_rect(screen: Rect) -> Rect {
    let bar_h = SYSTEM_BAR_HEIGHT.min(screen.height);
    let dock_h = DOCK_HEIGHT.min(screen.height.saturating_sub(bar_h));
    Rect {
        x: screen.x,
        y: screen.y + bar_h,
        width: screen.width,
        height: screen.height.saturating_sub(bar_h).saturating_sub(dock_h),
    }
}

impl Shell {
    pub fn new(store: ConfigStore) -> Self {
        let settings: SettingsData = store.load(SETTINGS_DOC).unwrap_or_else(|err| {
            tracing::warn!(%err, "falling back to default settings");
            SettingsData::default()
        });
        let profile: crate::config::ProfileData =
            store.load(PROFILE_DOC).unwrap_or_else(|err| {
                tracing::warn!(%err, "falling back to empty profile");
                Default::default()
            });
        let procs: ProcessTable = store.load(PROCESSES_DOC).unwrap_or_else(|err| {
            tracing::warn!(%err, "starting with an empty process ledger");
            ProcessTable::default()
        });

        let mut state = ShellState::new();
        state.set_mouse_capture_enabled(settings.mouse_capture);
        // the initial value is pushed to the driver by the runner, not the
        // change handshake
        let _ = state.take_mouse_capture_change();

        let mut shell = Self {
            windows: WindowManager::new(),
            editor: EditorApplet::new(),
            music: MusicApplet::new(),
            calendar: CalendarApplet::new(),
            assistant: AssistantApplet::new(),
            games: GamesApplet::new(),
            settings_app: SettingsApplet::new(&settings),
            profile_app: ProfileApplet::new(&profile),
            desktop: Desktop::new(desktop_rect(DEFAULT_SCREEN)),
            dock: Dock::new(),
            bar: SystemBar::new(),
            notifications: NotificationCenter::new(),
            help: HelpOverlay::new(),
            procs,
            store,
            settings,
            state,
            queue: CommandQueue::default(),
            keys: KeyBindings::default(),
            bar_area: Rect::default(),
            screen: DEFAULT_SCREEN,
        };
        shell.layout(DEFAULT_SCREEN);
        shell
    }

    fn layout(&mut self, screen: Rect) {
        self.screen = screen;
        let bar_h = SYSTEM_BAR_HEIGHT.min(screen.height);
        self.bar_area = Rect {
            x: screen.x,
            y: screen.y,
            width: screen.width,
            height: bar_h,
        };
        let dock_h = DOCK_HEIGHT.min(screen.height.saturating_sub(bar_h));
        self.dock.set_area(Rect {
            x: screen.x,
            y: screen.y + screen.height - dock_h,
            width: screen.width,
            height: dock_h,
        });
        self.windows.set_desktop_area(desktop_rect(screen));
    }

    pub fn windows(&mut self) -> &mut WindowManager {
        &mut self.windows
    }

    pub fn registry(&self) -> &crate::window::WindowRegistry {
        self.windows.registry()
    }

    pub fn desktop(&self) -> &Desktop {
        &self.desktop
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn procs(&self) -> &ProcessTable {
        &self.procs
    }

    pub fn settings(&self) -> &SettingsData {
        &self.settings
    }

    pub fn set_mouse_capture(&mut self, enabled: bool) {
        self.state.set_mouse_capture_enabled(enabled);
    }

    pub fn mouse_capture_enabled(&self) -> bool {
        self.state.mouse_capture_enabled()
    }

    pub fn take_mouse_capture_change(&mut self) -> Option<bool> {
        self.state.take_mouse_capture_change()
    }

    pub fn should_quit(&self) -> bool {
        self.state.quit_requested()
    }

    // ---- event routing -----------------------------------------------------

    /// Route one input event. Queued applet commands are applied before the
    /// call returns, so registry state is settled when the caller redraws.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        let handled = match event {
            Event::Resize(width, height) => {
                self.layout(Rect {
                    x: 0,
                    y: 0,
                    width: *width,
                    height: *height,
                });
                true
            }
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => false,
        };
        self.apply_queue();
        self.sync_ledger();
        handled
    }

    /// Idle tick: applet timers, worker drains, toast expiry.
    pub fn on_tick(&mut self) {
        {
            let mut ctx = AppletContext {
                focused: false,
                api_key: &self.settings.api_key,
                mouse_capture: self.state.mouse_capture_enabled(),
                stats: self.procs.stats(),
                queue: &mut self.queue,
            };
            self.assistant.tick(&mut ctx);
            self.music.tick(&mut ctx);
            self.games.tick(&mut ctx);
        }
        self.notifications.prune();
        self.apply_queue();
        self.sync_ledger();
    }

    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        if self.help.visible() {
            self.help.hide();
            return true;
        }
        if self.keys.matches(Action::Quit, key) {
            self.state.request_quit();
            return true;
        }
        if self.keys.matches(Action::ToggleHelp, key) {
            self.help.toggle();
            return true;
        }
        // The focused applet gets the first shot so Tab can move fields
        // inside a form; window-level shortcuts only fire when unclaimed.
        if let Some(id) = self.windows.focused()
            && self.dispatch_key(id, key)
        {
            return true;
        }
        if self.keys.matches(Action::FocusNext, key) {
            self.windows.cycle_focus(true);
            return true;
        }
        if self.keys.matches(Action::FocusPrev, key) {
            self.windows.cycle_focus(false);
            return true;
        }
        if self.keys.matches(Action::CloseFocused, key) {
            if let Some(id) = self.windows.focused() {
                self.windows.close_window(id);
            }
            return true;
        }
        if self.keys.matches(Action::MinimizeFocused, key) {
            if let Some(id) = self.windows.focused() {
                self.windows.minimize_window(id);
            }
            return true;
        }
        false
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) -> bool {
        if !self.state.mouse_capture_enabled() {
            return false;
        }
        if self.help.visible() {
            if matches!(mouse.kind, MouseEventKind::Down(_)) {
                self.help.hide();
            }
            return true;
        }

        // An active drag session owns all pointer movement until release.
        if self.windows.drag_active()
            && matches!(
                mouse.kind,
                MouseEventKind::Drag(_) | MouseEventKind::Up(_)
            )
        {
            if let Some(update) = self.windows.pump_drag(mouse) {
                match update {
                    DragUpdate::IconMoved(index, position) => {
                        self.desktop.set_icon_position(index, position);
                    }
                    DragUpdate::IconReleased(release) => {
                        if let DragTarget::DesktopIcon(index) = release.target {
                            self.desktop.set_icon_position(index, release.position);
                            if !release.was_drag
                                && let Some(icon) = self.desktop.icon(index)
                            {
                                let id = icon.id;
                                self.windows.activate(id);
                            }
                        }
                    }
                    DragUpdate::WindowMoved(_) | DragUpdate::WindowReleased(_) => {}
                }
                return true;
            }
            return false;
        }

        match mouse.kind {
            MouseEventKind::Down(_) => {
                let event = Event::Mouse(*mouse);
                if self.dock.contains(mouse.column, mouse.row) {
                    if let Some(id) = self.dock.hit_test(&event) {
                        self.windows.activate(id);
                    }
                    return true;
                }
                match self.windows.on_mouse_down(mouse) {
                    MouseOutcome::Consumed => true,
                    MouseOutcome::Content(id) => {
                        let localized = self.windows.localize_to_content(id, mouse);
                        self.dispatch_mouse(id, &localized);
                        true
                    }
                    MouseOutcome::Missed => {
                        let bounds = self.windows.desktop_area();
                        if let Some(index) =
                            self.desktop.hit_test(mouse.column, mouse.row, bounds)
                        {
                            let origin = self
                                .desktop
                                .icon(index)
                                .map(|icon| icon.position)
                                .unwrap_or(Point::new(0, 0));
                            self.windows
                                .begin_icon_drag(index, mouse.column, mouse.row, origin);
                            return true;
                        }
                        false
                    }
                }
            }
            _ => false,
        }
    }

    fn dispatch_key(&mut self, id: AppId, key: &KeyEvent) -> bool {
        let mut ctx = AppletContext {
            focused: true,
            api_key: &self.settings.api_key,
            mouse_capture: self.state.mouse_capture_enabled(),
            stats: self.procs.stats(),
            queue: &mut self.queue,
        };
        match id {
            AppId::Editor => self.editor.handle_key(key, &mut ctx),
            AppId::Music => self.music.handle_key(key, &mut ctx),
            AppId::Calendar => self.calendar.handle_key(key, &mut ctx),
            AppId::Assistant => self.assistant.handle_key(key, &mut ctx),
            AppId::Games => self.games.handle_key(key, &mut ctx),
            AppId::Settings => self.settings_app.handle_key(key, &mut ctx),
            AppId::Profile => self.profile_app.handle_key(key, &mut ctx),
        }
    }

    fn dispatch_mouse(&mut self, id: AppId, mouse: &MouseEvent) -> bool {
        let mut ctx = AppletContext {
            focused: true,
            api_key: &self.settings.api_key,
            mouse_capture: self.state.mouse_capture_enabled(),
            stats: self.procs.stats(),
            queue: &mut self.queue,
        };
        match id {
            AppId::Editor => self.editor.handle_mouse(mouse, &mut ctx),
            AppId::Music => self.music.handle_mouse(mouse, &mut ctx),
            AppId::Calendar => self.calendar.handle_mouse(mouse, &mut ctx),
            AppId::Assistant => self.assistant.handle_mouse(mouse, &mut ctx),
            AppId::Games => self.games.handle_mouse(mouse, &mut ctx),
            AppId::Settings => self.settings_app.handle_mouse(mouse, &mut ctx),
            AppId::Profile => self.profile_app.handle_mouse(mouse, &mut ctx),
        }
    }

    // ---- command plumbing --------------------------------------------------

    fn apply_queue(&mut self) {
        for command in self.queue.take_commands() {
            match command {
                ShellCommand::OpenWindow(id) => self.windows.open_window(id),
                ShellCommand::CloseWindow(id) => self.windows.close_window(id),
                ShellCommand::MinimizeWindow(id) => self.windows.minimize_window(id),
                ShellCommand::SaveSettings(data) => {
                    if let Err(err) = self.store.save(SETTINGS_DOC, &data) {
                        tracing::warn!(%err, "failed to persist settings");
                    }
                    self.state.set_mouse_capture_enabled(data.mouse_capture);
                    self.settings = data;
                    self.settings_app.sync(&self.settings);
                }
                ShellCommand::SaveProfile(data) => {
                    if let Err(err) = self.store.save(PROFILE_DOC, &data) {
                        tracing::warn!(%err, "failed to persist profile");
                    }
                }
            }
        }
        for notification in self.queue.take_notifications() {
            self.notifications.push(notification);
        }
    }

    fn sync_ledger(&mut self) {
        let opened = self.windows.take_opened();
        let closed = self.windows.take_closed();
        if opened.is_empty() && closed.is_empty() {
            return;
        }
        for id in opened {
            self.procs.add(id.title(), id.memory_cost_mb());
        }
        for id in closed {
            self.procs.remove(id.title());
        }
        if let Err(err) = self.store.save(PROCESSES_DOC, &self.procs) {
            tracing::warn!(%err, "failed to persist process ledger");
        }
    }

    // ---- rendering ---------------------------------------------------------

    pub fn render(&mut self, frame: &mut ratatui::Frame<'_>) {
        let screen = frame.area();
        if screen != self.screen {
            self.layout(screen);
        }
        let mut ui = UiFrame::new(frame);
        ui.fill(screen, " ", Style::default().bg(theme::desktop_bg()));
        let bar_area = self.bar_area;
        self.bar.render(&mut ui, bar_area);
        self.desktop.render(&mut ui, self.windows.desktop_area());

        for draw in self.windows.draw_plan() {
            ui.fill(
                draw.surface.full,
                " ",
                Style::default().bg(theme::window_bg()),
            );
            self.windows.render_chrome(&mut ui, &draw);
            if draw.surface.inner.width == 0 || draw.surface.inner.height == 0 {
                continue;
            }
            let ctx = AppletContext {
                focused: draw.focused,
                api_key: &self.settings.api_key,
                mouse_capture: self.state.mouse_capture_enabled(),
                stats: self.procs.stats(),
                queue: &mut self.queue,
            };
            let area = draw.surface.inner;
            match draw.id {
                AppId::Editor => self.editor.render(&mut ui, area, &ctx),
                AppId::Music => self.music.render(&mut ui, area, &ctx),
                AppId::Calendar => self.calendar.render(&mut ui, area, &ctx),
                AppId::Assistant => self.assistant.render(&mut ui, area, &ctx),
                AppId::Games => self.games.render(&mut ui, area, &ctx),
                AppId::Settings => self.settings_app.render(&mut ui, area, &ctx),
                AppId::Profile => self.profile_app.render(&mut ui, area, &ctx),
            }
        }

        self.dock.begin_frame();
        self.dock
            .render(&mut ui, self.windows.registry(), self.windows.focused());
        self.notifications.render(&mut ui, self.windows.desktop_area());
        self.help.render(&mut ui, screen);
    }
}
