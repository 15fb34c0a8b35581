use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::theme;
use crate::ui::{UiFrame, safe_set_string, truncate_to_width};

use crate::window::AppId;

use super::{Applet, AppletContext, ShellCommand};

/// Board side length in cells, sized to fit the games window's content
/// area with a status row to spare.
pub const GRID_SIZE: i16 = 14;
const GAME_SPEED: Duration = Duration::from_millis(100);

/// Small xorshift generator for food placement; enough randomness for a
/// toy game without pulling in a crate.
#[derive(Debug, Clone)]
pub struct XorShift(u64);

impl XorShift {
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    pub fn gen_range(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        self.next_u64() % bound
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    x: i16,
    y: i16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    fn delta(self) -> (i16, i16) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    fn opposes(self, other: Dir) -> bool {
        matches!(
            (self, other),
            (Dir::Up, Dir::Down)
                | (Dir::Down, Dir::Up)
                | (Dir::Left, Dir::Right)
                | (Dir::Right, Dir::Left)
        )
    }
}

#[derive(Debug)]
pub struct SnakeGame {
    snake: VecDeque<Cell>,
    dir: Dir,
    food: Cell,
    score: u32,
    over: bool,
    paused: bool,
    rng: XorShift,
    last_step: Instant,
}

impl SnakeGame {
    fn new(seed: u64) -> Self {
        let mut game = Self {
            snake: VecDeque::from([Cell { x: 7, y: 7 }]),
            dir: Dir::Right,
            food: Cell { x: 3, y: 3 },
            score: 0,
            over: false,
            paused: false,
            rng: XorShift::new(seed),
            last_step: Instant::now(),
        };
        game.place_food();
        game
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    fn place_food(&mut self) {
        loop {
            let food = Cell {
                x: self.rng.gen_range(GRID_SIZE as u64) as i16,
                y: self.rng.gen_range(GRID_SIZE as u64) as i16,
            };
            if !self.snake.contains(&food) {
                self.food = food;
                return;
            }
        }
    }

    fn steer(&mut self, dir: Dir) {
        if !dir.opposes(self.dir) {
            self.dir = dir;
        }
    }

    fn step(&mut self) {
        if self.over || self.paused {
            return;
        }
        let head = self.snake.front().copied().unwrap_or(Cell { x: 7, y: 7 });
        let (dx, dy) = self.dir.delta();
        let next = Cell {
            x: head.x + dx,
            y: head.y + dy,
        };
        let hit_wall = next.x < 0 || next.y < 0 || next.x >= GRID_SIZE || next.y >= GRID_SIZE;
        if hit_wall || self.snake.contains(&next) {
            self.over = true;
            return;
        }
        self.snake.push_front(next);
        if next == self.food {
            self.score += 1;
            self.place_food();
        } else {
            self.snake.pop_back();
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct GameEntry {
    name: &'static str,
    playable: bool,
}

const GAMES: [GameEntry; 4] = [
    GameEntry {
        name: "Snake",
        playable: true,
    },
    GameEntry {
        name: "Tetris",
        playable: false,
    },
    GameEntry {
        name: "Tic Tac Toe",
        playable: false,
    },
    GameEntry {
        name: "Space Invaders",
        playable: false,
    },
];

/// Games applet: a picker over the catalog, with snake as the one playable
/// entry (the rest are listed as coming soon, as the original shipped).
pub struct GamesApplet {
    selected: usize,
    active: Option<SnakeGame>,
}

impl GamesApplet {
    pub fn new() -> Self {
        Self {
            selected: 0,
            active: None,
        }
    }

    pub fn in_game(&self) -> bool {
        self.active.is_some()
    }

    fn seed() -> u64 {
        chrono::Local::now().timestamp_nanos_opt().unwrap_or(1) as u64
    }
}

impl Default for GamesApplet {
    fn default() -> Self {
        Self::new()
    }
}

impl Applet for GamesApplet {
    fn handle_key(&mut self, key: &KeyEvent, ctx: &mut AppletContext<'_>) -> bool {
        if key.kind != KeyEventKind::Press
            || key
                .modifiers
                .contains(crossterm::event::KeyModifiers::CONTROL)
        {
            return false;
        }
        if let Some(game) = self.active.as_mut() {
            match key.code {
                KeyCode::Up => game.steer(Dir::Up),
                KeyCode::Down => game.steer(Dir::Down),
                KeyCode::Left => game.steer(Dir::Left),
                KeyCode::Right => game.steer(Dir::Right),
                KeyCode::Char(' ') => game.paused = !game.paused,
                KeyCode::Enter => {
                    if game.is_over() {
                        self.active = Some(SnakeGame::new(Self::seed()));
                    }
                }
                KeyCode::Esc | KeyCode::Char('b') => {
                    self.active = None;
                }
                _ => return false,
            }
            return true;
        }
        match key.code {
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                true
            }
            KeyCode::Down => {
                self.selected = (self.selected + 1).min(GAMES.len() - 1);
                true
            }
            KeyCode::Enter => {
                if GAMES[self.selected].playable {
                    self.active = Some(SnakeGame::new(Self::seed()));
                }
                true
            }
            KeyCode::Esc => {
                // dismiss from the picker goes through the facade
                ctx.queue.push(ShellCommand::CloseWindow(AppId::Games));
                true
            }
            _ => false,
        }
    }

    fn tick(&mut self, _ctx: &mut AppletContext<'_>) {
        if let Some(game) = self.active.as_mut()
            && game.last_step.elapsed() >= GAME_SPEED
        {
            game.last_step = Instant::now();
            game.step();
        }
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &AppletContext<'_>) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let buffer = frame.buffer_mut();
        let bounds = area.intersection(buffer.area);
        if bounds.width == 0 || bounds.height == 0 {
            return;
        }
        if let Some(game) = &self.active {
            let status = if game.is_over() {
                format!("game over  score {}  Enter restart  Esc back", game.score())
            } else if game.paused {
                format!("paused  score {}  Space resume", game.score())
            } else {
                format!("score {}  arrows steer  Space pause  Esc back", game.score())
            };
            safe_set_string(
                buffer,
                bounds,
                area.x,
                area.y,
                &truncate_to_width(&status, area.width as usize),
                Style::default().add_modifier(Modifier::BOLD),
            );
            let origin_x = area.x;
            let origin_y = area.y + 1;
            for cell in &game.snake {
                safe_set_string(
                    buffer,
                    bounds,
                    origin_x + cell.x as u16,
                    origin_y + cell.y as u16,
                    "█",
                    Style::default().fg(theme::accent()),
                );
            }
            safe_set_string(
                buffer,
                bounds,
                origin_x + game.food.x as u16,
                origin_y + game.food.y as u16,
                "●",
                Style::default().fg(theme::accent_alt()),
            );
            return;
        }
        safe_set_string(
            buffer,
            bounds,
            area.x,
            area.y,
            "Pick a game",
            Style::default().add_modifier(Modifier::BOLD),
        );
        for (idx, entry) in GAMES.iter().enumerate() {
            let suffix = if entry.playable { "" } else { "  (coming soon)" };
            let line = format!("{}{suffix}", entry.name);
            let style = if idx == self.selected {
                Style::default()
                    .bg(theme::dock_focused_bg())
                    .fg(theme::dock_focused_fg())
            } else if entry.playable {
                Style::default()
            } else {
                Style::default().fg(theme::icon_label_fg())
            };
            safe_set_string(
                buffer,
                bounds,
                area.x + 1,
                area.y + 1 + idx as u16,
                &truncate_to_width(&line, area.width.saturating_sub(1) as usize),
                style,
            );
        }
    }
}
